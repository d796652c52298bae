//! # Ports Layer (Middle Hexagon)
//!
//! Trait definitions between the registrar client and the outside world.
//! No concrete implementations in this module.

pub mod outbound;

pub use outbound::*;
