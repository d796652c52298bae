//! # Mode Windows and Normalization Invariants
//!
//! The time-driven mode transitions observed through the client, and the
//! capitalization-invariance guarantees of the normalization layer.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eth_registrar::prelude::*;

    const ALICE: Address = Address([0xA1; 20]);

    const HOUR: u64 = 60 * 60;
    const DAY: u64 = 24 * HOUR;

    async fn fixture() -> (Arc<SimulatedChain>, Registrar<SimulatedChain>) {
        let chain = Arc::new(SimulatedChain::new(ContractVersion::Hardened));
        let config = RegistrarConfig {
            version: ContractVersion::Hardened,
            ..RegistrarConfig::for_testing()
        };
        let registrar = Registrar::connect(chain.clone(), chain.as_ref(), config)
            .await
            .unwrap();
        (chain, registrar)
    }

    async fn mode_of(registrar: &Registrar<SimulatedChain>, name: &str) -> Mode {
        registrar.get_entry(name).await.unwrap().mode
    }

    #[tokio::test]
    async fn test_fresh_name_is_open() {
        let (_, registrar) = fixture().await;
        let entry = registrar.get_entry("untouched").await.unwrap();
        assert_eq!(entry.status, AuctionStatus::Open);
        assert_eq!(entry.mode, Mode::Open);
        assert!(entry.deed.is_vacant());
    }

    #[tokio::test]
    async fn test_mode_advances_with_chain_time() {
        let (chain, registrar) = fixture().await;
        registrar
            .open_auction("foobarbaz", None, &TxParams::sender(ALICE))
            .await
            .unwrap();

        // Registration date is five days out: bidding is open
        assert_eq!(mode_of(&registrar, "foobarbaz").await, Mode::Auction);

        // 36 hours remain: still bidding
        chain.advance_time(3 * DAY + 12 * HOUR);
        assert_eq!(mode_of(&registrar, "foobarbaz").await, Mode::Auction);

        // 12 hours remain: reveal window
        chain.advance_time(DAY);
        assert_eq!(mode_of(&registrar, "foobarbaz").await, Mode::Reveal);

        // Registration date passed 12 hours ago: finalize
        chain.advance_time(DAY);
        assert_eq!(mode_of(&registrar, "foobarbaz").await, Mode::Finalize);

        // Passed 36 hours ago: the finalization window has elapsed
        chain.advance_time(DAY);
        assert_eq!(mode_of(&registrar, "foobarbaz").await, Mode::FinalizeOpen);
    }

    #[tokio::test]
    async fn test_capitalization_invariance() {
        let (_, registrar) = fixture().await;
        registrar
            .open_auction("FooBarBaz", None, &TxParams::sender(ALICE))
            .await
            .unwrap();

        let upper = registrar.get_entry("FOOBARBAZ").await.unwrap();
        let lower = registrar.get_entry("foobarbaz").await.unwrap();

        // Identical normalization means identical hash and identical entry
        assert_eq!(normalize("FOOBARBAZ").unwrap(), normalize("foobarbaz").unwrap());
        assert_eq!(
            hex::encode(upper.hash.as_bytes()),
            hex::encode(lower.hash.as_bytes())
        );
        assert_eq!(upper.hash, lower.hash);
        assert_eq!(upper.hash, label_hash("foobarbaz"));
        assert_eq!(upper.mode, lower.mode);
        assert_eq!(upper.mode, Mode::Auction);
        assert_eq!(upper.name, lower.name);
    }

    #[tokio::test]
    async fn test_short_name_forbidden_regardless_of_chain_status() {
        let (chain, registrar) = fixture().await;

        // Untouched short name
        assert_eq!(mode_of(&registrar, "foo").await, Mode::Forbidden);

        // Even with an auction forced directly on the contract, the
        // classifier keeps the short name forbidden
        chain
            .send_transaction(
                chain.registrar_address(),
                ContractCall::new("startAuctions", vec![vec![label_hash("foo")].into()]),
                &TxParams::sender(ALICE),
            )
            .await
            .unwrap();
        let entry = registrar.get_entry("foo").await.unwrap();
        assert_eq!(entry.status, AuctionStatus::Auction);
        assert_eq!(entry.mode, Mode::Forbidden);
    }

    #[tokio::test]
    async fn test_short_name_rejected_before_dispatch() {
        let (chain, registrar) = fixture().await;
        let err = registrar
            .open_auction("foo", None, &TxParams::sender(ALICE))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistrarError::TooShort { length: 3, min: 7 }));
        assert_eq!(chain.transaction_count(), 0);
    }
}
