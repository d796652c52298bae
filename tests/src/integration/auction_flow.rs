//! # Auction Lifecycle Flows
//!
//! Full open → bid → reveal → finalize → transfer flows driven through the
//! `Registrar` client against the simulated chain, for both deployed
//! contract generations.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use eth_registrar::adapters::mock_chain::AUCTION_LENGTH_SECS;
    use eth_registrar::prelude::*;
    use primitive_types::U256;

    const ALICE: Address = Address([0xA1; 20]);
    const BOB: Address = Address([0xB2; 20]);
    const EVE: Address = Address([0xEE; 20]);

    const HOUR: u64 = 60 * 60;
    const DAY: u64 = 24 * HOUR;

    const ONE_ETHER: u64 = 1_000_000_000_000_000_000;

    async fn fixture(
        version: ContractVersion,
    ) -> (Arc<SimulatedChain>, Registrar<SimulatedChain>) {
        let chain = Arc::new(SimulatedChain::new(version));
        let config = RegistrarConfig {
            version,
            ..RegistrarConfig::for_testing()
        };
        let registrar = Registrar::connect(chain.clone(), chain.as_ref(), config)
            .await
            .unwrap();
        (chain, registrar)
    }

    // =========================================================================
    // FULL LIFECYCLE
    // =========================================================================

    #[tokio::test]
    async fn test_full_auction_lifecycle() {
        let (chain, registrar) = fixture(ContractVersion::Hardened).await;
        let params = TxParams::sender(ALICE);
        let value = U256::from(ONE_ETHER);
        let deposit = U256::from(2 * ONE_ETHER);

        // Open: the real hash is dispatched among decoys
        let opening = registrar
            .open_auction("foobarbaz", None, &params)
            .await
            .unwrap();
        assert!(opening.hashes.contains(&label_hash("foobarbaz")));

        let entry = registrar.get_entry("foobarbaz").await.unwrap();
        assert_eq!(entry.status, AuctionStatus::Auction);
        assert_eq!(entry.status.as_raw(), 1);
        assert_eq!(entry.mode, Mode::Auction);
        assert_eq!(entry.registration_date, chain.now() + AUCTION_LENGTH_SECS);
        assert!(entry.deed.is_vacant());

        // Commit: sealed bid plus masking deposit
        let bid = registrar
            .create_bid("foobarbaz", ALICE, value, "secret")
            .await
            .unwrap();
        registrar
            .submit_bid(&bid, &params.clone().with_value(deposit))
            .await
            .unwrap();
        assert!(!registrar.is_bid_revealed(&bid).await.unwrap());

        // Into the reveal window
        chain.advance_time(4 * DAY + 12 * HOUR);
        let entry = registrar.get_entry("foobarbaz").await.unwrap();
        assert_eq!(entry.mode, Mode::Reveal);

        // Reveal: the escrow record is deleted and the bid becomes highest
        registrar.unseal_bid(&bid, &params).await.unwrap();
        assert!(registrar.is_bid_revealed(&bid).await.unwrap());
        let entry = registrar.get_entry("foobarbaz").await.unwrap();
        assert_eq!(entry.highest_bid, value);

        // Past the registration date
        chain.advance_time(DAY);
        let entry = registrar.get_entry("foobarbaz").await.unwrap();
        assert_eq!(entry.mode, Mode::Finalize);

        // Finalize: ownership assigned, deed minted
        registrar.finalize_auction("foobarbaz", &params).await.unwrap();
        let entry = registrar.get_entry("foobarbaz").await.unwrap();
        assert_eq!(entry.status, AuctionStatus::Owned);
        assert_eq!(entry.status.as_raw(), 2);
        assert_eq!(entry.mode, Mode::Owned);
        assert_eq!(entry.deed.owner, ALICE);
        assert_eq!(entry.deed.balance, value);
        assert_eq!(entry.deed.creation_date, chain.now());
    }

    #[tokio::test]
    async fn test_second_bid_outbids_first() {
        let (chain, registrar) = fixture(ContractVersion::Hardened).await;
        let low = U256::from(ONE_ETHER);
        let high = U256::from(3 * ONE_ETHER);

        registrar
            .open_auction("foobarbaz", None, &TxParams::sender(ALICE))
            .await
            .unwrap();

        let alice_bid = registrar
            .create_bid("foobarbaz", ALICE, low, "alice-secret")
            .await
            .unwrap();
        registrar
            .submit_bid(&alice_bid, &TxParams::sender(ALICE).with_value(low))
            .await
            .unwrap();

        let bob_bid = registrar
            .create_bid("foobarbaz", BOB, high, "bob-secret")
            .await
            .unwrap();
        registrar
            .submit_bid(&bob_bid, &TxParams::sender(BOB).with_value(high))
            .await
            .unwrap();

        chain.advance_time(4 * DAY + 12 * HOUR);
        registrar
            .unseal_bid(&alice_bid, &TxParams::sender(ALICE))
            .await
            .unwrap();
        registrar
            .unseal_bid(&bob_bid, &TxParams::sender(BOB))
            .await
            .unwrap();

        chain.advance_time(DAY);
        registrar
            .finalize_auction("foobarbaz", &TxParams::sender(BOB))
            .await
            .unwrap();

        // Vickrey pricing: the winner holds the name at the runner-up's price
        let entry = registrar.get_entry("foobarbaz").await.unwrap();
        assert_eq!(entry.deed.owner, BOB);
        assert_eq!(entry.highest_bid, high);
        assert_eq!(entry.value, low);
        assert_eq!(entry.deed.balance, low);
    }

    // =========================================================================
    // LEGACY GENERATION
    // =========================================================================

    #[tokio::test]
    async fn test_legacy_reveal_from_parts() {
        let (chain, registrar) = fixture(ContractVersion::Legacy).await;
        let params = TxParams::sender(ALICE);
        let value = U256::from(ONE_ETHER);

        registrar
            .open_auction("foobarbaz", None, &params)
            .await
            .unwrap();
        let bid = registrar
            .create_bid("foobarbaz", ALICE, value, "secret")
            .await
            .unwrap();
        registrar
            .submit_bid(&bid, &params.clone().with_value(value))
            .await
            .unwrap();
        assert!(!registrar.is_bid_revealed(&bid).await.unwrap());

        chain.advance_time(4 * DAY + 12 * HOUR);
        // Reveal from persisted parts, mixed-case input normalizes on the way
        registrar
            .unseal_bid_parts("FooBarBaz", ALICE, value, "secret", &params)
            .await
            .unwrap();
        assert!(registrar.is_bid_revealed(&bid).await.unwrap());

        chain.advance_time(DAY);
        registrar.finalize_auction("foobarbaz", &params).await.unwrap();
        let entry = registrar.get_entry("foobarbaz").await.unwrap();
        assert_eq!(entry.mode, Mode::Owned);
        assert_eq!(entry.deed.owner, ALICE);
    }

    // =========================================================================
    // TRANSFER
    // =========================================================================

    async fn owned_fixture() -> (Arc<SimulatedChain>, Registrar<SimulatedChain>) {
        let (chain, registrar) = fixture(ContractVersion::Hardened).await;
        let params = TxParams::sender(ALICE);
        let value = U256::from(ONE_ETHER);
        registrar
            .open_auction("foobarbaz", None, &params)
            .await
            .unwrap();
        let bid = registrar
            .create_bid("foobarbaz", ALICE, value, "secret")
            .await
            .unwrap();
        registrar
            .submit_bid(&bid, &params.clone().with_value(value))
            .await
            .unwrap();
        chain.advance_time(4 * DAY + 12 * HOUR);
        registrar.unseal_bid(&bid, &params).await.unwrap();
        chain.advance_time(DAY);
        registrar.finalize_auction("foobarbaz", &params).await.unwrap();
        (chain, registrar)
    }

    #[tokio::test]
    async fn test_transfer_rejects_non_owner_before_dispatch() {
        let (chain, registrar) = owned_fixture().await;
        let transactions_before = chain.transaction_count();

        let err = registrar
            .transfer("foobarbaz", EVE, &TxParams::sender(BOB))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            RegistrarError::NotOwner { sender, owner } if sender == BOB && owner == ALICE
        ));
        // The rejection happened locally, nothing was dispatched
        assert_eq!(chain.transaction_count(), transactions_before);
    }

    #[tokio::test]
    async fn test_transfer_by_owner() {
        let (_, registrar) = owned_fixture().await;
        registrar
            .transfer("foobarbaz", BOB, &TxParams::sender(ALICE))
            .await
            .unwrap();
        let entry = registrar.get_entry("foobarbaz").await.unwrap();
        assert_eq!(entry.deed.owner, BOB);
    }

    // =========================================================================
    // NAME VS HASH ROUND-TRIP
    // =========================================================================

    #[tokio::test]
    async fn test_entry_round_trip_by_name_and_hash() {
        let (_, registrar) = owned_fixture().await;

        let by_name = registrar.get_entry("foobarbaz").await.unwrap();
        let by_hash = registrar
            .get_entry(&label_hash("foobarbaz").to_string())
            .await
            .unwrap();

        // Identical fields except the name echoing the input form
        assert_eq!(by_name.name.as_deref(), Some("foobarbaz"));
        assert_eq!(by_hash.name, None);
        assert_eq!(by_name.hash, by_hash.hash);
        assert_eq!(by_name.status, by_hash.status);
        assert_eq!(by_name.deed, by_hash.deed);
        assert_eq!(by_name.registration_date, by_hash.registration_date);
        assert_eq!(by_name.value, by_hash.value);
        assert_eq!(by_name.highest_bid, by_hash.highest_bid);
        assert_eq!(by_name.mode, by_hash.mode);
    }

    // =========================================================================
    // INVALIDATION
    // =========================================================================

    /// Registers a short name by driving the contract directly, the way a
    /// rogue client that skips local validation would.
    async fn register_short_name(chain: &SimulatedChain, name: &str, owner: Address) {
        let registrar_address = chain.registrar_address();
        let hash = label_hash(name);
        let value = U256::from(ONE_ETHER);
        let salt = keccak256(b"salt");
        let params = TxParams::sender(owner);

        chain
            .send_transaction(
                registrar_address,
                ContractCall::new("startAuctions", vec![vec![hash].into()]),
                &params,
            )
            .await
            .unwrap();
        let sealed = chain
            .call_read(
                registrar_address,
                ContractCall::new(
                    "shaBid",
                    vec![hash.into(), owner.into(), value.into(), salt.into()],
                ),
            )
            .await
            .unwrap()
            .word(0)
            .unwrap();
        chain
            .send_transaction(
                registrar_address,
                ContractCall::new("newBid", vec![sealed.into()]),
                &params.clone().with_value(value),
            )
            .await
            .unwrap();
        chain
            .send_transaction(
                registrar_address,
                ContractCall::new("unsealBid", vec![hash.into(), value.into(), salt.into()]),
                &params,
            )
            .await
            .unwrap();
        chain.advance_time(AUCTION_LENGTH_SECS + 1);
        chain
            .send_transaction(
                registrar_address,
                ContractCall::new("finalizeAuction", vec![hash.into()]),
                &params,
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_invalidate_short_name_with_deed() {
        let (chain, registrar) = fixture(ContractVersion::Hardened).await;
        register_short_name(&chain, "abc", EVE).await;

        // A deed exists on a name too short to be legitimately owned
        let entry = registrar.get_entry("abc").await.unwrap();
        assert_eq!(entry.mode, Mode::ForbiddenCanInvalidate);
        assert!(!entry.deed.is_vacant());

        registrar
            .invalidate_name("abc", &TxParams::sender(BOB))
            .await
            .unwrap();

        let entry = registrar.get_entry("abc").await.unwrap();
        assert_eq!(entry.status, AuctionStatus::Forbidden);
        assert_eq!(entry.mode, Mode::Forbidden);
        assert!(entry.deed.is_vacant());
    }
}
