//! # Concurrent Writers
//!
//! Many clients racing on the same assets. Whatever the interleaving, every
//! asset ends with a history that replays to its current value and no
//! checkout is ever granted twice.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use asset_ledger::{
        AssetLedgerApi, AssetLedgerService, AssetRegistry, LedgerConfig, LedgerError, Ownership,
        TransitionKind,
    };
    use rand::seq::SliceRandom;
    use rand::Rng;

    fn shared_ledger() -> Arc<impl AssetLedgerApi + 'static> {
        let service = AssetLedgerService::new_in_memory(
            AssetRegistry::default_inventory(),
            LedgerConfig::default(),
        )
        .unwrap();
        service.init().unwrap();
        Arc::new(service)
    }

    /// Two clients race to check out the same asset: exactly one wins.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_checkout_single_winner() {
        for _ in 0..25 {
            let ledger = shared_ledger();

            let handles: Vec<_> = ["alice", "bob"]
                .into_iter()
                .map(|holder| {
                    let ledger = Arc::clone(&ledger);
                    tokio::task::spawn_blocking(move || ledger.write("pc_a", holder).map(|_| holder))
                })
                .collect();

            let mut winners = Vec::new();
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(holder) => winners.push(holder),
                    Err(e) => assert!(matches!(e, LedgerError::IllegalTransition { .. })),
                }
            }

            assert_eq!(winners.len(), 1);
            assert_eq!(ledger.read("pc_a").unwrap(), Ownership::checked_out(winners[0]));
            assert_eq!(ledger.read_history("pc_a").unwrap().len(), 1);
        }
    }

    /// Shuffled checkouts and returns from many clients over every asset.
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_random_traffic_keeps_histories_consistent() {
        let ledger = shared_ledger();
        let assets: Vec<String> = ["pc_a", "pc_b", "pc_c", "wifi_a", "wifi_b", "wifi_c", "wifi_d"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let mut handles = Vec::new();
        for client in 0..16 {
            let ledger = Arc::clone(&ledger);
            let mut assets = assets.clone();
            handles.push(tokio::task::spawn_blocking(move || {
                let mut rng = rand::thread_rng();
                let holder = format!("client_{client}");
                let mut accepted = 0usize;
                for _ in 0..50 {
                    assets.shuffle(&mut rng);
                    let value = if rng.gen_bool(0.5) {
                        holder.as_str()
                    } else {
                        "available"
                    };
                    match ledger.write(&assets[0], value) {
                        Ok(_) => accepted += 1,
                        Err(LedgerError::IllegalTransition { .. }) => {}
                        Err(other) => panic!("unexpected error: {other}"),
                    }
                }
                accepted
            }));
        }

        let mut accepted = 0;
        for handle in handles {
            accepted += handle.await.unwrap();
        }

        let mut recorded = 0;
        for asset in &assets {
            let history = ledger.read_history(asset).unwrap();
            recorded += history.len();

            // Checkouts and returns strictly alternate
            for pair in history.windows(2) {
                assert_ne!(pair[0].new.is_available(), pair[1].new.is_available());
            }
            assert!(history
                .iter()
                .all(|e| matches!(e.kind, TransitionKind::Checkout | TransitionKind::Return)));

            let audit = ledger.verify_history(asset).unwrap();
            assert!(audit.consistent, "{asset}: {audit:?}");
        }
        assert_eq!(recorded, accepted);
    }
}
