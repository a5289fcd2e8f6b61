//! Scheduler integration tests.
//!
//! Drive the full stack under paused tokio time: scheduler, collector,
//! JSON account store, and the mock chain.

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::sync::Arc;
    use std::time::Duration;

    use rust_decimal_macros::dec;

    use sweeper::engine::cycle::Collector;
    use sweeper::engine::locks::WalletLockTable;
    use sweeper::engine::policy::SweepPolicy;
    use sweeper::engine::scheduler::Scheduler;
    use sweeper::storage::{AccountStore, JsonAccountStore};

    use crate::mocks::{seed_accounts, temp_accounts_path, MockChain, StaticMasterWallet};

    fn stack(path: &Path, chain: &Arc<MockChain>) -> (Arc<JsonAccountStore>, Arc<Collector>) {
        let store = Arc::new(JsonAccountStore::new(path));
        let collector = Arc::new(Collector::new(
            store.clone(),
            Arc::new(StaticMasterWallet::new("0xmaster", "master-key")),
            chain.clone(),
            chain.clone(),
            Arc::new(WalletLockTable::new()),
            SweepPolicy::new(dec!(0.1), dec!(0.0005)),
        ));
        (store, collector)
    }

    #[tokio::test(start_paused = true)]
    async fn test_scheduled_cycle_sweeps_and_persists() {
        let path = temp_accounts_path();
        seed_accounts(&path, &[("user-001", "0xaaa", "key-001", 0.0, 2.5)]);
        let chain = Arc::new(MockChain::new());
        chain.register_wallet("0xaaa", "key-001", dec!(2.5));
        let (store, collector) = stack(&path, &chain);

        let scheduler = Scheduler::new(collector, Duration::from_secs(60));
        scheduler.start();

        tokio::time::sleep(Duration::from_secs(61)).await;
        scheduler.stop().await;

        assert_eq!(chain.transfers().len(), 1);
        let accounts = store.list_all().await.unwrap();
        assert_eq!(accounts[0].confirmed_balance, dec!(0.0));
        assert_eq!(accounts[0].pending_deposit_balance, dec!(0.0005));

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_waits_for_the_in_flight_cycle() {
        let path = temp_accounts_path();
        seed_accounts(&path, &[("user-001", "0xaaa", "key-001", 0.0, 2.5)]);
        let chain = Arc::new(MockChain::new());
        chain.register_wallet("0xaaa", "key-001", dec!(2.5));
        chain.set_send_delay(Duration::from_secs(5));
        let (store, collector) = stack(&path, &chain);

        let scheduler = Scheduler::new(collector, Duration::from_secs(60));
        scheduler.start();

        // the first cycle started at t=60 and its transfer is still
        // confirming
        tokio::time::sleep(Duration::from_secs(61)).await;
        assert!(chain.transfers().is_empty());

        scheduler.stop().await;

        // stop only returned once the in-flight wallet settled
        assert_eq!(chain.transfers().len(), 1);
        let accounts = store.list_all().await.unwrap();
        assert_eq!(accounts[0].pending_deposit_balance, dec!(0.0005));

        std::fs::remove_file(&path).unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_later_cycles_collect_new_deposits() {
        let path = temp_accounts_path();
        seed_accounts(&path, &[("user-001", "0xaaa", "key-001", 0.0, 2.5)]);
        let chain = Arc::new(MockChain::new());
        chain.register_wallet("0xaaa", "key-001", dec!(2.5));
        let (store, collector) = stack(&path, &chain);

        let scheduler = Scheduler::new(collector, Duration::from_secs(60));
        scheduler.start();

        tokio::time::sleep(Duration::from_secs(61)).await;
        assert_eq!(chain.transfers().len(), 1);

        // a fresh deposit lands between cycles and is recorded as
        // pending by the deposit monitor
        chain.credit("0xaaa", dec!(0.9995));
        let mut account = store.list_all().await.unwrap().remove(0);
        account.pending_deposit_balance = dec!(1.0);
        assert!(store.update(&account).await.unwrap());

        tokio::time::sleep(Duration::from_secs(60)).await;
        scheduler.stop().await;

        let transfers = chain.transfers();
        assert_eq!(transfers.len(), 2);
        assert_eq!(transfers[1].amount, dec!(0.9995));
        let accounts = store.list_all().await.unwrap();
        assert_eq!(accounts[0].pending_deposit_balance, dec!(0.0005));

        std::fs::remove_file(&path).unwrap();
    }
}
