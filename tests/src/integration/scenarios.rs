//! # Lending Scenarios
//!
//! End-to-end lending flows driven the way a host drives the ledger: through
//! the runtime, its command dispatcher and the stdin line protocol.
//!
//! ## Flows Tested:
//!
//! 1. Checkout then read returns the holder
//! 2. Checkout then return leaves a two-entry history
//! 3. Double return is rejected and changes nothing
//! 4. Unregistered identifiers fail on every function
//! 5. A restart keeps open loans; an explicit `init` reclaims them

#[cfg(test)]
mod tests {
    use asset_ledger::{AssetLedgerApi, HistoryAudit, HistoryRecord, LedgerError};
    use ledger_runtime::config::RuntimeConfig;
    use ledger_runtime::shell::{execute, Reply};
    use ledger_runtime::LedgerRuntime;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn started_runtime() -> LedgerRuntime {
        let runtime = LedgerRuntime::new(RuntimeConfig::default()).unwrap();
        runtime.start().unwrap();
        runtime
    }

    fn history(runtime: &LedgerRuntime, asset: &str) -> Vec<HistoryRecord> {
        let payload = runtime
            .dispatcher()
            .query("read_history", &[asset])
            .unwrap();
        serde_json::from_slice(&payload).unwrap()
    }

    fn text(reply: Reply) -> String {
        match reply {
            Reply::Text(text) => text,
            other => panic!("expected a text reply, got {other:?}"),
        }
    }

    // =============================================================================
    // SCENARIOS
    // =============================================================================

    #[test]
    fn test_checkout_then_read() {
        let runtime = started_runtime();
        let dispatcher = runtime.dispatcher();

        dispatcher.invoke("write", &["pc_a", "alice"]).unwrap();

        assert_eq!(dispatcher.query("read", &["pc_a"]).unwrap(), b"alice");
    }

    #[test]
    fn test_checkout_and_return() {
        let runtime = started_runtime();
        let dispatcher = runtime.dispatcher();

        dispatcher.invoke("write", &["pc_a", "alice"]).unwrap();
        dispatcher.invoke("write", &["pc_a", "available"]).unwrap();

        assert_eq!(dispatcher.query("read", &["pc_a"]).unwrap(), b"available");

        let records = history(&runtime, "pc_a");
        assert_eq!(records.len(), 2);
        assert!(records[0].to_string().starts_with("available,alice,"));
        assert!(records[1].to_string().starts_with("alice,available,"));
        assert!(records[0].timestamp <= records[1].timestamp);
    }

    #[test]
    fn test_double_return_rejected() {
        let runtime = started_runtime();
        let dispatcher = runtime.dispatcher();

        let result = dispatcher.invoke("write", &["wifi_a", "available"]);

        assert!(matches!(result, Err(LedgerError::IllegalTransition { .. })));
        assert_eq!(dispatcher.query("read", &["wifi_a"]).unwrap(), b"available");
        assert!(history(&runtime, "wifi_a").is_empty());
    }

    #[test]
    fn test_unknown_asset_on_every_function() {
        let runtime = started_runtime();
        let dispatcher = runtime.dispatcher();
        let expected = Err(LedgerError::unknown_asset("unknown_x"));

        assert_eq!(dispatcher.invoke("write", &["unknown_x", "alice"]), expected);
        for function in ["read", "read_history", "verify_history"] {
            assert_eq!(dispatcher.query(function, &["unknown_x"]), expected);
        }
    }

    #[test]
    fn test_shell_session_matches_dispatcher() {
        let runtime = started_runtime();
        let dispatcher = runtime.dispatcher();

        assert_eq!(text(execute(dispatcher, "invoke write wifi_d bob")), "ok");
        assert_eq!(text(execute(dispatcher, "read wifi_d")), "ok bob");
        assert!(text(execute(dispatcher, "write wifi_d carol")).starts_with("error: "));
        assert_eq!(text(execute(dispatcher, "write wifi_d available")), "ok");

        let reply = text(execute(dispatcher, "verify_history wifi_d"));
        let audit: HistoryAudit = serde_json::from_str(reply.trim_start_matches("ok ")).unwrap();
        assert!(audit.consistent);
        assert_eq!(audit.entries, 2);
        assert_eq!(audit.current.as_deref(), Some("available"));
    }

    #[test]
    fn test_restart_keeps_loans_until_explicit_init() {
        let runtime = started_runtime();
        runtime.ledger().write("pc_c", "dave").unwrap();

        // A second start on the same store re-runs the boot seeding step
        let report = runtime.start().unwrap();

        assert_eq!(report.retained, 1);
        assert_eq!(report.reclaimed, 0);
        assert_eq!(report.seeded, 0);
        assert_eq!(runtime.dispatcher().query("read", &["pc_c"]).unwrap(), b"dave");
        assert_eq!(history(&runtime, "pc_c").len(), 1);

        runtime.dispatcher().invoke::<&str>("init", &[]).unwrap();

        let records = history(&runtime, "pc_c");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].previous.as_deref(), Some("dave"));
        assert_eq!(records[1].new, "available");
        assert!(runtime.ledger().verify_history("pc_c").unwrap().consistent);
    }

    #[test]
    fn test_custom_inventory_and_sentinel() {
        let config = RuntimeConfig::from_lookup(|name| match name {
            "ASSET_LEDGER_ASSETS" => Some("lab_pc_1:pc,lab_router_1:wifi".to_string()),
            "ASSET_LEDGER_SENTINEL" => Some("ict".to_string()),
            _ => None,
        })
        .unwrap();
        let runtime = LedgerRuntime::new(config).unwrap();
        runtime.start().unwrap();
        let dispatcher = runtime.dispatcher();

        assert_eq!(dispatcher.query("read", &["lab_pc_1"]).unwrap(), b"ict");
        dispatcher.invoke("write", &["lab_pc_1", "erin"]).unwrap();
        dispatcher.invoke("write", &["lab_pc_1", "ict"]).unwrap();
        assert!(dispatcher.query("read", &["pc_a"]).is_err());

        let records = history(&runtime, "lab_pc_1");
        assert_eq!(records[1].previous.as_deref(), Some("erin"));
        assert_eq!(records[1].new, "ict");
    }
}
