use appshots::review::ApprovalLedger;
use proptest::prelude::*;
use std::collections::BTreeSet;
use tempfile::TempDir;

fn key_strategy() -> impl Strategy<Value = String> {
    ("[ ]{0,2}", "[a-z]{0,3}\\|[A-Za-z_]{0,8}\\|[a-z]{1,8}", "[ ]{0,2}")
        .prop_map(|(lead, key, trail)| format!("{}{}{}", lead, key, trail))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_save_load_round_trips_trimmed_keys(keys in proptest::collection::vec(key_strategy(), 0..12)) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("review").join("approved.json");

        let mut ledger = ApprovalLedger::empty(&path);
        for key in &keys {
            ledger.approve(key);
        }
        ledger.save().unwrap();

        let expected: BTreeSet<String> = keys.iter().map(|k| k.trim().to_string()).collect();
        let loaded = ApprovalLedger::load(&path).unwrap();
        prop_assert_eq!(loaded.keys(), &expected);
    }

    #[test]
    fn prop_legacy_list_format_loads_trimmed(keys in proptest::collection::vec(key_strategy(), 0..12)) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("approved.json");
        std::fs::write(&path, serde_json::to_string(&keys).unwrap()).unwrap();

        let expected: BTreeSet<String> = keys.iter().map(|k| k.trim().to_string()).collect();
        let loaded = ApprovalLedger::load(&path).unwrap();
        prop_assert_eq!(loaded.keys(), &expected);
    }
}
