//! Property tests for the undo ledger and ordered metadata.

use proptest::prelude::*;
use sieve_core::ledger::{LEDGER_CAPACITY, UndoLedger};
use sieve_core::model::{Document, Metadata};

fn arb_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[a-z]{1,6}\\.pdf", 0..20)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// The ledger always holds the most recent decisions, oldest first.
    #[test]
    fn ledger_keeps_most_recent_in_append_order(ids in arb_ids()) {
        let mut ledger = UndoLedger::new();
        for id in &ids {
            ledger.record(Document::new(id.clone()), id.len() % 2 == 0);
        }

        let kept: Vec<String> = ledger.list().map(|d| d.save_id.clone()).collect();
        let start = ids.len().saturating_sub(LEDGER_CAPACITY);
        prop_assert_eq!(kept, ids[start..].to_vec());
        prop_assert!(ledger.len() <= LEDGER_CAPACITY);
    }

    /// Listing indices and `get` agree.
    #[test]
    fn ledger_get_matches_listing(ids in arb_ids()) {
        let mut ledger = UndoLedger::new();
        for id in &ids {
            ledger.record(Document::new(id.clone()), id.len() % 2 == 0);
        }
        for (i, doc) in ledger.list().enumerate() {
            prop_assert_eq!(ledger.get(i).map(|d| &d.save_id), Some(&doc.save_id));
        }
        prop_assert!(ledger.get(ledger.len()).is_none());
    }

    /// Serialized metadata reloads with the same review order.
    #[test]
    fn metadata_order_survives_json(ids in arb_ids()) {
        let mut md = Metadata::new();
        for id in &ids {
            md.insert(Document::new(id.clone()));
        }
        let json = serde_json::to_string(&md).expect("serialize");
        let back: Metadata = serde_json::from_str(&json).expect("deserialize");
        prop_assert_eq!(back.ids(), md.ids());
    }
}
