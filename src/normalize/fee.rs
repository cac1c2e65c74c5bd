//! Transaction detection and fee defaulting for a single JSON object.

use serde_json::{json, Map, Value};

/// Keys whose presence marks an object as transaction-like.
pub const TRANSACTION_KEYS: [&str; 5] = ["hash", "outputs", "txPublicKey", "vin", "vout"];

/// Returns true if the object carries any transaction key, whatever its value.
pub fn looks_like_transaction(object: &Map<String, Value>) -> bool {
    TRANSACTION_KEYS.iter().any(|key| object.contains_key(*key))
}

/// What [`ensure_fee`] did to an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeePatch {
    /// `fee` was missing or null and is now `{"amount": 0}`.
    Inserted,
    /// `fee` was an object without `amount`; `amount: 0` was added.
    Completed,
    /// Already had an amount, or `fee` is a non-object value.
    Untouched,
}

/// Guarantee `fee.amount` on a transaction-like object.
///
/// The caller decides whether the object qualifies; this only applies the
/// defaulting rules.
pub fn ensure_fee(object: &mut Map<String, Value>) -> FeePatch {
    match object.get_mut("fee") {
        None | Some(Value::Null) => {
            object.insert("fee".to_string(), json!({ "amount": 0 }));
            FeePatch::Inserted
        }
        Some(Value::Object(fee)) if !fee.contains_key("amount") => {
            fee.insert("amount".to_string(), json!(0));
            FeePatch::Completed
        }
        Some(_) => FeePatch::Untouched,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    #[test]
    fn test_heuristic_is_presence_only() {
        for key in TRANSACTION_KEYS {
            let mut map = Map::new();
            map.insert(key.to_string(), Value::Null);
            assert!(looks_like_transaction(&map), "{key} should qualify");
        }
        assert!(looks_like_transaction(&object(json!({ "vin": false }))));
        assert!(!looks_like_transaction(&object(json!({ "Hash": "x", "tx": 1 }))));
        assert!(!looks_like_transaction(&Map::new()));
    }

    #[test]
    fn test_missing_and_null_fee() {
        let mut missing = object(json!({ "hash": "abc" }));
        assert_eq!(ensure_fee(&mut missing), FeePatch::Inserted);
        assert_eq!(Value::Object(missing), json!({ "hash": "abc", "fee": { "amount": 0 } }));

        let mut null = object(json!({ "hash": "abc", "fee": null }));
        assert_eq!(ensure_fee(&mut null), FeePatch::Inserted);
        assert_eq!(null["fee"], json!({ "amount": 0 }));
    }

    #[test]
    fn test_partial_fee_completed() {
        let mut tx = object(json!({ "vin": [], "fee": { "currency": "MEVA" } }));
        assert_eq!(ensure_fee(&mut tx), FeePatch::Completed);
        assert_eq!(tx["fee"], json!({ "currency": "MEVA", "amount": 0 }));
    }

    #[test]
    fn test_existing_values_untouched() {
        let mut with_amount = object(json!({ "outputs": [], "fee": { "amount": 42 } }));
        assert_eq!(ensure_fee(&mut with_amount), FeePatch::Untouched);
        assert_eq!(with_amount["fee"]["amount"], json!(42));

        let mut null_amount = object(json!({ "outputs": [], "fee": { "amount": null } }));
        assert_eq!(ensure_fee(&mut null_amount), FeePatch::Untouched);
        assert_eq!(null_amount["fee"], json!({ "amount": null }));

        for fee in [json!(10), json!("10"), json!([1, 2]), json!(false)] {
            let mut tx = object(json!({ "hash": "h", "fee": fee.clone() }));
            assert_eq!(ensure_fee(&mut tx), FeePatch::Untouched);
            assert_eq!(tx["fee"], fee);
        }
    }
}
