//! Request token computation
//!
//! Every outbound request and inbound notification is authenticated with a
//! token: the SHA-256 digest of its signing field values concatenated in
//! ascending key order, rendered as lowercase hex. The shared password enters
//! the digest as one of the values and is never transmitted itself.

use sha2::{Digest, Sha256};

use crate::types::TokenValues;

/// Compute the token over a flat set of wire field values.
///
/// Keys are sorted bytewise ascending and the corresponding values are
/// concatenated in that order with no separator. The ordering is load-bearing:
/// the remote verifier recomputes the same concatenation, so any deviation
/// produces a token the API rejects.
pub fn generate_token(values: &TokenValues) -> String {
    let mut keys: Vec<&String> = values.keys().collect();
    keys.sort();

    let mut material = String::new();
    for key in keys {
        material.push_str(&values[key]);
    }

    hex::encode(Sha256::digest(material.as_bytes()))
}

/// Insert `value` rendered as a decimal string, unless it is zero.
///
/// Optional numeric fields are omitted from the wire payload when unset, so a
/// zero value must stay out of the token material as well; an entry of "0"
/// would change the digest.
pub fn insert_if_nonzero(values: &mut TokenValues, key: &str, value: u64) {
    if value != 0 {
        values.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_values() -> TokenValues {
        TokenValues::from([
            ("PaymentId".to_string(), "12345".to_string()),
            ("IP".to_string(), String::new()),
            ("TerminalKey".to_string(), "TestTerm".to_string()),
            ("Password".to_string(), "secretpwd".to_string()),
        ])
    }

    #[test]
    fn test_known_digest() {
        // Sorted keys [IP, PaymentId, Password, TerminalKey] concatenate to
        // "12345secretpwdTestTerm".
        assert_eq!(
            generate_token(&scenario_values()),
            "1ca1d51258536d96ed61a463b74ff65cbda0b87d95b65f40eba07fcc0e728ad4"
        );
    }

    #[test]
    fn test_generate_token_is_deterministic() {
        let values = scenario_values();

        let mut reordered = TokenValues::new();
        reordered.insert("TerminalKey".to_string(), "TestTerm".to_string());
        reordered.insert("Password".to_string(), "secretpwd".to_string());
        reordered.insert("IP".to_string(), String::new());
        reordered.insert("PaymentId".to_string(), "12345".to_string());

        assert_eq!(generate_token(&values), generate_token(&reordered));
        assert_eq!(generate_token(&values), generate_token(&values));
    }

    #[test]
    fn test_value_change_changes_digest() {
        let values = scenario_values();
        let mut tampered = values.clone();
        tampered.insert("PaymentId".to_string(), "12346".to_string());

        assert_ne!(generate_token(&values), generate_token(&tampered));
    }

    #[test]
    fn test_insert_if_nonzero_omits_zero() {
        let mut values = TokenValues::new();
        insert_if_nonzero(&mut values, "Amount", 0);
        assert!(!values.contains_key("Amount"));

        insert_if_nonzero(&mut values, "Amount", 300);
        assert_eq!(values.get("Amount"), Some(&"300".to_string()));
    }
}
