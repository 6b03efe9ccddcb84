//! Request signing.

use freekassa_types::SignedFields;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Signs the request fields with HMAC-SHA256 keyed by the API key.
///
/// The MAC covers the `|`-joined field values in insertion order and is
/// returned as lowercase hex.
pub fn sign_fields(fields: &SignedFields, api_key: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(api_key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(fields.signing_string().as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, serde_json::Value)]) -> SignedFields {
        let mut fields = SignedFields::new();
        for (k, v) in pairs {
            fields.insert(*k, v.clone());
        }
        fields
    }

    #[test]
    fn test_signature_matches_hmac_over_joined_values() {
        let f = fields(&[("shopId", 12.into()), ("nonce", 1700000000.into())]);

        let mut mac = HmacSha256::new_from_slice(b"secret-key").unwrap();
        mac.update(b"12|1700000000");
        let expected = hex::encode(mac.finalize().into_bytes());

        assert_eq!(sign_fields(&f, "secret-key"), expected);
    }

    #[test]
    fn test_signature_is_lowercase_hex() {
        let f = fields(&[("shopId", 1.into())]);
        let sig = sign_fields(&f, "k");
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }

    #[test]
    fn test_signature_changes_with_value_and_order() {
        let base = fields(&[("a", "x".into()), ("b", "y".into())]);
        let changed = fields(&[("a", "x".into()), ("b", "z".into())]);
        let reordered = fields(&[("b", "y".into()), ("a", "x".into())]);

        let sig = sign_fields(&base, "key");
        assert_ne!(sig, sign_fields(&changed, "key"));
        assert_ne!(sig, sign_fields(&reordered, "key"));
        assert_ne!(sig, sign_fields(&base, "other-key"));
    }
}
