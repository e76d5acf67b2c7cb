//! Entity Codec
//!
//! Converts entities (and entity lists) to and from the cache payload.

use serde::{de::DeserializeOwned, Serialize};

use crate::error::CodecError;

/// Stable, reversible mapping between a value and its cache payload.
pub trait EntityCodec<T>: Send + Sync {
    fn encode(&self, value: &T) -> Result<String, CodecError>;
    fn decode(&self, payload: &str) -> Result<T, CodecError>;
}

/// JSON payloads via serde_json. Field order follows the struct definition,
/// so encoding the same value always yields the same bytes.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl<T> EntityCodec<T> for JsonCodec
where
    T: Serialize + DeserializeOwned,
{
    fn encode(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode(&self, payload: &str) -> Result<T, CodecError> {
        Ok(serde_json::from_str(payload)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Product, User};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn product_strategy() -> impl Strategy<Value = Product> {
        (
            1i64..i64::MAX,
            ".{0,40}",
            proptest::option::of(".{0,80}"),
            -1.0e9f64..1.0e9,
            0i64..4_000_000_000,
            0u32..1_000_000_000,
        )
            .prop_map(|(id, name, description, price, secs, nanos)| Product {
                id,
                name,
                description,
                price,
                created_at: Utc.timestamp_opt(secs, nanos).unwrap(),
            })
    }

    fn user_strategy() -> impl Strategy<Value = User> {
        (
            1i64..i64::MAX,
            ".{0,40}",
            ".{0,40}",
            0i64..4_000_000_000,
            0u32..1_000_000_000,
        )
            .prop_map(|(id, username, email, secs, nanos)| User {
                id,
                username,
                email,
                created_at: Utc.timestamp_opt(secs, nanos).unwrap(),
            })
    }

    #[test]
    fn test_user_roundtrip() {
        let user = User {
            id: 1,
            username: "ana".to_string(),
            email: "ana@x.com".to_string(),
            created_at: Utc::now(),
        };

        let payload = JsonCodec.encode(&user).unwrap();
        let decoded: User = JsonCodec.decode(&payload).unwrap();
        assert_eq!(decoded, user);
    }

    #[test]
    fn test_decode_rejects_foreign_payload() {
        let result: Result<Product, _> = JsonCodec.decode("not json");
        assert!(result.is_err());

        let result: Result<Product, _> = JsonCodec.decode(r#"{"key":"k"}"#);
        assert!(result.is_err());
    }

    proptest! {
        // encode(decode(p)) == p for every payload the codec produced
        #[test]
        fn prop_payload_roundtrip_law(products in prop::collection::vec(product_strategy(), 0..8)) {
            for product in &products {
                let payload = JsonCodec.encode(product).unwrap();
                let decoded: Product = JsonCodec.decode(&payload).unwrap();
                prop_assert_eq!(&decoded, product);
                prop_assert_eq!(JsonCodec.encode(&decoded).unwrap(), payload);
            }

            let list_payload = JsonCodec.encode(&products).unwrap();
            let decoded: Vec<Product> = JsonCodec.decode(&list_payload).unwrap();
            prop_assert_eq!(JsonCodec.encode(&decoded).unwrap(), list_payload);
        }

        #[test]
        fn prop_user_payload_roundtrip_law(users in prop::collection::vec(user_strategy(), 0..8)) {
            for user in &users {
                let payload = JsonCodec.encode(user).unwrap();
                let decoded: User = JsonCodec.decode(&payload).unwrap();
                prop_assert_eq!(&decoded, user);
                prop_assert_eq!(JsonCodec.encode(&decoded).unwrap(), payload);
            }

            let list_payload = JsonCodec.encode(&users).unwrap();
            let decoded: Vec<User> = JsonCodec.decode(&list_payload).unwrap();
            prop_assert_eq!(&decoded, &users);
            prop_assert_eq!(JsonCodec.encode(&decoded).unwrap(), list_payload);
        }
    }
}
