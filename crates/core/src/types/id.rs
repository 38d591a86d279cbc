//! Newtype IDs for type-safe entity references.
//!
//! Platform identifiers are opaque strings (the merchant list function mints
//! them server-side), so the wrappers hold `String` rather than an integer.
//! Use the `define_id!` macro to create wrappers that prevent accidentally
//! mixing IDs from different entity types.

use serde::{Deserialize, Serialize};

/// Macro to define a type-safe ID wrapper around an opaque string.
///
/// Creates a newtype wrapper with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use typhoonx_core::define_id;
/// define_id!(MerchantId);
/// define_id!(UserId);
///
/// let merchant_id = MerchantId::new("m_1");
/// let user_id = UserId::new("m_1");
///
/// // These are different types, so this won't compile:
/// // let _: MerchantId = user_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(MerchantId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = MerchantId::new("m_42");
        assert_eq!(id.as_str(), "m_42");
        assert_eq!(id.to_string(), "m_42");
        assert_eq!(String::from(id), "m_42");
    }

    #[test]
    fn test_serde_transparent() {
        let id = MerchantId::new("m_42");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"m_42\"");

        let parsed: MerchantId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }
}
