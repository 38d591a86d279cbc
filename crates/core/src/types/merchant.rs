//! Merchant records as exchanged with the platform functions.

use serde::{Deserialize, Serialize};

use crate::types::id::MerchantId;

/// A merchant record as returned by the merchant list function.
///
/// `merchant_id` is the stable identity used for row keying and clipboard
/// copy; no other field is assumed unique. `status` is rendered verbatim -
/// the platform owns the value set and this client never validates what it
/// reads back.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Merchant {
    pub merchant_id: MerchantId,
    pub merchant_name: String,
    #[serde(default)]
    pub domain: Option<String>,
    pub status: String,
    pub created_at: String,
}

/// Status values the create form is allowed to submit.
///
/// Reads are not constrained to this set; see [`Merchant::status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MerchantStatus {
    #[default]
    Active,
    Inactive,
}

impl std::fmt::Display for MerchantStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for MerchantStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(Self::Active),
            "inactive" => Ok(Self::Inactive),
            _ => Err(format!("invalid merchant status: {s}")),
        }
    }
}

/// Input for the merchant create call.
#[derive(Debug, Clone, Serialize)]
pub struct NewMerchant {
    pub merchant_name: String,
    pub domain: String,
    pub status: MerchantStatus,
}
