//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Kind of account a profile operates as.
///
/// A profile starts without an account type and picks one during setup.
/// Business accounts land on the vendor dashboard instead of the feed home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountType {
    Personal,
    Business,
}

impl AccountType {
    /// Whether the account can manage folders and products.
    #[must_use]
    pub const fn is_vendor(self) -> bool {
        matches!(self, Self::Business)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_type_serde() {
        assert_eq!(
            serde_json::to_string(&AccountType::Business).expect("serialize"),
            "\"business\""
        );
        let parsed: AccountType = serde_json::from_str("\"personal\"").expect("deserialize");
        assert_eq!(parsed, AccountType::Personal);
    }

    #[test]
    fn test_is_vendor() {
        assert!(AccountType::Business.is_vendor());
        assert!(!AccountType::Personal.is_vendor());
    }
}
