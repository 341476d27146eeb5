//! User profile.

use serde::{Deserialize, Serialize};

use crate::types::{AccountType, ProfileId};

/// A user or vendor profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub display_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    /// `None` until the user completes account setup.
    #[serde(default)]
    pub account_type: Option<AccountType>,
}

impl Profile {
    /// Create a fresh profile with a random ID.
    #[must_use]
    pub fn new(display_name: impl Into<String>, account_type: Option<AccountType>) -> Self {
        Self {
            id: ProfileId::random(),
            display_name: display_name.into(),
            bio: String::new(),
            avatar_url: None,
            account_type,
        }
    }

    /// Apply a partial update, leaving unset fields untouched.
    pub fn apply(&mut self, update: ProfileUpdate) {
        if let Some(display_name) = update.display_name {
            self.display_name = display_name;
        }
        if let Some(bio) = update.bio {
            self.bio = bio;
        }
        if let Some(avatar_url) = update.avatar_url {
            self.avatar_url = Some(avatar_url);
        }
        if let Some(account_type) = update.account_type {
            self.account_type = Some(account_type);
        }
    }
}

/// Partial profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub account_type: Option<AccountType>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_only_touches_set_fields() {
        let mut profile = Profile::new("Ana", None);
        profile.bio = "hello".to_string();

        profile.apply(ProfileUpdate {
            account_type: Some(AccountType::Business),
            ..ProfileUpdate::default()
        });

        assert_eq!(profile.display_name, "Ana");
        assert_eq!(profile.bio, "hello");
        assert_eq!(profile.account_type, Some(AccountType::Business));
    }

    #[test]
    fn test_deserialize_minimal_backend_row() {
        let json = r#"{"id":"7d6f2f64-1f6e-4c57-8f35-0d2b1b0e9d11","display_name":"Bia"}"#;
        let profile: Profile = serde_json::from_str(json).expect("deserialize");
        assert_eq!(profile.display_name, "Bia");
        assert!(profile.account_type.is_none());
        assert!(profile.bio.is_empty());
    }
}
