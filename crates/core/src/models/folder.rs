//! Vendor folders.

use serde::{Deserialize, Serialize};

use crate::types::{FolderId, ProfileId};

/// A named grouping of products owned by a vendor profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub owner_id: ProfileId,
    pub name: String,
    #[serde(default)]
    pub cover_image: Option<String>,
}
