//! Entity records shared by the studio service and the CLI.
//!
//! Records are plain data. Invariants that span several records (cart
//! indices, folder membership, like counts) are enforced by the studio store.

pub mod folder;
pub mod item;
pub mod post;
pub mod profile;

pub use folder::Folder;
pub use item::{Item, Product};
pub use post::{Comment, Post};
pub use profile::{Profile, ProfileUpdate};
