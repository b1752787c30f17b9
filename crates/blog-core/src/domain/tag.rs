use serde::{Deserialize, Serialize};

/// Tag attached to posts, addressed by its slug in URLs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl Tag {
    /// Path of the tag-filtered post listing.
    pub fn url(&self) -> String {
        format!("/tag/{}/", self.slug)
    }
}
