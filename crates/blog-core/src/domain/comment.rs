use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visitor comment on a post. Only active comments are shown publicly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub active: bool,
}

/// A validated comment submission, not yet persisted.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i64,
    pub name: String,
    pub email: String,
    pub body: String,
}

impl NewComment {
    /// Materialize the submission with the given id. New comments start active.
    pub fn into_comment(self, id: i64, now: DateTime<Utc>) -> Comment {
        Comment {
            id,
            post_id: self.post_id,
            name: self.name,
            email: self.email,
            body: self.body,
            created: now,
            updated: now,
            active: true,
        }
    }
}
