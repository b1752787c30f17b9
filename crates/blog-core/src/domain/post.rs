use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Tag;

/// Maximum number of recommendations shown under a post.
pub const SIMILAR_POSTS_LIMIT: u64 = 4;

/// Publication state of a post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PostStatus {
    #[default]
    Draft,
    Published,
}

/// Post entity - a blog article with its author name and tags loaded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    pub author: String,
    /// Markdown source.
    pub body: String,
    pub publish: DateTime<Utc>,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub status: PostStatus,
    pub tags: Vec<Tag>,
}

impl Post {
    /// Whether the post is publicly visible at `now`: published status and a
    /// publish time that has been reached.
    pub fn is_published_at(&self, now: DateTime<Utc>) -> bool {
        self.status == PostStatus::Published && self.publish <= now
    }

    /// Calendar date (UTC) used in the detail URL.
    pub fn publish_date(&self) -> NaiveDate {
        self.publish.date_naive()
    }

    /// Canonical path of the detail page, e.g. `/2024/3/7/my-post/`.
    pub fn absolute_url(&self) -> String {
        let date = self.publish_date();
        format!(
            "/{}/{}/{}/{}/",
            date.year(),
            date.month(),
            date.day(),
            self.slug
        )
    }

    pub fn share_url(&self) -> String {
        format!("/{}/share/", self.id)
    }

    pub fn comment_url(&self) -> String {
        format!("/{}", self.id)
    }

    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tags.iter().any(|t| t.id == tag_id)
    }

    /// Number of tags this post has in common with `other`.
    pub fn shared_tag_count(&self, other: &Post) -> usize {
        let mine: HashSet<i64> = self.tags.iter().map(|t| t.id).collect();
        other.tags.iter().filter(|t| mine.contains(&t.id)).count()
    }
}

/// Pick the posts most similar to `post` out of `candidates`.
///
/// Candidates must share at least one tag and must not be `post` itself.
/// Ordering: shared tag count descending, then publish descending, then id
/// descending so ties are stable.
pub fn rank_similar(
    post: &Post,
    candidates: impl IntoIterator<Item = Post>,
    limit: usize,
) -> Vec<Post> {
    let mut scored: Vec<(usize, Post)> = candidates
        .into_iter()
        .filter(|candidate| candidate.id != post.id)
        .map(|candidate| (post.shared_tag_count(&candidate), candidate))
        .filter(|(shared, _)| *shared > 0)
        .collect();

    scored.sort_by_key(|(shared, candidate)| {
        (Reverse(*shared), Reverse(candidate.publish), Reverse(candidate.id))
    });

    scored
        .into_iter()
        .take(limit)
        .map(|(_, candidate)| candidate)
        .collect()
}
