use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{Comment, NewComment, Post, SearchHit, SearchMode, Tag};
use crate::error::RepoError;

/// Read access to published posts.
///
/// Every method is restricted to the published scope: status published and
/// a publish time that is not in the future. Posts come back with their
/// author name and tags loaded.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Number of published posts, optionally only those tagged `tag_id`.
    async fn count_published(&self, tag_id: Option<i64>) -> Result<u64, RepoError>;

    /// A window of published posts, newest first.
    async fn list_published(
        &self,
        tag_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError>;

    /// Find a published post by id.
    async fn find_published(&self, id: i64) -> Result<Option<Post>, RepoError>;

    /// Find the published post with `slug` published on `date` (UTC).
    async fn find_published_by_date(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError>;

    /// Published posts sharing at least one tag with `post`, most shared
    /// tags first, then newest first.
    async fn similar_to(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError>;

    /// Rank published posts against `query`, best first. Hits under the
    /// mode's threshold are not returned.
    async fn search(&self, query: &str, mode: SearchMode) -> Result<Vec<SearchHit>, RepoError>;
}

/// Comment storage.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Active comments of a post, oldest first.
    async fn active_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError>;

    /// Persist a new comment.
    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;
}

/// Tag lookup.
#[async_trait]
pub trait TagRepository: Send + Sync {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError>;
}
