//! In-memory blog store - used when no database is configured, and by tests.
//!
//! Implements every repository port over plain vectors behind an async
//! RwLock. Search ranks come from the approximations in
//! `blog_core::domain::{weighted_rank, trigram_similarity}`.
//! Note: Data is lost on process restart.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use blog_core::domain::{
    Comment, MIN_SEARCH_RANK, MIN_TRIGRAM_SIMILARITY, NewComment, Post, SearchHit, SearchMode,
    Tag, rank_similar, trigram_similarity, weighted_rank,
};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, TagRepository};

#[derive(Default)]
struct StoreState {
    posts: Vec<Post>,
    comments: Vec<Comment>,
    tags: Vec<Tag>,
    next_comment_id: i64,
}

impl StoreState {
    fn published(&self, tag_id: Option<i64>) -> Vec<Post> {
        let now = Utc::now();
        let mut posts: Vec<Post> = self
            .posts
            .iter()
            .filter(|p| p.is_published_at(now))
            .filter(|p| tag_id.is_none_or(|id| p.has_tag(id)))
            .cloned()
            .collect();
        posts.sort_by(|a, b| b.publish.cmp(&a.publish).then(b.id.cmp(&a.id)));
        posts
    }
}

/// Blog store held entirely in memory.
#[derive(Default)]
pub struct InMemoryBlogStore {
    state: RwLock<StoreState>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a post. Its tags become known to the tag lookup.
    pub async fn insert_post(&self, post: Post) {
        let mut state = self.state.write().await;
        for tag in &post.tags {
            if !state.tags.iter().any(|t| t.id == tag.id) {
                state.tags.push(tag.clone());
            }
        }
        state.posts.retain(|p| p.id != post.id);
        state.posts.push(post);
    }

    /// Register a tag that may have no posts yet.
    pub async fn insert_tag(&self, tag: Tag) {
        let mut state = self.state.write().await;
        state.tags.retain(|t| t.id != tag.id);
        state.tags.push(tag);
    }

    /// Store a comment as-is, e.g. an inactive one awaiting moderation.
    pub async fn insert_comment(&self, comment: Comment) {
        let mut state = self.state.write().await;
        state.next_comment_id = state.next_comment_id.max(comment.id);
        state.comments.push(comment);
    }

    /// Every stored comment, active or not.
    pub async fn comments(&self) -> Vec<Comment> {
        self.state.read().await.comments.clone()
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn count_published(&self, tag_id: Option<i64>) -> Result<u64, RepoError> {
        Ok(self.state.read().await.published(tag_id).len() as u64)
    }

    async fn list_published(
        &self,
        tag_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let posts = self.state.read().await.published(tag_id);
        Ok(posts
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .collect())
    }

    async fn find_published(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let posts = self.state.read().await.published(None);
        Ok(posts.into_iter().find(|p| p.id == id))
    }

    async fn find_published_by_date(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let posts = self.state.read().await.published(None);
        Ok(posts
            .into_iter()
            .find(|p| p.slug == slug && p.publish_date() == date))
    }

    async fn similar_to(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError> {
        let candidates = self.state.read().await.published(None);
        Ok(rank_similar(post, candidates, limit as usize))
    }

    async fn search(&self, query: &str, mode: SearchMode) -> Result<Vec<SearchHit>, RepoError> {
        let posts = self.state.read().await.published(None);

        let mut hits: Vec<SearchHit> = posts
            .into_iter()
            .map(|post| {
                let rank = match mode {
                    SearchMode::FullText => weighted_rank(&post.title, &post.body, query),
                    SearchMode::Trigram => trigram_similarity(&post.title, query),
                };
                SearchHit { post, rank }
            })
            .filter(|hit| match mode {
                SearchMode::FullText => hit.rank >= MIN_SEARCH_RANK,
                SearchMode::Trigram => hit.rank > MIN_TRIGRAM_SIMILARITY,
            })
            .collect();

        // Stable sort keeps newest-first among equal ranks.
        hits.sort_by(|a, b| b.rank.partial_cmp(&a.rank).unwrap_or(Ordering::Equal));
        Ok(hits)
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn active_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let state = self.state.read().await;
        let mut comments: Vec<Comment> = state
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.active)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created, c.id));
        Ok(comments)
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let mut state = self.state.write().await;
        if !state.posts.iter().any(|p| p.id == comment.post_id) {
            return Err(RepoError::Constraint(
                "Referenced entity does not exist".to_string(),
            ));
        }

        state.next_comment_id += 1;
        let comment = comment.into_comment(state.next_comment_id, Utc::now());
        state.comments.push(comment.clone());
        Ok(comment)
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let state = self.state.read().await;
        Ok(state.tags.iter().find(|t| t.slug == slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blog_core::domain::PostStatus;
    use chrono::{Duration, TimeZone};

    fn tag(id: i64, slug: &str) -> Tag {
        Tag {
            id,
            name: slug.to_string(),
            slug: slug.to_string(),
        }
    }

    fn post(id: i64, title: &str, body: &str, tags: Vec<Tag>, days_ago: i64) -> Post {
        let publish = Utc::now() - Duration::days(days_ago);
        Post {
            id,
            title: title.to_string(),
            slug: title.to_lowercase().replace(' ', "-"),
            author_id: 1,
            author: "admin".to_string(),
            body: body.to_string(),
            publish,
            created: publish,
            updated: publish,
            status: PostStatus::Published,
            tags,
        }
    }

    async fn seeded() -> InMemoryBlogStore {
        let store = InMemoryBlogStore::new();
        let rust = tag(1, "rust");
        let web = tag(2, "web");

        store
            .insert_post(post(1, "Rust ownership", "borrowing", vec![rust.clone()], 3))
            .await;
        store
            .insert_post(post(2, "Web servers", "actix and rust", vec![rust.clone(), web.clone()], 2))
            .await;
        store
            .insert_post(post(3, "Frontend", "css", vec![web], 1))
            .await;

        let mut draft = post(4, "Rust draft", "rust rust rust", vec![rust.clone()], 0);
        draft.status = PostStatus::Draft;
        store.insert_post(draft).await;

        let scheduled = post(5, "Rust future", "later", vec![rust], -2);
        store.insert_post(scheduled).await;

        store.insert_tag(tag(3, "empty")).await;
        store
    }

    #[tokio::test]
    async fn lists_only_published_newest_first() {
        let store = seeded().await;
        let posts = store.list_published(None, 0, 10).await.unwrap();
        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(store.count_published(None).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn tag_filter_and_unused_tag() {
        let store = seeded().await;
        assert_eq!(store.count_published(Some(1)).await.unwrap(), 2);

        let empty = store.find_by_slug("empty").await.unwrap().unwrap();
        assert_eq!(store.count_published(Some(empty.id)).await.unwrap(), 0);
        assert!(store.list_published(Some(empty.id), 0, 3).await.unwrap().is_empty());
        assert!(store.find_by_slug("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn finds_by_publish_date_and_slug() {
        let store = seeded().await;
        let target = store.find_published(1).await.unwrap().unwrap();

        let found = store
            .find_published_by_date(target.publish_date(), "rust-ownership")
            .await
            .unwrap();
        assert_eq!(found.map(|p| p.id), Some(1));

        let wrong_day = target.publish_date() - Duration::days(1);
        assert!(
            store
                .find_published_by_date(wrong_day, "rust-ownership")
                .await
                .unwrap()
                .is_none()
        );
        assert!(store.find_published(4).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn search_never_returns_unpublished_posts() {
        let store = seeded().await;
        let hits = store.search("rust", SearchMode::FullText).await.unwrap();
        let ids: Vec<i64> = hits.iter().map(|h| h.post.id).collect();

        assert_eq!(ids, vec![1]);
        assert!(hits.iter().all(|h| h.rank >= MIN_SEARCH_RANK));
    }

    #[tokio::test]
    async fn multi_word_search_needs_every_word() {
        let store = InMemoryBlogStore::new();
        store.insert_post(post(1, "Rust tips", "", vec![], 1)).await;

        let partial = store.search("rust python", SearchMode::FullText).await.unwrap();
        assert!(partial.is_empty());

        let both = store.search("rust tips", SearchMode::FullText).await.unwrap();
        assert_eq!(both.iter().map(|h| h.post.id).collect::<Vec<_>>(), vec![1]);
    }

    #[tokio::test]
    async fn trigram_search_matches_titles() {
        let store = seeded().await;
        let hits = store.search("frontnd", SearchMode::Trigram).await.unwrap();
        assert_eq!(hits.first().map(|h| h.post.id), Some(3));
    }

    #[tokio::test]
    async fn similar_posts_exclude_self_and_unpublished() {
        let store = seeded().await;
        let current = store.find_published(2).await.unwrap().unwrap();
        let similar = store.similar_to(&current, 4).await.unwrap();
        let ids: Vec<i64> = similar.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[tokio::test]
    async fn created_comments_are_active_and_ordered() {
        let store = seeded().await;
        let earlier = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        store
            .insert_comment(Comment {
                id: 10,
                post_id: 1,
                name: "Hidden".to_string(),
                email: "h@example.com".to_string(),
                body: "spam".to_string(),
                created: earlier,
                updated: earlier,
                active: false,
            })
            .await;

        let created = store
            .create(NewComment {
                post_id: 1,
                name: "Ann".to_string(),
                email: "ann@example.com".to_string(),
                body: "Nice".to_string(),
            })
            .await
            .unwrap();

        assert!(created.active);
        assert_eq!(created.id, 11);

        let visible = store.active_for_post(1).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Ann");
        assert_eq!(store.comments().await.len(), 2);
    }
}
