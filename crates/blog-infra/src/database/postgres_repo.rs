//! PostgreSQL repository implementations.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::sea_query::{Expr, Query, SimpleExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbBackend, DbConn, EntityTrait, FromQueryResult,
    JoinType, NotSet, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
    Statement, prelude::DateTimeWithTimeZone,
};

use blog_core::domain::{
    Comment, MIN_SEARCH_RANK, MIN_TRIGRAM_SIMILARITY, NewComment, Post, SearchHit, SearchMode, Tag,
};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, TagRepository};

use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::post_tag::{self, Entity as PostTagEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, read_err, write_err};

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// PostgreSQL comment repository.
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;

/// PostgreSQL tag repository.
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;

const FULLTEXT_SEARCH_SQL: &str = r#"
SELECT id, rank FROM (
    SELECT p.id, p.publish,
           ts_rank(
               setweight(to_tsvector(COALESCE(p.title, '')), 'A')
                   || setweight(to_tsvector(COALESCE(p.body, '')), 'B'),
               plainto_tsquery($1)
           ) AS rank
    FROM posts p
    WHERE p.status = 'PB' AND p.publish <= $2
) ranked
WHERE rank >= $3
ORDER BY rank DESC, publish DESC"#;

const TRIGRAM_SEARCH_SQL: &str = r#"
SELECT id, rank FROM (
    SELECT p.id, p.publish, similarity(p.title, $1) AS rank
    FROM posts p
    WHERE p.status = 'PB' AND p.publish <= $2
) ranked
WHERE rank > $3
ORDER BY rank DESC, publish DESC"#;

#[derive(Debug, FromQueryResult)]
struct RankedId {
    id: i64,
    rank: f32,
}

const SAME_TAGS: &str = "same_tags";

fn now() -> DateTimeWithTimeZone {
    Utc::now().into()
}

/// `posts.id IN (SELECT post_id FROM post_tags WHERE tag_id = ?)`
fn tagged_with(tag_id: i64) -> SimpleExpr {
    post::Column::Id.in_subquery(
        Query::select()
            .column(post_tag::Column::PostId)
            .from(PostTagEntity)
            .and_where(post_tag::Column::TagId.eq(tag_id))
            .to_owned(),
    )
}

/// Attach tags to posts loaded with their authors, keeping the row order.
async fn hydrate(
    db: &DbConn,
    rows: Vec<(post::Model, Option<user::Model>)>,
) -> Result<Vec<Post>, RepoError> {
    let ids: Vec<i64> = rows.iter().map(|(p, _)| p.id).collect();
    let mut tags_by_post: HashMap<i64, Vec<Tag>> = HashMap::new();

    if !ids.is_empty() {
        let links = PostTagEntity::find()
            .filter(post_tag::Column::PostId.is_in(ids))
            .find_also_related(TagEntity)
            .order_by_asc(tag::Column::Name)
            .all(db)
            .await
            .map_err(read_err)?;

        for (link, tag) in links {
            if let Some(tag) = tag {
                tags_by_post.entry(link.post_id).or_default().push(tag.into());
            }
        }
    }

    Ok(rows
        .into_iter()
        .map(|(model, author)| {
            let tags = tags_by_post.remove(&model.id).unwrap_or_default();
            model.into_domain(author, tags)
        })
        .collect())
}

/// Load posts by id, returned in the order of `ids`.
async fn load_in_order(db: &DbConn, ids: &[i64]) -> Result<Vec<Post>, RepoError> {
    if ids.is_empty() {
        return Ok(Vec::new());
    }

    let rows = PostEntity::find()
        .filter(post::Column::Id.is_in(ids.to_vec()))
        .find_also_related(UserEntity)
        .all(db)
        .await
        .map_err(read_err)?;

    let mut by_id: HashMap<i64, Post> = hydrate(db, rows)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn count_published(&self, tag_id: Option<i64>) -> Result<u64, RepoError> {
        let mut query = PostEntity::find_published(now());
        if let Some(tag_id) = tag_id {
            query = query.filter(tagged_with(tag_id));
        }

        query.count(&self.db).await.map_err(read_err)
    }

    async fn list_published(
        &self,
        tag_id: Option<i64>,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(?tag_id, offset, limit, "Listing published posts");

        let mut query = PostEntity::find_published(now());
        if let Some(tag_id) = tag_id {
            query = query.filter(tagged_with(tag_id));
        }

        let rows = query
            .order_by_desc(post::Column::Publish)
            .order_by_desc(post::Column::Id)
            .offset(offset)
            .limit(limit)
            .find_also_related(UserEntity)
            .all(&self.db)
            .await
            .map_err(read_err)?;

        hydrate(&self.db, rows).await
    }

    async fn find_published(&self, id: i64) -> Result<Option<Post>, RepoError> {
        let row = PostEntity::find_published(now())
            .filter(post::Column::Id.eq(id))
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(read_err)?;

        match row {
            Some(row) => Ok(hydrate(&self.db, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_published_by_date(
        &self,
        date: NaiveDate,
        slug: &str,
    ) -> Result<Option<Post>, RepoError> {
        let start = Utc.from_utc_datetime(&date.and_time(NaiveTime::default()));
        let end = start + Duration::days(1);

        let row = PostEntity::find_published(now())
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::Publish.gte(DateTimeWithTimeZone::from(start)))
            .filter(post::Column::Publish.lt(DateTimeWithTimeZone::from(end)))
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(read_err)?;

        match row {
            Some(row) => Ok(hydrate(&self.db, vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn similar_to(&self, post: &Post, limit: u64) -> Result<Vec<Post>, RepoError> {
        if post.tags.is_empty() {
            return Ok(Vec::new());
        }
        let tag_ids: Vec<i64> = post.tags.iter().map(|t| t.id).collect();

        let ranked: Vec<(i64, i64)> = PostEntity::find_published(now())
            .select_only()
            .column(post::Column::Id)
            .column_as(
                Expr::col((PostTagEntity, post_tag::Column::TagId)).count(),
                SAME_TAGS,
            )
            .join(JoinType::InnerJoin, post::Relation::PostTag.def())
            .filter(post_tag::Column::TagId.is_in(tag_ids))
            .filter(post::Column::Id.ne(post.id))
            .group_by(post::Column::Id)
            .order_by_desc(Expr::cust(SAME_TAGS))
            .order_by_desc(post::Column::Publish)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(read_err)?;

        let ids: Vec<i64> = ranked.into_iter().map(|(id, _)| id).collect();
        load_in_order(&self.db, &ids).await
    }

    async fn search(&self, query: &str, mode: SearchMode) -> Result<Vec<SearchHit>, RepoError> {
        let (sql, threshold) = match mode {
            SearchMode::FullText => (FULLTEXT_SEARCH_SQL, MIN_SEARCH_RANK),
            SearchMode::Trigram => (TRIGRAM_SEARCH_SQL, MIN_TRIGRAM_SIMILARITY),
        };
        tracing::debug!(?mode, "Searching posts");

        let ranked = RankedId::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Postgres,
            sql,
            [query.into(), now().into(), threshold.into()],
        ))
        .all(&self.db)
        .await
        .map_err(read_err)?;

        let ids: Vec<i64> = ranked.iter().map(|r| r.id).collect();
        let ranks: HashMap<i64, f32> = ranked.iter().map(|r| (r.id, r.rank)).collect();

        Ok(load_in_order(&self.db, &ids)
            .await?
            .into_iter()
            .map(|post| {
                let rank = ranks.get(&post.id).copied().unwrap_or_default();
                SearchHit { post, rank }
            })
            .collect())
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn active_for_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .filter(comment::Column::Active.eq(true))
            .order_by_asc(comment::Column::Created)
            .all(&self.db)
            .await
            .map_err(read_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError> {
        let now = now();
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(comment.post_id),
            name: Set(comment.name),
            email: Set(comment.email),
            body: Set(comment.body),
            created: Set(now),
            updated: Set(now),
            active: Set(true),
        }
        .insert(&self.db)
        .await
        .map_err(write_err)?;

        tracing::debug!(comment_id = model.id, post_id = model.post_id, "Comment stored");
        Ok(model.into())
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let result = TagEntity::find()
            .filter(tag::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(read_err)?;

        Ok(result.map(Into::into))
    }
}
