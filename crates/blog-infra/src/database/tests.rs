use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeZone, Utc};

use crate::database::entity::{comment, post, post_tag, tag, user};
use crate::database::postgres_repo::{
    PostgresCommentRepository, PostgresPostRepository, PostgresTagRepository,
};
use blog_core::domain::{
    MIN_SEARCH_RANK, MIN_TRIGRAM_SIMILARITY, NewComment, PostStatus, SearchMode,
};
use blog_core::error::RepoError;
use blog_core::ports::{CommentRepository, PostRepository, TagRepository};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{DatabaseBackend, DatabaseConnection, DbErr, MockDatabase, RuntimeErr, Value};

fn post_model(id: i64, title: &str) -> post::Model {
    let now = chrono::Utc::now();
    post::Model {
        id,
        title: title.to_owned(),
        slug: title.to_lowercase().replace(' ', "-"),
        author_id: 1,
        body: "Body".to_owned(),
        publish: now.into(),
        created: now.into(),
        updated: now.into(),
        status: post::Status::Published,
    }
}

fn author() -> user::Model {
    user::Model {
        id: 1,
        username: "admin".to_owned(),
        email: "admin@example.com".to_owned(),
        created_at: chrono::Utc::now().into(),
    }
}

fn tag_model(id: i64, slug: &str) -> tag::Model {
    tag::Model {
        id,
        name: slug.to_owned(),
        slug: slug.to_owned(),
    }
}

fn no_tags() -> Vec<(post_tag::Model, Option<tag::Model>)> {
    Vec::new()
}

/// SQL and bound values of the first statement the connection ran.
fn first_statement(db: DatabaseConnection) -> (String, Vec<Value>) {
    let log = db.into_transaction_log();
    let stmt = log[0].statements()[0].clone();
    let values = stmt.values.map(|v| v.0).unwrap_or_default();
    (stmt.sql, values)
}

fn assert_published_scope(values: &[Value]) {
    assert_eq!(values[0], Value::from("PB"));
    assert!(matches!(values[1], Value::ChronoDateTimeWithTimeZone(Some(_))));
}

#[tokio::test]
async fn test_find_published_post_with_author_and_tags() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![(post_model(7, "Hello World"), Some(author()))]])
        .append_query_results(vec![vec![(
            post_tag::Model {
                post_id: 7,
                tag_id: 2,
            },
            Some(tag_model(2, "rust")),
        )]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let post = repo.find_published(7).await.unwrap().unwrap();

    assert_eq!(post.title, "Hello World");
    assert_eq!(post.author, "admin");
    assert_eq!(post.status, PostStatus::Published);
    assert_eq!(post.tags.len(), 1);
    assert_eq!(post.tags[0].slug, "rust");
}

#[tokio::test]
async fn test_find_published_post_missing() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<(post::Model, Option<user::Model>)>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.find_published(99).await.unwrap().is_none());
}

#[tokio::test]
async fn test_count_published_posts() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![BTreeMap::from([(
            "num_items",
            Value::BigInt(Some(4)),
        )])]])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert_eq!(repo.count_published(Some(3)).await.unwrap(), 4);
}

#[tokio::test]
async fn test_search_without_matches() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<BTreeMap<&str, Value>>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let hits = repo.search("nothing", SearchMode::FullText).await.unwrap();
    assert!(hits.is_empty());
}

#[tokio::test]
async fn test_find_tag_by_slug() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![tag_model(2, "rust")]])
        .into_connection();

    let repo = PostgresTagRepository::new(db);
    let tag = repo.find_by_slug("rust").await.unwrap().unwrap();
    assert_eq!(tag.id, 2);
    assert_eq!(tag.url(), "/tag/rust/");
}

#[tokio::test]
async fn test_create_comment_is_active() {
    let now = chrono::Utc::now();
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![comment::Model {
            id: 1,
            post_id: 7,
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            body: "Nice post".to_owned(),
            created: now.into(),
            updated: now.into(),
            active: true,
        }]])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let comment = repo
        .create(NewComment {
            post_id: 7,
            name: "Ann".to_owned(),
            email: "ann@example.com".to_owned(),
            body: "Nice post".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(comment.id, 1);
    assert!(comment.active);
}

#[tokio::test]
async fn test_connection_failure_maps_to_connection_error() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_errors(vec![DbErr::Conn(RuntimeErr::Internal(
            "connection refused".to_owned(),
        ))])
        .into_connection();

    let repo = PostgresCommentRepository::new(db);
    let err = repo.active_for_post(7).await.unwrap_err();
    assert!(matches!(err, RepoError::Connection(_)));
}

#[tokio::test]
async fn test_similar_posts_ranked_by_shared_tags_in_sql() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![
            BTreeMap::from([("id", Value::BigInt(Some(9))), ("same_tags", Value::BigInt(Some(2)))]),
            BTreeMap::from([("id", Value::BigInt(Some(8))), ("same_tags", Value::BigInt(Some(1)))]),
        ]])
        .append_query_results(vec![vec![
            (post_model(8, "One shared"), Some(author())),
            (post_model(9, "Two shared"), Some(author())),
        ]])
        .append_query_results(vec![no_tags()])
        .into_connection();

    let current = post_model(7, "Current").into_domain(
        Some(author()),
        vec![tag_model(2, "rust").into(), tag_model(3, "web").into()],
    );
    let repo = PostgresPostRepository::new(db);
    let similar = repo.similar_to(&current, 4).await.unwrap();

    let ids: Vec<i64> = similar.iter().map(|p| p.id).collect();
    assert_eq!(ids, vec![9, 8]);

    let (sql, values) = first_statement(repo.db);
    assert!(sql.contains(r#"COUNT("post_tags"."tag_id") AS "same_tags""#));
    assert!(sql.contains(r#"INNER JOIN "post_tags""#));
    assert!(sql.contains(r#""posts"."status" = $1"#));
    assert!(sql.contains(r#""posts"."publish" <= $2"#));
    assert!(sql.contains(r#""post_tags"."tag_id" IN ($3, $4)"#));
    assert!(sql.contains(r#""posts"."id" <> $5"#));
    assert!(sql.contains(r#"GROUP BY "posts"."id""#));
    assert!(sql.contains(r#"ORDER BY same_tags DESC, "posts"."publish" DESC, "posts"."id" DESC"#));

    assert_published_scope(&values);
    assert_eq!(
        values[2..5],
        [Value::BigInt(Some(2)), Value::BigInt(Some(3)), Value::BigInt(Some(7))]
    );
}

#[tokio::test]
async fn test_untagged_post_skips_similar_query() {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let current = post_model(7, "Current").into_domain(Some(author()), Vec::new());

    let repo = PostgresPostRepository::new(db);
    assert!(repo.similar_to(&current, 4).await.unwrap().is_empty());
    assert!(repo.db.into_transaction_log().is_empty());
}

#[tokio::test]
async fn test_fulltext_search_filters_published_and_weights_title() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![BTreeMap::from([
            ("id", Value::BigInt(Some(7))),
            ("rank", Value::Float(Some(0.9))),
        ])]])
        .append_query_results(vec![vec![(post_model(7, "Rust tips"), Some(author()))]])
        .append_query_results(vec![no_tags()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let hits = repo.search("rust tips", SearchMode::FullText).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].post.id, 7);
    assert_eq!(hits[0].rank, 0.9);

    let (sql, values) = first_statement(repo.db);
    assert!(sql.contains("setweight(to_tsvector(COALESCE(p.title, '')), 'A')"));
    assert!(sql.contains("setweight(to_tsvector(COALESCE(p.body, '')), 'B')"));
    assert!(sql.contains("plainto_tsquery($1)"));
    assert!(sql.contains("p.status = 'PB' AND p.publish <= $2"));
    assert!(sql.contains("WHERE rank >= $3"));
    assert!(sql.contains("ORDER BY rank DESC, publish DESC"));

    assert_eq!(values[0], Value::from("rust tips"));
    assert!(matches!(values[1], Value::ChronoDateTimeWithTimeZone(Some(_))));
    assert_eq!(values[2], Value::Float(Some(MIN_SEARCH_RANK)));
}

#[tokio::test]
async fn test_trigram_search_filters_published_titles() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![Vec::<BTreeMap<&str, Value>>::new()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    assert!(repo.search("rsut", SearchMode::Trigram).await.unwrap().is_empty());

    let (sql, values) = first_statement(repo.db);
    assert!(sql.contains("similarity(p.title, $1)"));
    assert!(sql.contains("p.status = 'PB' AND p.publish <= $2"));
    assert!(sql.contains("WHERE rank > $3"));
    assert_eq!(values[2], Value::Float(Some(MIN_TRIGRAM_SIMILARITY)));
}

#[tokio::test]
async fn test_find_by_date_bounds_the_utc_day() {
    let db = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results(vec![vec![(post_model(7, "Hello World"), Some(author()))]])
        .append_query_results(vec![no_tags()])
        .into_connection();

    let repo = PostgresPostRepository::new(db);
    let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
    let post = repo.find_published_by_date(date, "hello-world").await.unwrap();
    assert_eq!(post.map(|p| p.id), Some(7));

    let (sql, values) = first_statement(repo.db);
    assert!(sql.contains(r#""posts"."slug" = $3"#));
    assert!(sql.contains(r#""posts"."publish" >= $4"#));
    assert!(sql.contains(r#""posts"."publish" < $5"#));

    let start: DateTimeWithTimeZone = Utc.with_ymd_and_hms(2024, 3, 7, 0, 0, 0).unwrap().into();
    let end: DateTimeWithTimeZone = Utc.with_ymd_and_hms(2024, 3, 8, 0, 0, 0).unwrap().into();
    assert_published_scope(&values);
    assert_eq!(values[2], Value::from("hello-world"));
    assert_eq!(values[3], Value::from(start));
    assert_eq!(values[4], Value::from(end));
}
