//! Post entity for SeaORM.

use sea_orm::QueryFilter;
use sea_orm::entity::prelude::*;

use blog_core::domain::{PostStatus, Tag};

/// Stored publication status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(2))")]
pub enum Status {
    #[sea_orm(string_value = "DF")]
    Draft,
    #[sea_orm(string_value = "PB")]
    Published,
}

impl From<Status> for PostStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Draft => PostStatus::Draft,
            Status::Published => PostStatus::Published,
        }
    }
}

impl From<PostStatus> for Status {
    fn from(status: PostStatus) -> Self {
        match status {
            PostStatus::Draft => Status::Draft,
            PostStatus::Published => Status::Published,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub author_id: i64,
    #[sea_orm(column_type = "Text")]
    pub body: String,
    pub publish: DateTimeWithTimeZone,
    pub created: DateTimeWithTimeZone,
    pub updated: DateTimeWithTimeZone,
    pub status: Status,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::AuthorId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    Author,
    #[sea_orm(has_many = "super::comment::Entity")]
    Comment,
    #[sea_orm(has_many = "super::post_tag::Entity")]
    PostTag,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl Related<super::comment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Comment.def()
    }
}

impl Related<super::tag::Entity> for Entity {
    fn to() -> RelationDef {
        super::post_tag::Relation::Tag.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::post_tag::Relation::Post.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Entity {
    /// Posts visible to the public at `now`: published and not scheduled for
    /// later. Unordered; callers pick the ordering.
    pub fn find_published(now: DateTimeWithTimeZone) -> Select<Entity> {
        Self::find()
            .filter(Column::Status.eq(Status::Published))
            .filter(Column::Publish.lte(now))
    }
}

impl Model {
    /// Convert to the domain post, attaching what was loaded alongside.
    pub fn into_domain(
        self,
        author: Option<super::user::Model>,
        tags: Vec<Tag>,
    ) -> blog_core::domain::Post {
        blog_core::domain::Post {
            id: self.id,
            title: self.title,
            slug: self.slug,
            author_id: self.author_id,
            author: author.map(|a| a.username).unwrap_or_default(),
            body: self.body,
            publish: self.publish.into(),
            created: self.created.into(),
            updated: self.updated.into(),
            status: self.status.into(),
            tags,
        }
    }
}
