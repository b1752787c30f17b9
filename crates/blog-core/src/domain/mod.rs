//! Domain entities - the core business objects.

mod comment;
mod email;
mod pagination;
mod post;
mod search;
mod tag;

pub use comment::{Comment, NewComment};
pub use email::EmailMessage;
pub use pagination::{DEFAULT_PER_PAGE, Page, Paginator};
pub use post::{Post, PostStatus, SIMILAR_POSTS_LIMIT, rank_similar};
pub use search::{
    BODY_WEIGHT, MIN_SEARCH_RANK, MIN_TRIGRAM_SIMILARITY, SearchHit, SearchMode, TITLE_WEIGHT,
    trigram_similarity, weighted_rank,
};
pub use tag::Tag;
