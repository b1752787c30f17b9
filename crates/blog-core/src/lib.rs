//! # Blog Core
//!
//! The domain layer of the blog.
//! Posts, comments, tags, pagination and ranking rules live here, together
//! with the ports the infrastructure crate implements.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
