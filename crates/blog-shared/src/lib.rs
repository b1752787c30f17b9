//! # Blog Shared
//!
//! Input schemas posted by browsers: the share, comment and search forms.
//! Each form trims its fields and validates them, yielding either the
//! cleaned values or per-field error messages to re-render.

pub mod forms;

pub use forms::{CommentForm, EmailPostForm, FormErrors, SearchForm};
