//! Form schemas for the public POST/GET endpoints.
//!
//! Forms deserialize leniently (`#[serde(default)]`): a missing field is an
//! empty field, reported as a validation error instead of a bad request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

const REQUIRED: &str = "required";

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(REQUIRED).with_message("This field is required.".into()));
    }
    Ok(())
}

/// Validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<String, Vec<String>>);

impl FormErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Messages for one field, empty if the field is valid.
    pub fn field(&self, name: &str) -> &[String] {
        self.0.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<ValidationErrors> for FormErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut map = BTreeMap::new();
        for (field, errs) in errors.field_errors() {
            // An empty field only reports that it is required.
            let errs: Vec<&ValidationError> = match errs.iter().find(|e| e.code == REQUIRED) {
                Some(required) => vec![required],
                None => errs.iter().collect(),
            };
            let messages = errs
                .into_iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value ({})", e.code))
                })
                .collect();
            map.insert(field.to_string(), messages);
        }
        Self(map)
    }
}

/// "Recommend this post by email" form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct EmailPostForm {
    #[validate(
        custom(function = "required"),
        length(max = 25, message = "Ensure this value has at most 25 characters.")
    )]
    pub name: String,
    #[validate(
        custom(function = "required"),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,
    #[validate(
        custom(function = "required"),
        email(message = "Enter a valid email address.")
    )]
    pub to: String,
    pub comments: String,
}

impl EmailPostForm {
    /// Trim every field in place, then validate.
    pub fn clean(&mut self) -> Result<(), FormErrors> {
        trim(&mut self.name);
        trim(&mut self.email);
        trim(&mut self.to);
        trim(&mut self.comments);
        self.validate().map_err(FormErrors::from)
    }
}

/// Comment submission form.
#[derive(Debug, Clone, Default, Deserialize, Serialize, Validate)]
#[serde(default)]
pub struct CommentForm {
    #[validate(
        custom(function = "required"),
        length(max = 80, message = "Ensure this value has at most 80 characters.")
    )]
    pub name: String,
    #[validate(
        custom(function = "required"),
        email(message = "Enter a valid email address.")
    )]
    pub email: String,
    #[validate(custom(function = "required"))]
    pub body: String,
}

impl CommentForm {
    /// Trim every field in place, then validate.
    pub fn clean(&mut self) -> Result<(), FormErrors> {
        trim(&mut self.name);
        trim(&mut self.email);
        trim(&mut self.body);
        self.validate().map_err(FormErrors::from)
    }
}

/// Search box. `query` is `None` when the parameter was not sent at all.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchForm {
    pub query: Option<String>,
}

impl SearchForm {
    pub fn is_submitted(&self) -> bool {
        self.query.is_some()
    }

    /// Trim and validate, returning the query to run.
    pub fn clean(&mut self) -> Result<String, FormErrors> {
        let query = self.query.get_or_insert_with(String::new);
        trim(query);
        if let Err(e) = required(query) {
            let mut errors = ValidationErrors::new();
            errors.add("query", e);
            return Err(errors.into());
        }
        Ok(query.clone())
    }
}

fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}
