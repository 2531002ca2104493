use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::IdParseError;
use crate::validation::{FieldRule, Validator, Violation, rules};

/// Opaque post identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(Uuid);

impl PostId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PostId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for PostId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl From<PostId> for Uuid {
    fn from(id: PostId) -> Self {
        id.0
    }
}

impl FromStr for PostId {
    type Err = IdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IdParseError(s.to_string()))
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// The caller-editable part of a post.
///
/// Create and update both take a complete set of fields; there is no partial
/// patch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostFields {
    pub title: String,
    pub content: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl PostFields {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            category: category.into(),
            tags,
        }
    }

    /// Rules applied to raw create/update payloads.
    pub fn validator() -> Validator {
        Validator::new()
            .rule(required_text("title", "Title is required"))
            .rule(required_text("content", "Content is required"))
            .rule(required_text("category", "Category is required"))
            .rule(
                FieldRule::new("tags")
                    .optional()
                    .check(rules::is_array, "Tags must be an array")
                    .check(rules::each_string, "Tags must contain only strings"),
            )
    }

    /// Storage-side invariant check on already typed fields.
    pub fn check(&self) -> Result<(), Vec<Violation>> {
        let violations: Vec<Violation> = [
            ("title", &self.title, "Title is required"),
            ("content", &self.content, "Content is required"),
            ("category", &self.category, "Category is required"),
        ]
        .into_iter()
        .filter(|(_, value, _)| value.is_empty())
        .map(|(field, _, message)| Violation::new(field, message))
        .collect();

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

fn required_text(field: &'static str, message: &'static str) -> FieldRule {
    FieldRule::new(field)
        .check(rules::is_string, message)
        .check(rules::not_empty, message)
}

/// Post entity - a blog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with a fresh id and timestamps.
    pub fn new(fields: PostFields) -> Self {
        let now = Utc::now();
        Self {
            id: PostId::new(),
            title: fields.title,
            content: fields.content,
            category: fields.category,
            tags: fields.tags,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace the editable fields and refresh `updated_at`.
    ///
    /// `updated_at` never moves behind `created_at` or its previous value.
    pub fn replace(&mut self, fields: PostFields) {
        self.title = fields.title;
        self.content = fields.content;
        self.category = fields.category;
        self.tags = fields.tags;
        self.updated_at = Utc::now().max(self.updated_at);
    }

    pub fn fields(&self) -> PostFields {
        PostFields {
            title: self.title.clone(),
            content: self.content.clone(),
            category: self.category.clone(),
            tags: self.tags.clone(),
        }
    }
}
