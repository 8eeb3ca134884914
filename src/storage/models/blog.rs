//! Blog post model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::fields::{self, ValidationError};

/// A blog post (stored in `blogs.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    /// Creation time in milliseconds, unique within the file
    pub id: i64,

    pub title: String,

    /// Publication date as entered by the author
    pub date: String,

    pub content: String,

    /// Any other fields the client stored
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Validated body of a create request.
#[derive(Debug, Clone)]
pub struct NewBlog {
    pub title: String,
    pub date: String,
    pub content: String,
}

impl NewBlog {
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        const REQUIRED: &str = "title, date, content are required";

        let body = fields::object(payload, REQUIRED)?;
        match (
            fields::text(body, "title"),
            fields::text(body, "date"),
            fields::text(body, "content"),
        ) {
            (Some(title), Some(date), Some(content)) => Ok(Self {
                title: title.to_string(),
                date: date.to_string(),
                content: content.to_string(),
            }),
            _ => Err(ValidationError::new(REQUIRED)),
        }
    }

    pub fn into_blog(self, id: i64) -> Blog {
        Blog {
            id,
            title: self.title,
            date: self.date,
            content: self.content,
            extra: Map::new(),
        }
    }
}

impl Blog {
    /// Check an update body; at least one core field must be set.
    pub fn validate_patch(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
        const AT_LEAST_ONE: &str = "At least one field (title, date, content) is required";

        let body = fields::object(payload, AT_LEAST_ONE)?;
        if ["title", "date", "content"].iter().any(|key| fields::text(body, key).is_some()) {
            Ok(body)
        } else {
            Err(ValidationError::new(AT_LEAST_ONE))
        }
    }
}
