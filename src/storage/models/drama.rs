//! Drama watching progress model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::utils::fields::{self, ValidationError};

/// Progress on one drama series (stored in `dramas.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drama {
    pub id: i64,
    pub title: String,

    /// Episodes watched
    pub progress: u32,

    /// Episodes in the series
    pub total: u32,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone)]
pub struct NewDrama {
    pub title: String,
    pub progress: u32,
    pub total: u32,
}

impl NewDrama {
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        const REQUIRED: &str = "title, progress (number), total (number) are required";

        let body = fields::object(payload, REQUIRED)?;
        let title = fields::text(body, "title");
        let progress = fields::whole_number(body, "progress")?;
        let total = fields::whole_number(body, "total")?;

        match (title, progress, total) {
            (Some(title), Some(progress), Some(total)) => Ok(Self {
                title: title.to_string(),
                progress,
                total,
            }),
            _ => Err(ValidationError::new(REQUIRED)),
        }
    }

    pub fn into_drama(self, id: i64) -> Drama {
        Drama {
            id,
            title: self.title,
            progress: self.progress,
            total: self.total,
            extra: Map::new(),
        }
    }
}

impl Drama {
    pub fn validate_patch(payload: &Value) -> Result<&Map<String, Value>, ValidationError> {
        const AT_LEAST_ONE: &str = "At least one of title, progress (number), or total (number) is required";

        let body = fields::object(payload, AT_LEAST_ONE)?;
        let has_field = fields::text(body, "title").is_some()
            || fields::number(body, "progress").is_some()
            || fields::number(body, "total").is_some();

        if has_field {
            Ok(body)
        } else {
            Err(ValidationError::new(AT_LEAST_ONE))
        }
    }
}
