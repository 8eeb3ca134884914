//! Game ranking model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

use crate::utils::fields::{self, ValidationError};

const REQUIRED: &str = "id, name, rank, point(number), history(array) are required";
const EACH_REQUIRED: &str = "Each game must have id, name, rank, point(number), history(array)";

/// A ranked game entry (stored in `games.json`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    /// Client-chosen id, unique within the file
    pub id: String,

    pub name: String,

    /// Current rank label
    pub rank: String,

    /// Rating points, kept exactly as sent
    pub point: Number,

    /// Past ranks or results, free-form
    pub history: Vec<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Game {
    /// Build a game from a create body.
    pub fn from_payload(payload: &Value) -> Result<Self, ValidationError> {
        let body = fields::object(payload, REQUIRED)?;
        Self::from_fields(body, Map::new()).ok_or_else(|| ValidationError::new(REQUIRED))
    }

    /// Build every game of a bulk replacement body.
    ///
    /// Unknown fields of each entry are kept.
    pub fn list_from_payload(payload: &Value) -> Result<Vec<Self>, ValidationError> {
        let entries = payload
            .as_array()
            .ok_or_else(|| ValidationError::new("Array of games is required"))?;

        entries
            .iter()
            .map(|entry| {
                let body = entry.as_object().ok_or_else(|| ValidationError::new(EACH_REQUIRED))?;
                let extra = body
                    .iter()
                    .filter(|(key, _)| !matches!(key.as_str(), "id" | "name" | "rank" | "point" | "history"))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                Self::from_fields(body, extra).ok_or_else(|| ValidationError::new(EACH_REQUIRED))
            })
            .collect()
    }

    fn from_fields(body: &Map<String, Value>, extra: Map<String, Value>) -> Option<Self> {
        Some(Self {
            id: fields::text(body, "id")?.to_string(),
            name: fields::text(body, "name")?.to_string(),
            rank: fields::text(body, "rank")?.to_string(),
            point: fields::number(body, "point")?.clone(),
            history: fields::array(body, "history")?.clone(),
            extra,
        })
    }

    /// Extract the updatable fields of an update body.
    ///
    /// Only `name`, `rank`, `point` and `history` are ever overwritten; at
    /// least one must be present.
    pub fn patch_from_payload(payload: &Value) -> Result<Map<String, Value>, ValidationError> {
        const AT_LEAST_ONE: &str = "At least one field (name, rank, point, history) is required";

        let body = fields::object(payload, AT_LEAST_ONE)?;
        let mut patch = Map::new();

        for key in ["name", "rank"] {
            if fields::text(body, key).is_some() {
                patch.insert(key.to_string(), body[key].clone());
            }
        }
        if let Some(point) = body.get("point") {
            patch.insert("point".to_string(), point.clone());
        }
        if let Some(history) = body.get("history").filter(|h| is_truthy(h)) {
            patch.insert("history".to_string(), history.clone());
        }

        if patch.is_empty() {
            Err(ValidationError::new(AT_LEAST_ONE))
        } else {
            Ok(patch)
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid() -> Value {
        json!({ "id": "valorant", "name": "VALORANT", "rank": "Gold 2", "point": 45, "history": ["Silver 3", "Gold 1"] })
    }

    #[test]
    fn test_from_payload() {
        let game = Game::from_payload(&valid()).unwrap();

        assert_eq!(game.id, "valorant");
        assert_eq!(game.point, Number::from(45));
        assert_eq!(game.history.len(), 2);
        assert!(game.extra.is_empty());
    }

    #[test]
    fn test_from_payload_type_checks() {
        let mut bad_point = valid();
        bad_point["point"] = json!("45");
        assert_eq!(Game::from_payload(&bad_point).unwrap_err().to_string(), REQUIRED);

        let mut bad_history = valid();
        bad_history["history"] = json!("Gold 1");
        assert!(Game::from_payload(&bad_history).is_err());
    }

    #[test]
    fn test_point_keeps_integer_form() {
        let game = Game::from_payload(&valid()).unwrap();
        let json = serde_json::to_string(&game).unwrap();

        assert!(json.contains("\"point\":45,"));
    }

    #[test]
    fn test_list_from_payload_keeps_extra() {
        let mut entry = valid();
        entry["icon"] = json!("v.png");

        let games = Game::list_from_payload(&json!([entry])).unwrap();
        assert_eq!(games[0].extra["icon"], "v.png");

        assert_eq!(
            Game::list_from_payload(&json!({ "games": [] })).unwrap_err().to_string(),
            "Array of games is required"
        );
        assert_eq!(
            Game::list_from_payload(&json!([valid(), { "id": "x" }])).unwrap_err().to_string(),
            EACH_REQUIRED
        );
    }

    #[test]
    fn test_patch_selects_updatable_fields() {
        let patch = Game::patch_from_payload(&json!({ "rank": "Gold 3", "point": 0, "id": "other", "note": "x" })).unwrap();

        assert_eq!(patch.len(), 2);
        assert_eq!(patch["rank"], "Gold 3");
        assert_eq!(patch["point"], 0);

        assert!(Game::patch_from_payload(&json!({ "name": "", "history": null })).is_err());
    }
}
