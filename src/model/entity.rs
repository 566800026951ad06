use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A top-level record listed under a scope
///
/// Identity is `id`. Serialized with the upstream's `department` key so
/// snapshots stay readable next to the API's own vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Opaque upstream id
    pub id: String,

    /// Display name
    pub name: String,

    /// Grouping label (department)
    #[serde(rename = "department")]
    pub category: String,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: category.into(),
        }
    }
}

/// A single rating left on an entity
///
/// Kept as the upstream node's own key/value mapping so every field, whatever
/// its JSON type, is written back out exactly as it arrived. The accessors
/// below read the commonly used keys and treat an explicit `null` the same as
/// an absent key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubRecord {
    fields: Map<String, Value>,
}

impl SubRecord {
    /// Non-null value stored under `key`
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).filter(|value| !value.is_null())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.fields.insert(key.into(), value.into())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }

    pub fn comment(&self) -> Option<&str> {
        self.get("comment").and_then(Value::as_str)
    }

    pub fn grade(&self) -> Option<&str> {
        self.get("grade").and_then(Value::as_str)
    }

    /// Course code, stored upstream as `class`
    pub fn course(&self) -> Option<&str> {
        self.get("class").and_then(Value::as_str)
    }

    pub fn date(&self) -> Option<&str> {
        self.get("date").and_then(Value::as_str)
    }

    pub fn difficulty_rating(&self) -> Option<f64> {
        self.get("difficultyRating").and_then(Value::as_f64)
    }

    pub fn clarity_rating(&self) -> Option<f64> {
        self.get("clarityRating").and_then(Value::as_f64)
    }

    pub fn helpful_rating(&self) -> Option<f64> {
        self.get("helpfulRating").and_then(Value::as_f64)
    }

    /// Raw value; upstream has sent both numbers and booleans here
    pub fn would_take_again(&self) -> Option<&Value> {
        self.get("wouldTakeAgain")
    }

    /// Raw value; usually a `--`-joined string, but lists are kept as lists
    pub fn rating_tags(&self) -> Option<&Value> {
        self.get("ratingTags")
    }
}

impl From<Map<String, Value>> for SubRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}
