use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::StoreError;

pub type Fields = Map<String, Value>;

/// A stored JSON object plus its server-assigned id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Fields) -> Self {
        Self { id: id.into(), data }
    }

    /// Decode into a model; the document id is exposed to the model as `id`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let mut data = self.data.clone();
        data.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(data))?)
    }
}

/// Serialize a model into the field map written to the store.
pub fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidQuery(format!(
            "documents must be JSON objects, got {}",
            other
        ))),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    All,
    FieldEquals { field: String, value: Value },
}

/// A collection plus an optional equality filter; the only query shape the
/// pages need.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub collection: String,
    pub filter: Filter,
}

impl Query {
    pub fn collection(name: &str) -> Self {
        Self {
            collection: name.to_string(),
            filter: Filter::All,
        }
    }

    pub fn where_eq(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.filter = Filter::FieldEquals {
            field: field.to_string(),
            value: value.into(),
        };
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Goal;

    #[test]
    fn decode_injects_document_id() {
        let goal = Goal::new("u1", "Stretch", 100);
        let doc = Document::new("g-42", to_fields(&goal).unwrap());
        assert!(!doc.data.contains_key("id"));

        let decoded: Goal = doc.decode().unwrap();
        assert_eq!(decoded.id, "g-42");
        assert_eq!(decoded.text, "Stretch");
    }
}
