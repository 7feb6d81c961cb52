//! API response envelopes
//!
//! Single entities carry a top-level `"object"` discriminator; collections
//! are wrapped as `{"object": "list", "data": [...]}`.

use serde::{Deserialize, Serialize};

/// A single entity tagged with its object kind.
///
/// ```json
/// { "object": "cart", "id": "...", ... }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiObject<T> {
    pub object: String,
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiObject<T> {
    pub fn new(kind: impl Into<String>, data: T) -> Self {
        Self {
            object: kind.into(),
            data,
        }
    }
}

/// A list response.
///
/// ```json
/// { "object": "list", "data": [ ... ] }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub object: String,
    pub data: Vec<T>,
}

impl<T> ListResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            object: "list".to_string(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize, Deserialize)]
    struct Thing {
        id: String,
    }

    #[test]
    fn object_tag_is_flattened() {
        let body = ApiObject::new("thing", Thing { id: "x".into() });
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["object"], "thing");
        assert_eq!(json["id"], "x");
    }

    #[test]
    fn list_envelope() {
        let body = ListResponse::new(vec![Thing { id: "a".into() }]);
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["object"], "list");
        assert_eq!(json["data"][0]["id"], "a");
    }
}
