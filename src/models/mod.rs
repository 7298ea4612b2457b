use serde::{Deserialize, Deserializer, Serialize};

/// User object returned by the auth endpoints.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub(crate) struct UserInfo {
    pub id: i64,
    pub username: String,
}

/// One screenplay row as the backend serializes it.
///
/// Ids are PostgreSQL serials. `content` can be NULL for rows created before
/// the column default existed, so deserialization coerces NULL to empty.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct Screenplay {
    pub id: i64,

    #[serde(default)]
    pub user_id: Option<i64>,

    pub title: String,

    #[serde(default, deserialize_with = "null_to_empty")]
    pub content: String,

    #[serde(default)]
    pub created_at: String,

    #[serde(default)]
    pub updated_at: String,
}

fn null_to_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screenplay_row_contract_deserialize() {
        // Contract based on server.js: SELECT * FROM screenplays rows.
        let json = r#"{
            "id": 7,
            "user_id": 3,
            "title": "Opening Night",
            "content": "FADE IN:",
            "created_at": "2024-01-01T00:00:00.000Z",
            "updated_at": "2024-01-02T00:00:00.000Z"
        }"#;
        let sp: Screenplay = serde_json::from_str(json).expect("row should parse");
        assert_eq!(sp.id, 7);
        assert_eq!(sp.title, "Opening Night");
        assert_eq!(sp.content, "FADE IN:");
        assert_eq!(sp.updated_at, "2024-01-02T00:00:00.000Z");
    }

    #[test]
    fn test_screenplay_null_content_coerced_to_empty() {
        let json = r#"{"id": 1, "title": "Untitled", "content": null}"#;
        let sp: Screenplay = serde_json::from_str(json).expect("row should parse");
        assert_eq!(sp.content, "");
    }

    #[test]
    fn test_screenplay_missing_optional_fields() {
        let json = r#"{"id": 2, "title": "Bare"}"#;
        let sp: Screenplay = serde_json::from_str(json).expect("row should parse");
        assert_eq!(sp.content, "");
        assert!(sp.user_id.is_none());
        assert_eq!(sp.updated_at, "");
    }

    #[test]
    fn test_user_info_deserialize() {
        let json = r#"{"id": 3, "username": "ada"}"#;
        let u: UserInfo = serde_json::from_str(json).expect("user should parse");
        assert_eq!(u.id, 3);
        assert_eq!(u.username, "ada");
    }
}
