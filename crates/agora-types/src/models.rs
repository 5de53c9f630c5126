use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifiers go over the wire as `_id`, the shape forum clients already
/// expect from a document store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub username: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_banned: bool,
    pub created_at: DateTime<Utc>,
}

/// References are free-form strings; nothing checks that they point anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(default)]
    pub post_id: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// A topic as served to readers: the author reference is resolved to the
/// full user, or `null` when the referenced user does not exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(rename = "authorId", default)]
    pub author: Option<User>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_wire_names() {
        let user = User {
            id: Uuid::nil(),
            username: "ana".into(),
            avatar: None,
            is_admin: false,
            is_banned: true,
            created_at: DateTime::default(),
        };
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["_id"], Uuid::nil().to_string());
        assert_eq!(value["isBanned"], true);
        assert_eq!(value["isAdmin"], false);
        assert!(value.get("createdAt").is_some());
        assert!(value["avatar"].is_null());
    }

    #[test]
    fn test_topic_with_missing_author() {
        let topic = Topic {
            id: Uuid::nil(),
            title: "Horários".into(),
            content: "...".into(),
            category_id: None,
            author: None,
            created_at: DateTime::default(),
        };
        let value = serde_json::to_value(&topic).unwrap();
        assert!(value["authorId"].is_null());
        assert!(value["categoryId"].is_null());
        let back: Topic = serde_json::from_value(value).unwrap();
        assert_eq!(back, topic);
    }
}
