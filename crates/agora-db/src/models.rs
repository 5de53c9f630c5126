/// Database row types: these map directly to SQLite rows.
/// Distinct from agora-types API models to keep the DB layer independent.

#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub avatar: Option<String>,
    pub is_admin: bool,
    pub is_banned: bool,
    pub created_at: String,
}

pub struct ReportRow {
    pub id: String,
    pub post_id: Option<String>,
    pub reason: Option<String>,
    pub author_id: Option<String>,
    pub user_id: Option<String>,
    pub status: String,
    pub created_at: String,
}

pub struct CategoryRow {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
}

/// A topic joined with its author, if the author id resolves to a user.
pub struct TopicRow {
    pub id: String,
    pub title: String,
    pub content: String,
    pub category_id: Option<String>,
    pub author_id: Option<String>,
    pub author: Option<UserRow>,
    pub created_at: String,
}

pub struct NewReport {
    pub post_id: Option<String>,
    pub reason: Option<String>,
    pub author_id: Option<String>,
    pub user_id: Option<String>,
    pub status: Option<String>,
}

pub struct NewTopic {
    pub title: String,
    pub content: String,
    pub category_id: Option<String>,
    pub author_id: Option<String>,
}
