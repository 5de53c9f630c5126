//! Row to wire-model conversion. Corrupt ids and timestamps are logged and
//! replaced with defaults rather than failing the whole response.

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use agora_db::models::{CategoryRow, ReportRow, TopicRow, UserRow};
use agora_types::models::{Category, Report, Topic, User};

pub fn user(row: UserRow) -> User {
    User {
        id: parse_id(&row.id, "user"),
        created_at: parse_timestamp(&row.created_at, &row.id),
        username: row.username,
        avatar: row.avatar,
        is_admin: row.is_admin,
        is_banned: row.is_banned,
    }
}

pub fn report(row: ReportRow) -> Report {
    Report {
        id: parse_id(&row.id, "report"),
        created_at: parse_timestamp(&row.created_at, &row.id),
        post_id: row.post_id,
        reason: row.reason,
        author_id: row.author_id,
        user_id: row.user_id,
        status: row.status,
    }
}

pub fn category(row: CategoryRow) -> Category {
    Category {
        id: parse_id(&row.id, "category"),
        name: row.name,
        description: row.description,
    }
}

pub fn topic(row: TopicRow) -> Topic {
    Topic {
        id: parse_id(&row.id, "topic"),
        created_at: parse_timestamp(&row.created_at, &row.id),
        category_id: row.category_id.as_deref().and_then(|id| id.parse().ok()),
        author: row.author.map(user),
        title: row.title,
        content: row.content,
    }
}

fn parse_id(id: &str, kind: &str) -> Uuid {
    id.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} id '{}': {}", kind, id, e);
        Uuid::default()
    })
}

fn parse_timestamp(raw: &str, owner: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Column defaults are SQLite's "YYYY-MM-DD HH:MM:SS" without a zone.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on '{}': {}", raw, owner, e);
            DateTime::default()
        })
}
