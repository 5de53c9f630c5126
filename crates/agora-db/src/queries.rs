use crate::models::{CategoryRow, NewReport, NewTopic, ReportRow, TopicRow, UserRow};
use crate::{Database, StoreError};
use anyhow::{Result, anyhow};
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, Row};
use tracing::info;
use uuid::Uuid;

const USER_COLUMNS: &str = "id, username, avatar, is_admin, is_banned, created_at";
const REPORT_COLUMNS: &str = "id, post_id, reason, author_id, user_id, status, created_at";

impl Database {
    // -- Users --

    /// Insert a user with default flags. The UNIQUE constraint on `username`
    /// is the only duplicate check, so concurrent registrations cannot race.
    pub fn create_user(
        &self,
        id: &str,
        username: &str,
        avatar: Option<&str>,
    ) -> Result<UserRow, StoreError> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, avatar, created_at) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, username, avatar, now()],
            )?;
            query_user_by_id(conn, id)?.ok_or_else(|| anyhow!("User vanished after insert: {}", id))
        })
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::UsernameTaken
            } else {
                StoreError::Other(e)
            }
        })
    }

    pub fn list_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY rowid"))?;
            let rows = stmt
                .query_map([], |row| user_from_row(row, 0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    /// Flip the ban flag. Returns the updated user, or None when no user has
    /// this id (in which case nothing was written).
    pub fn ban_user(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn_mut(|conn| {
            let changed = conn.execute("UPDATE users SET is_banned = 1 WHERE id = ?1", [id])?;
            if changed == 0 {
                return Ok(None);
            }
            query_user_by_id(conn, id)
        })
    }

    // -- Reports --

    pub fn create_report(&self, id: &str, report: &NewReport) -> Result<ReportRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO reports (id, post_id, reason, author_id, user_id, status, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, COALESCE(?6, 'new'), ?7)",
                rusqlite::params![
                    id,
                    report.post_id,
                    report.reason,
                    report.author_id,
                    report.user_id,
                    report.status,
                    now()
                ],
            )?;

            let row = conn.query_row(
                &format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = ?1"),
                [id],
                report_from_row,
            )?;
            Ok(row)
        })
    }

    pub fn list_reports(&self) -> Result<Vec<ReportRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare(&format!("SELECT {REPORT_COLUMNS} FROM reports ORDER BY rowid"))?;
            let rows = stmt
                .query_map([], report_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Categories --

    pub fn list_categories(&self) -> Result<Vec<CategoryRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, description FROM categories ORDER BY rowid")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok(CategoryRow {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        description: row.get(2)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Insert the given categories only if there are none yet.
    /// Returns true when seeding happened.
    pub fn seed_categories(&self, names: &[&str]) -> Result<bool> {
        self.with_conn_mut(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM categories", [], |r| r.get(0))?;
            if count > 0 {
                return Ok(false);
            }

            for name in names {
                insert_category(conn, &Uuid::new_v4().to_string(), name, None)?;
            }
            info!("Seeded {} initial categories", names.len());
            Ok(true)
        })
    }

    // -- Topics --

    pub fn create_topic(&self, id: &str, topic: &NewTopic) -> Result<TopicRow> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO topics (id, title, content, category_id, author_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    id,
                    topic.title,
                    topic.content,
                    topic.category_id,
                    topic.author_id,
                    now()
                ],
            )?;
            query_topic_by_id(conn, id)?
                .ok_or_else(|| anyhow!("Topic vanished after insert: {}", id))
        })
    }

    /// All topics with their author resolved through a LEFT JOIN, so a
    /// dangling author id yields a topic without an author instead of no row.
    pub fn list_topics(&self) -> Result<Vec<TopicRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!("{TOPIC_SELECT} ORDER BY t.rowid"))?;
            let rows = stmt
                .query_map([], topic_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

const TOPIC_SELECT: &str = "
    SELECT t.id, t.title, t.content, t.category_id, t.author_id, t.created_at,
           u.id, u.username, u.avatar, u.is_admin, u.is_banned, u.created_at
    FROM topics t
    LEFT JOIN users u ON u.id = t.author_id";

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}

fn insert_category(
    conn: &Connection,
    id: &str,
    name: &str,
    description: Option<&str>,
) -> Result<()> {
    conn.execute(
        "INSERT INTO categories (id, name, description) VALUES (?1, ?2, ?3)",
        rusqlite::params![id, name, description],
    )?;
    Ok(())
}

fn user_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(offset)?,
        username: row.get(offset + 1)?,
        avatar: row.get(offset + 2)?,
        is_admin: row.get(offset + 3)?,
        is_banned: row.get(offset + 4)?,
        created_at: row.get(offset + 5)?,
    })
}

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<ReportRow> {
    Ok(ReportRow {
        id: row.get(0)?,
        post_id: row.get(1)?,
        reason: row.get(2)?,
        author_id: row.get(3)?,
        user_id: row.get(4)?,
        status: row.get(5)?,
        created_at: row.get(6)?,
    })
}

fn topic_from_row(row: &Row<'_>) -> rusqlite::Result<TopicRow> {
    let author = match row.get::<_, Option<String>>(6)? {
        Some(_) => Some(user_from_row(row, 6)?),
        None => None,
    };

    Ok(TopicRow {
        id: row.get(0)?,
        title: row.get(1)?,
        content: row.get(2)?,
        category_id: row.get(3)?,
        author_id: row.get(4)?,
        created_at: row.get(5)?,
        author,
    })
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
    let row = stmt.query_row([id], |row| user_from_row(row, 0)).optional()?;
    Ok(row)
}

fn query_topic_by_id(conn: &Connection, id: &str) -> Result<Option<TopicRow>> {
    let mut stmt = conn.prepare(&format!("{TOPIC_SELECT} WHERE t.id = ?1"))?;
    let row = stmt.query_row([id], topic_from_row).optional()?;
    Ok(row)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_db() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(&dir.path().join("forum.db")).unwrap();
        (dir, db)
    }

    fn new_id() -> String {
        Uuid::new_v4().to_string()
    }

    #[test]
    fn test_create_user_defaults() {
        let (_dir, db) = open_db();
        let user = db.create_user(&new_id(), "joana", Some("a.png")).unwrap();
        assert_eq!(user.username, "joana");
        assert_eq!(user.avatar.as_deref(), Some("a.png"));
        assert!(!user.is_admin);
        assert!(!user.is_banned);
        assert!(!user.created_at.is_empty());
    }

    #[test]
    fn test_duplicate_username_is_typed() {
        let (_dir, db) = open_db();
        db.create_user(&new_id(), "joana", None).unwrap();
        let err = db.create_user(&new_id(), "joana", None).unwrap_err();
        assert!(matches!(err, StoreError::UsernameTaken));
        assert_eq!(db.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_lists_keep_insertion_order() {
        let (_dir, db) = open_db();
        for name in ["zeca", "ana", "miguel"] {
            db.create_user(&new_id(), name, None).unwrap();
        }
        let names: Vec<String> = db.list_users().unwrap().into_iter().map(|u| u.username).collect();
        assert_eq!(names, vec!["zeca", "ana", "miguel"]);
    }

    #[test]
    fn test_ban_user() {
        let (_dir, db) = open_db();
        let id = new_id();
        db.create_user(&id, "rui", None).unwrap();

        let banned = db.ban_user(&id).unwrap().unwrap();
        assert!(banned.is_banned);
        // Banning again just re-sets the flag
        assert!(db.ban_user(&id).unwrap().unwrap().is_banned);
        assert!(db.get_user_by_id(&id).unwrap().unwrap().is_banned);
    }

    #[test]
    fn test_ban_missing_user_writes_nothing() {
        let (_dir, db) = open_db();
        db.create_user(&new_id(), "rui", None).unwrap();
        assert!(db.ban_user(&new_id()).unwrap().is_none());
        assert!(db.list_users().unwrap().iter().all(|u| !u.is_banned));
    }

    #[test]
    fn test_report_defaults_and_dangling_refs() {
        let (_dir, db) = open_db();
        let report = db
            .create_report(
                &new_id(),
                &NewReport {
                    post_id: Some("no-such-post".into()),
                    reason: Some("spam".into()),
                    author_id: None,
                    user_id: Some("no-such-user".into()),
                    status: None,
                },
            )
            .unwrap();
        assert_eq!(report.status, "new");
        assert_eq!(report.post_id.as_deref(), Some("no-such-post"));

        let resolved = db
            .create_report(
                &new_id(),
                &NewReport {
                    post_id: None,
                    reason: None,
                    author_id: None,
                    user_id: None,
                    status: Some("resolved".into()),
                },
            )
            .unwrap();
        assert_eq!(resolved.status, "resolved");
        assert_eq!(db.list_reports().unwrap().len(), 2);
    }

    #[test]
    fn test_seed_categories_once() {
        let (_dir, db) = open_db();
        assert!(db.seed_categories(&["Porto", "Lisboa"]).unwrap());
        assert!(!db.seed_categories(&["Porto", "Lisboa"]).unwrap());
        let names: Vec<String> =
            db.list_categories().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Porto", "Lisboa"]);
    }

    #[test]
    fn test_topic_author_resolution() {
        let (_dir, db) = open_db();
        let author_id = new_id();
        db.create_user(&author_id, "ines", None).unwrap();
        let category_id = new_id();
        db.with_conn_mut(|conn| insert_category(conn, &category_id, "Coimbra", Some("Centro")))
            .unwrap();

        let with_author = db
            .create_topic(
                &new_id(),
                &NewTopic {
                    title: "Matrículas".into(),
                    content: "Quando abrem?".into(),
                    category_id: Some(category_id.clone()),
                    author_id: Some(author_id.clone()),
                },
            )
            .unwrap();
        assert_eq!(with_author.author.as_ref().map(|u| u.username.as_str()), Some("ines"));

        db.create_topic(
            &new_id(),
            &NewTopic {
                title: "Perdido".into(),
                content: "Autor inexistente".into(),
                category_id: None,
                author_id: Some(new_id()),
            },
        )
        .unwrap();

        let topics = db.list_topics().unwrap();
        assert_eq!(topics.len(), 2);
        assert!(topics[0].author.is_some());
        assert!(topics[1].author.is_none());
        assert!(topics[1].author_id.is_some());
    }
}
