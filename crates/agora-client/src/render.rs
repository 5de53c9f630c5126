use std::fmt::Write;

use tracing::warn;
use uuid::Uuid;

use agora_types::api::Snapshot;
use agora_types::models::{Topic, User};

use crate::api::ForumClient;
use crate::session;
use crate::storage::LocalStorage;

/// Shown with zero counts when the forum data cannot be fetched.
pub const FALLBACK_CATEGORIES: &[&str] = &["Porto", "Lisboa", "Coimbra", "Outras"];

/// Everything a page render needs. Passed explicitly; there is no global.
#[derive(Debug, Default)]
pub struct ForumContext {
    pub current_user: Option<User>,
    pub forum_data: Option<Snapshot>,
    /// Why `forum_data` is missing, for the inline message.
    pub load_error: Option<String>,
}

impl ForumContext {
    /// Restore the stored user and fetch a fresh snapshot. Never fails: a bad
    /// storage file or an unreachable server leaves the matching field empty.
    pub async fn load(client: &ForumClient, storage: &LocalStorage) -> Self {
        let current_user = session::current_user(storage).unwrap_or_else(|e| {
            warn!("Ignoring stored user: {}", e);
            None
        });

        match client.snapshot().await {
            Ok(data) => Self { current_user, forum_data: Some(data), load_error: None },
            Err(e) => {
                warn!("Failed to load forum data: {}", e);
                Self { current_user, forum_data: None, load_error: Some(e.to_string()) }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCard {
    /// None for the static fallback cards.
    pub id: Option<Uuid>,
    pub name: String,
    pub description: Option<String>,
    pub topic_count: usize,
}

pub fn topics_in_category(data: &Snapshot, category_id: Uuid) -> impl Iterator<Item = &Topic> {
    data.topics.iter().filter(move |t| t.category_id == Some(category_id))
}

pub fn category_cards(ctx: &ForumContext) -> Vec<CategoryCard> {
    match &ctx.forum_data {
        Some(data) => data
            .categories
            .iter()
            .map(|c| CategoryCard {
                id: Some(c.id),
                name: c.name.clone(),
                description: c.description.clone(),
                topic_count: topics_in_category(data, c.id).count(),
            })
            .collect(),
        None => FALLBACK_CATEGORIES
            .iter()
            .map(|name| CategoryCard {
                id: None,
                name: name.to_string(),
                description: None,
                topic_count: 0,
            })
            .collect(),
    }
}

pub fn render_home(ctx: &ForumContext) -> String {
    let mut out = String::new();
    push_header(&mut out, ctx);

    if let Some(err) = &ctx.load_error {
        let _ = writeln!(out, "! Could not load forum data: {err}");
    }

    for card in category_cards(ctx) {
        let _ = write!(out, "* {} ({})", card.name, topic_label(card.topic_count));
        if let Some(id) = card.id {
            let _ = write!(out, "  [{id}]");
        }
        out.push('\n');
        if let Some(description) = &card.description {
            let _ = writeln!(out, "    {description}");
        }
    }
    out
}

pub fn render_category(ctx: &ForumContext, category_id: Uuid) -> String {
    let mut out = String::new();
    push_header(&mut out, ctx);

    let Some(data) = &ctx.forum_data else {
        let reason = ctx.load_error.as_deref().unwrap_or("no data");
        let _ = writeln!(out, "! Could not load forum data: {reason}");
        return out;
    };

    let Some(category) = data.categories.iter().find(|c| c.id == category_id) else {
        let _ = writeln!(out, "! No such category: {category_id}");
        return out;
    };

    let _ = writeln!(out, "# {}", category.name);
    let mut empty = true;
    for topic in topics_in_category(data, category_id) {
        empty = false;
        let author = topic.author.as_ref().map_or("unknown", |u| u.username.as_str());
        let date = topic.created_at.format("%Y-%m-%d");
        let _ = writeln!(out, "- {} (by {}, {})", topic.title, author, date);
    }
    if empty {
        out.push_str("No topics yet.\n");
    }
    out
}

fn push_header(out: &mut String, ctx: &ForumContext) {
    match &ctx.current_user {
        Some(user) if user.is_banned => {
            let _ = writeln!(out, "Logged in as {} (banned)", user.username);
        }
        Some(user) => {
            let _ = writeln!(out, "Logged in as {}", user.username);
        }
        None => out.push_str("Not logged in\n"),
    }
}

fn topic_label(count: usize) -> String {
    match count {
        1 => "1 topic".to_string(),
        n => format!("{n} topics"),
    }
}

#[cfg(test)]
mod tests {
    use agora_types::models::Category;
    use chrono::Utc;

    use super::*;

    fn category(name: &str) -> Category {
        Category { id: Uuid::new_v4(), name: name.into(), description: None }
    }

    fn topic(title: &str, category_id: Option<Uuid>) -> Topic {
        Topic {
            id: Uuid::new_v4(),
            title: title.into(),
            content: "...".into(),
            category_id,
            author: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_cards_count_topics_per_category() {
        let porto = category("Porto");
        let lisboa = category("Lisboa");
        let data = Snapshot {
            topics: vec![
                topic("a", Some(porto.id)),
                topic("b", Some(porto.id)),
                topic("c", None),
                topic("d", Some(Uuid::new_v4())),
            ],
            categories: vec![porto.clone(), lisboa.clone()],
            ..Default::default()
        };
        let ctx = ForumContext { forum_data: Some(data), ..Default::default() };

        let counts: Vec<(String, usize)> =
            category_cards(&ctx).into_iter().map(|c| (c.name, c.topic_count)).collect();
        assert_eq!(counts, vec![("Porto".to_string(), 2), ("Lisboa".to_string(), 0)]);
    }

    #[test]
    fn test_fallback_cards_without_data() {
        let ctx = ForumContext { load_error: Some("boom".into()), ..Default::default() };
        let cards = category_cards(&ctx);
        let names: Vec<&str> = cards.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, FALLBACK_CATEGORIES);
        assert!(cards.iter().all(|c| c.topic_count == 0 && c.id.is_none()));

        let page = render_home(&ctx);
        assert!(page.contains("Could not load forum data: boom"));
        assert!(page.contains("* Outras (0 topics)"));
    }

    #[test]
    fn test_render_category_lists_topics() {
        let porto = category("Porto");
        let mut with_author = topic("Horários", Some(porto.id));
        with_author.author = Some(User {
            id: Uuid::new_v4(),
            username: "ines".into(),
            avatar: None,
            is_admin: false,
            is_banned: false,
            created_at: Utc::now(),
        });
        let data = Snapshot {
            topics: vec![with_author, topic("Sem autor", Some(porto.id))],
            categories: vec![porto.clone()],
            ..Default::default()
        };
        let ctx = ForumContext { forum_data: Some(data), ..Default::default() };

        let page = render_category(&ctx, porto.id);
        assert!(page.starts_with("Not logged in\n# Porto\n"));
        assert!(page.contains("- Horários (by ines,"));
        assert!(page.contains("- Sem autor (by unknown,"));

        assert!(render_category(&ctx, Uuid::new_v4()).contains("No such category"));
    }
}
