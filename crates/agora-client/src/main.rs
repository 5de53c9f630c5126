use std::path::PathBuf;

use clap::{Parser, Subcommand};
use uuid::Uuid;

use agora_client::render::{render_category, render_home};
use agora_client::{ClientError, ForumClient, ForumContext, LocalStorage, session};
use agora_types::api::{CreateReportRequest, CreateTopicRequest};

#[derive(Parser)]
#[command(name = "agora-client", about = "Command-line front end for the Agora forum")]
struct Cli {
    /// Base URL of the forum server
    #[arg(long, env = "AGORA_API_URL", default_value = "http://localhost:10000")]
    api_url: String,

    /// Where the current user is remembered between runs
    #[arg(long, env = "AGORA_STORAGE_PATH", default_value = "agora-client.json")]
    storage: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the category list with topic counts
    Home,
    /// Show the topics of one category
    Category { id: Uuid },
    /// Start a topic as the current user
    Post {
        #[arg(long)]
        category: Uuid,
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
    },
    /// Log in by username, registering it on first use
    Login {
        username: String,
        #[arg(long)]
        avatar: Option<String>,
    },
    Logout,
    Whoami,
    /// Report a post
    Report {
        #[arg(long)]
        post_id: String,
        #[arg(long)]
        reason: String,
        #[arg(long)]
        author_id: Option<String>,
        #[arg(long)]
        user_id: Option<String>,
    },
    /// Ban a user (admins only)
    Ban { user_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agora_client=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ForumClient::new(cli.api_url);
    let storage = LocalStorage::new(cli.storage);

    match cli.command {
        Command::Home => {
            let ctx = ForumContext::load(&client, &storage).await;
            print!("{}", render_home(&ctx));
        }
        Command::Category { id } => {
            let ctx = ForumContext::load(&client, &storage).await;
            print!("{}", render_category(&ctx, id));
        }
        Command::Post { category, title, content } => {
            let author = session::current_user(&storage)?
                .ok_or_else(|| ClientError::Refused("Log in first".into()))?;
            let topic = client
                .create_topic(&CreateTopicRequest {
                    title,
                    content,
                    category_id: Some(category),
                    author_id: Some(author.id),
                })
                .await?;
            println!("Created topic {} ({})", topic.title, topic.id);
        }
        Command::Login { username, avatar } => {
            let user = session::login(&client, &storage, &username, avatar.as_deref()).await?;
            println!("Logged in as {} ({})", user.username, user.id);
        }
        Command::Logout => {
            session::logout(&storage)?;
            println!("Logged out");
        }
        Command::Whoami => match session::current_user(&storage)? {
            Some(user) => println!(
                "{} ({}){}{}",
                user.username,
                user.id,
                if user.is_admin { " [admin]" } else { "" },
                if user.is_banned { " [banned]" } else { "" },
            ),
            None => println!("Not logged in"),
        },
        Command::Report { post_id, reason, author_id, user_id } => {
            let report = client
                .report(&CreateReportRequest {
                    post_id: Some(post_id),
                    reason: Some(reason),
                    author_id,
                    user_id,
                    status: None,
                })
                .await?;
            println!("Report {} filed (status: {})", report.id, report.status);
        }
        Command::Ban { user_id } => {
            let current = session::current_user(&storage)?;
            session::require_admin(current.as_ref())?;
            let resp = client.ban(&user_id).await?;
            println!("{}: {}", resp.message, resp.user.username);
        }
    }

    Ok(())
}
