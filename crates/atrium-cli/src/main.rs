use std::io::{BufRead, Write};

use anyhow::Result;
use clap::Parser;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use atrium_core::{
    ApiClient, BASE_URL_ENV, JsonSettingsRepository, Language, Sender, SettingsRepository,
    Workspace,
};

/// Line-oriented driver for the Atrium dashboard backend.
///
/// Commands: /new, /chat <n>, /counts, /projects, /quit. Anything else is
/// submitted as a chat message.
#[derive(Parser)]
#[command(name = "atrium", version)]
struct Args {
    /// Backend base URL (falls back to ATRIUM_BACKEND_URL, then settings)
    #[arg(long)]
    base_url: Option<String>,

    /// Project to activate on startup
    #[arg(long)]
    project: Option<String>,

    /// Query the Arabic inference endpoint
    #[arg(long)]
    arabic: bool,

    /// Seconds between chat-count polls
    #[arg(long)]
    poll_interval_secs: Option<u64>,

    /// Log in before chatting (prompts for the password on stdin)
    #[arg(long)]
    email: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut settings = match JsonSettingsRepository::new() {
        Ok(repo) => repo.load().await.unwrap_or_else(|e| {
            warn!(error = %e, "Failed to load settings, using defaults");
            Default::default()
        }),
        Err(e) => {
            warn!(error = %e, "No settings repository available");
            Default::default()
        }
    };
    if let Some(secs) = args.poll_interval_secs {
        settings.poll_interval_secs = secs;
    }
    if args.arabic {
        settings.language = Language::Arabic;
    }

    let base_url = args
        .base_url
        .or_else(|| std::env::var(BASE_URL_ENV).ok())
        .unwrap_or_else(|| settings.base_url.clone());

    let client = ApiClient::new(&base_url);

    if let Some(email) = &args.email {
        let password = prompt("password: ")?;
        client.user_login(email, password.trim()).await?;
    }

    match client.user_name().await {
        Ok(Some(name)) => println!("Hi {name}, how can I help you today?"),
        Ok(None) => println!("Hi, how can I help you today?"),
        Err(e) => warn!(error = %e, "Could not fetch user name"),
    }

    let workspace = Workspace::with_client(client.clone(), settings.sync_options());
    workspace.set_language(settings.language);

    if let Some(project) = &args.project {
        workspace.select_project(project.as_str()).await;
        print_transcript(&workspace);
    }

    let stdin = std::io::stdin();
    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        match line.split_once(' ').map_or((line, ""), |(a, b)| (a, b)) {
            ("/quit", _) => break,
            ("/new", _) => {
                let chat_id = workspace.start_new_chat();
                println!("Chat {chat_id}");
            }
            ("/chat", index) => match index.trim().parse::<usize>() {
                Ok(n) if n >= 1 => {
                    workspace.select_chat(n - 1).await;
                    print_transcript(&workspace);
                }
                _ => println!("usage: /chat <number>"),
            },
            ("/counts", _) => {
                workspace.refresh_counts().await;
                for (index, count) in workspace.counts().iter().enumerate() {
                    println!("Chat {}: {count}", index + 1);
                }
            }
            ("/projects", _) => match client.projects().await {
                Ok(projects) => {
                    for project in projects {
                        println!("{} {}", project.id, project.title);
                    }
                }
                Err(e) => println!("Failed to load projects: {e}"),
            },
            _ if !line.is_empty() => {
                workspace.submit(line).await;
                if let Some(reply) = workspace
                    .messages()
                    .iter()
                    .rev()
                    .find(|m| m.sender == Sender::Ai)
                {
                    println!("{}", reply.text);
                }
            }
            _ => {}
        }
    }

    workspace.shutdown();
    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut value = String::new();
    std::io::stdin().lock().read_line(&mut value)?;
    Ok(value)
}

fn print_transcript(workspace: &Workspace) {
    for message in workspace.messages() {
        let who = match message.sender {
            Sender::User => "you",
            Sender::Ai => "ai",
        };
        println!("[{who}] {}", message.text);
    }
}
