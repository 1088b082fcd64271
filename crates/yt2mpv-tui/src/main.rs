mod action;
mod app;
mod app_state;
mod component;
mod components;
mod theme;
mod widgets;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tokio::sync::mpsc;

use yt2mpv_proto::config::Config;
use yt2mpv_proto::platform;
use yt2mpv_tui::client::ServiceClient;
use yt2mpv_tui::enqueue::add_to_queue;
use yt2mpv_tui::logging;
use yt2mpv_tui::notify::DesktopNotifier;
use yt2mpv_tui::session::{Session, SessionError};

#[derive(Parser, Debug)]
#[command(author, version, about = "Queue YouTube/Twitch links on a local mpv service", long_about = None)]
struct Args {
    /// Config file (default: ~/.config/yt2mpv/config.toml)
    #[arg(short, long, env = "YT2MPV_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Service host, overrides the config
    #[arg(long, global = true)]
    host: Option<String>,

    /// Service port, overrides the config
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Classify a URL and queue it on the service
    Add {
        /// URL to queue (treated as the page URL)
        url: Option<String>,

        /// Link URL; wins over the page URL
        #[arg(long)]
        link: Option<String>,

        /// Page URL
        #[arg(long)]
        page: Option<String>,

        /// Read the URL from the clipboard
        #[arg(long, conflicts_with_all = ["url", "link", "page"])]
        clipboard: bool,
    },
    /// Print the current playlist
    List,
    /// Play the entry at a zero-based position
    Play { index: usize },
    /// Send a transport command (e.g. pause, next, prev)
    Control { action: String },
    /// Remove an entry by id
    Remove { id: String },
    /// Interactive playlist panel (default)
    Tui,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    let command = args.command.unwrap_or(Commands::Tui);

    let (log_tx, log_rx) = mpsc::unbounded_channel::<String>();
    let forward = matches!(command, Commands::Tui).then_some(log_tx);
    let log_path = logging::init(&platform::data_dir(), forward)?;

    // Print log path to stderr so it can be tailed right away.
    eprintln!("yt2mpv log: {}", log_path.display());
    tracing::info!("yt2mpv starting…");

    let mut config = match &args.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("failed to load config")?;
    if let Some(host) = args.host {
        config.service.host = host;
    }
    if let Some(port) = args.port {
        config.service.port = port;
    }
    tracing::info!("service at {}", config.service.base_url());

    let client = ServiceClient::new(&config.service).context("failed to build HTTP client")?;

    match command {
        Commands::Add {
            url,
            link,
            page,
            clipboard,
        } => {
            let page = if clipboard {
                Some(read_clipboard()?)
            } else {
                page.or(url)
            };
            let notifier = DesktopNotifier::new(&config.notifications);
            let outcome = add_to_queue(
                &client,
                &notifier,
                &config.notifications.app_name,
                link.as_deref(),
                page.as_deref(),
            )
            .await;
            println!("{}", outcome.message());
            Ok(exit_code(outcome.is_queued()))
        }
        Commands::List => one_shot(client, Op::List).await,
        Commands::Play { index } => one_shot(client, Op::Play(index)).await,
        Commands::Control { action } => one_shot(client, Op::Control(action)).await,
        Commands::Remove { id } => one_shot(client, Op::Remove(id)).await,
        Commands::Tui => {
            let app = app::App::new(&config, Arc::new(client));
            app.run(log_rx).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

enum Op {
    List,
    Play(usize),
    Control(String),
    Remove(String),
}

/// Open a session, run the operation, then print the playlist.
async fn one_shot(client: ServiceClient, op: Op) -> anyhow::Result<ExitCode> {
    let mut session = match Session::open(client).await {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let result = match op {
        Op::List => Ok(()),
        Op::Play(index) => session.play_index(index).await,
        Op::Control(action) => session.control(&action).await,
        Op::Remove(id) => session.remove(&id).await,
    };

    print_playlist(&session);
    match result {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(SessionError::Inert) => {
            eprintln!("nothing to do: no such entry, or it is already playing");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => {
            eprintln!("{}", e);
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_playlist(session: &Session<ServiceClient>) {
    let rows = session.rows();
    if rows.is_empty() {
        println!("(playlist is empty)");
        return;
    }
    for (i, row) in rows.iter().enumerate() {
        let marker = if row.current { "▶" } else { " " };
        println!("{} {:>3}  {}  [{}]", marker, i, row.title, row.id);
    }
}

fn read_clipboard() -> anyhow::Result<String> {
    let text = arboard::Clipboard::new()
        .and_then(|mut cb| cb.get_text())
        .context("failed to read the clipboard")?;
    Ok(text.trim().to_string())
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
