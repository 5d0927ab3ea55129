mod browser;
mod catalog;
mod config;
mod error;
mod library;
mod playlist;

use anyhow::Context;
use browser::RadioBrowser;
use browser::types::{ActionType, BrowserRequest, BrowserResponse, MediaListResponse};
use catalog::HttpTransport;
use clap::{Parser, Subcommand, ValueEnum};
use library::Library;
use playlist::Playlist;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "radionet-browser", version, about = "Browse the radio.net station directory")]
struct Cli {
    /// Override config file path.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the browser descriptor.
    Info,
    /// List a virtual path ("/", "genres/", "genres/rock", "search:jazz").
    List {
        query: String,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = 20)]
        count: u32,
        /// Print the raw response as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Search stations by free text.
    Search {
        #[arg(required = true)]
        text: Vec<String>,
        #[arg(long, default_value_t = 0)]
        offset: u32,
        #[arg(long, default_value_t = 20)]
        count: u32,
        #[arg(long)]
        json: bool,
    },
    /// Run an action on a station path ("genres/rock/12345").
    Action {
        path: String,
        #[arg(value_enum)]
        action: CliAction,
    },
    /// Print the absolute URL of a cover reference.
    Asset { id: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliAction {
    Play,
    Add,
    Favorite,
    Unfavorite,
}

impl From<CliAction> for ActionType {
    fn from(a: CliAction) -> Self {
        match a {
            CliAction::Play => ActionType::Play,
            CliAction::Add => ActionType::Add,
            CliAction::Favorite => ActionType::SetFavorite,
            CliAction::Unfavorite => ActionType::UnsetFavorite,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref()).context("load config")?;

    let transport = HttpTransport::new(&cfg.catalog.user_agent, cfg.catalog.timeout_secs)
        .context("init http client")?;
    let playlist = Arc::new(Playlist::new());
    let library = Arc::new(
        Library::open(&cfg.paths.data_dir.join("library.sqlite3")).context("open library")?,
    );
    let browser = RadioBrowser::new(
        transport,
        &cfg.catalog,
        &cfg.browser,
        playlist.clone(),
        library.clone(),
    );

    match cli.command {
        Command::Info => {
            let info = browser.info();
            println!("{} ({})", info.name, info.id);
            println!("  {}", info.description);
            println!("  icon: {}", info.icon);
            println!("  search: {}", if info.supports_search { "yes" } else { "no" });
        }
        Command::List {
            query,
            offset,
            count,
            json,
        } => {
            let resp = browser
                .handle_request(BrowserRequest::GetMediaList {
                    query,
                    offset,
                    count,
                })
                .await?;
            if let Some(BrowserResponse::MediaList(list)) = resp {
                print_list(&list, json)?;
            }
        }
        Command::Search {
            text,
            offset,
            count,
            json,
        } => {
            let query = format!("{}{}", browser::query::SEARCH_PREFIX, text.join(" "));
            let list = browser.get_media_list(&query, offset, count).await?;
            print_list(&list, json)?;
        }
        Command::Action { path, action } => {
            let action = ActionType::from(action);
            browser
                .handle_request(BrowserRequest::DoAction {
                    path,
                    action,
                })
                .await?;

            match action {
                ActionType::Play | ActionType::Add => {
                    for (i, e) in playlist.entries().iter().enumerate() {
                        let marker = if playlist.current_index() == Some(i) { ">" } else { " " };
                        println!(
                            "{marker} {} [{}]",
                            e.name.as_deref().unwrap_or("(unnamed)"),
                            e.url.as_deref().unwrap_or("no stream")
                        );
                    }
                }
                _ => {
                    let favorites = library.favorites()?;
                    println!("{} favorite(s), {} stored", favorites.len(), library.len()?);
                    for name in favorites {
                        println!("  * {name}");
                    }
                }
            }
        }
        Command::Asset { id } => {
            println!("{}", browser.get_asset(&id));
        }
    }

    Ok(())
}

fn print_list(list: &MediaListResponse, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(list)?);
        return Ok(());
    }

    for (i, item) in list.items.iter().enumerate() {
        let mut line = format!(
            "{:02}. {}  (id={})",
            list.offset as usize + i + 1,
            item.name,
            item.id
        );
        if item.favorite == Some(true) {
            line.push_str(" *");
        }
        println!("{line}");
    }
    Ok(())
}
