use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use meowtivation::banner::{BannerInfo, print_banner, print_farewell};
use meowtivation::config::{Config, ConfigKey, Overrides, Settings};
use meowtivation::consts::{
    CLIPBOARD_HOLD, EPHEMERAL_SESSION, REVEAL_INTERVAL, default_config_path,
    session_location,
};
use meowtivation::logging;
use meowtivation::presenter::image::HttpImageLoader;
use meowtivation::presenter::reveal::TextReveal;
use meowtivation::presenter::share::{MailShare, Sharing, SystemClipboard, TerminalClipboard};
use meowtivation::presenter::{LoadOutcome, Presenter};
use meowtivation::quote::Category;
use meowtivation::requester::Requester;
use meowtivation::screens::{self, Session, format_notice, print_view, result_footer, result_header};
use meowtivation::source::select_source;
use meowtivation::storage::HandoffStorage;

#[derive(Parser)]
#[command(name = "meowtivation", version, about = "Pick a mood, get a motivational quote and a cat.")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Webhook URL of the quote service (built-in quotes when unset)
    #[arg(short, long, env = "MEOW_WEBHOOK_URL", global = true)]
    endpoint: Option<String>,

    /// Minimum time the loading indicator stays up, in milliseconds
    #[arg(long, env = "MEOW_MIN_LOADING_MS", global = true)]
    min_loading_ms: Option<u64>,

    /// Session database holding the handoff slot. Interactive sessions keep
    /// a private in-memory slot unless this is given.
    #[arg(short, long, env = "MEOW_SESSION_DB", global = true)]
    session: Option<PathBuf>,

    /// Settings database
    #[arg(long, env = "MEOW_CONFIG_DB", global = true)]
    config_db: Option<PathBuf>,

    /// Print the quote at once instead of typing it out
    #[arg(long, default_value_t = false, global = true)]
    no_animation: bool,

    /// Share through the default mail client instead of the clipboard
    #[arg(long, default_value_t = false, global = true)]
    share_via_mail: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch one quote and hand it to the result screen
    Request {
        /// Mood category (any category when omitted)
        #[arg(short, long)]
        category: Option<Category>,
    },
    /// Show the handed-off quote
    Result,
    /// Share the handed-off quote, or copy it to the clipboard
    Share,
    /// Clear the handed-off quote
    New,
    /// Read or change stored settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print a stored value
    Get { key: ConfigKey },
    /// Store a value
    Set { key: ConfigKey, value: String },
    /// Remove a stored value
    Unset { key: ConfigKey },
}

fn path_string(path: &std::path::Path) -> String {
    path.to_string_lossy().into_owned()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init(logging::DEFAULT_FILTER);
    let cli = Cli::parse();

    let config_path = path_string(&cli.config_db.clone().unwrap_or_else(default_config_path));
    let config = Config::open(&config_path)?;

    if let Some(Command::Config { action }) = &cli.command {
        return handle_config(&config, action);
    }

    let overrides = Overrides {
        endpoint: cli.endpoint.clone(),
        min_loading_ms: cli.min_loading_ms,
    };
    let settings = Settings::resolve(&overrides, Some(&config))?;

    let session_path = session_location(cli.session.as_deref(), cli.command.is_none());
    let storage = Arc::new(HandoffStorage::open(&session_path)?);

    let clipboard = if cli.command.is_none() {
        SystemClipboard::for_session()
    } else {
        SystemClipboard::one_shot(CLIPBOARD_HOLD)
    };
    let sharing = if cli.share_via_mail {
        Sharing::new(
            Some(Box::new(MailShare)),
            Box::new(clipboard),
            Box::new(TerminalClipboard),
        )
    } else {
        Sharing::with_clipboard(clipboard)
    };
    let presenter = Presenter::new(
        Arc::clone(&storage),
        Box::new(HttpImageLoader::new()?),
        sharing,
    );
    let animate = !cli.no_animation;

    match cli.command {
        Some(Command::Request { category }) => {
            let mut requester = Requester::new(
                select_source(settings.endpoint.as_deref()),
                storage,
                settings.min_loading,
            );
            if let Some(category) = category {
                requester.click_category(category);
            }
            if screens::run_request(&mut requester).await.is_none() {
                std::process::exit(1);
            }
            println!("Your quote is ready. Run `meowtivation result` to see it.");
        }
        Some(Command::Result) => show_result_once(&presenter, animate).await?,
        Some(Command::Share) => {
            if let Some(notice) = presenter.share().await {
                println!("{}", format_notice(&notice));
            }
        }
        Some(Command::New) => {
            presenter.new_quote()?;
            println!("Cleared. Run `meowtivation request` for a new quote.");
        }
        Some(Command::Config { action }) => handle_config(&config, &action)?,
        None => {
            let source = select_source(settings.endpoint.as_deref());
            let session_label = if session_path == EPHEMERAL_SESSION {
                "ephemeral".to_string()
            } else {
                session_path.clone()
            };
            print_banner(&BannerInfo {
                source: source.name(),
                endpoint: settings.endpoint.as_deref(),
                min_loading: settings.min_loading,
                session: &session_label,
            });

            let requester = Requester::new(source, storage, settings.min_loading);
            let mut session = Session::new(requester, presenter, animate);
            session.run().await?;
            print_farewell();
        }
    }

    Ok(())
}

async fn show_result_once(presenter: &Presenter, animate: bool) -> anyhow::Result<()> {
    match presenter.load().await? {
        LoadOutcome::Render(view) if animate && view.animate => {
            print!("{}  ", result_header(&view));
            TextReveal::start(&view.quote_text, REVEAL_INTERVAL).wait().await;
            print!("{}", result_footer(&view));
        }
        LoadOutcome::Render(view) => print_view(&view),
        LoadOutcome::Redirect { .. } => {
            println!("No quote yet. Run `meowtivation request` first.");
        }
        LoadOutcome::Failed { view, .. } => {
            print_view(&view);
            println!("Run `meowtivation request` to try again.");
            std::process::exit(1);
        }
    }
    Ok(())
}

fn handle_config(config: &Config, action: &ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => match config.get(*key)? {
            Some(value) => println!("{value}"),
            None => println!("{key} is not set"),
        },
        ConfigAction::Set { key, value } => {
            config.set(*key, value)?;
            println!("✓ {key} = {}", value.trim());
        }
        ConfigAction::Unset { key } => {
            config.remove(*key)?;
            println!("✓ {key} unset");
        }
    }
    Ok(())
}
