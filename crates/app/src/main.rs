use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, PanelStateService};
use storage::repository::PreferenceRepository;
use tracing::info;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://gymdesk.sqlite3";
const DB_URL_ENV: &str = "GYMDESK_DB_URL";

#[derive(Debug, PartialEq, Eq)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn preferences(&self) -> Arc<dyn PreferenceRepository> {
        self.services.preferences()
    }

    fn panel_state(&self) -> Arc<PanelStateService> {
        self.services.panel_state()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Parsed {
    Run(Args),
    Help,
}

#[derive(Debug, PartialEq, Eq)]
struct Args {
    db_url: String,
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- [ui] [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {DB_URL_ENV}   database url, overridden by --db");
    eprintln!("  RUST_LOG         log filter (default: info)");
}

impl Args {
    /// Parse everything after the program name. `env_db_url` is the value of
    /// `GYMDESK_DB_URL`, if set.
    fn parse(
        argv: impl IntoIterator<Item = String>,
        env_db_url: Option<String>,
    ) -> Result<Parsed, ArgsError> {
        let mut args = argv.into_iter().peekable();
        match args.peek().map(String::as_str) {
            Some("ui") => {
                args.next();
            }
            Some(first) if !first.starts_with('-') => {
                return Err(ArgsError::UnknownCommand(first.to_string()));
            }
            _ => {}
        }

        let mut db_url = env_db_url
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.to_string(), normalize_sqlite_url);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    db_url = normalize_sqlite_url(value);
                }
                "--help" | "-h" => return Ok(Parsed::Help),
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        Ok(Parsed::Run(Self { db_url }))
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| std::path::PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let parsed = Args::parse(std::env::args().skip(1), std::env::var(DB_URL_ENV).ok())
        .inspect_err(|err| {
            eprintln!("{err}");
            print_usage();
        })?;
    let args = match parsed {
        Parsed::Run(args) => args,
        Parsed::Help => {
            print_usage();
            return Ok(());
        }
    };

    init_tracing();

    // Open + migrate SQLite before the window exists so failures reach the terminal.
    prepare_sqlite_file(&args.db_url)?;
    let services = AppServices::new_sqlite(&args.db_url).await?;
    info!(db_url = %args.db_url, "storage ready");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
    let context = build_app_context(&app);

    // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("GymDesk")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
