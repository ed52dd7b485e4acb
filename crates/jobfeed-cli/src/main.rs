use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use jobfeed::{render_vacancies, Command, Config, DeleteArgs, SearchArgs};
use jobfeed_client::HeadHunterClient;
use jobfeed_core::{
    convert_all, filter_by_keywords, filter_by_salary_range, sort_by_salary_desc, top_n,
    AppConfig, AppError, JobBoard,
};
use jobfeed_store::{JsonFileStore, StorageRoot};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::parse();

    // Setup logging (stderr to keep stdout clean for listings)
    let level = if config.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: logging already initialized");
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AppError>() {
                Some(app) => error!("{}", app.user_message()),
                None => error!("{:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let app = config.app_config()?;

    match config.command {
        Command::Search(args) => search(&app, args).await,
        Command::Saved { file } => show_saved(&app, file.as_deref()),
        Command::Delete(args) => delete(&app, &args),
    }
}

/// Opens the configured store, creating the data directory on first use.
fn open_store(app: &AppConfig, file: Option<&str>) -> anyhow::Result<JsonFileStore> {
    let root = StorageRoot::init(&app.storage.data_dir).with_context(|| {
        format!(
            "Failed to prepare data directory {}",
            app.storage.data_dir.display()
        )
    })?;
    let name = file.unwrap_or(&app.storage.file_name);
    Ok(JsonFileStore::open(&root, name)?)
}

/// Fetch, convert, rank and optionally save vacancies
async fn search(app: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    let board = HeadHunterClient::new(&app.http)?;

    info!(
        "Searching {} for {:?} ({} page(s))...",
        board.name(),
        args.keyword,
        args.pages
    );
    let raws = board.fetch_vacancies(&args.keyword, args.pages).await?;

    let report = convert_all(&raws);
    if !report.is_clean() {
        warn!(
            "Skipped {} of {} listings that failed validation",
            report.rejected.len(),
            report.total()
        );
    }

    let by_keyword = filter_by_keywords(&report.vacancies, &args.filter);
    let mut filtered = filter_by_salary_range(&by_keyword, args.min_salary, args.max_salary);
    let selected = match args.top {
        Some(n) => top_n(&filtered, n.get()),
        None => {
            sort_by_salary_desc(&mut filtered);
            filtered
        }
    };

    print!("{}", render_vacancies(&selected));

    if args.save {
        let store = open_store(app, args.file.as_deref())?;
        let mut added = 0;
        for vacancy in &selected {
            if store.add_vacancy(vacancy)? {
                added += 1;
            }
        }
        info!(
            "Saved {} new vacancies to {} ({} already present)",
            added,
            store.path().display(),
            selected.len() - added
        );
    }

    Ok(())
}

/// List vacancies saved in the store
fn show_saved(app: &AppConfig, file: Option<&str>) -> anyhow::Result<()> {
    let store = open_store(app, file)?;
    let vacancies = store.vacancies()?;
    info!("Loaded {} vacancies from {}", vacancies.len(), store.path().display());
    print!("{}", render_vacancies(&vacancies));
    Ok(())
}

/// Remove saved vacancies matching the given fields
fn delete(app: &AppConfig, args: &DeleteArgs) -> anyhow::Result<()> {
    let criteria = args
        .criteria()
        .context("Nothing to match: pass --title, --url, or --all to delete everything")?;

    let store = open_store(app, args.file.as_deref())?;
    let removed = store.delete(&criteria)?;
    println!("Deleted {} vacancies from {}", removed, store.path().display());
    Ok(())
}
