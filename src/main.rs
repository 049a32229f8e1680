//! Fathom to Linear - turn Fathom meeting summary emails into Linear issues.
//!
//! Reads a saved mail page, pulls the "Action Items" and "Next Steps" out
//! of the Fathom summary, and drafts a prefilled Linear issue from the
//! (optionally edited) notes.
//!
//!   fathom-linear extract mail.html               # Show extracted notes
//!   fathom-linear extract mail.html -f html > n.html
//!   fathom-linear draft n.html -e mail.html --team ENG --open-url

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::path::Path;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    compose_issue, extract, format_draft, format_entries_table, format_preferences_table,
    format_result_json, format_result_markdown, format_summary, format_teams_table,
    html_to_markdown, issue_url, page_metadata, process_result, IssueRequest, OutputFormat,
};
use cli::{Cli, Commands, ConfigAction, PrefsAction};
use domain::{AppConfig, AppError, Document, ExtractionResult, Priority};
use infrastructure::preferences::TEAM_KEY;
use infrastructure::{
    config_file_path, ensure_config_exists, load_config, load_document, PreferenceStore,
    SqlitePreferences,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| AppError::Config { message: e })?;
    let config = load_config()?;

    match cli.command {
        Commands::Extract {
            file,
            selection,
            no_wait,
        } => {
            cmd_extract(&file, selection.as_deref(), !no_wait, format, &config).await?;
        }
        Commands::Convert { file } => {
            cmd_convert(&file, &config).await?;
        }
        Commands::Draft {
            file,
            email,
            title,
            team,
            assignee,
            priority,
            open_url,
        } => {
            let request = IssueRequest {
                title: title.unwrap_or_default(),
                content_html: String::new(),
                team,
                assignee,
                priority,
            };
            cmd_draft(&file, email.as_deref(), request, open_url, format, &config).await?;
        }
        Commands::Teams => {
            cmd_teams(&config)?;
        }
        Commands::Prefs { action } => {
            cmd_prefs(action, &config)?;
        }
        Commands::Config { action } => {
            cmd_config(action.unwrap_or(ConfigAction::Show), &config)?;
        }
    }

    Ok(())
}

/// Loads the page and runs extraction on it.
async fn extract_page(
    path: &Path,
    selection: Option<&str>,
    wait: bool,
    config: &AppConfig,
) -> domain::Result<ExtractionResult> {
    let html = load_document(path, &config.loader, wait).await?;
    let document = Document::parse(&html);
    if !document.has_main_pane() {
        tracing::debug!("Page has no main pane, extracting anyway");
    }
    process_result(extract(&document, selection))
}

/// Extract notes command.
async fn cmd_extract(
    path: &Path,
    selection: Option<&str>,
    wait: bool,
    format: OutputFormat,
    config: &AppConfig,
) -> domain::Result<()> {
    let result = extract_page(path, selection, wait, config).await?;

    let output = match format {
        OutputFormat::Markdown => format_result_markdown(&result),
        OutputFormat::Html => result.html.clone().unwrap_or_default(),
        OutputFormat::Json => format_result_json(&result).map_err(AppError::json)?,
        OutputFormat::Table => {
            format!("{}\n\n{}", format_summary(&result), format_entries_table(&result))
        }
    };

    println!("{output}");
    Ok(())
}

/// Convert edited HTML command.
async fn cmd_convert(path: &Path, config: &AppConfig) -> domain::Result<()> {
    let html = load_document(path, &config.loader, false).await?;
    println!("{}", html_to_markdown(&html));
    Ok(())
}

/// Compose issue command.
async fn cmd_draft(
    path: &Path,
    email: Option<&Path>,
    mut request: IssueRequest,
    open_url: bool,
    format: OutputFormat,
    config: &AppConfig,
) -> domain::Result<()> {
    request.content_html = load_document(path, &config.loader, false).await?;

    let metadata = match email {
        Some(email) => {
            let html = load_document(email, &config.loader, false).await?;
            Some(page_metadata(&Document::parse(&html)))
        }
        None => None,
    };
    if request.title.trim().is_empty() {
        if let Some(title) = metadata
            .as_ref()
            .and_then(|m| m.fathom_title.as_ref().or(m.subject.as_ref()))
        {
            request.title.clone_from(title);
        }
    }

    let prefs = SqlitePreferences::open(&config.preferences_db_path())?;
    let draft = compose_issue(&request, metadata.as_ref(), &prefs, config)?;
    let url = issue_url(&config.linear.base_url, &draft)?;

    match format {
        OutputFormat::Json => {
            let payload = serde_json::json!({ "issue": draft, "url": url });
            println!(
                "{}",
                serde_json::to_string_pretty(&payload).map_err(AppError::json)?
            );
        }
        _ => println!("{}", format_draft(&draft, &url)),
    }

    if open_url {
        open::that(&url).map_err(|e| AppError::io("Failed to open browser", e))?;
        println!("{} Opened Linear in your browser", "✓".green().bold());
    }

    Ok(())
}

/// List teams command.
fn cmd_teams(config: &AppConfig) -> domain::Result<()> {
    let prefs = SqlitePreferences::open(&config.preferences_db_path())?;
    let selected = prefs.get(TEAM_KEY, "")?;
    println!("{}", format_teams_table(&config.teams, &selected));
    Ok(())
}

/// Preferences command.
fn cmd_prefs(action: Option<PrefsAction>, config: &AppConfig) -> domain::Result<()> {
    let prefs = SqlitePreferences::open(&config.preferences_db_path())?;

    match action {
        None => println!("{}", format_preferences_table(&prefs.entries()?)),
        Some(PrefsAction::Get { key }) => println!("{}", prefs.get(&key, "")?),
        Some(PrefsAction::Set { key, value }) => {
            if key == infrastructure::preferences::PRIORITY_KEY {
                value
                    .parse::<Priority>()
                    .map_err(|message| AppError::InvalidData { message })?;
            }
            prefs.put(&key, &value)?;
            println!("{} {} = {}", "✓".green().bold(), key.cyan(), value);
        }
    }

    Ok(())
}

/// Configuration command.
fn cmd_config(action: ConfigAction, config: &AppConfig) -> domain::Result<()> {
    match action {
        ConfigAction::Init => {
            if ensure_config_exists()? {
                println!(
                    "{} Created {}",
                    "✓".green().bold(),
                    config_file_path().display()
                );
            } else {
                println!("Config already exists: {}", config_file_path().display());
            }
        }
        ConfigAction::Path => println!("{}", config_file_path().display()),
        ConfigAction::Show => {
            let content = toml::to_string_pretty(config).map_err(|e| AppError::Config {
                message: format!("Failed to serialize config: {e}"),
            })?;
            println!("{content}");
        }
    }

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time())
        .with(filter)
        .init();
}
