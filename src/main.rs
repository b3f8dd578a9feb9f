use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};

use redbook_extract::error::ScrapeError;
use redbook_extract::extract::Scraper;
use redbook_extract::persist::{save_images, SaveConfig};
use redbook_extract::resolve::resolve;
use redbook_extract::server::{self, AppState};

// The API call site keeps directory names shorter than the CLI one.
const CLI_TITLE_LIMIT: usize = 50;
const API_TITLE_LIMIT: usize = 30;

#[derive(Parser)]
#[command(name = "redbook-extract", version, about = "Extract Redbook note content")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Extract a note from share text or a direct URL (default)
    Extract {
        /// Share text or note URL; read from stdin when omitted
        text: Option<String>,
        /// Do not download images or write an output directory
        #[arg(long)]
        no_save: bool,
        /// Directory to create the output directory in
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,
    },
    /// Run the HTTP API server
    Serve {
        /// Bind address
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
        /// Bind port
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Extract {
        text: None,
        no_save: false,
        out_dir: PathBuf::from("."),
    });

    let result = match command {
        Command::Extract {
            text,
            no_save,
            out_dir,
        } => run_extract(text, no_save, out_dir).await,
        Command::Serve { host, port } => run_serve(&host, port).await,
    };

    if let Err(e) = result {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

async fn run_extract(
    text: Option<String>,
    no_save: bool,
    out_dir: PathBuf,
) -> Result<(), ScrapeError> {
    let raw = match text {
        Some(text) => text,
        None => {
            println!("Paste the share text or note link:");
            read_stdin()?
        }
    };

    let url = resolve(raw.trim()).ok_or(ScrapeError::NoLink)?;
    println!("Found link: {}", url);

    let scraper = Scraper::new()?;
    let note = scraper.fetch_note(&url).await?;

    println!("\nTitle: {}", note.display_title());
    println!("Body: {}", note.display_content());
    println!("Images: {}", note.images.len());

    if no_save {
        return Ok(());
    }

    let config = SaveConfig {
        base_dir: out_dir,
        title_limit: CLI_TITLE_LIMIT,
    };
    let saved = save_images(&scraper, &note, &config).await?;
    let downloaded = saved.note.local_images.as_deref().unwrap_or(&[]).len();

    println!("\nDownloaded {}/{} images", downloaded, note.images.len());
    println!("Content saved to: {}", saved.dir.display());
    Ok(())
}

async fn run_serve(host: &str, port: u16) -> Result<(), ScrapeError> {
    let state = Arc::new(AppState {
        scraper: Scraper::new()?,
        save: SaveConfig {
            base_dir: PathBuf::from("."),
            title_limit: API_TITLE_LIMIT,
        },
    });

    server::run(host, port, state)
        .await
        .map_err(|e| ScrapeError::Storage(e.to_string()))
}

fn read_stdin() -> Result<String, ScrapeError> {
    let mut buf = String::new();
    std::io::stdin()
        .read_line(&mut buf)
        .map_err(|e| ScrapeError::Storage(format!("reading stdin: {}", e)))?;
    Ok(buf)
}
