mod db;
mod error;
mod ocr;
mod parser;
mod review;
mod settings;

use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use ocr::fragments::JsonFragments;
use ocr::tesseract::TesseractRecognizer;
use ocr::{RecognitionLevel, RecognitionOptions, TextRecognizer};
use parser::candidate::JokeCandidate;
use review::prompt::{truncate, Outcome};
use review::ReviewSession;

#[derive(Parser)]
#[command(name = "jokescan", about = "Turn photographed joke-book pages into reviewable jokes")]
struct Cli {
    /// SQLite database path (overrides JOKESCAN_DB_PATH)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Engine {
    /// Run the tesseract binary on the image
    Tesseract,
    /// The input is a JSON array of fragments from another OCR engine
    Fragments,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize a page image and review the jokes found on it
    Scan {
        image: PathBuf,
        #[arg(short, long, value_enum, default_value = "tesseract")]
        engine: Engine,
        /// Language hint, e.g. en-US (repeatable)
        #[arg(short, long = "lang")]
        languages: Vec<String>,
        /// Faster, less thorough recognition
        #[arg(long)]
        fast: bool,
        /// Disable dictionary-based language correction
        #[arg(long)]
        no_correction: bool,
        /// Save every joke found without reviewing
        #[arg(short, long)]
        yes: bool,
        /// Print saved jokes as JSON instead of storing them
        #[arg(long)]
        json: bool,
    },
    /// Split already-recognized text (a file, or - for stdin) into jokes
    Parse {
        file: PathBuf,
        #[arg(short, long)]
        yes: bool,
        #[arg(long)]
        json: bool,
    },
    /// Show stored jokes
    List {
        /// Max rows to display
        #[arg(short = 'n', long, default_value = "50")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut settings = settings::load()?;
    if let Some(db) = cli.db {
        settings.db_path = db;
    }

    match cli.command {
        Commands::Scan {
            image,
            engine,
            languages,
            fast,
            no_correction,
            yes,
            json,
        } => {
            let mut options = settings.recognition_options();
            if !languages.is_empty() {
                options.languages = languages;
            }
            if fast {
                options.level = RecognitionLevel::Fast;
            }
            if no_correction {
                options.language_correction = false;
            }

            let recognizer: Box<dyn TextRecognizer> = match engine {
                Engine::Tesseract => Box::new(TesseractRecognizer::new(&settings.tesseract_bin)),
                Engine::Fragments => Box::new(JsonFragments),
            };

            let candidates = scan(recognizer.as_ref(), &image, &options).await?;
            review_and_save(&settings.db_path, candidates, &image.display().to_string(), yes, json)
        }
        Commands::Parse { file, yes, json } => {
            let from_stdin = file.as_os_str() == "-";
            if from_stdin && !yes {
                bail!("Reading text from stdin needs --yes, the review prompt reads stdin too");
            }
            let text = if from_stdin {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            } else {
                std::fs::read_to_string(&file).with_context(|| format!("Failed to read {:?}", file))?
            };

            let candidates = parser::process_text(&text)?;
            review_and_save(&settings.db_path, candidates, &file.display().to_string(), yes, json)
        }
        Commands::List { limit } => {
            let conn = db::connect(&settings.db_path)?;
            db::init_schema(&conn)?;
            let rows = db::fetch_jokes(&conn, limit)?;
            if rows.is_empty() {
                println!("No jokes saved yet.");
                return Ok(());
            }

            println!(
                "{:<8} | {:<16} | {:<30} | {:<36} | {:<16}",
                "Id", "Added", "Title", "Body", "From"
            );
            println!("{}", "-".repeat(120));
            for r in &rows {
                let id: String = r.id.chars().take(8).collect();
                let added = r.created_at.format("%Y-%m-%d %H:%M").to_string();
                let body = r.body.replace('\n', " ");
                let from = r.source.as_deref().and_then(|s| Path::new(s).file_name());
                let from = from.map(|f| f.to_string_lossy().to_string()).unwrap_or_else(|| "-".into());
                println!(
                    "{:<8} | {:<16} | {:<30} | {:<36} | {:<16}",
                    id,
                    added,
                    truncate(&r.title, 27),
                    truncate(&body, 33),
                    truncate(&from, 13)
                );
            }

            println!("\n{} of {} jokes", rows.len(), db::count_jokes(&conn)?);
            Ok(())
        }
    }
}

/// Recognize one page and turn it into candidates. Ctrl-C while the engine
/// runs cancels the request.
async fn scan(
    recognizer: &dyn TextRecognizer,
    image: &Path,
    options: &RecognitionOptions,
) -> Result<Vec<JokeCandidate>> {
    let bytes = tokio::fs::read(image)
        .await
        .with_context(|| format!("Failed to read {:?}", image))?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?);
    spinner.set_message("Extracting text...");
    spinner.enable_steady_tick(Duration::from_millis(100));

    let t0 = Instant::now();
    let cancel = async {
        if tokio::signal::ctrl_c().await.is_err() {
            std::future::pending::<()>().await;
        }
    };
    let result = ocr::recognize_until(recognizer, &bytes, options, cancel).await;
    spinner.finish_and_clear();
    info!("Recognition took {:.1}s", t0.elapsed().as_secs_f64());

    let fragments = result?;
    Ok(parser::process_fragments(&fragments)?)
}

fn review_and_save(
    db_path: &Path,
    candidates: Vec<JokeCandidate>,
    source: &str,
    yes: bool,
    json: bool,
) -> Result<()> {
    let mut session = ReviewSession::new(candidates);

    let committed = if yes {
        session.commit()?
    } else {
        // Keep stdout clean for the JSON document.
        let mut out: Box<dyn Write> = if json {
            Box::new(std::io::stderr())
        } else {
            Box::new(std::io::stdout())
        };
        let mut input = std::io::stdin().lock();
        match review::prompt::run(&mut session, &mut input, &mut out)? {
            Outcome::Committed(jokes) => jokes,
            Outcome::Discarded => {
                eprintln!("Cancelled, nothing saved.");
                return Ok(());
            }
        }
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&committed)?);
        return Ok(());
    }

    let conn = db::connect(db_path)?;
    db::init_schema(&conn)?;
    let saved = db::save_jokes(&conn, &committed, Some(source))?;
    println!(
        "Successfully added {} joke{} to your library.",
        saved,
        if saved == 1 { "" } else { "s" }
    );
    Ok(())
}
