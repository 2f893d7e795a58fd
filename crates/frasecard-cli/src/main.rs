//! Interactive flashcard authoring.
//!
//! Reads commands from standard input, drives one card session and exports
//! the committed cards as an Anki deck. Logs go to stderr.

mod command;

use std::io::Write;
use std::path::PathBuf;

use clap::Parser;
use frasecard_engine::{
    CardDraft, CardSessionController, Config, Credentials, DeckExporter, ImageProvider,
    LinguisticAnnotator, unique_output_path,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

use command::{Command, HELP, ImageChoice};

// ============================================================================
// CLI Arguments
// ============================================================================

/// Turn sentences into fill-in-the-blank and vocabulary flashcards.
#[derive(Parser, Debug)]
#[command(name = "frasecard")]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file (defaults to ./frasecard.toml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for exports without an explicit file name
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

// ============================================================================
// Command loop
// ============================================================================

/// Outcome of one command.
enum Flow {
    Continue,
    Quit,
}

struct Shell<A, P> {
    session: CardSessionController<A, P>,
    exporter: DeckExporter,
    output_dir: PathBuf,
}

impl<A, P> Shell<A, P>
where
    A: LinguisticAnnotator,
    P: ImageProvider,
{
    async fn run(&mut self, command: Command) -> frasecard_engine::Result<Flow> {
        match command {
            Command::Sentence(text) => {
                self.session.set_sentence(&text)?;
                self.print_tokens();
            }
            Command::Tokens => self.print_tokens(),
            Command::Blank(index) => {
                self.session.start_blank(index).await?;
                self.print_draft();
            }
            Command::Define(index) => {
                self.session.start_definition(index).await?;
                self.print_draft();
            }
            Command::Pronounce => {
                self.session.lookup_pronunciation().await?;
                self.print_draft();
            }
            Command::Search(query) => {
                self.session.search_images(&query).await?;
                self.print_candidates();
            }
            Command::Image(ImageChoice::Candidate(n)) => {
                let url = self.session.select_candidate(n - 1)?;
                println!("Image: {}", url);
            }
            Command::Image(ImageChoice::Url(url)) => {
                self.session.select_image(url.as_str())?;
                println!("Image: {}", url);
            }
            Command::UploadImage(path) => {
                let stored = self.session.upload_image(&path)?;
                println!("Image: {}", stored.display());
            }
            Command::Audio(path) => {
                let stored = self.session.upload_audio(&path)?;
                println!("Audio: {}", stored.display());
            }
            Command::Edit(field, value) => {
                self.session.edit_field(field, &value)?;
                self.print_draft();
            }
            Command::Show => {
                self.print_draft();
                self.print_candidates();
            }
            Command::Commit => {
                let card = self.session.commit()?;
                println!("Added: {}", card.card().headline());
                println!("{} card(s) in deck", self.session.cards().len());
            }
            Command::Discard => {
                self.session.discard();
                println!("Discarded");
            }
            Command::Cards => self.print_cards(),
            Command::Remove(n) => {
                let removed = self.session.remove_committed(n - 1)?;
                println!("Removed: {}", removed.card().headline());
            }
            Command::Export(file) => {
                let path = file.unwrap_or_else(|| {
                    unique_output_path(&self.output_dir, "exported_deck", "apkg")
                });
                let summary = self.exporter.export(self.session.cards(), &path)?;
                println!(
                    "Exported {} card(s) and {} media file(s) to {}",
                    summary.notes,
                    summary.media_files,
                    summary.path.display()
                );
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    fn print_tokens(&self) {
        let tokens = self.session.session().tokens();
        if tokens.is_empty() {
            println!("No sentence. Use: sentence <text>");
            return;
        }
        let line: Vec<String> = tokens
            .iter()
            .map(|t| format!("[{}] {}", t.index, t.text))
            .collect();
        println!("{}", line.join("  "));
    }

    fn print_draft(&self) {
        let Some(draft) = self.session.session().draft() else {
            println!("No card in progress");
            return;
        };
        let kind = match draft {
            CardDraft::Blank(_) => "Fill-in-the-blank",
            CardDraft::Definition(_) => "Vocabulary",
        };
        println!("{}: {}", kind, draft.headline());
        match serde_json::to_string_pretty(draft) {
            Ok(json) => println!("{}", json),
            Err(e) => debug!(error = %e, "Could not render draft"),
        }
    }

    fn print_candidates(&self) {
        let candidates = self.session.session().candidates();
        if candidates.urls.is_empty() {
            return;
        }
        println!("Images for \"{}\":", candidates.query);
        for (i, url) in candidates.urls.iter().enumerate() {
            println!("  {}. {}", i + 1, url);
        }
    }

    fn print_cards(&self) {
        let cards = self.session.cards();
        if cards.is_empty() {
            println!("No cards yet");
            return;
        }
        for (i, card) in cards.iter().enumerate() {
            println!("  {}. [{}] {}", i + 1, card.card().kind(), card.card().headline());
        }
    }
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing
    let log_level = match args.verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(args.config.as_deref())?;
    let credentials = Credentials::from_env()?;
    info!(
        model = %config.llm.model,
        deck = %config.deck.name,
        media_dir = %config.media.dir.display(),
        "Starting frasecard"
    );

    let mut shell = Shell {
        session: CardSessionController::new(
            config.llm_client(&credentials),
            config.image_provider(&credentials),
        )
        .with_media_store(config.media_store()),
        exporter: config.deck_exporter(),
        output_dir: args.output_dir,
    };

    println!("Type 'help' for commands.");
    prompt();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            prompt();
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => match shell.run(command).await {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) if e.is_retryable() => eprintln!("Error: {} (try again)", e),
                Err(e) => eprintln!("Error: {}", e),
            },
            Err(message) => eprintln!("{}", message),
        }
        prompt();
    }

    info!(cards = shell.session.cards().len(), "Session ended");
    Ok(())
}
