//! versevault CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use versevault_core::{QuizMode, StoreError};

mod commands;

#[derive(Parser)]
#[command(
    name = "versevault",
    version,
    about = "Build a personal vault of verses and review them with quizzes"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Local SQLite database path (used when Supabase is not configured)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the verses in your vault
    Vault {
        /// Show the full text and notes for every verse
        #[arg(long)]
        expand: bool,
    },

    /// Take a quiz
    Quiz {
        #[command(subcommand)]
        mode: QuizCommand,
    },

    /// Manage the future-verses wish list
    Future {
        #[command(subcommand)]
        action: FutureCommand,
    },

    /// Add a verse to the vault
    Add {
        /// Verse reference (e.g. "John 3:16")
        #[arg(long)]
        reference: String,

        /// Verse text
        #[arg(long)]
        text: String,

        /// Explanation or personal notes
        #[arg(long)]
        explanation: Option<String>,

        /// Translation (e.g. "ESV")
        #[arg(long)]
        translation: Option<String>,
    },

    /// Edit a verse in the vault; omitted fields keep their current value
    Edit {
        /// Select the verse by reference
        #[arg(long, conflicts_with = "id", required_unless_present = "id")]
        reference: Option<String>,

        /// Select the verse by id
        #[arg(long)]
        id: Option<i64>,

        /// New reference
        #[arg(long)]
        new_reference: Option<String>,

        /// New verse text
        #[arg(long)]
        text: Option<String>,

        /// New explanation (empty string clears it)
        #[arg(long)]
        explanation: Option<String>,

        /// New translation (empty string clears it)
        #[arg(long)]
        translation: Option<String>,
    },

    /// Show which storage backend is in use
    Status,

    /// Create a starter config file
    Init,
}

#[derive(Subcommand)]
enum QuizCommand {
    /// Type each verse from memory, newest to oldest
    Memorize,
    /// Fill in missing words, verses in random order
    Blanks,
}

#[derive(Subcommand)]
enum FutureCommand {
    /// List future verses, most recent first
    List,
    /// Add a reference to the wish list
    Add {
        /// Verse reference (e.g. "John 3:16")
        reference: String,
    },
    /// Remove a future verse by id
    Remove {
        /// Future verse id as shown by `future list`
        id: i64,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("versevault=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        command => run(command, cli.config, cli.database).await,
    };

    if let Err(e) = result {
        match e.downcast_ref::<StoreError>() {
            Some(StoreError::Storage(_)) => {
                eprintln!("Error: the verse store could not complete the request.");
                eprintln!("  {e:#}");
            }
            _ => eprintln!("Error: {e:#}"),
        }
        process::exit(1);
    }
}

async fn run(
    command: Commands,
    config: Option<PathBuf>,
    database: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = commands::resolve_config(config, database)?;
    let store = versevault_store::open_store(&config).await?;
    let store = store.as_ref();

    match command {
        Commands::Vault { expand } => commands::vault::execute(store, expand).await,
        Commands::Quiz { mode } => {
            let mode = match mode {
                QuizCommand::Memorize => QuizMode::Verbatim,
                QuizCommand::Blanks => QuizMode::FillInTheBlank,
            };
            commands::quiz::execute(store, mode).await
        }
        Commands::Future { action } => match action {
            FutureCommand::List => commands::future::list(store).await,
            FutureCommand::Add { reference } => commands::future::add(store, &reference).await,
            FutureCommand::Remove { id } => commands::future::remove(store, id).await,
        },
        Commands::Add {
            reference,
            text,
            explanation,
            translation,
        } => commands::manage::add(store, reference, text, explanation, translation).await,
        Commands::Edit {
            reference,
            id,
            new_reference,
            text,
            explanation,
            translation,
        } => {
            let selector = match (id, reference) {
                (Some(id), _) => commands::manage::Selector::Id(id),
                (None, Some(reference)) => commands::manage::Selector::Reference(reference),
                (None, None) => anyhow::bail!("pass --reference or --id to pick a verse"),
            };
            let changes = commands::manage::VerseChanges {
                reference: new_reference,
                text,
                explanation,
                translation,
            };
            commands::manage::edit(store, selector, changes).await
        }
        Commands::Status => commands::status::execute(store, &config).await,
        Commands::Init => commands::init::execute(),
    }
}
