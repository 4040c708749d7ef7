//! Terminal vocabulary drills.
//!
//! Loads a deck from the card webhook (or a local deck file) and runs a
//! flip-card review or a quiz in the terminal. Outcomes are pushed back to
//! the webhook in batches while the session runs.

mod drill;
mod speech;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use drillkit_engine::shuffle::{SeededShuffler, Shuffler, ThreadShuffler};
use drillkit_engine::{
    AnswerMatcher, Deck, DrillClient, Engine, Error, FlushQueue, Mode, Session, SyncPolicy,
};
use tracing::{info, warn};

use crate::drill::{BatchSink, Console, Offline, Outcome};
use crate::speech::{CommandSpeaker, SilentSpeaker, Speaker};

/// Deck used when neither a webhook URL nor a deck file is given.
const BUNDLED_DECK: &str = include_str!("../decks/spanish.toml");

// ============================================================================
// CLI Arguments
// ============================================================================

/// Vocabulary drills in the terminal.
#[derive(Parser, Debug)]
#[command(name = "drillkit")]
#[command(version, about, long_about = None)]
struct Args {
    /// Card webhook URL (mastery updates go to <URL>/update)
    #[arg(long, env = "DRILLKIT_URL")]
    url: Option<String>,

    /// Username for HTTP Basic auth
    #[arg(long, env = "DRILLKIT_USERNAME")]
    username: Option<String>,

    /// Password for HTTP Basic auth
    #[arg(long, env = "DRILLKIT_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Read cards from a local TOML or JSON file instead (disables sync)
    #[arg(long)]
    deck: Option<PathBuf>,

    /// Enable verbose logging (use multiple times for more verbosity)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every word with its mastery state
    List {
        /// Print the deck as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Flip-card review: mark each word as known or still learning
    Review(SessionArgs),
    /// Quiz: multiple-choice, cloze or typing
    Quiz {
        /// Quiz mode
        #[arg(long, default_value = "multiple-choice")]
        mode: Mode,

        #[command(flatten)]
        session: SessionArgs,
    },
}

#[derive(clap::Args, Debug)]
struct SessionArgs {
    /// Seed for a reproducible card order and option order
    #[arg(long)]
    seed: Option<u64>,

    /// Only practice words not yet marked as known
    #[arg(long, default_value_t = false)]
    active_only: bool,

    /// Push mastery updates after this many answered cards
    #[arg(long, default_value_t = drillkit_engine::sync::DEFAULT_FLUSH_THRESHOLD)]
    sync_every: u32,

    /// Do not push leftover updates when the session completes
    #[arg(long, default_value_t = false)]
    no_final_flush: bool,

    /// Accept typed answers that differ only in accents
    #[arg(long, default_value_t = false)]
    ignore_accents: bool,

    /// Program used to pronounce words, e.g. "espeak -v es"
    #[arg(long)]
    speak_with: Option<String>,
}

// ============================================================================
// Deck source
// ============================================================================

/// Where the deck came from, and where updates go.
enum Source {
    Remote(Engine),
    Local,
}

async fn load(args: &Args) -> Result<(Deck, Source), Error> {
    if let Some(path) = &args.deck {
        if args.url.is_some() {
            warn!("Both --deck and a webhook URL given, using the deck file");
        }
        let deck = Deck::from_path(path)?;
        info!(path = %path.display(), cards = deck.len(), "Loaded deck file");
        return Ok((deck, Source::Local));
    }

    let Some(url) = &args.url else {
        info!("No webhook URL set, using the bundled deck");
        return Ok((Deck::from_toml_str(BUNDLED_DECK)?, Source::Local));
    };

    let mut builder = DrillClient::builder()
        .url(url)
        .timeout(Duration::from_secs(args.timeout_secs));
    if let Some(username) = &args.username {
        builder = builder.username(username);
    }
    if let Some(password) = &args.password {
        builder = builder.password(password);
    }

    let engine = Engine::from_client(builder.build());
    let deck = engine.load_deck().await?;
    Ok((deck, Source::Remote(engine)))
}

// ============================================================================
// Commands
// ============================================================================

fn list(deck: &Deck, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(deck.cards())?);
        return Ok(());
    }

    let stats = deck.stats();
    println!(
        "All Words ({})   Known: {}   Learning: {}",
        stats.total, stats.known, stats.learning
    );
    for card in deck {
        let mark = if card.is_known() { "+" } else { "-" };
        println!("{} {}  {}", mark, card.term, card.gloss);
        if !card.usage.is_empty() {
            println!("    \"{}\"", card.usage);
        }
    }
    Ok(())
}

async fn practice(
    mode: Mode,
    opts: &SessionArgs,
    deck: &Deck,
    source: &Source,
) -> Result<(), Box<dyn std::error::Error>> {
    let working = if opts.active_only {
        deck.active_subset()
    } else {
        deck.clone()
    };

    let speaker: Box<dyn Speaker> = match opts.speak_with.as_deref().and_then(CommandSpeaker::parse) {
        Some(speaker) => Box::new(speaker),
        None => Box::new(SilentSpeaker),
    };

    let queue = match source {
        Source::Remote(engine) => Some(engine.flush_queue()),
        Source::Local => None,
    };
    let sink: &dyn BatchSink = match &queue {
        Some(queue) => queue,
        None => &Offline,
    };

    info!(mode = %mode, cards = working.len(), seed = ?opts.seed, "Starting practice");
    let result = match opts.seed {
        Some(seed) => {
            let session = Session::with_pool(mode, &working, deck.cards(), SeededShuffler::new(seed));
            drive(session, opts, speaker.as_ref(), sink).await
        }
        None => {
            let session = Session::with_pool(mode, &working, deck.cards(), ThreadShuffler);
            drive(session, opts, speaker.as_ref(), sink).await
        }
    };

    if let Outcome::Left(summary) = settle(result, queue).await? {
        info!(score = summary.score, total = summary.total, "Session left early");
    }
    Ok(())
}

/// Drain the flush queue, then hand back the drill result.
///
/// Queued batches are delivered even when the drill ended with an error.
async fn settle<T>(result: std::io::Result<T>, queue: Option<FlushQueue>) -> std::io::Result<T> {
    if let Some(queue) = queue {
        let stats = queue.shutdown().await;
        info!(
            sent = stats.sent,
            failed = stats.failed,
            coalesced = stats.coalesced,
            "Mastery sync finished"
        );
        if stats.failed > 0 {
            eprintln!("Warning: {} progress update(s) could not be saved.", stats.failed);
        }
    }
    result
}

async fn drive<S: Shuffler>(
    session: Session<S>,
    opts: &SessionArgs,
    speaker: &dyn Speaker,
    sink: &dyn BatchSink,
) -> std::io::Result<Outcome> {
    let policy = SyncPolicy {
        threshold: opts.sync_every,
        flush_on_complete: !opts.no_final_flush,
    };
    let matcher = AnswerMatcher {
        ignore_accents: opts.ignore_accents,
    };
    let mut session = session.with_policy(policy).with_matcher(matcher);

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut console = Console::new(stdin, std::io::stdout());
    drill::run(&mut session, &mut console, speaker, sink).await
}

// ============================================================================
// Main
// ============================================================================

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

    let (deck, source) = match load(&args).await {
        Ok(loaded) => loaded,
        Err(Error::Load(e)) => {
            eprintln!("Could not load the deck: {}. Check the URL and try again.", e);
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    match &args.command {
        Command::List { json } => list(&deck, *json)?,
        Command::Review(opts) => practice(Mode::Review, opts, &deck, &source).await?,
        Command::Quiz { mode, session } => practice(*mode, session, &deck, &source).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use drillkit_engine::{CardUpdate, FlushBatch, FlushReason, MasterySink};
    use std::sync::Arc;

    #[test]
    fn test_bundled_deck_parses() {
        let deck = Deck::from_toml_str(BUNDLED_DECK).unwrap();
        assert_eq!(deck.len(), 12);
        assert_eq!(deck.stats().unseen, 12);
        assert_eq!(deck.get(8).unwrap().term, "¿Cuánto cuesta?");
    }

    #[test]
    fn test_parse_quiz_args() {
        let args = Args::try_parse_from([
            "drillkit",
            "--deck",
            "words.toml",
            "quiz",
            "--mode",
            "cloze",
            "--seed",
            "7",
            "--sync-every",
            "5",
            "--ignore-accents",
        ])
        .unwrap();

        assert_eq!(args.deck, Some(PathBuf::from("words.toml")));
        let Command::Quiz { mode, session } = args.command else {
            panic!("expected quiz");
        };
        assert_eq!(mode, Mode::Cloze);
        assert_eq!(session.seed, Some(7));
        assert_eq!(session.sync_every, 5);
        assert!(session.ignore_accents);
        assert!(!session.no_final_flush);
    }

    #[test]
    fn test_review_defaults() {
        let args = Args::try_parse_from(["drillkit", "review"]).unwrap();
        let Command::Review(opts) = args.command else {
            panic!("expected review");
        };
        assert_eq!(opts.sync_every, 10);
        assert!(!opts.active_only);
        assert!(opts.speak_with.is_none());
    }

    #[test]
    fn test_unknown_mode_rejected() {
        assert!(Args::try_parse_from(["drillkit", "quiz", "--mode", "spelling"]).is_err());
    }

    #[derive(Default)]
    struct Recorder {
        pushes: std::sync::Mutex<Vec<Vec<CardUpdate>>>,
    }

    impl MasterySink for Recorder {
        async fn push(&self, updates: &[CardUpdate]) -> drillkit_engine::Result<()> {
            self.pushes.lock().unwrap().push(updates.to_vec());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_settle_delivers_queue_before_error() {
        let sink = Arc::new(Recorder::default());
        let queue = FlushQueue::spawn(Arc::clone(&sink));
        queue.send(FlushBatch::new(
            FlushReason::Threshold,
            vec![CardUpdate::known(3, true)],
        ));

        let broken: std::io::Result<Outcome> =
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed"));
        let err = settle(broken, Some(queue)).await.unwrap_err();

        assert_eq!(err.kind(), std::io::ErrorKind::BrokenPipe);
        assert_eq!(
            *sink.pushes.lock().unwrap(),
            vec![vec![CardUpdate::known(3, true)]]
        );
    }

    #[tokio::test]
    async fn test_settle_without_queue() {
        assert_eq!(settle(Ok(7), None).await.unwrap(), 7);
    }

    #[tokio::test]
    async fn test_load_bundled_deck_without_url() {
        let args = Args {
            url: None,
            username: None,
            password: None,
            timeout_secs: 30,
            deck: None,
            verbose: 0,
            command: Command::List { json: false },
        };
        let (deck, source) = load(&args).await.unwrap();
        assert_eq!(deck.len(), 12);
        assert!(matches!(source, Source::Local));
    }
}
