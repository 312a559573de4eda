use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use lexiclass_cache::{DefinitionStore, JsonDefinitionStore, JsonUnknownStore, UnknownStore};
use lexiclass_text::LexiconTagger;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use lexiclass::{HttpDictionary, Pipeline, Resolver, Settings, default_output_dir};

#[derive(Debug, Parser)]
#[command(
    name = "lexiclass",
    version,
    about = "Sort the words of text files by part of speech and look them up"
)]
struct Cli {
    /// Directory of .txt files; defaults to `input.inputDirectory` from the config.
    input: Option<PathBuf>,
    #[arg(long, env = "LEXICLASS_CONFIG", default_value = "lexiclass.yml")]
    config: PathBuf,
    /// Where the word lists go; defaults to `<input name>_ewClassifiers`.
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// Look up words already recorded as unknown.
    #[arg(long)]
    query_unknown: bool,
    #[arg(long)]
    max_examples: Option<usize>,
    /// Extra `word<TAB>TAG` entries for the tagger.
    #[arg(long)]
    lexicon: Option<PathBuf>,
    /// Seed for example sentence sampling.
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, env = "LEXICLASS_LOG_FILE")]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let mut settings = Settings::load_or_create(&cli.config)?;
    if cli.query_unknown {
        settings.query.query_for_unknown_words = true;
    }
    if let Some(max) = cli.max_examples {
        settings.output.max_example_sentences = max;
    }
    let input_dir = cli
        .input
        .unwrap_or_else(|| settings.input.input_directory.clone());
    let output_dir = cli
        .output_dir
        .unwrap_or_else(|| default_output_dir(&input_dir));
    info!("reading {}", input_dir.display());
    info!("writing {}", output_dir.display());
    info!(
        "caches: {} and {}",
        settings.cache.definitions_path.display(),
        settings.cache.unknown_path.display()
    );
    if settings.query.query_for_unknown_words {
        info!("re-querying known unknown words");
    }

    let tagger = match &cli.lexicon {
        Some(path) => LexiconTagger::with_lexicon_file(path)?,
        None => LexiconTagger::new(),
    };
    let client = HttpDictionary::new(&settings.dictionary, &settings.proxy)?;
    let definitions = JsonDefinitionStore::open(&settings.cache.definitions_path)?;
    let unknown = JsonUnknownStore::open(&settings.cache.unknown_path)?;
    info!(
        "loaded {} cached definitions and {} unknown words",
        definitions.len(),
        unknown.len()
    );

    let resolver = Resolver::new(client, definitions, unknown)
        .query_unknown(settings.query.query_for_unknown_words);
    let mut pipeline = Pipeline::new(tagger, resolver, settings.output.clone());
    if let Some(seed) = cli.seed {
        pipeline = pipeline.with_seed(seed);
    }

    let start = Instant::now();
    let summary = match pipeline.run(&input_dir, &output_dir).await {
        Ok(summary) => summary,
        Err(err) => {
            error!("run failed: {err}");
            return Err(err.into());
        }
    };
    info!(
        "processed {} files ({} skipped): {} known words, {} unknown, {} lookups in {} ms; output in {}",
        summary.files_processed,
        summary.files_skipped,
        summary.known_words,
        summary.unknown_words,
        summary.remote_lookups,
        start.elapsed().as_millis(),
        summary.output_dir.display()
    );
    Ok(())
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_level(true);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("open log file {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}
