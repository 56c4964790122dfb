use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tracing::info;

use nlitopic::classify::aggregator::MappingAggregator;
use nlitopic::classify::report::ReportOptions;
use nlitopic::classify::scorer::NliTopicScorer;
use nlitopic::classify::traits::TopicClassifier;
use nlitopic::config::Config;
use nlitopic::nli::onnx::OnnxNliModel;
use nlitopic::nli::traits::NliModel;
use nlitopic::output::{self, ClassifiedText};
use nlitopic::{domains, quiet, vocab};

/// nlitopic: zero-shot topic classification with an NLI model.
///
/// Each input line is paired with one hypothesis per topic ("The domain of
/// the sentence is about ...") and ranked by entailment probability.
#[derive(Parser)]
#[command(name = "nlitopic", version, about)]
struct Cli {
    /// Suppress model setup and download output
    #[arg(long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct RunArgs {
    /// Input file with one text per line (default: stdin)
    input: Option<PathBuf>,

    /// Texts per model call (default: NLITOPIC_BATCH_SIZE or 1)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Number of topics to report per text (default: all)
    #[arg(long)]
    top_k: Option<usize>,

    /// Print JSON lines instead of colored text
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Download the configured ONNX NLI model
    DownloadModel,

    /// Rank a flat topic vocabulary for each input line
    Classify {
        /// Topic file, one topic per line (underscores read as spaces)
        #[arg(long)]
        topics: PathBuf,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Rank coarse topics through a fine -> coarse mapping
    Map {
        /// JSON object mapping each fine topic to its coarse topic
        #[arg(long)]
        mapping: PathBuf,

        /// Coarse topic file (default: the mapping's values, first-seen order)
        #[arg(long)]
        coarse: Option<PathBuf>,

        #[command(flatten)]
        run: RunArgs,
    },

    /// Rank WordNet Domains for each input line
    Domains {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("nlitopic=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if cli.quiet {
        config.verbose = false;
    }

    match cli.command {
        Commands::DownloadModel => {
            if config.verbose {
                eprintln!("Downloading {}...", config.model_id);
                eprintln!("  Destination: {}", config.model_dir.display());
            }

            quiet::scoped_async(
                config.verbose,
                nlitopic::nli::download::download_model(
                    &config.model_id,
                    &config.model_dir,
                    config.verbose,
                ),
            )
            .await?;

            println!("{}", "Model downloaded successfully.".bold());
            println!("You can now run `nlitopic domains` or `nlitopic classify --topics FILE`.");
        }

        Commands::Classify { topics, run } => {
            let topics = vocab::read_topics(&topics)?;
            let model = load_model(&config)?;
            let scorer = NliTopicScorer::new(
                model,
                topics,
                config.query_phrase.clone(),
                config.entailment_position,
            )?;
            info!(topics = scorer.topics().len(), "Using flat topic vocabulary");
            run_classifier(Arc::new(scorer), &config, run).await?;
        }

        Commands::Map {
            mapping,
            coarse,
            run,
        } => {
            let mapping = vocab::read_mapping(&mapping)?;
            let coarse = match coarse {
                Some(path) => vocab::read_topics(&path)?,
                None => mapping.coarse_topics(),
            };
            let model = load_model(&config)?;
            let aggregator = MappingAggregator::new(
                model,
                coarse,
                mapping,
                config.query_phrase.clone(),
                config.entailment_position,
            )?;
            info!(
                fine = aggregator.mapping().len(),
                coarse = aggregator.topics().len(),
                "Using topic mapping"
            );
            run_classifier(Arc::new(aggregator), &config, run).await?;
        }

        Commands::Domains { run } => {
            let model = load_model(&config)?;
            let classifier = domains::wndomains_classifier(model)?;
            info!("Using WordNet Domains taxonomy");
            run_classifier(Arc::new(classifier), &config, run).await?;
        }
    }

    Ok(())
}

/// Load the ONNX model, silencing setup output unless verbose.
fn load_model(config: &Config) -> Result<Arc<dyn NliModel>> {
    config.require_model()?;
    let model = quiet::scoped(config.verbose, || {
        OnnxNliModel::load(&config.model_dir, &config.device)
    })
    .context("Loading NLI model")?;
    info!(model = %config.model_id, "Loaded NLI model");
    Ok(Arc::new(model))
}

/// Classify input lines off the async runtime, printing each window of
/// `batch_size` texts as soon as it is ranked.
async fn run_classifier(
    classifier: Arc<dyn TopicClassifier>,
    config: &Config,
    args: RunArgs,
) -> Result<()> {
    let batch_size = args.batch_size.unwrap_or(config.batch_size);
    let options = ReportOptions {
        top_k: args.top_k.unwrap_or(classifier.topics().len()),
        return_labels: true,
        return_confidences: true,
    };
    // Bad --top-k or batch size should fail before the first model call.
    options.validate(classifier.topics().len())?;
    if batch_size == 0 {
        anyhow::bail!(nlitopic::error::ConfigError::ZeroBatchSize);
    }

    let reader = vocab::open_inputs(args.input.as_deref())?;
    info!(batch_size, "Classifying");

    let verbose = config.verbose;
    let json = args.json;
    let classified = tokio::task::spawn_blocking(move || {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("  {spinner} {pos} texts classified ({elapsed})")
                .context("Invalid progress bar template")?,
        );
        if !verbose {
            pb.set_draw_target(ProgressDrawTarget::hidden());
        }

        let mut lines = vocab::input_lines(reader);
        let mut window = Vec::with_capacity(batch_size);
        let mut classified = 0usize;
        loop {
            for line in lines.by_ref().take(batch_size) {
                window.push(line.context("Failed to read input line")?);
            }
            if window.is_empty() {
                break;
            }

            let rankings = classifier.predict_topics(&window, batch_size, &options)?;
            let results: Vec<ClassifiedText> = window
                .drain(..)
                .zip(rankings)
                .map(|(text, topics)| ClassifiedText { text, topics })
                .collect();
            pb.suspend(|| print_results(&results, json))?;

            classified += results.len();
            pb.inc(results.len() as u64);
        }
        pb.finish_and_clear();

        Ok::<_, anyhow::Error>(classified)
    })
    .await
    .context("spawn_blocking panicked")??;

    if classified == 0 && !json {
        output::terminal::display_no_input();
    }
    info!(texts = classified, "Classification complete");

    Ok(())
}

fn print_results(results: &[ClassifiedText], json: bool) -> Result<()> {
    if json {
        output::print_json_lines(results)
    } else {
        output::terminal::display_results(results);
        Ok(())
    }
}
