use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use ragscore::{
    build_evaluator, init_tracing, run_evaluation_pipeline, OllamaGenerator, RagScoreConfig,
    SampleSet,
};
use tracing::{info, warn};

/// Score RAG answers for hallucination, relevance and completeness.
#[derive(Parser, Debug)]
#[command(name = "ragscore", version, about, long_about = None)]
struct Cli {
    /// YAML configuration file; built-in defaults when omitted
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the last user query and the first k context texts of a sample
    ExtractInfo {
        #[arg(long)]
        conversation: usize,
        #[arg(long, default_value_t = 5)]
        k: usize,
    },
    /// Score an answer you already have
    Evaluate {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        /// Retrieved chunk; repeat for several
        #[arg(long = "context")]
        contexts: Vec<String>,
    },
    /// Generate an answer with Ollama for a sample and score it
    Run {
        #[arg(long)]
        conversation: usize,
        #[arg(long, default_value_t = 5)]
        k: usize,
        #[arg(long, default_value = OllamaGenerator::DEFAULT_BASE_URL)]
        ollama_url: String,
        #[arg(long, default_value = OllamaGenerator::DEFAULT_MODEL)]
        model: String,
        #[arg(long, default_value_t = 120)]
        timeout_secs: u64,
        #[arg(short, long, default_value = "pipeline_results.json")]
        output: PathBuf,
    },
}

fn abridge(text: &str) -> String {
    text.chars().take(50).collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let mut cfg = match &cli.config {
        Some(path) => RagScoreConfig::from_file(path)?,
        None => RagScoreConfig::default(),
    };
    cfg.apply_env_overrides()?;
    if let Err(err) = init_tracing(&cfg.logging) {
        eprintln!("logging disabled: {err}");
    }

    match cli.command {
        Commands::ExtractInfo { conversation, k } => {
            let samples = SampleSet::discover(&cfg.samples_dir)?;
            let sample = samples.load(conversation)?;
            let query = sample.last_user_message()?;
            let chunks = sample.context_texts(k);

            println!("Conversation {conversation}, last user message (abridged):");
            println!("- '{}'...", abridge(query));
            println!("Context docs (retrieved {}):", chunks.len());
            for (i, text) in chunks.iter().enumerate() {
                println!("{}. {}...", i + 1, abridge(text));
            }
        }
        Commands::Evaluate {
            question,
            answer,
            contexts,
        } => {
            let evaluator = build_evaluator(&cfg)?;
            let record = evaluator.evaluate(&question, &answer, &contexts).await?;
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        Commands::Run {
            conversation,
            k,
            ollama_url,
            model,
            timeout_secs,
            output,
        } => {
            if cfg.semantic.mode == "fast" {
                warn!(
                    "scoring with the hashed stub embedder; \
                     set semantic.mode to \"api\" for model embeddings"
                );
            }
            let samples = SampleSet::discover(&cfg.samples_dir)?;
            let evaluator = build_evaluator(&cfg)?;
            let generator =
                OllamaGenerator::new(&ollama_url, model, Duration::from_secs(timeout_secs))?;
            let pricing = cfg.pricing.to_pricing();
            info!(model = generator.model(), url = %ollama_url, "generator_ready");

            let report = run_evaluation_pipeline(
                &samples,
                conversation,
                k,
                &generator,
                &evaluator,
                &pricing,
            )
            .await?;
            report.write_json(&output)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            println!("Results saved to '{}'", output.display());
        }
    }

    Ok(())
}
