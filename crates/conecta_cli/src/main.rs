use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use conecta_ai::answer::{AnswerSettings, HybridAnswerer};
use conecta_ai::faq::{build_knowledge, BuildOptions, KnowledgeBase, KnowledgePaths};
use conecta_ai::provider::Providers;
use conecta_ai::session::Session;
use conecta_core::config::AppConfig;
use conecta_core::conversation::{ConversationLog, TurnStatus};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "conecta")]
#[command(about = "Assistente de conectividade das escolas de São Paulo")]
struct Cli {
    /// TOML configuration file. Defaults to ./conecta.toml when present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Embed the FAQ and persist the similarity index.
    BuildIndex {
        /// Re-embed every question and rebuild the index from scratch.
        #[arg(long)]
        force: bool,
    },
    /// Answer a single question.
    Ask {
        question: String,
        #[arg(long)]
        max_words: Option<usize>,
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Interactive session on stdin.
    Chat {
        #[arg(long)]
        max_words: Option<usize>,
        #[arg(long)]
        threshold: Option<f32>,
    },
    /// Check that the configured provider is reachable.
    Health,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("conecta=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init()
        .ok();
}

fn load_config(
    path: Option<&Path>,
    max_words: Option<usize>,
    threshold: Option<f32>,
) -> Result<AppConfig> {
    let mut cfg = AppConfig::load(path).context("load configuration")?;
    if let Some(n) = max_words {
        cfg.max_words = n;
    }
    if let Some(t) = threshold {
        cfg.similarity_threshold = t;
    }
    cfg.validate().context("validate command-line overrides")?;
    Ok(cfg)
}

fn print_history(log: &ConversationLog) {
    if log.is_empty() {
        println!("(sem histórico)");
        return;
    }
    for (i, turn) in log.turns().iter().enumerate() {
        let mark = match turn.status {
            TurnStatus::Answered => "",
            TurnStatus::Pending => " [pendente]",
            TurnStatus::Failed => " [erro]",
        };
        println!("{:>3}. {} {}{}", i + 1, turn.asked_at, turn.question, mark);
        println!("     {}", turn.answer);
    }
}

fn run_chat(answerer: &HybridAnswerer<'_>) -> Result<()> {
    let mut session = Session::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Pergunte sobre a conectividade das escolas. /history mostra o histórico, /quit sai.");
    loop {
        print!("> ");
        stdout.flush().context("flush stdout")?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line).context("read stdin")? == 0 {
            break;
        }
        let question = line.trim_end_matches(['\r', '\n']);
        match question.trim() {
            "" => continue,
            "/quit" => break,
            "/history" => {
                print_history(session.log());
                let stats = session.cache().stats();
                println!(
                    "cache: {} respostas, {} acertos, {} falhas",
                    stats.entries, stats.hits, stats.misses
                );
                continue;
            }
            _ => {}
        }

        match session.ask(answerer, question) {
            Ok(answer) => println!("{}", answer.text),
            Err(e) => eprintln!("erro: {e}"),
        }
    }
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    match &cli.command {
        Commands::BuildIndex { force } => {
            let cfg = load_config(cli.config.as_deref(), None, None)?;
            let providers = Providers::from_config(&cfg)?;
            let paths = KnowledgePaths::from_config(&cfg);
            let opts = BuildOptions {
                model: &cfg.embedding_model,
                force_rebuild: *force,
            };
            let (_, status) = build_knowledge(&paths, providers.embedder.as_ref(), opts)
                .with_context(|| format!("build FAQ index from {}", paths.faq.display()))?;
            println!("{}", serde_json::to_string_pretty(&status).context("encode status")?);
        }
        Commands::Ask {
            question,
            max_words,
            threshold,
        } => {
            let cfg = load_config(cli.config.as_deref(), *max_words, *threshold)?;
            let providers = Providers::from_config(&cfg)?;
            let knowledge = KnowledgeBase::load(
                &KnowledgePaths::from_config(&cfg),
                providers.embedder.as_ref(),
                &cfg.embedding_model,
            );
            let answerer = HybridAnswerer::new(
                &knowledge,
                providers.embedder.as_ref(),
                providers.llm.as_ref(),
                AnswerSettings::from(&cfg),
            );
            let answer = Session::new().ask(&answerer, question)?;
            info!(lookup = ?answer.lookup, "answered");
            println!("{}", answer.text);
        }
        Commands::Chat {
            max_words,
            threshold,
        } => {
            let cfg = load_config(cli.config.as_deref(), *max_words, *threshold)?;
            let providers = Providers::from_config(&cfg)?;
            let knowledge = KnowledgeBase::load(
                &KnowledgePaths::from_config(&cfg),
                providers.embedder.as_ref(),
                &cfg.embedding_model,
            );
            let answerer = HybridAnswerer::new(
                &knowledge,
                providers.embedder.as_ref(),
                providers.llm.as_ref(),
                AnswerSettings::from(&cfg),
            );
            run_chat(&answerer)?;
        }
        Commands::Health => {
            let cfg = load_config(cli.config.as_deref(), None, None)?;
            let providers = Providers::from_config(&cfg)?;
            providers.health_check()?;
            println!("ok provider={} base_url={}", cfg.provider, providers.base_url());
        }
    }

    Ok(())
}

fn main() {
    if let Err(e) = run() {
        eprintln!("erro: {e:#}");
        std::process::exit(1);
    }
}
