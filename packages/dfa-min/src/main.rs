use std::{fmt::Display, path::Path, str::FromStr};

use anyhow::Context;
use clap::Parser;
use dfa_min_lib::{
    automaton::dfa::{DFA, description::DfaDescription, spec::DfaSpec},
    config::{DfaMinConfig, GeneralConfig, LoggerConfig},
    logger::{LogLevel, Logger},
    minimizer::{Minimizer, SerializableMinimizationResult},
    validation::equivalence::distinguishing_word,
};

mod report;

/// What to print after minimizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Human readable report with transition tables and the final partition.
    Text,
    /// The full minimization result as JSON.
    Json,
    /// Only the minimized automaton, in the same text format as the input.
    Spec,
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Format::Text),
            "json" => Ok(Format::Json),
            "spec" => Ok(Format::Spec),
            _ => Err(format!("Invalid format: {}", s)),
        }
    }
}

impl Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Text => write!(f, "text"),
            Format::Json => write!(f, "json"),
            Format::Spec => write!(f, "spec"),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "DFA Minimization Tool")]
#[command(version = "0.1")]
#[command(about = "Minimize deterministic finite automata by partition refinement", long_about = None)]
struct Args {
    /// A DFA in the text spec format, or a JSON description if the file ends
    /// in `.json`.
    file: String,

    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long, default_value_t = Format::Text)]
    format: Format,

    /// Print the minimized DFA in Graphviz dot format.
    #[arg(long)]
    graphviz: bool,

    /// Check that the minimized DFA accepts the same language as the input.
    #[arg(long)]
    verify: bool,
}

fn load_description(file: &str) -> anyhow::Result<DfaDescription<u32, char>> {
    let is_json = Path::new(file)
        .extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"));

    if is_json {
        let content =
            std::fs::read_to_string(file).with_context(|| format!("failed to read {}", file))?;
        DfaDescription::from_json(&content).with_context(|| format!("invalid JSON in {}", file))
    } else {
        DfaSpec::from_file(file)
            .and_then(|spec| spec.to_description())
            .with_context(|| format!("invalid DFA spec in {}", file))
    }
}

fn init_tracing(config: &LoggerConfig) {
    if !*config.get_enabled() {
        return;
    }

    let level = match config.get_log_level() {
        LogLevel::Debug => tracing::Level::DEBUG,
        LogLevel::Info => tracing::Level::INFO,
        LogLevel::Warn => tracing::Level::WARN,
        LogLevel::Error => tracing::Level::ERROR,
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn verify(input: &DFA<u32, char>, minimized: &DFA<usize, char>) -> anyhow::Result<()> {
    match distinguishing_word(input, minimized) {
        None => Ok(()),
        Some(word) => anyhow::bail!(
            "minimized DFA differs from the input on {:?}",
            word.iter().collect::<String>()
        ),
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = DfaMinConfig::from_optional_file(args.config.as_ref())?;
    init_tracing(config.logger());

    let logger = Logger::from_config(config.logger(), "Minimizer")?;

    let description = load_description(&args.file)?;
    let dfa = description
        .build()
        .with_context(|| format!("{} does not describe a valid DFA", args.file))?;

    let result = Minimizer::new(config.get_minimizer().clone(), logger.as_ref()).minimize(&dfa)?;

    if args.verify {
        verify(&dfa, &result.minimized)?;
        if let Some(l) = logger.as_ref() {
            l.info("Minimized DFA accepts the same language as the input");
        }
    }

    match args.format {
        Format::Text => report::print_report(&dfa, &result, config.get_report()),
        Format::Json => {
            let json_res =
                serde_json::to_string_pretty(&SerializableMinimizationResult::from(&result))?;
            println!("{}", json_res);
        }
        Format::Spec => print!("{}", DfaSpec::from_dfa(&result.minimized)),
    }

    if args.graphviz || *config.get_report().get_graphviz() {
        println!("{}", result.minimized.to_graphviz());
    }

    Ok(())
}
