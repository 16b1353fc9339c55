use std::io::Read;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wordwise::{apply_all, remote, Engine, EngineConfig};

#[derive(Parser)]
#[command(
    name = "wordwise",
    about = "Check grammar, spelling and style, and score readability",
    version
)]
struct Cli {
    /// File paths to analyze (reads stdin if none provided)
    files: Vec<String>,

    /// TOML file with engine settings and extra rules
    #[arg(long)]
    config: Option<String>,

    /// JSON payload from a remote suggestion service to merge in
    #[arg(long)]
    remote: Option<String>,

    /// Print the corrected text instead of the JSON report
    #[arg(long)]
    apply: bool,
}

fn fail(message: String) -> ! {
    eprintln!("{message}");
    std::process::exit(1);
}

fn read_file(path: &str) -> String {
    std::fs::read_to_string(path).unwrap_or_else(|e| fail(format!("Error reading {path}: {e}")))
}

fn run(engine: &Engine, cli: &Cli, text: &str) {
    let remote = match &cli.remote {
        Some(path) => remote::parse_suggestions(&read_file(path), text)
            .unwrap_or_else(|e| fail(format!("Error in {path}: {e}"))),
        None => Vec::new(),
    };
    let result = engine.analyze_with_remote(text, remote);

    if cli.apply {
        println!("{}", apply_all(text, &result.suggestions).text);
    } else {
        let json = serde_json::to_string_pretty(&result)
            .unwrap_or_else(|e| fail(format!("Error serializing result: {e}")));
        println!("{json}");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("WORDWISE_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path).unwrap_or_else(|e| fail(e.to_string())),
        None => EngineConfig::default(),
    };
    let engine = Engine::new(&config).unwrap_or_else(|e| fail(e.to_string()));

    if cli.files.is_empty() {
        let mut input = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut input) {
            fail(format!("Error reading stdin: {e}"));
        }
        run(&engine, &cli, &input);
    } else {
        for path in &cli.files {
            let text = read_file(path);
            run(&engine, &cli, &text);
        }
    }
}
