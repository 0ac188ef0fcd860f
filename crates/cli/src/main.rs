//! CLI tool for translating the text of PowerPoint files.

mod anthropic;

use anthropic::AnthropicClient;
use anyhow::{Context, Result};
use clap::Parser;
use deck_core::TranslationConfig;
use deck_pptx::DocumentPipeline;
use std::io::Write;
use std::path::PathBuf;

/// Environment variable overriding the target language.
const LANGUAGE_ENV: &str = "DECK_TRANSLATE_LANGUAGE";

/// Translate the slide and notes text of a .pptx file.
#[derive(Parser, Debug)]
#[command(name = "deck-translate")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Input PowerPoint file (.pptx)
    input: PathBuf,

    /// Output PowerPoint file (.pptx)
    output: PathBuf,

    /// Log prompts, model responses and per-entry details
    #[arg(long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.debug);

    let client = AnthropicClient::from_env().context("Failed to configure translation client")?;
    log::debug!("Using model {}", client.model());

    let mut config = TranslationConfig::new().with_debug(args.debug);
    if let Ok(language) = std::env::var(LANGUAGE_ENV) {
        config = config.with_target_language(language);
    }

    let pipeline = DocumentPipeline::new(client, config);
    let report = pipeline
        .translate_file(&args.input, &args.output)
        .with_context(|| format!("Failed to translate {}", args.input.display()))?;

    if report.fallbacks > 0 {
        log::warn!(
            "{} of {} translated entries kept their original text",
            report.fallbacks,
            report.rewritten
        );
    }

    Ok(())
}

/// Bare-message logging at `info`, or `debug` with `--debug`. `RUST_LOG` wins.
fn init_logging(debug: bool) {
    let default_filter = if debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .filter_module("hyper", log::LevelFilter::Warn)
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}
