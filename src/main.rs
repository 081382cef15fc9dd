use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser as ClapParser;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

use sh2py::{Lexer, compile};

/// Translate a shell script into a Python script.
#[derive(ClapParser, Debug)]
#[command(version, about)]
struct Cli {
    /// Shell script to translate.
    input: PathBuf,

    /// Where to write the generated Python.
    #[arg(short, long, default_value = "output.py")]
    output: PathBuf,

    /// Print the token stream as JSON to stdout and continue.
    #[arg(long)]
    dump_tokens: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let source = fs::read_to_string(&cli.input)
        .with_context(|| format!("reading {}", cli.input.display()))?;

    if cli.dump_tokens {
        let tokens = Lexer::new(&source).tokenize()?;
        println!("{}", serde_json::to_string_pretty(&tokens)?);
    }

    let python = compile(&source)
        .with_context(|| format!("translating {}", cli.input.display()))?;

    let mut contents = python;
    if !contents.ends_with('\n') {
        contents.push('\n');
    }
    fs::write(&cli.output, contents)
        .with_context(|| format!("writing {}", cli.output.display()))?;

    info!(
        input = %cli.input.display(),
        output = %cli.output.display(),
        "translation complete"
    );
    Ok(())
}
