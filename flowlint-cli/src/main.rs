mod commands;
mod output;

use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::validate::{self, ValidateArgs};

/// Check workflow YAML files for syntax errors and missing required fields
#[derive(Parser, Debug)]
#[command(name = "flowlint", version, about)]
struct Cli {
    #[command(flatten)]
    validate: ValidateArgs,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // Diagnostics go to stderr; RUST_LOG overrides the default level
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();
    let code = validate::execute(cli.validate)?;

    std::process::exit(code);
}
