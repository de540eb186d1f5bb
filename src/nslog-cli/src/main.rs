mod cli;
mod config;
mod convert;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use config::{Config, Settings};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.output.is_some() && cli.inputs.len() > 1 {
        bail!("--output can only be used with a single input file");
    }

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let settings = Settings::resolve(&cli, &config);

    // Each file decodes independently; failures are reported and skipped
    let mut failed = 0usize;
    for input in &cli.inputs {
        let result = if cli.stdout {
            convert::decode_file(input, &settings).map(|text| print!("{}", text))
        } else {
            convert::convert_file(input, cli.output.as_deref(), &settings).map(|path| {
                eprintln!("{} -> {}", input.display(), path.display());
            })
        };

        if let Err(e) = result {
            tracing::error!("{:#}", e);
            failed += 1;
        }
    }

    if failed > 0 {
        bail!("{} of {} files failed to decode", failed, cli.inputs.len());
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the `-v` level
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
