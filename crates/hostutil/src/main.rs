//! hostutil CLI entry point.

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use hostutil::cli::Cli;

fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let directive = if cli.debug {
        "hostutil=debug"
    } else {
        "hostutil=info"
    };
    tracing_subscriber::registry()
        .with(
            cli.log_json
                .then(|| fmt::layer().json().with_writer(std::io::stderr)),
        )
        .with(
            (!cli.log_json)
                .then(|| fmt::layer().with_target(true).with_writer(std::io::stderr)),
        )
        .with(EnvFilter::from_default_env().add_directive(directive.parse()?))
        .init();

    // Execute command
    cli.execute()
}
