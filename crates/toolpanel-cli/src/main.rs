//! CLI entry point - the composition root.
//!
//! Parses arguments, installs logging, builds the panel through
//! `bootstrap` and dispatches to a handler.

use clap::Parser;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use toolpanel_cli::{Cli, CliError, Commands, PanelConfig, bootstrap, handlers};

/// Install the stderr subscriber.
///
/// Priority: `RUST_LOG` > `--verbose` (info) > default (warn).
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .ok(); // Ignore error if already initialized
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(command) = cli.command else {
        // No command provided - show help
        use clap::CommandFactory;
        Cli::command().print_help()?;
        return Ok(());
    };

    let config = match &cli.config {
        Some(path) => PanelConfig::load(path)?,
        None => PanelConfig::demo(),
    }
    .with_poll_interval(cli.poll_interval);
    let mut ctx = bootstrap(config)?;

    match command {
        Commands::List => handlers::list::execute(&mut ctx).await?,
        Commands::Tools { name } => handlers::tools::execute(&mut ctx, &name).await?,
        Commands::Shell => handlers::shell::execute(&mut ctx).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli).await {
        eprintln!("Error: {err:#}");
        let code = err.downcast_ref::<CliError>().map_or(1, CliError::exit_code);
        std::process::exit(code);
    }
}
