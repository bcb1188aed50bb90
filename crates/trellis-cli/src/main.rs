mod cli;
mod context;
mod output;
mod repl;

use std::io::{self, IsTerminal};

use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use context::AppContext;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use trellis_core::AppConfig;

fn init_tracing() -> anyhow::Result<()> {
    if let Ok(log_path) = std::env::var("TRELLIS_DEBUG_LOG") {
        let log_file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        tracing_subscriber::fmt()
            .with_writer(log_file)
            .with_max_level(tracing::Level::DEBUG)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
            .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
            .init();
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cli = Cli::parse();

    let action = match cli.command {
        Some(Commands::Completions { shell }) => {
            clap_complete::generate(shell, &mut Cli::command(), "trellis", &mut io::stdout());
            return Ok(());
        }
        Some(Commands::Shell(action)) => Some(action),
        None => None,
    };

    let config = AppConfig::load();
    let mut ctx = AppContext::open(cli.file, cli.no_cache, config)?;

    match action {
        Some(action) => match ctx.execute(&action.into()) {
            Ok(result) => println!("{}", output::render(result)?),
            Err(e) => {
                eprintln!("{}", output::error(&e.to_string())?);
                std::process::exit(1);
            }
        },
        None => {
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            tracing::info!(interactive, "starting shell");
            repl::run(
                &mut ctx,
                stdin.lock(),
                &mut io::stdout(),
                &mut io::stderr(),
                interactive,
            )?;
        }
    }

    Ok(())
}
