mod cache;
mod cli;
mod config;
mod context;
mod display;
mod executor;
mod ollama;
mod repl;
mod router;
mod session;
mod spinner;
mod util;

use clap::Parser;
use cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main(cli))
}

async fn async_main(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Version) => {
            println!(
                "{}",
                include_str!(concat!(env!("OUT_DIR"), "/long_version.txt"))
            );
        }

        Some(Commands::Config) => {
            let config = config::ConfigStore::load()?;
            display::dim(&format!("# {}", util::display_path(config.path())));
            println!("{}", config.to_pretty());
        }

        None => {
            let config = config::ConfigStore::load()?;
            #[cfg(unix)]
            repl::maybe_relaunch_with_sudo(&config)?;
            repl::run(config).await?;
        }
    }

    Ok(())
}
