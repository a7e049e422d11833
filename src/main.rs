use anyhow::Context;
use clap::{Parser, Subcommand};
use nasa_data_guide::config::LoggingConfig;
use nasa_data_guide::{
    Config, ConfigOverrides, DatasetSearchAdapter, DatasetSearchPort, ExplanationAdapter,
    ExplanationPort, LogFormat, Server,
};
use std::path::PathBuf;
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "nasa-data-guide", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// TOML configuration file
    #[arg(long, short, env = "NASA_GUIDE_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Address to bind the HTTP server to
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to bind the HTTP server to
    #[arg(long, short, global = true)]
    port: Option<u16>,

    /// Log filter directive, e.g. `info` or `nasa_data_guide=debug`
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Search NASA's dataset catalog once and print the results as JSON.
    Search {
        /// Search keywords
        #[arg(required = true)]
        keywords: Vec<String>,
    },
    /// Explain one dataset in plain language.
    Explain {
        /// Dataset title
        #[arg(long)]
        title: String,
        /// Dataset summary
        #[arg(long)]
        summary: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = dotenvy::dotenv();
    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.apply_overrides(&ConfigOverrides {
        host: cli.host,
        port: cli.port,
        log_level: cli.log_level,
        log_format: cli.log_format,
    });

    init_logging(&config.logging);
    match env_file {
        Ok(path) => debug!("Loaded settings file {}", path.display()),
        Err(e) => debug!("No .env settings file loaded: {}", e),
    }
    config.validate().context("invalid configuration")?;
    config.log_summary(cli.config.as_deref());

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!(version = env!("CARGO_PKG_VERSION"), "nasa-data-guide starting");
            let server = Server::new(config)?;
            server.run().await?;
        }
        Command::Search { keywords } => {
            let adapter = DatasetSearchAdapter::new(config.dataset_search)?;
            let datasets = adapter
                .try_search(&keywords)
                .await
                .context("dataset search failed")?;
            println!("{}", serde_json::to_string_pretty(&datasets)?);
        }
        Command::Explain { title, summary } => {
            let adapter = ExplanationAdapter::new(config.explanation)?;
            let explanation = adapter
                .try_explain(&title, &summary)
                .await
                .context("explanation failed")?;
            println!("{explanation}");
        }
    }

    Ok(())
}

fn init_logging(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let registry = tracing_subscriber::registry().with(filter);

    match logging.format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
    }
}
