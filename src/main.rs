use clap::Parser;
use minance::cli::{Cli, Commands};
use minance::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    minance::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Serve(args) => {
            args.execute(&config).await?;
        }
        Commands::Holdings(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            print!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
