mod app;
mod console;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aqari", version, about = "Aqari — WhatsApp real-estate lead bot")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the bot.
    Start,
    /// Show the effective configuration.
    Status,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    match cli.command {
        Commands::Start => {
            let cfg = aqari_core::config::load(&cli.config)?;
            app::run(cfg).await?;
        }
        Commands::Status => {
            let cfg = aqari_core::config::load(&cli.config)?;
            println!("Aqari — Status\n");
            println!("Config: {}", cli.config);
            println!("Script variant: {:?}", cfg.script.variant);
            println!(
                "Catalog: {}",
                if cfg.catalog.base_url.is_empty() {
                    "fallback offers only".to_string()
                } else {
                    cfg.catalog.base_url.clone()
                }
            );
            println!("Offer cache TTL: {}s", cfg.catalog.cache_ttl_secs);
            println!(
                "Template reload: every {}s (reset on reload: {})",
                cfg.templates.reload_interval_secs, cfg.templates.reset_on_reload
            );
            println!(
                "Transport: {}",
                if cfg.channel.console { "console" } else { "none" }
            );
        }
    }

    Ok(())
}
