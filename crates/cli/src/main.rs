use anyhow::Context;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "biblio", about = "biblio catalog tooling")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the catalog HTTP server
    Serve,
    /// Print the resolved configuration and exit
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = biblio_kernel::settings::Settings::load()
        .with_context(|| "failed to load biblio settings")?;

    match cli.command {
        Some(Command::Serve) => biblio_app::bootstrap::run(&settings).await,
        Some(Command::Config) => {
            println!("{settings:#?}");
            Ok(())
        }
        None => {
            tracing_subscriber::fmt::try_init().ok();
            tracing::info!(env = ?settings.environment, "no command given; try --help");
            Ok(())
        }
    }
}
