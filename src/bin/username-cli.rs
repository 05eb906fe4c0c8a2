use clap::{Parser, Subcommand};
use username_sdk::UsernameClient;

#[derive(Parser)]
#[command(name = "username-cli")]
#[command(about = "Query a running username service", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:80", env = "USERNAME_SERVICE_URL")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service liveness
    Health,
    /// Print the display name of the user owning a server
    Lookup {
        /// Compute instance ID
        server_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = UsernameClient::new(&cli.url);

    match cli.command {
        Commands::Health => {
            let health = client.health().await?;
            println!("{}", health.status);
        }
        Commands::Lookup { server_id } => {
            let name = client.get_username(&server_id).await?;
            println!("{name}");
        }
    }

    Ok(())
}
