use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "faucet-cli")]
#[command(about = "Management CLI for the testnet faucet", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Service health and chain status
    Status,
    /// Funding wallet balance
    Balance,
    /// List recorded disbursement operations
    Ops,
    /// Show one disbursement operation
    Op { id: String },
    /// List wallet addresses and their kinds
    Addresses,
    /// Claim funds for an address
    Claim { address: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/health", base)).send().await?;
            print_response(res).await?;
            let res = client.get(format!("{}/", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Balance => {
            let res = client.get(format!("{}/balance", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Ops => {
            let res = client.get(format!("{}/ops/status", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Op { id } => {
            let res = client.get(format!("{}/ops/status/{}", base, id)).send().await?;
            print_response(res).await?;
        }
        Commands::Addresses => {
            let res = client.get(format!("{}/addresses", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Claim { address } => {
            let res = client
                .post(format!("{}/", base))
                .form(&[("address", address)])
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let body: Value = res.json().await.unwrap_or(Value::Null);
    if !status.is_success() {
        eprintln!("HTTP {}", status);
    }
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}
