use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "graph-cli")]
#[command(about = "Command-line client for the graph gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Details on a resource
    Details { resource: String },
    /// Measurement and parameter details on a resource
    Resdetails { resource: String },
    /// Logo URL of a resource
    Logo { resource: String },
    /// Describe a resource
    Describe { resource: String },
    /// Search organizations by description
    Orgsearch { text: String },
    /// Resources within a time range
    Temporal { begin: String, end: String },
    /// Details on a set of resources
    Resset { resources: Vec<String> },
    /// People associated with a set of resources
    Ressetpeople { resources: Vec<String> },
    /// List the gateway's routes
    Routes,
    /// Check gateway health
    Health,
}

const PROD: &str = "/api/v1/graph";
const DEV: &str = "/api/dev/graph";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let request = match cli.command {
        Commands::Details { resource } => client
            .get(format!("{base}{PROD}/details"))
            .query(&[("r", resource)]),
        Commands::Resdetails { resource } => client
            .get(format!("{base}{PROD}/resdetails"))
            .query(&[("r", resource)]),
        Commands::Logo { resource } => client
            .get(format!("{base}{DEV}/logo"))
            .query(&[("r", resource)]),
        Commands::Describe { resource } => client
            .get(format!("{base}{DEV}/describe"))
            .query(&[("r", resource)]),
        Commands::Orgsearch { text } => client
            .get(format!("{base}{DEV}/orgsearch"))
            .query(&[("r", text)]),
        Commands::Temporal { begin, end } => client
            .get(format!("{base}{DEV}/temporal"))
            .query(&[("b", begin), ("e", end)]),
        Commands::Resset { resources } => client
            .post(format!("{base}{PROD}/ressetdetails"))
            .form(&[("body", serde_json::to_string(&resources)?)]),
        Commands::Ressetpeople { resources } => client
            .post(format!("{base}{PROD}/ressetpeople"))
            .form(&[("body", serde_json::to_string(&resources)?)]),
        Commands::Routes => client.get(format!("{base}/apidocs.json")),
        Commands::Health => client.get(format!("{base}/health")),
    };

    print_response(request.send().await?).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: gateway returned status {}", status);
        if let Ok(text) = res.text().await {
            if !text.is_empty() {
                eprintln!("Response: {}", text);
            }
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
