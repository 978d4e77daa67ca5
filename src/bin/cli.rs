//! Creatordash CLI
//!
//! Command-line client for the Creatordash API:
//! - List channel analytics and change the active channel
//! - Call the statistics function
//! - Show the payout summary
//! - Sign the contract agreement

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "creatordash-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Creator dashboard: channel analytics, payouts and contracts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8090", global = true)]
    pub api_url: String,

    /// User id sent as the x-user-id header
    #[arg(short, long, default_value = "demo", global = true)]
    pub user: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Load channel analytics
    Channels,

    /// Show the active channel
    Selected,

    /// Change the active channel
    Select {
        /// Channel URL
        url: String,
    },

    /// Invoke the statistics function for channel URLs
    Stats {
        /// Channel URLs
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Show balance and payout schedule
    Payout,

    /// Sign the contract agreement
    Sign {
        #[arg(long)]
        legal_name: String,
        #[arg(long)]
        street_address: String,
        #[arg(long)]
        city: String,
        #[arg(long)]
        state_province: String,
        #[arg(long)]
        postal_code: String,
        #[arg(long)]
        country: String,
        /// Typed signature text
        #[arg(long, conflicts_with = "signature_image", required_unless_present = "signature_image")]
        signature: Option<String>,
        /// Drawn signature as a data:image/png;base64 URL
        #[arg(long)]
        signature_image: Option<String>,
    },

    /// Show API server status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let api = |path: &str| format!("{}/api/v1{}", cli.api_url, path);

    match &cli.command {
        Commands::Channels => {
            let request = client.get(api("/channels"));
            let data = send(request, &cli).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_channels(&data);
            }
        }

        Commands::Selected => {
            let data = send(client.get(api("/channels/selected")), &cli).await?;
            print_selection(&data, &cli.format)?;
        }

        Commands::Select { url } => {
            let body = serde_json::json!({ "url": url });
            let data = send(client.put(api("/channels/selected")).json(&body), &cli).await?;

            if data["changed"].as_bool() != Some(true) {
                eprintln!("Unknown channel {}, selection unchanged.", url);
                eprintln!("Run `creatordash-cli channels` to load your channel list.");
            }
            print_selection(&data, &cli.format)?;
        }

        Commands::Stats { urls } => {
            let body = serde_json::json!({ "urls": urls });
            let data = send(client.post(api("/statistics")).json(&body), &cli).await?;
            println!("{}", serde_json::to_string_pretty(&data)?);
        }

        Commands::Payout => {
            let data = send(client.get(api("/payout")), &cli).await?;

            if cli.format == "json" {
                println!("{}", serde_json::to_string_pretty(&data)?);
            } else {
                print_payout(&data);
            }
        }

        Commands::Sign {
            legal_name,
            street_address,
            city,
            state_province,
            postal_code,
            country,
            signature,
            signature_image,
        } => {
            let signature = match (signature, signature_image) {
                (Some(text), _) => serde_json::json!({ "method": "typed", "text": text }),
                (None, Some(data_url)) => {
                    serde_json::json!({ "method": "drawn", "data_url": data_url })
                }
                (None, None) => anyhow::bail!("a signature is required"),
            };

            let body = serde_json::json!({
                "legal_name": legal_name,
                "street_address": street_address,
                "city": city,
                "state_province": state_province,
                "postal_code": postal_code,
                "country": country,
                "signature": signature,
            });

            let data = send(client.post(api("/contract")).json(&body), &cli).await?;
            println!(
                "Contract signed ({} signature), record {}",
                data["method"].as_str().unwrap_or("-"),
                data["id"].as_str().unwrap_or("-")
            );
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.api_url))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Creatordash v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "API Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!(
                        "Gateway: {} ({})",
                        health["gateway"].as_str().unwrap_or("unknown"),
                        health["gateway_status"].as_str().unwrap_or("unknown")
                    );

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("API returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Creatordash API at {}", cli.api_url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the API server is running:");
                    eprintln!("  cargo run --bin creatordash");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = creatordash::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Send a request as the CLI user; prints the API error message and exits on failure
async fn send(request: reqwest::RequestBuilder, cli: &Cli) -> anyhow::Result<serde_json::Value> {
    let response = match request
        .header(creatordash::api::USER_ID_HEADER, &cli.user)
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            eprintln!("Cannot connect to Creatordash API at {}: {}", cli.api_url, e);
            std::process::exit(1);
        }
    };

    let status = response.status();
    let data: serde_json::Value = response.json().await.unwrap_or_default();

    if !status.is_success() {
        let message = data["error"]["message"]
            .as_str()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string());
        eprintln!("{}", message);
        std::process::exit(1);
    }

    Ok(data)
}

fn print_channels(data: &serde_json::Value) {
    let channels = match data["channels"].as_array() {
        Some(c) if !c.is_empty() => c,
        _ => {
            println!("No channels");
            return;
        }
    };
    let selected = data["selected"]["url"].as_str();

    println!(
        "  {:<32} {:>14} {:>14} {:>12} {:>9}",
        "Channel", "Total Views", "Monthly Views", "Subscribers", "Growth"
    );
    println!("{}", "-".repeat(86));

    for channel in channels {
        let marker = if channel["url"].as_str() == selected { "*" } else { " " };
        let subscribers = channel["subscribers"]
            .as_u64()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{} {:<32} {:>14} {:>14} {:>12} {:>8.1}%",
            marker,
            channel["display_name"].as_str().unwrap_or("-"),
            channel["views"].as_u64().unwrap_or(0),
            channel["monthly_views"].as_u64().unwrap_or(0),
            subscribers,
            channel["growth"].as_f64().unwrap_or(0.0)
        );
    }
}

fn print_selection(data: &serde_json::Value, format: &str) -> anyhow::Result<()> {
    if format == "json" {
        println!("{}", serde_json::to_string_pretty(data)?);
        return Ok(());
    }

    match data["selected"].as_object() {
        Some(channel) => {
            println!(
                "{}",
                channel.get("display_name").and_then(|v| v.as_str()).unwrap_or("-")
            );
            println!("  URL:           {}", channel.get("url").and_then(|v| v.as_str()).unwrap_or("-"));
            println!("  Total views:   {}", channel.get("views").and_then(|v| v.as_u64()).unwrap_or(0));
            println!(
                "  Monthly views: {}",
                channel.get("monthly_views").and_then(|v| v.as_u64()).unwrap_or(0)
            );
            println!(
                "  Growth:        {:.1}%",
                channel.get("growth").and_then(|v| v.as_f64()).unwrap_or(0.0)
            );
        }
        None => {
            println!("No Channel Selected");
            println!("Select a channel from the list to view its analytics.");
        }
    }

    Ok(())
}

fn print_payout(data: &serde_json::Value) {
    println!(
        "Current Balance: {}",
        data["balance_display"].as_str().unwrap_or("-")
    );
    println!(
        "Next payment:    {}",
        data["next_payment_date"].as_str().unwrap_or("-")
    );
    println!(
        "Minimum payment threshold: {}",
        data["threshold_display"].as_str().unwrap_or("-")
    );
    if data["eligible"].as_bool() == Some(true) {
        println!("Threshold reached, payment will be issued on the next payment date.");
    } else {
        println!(
            "{} more needed for next payment",
            data["remaining_display"].as_str().unwrap_or("-")
        );
    }

    if let Some(methods) = data["payment_methods"].as_array() {
        println!();
        println!("Available Payment Methods:");
        for method in methods {
            println!("  - {}", method.as_str().unwrap_or("-"));
        }
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
