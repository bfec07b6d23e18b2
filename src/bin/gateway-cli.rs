use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use std::path::PathBuf;

use target_gateway::config::load_with_allowlist;
use target_gateway::http::X_TARGET_URL;

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Client tooling for the target gateway", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send a request through a running gateway
    Send {
        /// Gateway endpoint, including the mount path
        #[arg(short, long, default_value = "http://localhost:8080/api/proxy")]
        gateway: String,

        /// Upstream URL placed in X-Target-URL
        #[arg(short, long)]
        target: String,

        #[arg(short = 'X', long, default_value = "GET")]
        method: String,

        /// Extra header as `Name: value`; repeatable
        #[arg(short = 'H', long = "header")]
        headers: Vec<String>,

        /// Request body
        #[arg(short, long)]
        data: Option<String>,
    },
    /// Print the allowlist the gateway would resolve from config and environment
    Allowlist {
        #[arg(short, long, env = "GATEWAY_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Send {
            gateway,
            target,
            method,
            headers,
            data,
        } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let mut header_map = parse_headers(&headers)?;
            header_map.insert(X_TARGET_URL, HeaderValue::from_str(&target)?);

            let client = reqwest::Client::new();
            let mut request = client.request(method, &gateway).headers(header_map);
            if let Some(data) = data {
                request = request.body(data);
            }
            print_response(request.send().await?).await?;
        }
        Commands::Allowlist { config } => {
            let (_, allowlist) =
                load_with_allowlist(config.as_deref(), |name| std::env::var(name).ok())?;
            if allowlist.is_empty() {
                eprintln!("Allowlist is empty; the gateway would reject every request");
            }
            for entry in allowlist.entries() {
                println!("{}", entry);
            }
        }
    }

    Ok(())
}

fn parse_headers(raw: &[String]) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let mut headers = HeaderMap::new();
    for line in raw {
        let (name, value) = line
            .split_once(':')
            .ok_or_else(|| format!("header {:?} is not `Name: value`", line))?;
        headers.append(
            HeaderName::from_bytes(name.trim().as_bytes())?,
            HeaderValue::from_str(value.trim())?,
        );
    }
    Ok(headers)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    println!("{:?} {}", res.version(), res.status());
    for (name, value) in res.headers() {
        println!("{}: {}", name, value.to_str().unwrap_or("<binary>"));
    }
    println!();

    let text = res.text().await?;
    match serde_json::from_str::<serde_json::Value>(&text) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", text),
    }
    Ok(())
}
