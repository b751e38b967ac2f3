use clap::{Parser, Subcommand};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "rates-cli")]
#[command(about = "Command-line client for the rates gateway", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:5000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check gateway health
    Health,
    /// Look up rates for one base currency
    Rates {
        base: String,
        #[arg(short, long)]
        target: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        end: Option<String>,
    },
    /// Look up several pairs at once, each as BASE:TARGET:START[:END]
    Batch {
        #[arg(required = true)]
        pairs: Vec<String>,
    },
}

fn parse_pair(raw: &str) -> Result<Value, String> {
    let parts: Vec<&str> = raw.split(':').collect();
    match parts.as_slice() {
        [base, target, start] => Ok(json!({
            "base": base,
            "target": target,
            "start_date": start,
        })),
        [base, target, start, end] => Ok(json!({
            "base": base,
            "target": target,
            "start_date": start,
            "end_date": end,
        })),
        _ => Err(format!("invalid pair '{}', expected BASE:TARGET:START[:END]", raw)),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let url = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Health => {
            let res = client.get(format!("{}/health", url)).send().await?;
            print_response(res).await?;
        }
        Commands::Rates {
            base,
            target,
            start,
            end,
        } => {
            let mut query = vec![("base", base)];
            query.extend(target.map(|t| ("target", t)));
            query.extend(start.map(|s| ("start_date", s)));
            query.extend(end.map(|e| ("end_date", e)));

            let res = client
                .get(format!("{}/api/rates", url))
                .query(&query)
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Batch { pairs } => {
            let pairs = pairs
                .iter()
                .map(|p| parse_pair(p))
                .collect::<Result<Vec<_>, _>>()?;

            let res = client
                .post(format!("{}/api/rates/multiple", url))
                .json(&json!({ "pairs": pairs }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    let text = res.text().await?;

    match serde_json::from_str::<Value>(&text) {
        Ok(json) => {
            if !status.is_success() {
                eprintln!("Error: gateway returned status {}", status);
            }
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
        Err(_) => {
            eprintln!("Error: gateway returned status {}", status);
            eprintln!("Response: {}", text);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pair() {
        assert_eq!(
            parse_pair("USD:EUR:2024-01-01").unwrap(),
            json!({"base": "USD", "target": "EUR", "start_date": "2024-01-01"})
        );
        assert_eq!(
            parse_pair("USD:EUR:2024-01-01:2024-01-31").unwrap()["end_date"],
            "2024-01-31"
        );
        assert!(parse_pair("USD-EUR").is_err());
    }
}
