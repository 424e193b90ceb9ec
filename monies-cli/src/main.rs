//! Monies CLI
//!
//! Parse, format and compute with exact-decimal money from the shell.

mod config;

use std::str::FromStr;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use serde::Serialize;

use monies_repo::build_repo;
use monies_types::{
    Comparison, DEFAULT_DIVISION_DIGITS, FormatOptions, Money, MoneyRepository, MoniesConfig,
    Operand, RoundingMode,
};

#[derive(Parser)]
#[command(name = "monies")]
#[command(author, version, about = "Exact-decimal money calculator", long_about = None)]
struct Cli {
    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse free text such as "£1.99" or "1.999,00 EUR"
    Parse { text: String },
    /// Format a value with a named preset
    Format {
        value: String,
        /// Preset name (en, eu, default); defaults to MONIES_FORMAT
        #[arg(long)]
        name: Option<String>,
        #[command(flatten)]
        decoration: Decoration,
    },
    /// Round a value
    Round {
        value: String,
        #[arg(long, default_value_t = 0)]
        digits: u32,
        /// down, up, ceiling, floor, half_up, half_down, half_even
        #[arg(long, default_value = "half_up")]
        mode: String,
    },
    /// Divide a value by a number or by another value in the same currency
    Divide {
        value: String,
        divisor: String,
        /// Maximum fractional digits of the quotient
        #[arg(long, default_value_t = DEFAULT_DIVISION_DIGITS)]
        digits: u32,
    },
    /// Convert a value into another currency
    Convert {
        value: String,
        /// Exchange rate, a number or a value in the target currency
        #[arg(long)]
        rate: String,
        /// Target currency code for a numeric rate
        #[arg(long)]
        to: Option<String>,
    },
    /// Split a value into shares that sum to it
    Allocate {
        value: String,
        #[arg(long)]
        parts: u32,
        #[arg(long, default_value_t = 2)]
        digits: u32,
    },
    /// Store a labelled value in the database
    Store {
        label: String,
        value: String,
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
    /// List stored values compared against a value
    Find {
        /// eq, ne, lt, le, gt, ge
        #[arg(long, default_value = "eq")]
        op: String,
        value: String,
        #[arg(long, env = "DATABASE_URL")]
        database_url: Option<String>,
    },
}

#[derive(Args)]
struct Decoration {
    /// Prefix the currency symbol
    #[arg(long)]
    symbol: bool,
    /// Append the currency code
    #[arg(long)]
    code: bool,
}

#[derive(Serialize)]
struct Parsed<'a> {
    value: &'a Money,
    magnitude: String,
    scale: u32,
    currency: &'a str,
}

/// Reads a plain number as a decimal operand, anything else as money.
fn parse_operand(monies: &MoniesConfig, text: &str) -> Result<Operand> {
    if let Ok(decimal) = Decimal::from_str(text.trim()) {
        return Ok(Operand::from(decimal));
    }
    Ok(Operand::from(monies.parse(text)?))
}

fn parse_comparison(op: &str) -> Result<Comparison> {
    serde_json::from_value(serde_json::Value::String(op.to_lowercase()))
        .map_err(|_| anyhow::anyhow!("Unknown comparison: {}. Supported: eq, ne, lt, le, gt, ge", op))
}

fn print_value(value: &Money, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        println!("{}", value);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,monies=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config::Config::from_env()?;
    let monies = config.monies()?;

    match cli.command {
        Commands::Parse { text } => {
            let value = monies.parse(&text)?;
            if cli.json {
                let parsed = Parsed {
                    value: &value,
                    magnitude: value.magnitude().to_string(),
                    scale: value.scale(),
                    currency: value.currency().as_str(),
                };
                println!("{}", serde_json::to_string_pretty(&parsed)?);
            } else {
                println!("{}", value.to_raw());
            }
        }

        Commands::Format {
            value,
            name,
            decoration,
        } => {
            let value = monies.parse(&value)?;
            let name = name.unwrap_or_else(|| config.format.clone());
            let options = FormatOptions {
                symbol: decoration.symbol,
                code: decoration.code,
            };
            let formatted = monies.format(&value, &name, options)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&formatted)?);
            } else {
                println!("{}", formatted);
            }
        }

        Commands::Round {
            value,
            digits,
            mode,
        } => {
            let mode: RoundingMode = mode.parse()?;
            let value = monies.parse(&value)?;
            print_value(&value.round(digits, mode), cli.json)?;
        }

        Commands::Divide {
            value,
            divisor,
            digits,
        } => {
            let value = monies.parse(&value)?;
            let divisor = parse_operand(&monies, &divisor)?;
            print_value(&value.div_with_digits(divisor, digits)?, cli.json)?;
        }

        Commands::Convert { value, rate, to } => {
            let value = monies.parse(&value)?;
            let rate = parse_operand(&monies, &rate)?;
            print_value(&value.convert(rate, to.as_deref())?, cli.json)?;
        }

        Commands::Allocate {
            value,
            parts,
            digits,
        } => {
            let value = monies.parse(&value)?;
            let shares = value.allocate(parts, digits)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&shares)?);
            } else {
                for share in &shares {
                    println!("{}", share);
                }
            }
        }

        Commands::Store {
            label,
            value,
            database_url,
        } => {
            let value = monies.parse(&value)?;
            let repo = build_repo(database_url.as_deref().unwrap_or(&config.database_url)).await?;
            let record = repo.insert(&label, &value).await?;
            tracing::info!(id = %record.id, "Stored money record");
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                println!("{}", record.id);
            }
        }

        Commands::Find {
            op,
            value,
            database_url,
        } => {
            let op = parse_comparison(&op)?;
            let value = monies.parse(&value)?;
            let repo = build_repo(database_url.as_deref().unwrap_or(&config.database_url)).await?;
            let records = repo.find(op, &value).await?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                for record in &records {
                    println!("{}\t{}\t{}", record.id, record.label, record.amount);
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_operand() {
        let monies = MoniesConfig::new();
        assert!(matches!(
            parse_operand(&monies, "0.4").unwrap(),
            Operand::Decimal(_)
        ));
        assert!(matches!(
            parse_operand(&monies, "2 EUR").unwrap(),
            Operand::Money(_)
        ));
        assert!(parse_operand(&monies, "abc").is_err());
    }

    #[test]
    fn test_parse_comparison() {
        assert_eq!(parse_comparison("GE").unwrap(), Comparison::Ge);
        assert!(parse_comparison("between").is_err());
    }

    #[test]
    fn test_subcommand_arguments() {
        let cli = Cli::try_parse_from(["monies", "--json", "round", "1.995 GBP", "--digits", "2"])
            .unwrap();
        assert!(cli.json);
        assert!(matches!(
            cli.command,
            Commands::Round { digits: 2, ref mode, .. } if mode == "half_up"
        ));
    }
}
