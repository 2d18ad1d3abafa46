use std::path::PathBuf;

use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use serde_json::json;

use quote_gateway::config::{load_or_default, ConfigError, GatewayConfig, SecretKey};
use quote_gateway::{AccessGateway, Role, Session, SessionCodec};

#[derive(Parser)]
#[command(name = "gateway-cli")]
#[command(about = "Operator tooling for the quote access gateway", long_about = None)]
struct Cli {
    /// Gateway configuration file (defaults when omitted).
    #[arg(short, long, env = "QUOTE_GATEWAY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate the configuration, listing every problem
    Validate,
    /// Seal a session token with the configured secret (for testing)
    Mint {
        #[arg(long)]
        subject: String,
        #[arg(long, default_value = "sales")]
        role: Role,
        #[arg(long, default_value_t = 3600)]
        ttl_secs: i64,
    },
    /// Show the decision the gateway would make for a path right now
    Check {
        #[arg(long)]
        path: String,
        #[arg(long)]
        token: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match load_or_default(cli.config.as_deref()) {
        Ok(config) => config,
        Err(ConfigError::Validation(errors)) => {
            eprintln!("Configuration is invalid:");
            for error in errors {
                eprintln!("  - {error}");
            }
            std::process::exit(1);
        }
        Err(e) => return Err(e.into()),
    };

    match cli.command {
        Commands::Validate => {
            println!("Configuration OK");
        }
        Commands::Mint {
            subject,
            role,
            ttl_secs,
        } => {
            let codec = SessionCodec::new(&secret(&config)?);
            let now = Utc::now();
            let token = codec.encode(&Session {
                subject,
                role,
                issued_at: Some(now),
                expires_at: now + Duration::seconds(ttl_secs),
            })?;
            println!("{token}");
        }
        Commands::Check { path, token } => {
            let gateway = AccessGateway::from_config(&config, &secret(&config)?)?;
            let evaluation = gateway.evaluate(&path, token.as_deref(), Utc::now());
            let report = json!({
                "path": path,
                "route": evaluation.route.as_str(),
                "session": evaluation.failure().map(|f| f.reason()).unwrap_or(
                    if evaluation.session.is_some() { "valid" } else { "not_checked" }
                ),
                "decision": evaluation.decision.as_str(),
                "location": evaluation.decision.location(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    Ok(())
}

fn secret(config: &GatewayConfig) -> Result<SecretKey, ConfigError> {
    SecretKey::from_env(&config.session.secret_env, config.session.min_secret_len)
}
