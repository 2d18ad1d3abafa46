//! Quote Desk access gateway.
//!
//! # Architecture Overview
//!
//! ```text
//!  Client ──▶ http::server ──▶ access_control ──▶ gateway ──┬──▶ routing (classify path)
//!                                                           └──▶ session (decode cookie)
//!
//!  decision = RedirectTo(location) ──▶ 303 See Other ──▶ Client
//!  decision = Forward              ──▶ proxy handler ──▶ quote application
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use quote_gateway::audit::{spawn_audit_writer, AuditSink, ChannelAuditSink, TracingAuditSink};
use quote_gateway::config::{load_or_default, SecretKey};
use quote_gateway::http::{AccessControlState, HttpServer};
use quote_gateway::observability::{logging, metrics};
use quote_gateway::AccessGateway;

#[derive(Parser)]
#[command(name = "quote-gateway")]
#[command(about = "Session-checking gateway in front of the quote application", long_about = None)]
struct Args {
    /// Path to the TOML configuration file. Defaults are used when omitted.
    #[arg(short, long, env = "QUOTE_GATEWAY_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = load_or_default(args.config.as_deref()).context("invalid configuration")?;

    logging::init_logging(&config.observability).context("failed to initialize logging")?;
    tracing::info!("quote-gateway v{} starting", env!("CARGO_PKG_VERSION"));

    let key = SecretKey::from_env(&config.session.secret_env, config.session.min_secret_len)
        .context("refusing to start without a session secret")?;
    let gateway = Arc::new(AccessGateway::from_config(&config, &key)?);

    tracing::info!(
        bind_address = %config.listener.bind_address,
        upstream = %config.upstream.address,
        protected = config.routes.protected.len(),
        public = config.routes.public.len(),
        login_path = %config.routes.login_path,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        let addr = config
            .observability
            .metrics_address
            .parse()
            .context("invalid metrics address")?;
        metrics::init_metrics(addr).context("failed to start metrics endpoint")?;
    }

    let mut access = AccessControlState::new(gateway, &config.session.cookie_name);
    if config.audit.enabled {
        let (sink, rx) = ChannelAuditSink::new(config.audit.buffer);
        spawn_audit_writer(rx, TracingAuditSink);
        let sink: Arc<dyn AuditSink> = Arc::new(sink);
        access = access.with_audit(sink, config.audit.record_anonymous);
    }

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", config.listener.bind_address))?;

    let server = HttpServer::new(config, access)?;
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
