//! room-relay entry point.
//!
//! Joins the configured room channel and bridges it to an application
//! speaking JSON lines on stdin/stdout. Logs and the chat message list go to
//! stderr.

use std::time::Duration;

use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use room_relay::app::{WriterList, app_ports, stdio};
use room_relay::channel::{connect, socket_url};
use room_relay::config::RelayConfig;
use room_relay::relay::RelaySession;

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = RelayConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(config));
    // Stdin reads park a blocking thread that never finishes on its own.
    runtime.shutdown_timeout(Duration::from_millis(100));
    result
}

async fn run(config: RelayConfig) -> anyhow::Result<()> {
    let identity = config.identity()?;
    let topic = identity.topic();
    let url = socket_url(&config.socket_url, config.user_token.as_deref())?;
    tracing::info!(
        room = %identity.room(),
        player = %identity.player(),
        variant = %config.variant,
        "starting room-relay"
    );

    // Connect and join
    let (channel, transport) = connect(
        &url,
        topic,
        config.heartbeat_interval,
        config.port_capacity,
    )
    .await?;

    // Wire the application to stdin/stdout
    let (ports, app) = app_ports(config.port_capacity);
    let (sender, inbound) = app.into_split();
    let input = tokio::spawn(stdio::pump_commands(
        BufReader::new(tokio::io::stdin()),
        sender,
        config.variant,
    ));
    let output = tokio::spawn(stdio::pump_inbound(inbound, tokio::io::stdout()));

    // Relay until the socket closes
    let session = RelaySession::new(
        identity,
        config.variant,
        channel,
        ports,
        WriterList::new(std::io::stderr()),
    );
    let summary = session.run().await;
    tracing::info!(
        joined = ?summary.joined,
        delivered = summary.delivered,
        pushed = summary.pushed,
        "channel closed"
    );

    input.abort();
    transport.await?;
    output.await??;

    Ok(())
}
