//! boxwire CLI: run the secure echo server or send one message to it.

#![forbid(unsafe_code)]

use std::io::Write;
use std::net::{IpAddr, SocketAddr};

use anyhow::{Context, Result};
use boxwire_common::config::{DEFAULT_BIND_HOST, DEFAULT_CLIENT_HOST};
use boxwire_common::RunMode;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "boxwire")]
#[command(about = "Secure echo over an X25519 key exchange and sealed records")]
#[command(version)]
struct Args {
    /// Listen mode. Specify port
    #[arg(short = 'l', long = "listen", env = "BOXWIRE_LISTEN_PORT")]
    listen: Option<u16>,

    /// Address to bind in listen mode
    #[arg(long, default_value_t = DEFAULT_BIND_HOST)]
    bind: IpAddr,

    /// Server host to dial in client mode
    #[arg(long, default_value = DEFAULT_CLIENT_HOST)]
    host: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Server port (client mode)
    port: Option<u16>,

    /// Message to send (client mode)
    message: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    boxwire_common::init_tracing_with_default(&args.log_level);

    let mode = RunMode::resolve(args.listen, args.bind, &args.host, args.port, args.message)?;

    match mode {
        RunMode::Server { listen } => run_server(listen).await,
        RunMode::Client { server, message } => run_client(&server, &message).await,
    }
}

async fn run_server(listen: SocketAddr) -> Result<()> {
    info!("Starting boxwire v{}", env!("CARGO_PKG_VERSION"));

    let listener = TcpListener::bind(listen)
        .await
        .with_context(|| format!("failed to listen on {}", listen))?;

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("cannot listen for ctrl-c, running until killed: {}", e);
            std::future::pending::<()>().await;
        }
    };

    boxwire_channel::serve_with_shutdown(listener, shutdown)
        .await
        .context("accept loop failed")?;
    Ok(())
}

async fn run_client(server: &str, message: &str) -> Result<()> {
    let reply = boxwire_channel::send_message(server, message.as_bytes())
        .await
        .with_context(|| format!("echo via {} failed", server))?;

    let stdout = std::io::stdout();
    write_reply(&mut stdout.lock(), &reply).context("failed to write reply")?;
    Ok(())
}

/// Write the echoed bytes unchanged, followed by a newline.
fn write_reply<W: Write>(out: &mut W, reply: &[u8]) -> std::io::Result<()> {
    out.write_all(reply)?;
    out.write_all(b"\n")?;
    out.flush()
}
