use anyhow::{Context, Result};
use std::net::{IpAddr, SocketAddr};
use tokio::net::{TcpListener, TcpSocket};
use tracing::{info, info_span, warn, Instrument};

use crate::config::ServerConfig;
use crate::files::DocumentRoot;
use crate::http::connection::Connection;
use crate::server::shutdown::ShutdownReceiver;

/// Creates the listening socket with `SO_REUSEADDR` and the configured backlog.
pub fn bind(cfg: &ServerConfig) -> Result<TcpListener> {
    let ip: IpAddr = cfg
        .bind_addr
        .parse()
        .with_context(|| format!("Invalid bind address {}", cfg.bind_addr))?;
    let addr = SocketAddr::new(ip, cfg.port);

    let socket = match addr {
        SocketAddr::V4(_) => TcpSocket::new_v4(),
        SocketAddr::V6(_) => TcpSocket::new_v6(),
    }
    .context("Failed to create socket")?;

    socket.set_reuseaddr(true).context("Failed to set SO_REUSEADDR")?;
    socket
        .bind(addr)
        .with_context(|| format!("Failed to bind {}", addr))?;

    let listener = socket
        .listen(cfg.backlog)
        .with_context(|| format!("Failed to listen on {}", addr))?;
    info!("Listening on {}", addr);

    Ok(listener)
}

/// Accepts and services connections one at a time, in acceptance order,
/// until shutdown is requested.
pub async fn serve(
    listener: TcpListener,
    docroot: &DocumentRoot,
    cfg: &ServerConfig,
    mut shutdown: ShutdownReceiver,
) -> Result<()> {
    loop {
        let (socket, peer) = tokio::select! {
            biased;

            _ = shutdown.wait() => {
                info!("Shutdown signal received, no longer accepting connections");
                return Ok(());
            }

            accepted = listener.accept() => match accepted {
                Ok(pair) => pair,
                Err(e) => {
                    warn!(error = %e, "Accept failed");
                    continue;
                }
            },
        };
        info!("Accepted connection from {}", peer);

        Connection::new(socket, docroot, cfg)
            .run()
            .instrument(info_span!("conn", %peer))
            .await;
    }
}
