use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::proxy::Forwarder;

/// Binds the configured address and serves until the accept loop fails.
pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let binding = cfg.binding()?;
    let listener = TcpListener::bind(&cfg.server.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.server.listen_addr))?;
    info!(
        "Listening on {}, forwarding to {}",
        cfg.server.listen_addr,
        binding.display_name()
    );

    serve(listener, Forwarder::from_binding(binding)).await
}

/// Accepts connections on `listener`, each served on its own task.
pub async fn serve(listener: TcpListener, forwarder: Forwarder) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = listener.accept().await?;
        info!("Accepted connection from {}", peer);

        let forwarder = forwarder.clone();
        tokio::spawn(async move {
            let mut conn = Connection::new(socket, forwarder);
            if let Err(e) = conn.run().await {
                tracing::error!("Connection error from {}: {}", peer, e);
            }
        });
    }
}
