use std::net::SocketAddr;

use anyhow::Result;
use tokio_util::sync::CancellationToken;

use crate::{context, rest, storage::SqliteStore};

pub async fn run(ctx: &context::Context, store: SqliteStore, addr: SocketAddr) -> Result<()> {
    log::info!("🌐 REST API: http://{}", addr);
    if let Some(path) = ctx.log_file.as_deref() {
        log::info!("📝 Log file: {}", path.to_string_lossy());
    }

    let shutdown = CancellationToken::new();
    let rest_shutdown = shutdown.clone();
    let mut rest_handle =
        tokio::spawn(async move { rest::serve(addr, store, rest_shutdown).await });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => log::info!("🧨 Ctrl-C received, shutting down..."),
        res = &mut rest_handle => {
            return match res {
                Ok(Ok(())) => {
                    log::error!("REST task exited unexpectedly");
                    Ok(())
                }
                Ok(Err(e)) => Err(e),
                Err(e) => Err(e.into()),
            };
        }
    }

    shutdown.cancel();
    match rest_handle.await {
        Ok(res) => res?,
        Err(e) => log::error!("REST task panicked: {}", e),
    }

    log::info!("✅ Shutdown complete");
    Ok(())
}
