use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::ServiceConfig;
use crate::dispatch::Dispatcher;
use crate::forward::HttpForwarder;
use crate::ingress::{self, IngressState};
use crate::transfer::Transfer;

pub async fn execute(config: ServiceConfig) -> Result<()> {
    config.validate()?;

    let forwarder = HttpForwarder::new(config.forward_url.clone(), config.forward_timeout())
        .context("Failed to build forwarding client")?;
    info!(
        forward_url = forwarder.url(),
        message_loss = config.message_loss,
        frame_error = config.frame_error,
        "hamlink starting"
    );

    let transfer = Transfer::new(config.pipeline()?, forwarder);
    let dispatcher = Dispatcher::spawn(transfer, config.workers, config.queue_depth, config.seed);

    let listener = TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("Failed to bind {}", config.listen))?;
    let app = ingress::router(IngressState::new(dispatcher.handle()), config.body_limit());

    ingress::serve(listener, app, async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for shutdown signal");
        }
        info!("shutdown requested");
    })
    .await?;

    dispatcher.shutdown().await;
    Ok(())
}
