//! Minimal IPN receiver.
//!
//! # Usage
//!
//! ```bash
//! NOWPAYMENTS_API_KEY=... NOWPAYMENTS_IPN_SECRET=... \
//!     RUST_LOG=debug cargo run -p nowpayments-http --example ipn_webhook --features full
//! ```
//!
//! # Environment Variables
//!
//! - `NOWPAYMENTS_API_KEY` - Merchant API key (required by the config loader)
//! - `NOWPAYMENTS_IPN_SECRET` - Secret used to verify callbacks
//! - `NOWPAYMENTS_SANDBOX` - `true` to target the sandbox
//! - `PORT` - Listen port (default: `8080`)
//! - `RUST_LOG` - Log level filter (default: `info`)
//!
//! A `.env` file in the working directory is loaded first.

use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;

use axum::Router;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use nowpayments::{ClientConfig, PaymentStatus};
use nowpayments_http::server::process_request_with_config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        tracing::error!("IPN receiver failed: {e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = ClientConfig::from_env()?;
    config.require_ipn_secret()?;
    tracing::info!(environment = ?config.environment(), "Loaded configuration");

    let port = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    let app = Router::new()
        .route("/ipn", post(ipn))
        .with_state(Arc::new(config));

    let addr = SocketAddr::from((Ipv4Addr::UNSPECIFIED, port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening for IPN callbacks on http://{addr}/ipn");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Received Ctrl-C, shutting down...");
        })
        .await?;
    Ok(())
}

async fn ipn(
    State(config): State<Arc<ClientConfig>>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    let payload = match process_request_with_config(&config, &headers, &body) {
        Ok(Some(payload)) => payload,
        Ok(None) => {
            tracing::warn!("Rejected IPN callback");
            return StatusCode::BAD_REQUEST;
        }
        Err(e) => {
            tracing::error!("Cannot verify IPN callback: {e}");
            return StatusCode::INTERNAL_SERVER_ERROR;
        }
    };

    let notification = payload.notification();
    let status = payload.status();
    tracing::info!(
        payment_id = ?notification.payment_id,
        order_id = ?notification.order_id,
        status = %status,
        "Verified IPN callback"
    );

    match status {
        PaymentStatus::Finished => tracing::info!("Payment complete, fulfilling order"),
        PaymentStatus::PartiallyPaid => tracing::warn!(
            actually_paid = ?notification.actually_paid,
            "Customer underpaid"
        ),
        PaymentStatus::Failed | PaymentStatus::Expired => {
            tracing::warn!("Payment will not complete");
        }
        _ => tracing::debug!("Intermediate status, nothing to do"),
    }

    StatusCode::OK
}
