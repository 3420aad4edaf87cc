//! OAuth 2.0 authorization-code relay with PKCE.
//!
//! The relay sits between an identity broker and a social-login provider
//! whose token endpoint wants an `app_id` and a `secret_key` header instead
//! of standard client credentials. It translates the broker's requests, keeps
//! the PKCE verifier, redirect target and state in short-lived signed
//! cookies, and passes provider errors through unchanged. Nothing is stored
//! server side.
//!
//! ```rust,no_run
//! use dayflow_relay::{serve, RelayConfig};
//!
//! # async fn example() -> Result<(), dayflow_relay::RelayError> {
//! let config = RelayConfig::from_env()?;
//! serve(config, "127.0.0.1:3000".parse().unwrap()).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod cookies;
pub mod error;
pub mod handlers;
pub mod pkce;
pub mod provider;
pub mod router;
pub mod state;

use std::net::SocketAddr;

use log::info;
use tokio::net::TcpListener;

pub use config::RelayConfig;
pub use error::{RelayError, Result};
pub use router::router;
pub use state::RelayState;

/// Binds `addr` and serves the relay until the process exits.
pub async fn serve(config: RelayConfig, addr: SocketAddr) -> Result<()> {
    let app = router(RelayState::new(config)?);
    let listener = TcpListener::bind(addr).await?;
    info!("Relay listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
