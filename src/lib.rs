pub mod analysis;
pub mod calendar;
pub mod chart;
mod commands;
mod config;
mod error;
pub mod models;
mod routes;
mod state;
pub mod store;
pub mod time;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, ServerConfig, StoreConfig};
pub use error::{ApiError, ApiResult};
pub use routes::{app, ServerRoutes};
pub use state::AppState;
pub use store::{StoreClient, StoreError};

use env_logger::{Builder, Env};
use log::info;
use std::sync::Arc;
use tokio::net::TcpListener;

pub async fn run() -> color_eyre::Result<()> {
  // Load environment variables from .env file
  dotenvy::dotenv().ok();
  Builder::from_env(Env::default().default_filter_or("info")).init();

  let store_config = StoreConfig::from_env()?;
  let server_config = ServerConfig::from_env()?;

  info!("Using data store at {}", store_config.base_url);
  let state = Arc::new(AppState::new(StoreClient::new(store_config)));

  let listener = TcpListener::bind(server_config.bind_addr).await?;
  info!("listen at: http://{}", server_config.bind_addr);

  axum::serve(listener, app(state)).await?;
  Ok(())
}
