//! Operational helpers: logging, persisted-state codec and token storage.

use std::path::PathBuf;

use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use yourdle_types::{config::OpsConfig, Result, YourdleError};

pub mod codec;
pub mod cookie;
pub mod store;

pub use codec::PersistedStateCodec;
pub use cookie::CookieSettings;
pub use store::{CookieJarStore, FileStateStore, MemoryStateStore, StateStore};

pub fn init_tracing(config: &OpsConfig) -> Result<()> {
    let filter = EnvFilter::try_new(config.log_level.clone())
        .or_else(|_| EnvFilter::try_new("info"))
        .map_err(|err| YourdleError::Ops(format!("failed to create log filter: {err}")))?;

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| YourdleError::Ops(format!("tracing init error: {err}")))?;
    Ok(())
}

pub fn ensure_state_dir(path: &str) -> Result<PathBuf> {
    let dir = PathBuf::from(path);
    std::fs::create_dir_all(&dir)
        .map_err(|err| storage_error(format!("failed to create state dir: {err}")))?;
    info!("State directory ready at {:?}", dir);
    Ok(dir)
}

pub fn storage_error(message: impl Into<String>) -> YourdleError {
    YourdleError::Storage(message.into())
}
