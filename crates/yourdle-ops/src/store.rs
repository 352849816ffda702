//! Durable homes for persisted-state tokens, one token per game slug.

use std::{collections::HashMap, io::ErrorKind, path::PathBuf, sync::Arc};

use async_trait::async_trait;
use tokio::{fs, sync::Mutex};
use tracing::debug;
use yourdle_types::Result;

use crate::{cookie::CookieSettings, storage_error};

#[async_trait]
pub trait StateStore: Send + Sync {
    /// The stored token, or `None` on first play.
    async fn load(&self, slug: &str) -> Result<Option<String>>;
    async fn save(&self, slug: &str, token: &str) -> Result<()>;
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Clone, Default)]
pub struct MemoryStateStore {
    tokens: Arc<Mutex<HashMap<String, String>>>,
    writes: Arc<Mutex<usize>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, slug: &str, token: impl Into<String>) {
        self.tokens.lock().await.insert(slug.to_string(), token.into());
    }

    pub async fn token(&self, slug: &str) -> Option<String> {
        self.tokens.lock().await.get(slug).cloned()
    }

    pub async fn write_count(&self) -> usize {
        *self.writes.lock().await
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn load(&self, slug: &str) -> Result<Option<String>> {
        Ok(self.token(slug).await)
    }

    async fn save(&self, slug: &str, token: &str) -> Result<()> {
        self.insert(slug, token).await;
        *self.writes.lock().await += 1;
        Ok(())
    }
}

/// Keeps each slug's token in `<state_dir>/<prefix>-<slug>.token`.
pub struct FileStateStore {
    dir: PathBuf,
    cookies: CookieSettings,
}

impl FileStateStore {
    pub fn new(dir: impl Into<PathBuf>, cookies: CookieSettings) -> Self {
        Self {
            dir: dir.into(),
            cookies,
        }
    }

    fn path_for(&self, slug: &str) -> PathBuf {
        self.dir
            .join(format!("{}.token", self.cookies.cookie_name(slug)))
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn load(&self, slug: &str) -> Result<Option<String>> {
        let path = self.path_for(slug);
        match fs::read_to_string(&path).await {
            Ok(token) => Ok(Some(token.trim().to_string())),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error(format!(
                "failed to read {}: {err}",
                path.display()
            ))),
        }
    }

    async fn save(&self, slug: &str, token: &str) -> Result<()> {
        fs::create_dir_all(&self.dir).await.map_err(|err| {
            storage_error(format!("failed to create {}: {err}", self.dir.display()))
        })?;
        let path = self.path_for(slug);
        fs::write(&path, token)
            .await
            .map_err(|err| storage_error(format!("failed to write {}: {err}", path.display())))?;
        debug!("Saved state token to {:?}", path);
        Ok(())
    }
}

/// Store backed by a browser-style cookie header.
///
/// Reads come from the current `Cookie` header; every save rewrites the pair
/// and remembers the `Set-Cookie` value a server would send back.
#[derive(Clone)]
pub struct CookieJarStore {
    settings: CookieSettings,
    header: Arc<Mutex<String>>,
    last_set_cookie: Arc<Mutex<Option<String>>>,
}

impl CookieJarStore {
    pub fn new(settings: CookieSettings, cookie_header: impl Into<String>) -> Self {
        Self {
            settings,
            header: Arc::new(Mutex::new(cookie_header.into())),
            last_set_cookie: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn cookie_header(&self) -> String {
        self.header.lock().await.clone()
    }

    pub async fn last_set_cookie(&self) -> Option<String> {
        self.last_set_cookie.lock().await.clone()
    }
}

#[async_trait]
impl StateStore for CookieJarStore {
    async fn load(&self, slug: &str) -> Result<Option<String>> {
        let header = self.header.lock().await;
        Ok(self
            .settings
            .read_token(slug, &header)
            .map(str::to_string))
    }

    async fn save(&self, slug: &str, token: &str) -> Result<()> {
        let name = self.settings.cookie_name(slug);
        let mut header = self.header.lock().await;
        let mut pairs: Vec<String> = header
            .split("; ")
            .filter(|pair| !pair.is_empty())
            .filter(|pair| pair.split_once('=').map(|(key, _)| key) != Some(name.as_str()))
            .map(str::to_string)
            .collect();
        pairs.push(format!("{name}={token}"));
        *header = pairs.join("; ");
        *self.last_set_cookie.lock().await = Some(self.settings.set_cookie(slug, token));
        Ok(())
    }
}
