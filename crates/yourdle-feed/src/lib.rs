//! Read-only event feed the UI layer subscribes to.

use async_trait::async_trait;
use futures::{stream::BoxStream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::BroadcastStream;
use tracing::trace;
use yourdle_types::{events::SessionEvent, Result};

#[async_trait]
pub trait SessionFeed: Send + Sync {
    async fn publish(&self, event: SessionEvent) -> Result<()>;
    fn subscribe(&self) -> BoxStream<'static, SessionEvent>;
}

/// In-process feed backed by a broadcast channel. Slow subscribers drop events.
#[derive(Clone)]
pub struct LocalFeed {
    tx: broadcast::Sender<SessionEvent>,
}

impl LocalFeed {
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }
}

#[async_trait]
impl SessionFeed for LocalFeed {
    async fn publish(&self, event: SessionEvent) -> Result<()> {
        trace!("Publishing session event {}", event.id);
        // No subscribers is fine.
        let _ = self.tx.send(event);
        Ok(())
    }

    fn subscribe(&self) -> BoxStream<'static, SessionEvent> {
        BroadcastStream::new(self.tx.subscribe())
            .filter_map(|event| async move { event.ok() })
            .boxed()
    }
}

/// Feed that discards everything.
#[derive(Clone, Copy, Default)]
pub struct NullFeed;

#[async_trait]
impl SessionFeed for NullFeed {
    async fn publish(&self, _event: SessionEvent) -> Result<()> {
        Ok(())
    }

    fn subscribe(&self) -> BoxStream<'static, SessionEvent> {
        futures::stream::empty().boxed()
    }
}
