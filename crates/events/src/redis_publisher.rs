use async_trait::async_trait;
use domain::Event;
use redis::Client;
use redis::aio::ConnectionManager;

use crate::{PublishError, Publisher};

/// Publishes events as JSON on a Redis pub/sub channel.
///
/// The `ConnectionManager` reconnects on its own after connection failures,
/// so a publish that fails is not retried here.
#[derive(Clone)]
pub struct RedisPublisher {
    connection: ConnectionManager,
    channel: String,
}

impl RedisPublisher {
    /// Connects to Redis and verifies the connection with `PING`.
    pub async fn connect(url: &str, channel: impl Into<String>) -> Result<Self, PublishError> {
        tracing::info!(url, "connecting to Redis");

        let client = Client::open(url)?;
        let connection = ConnectionManager::new(client).await?;

        let mut conn = connection.clone();
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;

        let channel = channel.into();
        tracing::info!(%channel, "Redis publisher ready");

        Ok(Self {
            connection,
            channel,
        })
    }

    /// Wraps an existing connection.
    pub fn new(connection: ConnectionManager, channel: impl Into<String>) -> Self {
        Self {
            connection,
            channel: channel.into(),
        }
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }
}

#[async_trait]
impl Publisher for RedisPublisher {
    #[tracing::instrument(skip(self, event), fields(channel = %self.channel, kind = %event.kind()))]
    async fn publish_event(&self, event: &Event) -> Result<(), PublishError> {
        let payload = serde_json::to_string(event)?;

        let mut conn = self.connection.clone();
        let receivers: i64 = redis::cmd("PUBLISH")
            .arg(&self.channel)
            .arg(payload)
            .query_async(&mut conn)
            .await?;

        tracing::debug!(receivers, "event published");
        Ok(())
    }
}
