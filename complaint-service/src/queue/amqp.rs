//! RabbitMQ transport built on lapin.
//!
//! Every [`AmqpTransport::open`] creates a fresh connection and channel,
//! declares the target queue and enables publisher confirms. Closing the
//! channel tears the connection down again.

use async_trait::async_trait;
use lapin::{
    options::{BasicPublishOptions, ConfirmSelectOptions, QueueDeclareOptions},
    types::FieldTable,
    BasicProperties, Channel, Connection, ConnectionProperties,
};
use tracing::{debug, warn};

use super::transport::{OutboundMessage, QueueChannel, QueueTransport, TransportError};

/// Transport that connects to an AMQP broker by URI.
#[derive(Clone)]
pub struct AmqpTransport {
    uri: String,
}

impl AmqpTransport {
    /// Create a transport for the given AMQP URI.
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }
}

impl std::fmt::Debug for AmqpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The URI carries credentials.
        f.debug_struct("AmqpTransport")
            .field("uri_length", &self.uri.len())
            .finish()
    }
}

#[async_trait]
impl QueueTransport for AmqpTransport {
    async fn open(&self, queue: &str) -> Result<Box<dyn QueueChannel>, TransportError> {
        debug!(queue = %queue, "amqp_connecting");

        let connection = Connection::connect(&self.uri, ConnectionProperties::default()).await?;

        let channel = match prepare_channel(&connection, queue).await {
            Ok(channel) => channel,
            Err(e) => {
                if let Err(close_err) = connection.close(200, "Channel setup failed").await {
                    warn!(error = %close_err, "amqp_connection_close_error");
                }
                return Err(e);
            }
        };

        debug!(queue = %queue, "amqp_channel_ready");

        Ok(Box::new(AmqpChannel {
            queue: queue.to_string(),
            connection,
            channel,
        }))
    }
}

/// Create a channel, declare the queue (idempotent) and turn on confirms.
async fn prepare_channel(connection: &Connection, queue: &str) -> Result<Channel, TransportError> {
    let channel = connection.create_channel().await?;

    channel
        .queue_declare(
            queue,
            QueueDeclareOptions {
                durable: true,
                ..Default::default()
            },
            FieldTable::default(),
        )
        .await?;

    channel
        .confirm_select(ConfirmSelectOptions::default())
        .await?;

    Ok(channel)
}

struct AmqpChannel {
    queue: String,
    connection: Connection,
    channel: Channel,
}

#[async_trait]
impl QueueChannel for AmqpChannel {
    async fn send(&self, message: OutboundMessage) -> Result<(), TransportError> {
        let mut properties = BasicProperties::default()
            .with_delivery_mode(2) // Persistent
            .with_content_type(message.content_type.into());
        if let Some(id) = &message.message_id {
            properties = properties.with_message_id(id.clone().into());
        }

        let confirmation = self
            .channel
            .basic_publish(
                "",
                &self.queue,
                BasicPublishOptions::default(),
                &message.body,
                properties,
            )
            .await?
            .await?;

        if confirmation.is_nack() {
            return Err(TransportError::Rejected);
        }

        Ok(())
    }

    async fn close(self: Box<Self>) -> Result<(), TransportError> {
        let channel_result = self.channel.close(200, "Normal shutdown").await;
        if let Err(e) = &channel_result {
            warn!(queue = %self.queue, error = %e, "amqp_channel_close_error");
        }

        self.connection.close(200, "Normal shutdown").await?;
        channel_result.map_err(TransportError::from)
    }
}
