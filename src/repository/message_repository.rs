use async_trait::async_trait;
use chrono::Utc;

use crate::{
    domain::{validation, Message, MessageCounts, MessageInput},
    error::Result,
    repository::{Collection, MessageRepository, Resource},
    seed::defaults,
    store::Storage,
};

impl Resource for Message {
    const KEY: &'static str = "messages";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn defaults() -> Vec<Self> {
        defaults::messages()
    }
}

pub struct StoreMessageRepository {
    collection: Collection<Message>,
}

impl StoreMessageRepository {
    pub fn new(storage: Storage) -> Self {
        Self {
            collection: Collection::new(storage),
        }
    }
}

#[async_trait]
impl MessageRepository for StoreMessageRepository {
    async fn list(&self) -> Result<Vec<Message>> {
        self.collection.list_all().await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Message>> {
        self.collection.find(id).await
    }

    async fn create(&self, input: MessageInput) -> Result<Message> {
        input.validate()?;
        let now = Utc::now();

        let message = self
            .collection
            .insert(|id| Message::from_input(id, input, now))
            .await?;
        tracing::info!("Received message {} from {}", message.id, message.email);
        Ok(message)
    }

    async fn update(&self, id: &str, input: MessageInput) -> Result<Message> {
        input.validate()?;
        let now = Utc::now();

        self.collection
            .replace(id, |current| {
                let mut updated = current.clone();
                updated.name = input.name;
                updated.email = input.email;
                updated.subject = input.subject;
                updated.message = input.message;
                updated.updated_at = now;
                Ok(updated)
            })
            .await
    }

    async fn delete(&self, id: &str) -> Result<()> {
        self.collection.remove(id).await?;
        tracing::info!("Deleted message {}", id);
        Ok(())
    }

    async fn mark_read(&self, id: &str) -> Result<Message> {
        let now = Utc::now();
        self.collection
            .replace(id, |current| {
                let mut updated = current.clone();
                if !updated.read {
                    updated.read = true;
                    updated.updated_at = now;
                }
                Ok(updated)
            })
            .await
    }

    async fn reply(&self, id: &str, content: &str) -> Result<Message> {
        validation::require("replyContent", content)?;
        let now = Utc::now();

        let message = self
            .collection
            .replace(id, |current| {
                let mut updated = current.clone();
                updated.read = true;
                updated.replied = true;
                updated.reply_content = Some(content.to_string());
                updated.replied_at = Some(now);
                updated.updated_at = now;
                Ok(updated)
            })
            .await?;

        tracing::info!(
            to = %message.email,
            subject = %format!("Re: {}", message.subject),
            "Simulated reply email dispatched"
        );
        Ok(message)
    }

    async fn counts(&self) -> Result<MessageCounts> {
        Ok(MessageCounts::from_slice(&self.collection.list_all().await?))
    }
}
