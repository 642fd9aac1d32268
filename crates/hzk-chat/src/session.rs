//! Client-side conversation session.

use crate::error::ChatError;
use crate::types::Content;
use crate::ChatClient;

/// One conversation with the model. History is appended only after a
/// successful exchange.
#[derive(Debug, Clone)]
pub struct ChatSession {
    client: ChatClient,
    history: Vec<Content>,
}

impl ChatSession {
    pub(crate) fn new(client: ChatClient) -> Self {
        Self {
            client,
            history: Vec::new(),
        }
    }

    /// Send `text` as the next user turn and return the model's reply.
    pub async fn send_message(&mut self, text: &str) -> Result<String, ChatError> {
        let mut contents = self.history.clone();
        contents.push(Content::user(text));

        let reply = self.client.generate(&contents).await?;
        let answer = reply.text();

        contents.push(reply);
        self.history = contents;
        Ok(answer)
    }

    /// Turns exchanged so far, oldest first.
    pub fn history(&self) -> &[Content] {
        &self.history
    }

    /// Drop the accumulated history.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}
