use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::db::{service::DbService, DbPool};
use crate::llm::{
    models::{ChatOptions, Message as LlmMessage},
    LlmProvider,
};
use crate::relay::{Fragment, StreamRelay};

#[derive(Debug, Error)]
pub enum TurnError {
    #[error("Conversation not found")]
    ConversationNotFound,
    #[error("Database error: {0}")]
    Db(#[from] duckdb::Error),
}

/// Drives one full turn of the interaction: creates the pending assistant
/// message, drains the provider stream while fanning each chunk out through
/// the relay, then persists the assembled text and signals completion.
///
/// Built once at process start with its collaborators injected; handlers get
/// a shared reference through actix app data.
pub struct Orchestrator {
    pool: DbPool,
    llm: Arc<dyn LlmProvider>,
    relay: Arc<StreamRelay>,
}

impl Orchestrator {
    pub fn new(pool: DbPool, llm: Arc<dyn LlmProvider>, relay: Arc<StreamRelay>) -> Self {
        Self { pool, llm, relay }
    }

    /// Creates the empty assistant message and returns its id immediately;
    /// the streaming itself continues out-of-band of the caller's
    /// request/response cycle. The returned message is written exactly once,
    /// by the task spawned here, when its stream ends.
    pub fn run_turn(
        &self,
        conversation_id: Uuid,
        prompt: Vec<LlmMessage>,
    ) -> Result<Uuid, TurnError> {
        let message_id = {
            let conn = self.pool.lock().unwrap();

            if DbService::get_conversation(&conn, conversation_id)?.is_none() {
                return Err(TurnError::ConversationNotFound);
            }

            DbService::insert_message(&conn, conversation_id, "assistant", "")?.id
        };

        let pool = self.pool.clone();
        let llm = self.llm.clone();
        let relay = self.relay.clone();

        tokio::spawn(async move {
            Self::drive_stream(pool, llm, relay, conversation_id, message_id, prompt).await;
        });

        Ok(message_id)
    }

    async fn drive_stream(
        pool: DbPool,
        llm: Arc<dyn LlmProvider>,
        relay: Arc<StreamRelay>,
        conversation_id: Uuid,
        message_id: Uuid,
        prompt: Vec<LlmMessage>,
    ) {
        let (tx, mut rx) = mpsc::channel::<String>(100);

        // Run the provider request in the background so we can drain the
        // chunk channel here. A provider failure drops `tx`, which ends the
        // loop below with whatever was accumulated so far.
        let provider = llm.clone();
        tokio::spawn(async move {
            if let Err(e) = provider.stream_chat(&prompt, ChatOptions::default(), tx).await {
                error!("Provider stream for message {} ended early: {}", message_id, e);
            }
        });

        let mut full_content = String::new();

        while let Some(chunk) = rx.recv().await {
            if chunk.is_empty() {
                continue;
            }
            full_content.push_str(&chunk);
            relay.publish(Fragment::token(conversation_id, message_id, chunk));
        }

        // Persist before the terminal marker: a subscriber that re-fetches
        // the conversation on is_final must see the finished content.
        {
            let conn = pool.lock().unwrap();
            if let Err(e) = DbService::update_message_content(&conn, message_id, &full_content) {
                error!("Failed to persist assistant message {}: {}", message_id, e);
            }
        }

        relay.publish(Fragment::terminal(conversation_id, message_id));

        info!(
            "Turn complete for message {} ({} chars streamed via {})",
            message_id,
            full_content.len(),
            llm.name()
        );
    }
}
