use serde::Serialize;
use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;
use uuid::Uuid;

/// One incremental piece of an assistant message in transit. Never persisted;
/// it exists only between the orchestrator and live subscribers.
#[derive(Debug, Clone, Serialize)]
pub struct Fragment {
    pub conversation_id: Uuid,
    pub message_id: Uuid,
    pub content: String,
    pub is_final: bool,
}

impl Fragment {
    pub fn token(conversation_id: Uuid, message_id: Uuid, content: String) -> Self {
        Self {
            conversation_id,
            message_id,
            content,
            is_final: false,
        }
    }

    /// Terminal marker: no more fragments will arrive for this message.
    pub fn terminal(conversation_id: Uuid, message_id: Uuid) -> Self {
        Self {
            conversation_id,
            message_id,
            content: String::new(),
            is_final: true,
        }
    }
}

pub type SubscriberId = Uuid;

/// Fan-out of in-flight fragments to the live subscribers of a conversation.
///
/// Delivery is best-effort: no backlog replay for late joiners, and a
/// fragment published with zero subscribers is dropped. Each subscriber's
/// channel preserves publish order for one conversation.
#[derive(Default)]
pub struct StreamRelay {
    subscribers: Mutex<HashMap<Uuid, HashMap<SubscriberId, UnboundedSender<Fragment>>>>,
}

impl StreamRelay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handle for all future fragments of the conversation.
    /// Re-subscribing the same subscriber replaces its previous binding.
    pub fn subscribe(
        &self,
        conversation_id: Uuid,
        subscriber_id: SubscriberId,
        tx: UnboundedSender<Fragment>,
    ) {
        let mut map = self.subscribers.lock().unwrap();
        map.entry(conversation_id)
            .or_default()
            .insert(subscriber_id, tx);
        debug!(
            "Subscriber {} joined conversation {} ({} active)",
            subscriber_id,
            conversation_id,
            map[&conversation_id].len()
        );
    }

    /// Delivers the fragment to every current subscriber of its conversation.
    /// Handles whose receiving side is gone are pruned here.
    pub fn publish(&self, fragment: Fragment) {
        let mut map = self.subscribers.lock().unwrap();

        let Some(handles) = map.get_mut(&fragment.conversation_id) else {
            return;
        };

        handles.retain(|_, tx| tx.send(fragment.clone()).is_ok());

        if handles.is_empty() {
            map.remove(&fragment.conversation_id);
        }
    }

    /// Drops every binding of the subscriber, across all conversations.
    /// Called when a client connection closes.
    pub fn remove_subscriber(&self, subscriber_id: SubscriberId) {
        let mut map = self.subscribers.lock().unwrap();
        map.retain(|_, handles| {
            handles.remove(&subscriber_id);
            !handles.is_empty()
        });
    }

    pub fn subscriber_count(&self, conversation_id: Uuid) -> usize {
        let map = self.subscribers.lock().unwrap();
        map.get(&conversation_id).map_or(0, |h| h.len())
    }
}
