//! Reconciles a per-chat message list across three sources: the optimistic
//! local append at send time, the persisted row returned by the insert call,
//! and the realtime feed, which is at-least-once and unordered relative to
//! the viewer's own writes. All three paths funnel through one reducer,
//! `ChatProjection::apply`, so no pair of handlers can race each other into
//! a duplicate entry.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::attachment::Attachment;
use super::chat_models::MessageResponse;

/// A locally composed message, appended before the insert round-trips.
#[derive(Debug, Clone)]
pub struct OutgoingMessage {
    /// Temporary local id; replaced by the persisted id on reconciliation.
    pub temp_id: Uuid,
    /// Correlation id echoed back by the backend.
    pub client_ref: Uuid,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub attachment: Option<Attachment>,
    pub sent_at: DateTime<Utc>,
}

impl OutgoingMessage {
    pub fn new(
        sender_id: Uuid,
        receiver_id: Uuid,
        content: String,
        attachment: Option<Attachment>,
    ) -> Self {
        Self {
            temp_id: Uuid::new_v4(),
            client_ref: Uuid::new_v4(),
            sender_id,
            receiver_id,
            content,
            attachment,
            sent_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatEntry {
    pub id: Uuid,
    pub client_ref: Option<Uuid>,
    pub sender_id: Uuid,
    pub receiver_id: Uuid,
    pub content: String,
    pub attachment: Option<Attachment>,
    pub is_read: bool,
    pub is_optimistic: bool,
    pub sender_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ChatEntry {
    fn durable(message: MessageResponse, sender_name: Option<String>) -> Self {
        Self {
            id: message.id,
            client_ref: message.client_ref,
            sender_id: message.sender_id,
            receiver_id: message.receiver_id,
            content: message.content,
            attachment: message.attachment,
            is_read: message.is_read,
            is_optimistic: false,
            sender_name,
            created_at: message.created_at,
        }
    }

    fn optimistic(outgoing: OutgoingMessage) -> Self {
        Self {
            id: outgoing.temp_id,
            client_ref: Some(outgoing.client_ref),
            sender_id: outgoing.sender_id,
            receiver_id: outgoing.receiver_id,
            content: outgoing.content,
            attachment: outgoing.attachment,
            is_read: false,
            is_optimistic: true,
            sender_name: None,
            created_at: outgoing.sent_at,
        }
    }
}

/// Everything that can change the projected list.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// Initial (or re-)load of the persisted page.
    Loaded(Vec<MessageResponse>),
    /// Optimistic local append at send time.
    Sent(OutgoingMessage),
    /// The persisted row returned by the insert call.
    Persisted(MessageResponse),
    /// A row-insert pushed over the realtime feed.
    FeedInsert {
        message: MessageResponse,
        sender_name: Option<String>,
    },
    /// The batch read-flip completed for these ids.
    ReadMarked(Vec<Uuid>),
}

/// Single owned in-memory projection of one chat for one viewer.
#[derive(Debug)]
pub struct ChatProjection {
    viewer_id: Uuid,
    entries: Vec<ChatEntry>,
}

impl ChatProjection {
    pub fn new(viewer_id: Uuid) -> Self {
        Self {
            viewer_id,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    /// Ids that still need the read-flip: durable entries addressed to the
    /// viewer and not yet read.
    pub fn unread_ids(&self) -> Vec<Uuid> {
        self.entries
            .iter()
            .filter(|e| !e.is_optimistic && !e.is_read && e.sender_id != self.viewer_id)
            .map(|e| e.id)
            .collect()
    }

    pub fn apply(&mut self, event: ChatEvent) {
        match event {
            ChatEvent::Loaded(messages) => {
                self.entries = messages
                    .into_iter()
                    .map(|m| ChatEntry::durable(m, None))
                    .collect();
                self.sort();
            }
            ChatEvent::Sent(outgoing) => {
                self.entries.push(ChatEntry::optimistic(outgoing));
            }
            ChatEvent::Persisted(message) => {
                self.reconcile(message, None);
            }
            ChatEvent::FeedInsert {
                message,
                sender_name,
            } => {
                self.reconcile(message, sender_name);
            }
            ChatEvent::ReadMarked(ids) => {
                for entry in &mut self.entries {
                    if ids.contains(&entry.id) {
                        entry.is_read = true;
                    }
                }
            }
        }
    }

    /// Folds a durable message into the list without ever duplicating it.
    /// Match order: persisted id (at-least-once redelivery), echoed
    /// client_ref, then the legacy value-equality heuristic against an
    /// optimistic entry from the same sender.
    fn reconcile(&mut self, message: MessageResponse, sender_name: Option<String>) {
        if let Some(existing) = self.entries.iter_mut().find(|e| e.id == message.id) {
            // Redelivery; keep the durable copy, refresh the read flag.
            existing.is_read = existing.is_read || message.is_read;
            return;
        }

        let matched = self.position_of_optimistic(&message);
        let entry = ChatEntry::durable(message, sender_name);

        match matched {
            Some(index) => self.entries[index] = entry,
            None => self.entries.push(entry),
        }
        self.sort();
    }

    fn position_of_optimistic(&self, message: &MessageResponse) -> Option<usize> {
        if let Some(client_ref) = message.client_ref {
            if let Some(index) = self
                .entries
                .iter()
                .position(|e| e.is_optimistic && e.client_ref == Some(client_ref))
            {
                return Some(index);
            }
        }

        // Older senders never set a client_ref; fall back to matching by
        // sender and content.
        self.entries.iter().position(|e| {
            e.is_optimistic && e.sender_id == message.sender_id && e.content == message.content
        })
    }

    fn sort(&mut self) {
        self.entries
            .sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn durable(
        sender: Uuid,
        receiver: Uuid,
        content: &str,
        client_ref: Option<Uuid>,
    ) -> MessageResponse {
        MessageResponse {
            id: Uuid::new_v4(),
            chat_id: Uuid::new_v4(),
            sender_id: sender,
            receiver_id: receiver,
            content: content.to_string(),
            attachment: None,
            is_read: false,
            client_ref,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_send_then_persist_replaces_optimistic() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut projection = ChatProjection::new(me);

        let outgoing = OutgoingMessage::new(me, them, "on my way".to_string(), None);
        let client_ref = outgoing.client_ref;
        projection.apply(ChatEvent::Sent(outgoing));
        assert!(projection.entries()[0].is_optimistic);

        let persisted = durable(me, them, "on my way", Some(client_ref));
        let persisted_id = persisted.id;
        projection.apply(ChatEvent::Persisted(persisted));

        assert_eq!(projection.entries().len(), 1);
        assert!(!projection.entries()[0].is_optimistic);
        assert_eq!(projection.entries()[0].id, persisted_id);
    }

    #[test]
    fn test_feed_echo_of_own_send_does_not_duplicate() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut projection = ChatProjection::new(me);

        let outgoing = OutgoingMessage::new(me, them, "got it".to_string(), None);
        let client_ref = outgoing.client_ref;
        projection.apply(ChatEvent::Sent(outgoing));

        // The feed can beat the insert response.
        let row = durable(me, them, "got it", Some(client_ref));
        let row_id = row.id;
        projection.apply(ChatEvent::FeedInsert {
            message: row.clone(),
            sender_name: None,
        });
        assert_eq!(projection.entries().len(), 1);
        assert_eq!(projection.entries()[0].id, row_id);

        // Insert response arrives afterwards; still one entry.
        projection.apply(ChatEvent::Persisted(row.clone()));
        assert_eq!(projection.entries().len(), 1);

        // At-least-once: the same feed event delivered again.
        projection.apply(ChatEvent::FeedInsert {
            message: row,
            sender_name: None,
        });
        assert_eq!(projection.entries().len(), 1);
    }

    #[test]
    fn test_value_equality_fallback_without_client_ref() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut projection = ChatProjection::new(me);

        let outgoing = OutgoingMessage::new(me, them, "legacy".to_string(), None);
        projection.apply(ChatEvent::Sent(outgoing));

        // A row persisted without the correlation id still matches by
        // sender + content.
        let row = durable(me, them, "legacy", None);
        projection.apply(ChatEvent::FeedInsert {
            message: row,
            sender_name: None,
        });

        assert_eq!(projection.entries().len(), 1);
        assert!(!projection.entries()[0].is_optimistic);
    }

    #[test]
    fn test_counterparty_insert_appends_with_name() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut projection = ChatProjection::new(me);

        let row = durable(them, me, "hello", None);
        projection.apply(ChatEvent::FeedInsert {
            message: row.clone(),
            sender_name: Some("ayo".to_string()),
        });

        assert_eq!(projection.entries().len(), 1);
        assert_eq!(projection.entries()[0].sender_name.as_deref(), Some("ayo"));
        assert_eq!(projection.unread_ids(), vec![row.id]);
    }

    #[test]
    fn test_identical_content_from_both_parties_is_not_merged() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut projection = ChatProjection::new(me);

        projection.apply(ChatEvent::Sent(OutgoingMessage::new(
            me,
            them,
            "ok".to_string(),
            None,
        )));

        // Counterparty says the same thing; different sender, so the
        // heuristic must not swallow it.
        let row = durable(them, me, "ok", None);
        projection.apply(ChatEvent::FeedInsert {
            message: row,
            sender_name: None,
        });

        assert_eq!(projection.entries().len(), 2);
    }

    #[test]
    fn test_out_of_order_feed_is_sorted_by_timestamp() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut projection = ChatProjection::new(me);

        let mut first = durable(them, me, "first", None);
        first.created_at = Utc::now() - Duration::minutes(2);
        let mut second = durable(them, me, "second", None);
        second.created_at = Utc::now() - Duration::minutes(1);

        projection.apply(ChatEvent::FeedInsert {
            message: second.clone(),
            sender_name: None,
        });
        projection.apply(ChatEvent::FeedInsert {
            message: first.clone(),
            sender_name: None,
        });

        let contents: Vec<&str> = projection
            .entries()
            .iter()
            .map(|e| e.content.as_str())
            .collect();
        assert_eq!(contents, vec!["first", "second"]);
    }

    #[test]
    fn test_read_marking() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut projection = ChatProjection::new(me);

        let row = durable(them, me, "read me", None);
        projection.apply(ChatEvent::FeedInsert {
            message: row.clone(),
            sender_name: None,
        });

        let unread = projection.unread_ids();
        assert_eq!(unread, vec![row.id]);

        projection.apply(ChatEvent::ReadMarked(unread));
        assert!(projection.unread_ids().is_empty());
        assert!(projection.entries()[0].is_read);
    }

    #[test]
    fn test_own_messages_never_counted_unread() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut projection = ChatProjection::new(me);

        projection.apply(ChatEvent::Loaded(vec![durable(me, them, "mine", None)]));
        assert!(projection.unread_ids().is_empty());
    }

    #[test]
    fn test_loaded_replaces_state() {
        let me = Uuid::new_v4();
        let them = Uuid::new_v4();
        let mut projection = ChatProjection::new(me);

        projection.apply(ChatEvent::FeedInsert {
            message: durable(them, me, "stale", None),
            sender_name: None,
        });
        projection.apply(ChatEvent::Loaded(vec![
            durable(them, me, "a", None),
            durable(me, them, "b", None),
        ]));

        assert_eq!(projection.entries().len(), 2);
    }
}
