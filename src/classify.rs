//! Conversation classification.
//!
//! A single pass decides, per chat id, whether every message shares one sender
//! (a one-on-one conversation) or whether a second distinct sender was seen
//! (a group conversation, "banned" from the one-on-one lookup).

use std::collections::{BTreeSet, HashMap};
use std::collections::hash_map::Entry;

use crate::models::{ChatId, JoinedMessage};

/// Result of one classification scan over the joined table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatClassification {
    first_senders: HashMap<ChatId, Option<String>>,
    first_seen: Vec<ChatId>,
    banned: BTreeSet<ChatId>,
}

impl ChatClassification {
    /// Scan `rows` once.
    ///
    /// The first row of a chat id records its sender, `None` included. Any
    /// later row whose sender differs from the recorded one bans the id for
    /// good. Rows without a chat id belong to no conversation and are skipped.
    #[must_use]
    pub fn classify(rows: &[JoinedMessage]) -> Self {
        let mut classification = Self::default();
        for row in rows {
            let Some(chat_id) = row.chat_id else {
                continue;
            };
            match classification.first_senders.entry(chat_id) {
                Entry::Vacant(entry) => {
                    entry.insert(row.sender.clone());
                    classification.first_seen.push(chat_id);
                },
                Entry::Occupied(entry) => {
                    if *entry.get() != row.sender {
                        classification.banned.insert(chat_id);
                    }
                },
            }
        }
        classification
    }

    /// True if `chat_id` saw more than one distinct sender
    #[must_use]
    pub fn is_group(&self, chat_id: ChatId) -> bool {
        self.banned.contains(&chat_id)
    }

    /// Chat ids classified as group conversations, ascending
    #[must_use]
    pub const fn group_chat_ids(&self) -> &BTreeSet<ChatId> {
        &self.banned
    }

    /// Single sender of a one-on-one chat, `None` for groups, unknown ids
    /// and chats whose only sender is null
    #[must_use]
    pub fn sender_of(&self, chat_id: ChatId) -> Option<&str> {
        if self.is_group(chat_id) {
            return None;
        }
        self.first_senders.get(&chat_id)?.as_deref()
    }

    /// Sender to one-on-one chat id lookup.
    ///
    /// Built by inverting the chat-to-sender map in first-seen order, so when
    /// two clean chat ids share a sender the one seen last wins.
    #[must_use]
    pub fn dm_chat_ids(&self) -> HashMap<String, ChatId> {
        let mut senders_to_ids = HashMap::new();
        for chat_id in &self.first_seen {
            if self.banned.contains(chat_id) {
                continue;
            }
            if let Some(Some(sender)) = self.first_senders.get(chat_id) {
                senders_to_ids.insert(sender.clone(), *chat_id);
            }
        }
        senders_to_ids
    }
}

/// Map of contact to the chat id of their one-on-one conversation
#[must_use]
pub fn get_dm_chat_ids(rows: &[JoinedMessage]) -> HashMap<String, ChatId> {
    ChatClassification::classify(rows).dm_chat_ids()
}

/// Chat ids that represent group conversations
#[must_use]
pub fn get_group_chat_ids(rows: &[JoinedMessage]) -> BTreeSet<ChatId> {
    ChatClassification::classify(rows).banned
}
