//! Joins messages with their sender identity and conversation id.

use std::collections::HashMap;

use crate::models::{ChatId, ChatMessageLink, Handle, JoinedMessage, Message, MessageId};

/// Left-join messages to handles on `handle_id`, then to membership links on
/// `message_id`.
///
/// Message order is kept. A message with no link appears once with
/// `chat_id = None`; a message with several links appears once per link, in
/// link order. Nothing is deduplicated.
#[must_use]
pub fn merge_data(messages: &[Message], handles: &[Handle], links: &[ChatMessageLink]) -> Vec<JoinedMessage> {
    let mut senders: HashMap<i64, &str> = HashMap::with_capacity(handles.len());
    for handle in handles {
        senders.entry(handle.handle_id).or_insert(handle.sender.as_str());
    }

    let mut chats: HashMap<MessageId, Vec<ChatId>> = HashMap::new();
    for link in links {
        chats.entry(link.message_id).or_default().push(link.chat_id);
    }

    let mut joined = Vec::with_capacity(messages.len());
    for message in messages {
        let sender = senders.get(&message.handle_id).map(|s| (*s).to_string());
        match chats.get(&message.message_id) {
            Some(chat_ids) => {
                joined.extend(
                    chat_ids
                        .iter()
                        .map(|chat_id| JoinedMessage::from_message(message, sender.clone(), Some(*chat_id))),
                );
            },
            None => joined.push(JoinedMessage::from_message(message, sender, None)),
        }
    }
    joined
}
