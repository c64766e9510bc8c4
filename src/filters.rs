//! Row filters over the joined message table.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::classify::ChatClassification;
use crate::models::{ChatId, JoinedMessage};

/// Email addresses, `+`-prefixed numbers and anything starting with a digit
#[allow(clippy::expect_used)]
static NON_CONTACT_SENDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@|^\+|^\d").expect("non-contact pattern is valid"));

/// True if `sender` looks like a raw phone number or email address rather
/// than a resolved contact name
#[must_use]
pub fn is_non_contact(sender: &str) -> bool {
    NON_CONTACT_SENDER.is_match(sender)
}

/// Drop rows whose sender is a phone number, an email address, or missing
#[must_use]
pub fn remove_no_contact_senders(mut rows: Vec<JoinedMessage>) -> Vec<JoinedMessage> {
    rows.retain(|row| row.sender.as_deref().is_some_and(|s| !is_non_contact(s)));
    rows
}

/// Drop every row belonging to a group conversation.
///
/// Classification runs over `rows` as given, so earlier filters change which
/// chats count as groups.
#[must_use]
pub fn filter_groups(mut rows: Vec<JoinedMessage>) -> Vec<JoinedMessage> {
    let classification = ChatClassification::classify(&rows);
    rows.retain(|row| row.chat_id.is_none_or(|id| !classification.is_group(id)));
    rows
}

/// Drop every row of one conversation
#[must_use]
pub fn exclude_chat(mut rows: Vec<JoinedMessage>, chat_id: ChatId) -> Vec<JoinedMessage> {
    rows.retain(|row| row.chat_id != Some(chat_id));
    rows
}

/// Keep only the rows of one conversation
#[must_use]
pub fn single_chat(mut rows: Vec<JoinedMessage>, chat_id: ChatId) -> Vec<JoinedMessage> {
    rows.retain(|row| row.chat_id == Some(chat_id));
    rows
}

/// Keep only the rows sent by one sender
#[must_use]
pub fn single_sender(rows: &[JoinedMessage], sender: &str) -> Vec<JoinedMessage> {
    rows.iter()
        .filter(|row| row.sender.as_deref() == Some(sender))
        .cloned()
        .collect()
}

/// A filter step in the analysis pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatFilter {
    /// Remove phone-number, email and null senders
    RemoveNonContacts,
    /// Remove group conversations
    ExcludeGroups,
    /// Remove one conversation
    ExcludeChat(ChatId),
    /// Keep one conversation
    SingleChat(ChatId),
}

impl ChatFilter {
    /// Apply the filter
    #[must_use]
    pub fn apply(self, rows: Vec<JoinedMessage>) -> Vec<JoinedMessage> {
        let before = rows.len();
        let kept = match self {
            Self::RemoveNonContacts => remove_no_contact_senders(rows),
            Self::ExcludeGroups => filter_groups(rows),
            Self::ExcludeChat(chat_id) => exclude_chat(rows, chat_id),
            Self::SingleChat(chat_id) => single_chat(rows, chat_id),
        };
        debug!(filter = %self, before, after = kept.len(), "Applied filter");
        kept
    }

    /// Short name used in logs and metric labels
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::RemoveNonContacts => "remove_non_contacts",
            Self::ExcludeGroups => "exclude_groups",
            Self::ExcludeChat(_) => "exclude_chat",
            Self::SingleChat(_) => "single_chat",
        }
    }
}

impl fmt::Display for ChatFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExcludeChat(id) | Self::SingleChat(id) => write!(f, "{}({id})", self.name()),
            _ => f.write_str(self.name()),
        }
    }
}
