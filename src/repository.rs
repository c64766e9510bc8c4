//! Source of the three raw record sets the pipeline consumes.

use crate::error::Result;
use crate::models::{ChatMessageLink, Handle, Message};

/// Anything that can produce messages, handles and chat membership links.
///
/// [`crate::db::ChatDatabase`] reads them from a `chat.db` file.
#[cfg_attr(test, mockall::automock)]
pub trait MessageSource {
    /// All rows of the message table, timestamps already converted
    fn load_messages(&self) -> Result<Vec<Message>>;
    /// All rows of the handle table
    fn load_handles(&self) -> Result<Vec<Handle>>;
    /// All rows of the chat membership link table
    fn load_chat_message_links(&self) -> Result<Vec<ChatMessageLink>>;
}
