//! Chat database schema definitions
//!
//! Table and column names read from an iMessage-style `chat.db`. Only the
//! columns the analysis needs are listed.

/// Messages table schema
pub mod message {
    /// Table name
    pub const TABLE: &str = "message";
    /// Implicit SQLite row id, used as the message id
    pub const ROWID: &str = "ROWID";
    /// Message text content column
    pub const TEXT: &str = "text";
    /// Foreign key to `handle.ROWID`
    pub const HANDLE_ID: &str = "handle_id";
    /// Nanoseconds since 2001-01-01T00:00:00Z
    pub const DATE: &str = "date";
    /// Flag set on outgoing messages
    pub const IS_SENT: &str = "is_sent";
}

/// Handles table schema
pub mod handle {
    /// Table name
    pub const TABLE: &str = "handle";
    /// Implicit SQLite row id, referenced by `message.handle_id`
    pub const ROWID: &str = "ROWID";
    /// Sender identity: contact name, phone number or email
    pub const ID: &str = "id";
}

/// Chat membership link table schema
pub mod chat_message_join {
    /// Table name
    pub const TABLE: &str = "chat_message_join";
    /// Conversation id
    pub const CHAT_ID: &str = "chat_id";
    /// Foreign key to `message.ROWID`
    pub const MESSAGE_ID: &str = "message_id";
}

/// Every table the loader requires.
pub const REQUIRED_TABLES: [&str; 3] = [message::TABLE, handle::TABLE, chat_message_join::TABLE];
