//! Row types as read from the store. Timestamps stay as the stored text;
//! callers parse them with [`parse_timestamp`].

use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;

pub struct ChatRow {
    pub id: i64,
    pub name: Option<String>,
    pub avatar_emoji: Option<String>,
    pub is_group: bool,
    pub last_message: Option<String>,
    pub unread: i64,
    pub last_message_time: Option<String>,
    /// Online flag of some other member of the chat, if there is one.
    pub peer_online: Option<bool>,
}

pub struct MessageRow {
    pub id: i64,
    pub text: String,
    pub sender_id: i64,
    pub is_encrypted: bool,
    pub created_at: String,
    pub sender_username: Option<String>,
}

/// A freshly inserted message.
pub struct InsertedMessage {
    pub id: i64,
    pub created_at: String,
}

pub struct ContactRow {
    pub id: i64,
    pub display_name: Option<String>,
    pub avatar_emoji: Option<String>,
    pub is_online: bool,
    pub status: Option<String>,
    pub last_seen: Option<String>,
}

pub struct UserRow {
    pub id: i64,
    pub display_name: Option<String>,
    pub username: Option<String>,
    pub avatar_emoji: Option<String>,
    pub is_online: bool,
    pub is_admin: bool,
    pub created_at: String,
    pub is_blocked: bool,
}

pub struct ActivityRow {
    pub messages_sent: i64,
    pub messages_received: i64,
    pub calls_made: i64,
    pub files_shared: i64,
    pub rating_score: i64,
    pub last_activity: Option<String>,
}

pub struct NewChannel<'a> {
    pub name: &'a str,
    pub description: &'a str,
    pub avatar_emoji: &'a str,
    pub creator_id: i64,
    pub is_channel: bool,
}

pub struct NewBlock<'a> {
    pub user_id: i64,
    pub blocked_by: i64,
    pub reason: &'a str,
}

/// Parse a stored timestamp. SQLite writes `YYYY-MM-DD HH:MM:SS` in UTC
/// without a zone; fractional seconds and a `T` separator are also accepted.
pub fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    const FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| anyhow!("Corrupt timestamp '{}'", raw))
}
