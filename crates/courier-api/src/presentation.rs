//! Display strings and placeholder values shown by the client.

pub const DEFAULT_CHAT_NAME: &str = "Чат";
pub const NO_MESSAGES: &str = "Нет сообщений";
pub const DEFAULT_CHAT_AVATAR: &str = "💬";
pub const DEFAULT_USER_AVATAR: &str = "👤";
pub const DEFAULT_CHANNEL_AVATAR: &str = "📢";
pub const DEFAULT_BLOCK_REASON: &str = "Нарушение правил";

pub const YESTERDAY: &str = "Вчера";
pub const SEEN_YESTERDAY: &str = "Был вчера";
pub const ONLINE: &str = "В сети";

pub const CLOCK_FORMAT: &str = "%H:%M";
pub const DAY_MONTH_FORMAT: &str = "%d.%m";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Identifier used when a request does not name one.
pub const DEFAULT_ID: i64 = 1;

/// `value`, unless it is missing or empty.
pub fn or_placeholder(value: Option<String>, placeholder: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}
