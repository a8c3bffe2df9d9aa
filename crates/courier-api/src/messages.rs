use tracing::{info, warn};

use courier_db::models::{MessageRow, parse_timestamp};
use courier_types::api::{MessageList, MessageView, SenderSide};

use crate::error::ApiError;
use crate::params::Params;
use crate::presentation::{CLOCK_FORMAT, DEFAULT_ID};
use crate::router::{Reply, Router};

pub fn get_messages(router: &Router, params: &Params) -> Result<Reply, ApiError> {
    let chat_id = params.lookup_id("chat_id", DEFAULT_ID)?;
    let user_id = params.lookup_id("user_id", DEFAULT_ID)?;

    let rows = router.open_store()?.get_messages(chat_id)?;

    let messages = rows
        .into_iter()
        .map(|row| view(row, user_id))
        .collect::<Result<Vec<_>, _>>()?;

    Reply::ok(&MessageList { messages })
}

fn view(row: MessageRow, viewer_id: i64) -> Result<MessageView, ApiError> {
    let created_at = parse_timestamp(&row.created_at)?;

    Ok(MessageView {
        id: row.id,
        text: row.text,
        sender: if row.sender_id == viewer_id {
            SenderSide::Me
        } else {
            SenderSide::Other
        },
        time: created_at.format(CLOCK_FORMAT).to_string(),
        encrypted: row.is_encrypted,
    })
}

/// Inserts the message, then bumps the chat's `updated_at` as a separate
/// statement. The two writes are not atomic: if the second fails the
/// message stays and the caller gets a 500.
pub fn send_message(router: &Router, params: &Params) -> Result<Reply, ApiError> {
    let chat_id = params.body_id("chat_id")?;
    let text = params.body_str("text")?;
    let (Some(chat_id), Some(text)) = (chat_id, text) else {
        return Err(ApiError::validation("Missing text or chat_id"));
    };
    let sender_id = params.body_id("sender_id")?.unwrap_or(DEFAULT_ID);

    let store = router.open_store()?;
    let inserted = store.insert_message(chat_id, sender_id, text)?;

    if let Err(e) = store.touch_chat(chat_id) {
        warn!(message_id = inserted.id, chat_id, "Message stored but chat timestamp not updated");
        return Err(e.into());
    }

    info!(message_id = inserted.id, chat_id, sender_id, "Message sent");

    let created_at = parse_timestamp(&inserted.created_at)?;
    Reply::created(&MessageView {
        id: inserted.id,
        text: text.to_string(),
        sender: SenderSide::Me,
        time: created_at.format(CLOCK_FORMAT).to_string(),
        encrypted: true,
    })
}
