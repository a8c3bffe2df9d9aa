use chrono::{NaiveDateTime, Utc};
use tracing::info;

use courier_db::models::{ChatRow, NewChannel, parse_timestamp};
use courier_types::api::{ChannelCreated, ChatList, ChatSummary};

use crate::error::ApiError;
use crate::params::Params;
use crate::presentation::{
    DEFAULT_CHANNEL_AVATAR, DEFAULT_CHAT_AVATAR, DEFAULT_CHAT_NAME, DEFAULT_ID, NO_MESSAGES,
    or_placeholder,
};
use crate::relative_time;
use crate::router::{Reply, Router};

pub fn get_chats(router: &Router, params: &Params) -> Result<Reply, ApiError> {
    let user_id = params.lookup_id("user_id", DEFAULT_ID)?;

    let rows = router.open_store()?.get_chats_for_user(user_id)?;

    let now = Utc::now().naive_utc();
    let chats = rows
        .into_iter()
        .map(|row| summarize(row, now))
        .collect::<Result<Vec<_>, _>>()?;

    Reply::ok(&ChatList { chats })
}

fn summarize(row: ChatRow, now: NaiveDateTime) -> Result<ChatSummary, ApiError> {
    let time = match row.last_message_time.as_deref() {
        Some(raw) => relative_time::chat_time(parse_timestamp(raw)?, now),
        None => String::new(),
    };

    Ok(ChatSummary {
        id: row.id,
        name: or_placeholder(row.name, DEFAULT_CHAT_NAME),
        last_message: or_placeholder(row.last_message, NO_MESSAGES),
        time,
        unread: row.unread,
        avatar: or_placeholder(row.avatar_emoji, DEFAULT_CHAT_AVATAR),
        online: row.peer_online.unwrap_or(false),
    })
}

pub fn create_channel(router: &Router, params: &Params) -> Result<Reply, ApiError> {
    let name = params
        .body_str("name")?
        .ok_or_else(|| ApiError::validation("Missing name"))?;
    let description = params.body_str("description")?.unwrap_or("");
    let avatar_emoji = params.body_str("avatar_emoji")?.unwrap_or(DEFAULT_CHANNEL_AVATAR);
    let creator_id = params.body_id("creator_id")?.unwrap_or(DEFAULT_ID);
    let is_channel = params.body_bool("is_channel")?.unwrap_or(true);

    let mut store = router.open_store()?;
    let id = store.create_channel(&NewChannel {
        name,
        description,
        avatar_emoji,
        creator_id,
        is_channel,
    })?;

    info!(chat_id = id, creator_id, is_channel, "Channel created");
    Reply::created(&ChannelCreated {
        id,
        name: name.to_string(),
        success: true,
    })
}
