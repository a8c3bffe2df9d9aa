use chrono::{NaiveDateTime, Utc};

use courier_db::models::{ActivityRow, ContactRow, UserRow, parse_timestamp};
use courier_types::api::{Contact, ContactList, UserList, UserRating, UserSummary};

use crate::error::ApiError;
use crate::params::Params;
use crate::presentation::{
    DATE_FORMAT, DATE_TIME_FORMAT, DEFAULT_ID, DEFAULT_USER_AVATAR, ONLINE, or_placeholder,
};
use crate::relative_time;
use crate::router::{Reply, Router};

pub fn get_contacts(router: &Router, params: &Params) -> Result<Reply, ApiError> {
    let user_id = params.lookup_id("user_id", DEFAULT_ID)?;

    let rows = router.open_store()?.get_contacts(user_id)?;

    let now = Utc::now().naive_utc();
    let contacts = rows
        .into_iter()
        .map(|row| contact(row, now))
        .collect::<Result<Vec<_>, _>>()?;

    Reply::ok(&ContactList { contacts })
}

fn contact(row: ContactRow, now: NaiveDateTime) -> Result<Contact, ApiError> {
    let status = match row.last_seen.as_deref() {
        Some(raw) if !row.is_online => relative_time::last_seen(parse_timestamp(raw)?, now),
        _ => ONLINE.to_string(),
    };

    Ok(Contact {
        id: row.id,
        name: row.display_name,
        status,
        avatar: or_placeholder(row.avatar_emoji, DEFAULT_USER_AVATAR),
        online: row.is_online,
    })
}

pub fn get_all_users(router: &Router, _params: &Params) -> Result<Reply, ApiError> {
    let rows = router.open_store()?.get_all_users()?;

    let users = rows
        .into_iter()
        .map(summary)
        .collect::<Result<Vec<_>, _>>()?;

    Reply::ok(&UserList { users })
}

fn summary(row: UserRow) -> Result<UserSummary, ApiError> {
    let created_at = parse_timestamp(&row.created_at)?;

    Ok(UserSummary {
        id: row.id,
        name: row.display_name,
        username: row.username,
        avatar: or_placeholder(row.avatar_emoji, DEFAULT_USER_AVATAR),
        online: row.is_online,
        is_admin: row.is_admin,
        is_blocked: row.is_blocked,
        created_at: created_at.format(DATE_FORMAT).to_string(),
    })
}

pub fn get_user_rating(router: &Router, params: &Params) -> Result<Reply, ApiError> {
    let user_id = params.lookup_id("user_id", DEFAULT_ID)?;

    let rating = match router.open_store()?.get_user_activity(user_id)? {
        Some(row) => rating(row)?,
        None => UserRating::default(),
    };

    Reply::ok(&rating)
}

fn rating(row: ActivityRow) -> Result<UserRating, ApiError> {
    let last_activity = match row.last_activity.as_deref() {
        Some(raw) => parse_timestamp(raw)?.format(DATE_TIME_FORMAT).to_string(),
        None => String::new(),
    };

    Ok(UserRating {
        messages_sent: row.messages_sent,
        messages_received: row.messages_received,
        calls_made: row.calls_made,
        files_shared: row.files_shared,
        rating_score: row.rating_score,
        last_activity,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> NaiveDateTime {
        parse_timestamp("2024-06-15 12:00:00").unwrap()
    }

    fn contact_row(online: bool, last_seen: Option<&str>) -> ContactRow {
        ContactRow {
            id: 2,
            display_name: Some("Bob".into()),
            avatar_emoji: None,
            is_online: online,
            status: None,
            last_seen: last_seen.map(str::to_string),
        }
    }

    #[test]
    fn online_contact_ignores_last_seen() {
        let c = contact(contact_row(true, Some("2024-06-10 00:00:00")), now()).unwrap();
        assert_eq!(c.status, ONLINE);
        assert_eq!(c.avatar, DEFAULT_USER_AVATAR);
    }

    #[test]
    fn offline_contact_without_last_seen_reads_online() {
        let c = contact(contact_row(false, None), now()).unwrap();
        assert_eq!(c.status, ONLINE);
        assert!(!c.online);
    }

    #[test]
    fn offline_contact_shows_relative_time() {
        let c = contact(contact_row(false, Some("2024-06-15 11:45:00")), now()).unwrap();
        assert_eq!(c.status, "Был 15 мин назад");
    }

    #[test]
    fn rating_formats_last_activity() {
        let r = rating(ActivityRow {
            messages_sent: 1,
            messages_received: 2,
            calls_made: 3,
            files_shared: 4,
            rating_score: 120,
            last_activity: Some("2024-06-15 09:41:13".into()),
        })
        .unwrap();
        assert_eq!(r.last_activity, "2024-06-15 09:41");
        assert_eq!(r.rating_score, 120);
    }

    #[test]
    fn default_rating() {
        let r = UserRating::default();
        assert_eq!(r.rating_score, 100);
        assert_eq!(r.messages_sent, 0);
        assert_eq!(r.last_activity, "");
    }
}
