use crate::Store;
use crate::models::{
    ActivityRow, ChatRow, ContactRow, InsertedMessage, MessageRow, NewBlock, NewChannel, UserRow,
};
use anyhow::{Context, Result};
use rusqlite::Connection;

impl Store {
    // -- Chats --

    /// Chats the user belongs to, most recently active first.
    pub fn get_chats_for_user(&self, user_id: i64) -> Result<Vec<ChatRow>> {
        self.with_conn(|conn| query_chats(conn, user_id))
            .context("get_chats_for_user")
    }

    /// Insert a group chat and its creator's membership as one unit.
    pub fn create_channel(&mut self, channel: &NewChannel<'_>) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            let chat_id: i64 = tx.query_row(
                "INSERT INTO chats (name, is_group, is_channel, avatar_emoji, description, created_by, subscribers_count)
                 VALUES (?1, 1, ?2, ?3, ?4, ?5, 1)
                 RETURNING id",
                rusqlite::params![
                    channel.name,
                    channel.is_channel,
                    channel.avatar_emoji,
                    channel.description,
                    channel.creator_id
                ],
                |row| row.get(0),
            )?;

            tx.execute(
                "INSERT INTO chat_members (chat_id, user_id) VALUES (?1, ?2)",
                (chat_id, channel.creator_id),
            )?;

            tx.commit()?;
            Ok(chat_id)
        })
        .context("create_channel")
    }

    pub fn touch_chat(&self, chat_id: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE chats SET updated_at = datetime('now') WHERE id = ?1",
                [chat_id],
            )?;
            Ok(())
        })
        .context("touch_chat")
    }

    // -- Messages --

    pub fn get_messages(&self, chat_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| query_messages(conn, chat_id))
            .context("get_messages")
    }

    /// Insert an encrypted-flagged message stamped with the store's clock.
    pub fn insert_message(
        &self,
        chat_id: i64,
        sender_id: i64,
        text: &str,
    ) -> Result<InsertedMessage> {
        self.with_conn(|conn| {
            let inserted = conn.query_row(
                "INSERT INTO messages (chat_id, sender_id, text, is_encrypted, created_at)
                 VALUES (?1, ?2, ?3, 1, datetime('now'))
                 RETURNING id, created_at",
                rusqlite::params![chat_id, sender_id, text],
                |row| {
                    Ok(InsertedMessage {
                        id: row.get(0)?,
                        created_at: row.get(1)?,
                    })
                },
            )?;
            Ok(inserted)
        })
        .context("insert_message")
    }

    // -- Users --

    /// Everyone except `user_id`, online users first.
    pub fn get_contacts(&self, user_id: i64) -> Result<Vec<ContactRow>> {
        self.with_conn(|conn| query_contacts(conn, user_id))
            .context("get_contacts")
    }

    pub fn get_all_users(&self) -> Result<Vec<UserRow>> {
        self.with_conn(query_all_users).context("get_all_users")
    }

    pub fn get_user_activity(&self, user_id: i64) -> Result<Option<ActivityRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT messages_sent, messages_received, calls_made, files_shared, rating_score, last_activity
                 FROM user_activity
                 WHERE user_id = ?1",
                [user_id],
                |row| {
                    Ok(ActivityRow {
                        messages_sent: row.get(0)?,
                        messages_received: row.get(1)?,
                        calls_made: row.get(2)?,
                        files_shared: row.get(3)?,
                        rating_score: row.get(4)?,
                        last_activity: row.get(5)?,
                    })
                },
            )
            .optional()
        })
        .context("get_user_activity")
    }

    // -- Blocks --

    /// Close any active block on the user, then record a new active one.
    pub fn block_user(&mut self, block: &NewBlock<'_>) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "UPDATE user_blocks
                 SET is_active = 0, unblocked_at = datetime('now')
                 WHERE user_id = ?1 AND is_active = 1",
                [block.user_id],
            )?;

            let block_id: i64 = tx.query_row(
                "INSERT INTO user_blocks (user_id, blocked_by, reason, is_active)
                 VALUES (?1, ?2, ?3, 1)
                 RETURNING id",
                rusqlite::params![block.user_id, block.blocked_by, block.reason],
                |row| row.get(0),
            )?;

            tx.commit()?;
            Ok(block_id)
        })
        .context("block_user")
    }

    /// Returns how many active blocks were closed.
    pub fn unblock_user(&self, user_id: i64) -> Result<usize> {
        self.with_conn(|conn| {
            let closed = conn.execute(
                "UPDATE user_blocks
                 SET is_active = 0, unblocked_at = datetime('now')
                 WHERE user_id = ?1 AND is_active = 1",
                [user_id],
            )?;
            Ok(closed)
        })
        .context("unblock_user")
    }

    // -- Invites --

    pub fn insert_invite(&self, inviter_id: i64, invite_code: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let id = conn.query_row(
                "INSERT INTO friend_invites (inviter_id, invite_code) VALUES (?1, ?2) RETURNING id",
                rusqlite::params![inviter_id, invite_code],
                |row| row.get(0),
            )?;
            Ok(id)
        })
        .context("insert_invite")
    }
}

fn query_chats(conn: &Connection, user_id: i64) -> Result<Vec<ChatRow>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT
             c.id,
             c.name,
             c.avatar_emoji,
             c.is_group,
             (
                 SELECT m.text
                 FROM messages m
                 WHERE m.chat_id = c.id
                 ORDER BY m.created_at DESC, m.id DESC
                 LIMIT 1
             ) AS last_message,
             (
                 SELECT COUNT(*)
                 FROM messages m
                 WHERE m.chat_id = c.id
                   AND m.created_at > datetime('now', '-1 hour')
                   AND m.sender_id != ?1
             ) AS unread,
             (
                 SELECT MAX(m.created_at)
                 FROM messages m
                 WHERE m.chat_id = c.id
             ) AS last_message_time,
             (
                 SELECT u.is_online
                 FROM chat_members peer
                 JOIN users u ON u.id = peer.user_id
                 WHERE peer.chat_id = c.id AND peer.user_id != ?1
                 LIMIT 1
             ) AS is_online
         FROM chats c
         JOIN chat_members cm ON cm.chat_id = c.id
         WHERE cm.user_id = ?1
         ORDER BY last_message_time DESC NULLS LAST, c.id ASC",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(ChatRow {
                id: row.get(0)?,
                name: row.get(1)?,
                avatar_emoji: row.get(2)?,
                is_group: row.get(3)?,
                last_message: row.get(4)?,
                unread: row.get(5)?,
                last_message_time: row.get(6)?,
                peer_online: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_messages(conn: &Connection, chat_id: i64) -> Result<Vec<MessageRow>> {
    // Inner join: messages whose sender row is gone are not shown
    let mut stmt = conn.prepare(
        "SELECT m.id, m.text, m.sender_id, m.is_encrypted, m.created_at, u.username
         FROM messages m
         JOIN users u ON u.id = m.sender_id
         WHERE m.chat_id = ?1
         ORDER BY m.created_at ASC, m.id ASC",
    )?;

    let rows = stmt
        .query_map([chat_id], |row| {
            Ok(MessageRow {
                id: row.get(0)?,
                text: row.get(1)?,
                sender_id: row.get(2)?,
                is_encrypted: row.get(3)?,
                created_at: row.get(4)?,
                sender_username: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_contacts(conn: &Connection, user_id: i64) -> Result<Vec<ContactRow>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.display_name, u.avatar_emoji, u.is_online, u.status, u.last_seen
         FROM users u
         WHERE u.id != ?1
         ORDER BY u.is_online DESC, u.display_name ASC",
    )?;

    let rows = stmt
        .query_map([user_id], |row| {
            Ok(ContactRow {
                id: row.get(0)?,
                display_name: row.get(1)?,
                avatar_emoji: row.get(2)?,
                is_online: row.get(3)?,
                status: row.get(4)?,
                last_seen: row.get(5)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_all_users(conn: &Connection) -> Result<Vec<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT
             u.id,
             u.display_name,
             u.username,
             u.avatar_emoji,
             u.is_online,
             u.is_admin,
             u.created_at,
             EXISTS(SELECT 1 FROM user_blocks b WHERE b.user_id = u.id AND b.is_active = 1) AS is_blocked
         FROM users u
         ORDER BY u.created_at DESC, u.id DESC",
    )?;

    let rows = stmt
        .query_map([], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                display_name: row.get(1)?,
                username: row.get(2)?,
                avatar_emoji: row.get(3)?,
                is_online: row.get(4)?,
                is_admin: row.get(5)?,
                created_at: row.get(6)?,
                is_blocked: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
