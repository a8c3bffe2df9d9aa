use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

use crate::dsn_path;

/// Create the store if needed and bring its schema up to date.
pub fn bootstrap(dsn: &str) -> Result<()> {
    let path = dsn_path(dsn);
    let conn = Connection::open(path)
        .with_context(|| format!("failed to create store at {}", path.display()))?;

    // WAL mode for concurrent reads across invocations
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "foreign_keys", "ON")?;

    run(&conn)?;

    info!("Store ready at {}", path.display());
    Ok(())
}

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Store: running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                display_name    TEXT,
                username        TEXT UNIQUE,
                avatar_emoji    TEXT,
                is_online       INTEGER NOT NULL DEFAULT 0,
                status          TEXT,
                last_seen       TEXT,
                is_admin        INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE chats (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                name                TEXT,
                avatar_emoji        TEXT,
                is_group            INTEGER NOT NULL DEFAULT 0,
                is_channel          INTEGER NOT NULL DEFAULT 0,
                description         TEXT,
                created_by          INTEGER REFERENCES users(id),
                subscribers_count   INTEGER NOT NULL DEFAULT 0,
                created_at          TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at          TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE chat_members (
                chat_id     INTEGER NOT NULL REFERENCES chats(id),
                user_id     INTEGER NOT NULL REFERENCES users(id),
                joined_at   TEXT NOT NULL DEFAULT (datetime('now')),
                PRIMARY KEY (chat_id, user_id)
            );

            CREATE TABLE messages (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                chat_id         INTEGER NOT NULL REFERENCES chats(id),
                sender_id       INTEGER NOT NULL REFERENCES users(id),
                text            TEXT NOT NULL,
                is_encrypted    INTEGER NOT NULL DEFAULT 0,
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE INDEX idx_messages_chat
                ON messages(chat_id, created_at);

            CREATE TABLE user_blocks (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id         INTEGER NOT NULL REFERENCES users(id),
                blocked_by      INTEGER REFERENCES users(id),
                reason          TEXT,
                is_active       INTEGER NOT NULL DEFAULT 1,
                created_at      TEXT NOT NULL DEFAULT (datetime('now')),
                unblocked_at    TEXT
            );

            CREATE INDEX idx_user_blocks_active
                ON user_blocks(user_id, is_active);

            CREATE TABLE user_activity (
                user_id             INTEGER PRIMARY KEY REFERENCES users(id),
                messages_sent       INTEGER NOT NULL DEFAULT 0,
                messages_received   INTEGER NOT NULL DEFAULT 0,
                calls_made          INTEGER NOT NULL DEFAULT 0,
                files_shared        INTEGER NOT NULL DEFAULT 0,
                rating_score        INTEGER NOT NULL DEFAULT 100,
                last_activity       TEXT
            );

            -- no UNIQUE on invite_code: collisions are not detected
            CREATE TABLE friend_invites (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                inviter_id      INTEGER REFERENCES users(id),
                invite_code     TEXT NOT NULL,
                created_at      TEXT NOT NULL DEFAULT (datetime('now'))
            );

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    info!("Store migrations complete");
    Ok(())
}
