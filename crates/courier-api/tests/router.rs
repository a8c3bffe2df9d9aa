//! End-to-end tests: drive `Router::handle` against a real SQLite store in the
//! system temp dir, seeded with plain SQL.

use std::path::PathBuf;

use rusqlite::Connection;
use serde_json::{Value, json};

use courier_api::{Router, RouterConfig};
use courier_types::invocation::{Invocation, InvocationResponse};

struct Harness {
    path: PathBuf,
    router: Router,
}

impl Harness {
    fn new() -> Self {
        let path = std::env::temp_dir()
            .join(format!("courier_api_test_{}.db", uuid::Uuid::new_v4()));
        courier_db::migrations::bootstrap(path.to_str().unwrap()).unwrap();

        let router = Router::new(RouterConfig {
            database_url: path.to_string_lossy().into_owned(),
        });
        Self { path, router }
    }

    fn sql(&self, sql: &str) {
        let conn = Connection::open(&self.path).unwrap();
        conn.execute_batch(sql).unwrap();
    }

    fn scalar(&self, sql: &str) -> i64 {
        let conn = Connection::open(&self.path).unwrap();
        conn.query_row(sql, [], |r| r.get(0)).unwrap()
    }

    fn post(&self, body: Value) -> InvocationResponse {
        self.router.handle(Invocation::post_json(&body))
    }

    fn get(&self, query: &[(&str, &str)]) -> InvocationResponse {
        self.router
            .handle(Invocation::new("GET").with_query(query.iter().copied()))
    }

    /// Two users sharing one unnamed direct chat.
    fn seed_pair(&self) {
        self.sql(
            "INSERT INTO users (id, display_name, username, is_online) VALUES (1, 'Alice', 'alice', 1);
             INSERT INTO users (id, display_name, username, is_online, last_seen)
                 VALUES (2, 'Bob', 'bob', 0, datetime('now', '-30 minutes'));
             INSERT INTO chats (id, name, avatar_emoji) VALUES (1, NULL, NULL);
             INSERT INTO chat_members (chat_id, user_id) VALUES (1, 1), (1, 2);",
        );
    }
}

impl Drop for Harness {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
        let _ = std::fs::remove_file(self.path.with_extension("db-wal"));
        let _ = std::fs::remove_file(self.path.with_extension("db-shm"));
    }
}

fn body(resp: &InvocationResponse) -> Value {
    resp.json().unwrap()
}

#[test]
fn get_chats_fills_missing_name_and_avatar() {
    let h = Harness::new();
    h.seed_pair();

    let resp = h.post(json!({ "action": "get_chats", "user_id": 1 }));
    assert_eq!(resp.status_code, 200);

    let chats = body(&resp)["chats"].as_array().unwrap().clone();
    assert_eq!(chats.len(), 1);
    let chat = &chats[0];
    assert_eq!(chat["name"], "Чат");
    assert_eq!(chat["avatar"], "💬");
    assert_eq!(chat["lastMessage"], "Нет сообщений");
    assert_eq!(chat["time"], "");
    assert_eq!(chat["unread"], 0);
    assert_eq!(chat["online"], false);
}

#[test]
fn get_chats_orders_by_latest_message() {
    let h = Harness::new();
    h.seed_pair();
    h.sql(
        "INSERT INTO chats (id, name, avatar_emoji) VALUES (2, 'Quiet', '🌙'), (3, 'Busy', '🔥');
         INSERT INTO chat_members (chat_id, user_id) VALUES (2, 1), (3, 1), (3, 2);
         INSERT INTO messages (chat_id, sender_id, text, created_at)
             VALUES (1, 2, 'older', datetime('now', '-3 days')),
                    (3, 2, 'newest', datetime('now', '-1 minutes'));",
    );

    let resp = h.get(&[("action", "get_chats"), ("user_id", "1")]);
    let chats = body(&resp)["chats"].as_array().unwrap().clone();
    let names: Vec<&str> = chats.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Busy", "Чат", "Quiet"]);

    assert_eq!(chats[0]["lastMessage"], "newest");
    assert_eq!(chats[0]["unread"], 1);
    assert_eq!(chats[1]["lastMessage"], "older");
    assert_eq!(chats[1]["unread"], 0);
    assert_eq!(chats[2]["time"], "");
}

#[test]
fn unread_counts_only_peer_messages_from_the_last_hour() {
    let h = Harness::new();
    h.seed_pair();
    h.sql(
        "INSERT INTO messages (chat_id, sender_id, text, created_at)
             VALUES (1, 2, 'stale', datetime('now', '-61 minutes')),
                    (1, 2, 'fresh', datetime('now', '-59 minutes')),
                    (1, 2, 'fresher', datetime('now', '-5 minutes')),
                    (1, 1, 'mine', datetime('now', '-1 minutes'));",
    );

    let resp = h.post(json!({ "action": "get_chats", "user_id": 1 }));
    let chats = body(&resp)["chats"].as_array().unwrap().clone();
    assert_eq!(chats[0]["lastMessage"], "mine");
    assert_eq!(chats[0]["unread"], 2);

    let resp = h.post(json!({ "action": "get_chats", "user_id": 2 }));
    let chats = body(&resp)["chats"].as_array().unwrap().clone();
    assert_eq!(chats[0]["unread"], 1);
}

#[test]
fn sent_message_is_mine_for_sender_and_other_for_peer() {
    let h = Harness::new();
    h.seed_pair();

    let resp = h.post(json!({
        "action": "send_message",
        "chat_id": 1,
        "sender_id": 1,
        "text": "Привет"
    }));
    assert_eq!(resp.status_code, 201);
    let sent = body(&resp);
    assert_eq!(sent["sender"], "me");
    assert_eq!(sent["encrypted"], true);
    assert_eq!(sent["text"], "Привет");
    assert_eq!(sent["time"].as_str().unwrap().len(), 5);

    let mine = h.post(json!({ "action": "get_messages", "chat_id": 1, "user_id": 1 }));
    let messages = body(&mine)["messages"].as_array().unwrap().clone();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["id"], sent["id"]);
    assert_eq!(messages[0]["sender"], "me");

    let theirs = h.post(json!({ "action": "get_messages", "chat_id": 1, "user_id": 2 }));
    let messages = body(&theirs)["messages"].as_array().unwrap().clone();
    assert_eq!(messages[0]["sender"], "other");
    assert_eq!(messages[0]["encrypted"], true);
}

#[test]
fn send_message_bumps_chat_updated_at() {
    let h = Harness::new();
    h.seed_pair();
    h.sql("UPDATE chats SET updated_at = '2000-01-01 00:00:00' WHERE id = 1;");

    let resp = h.post(json!({
        "action": "send_message",
        "chat_id": 1,
        "sender_id": 2,
        "text": "ping"
    }));
    assert_eq!(resp.status_code, 201);

    let moved = h.scalar(
        "SELECT updated_at > '2000-01-01 00:00:00'
             AND updated_at >= datetime('now', '-1 minutes')
         FROM chats WHERE id = 1",
    );
    assert_eq!(moved, 1);
}

#[test]
fn send_message_defaults_sender_to_first_user() {
    let h = Harness::new();
    h.seed_pair();

    let resp = h.post(json!({ "action": "send_message", "chat_id": "1", "text": "hi" }));
    assert_eq!(resp.status_code, 201);
    assert_eq!(h.scalar("SELECT sender_id FROM messages"), 1);
}

#[test]
fn send_message_validation_writes_nothing() {
    let h = Harness::new();
    h.seed_pair();

    for payload in [
        json!({ "action": "send_message", "chat_id": 1, "text": "" }),
        json!({ "action": "send_message", "chat_id": 1 }),
        json!({ "action": "send_message", "text": "orphan" }),
    ] {
        let resp = h.post(payload);
        assert_eq!(resp.status_code, 400);
        assert_eq!(body(&resp), json!({ "error": "Missing text or chat_id" }));
    }
    assert_eq!(h.scalar("SELECT COUNT(*) FROM messages"), 0);
}

#[test]
fn send_message_to_missing_chat_hides_store_error() {
    let h = Harness::new();
    h.seed_pair();

    let resp = h.post(json!({ "action": "send_message", "chat_id": 99, "text": "void" }));
    assert_eq!(resp.status_code, 500);
    assert_eq!(body(&resp), json!({ "error": "Internal server error" }));
    assert!(!resp.body.to_lowercase().contains("foreign key"));
}

#[test]
fn get_contacts_excludes_self_and_describes_presence() {
    let h = Harness::new();
    h.seed_pair();
    h.sql(
        "INSERT INTO users (id, display_name, username, is_online, avatar_emoji)
             VALUES (3, 'Carol', 'carol', 1, '🐱');
         INSERT INTO users (id, display_name, username, is_online, last_seen)
             VALUES (4, 'Dave', 'dave', 0, datetime('now', '-50 hours'));",
    );

    let resp = h.post(json!({ "action": "get_contacts", "user_id": 1 }));
    assert_eq!(resp.status_code, 200);
    let contacts = body(&resp)["contacts"].as_array().unwrap().clone();

    let names: Vec<&str> = contacts.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["Carol", "Bob", "Dave"]);

    assert_eq!(contacts[0]["status"], "В сети");
    assert_eq!(contacts[0]["avatar"], "🐱");
    assert_eq!(contacts[1]["status"], "Был 30 мин назад");
    assert_eq!(contacts[1]["avatar"], "👤");
    assert_eq!(contacts[2]["status"], "Был 2 дней назад");
}

#[test]
fn create_channel_joins_creator() {
    let h = Harness::new();
    h.seed_pair();

    let resp = h.post(json!({
        "action": "create_channel",
        "name": "Announcements",
        "creator_id": 2,
        "is_channel": false
    }));
    assert_eq!(resp.status_code, 201);
    let created = body(&resp);
    assert_eq!(created["name"], "Announcements");
    assert_eq!(created["success"], true);
    let id = created["id"].as_i64().unwrap();

    let members = format!("SELECT COUNT(*) FROM chat_members WHERE chat_id = {id} AND user_id = 2");
    assert_eq!(h.scalar(&members), 1);
    assert_eq!(h.scalar(&format!("SELECT is_channel FROM chats WHERE id = {id}")), 0);
    assert_eq!(h.scalar(&format!("SELECT subscribers_count FROM chats WHERE id = {id}")), 1);

    let chats = h.post(json!({ "action": "get_chats", "user_id": 2 }));
    let chats = body(&chats)["chats"].as_array().unwrap().clone();
    let channel = chats.iter().find(|c| c["id"] == id).unwrap();
    assert_eq!(channel["avatar"], "📢");
}

#[test]
fn create_channel_requires_name() {
    let h = Harness::new();
    let resp = h.post(json!({ "action": "create_channel", "name": "" }));
    assert_eq!(resp.status_code, 400);
    assert_eq!(body(&resp), json!({ "error": "Missing name" }));
}

#[test]
fn block_and_unblock_show_in_user_list() {
    let h = Harness::new();
    h.seed_pair();

    let resp = h.post(json!({ "action": "block_user", "user_id": 2 }));
    assert_eq!(resp.status_code, 200);
    assert_eq!(body(&resp), json!({ "success": true, "message": "User blocked" }));
    let active = "SELECT COUNT(*) FROM user_blocks
                  WHERE user_id = 2 AND is_active = 1 AND blocked_by = 1";
    assert_eq!(h.scalar(active), 1);

    let users = h.post(json!({ "action": "get_all_users" }));
    let users = body(&users)["users"].as_array().unwrap().clone();
    let bob = users.iter().find(|u| u["id"] == 2).unwrap();
    assert_eq!(bob["isBlocked"], true);
    assert_eq!(bob["username"], "bob");
    assert_eq!(bob["createdAt"].as_str().unwrap().len(), 10);

    let resp = h.post(json!({ "action": "unblock_user", "user_id": "2" }));
    assert_eq!(resp.status_code, 200);
    assert_eq!(body(&resp)["message"], "User unblocked");
    assert_eq!(h.scalar("SELECT COUNT(*) FROM user_blocks WHERE unblocked_at IS NOT NULL"), 1);

    let users = h.post(json!({ "action": "get_all_users" }));
    let users = body(&users)["users"].as_array().unwrap().clone();
    assert!(users.iter().all(|u| u["isBlocked"] == false));
}

#[test]
fn block_user_requires_user_id() {
    let h = Harness::new();
    let resp = h.post(json!({ "action": "block_user", "reason": "spam" }));
    assert_eq!(resp.status_code, 400);
    assert_eq!(body(&resp), json!({ "error": "Missing user_id" }));
}

#[test]
fn all_users_newest_first() {
    let h = Harness::new();
    h.sql(
        "INSERT INTO users (id, display_name, username, is_admin, created_at)
             VALUES (1, 'Root', 'root', 1, '2023-01-01 00:00:00'),
                    (2, NULL, 'ghost', 0, '2024-05-20 10:00:00');",
    );

    let resp = h.get(&[("action", "get_all_users")]);
    let users = body(&resp)["users"].as_array().unwrap().clone();
    assert_eq!(users[0]["username"], "ghost");
    assert_eq!(users[0]["name"], Value::Null);
    assert_eq!(users[0]["avatar"], "👤");
    assert_eq!(users[0]["createdAt"], "2024-05-20");
    assert_eq!(users[1]["isAdmin"], true);
}

#[test]
fn rating_defaults_without_activity() {
    let h = Harness::new();
    h.seed_pair();

    let resp = h.get(&[("action", "get_user_rating"), ("user_id", "2")]);
    assert_eq!(resp.status_code, 200);
    assert_eq!(
        body(&resp),
        json!({
            "messagesSent": 0,
            "messagesReceived": 0,
            "callsMade": 0,
            "filesShared": 0,
            "ratingScore": 100,
            "lastActivity": ""
        })
    );
}

#[test]
fn rating_reads_activity_row() {
    let h = Harness::new();
    h.seed_pair();
    h.sql(
        "INSERT INTO user_activity
             (user_id, messages_sent, messages_received, calls_made, files_shared, rating_score, last_activity)
             VALUES (1, 12, 30, 2, 5, 140, '2024-02-29 23:59:01');",
    );

    let resp = h.post(json!({ "action": "get_user_rating", "user_id": 1 }));
    let rating = body(&resp);
    assert_eq!(rating["messagesSent"], 12);
    assert_eq!(rating["ratingScore"], 140);
    assert_eq!(rating["lastActivity"], "2024-02-29 23:59");
}

#[test]
fn create_invite_stores_code() {
    let h = Harness::new();
    h.seed_pair();

    let resp = h.post(json!({ "action": "create_invite", "inviter_id": 2 }));
    assert_eq!(resp.status_code, 201);
    let invite = body(&resp);
    let code = invite["inviteCode"].as_str().unwrap();
    assert_eq!(code.len(), 8);
    assert!(code.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));

    let id = invite["id"].as_i64().unwrap();
    assert_eq!(
        h.scalar(&format!("SELECT inviter_id FROM friend_invites WHERE id = {id}")),
        2
    );
}

#[test]
fn invalid_identifier_is_bad_request() {
    let h = Harness::new();
    let resp = h.get(&[("action", "get_chats"), ("user_id", "one")]);
    assert_eq!(resp.status_code, 400);
    assert_eq!(body(&resp), json!({ "error": "Invalid user_id" }));
}

#[test]
fn unknown_action_echoes_query() {
    let h = Harness::new();
    let resp = h.get(&[("action", "delete_everything"), ("force", "yes")]);
    assert_eq!(resp.status_code, 404);
    assert_eq!(
        body(&resp),
        json!({
            "error": "Not found",
            "action": "delete_everything",
            "query_params": { "action": "delete_everything", "force": "yes" }
        })
    );
}
