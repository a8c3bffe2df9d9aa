use serde::{Deserialize, Serialize};

// -- Actions --

/// Every operation the router knows how to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetChats,
    GetMessages,
    SendMessage,
    GetContacts,
    CreateChannel,
    GetAllUsers,
    BlockUser,
    UnblockUser,
    GetUserRating,
    CreateInvite,
}

impl Action {
    pub const ALL: [Action; 10] = [
        Action::GetChats,
        Action::GetMessages,
        Action::SendMessage,
        Action::GetContacts,
        Action::CreateChannel,
        Action::GetAllUsers,
        Action::BlockUser,
        Action::UnblockUser,
        Action::GetUserRating,
        Action::CreateInvite,
    ];

    /// Exact, case-sensitive match on the wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == name)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetChats => "get_chats",
            Self::GetMessages => "get_messages",
            Self::SendMessage => "send_message",
            Self::GetContacts => "get_contacts",
            Self::CreateChannel => "create_channel",
            Self::GetAllUsers => "get_all_users",
            Self::BlockUser => "block_user",
            Self::UnblockUser => "unblock_user",
            Self::GetUserRating => "get_user_rating",
            Self::CreateInvite => "create_invite",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// -- Chats --

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSummary {
    pub id: i64,
    pub name: String,
    pub last_message: String,
    pub time: String,
    pub unread: i64,
    pub avatar: String,
    pub online: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatList {
    pub chats: Vec<ChatSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelCreated {
    pub id: i64,
    pub name: String,
    pub success: bool,
}

// -- Messages --

/// Whether a message was written by the user asking for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderSide {
    Me,
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageView {
    pub id: i64,
    pub text: String,
    pub sender: SenderSide,
    pub time: String,
    pub encrypted: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageList {
    pub messages: Vec<MessageView>,
}

// -- Users --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contact {
    pub id: i64,
    pub name: Option<String>,
    pub status: String,
    pub avatar: String,
    pub online: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactList {
    pub contacts: Vec<Contact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub name: Option<String>,
    pub username: Option<String>,
    pub avatar: String,
    pub online: bool,
    pub is_admin: bool,
    pub is_blocked: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserList {
    pub users: Vec<UserSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRating {
    pub messages_sent: i64,
    pub messages_received: i64,
    pub calls_made: i64,
    pub files_shared: i64,
    pub rating_score: i64,
    pub last_activity: String,
}

impl Default for UserRating {
    /// Rating reported for users with no recorded activity.
    fn default() -> Self {
        Self {
            messages_sent: 0,
            messages_received: 0,
            calls_made: 0,
            files_shared: 0,
            rating_score: 100,
            last_activity: String::new(),
        }
    }
}

// -- Moderation / invites --

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCreated {
    pub invite_code: String,
    pub id: i64,
}
