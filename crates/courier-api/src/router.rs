use serde::Serialize;
use tracing::{debug, error, info, info_span, warn};
use uuid::Uuid;

use courier_db::Store;
use courier_types::api::Action;
use courier_types::invocation::{Invocation, InvocationResponse};

use crate::error::ApiError;
use crate::params::Params;
use crate::{chats, cors, invites, messages, moderation, users};

/// Everything the router needs from its environment, passed in explicitly.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Connection string for the relational store.
    pub database_url: String,
}

/// A successful handler result: status code plus serialized JSON body.
#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    pub fn ok<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        Ok(Self {
            status: 200,
            body: serde_json::to_string(value)?,
        })
    }

    pub fn created<T: Serialize>(value: &T) -> Result<Self, ApiError> {
        Ok(Self {
            status: 201,
            body: serde_json::to_string(value)?,
        })
    }

    fn into_response(self) -> InvocationResponse {
        InvocationResponse::new(self.status, cors::json_headers(), self.body)
    }
}

pub struct Router {
    config: RouterConfig,
}

impl Router {
    pub fn new(config: RouterConfig) -> Self {
        Self { config }
    }

    /// Run one invocation to completion. Never panics on bad input; every
    /// failure becomes a 4xx/5xx response.
    pub fn handle(&self, inv: Invocation) -> InvocationResponse {
        let request_id = Uuid::new_v4();
        let span = info_span!("invocation", %request_id, method = %inv.http_method);
        let _enter = span.enter();

        if inv.http_method == "OPTIONS" {
            debug!("CORS pre-flight");
            return cors::preflight();
        }

        let params = Params::from_invocation(&inv);
        let response = match self.dispatch(&params) {
            Ok(reply) => reply.into_response(),
            Err(err) => {
                match &err {
                    ApiError::Internal(cause) => error!("Invocation failed: {:#}", cause),
                    ApiError::Validation(msg) => debug!("Rejected request: {}", msg),
                    ApiError::NotFound { action, .. } => warn!("Unknown action '{}'", action),
                }
                err.into_response()
            }
        };

        info!(status = response.status_code, "Invocation complete");
        response
    }

    fn dispatch(&self, params: &Params) -> Result<Reply, ApiError> {
        let name = params.action();
        let action = Action::parse(name).ok_or_else(|| ApiError::NotFound {
            action: name.to_string(),
            query_params: params.query().clone(),
        })?;

        debug!(%action, "Dispatching");

        match action {
            Action::GetChats => chats::get_chats(self, params),
            Action::GetMessages => messages::get_messages(self, params),
            Action::SendMessage => messages::send_message(self, params),
            Action::GetContacts => users::get_contacts(self, params),
            Action::CreateChannel => chats::create_channel(self, params),
            Action::GetAllUsers => users::get_all_users(self, params),
            Action::BlockUser => moderation::block_user(self, params),
            Action::UnblockUser => moderation::unblock_user(self, params),
            Action::GetUserRating => users::get_user_rating(self, params),
            Action::CreateInvite => invites::create_invite(self, params),
        }
    }

    /// Open this invocation's store connection. Handlers call this only after
    /// their input has been validated.
    pub(crate) fn open_store(&self) -> Result<Store, ApiError> {
        Ok(Store::open(&self.config.database_url)?)
    }
}
