use tracing::info;

use courier_db::models::NewBlock;
use courier_types::api::Acknowledgement;

use crate::error::ApiError;
use crate::params::Params;
use crate::presentation::{DEFAULT_BLOCK_REASON, DEFAULT_ID};
use crate::router::{Reply, Router};

fn require_user_id(params: &Params) -> Result<i64, ApiError> {
    params
        .body_id("user_id")?
        .ok_or_else(|| ApiError::validation("Missing user_id"))
}

pub fn block_user(router: &Router, params: &Params) -> Result<Reply, ApiError> {
    let user_id = require_user_id(params)?;
    let blocked_by = params.body_id("blocked_by")?.unwrap_or(DEFAULT_ID);
    let reason = params.body_str("reason")?.unwrap_or(DEFAULT_BLOCK_REASON);

    let mut store = router.open_store()?;
    let block_id = store.block_user(&NewBlock {
        user_id,
        blocked_by,
        reason,
    })?;

    info!(block_id, user_id, blocked_by, "User blocked");
    Reply::ok(&Acknowledgement {
        success: true,
        message: "User blocked".to_string(),
    })
}

pub fn unblock_user(router: &Router, params: &Params) -> Result<Reply, ApiError> {
    let user_id = require_user_id(params)?;

    let closed = router.open_store()?.unblock_user(user_id)?;

    info!(user_id, closed, "User unblocked");
    Reply::ok(&Acknowledgement {
        success: true,
        message: "User unblocked".to_string(),
    })
}
