use rand::Rng;
use tracing::info;

use courier_types::api::InviteCreated;

use crate::error::ApiError;
use crate::params::Params;
use crate::presentation::DEFAULT_ID;
use crate::router::{Reply, Router};

pub const INVITE_CODE_LEN: usize = 8;
const INVITE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random invite code drawn uniformly from `A-Z0-9`. Not checked for uniqueness.
pub fn generate_code<R: Rng>(rng: &mut R) -> String {
    (0..INVITE_CODE_LEN)
        .map(|_| INVITE_ALPHABET[rng.random_range(0..INVITE_ALPHABET.len())] as char)
        .collect()
}

pub fn create_invite(router: &Router, params: &Params) -> Result<Reply, ApiError> {
    let inviter_id = params.body_id("inviter_id")?.unwrap_or(DEFAULT_ID);
    let invite_code = generate_code(&mut rand::rng());

    let store = router.open_store()?;
    let id = store.insert_invite(inviter_id, &invite_code)?;

    info!(invite_id = id, inviter_id, "Invite created");
    Reply::created(&InviteCreated { invite_code, id })
}
