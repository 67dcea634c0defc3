//! CLI command implementations.

pub mod access;
pub mod audit;
pub mod auth;
pub mod config;
pub mod settings;
pub mod version;

use anyhow::{Result, bail};
use cmlre::{Platform, User};

/// Returns the signed-in user or fails with a sign-in hint.
pub(crate) fn require_user(platform: &Platform) -> Result<User> {
    match platform.auth().restore()?.user {
        Some(user) => Ok(user),
        None => bail!("Not signed in. Run 'cmlre login <email> --password <password>' first."),
    }
}
