//! Authentication and session business logic.
//!
//! Login verifies a password against argon2 or a legacy SHA-256 digest,
//! upgrading legacy hashes in place, then opens a session and raises the user's
//! online-status flag. Sessions are bearer tokens stored as SHA-256 digests with an
//! expiry; the flag drops back to 0 once a user has no live sessions left.

use crate::{
    core::{
        password::{self, Verification},
        user as users,
    },
    entities::{Session, session, user},
    errors::{Error, Result},
};
use chrono::{DateTime, Duration, Utc};
use sea_orm::{PaginatorTrait, Set, TransactionTrait, prelude::*};
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use uuid::Uuid;

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    /// The signed-in user, with status already set to 1
    pub user: user::Model,
    /// Bearer token for this session; only ever returned here
    pub token: String,
    /// When the token stops being accepted
    pub expires_at: DateTime<Utc>,
    /// Whether a legacy hash was replaced during this login
    pub upgraded_hash: bool,
}

/// Digest under which a bearer token is stored.
#[must_use]
pub fn hash_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

fn new_token() -> String {
    format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple())
}

/// Verifies credentials and opens a session.
///
/// Unknown usernames and wrong passwords both yield [`Error::InvalidCredentials`].
///
/// # Errors
/// Returns an error if:
/// - The username or password is empty
/// - The credentials do not match
/// - `session_ttl` pushes the expiry past the representable range
/// - Hashing or a database write fails
pub async fn login(
    db: &DatabaseConnection,
    username: &str,
    password_plain: &str,
    session_ttl: Duration,
) -> Result<LoginOutcome> {
    let username = username.trim();
    if username.is_empty() || password_plain.is_empty() {
        return Err(Error::validation("Username and password are required"));
    }

    let Some(account) = users::get_user_by_username(db, username).await? else {
        tracing::warn!(%username, "login rejected: unknown user");
        return Err(Error::InvalidCredentials);
    };

    let verification = password::verify_password(password_plain, &account.password_hash);
    if !verification.is_match() {
        tracing::warn!(%username, "login rejected: wrong password");
        return Err(Error::InvalidCredentials);
    }

    let upgraded_hash = verification == Verification::Legacy;
    let upgraded = if upgraded_hash {
        Some(password::hash_password(password_plain)?)
    } else {
        None
    };

    let token = new_token();
    let now = Utc::now();
    let expires_at = now
        .checked_add_signed(session_ttl)
        .ok_or_else(|| Error::Config {
            message: format!("Session lifetime {session_ttl} is out of range"),
        })?;

    let txn = db.begin().await?;

    if let Some(hash) = upgraded {
        users::set_password_hash(&txn, account.id, hash).await?;
    }
    users::set_online_status(&txn, account.id, true).await?;

    session::ActiveModel {
        user_id: Set(account.id),
        token_hash: Set(hash_token(&token)),
        created_at: Set(now),
        expires_at: Set(expires_at),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    let account = users::get_user_by_id(&txn, account.id)
        .await?
        .ok_or(Error::UserNotFound { id: account.id })?;

    txn.commit().await?;

    tracing::info!(user_id = account.id, username = %account.username, upgraded_hash, "user logged in");
    Ok(LoginOutcome {
        user: account,
        token,
        expires_at,
        upgraded_hash,
    })
}

async fn live_session_count<C>(db: &C, user_id: i64, now: DateTime<Utc>) -> Result<u64>
where
    C: ConnectionTrait,
{
    Session::find()
        .filter(session::Column::UserId.eq(user_id))
        .filter(session::Column::ExpiresAt.gt(now))
        .count(db)
        .await
        .map_err(Into::into)
}

/// Ends sessions and clears the online-status flag.
///
/// With a user id, every session of that user is closed. With only a token, that
/// one session is closed and the flag is cleared if nothing else is live. Unknown
/// ids and tokens are ignored, so logout always succeeds.
pub async fn logout(db: &DatabaseConnection, user_id: Option<i64>, token: Option<&str>) -> Result<()> {
    let txn = db.begin().await?;

    if let Some(user_id) = user_id {
        Session::delete_many()
            .filter(session::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        users::set_online_status(&txn, user_id, false).await?;
        tracing::info!(user_id, "user logged out");
    } else if let Some(token) = token {
        let found = Session::find()
            .filter(session::Column::TokenHash.eq(hash_token(token)))
            .one(&txn)
            .await?;
        if let Some(found) = found {
            let owner = found.user_id;
            found.delete(&txn).await?;
            if live_session_count(&txn, owner, Utc::now()).await? == 0 {
                users::set_online_status(&txn, owner, false).await?;
            }
            tracing::info!(user_id = owner, "session closed");
        }
    }

    txn.commit().await?;
    Ok(())
}

/// Returns the user behind a bearer token if its session is still live.
pub async fn resolve_session(
    db: &DatabaseConnection,
    token: &str,
    now: DateTime<Utc>,
) -> Result<Option<user::Model>> {
    let found = Session::find()
        .filter(session::Column::TokenHash.eq(hash_token(token)))
        .filter(session::Column::ExpiresAt.gt(now))
        .find_also_related(crate::entities::User)
        .one(db)
        .await?;
    Ok(found.and_then(|(_, owner)| owner))
}

/// Deletes expired sessions and clears the online flag of users left with none.
///
/// Returns the number of sessions removed.
pub async fn purge_expired_sessions(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<u64> {
    let txn = db.begin().await?;

    let expired = Session::find()
        .filter(session::Column::ExpiresAt.lte(now))
        .all(&txn)
        .await?;
    if expired.is_empty() {
        return Ok(0);
    }
    let owners: BTreeSet<i64> = expired.iter().map(|s| s.user_id).collect();

    let removed = Session::delete_many()
        .filter(session::Column::ExpiresAt.lte(now))
        .exec(&txn)
        .await?
        .rows_affected;

    for owner in owners {
        if live_session_count(&txn, owner, now).await? == 0 {
            users::set_online_status(&txn, owner, false).await?;
        }
    }

    txn.commit().await?;

    tracing::debug!(removed, "expired sessions purged");
    Ok(removed)
}
