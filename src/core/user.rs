//! User administration business logic.
//!
//! This module provides functions for listing, creating, updating, and deleting user
//! accounts, plus the small writes the login flow needs (status flag and password
//! hash). Deletes are hard deletes. Every administrative change appends an audit entry
//! inside the same database transaction as the change itself.

use crate::{
    core::{audit, password},
    entities::{Role, Session, User, session, user},
    errors::{Error, Result},
};
use sea_orm::{PaginatorTrait, QueryOrder, Set, TransactionTrait, prelude::*, sea_query::Expr};

/// Fields needed to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Login name, must be unique
    pub username: String,
    /// Plaintext password, hashed before storage
    pub password: String,
    /// Given name
    pub first_name: String,
    /// Family name
    pub last_name: String,
    /// Role of the account
    pub role: Role,
}

/// Fields accepted when editing an account.
#[derive(Debug, Clone)]
pub struct UserUpdate {
    /// Account to edit
    pub id: i64,
    /// New login name
    pub username: String,
    /// New given name
    pub first_name: String,
    /// New family name
    pub last_name: String,
    /// New role
    pub role: Role,
    /// New password; `None` or empty leaves the current hash in place
    pub password: Option<String>,
}

fn clean_username(username: &str) -> Result<String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(Error::validation("Username cannot be empty"));
    }
    Ok(trimmed.to_string())
}

/// Retrieves all users ordered by id.
pub async fn list_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .order_by_asc(user::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves users whose online-status flag is set.
pub async fn list_online_users(db: &DatabaseConnection) -> Result<Vec<user::Model>> {
    User::find()
        .filter(user::Column::Status.eq(1))
        .order_by_asc(user::Column::Username)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Counts all accounts.
pub async fn count_users(db: &DatabaseConnection) -> Result<u64> {
    User::find().count(db).await.map_err(Into::into)
}

/// Finds a user by id.
pub async fn get_user_by_id<C>(db: &C, user_id: i64) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find_by_id(user_id).one(db).await.map_err(Into::into)
}

/// Finds a user by exact username.
pub async fn get_user_by_username<C>(db: &C, username: &str) -> Result<Option<user::Model>>
where
    C: ConnectionTrait,
{
    User::find()
        .filter(user::Column::Username.eq(username))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts an account with an already computed password hash.
///
/// Used by [`create_user`] and by seeding, which may carry legacy digests.
pub async fn insert_user_with_hash<C>(
    db: &C,
    username: &str,
    password_hash: String,
    first_name: &str,
    last_name: &str,
    role: Role,
) -> Result<user::Model>
where
    C: ConnectionTrait,
{
    let username = clean_username(username)?;
    let now = chrono::Utc::now();

    let account = user::ActiveModel {
        username: Set(username.clone()),
        password_hash: Set(password_hash),
        first_name: Set(first_name.trim().to_string()),
        last_name: Set(last_name.trim().to_string()),
        role: Set(role),
        status: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    account
        .insert(db)
        .await
        .map_err(|e| Error::on_unique_violation(e, || Error::DuplicateUsername { username }))
}

/// Creates a new account, hashing its password with argon2.
///
/// # Errors
/// Returns an error if:
/// - The username is empty or already taken
/// - The password is empty
/// - The database insert fails
pub async fn create_user(
    db: &DatabaseConnection,
    new_user: NewUser,
    actor: &str,
) -> Result<user::Model> {
    if new_user.password.is_empty() {
        return Err(Error::validation("Password cannot be empty"));
    }
    let password_hash = password::hash_password(&new_user.password)?;

    let txn = db.begin().await?;

    let created = insert_user_with_hash(
        &txn,
        &new_user.username,
        password_hash,
        &new_user.first_name,
        &new_user.last_name,
        new_user.role,
    )
    .await?;

    audit::record(&txn, actor, format!("Created user {}", created.username)).await?;
    txn.commit().await?;

    tracing::info!(user_id = created.id, username = %created.username, role = %created.role, "user created");
    Ok(created)
}

/// Updates an account's profile, role, and optionally its password.
///
/// # Errors
/// Returns an error if:
/// - The user does not exist
/// - The new username is empty or belongs to another account
/// - The database update fails
pub async fn update_user(
    db: &DatabaseConnection,
    update: UserUpdate,
    actor: &str,
) -> Result<user::Model> {
    let username = clean_username(&update.username)?;
    let new_hash = match update.password.as_deref() {
        Some(plain) if !plain.is_empty() => Some(password::hash_password(plain)?),
        _ => None,
    };

    let txn = db.begin().await?;

    let mut account: user::ActiveModel = get_user_by_id(&txn, update.id)
        .await?
        .ok_or(Error::UserNotFound { id: update.id })?
        .into();

    account.username = Set(username.clone());
    account.first_name = Set(update.first_name.trim().to_string());
    account.last_name = Set(update.last_name.trim().to_string());
    account.role = Set(update.role);
    if let Some(hash) = new_hash {
        account.password_hash = Set(hash);
    }
    account.updated_at = Set(chrono::Utc::now());

    let updated = account
        .update(&txn)
        .await
        .map_err(|e| Error::on_unique_violation(e, || Error::DuplicateUsername { username }))?;

    audit::record(&txn, actor, format!("Updated user {}", updated.username)).await?;
    txn.commit().await?;

    Ok(updated)
}

/// Hard-deletes an account and its sessions.
///
/// Returns `Ok(false)` when no such user exists; that is not an error.
pub async fn delete_user(db: &DatabaseConnection, user_id: i64, actor: &str) -> Result<bool> {
    let txn = db.begin().await?;

    let Some(account) = get_user_by_id(&txn, user_id).await? else {
        return Ok(false);
    };
    let username = account.username.clone();

    Session::delete_many()
        .filter(session::Column::UserId.eq(user_id))
        .exec(&txn)
        .await?;
    account.delete(&txn).await?;

    audit::record(&txn, actor, format!("Deleted user {username}")).await?;
    txn.commit().await?;

    tracing::info!(user_id, %username, "user deleted");
    Ok(true)
}

/// Sets or clears the online-status flag. Missing users are ignored.
pub async fn set_online_status<C>(db: &C, user_id: i64, online: bool) -> Result<()>
where
    C: ConnectionTrait,
{
    User::update_many()
        .col_expr(user::Column::Status, Expr::value(i32::from(online)))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

/// Replaces a user's password hash.
pub async fn set_password_hash<C>(db: &C, user_id: i64, password_hash: String) -> Result<()>
where
    C: ConnectionTrait,
{
    User::update_many()
        .col_expr(user::Column::PasswordHash, Expr::value(password_hash))
        .col_expr(user::Column::UpdatedAt, Expr::value(chrono::Utc::now()))
        .filter(user::Column::Id.eq(user_id))
        .exec(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{
        core::password::{Verification, verify_password},
        entities::AuditLog,
        test_utils::*,
    };
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn new_user(username: &str, password: &str, role: Role) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: password.to_string(),
            first_name: "Test".to_string(),
            last_name: username.to_string(),
            role,
        }
    }

    #[tokio::test]
    async fn test_create_user_validation() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = create_user(
            &db,
            NewUser {
                username: "alice".to_string(),
                password: String::new(),
                first_name: "Alice".to_string(),
                last_name: "Doe".to_string(),
                role: Role::Cashier,
            },
            "admin",
        )
        .await;
        assert!(matches!(result, Err(Error::Validation { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_integration() -> Result<()> {
        let db = setup_test_db().await?;

        let created = create_user(&db, new_user("alice", "pw", Role::Manager), "admin").await?;
        assert_eq!(created.username, "alice");
        assert_eq!(created.role, Role::Manager);
        assert_eq!(created.status, 0);
        assert_eq!(verify_password("pw", &created.password_hash), Verification::Strong);

        let logs = AuditLog::find().all(&db).await?;
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].action, "Created user alice");
        assert_eq!(logs[0].username, "admin");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_user_duplicate_username() -> Result<()> {
        let db = setup_test_db().await?;
        create_user(&db, new_user("alice", "pw", Role::Cashier), "admin").await?;

        let result = create_user(&db, new_user("alice", "other", Role::Admin), "admin").await;
        assert!(matches!(
            result,
            Err(Error::DuplicateUsername { username }) if username == "alice"
        ));
        assert_eq!(count_users(&db).await?, 1);
        // The failed attempt leaves no audit entry behind
        assert_eq!(AuditLog::find().count(&db).await?, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_keeps_password_when_blank() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_user(&db, "bob", "original", Role::Cashier).await?;

        let updated = update_user(
            &db,
            UserUpdate {
                id: created.id,
                username: "bobby".to_string(),
                first_name: "Bob".to_string(),
                last_name: "Builder".to_string(),
                role: Role::Manager,
                password: Some(String::new()),
            },
            "admin",
        )
        .await?;

        assert_eq!(updated.username, "bobby");
        assert_eq!(updated.role, Role::Manager);
        assert_eq!(updated.password_hash, created.password_hash);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_changes_password_when_given() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_test_user(&db, "carol", "old", Role::Cashier).await?;

        let updated = update_user(
            &db,
            UserUpdate {
                id: created.id,
                username: "carol".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role: Role::Cashier,
                password: Some("new".to_string()),
            },
            "admin",
        )
        .await?;

        assert_eq!(verify_password("new", &updated.password_hash), Verification::Strong);
        assert_eq!(verify_password("old", &updated.password_hash), Verification::Mismatch);

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_not_found() -> Result<()> {
        let db = setup_test_db().await?;

        let result = update_user(
            &db,
            UserUpdate {
                id: 999,
                username: "ghost".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role: Role::Cashier,
                password: None,
            },
            "admin",
        )
        .await;
        assert!(matches!(result, Err(Error::UserNotFound { id: 999 })));

        Ok(())
    }

    #[tokio::test]
    async fn test_update_user_rename_to_taken_username() -> Result<()> {
        let db = setup_test_db().await?;
        create_test_user(&db, "dave", "pw", Role::Cashier).await?;
        let erin = create_test_user(&db, "erin", "pw", Role::Cashier).await?;

        let result = update_user(
            &db,
            UserUpdate {
                id: erin.id,
                username: "dave".to_string(),
                first_name: String::new(),
                last_name: String::new(),
                role: Role::Cashier,
                password: None,
            },
            "admin",
        )
        .await;
        assert!(matches!(result, Err(Error::DuplicateUsername { .. })));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_user_is_hard_delete() -> Result<()> {
        let db = setup_test_db().await?;
        let created = create_user(&db, new_user("frank", "pw", Role::Cashier), "admin").await?;

        assert!(delete_user(&db, created.id, "admin").await?);
        assert!(get_user_by_id(&db, created.id).await?.is_none());

        // Deleting again is a no-op rather than an error
        assert!(!delete_user(&db, created.id, "admin").await?);

        let actions: Vec<String> = AuditLog::find()
            .all(&db)
            .await?
            .into_iter()
            .map(|entry| entry.action)
            .collect();
        assert_eq!(actions, vec!["Created user frank", "Deleted user frank"]);

        Ok(())
    }

    #[tokio::test]
    async fn test_list_online_users_filters_on_status() -> Result<()> {
        let db = setup_test_db().await?;
        let online = create_test_user(&db, "gina", "pw", Role::Cashier).await?;
        create_test_user(&db, "hank", "pw", Role::Cashier).await?;

        set_online_status(&db, online.id, true).await?;

        let users = list_online_users(&db).await?;
        assert_eq!(users.len(), 1);
        assert_eq!(users[0].username, "gina");
        assert_eq!(list_users(&db).await?.len(), 2);

        Ok(())
    }
}
