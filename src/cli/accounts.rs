// Account administration commands
// The CLI runs with operator rights, so these bypass the role gate.

use crate::app_data::AppData;
use crate::config::{commit_scope, session_scope};
use crate::stores::user_store::NewUser;
use crate::types::db::{UserRole, user};

pub async fn create_user(
    app_data: &AppData,
    username: &str,
    email: &str,
    role: UserRole,
    password: &str,
) -> Result<user::Model, Box<dyn std::error::Error>> {
    let txn = session_scope(&app_data.db).await?;
    let created = app_data
        .user_store
        .create_user(
            &txn,
            NewUser {
                username,
                email,
                role,
                password,
            },
        )
        .await?;
    commit_scope(txn).await?;

    println!("✓ Created {} '{}' (id {})", created.role, created.username, created.id);

    Ok(created)
}

pub async fn deactivate_user(app_data: &AppData, username: &str) -> Result<user::Model, Box<dyn std::error::Error>> {
    let txn = session_scope(&app_data.db).await?;
    let Some(user) = app_data.user_store.find_by_username(&txn, username).await? else {
        println!("❌ Error: No account named '{}'", username);
        return Err(format!("User not found: {}", username).into());
    };

    if !user.is_active {
        println!("ℹ️  Account '{}' is already inactive.", username);
        return Ok(user);
    }

    let user = app_data.user_store.set_active(&txn, user, false).await?;
    commit_scope(txn).await?;

    tracing::info!(user_id = user.id, username = %user.username, "Account deactivated via CLI");
    println!("✓ Account '{}' deactivated", username);

    Ok(user)
}
