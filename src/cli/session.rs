// Session commands: obtain and inspect tokens

use crate::app_data::AppData;
use crate::types::internal::AccessToken;

pub async fn login(app_data: &AppData, username: &str, password: &str) -> Result<(), Box<dyn std::error::Error>> {
    let manager = app_data.session_manager();

    let Some(token) = manager.authenticate(username, password).await? else {
        println!("❌ Invalid username or password");
        return Err("Authentication failed".into());
    };

    let claims = app_data.token_provider.validate(&token, app_data.clock.now())?;
    let expires_at = claims.expires_at().map(|at| at.to_rfc3339()).unwrap_or_default();

    println!("✓ Logged in as '{}'", username);
    println!("  Expires at {}", expires_at);
    println!("{}", token.as_str());

    Ok(())
}

pub async fn whoami(app_data: &AppData, token: &str) -> Result<(), Box<dyn std::error::Error>> {
    let manager = app_data.session_manager();
    let user = manager.verify_token(&AccessToken::from(token)).await?;

    println!("{} ({}) <{}>", user.username, user.role, user.email);
    if let Some(last_login) = user.last_login.and_then(|ts| chrono::DateTime::from_timestamp(ts, 0)) {
        println!("  Last login: {}", last_login.to_rfc3339());
    }

    Ok(())
}
