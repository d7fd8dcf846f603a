//! CLI command implementations

use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Password};
use std::fs;

use crate::api;
use crate::auth::models::{generate_verify_code, is_valid_email, is_valid_username, User};
use crate::auth::{BcryptVerifier, PasswordVerifier};
use crate::cli::{error, info, print_user_table, success, warn, OutputFormat};
use crate::config;
use crate::store::{self, UserStore};

/// Initialize a new whisperbox.toml configuration file
pub async fn init() -> Result<()> {
    let config_path = std::path::Path::new("whisperbox.toml");

    if config_path.exists() {
        warn("whisperbox.toml already exists");
        return Ok(());
    }

    let content = config::loader::default_config_content();
    fs::write(config_path, content)?;

    success("Created whisperbox.toml");
    info("Edit the configuration file and run 'whisperbox serve' to start the server");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(host: &str, port: u16) -> Result<()> {
    let config = config::load_config()?;
    api::run_server(config, host, port).await?;
    Ok(())
}

/// Create a pre-verified account
pub async fn user_add(username: &str, email: &str, password: Option<String>) -> Result<()> {
    if !is_valid_username(username) {
        error("Username must be 2-20 characters, letters, digits, and underscores only");
        anyhow::bail!("invalid username");
    }
    if !is_valid_email(email) {
        error("Invalid email address");
        anyhow::bail!("invalid email");
    }

    let password = match password {
        Some(p) => p,
        None => Password::with_theme(&ColorfulTheme::default())
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()?,
    };

    let config = config::load_config()?;
    let store = store::connect(&config).await?;

    let verifier = BcryptVerifier::new();
    let password_hash = verifier.hash(&password)?;

    let mut user = User::new(
        username.to_string(),
        email.to_string(),
        password_hash,
        generate_verify_code(),
    );
    user.is_verified = true;

    match store.insert(user).await {
        Ok(()) => {
            success(&format!("Created verified account: {}", username));
            Ok(())
        }
        Err(e) => {
            error(&format!("Failed to create account: {}", e));
            Err(e.into())
        }
    }
}

/// List all accounts
pub async fn user_list(format: OutputFormat) -> Result<()> {
    let config = config::load_config()?;
    let store = store::connect(&config).await?;

    let users = store.list().await?;

    match format {
        OutputFormat::Table => {
            print_user_table(&users);
        }
        OutputFormat::Json => {
            // Public projection only, hashes and codes stay out of the output
            let rows: Vec<_> = users
                .iter()
                .map(|u| {
                    serde_json::json!({
                        "id": u.id,
                        "username": u.username,
                        "email": u.email,
                        "isVerified": u.is_verified,
                        "isAcceptingMessages": u.is_accepting_messages,
                        "createdAt": u.created_at,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
    }

    Ok(())
}
