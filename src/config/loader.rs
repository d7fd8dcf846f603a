//! Configuration loading and environment variable interpolation

use crate::error::{Error, Result};
use regex::Regex;
use std::env;
use std::fs;
use std::path::Path;

use super::Config;

const CONFIG_FILENAME: &str = "whisperbox.toml";

/// Load configuration from whisperbox.toml
pub fn load_config() -> Result<Config> {
    let config_path = find_config_file()?;
    load_config_from_path(&config_path)
}

/// Load configuration from a specific path
pub fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|_| Error::ConfigNotFound)?;
    let content = interpolate_env_vars(&content);
    let config: Config = toml::from_str(&content)?;
    Ok(config)
}

/// Find the configuration file, searching upward from current directory
fn find_config_file() -> Result<std::path::PathBuf> {
    let mut current = env::current_dir().map_err(|e| Error::Config(e.to_string()))?;

    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Ok(config_path);
        }

        if !current.pop() {
            return Err(Error::ConfigNotFound);
        }
    }
}

/// Interpolate environment variables in the format ${VAR_NAME} or ${VAR_NAME:-default}
fn interpolate_env_vars(content: &str) -> String {
    // Compile-time constant pattern, panicking indicates a bug in the codebase
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)(?::-([^}]*))?\}")
        .expect("Invalid regex pattern - this is a bug in the codebase");

    re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");

        env::var(var_name).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}

/// Generate a default configuration file content
pub fn default_config_content() -> &'static str {
    r#"# Whisperbox Configuration

[server]
host = "0.0.0.0"
port = 3000
# Clients are pointed here when a request has no valid session
sign_in_path = "/sign-in"

[auth]
secret = "${WHISPERBOX_AUTH_SECRET:-whisperbox-dev-secret-change-in-production}"
token_ttl_secs = 3600
cookie_name = "whisperbox_token"

# User store. "memory" keeps accounts in-process and is intended for
# development; switch to "postgres" for anything persistent.
[database]
backend = "memory"

# [database]
# backend = "postgres"
#
# [database.connection]
# host = "localhost"
# port = 5432
# user = "whisperbox"
# password = "${WHISPERBOX_DB_PASSWORD}"
# dbname = "whisperbox"
"#
}
