//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `contrib_core` linkage with deterministic output.
//! - Print the user key and profile URL for identities given as arguments.
//!
//! Arguments containing `://` are treated as OpenID identifiers, anything
//! else as a Google account email. `CONTRIB_CONFIG` may point at a JSON
//! `CoreConfig` to override the salt.

use contrib_core::{CoreConfig, User};
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("contrib_core ping={}", contrib_core::ping());
    println!("contrib_core version={}", contrib_core::core_version());

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    for identity in std::env::args().skip(1) {
        let user = if identity.contains("://") {
            User::from_openid(identity.as_str())
        } else {
            User::from_google(identity.as_str())
        };
        match user.profile_page_url(&config.salt) {
            Ok(url) => println!("{} {}", user.public_name(), url),
            Err(err) => {
                eprintln!("error: `{identity}`: {err}");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}

fn load_config() -> Result<CoreConfig, String> {
    let Ok(path) = std::env::var("CONTRIB_CONFIG") else {
        return Ok(CoreConfig::default());
    };
    let raw = std::fs::read_to_string(&path)
        .map_err(|err| format!("failed to read config `{path}`: {err}"))?;
    CoreConfig::from_json_str(&raw).map_err(|err| err.to_string())
}
