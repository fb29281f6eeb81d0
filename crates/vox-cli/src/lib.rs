//! # vox-cli -- Command-line front-end for the admin console
//!
//! Each invocation connects a [`Console`], loads the collection it needs,
//! performs one action through the optimistic controllers, and prints the
//! resulting notices.
//!
//! ```bash
//! vox list incidents --status open --search telephony
//! vox set-status disputes DSP-1042 resolved --notes "refund issued"
//! vox notes trials TRL-220 "asked for a demo"
//! vox extend-trial TRL-220 --days 14 --reason "onboarding delayed"
//! vox change-tier TIR-88 pro
//! vox approve-tier TIR-88
//! vox create-incident --title "SMS delays" --severity high --service sms
//! vox health
//! vox profile set company="Voxline Inc" phone="+1 415 555 0199"
//! ```
//!
//! ## Connection
//!
//! `--api-url`, `--token` and `--actor` override `VOX_API_URL`,
//! `VOX_API_TOKEN` and `VOX_ACTOR`. `VOX_TIMEOUT_SECS` and
//! `VOX_MAX_RETRIES` tune the transport.

pub mod profile;
pub mod records;
pub mod system;

use anyhow::{Context, Result};
use clap::Args;

use vox_client::config::DEFAULT_API_URL;
use vox_client::{ApiClient, ApiConfig};
use vox_console::{Console, Notice};
use vox_core::Actor;

/// Exit code for input rejected by validation.
pub const EXIT_INVALID: u8 = 2;

/// Backend connection flags shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct ConnectionArgs {
    /// Backend base URL [env: VOX_API_URL].
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Bearer token [env: VOX_API_TOKEN].
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Name recorded in timeline entries [env: VOX_ACTOR, default: admin].
    #[arg(long, global = true)]
    pub actor: Option<String>,
}

/// Build the client configuration from flags, falling back to `env`.
pub fn resolve_config(
    args: &ConnectionArgs,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ApiConfig> {
    let url = args
        .api_url
        .clone()
        .or_else(|| env("VOX_API_URL"))
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let token = args
        .token
        .clone()
        .or_else(|| env("VOX_API_TOKEN"))
        .context("no API token: pass --token or set VOX_API_TOKEN")?;

    let mut config = ApiConfig::new(&url, &token)?;
    if let Some(secs) = env("VOX_TIMEOUT_SECS") {
        config.timeout_secs = secs
            .parse()
            .with_context(|| format!("VOX_TIMEOUT_SECS is not a number: {secs}"))?;
    }
    if let Some(retries) = env("VOX_MAX_RETRIES") {
        config.max_retries = retries
            .parse()
            .with_context(|| format!("VOX_MAX_RETRIES is not a number: {retries}"))?;
    }
    Ok(config)
}

/// The acting admin, from `--actor`, `VOX_ACTOR`, or `admin`.
pub fn resolve_actor(args: &ConnectionArgs, env: impl Fn(&str) -> Option<String>) -> Result<Actor> {
    let name = args
        .actor
        .clone()
        .or_else(|| env("VOX_ACTOR"))
        .unwrap_or_else(|| "admin".to_string());
    Ok(Actor::new(name)?)
}

/// Connect a console using the process environment as fallback.
pub fn connect(args: &ConnectionArgs) -> Result<Console> {
    let env = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());
    let config = resolve_config(args, env)?;
    tracing::debug!(?config, "connecting");
    let client = ApiClient::new(config)?;
    Ok(Console::new(&client, resolve_actor(args, env)?))
}

/// Print notices: successes to stdout, errors to stderr.
pub fn print_notices(notices: &[Notice]) {
    for notice in notices {
        if notice.is_error() {
            eprintln!("error: {notice}");
        } else {
            println!("{notice}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn flags_override_env() {
        let args = ConnectionArgs {
            api_url: Some("http://backend:9000".into()),
            token: Some("flag-token".into()),
            actor: None,
        };
        let env = env_of(&[("VOX_API_URL", "http://ignored"), ("VOX_API_TOKEN", "env-token")]);
        let config = resolve_config(&args, env).unwrap();
        assert_eq!(config.base_url.as_str(), "http://backend:9000/");
        assert_eq!(config.api_token.as_str(), "flag-token");
    }

    #[test]
    fn env_fills_missing_flags() {
        let env = env_of(&[
            ("VOX_API_TOKEN", "env-token"),
            ("VOX_TIMEOUT_SECS", "7"),
            ("VOX_MAX_RETRIES", "0"),
        ]);
        let config = resolve_config(&ConnectionArgs::default(), env).unwrap();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:8090/");
        assert_eq!(config.timeout_secs, 7);
        assert_eq!(config.max_retries, 0);
    }

    #[test]
    fn missing_token_is_an_error() {
        let err = resolve_config(&ConnectionArgs::default(), env_of(&[])).unwrap_err();
        assert!(err.to_string().contains("VOX_API_TOKEN"));
    }

    #[test]
    fn bad_retry_count_is_an_error() {
        let env = env_of(&[("VOX_API_TOKEN", "t"), ("VOX_MAX_RETRIES", "many")]);
        assert!(resolve_config(&ConnectionArgs::default(), env).is_err());
    }

    #[test]
    fn actor_defaults_to_admin() {
        let actor = resolve_actor(&ConnectionArgs::default(), env_of(&[])).unwrap();
        assert_eq!(actor.as_str(), "admin");
        let actor = resolve_actor(&ConnectionArgs::default(), env_of(&[("VOX_ACTOR", "dana")])).unwrap();
        assert_eq!(actor.as_str(), "dana");
    }
}
