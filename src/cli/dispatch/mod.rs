use crate::{
    api::AuthConfig,
    auth::{AuthType, ExemptPaths},
    cli::{
        actions::{server::Args, Action},
        commands::{self, auth},
    },
};
use anyhow::{anyhow, Context, Result};

/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches
        .get_one::<u16>(commands::ARG_PORT)
        .copied()
        .unwrap_or(8080);
    let dsn = matches.get_one::<String>(commands::ARG_DSN).cloned();
    let max_connections = matches
        .get_one::<u32>(commands::ARG_MAX_CONNECTIONS)
        .copied()
        .unwrap_or(5);

    Ok(Action::Server(Args {
        port,
        dsn,
        max_connections,
        auth: auth_config(matches)?,
    }))
}

fn auth_config(matches: &clap::ArgMatches) -> Result<AuthConfig> {
    let auth_type = matches
        .get_one::<String>(auth::ARG_AUTH_TYPE)
        .map_or(Ok(AuthType::default()), |value| value.parse::<AuthType>())
        .map_err(|err| anyhow!(err))?;

    let session_name = matches
        .get_one::<String>(auth::ARG_SESSION_NAME)
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .context("session cookie name must not be empty")?;

    let exempt_paths = matches
        .get_one::<String>(auth::ARG_EXEMPT_PATHS)
        .map(|paths| ExemptPaths::new(paths.split(',')))
        .unwrap_or_default();

    Ok(AuthConfig::new(auth_type)
        .with_session_name(session_name)
        .with_exempt_paths(exempt_paths)
        .with_session_cookie_secure(matches.get_flag(auth::ARG_SESSION_COOKIE_SECURE)))
}
