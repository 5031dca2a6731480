use clap::{Arg, ArgAction, Command};

use crate::{api::DEFAULT_EXEMPT_PATHS, auth::DEFAULT_SESSION_NAME};

pub const ARG_AUTH_TYPE: &str = "auth-type";
pub const ARG_SESSION_NAME: &str = "session-name";
pub const ARG_EXEMPT_PATHS: &str = "exempt-paths";
pub const ARG_SESSION_COOKIE_SECURE: &str = "session-cookie-secure";

#[must_use]
pub fn with_args(command: Command) -> Command {
    let exempt_paths: &'static str = Box::leak(DEFAULT_EXEMPT_PATHS.join(",").into_boxed_str());

    command
        .arg(
            Arg::new(ARG_AUTH_TYPE)
                .long(ARG_AUTH_TYPE)
                .help("How requests are authenticated")
                .default_value("session")
                .env("TESSERA_AUTH_TYPE")
                .value_parser(["basic", "session"]),
        )
        .arg(
            Arg::new(ARG_SESSION_NAME)
                .long(ARG_SESSION_NAME)
                .help("Name of the session cookie")
                .default_value(DEFAULT_SESSION_NAME)
                .env("TESSERA_SESSION_NAME"),
        )
        .arg(
            Arg::new(ARG_EXEMPT_PATHS)
                .long(ARG_EXEMPT_PATHS)
                .help("Comma-separated paths served without authentication")
                .long_help(
                    "Comma-separated paths served without authentication. Matching is exact after normalizing a trailing '/'.",
                )
                .default_value(exempt_paths)
                .env("TESSERA_EXEMPT_PATHS"),
        )
        .arg(
            Arg::new(ARG_SESSION_COOKIE_SECURE)
                .long(ARG_SESSION_COOKIE_SECURE)
                .help("Mark the session cookie Secure (HTTPS only)")
                .env("TESSERA_SESSION_COOKIE_SECURE")
                .action(ArgAction::SetTrue),
        )
}
