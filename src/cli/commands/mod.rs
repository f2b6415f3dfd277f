pub mod logging;

use clap::{
    builder::styling::{AnsiColor, Effects, Styles},
    Arg, ColorChoice, Command,
};

pub const ARG_PORT: &str = "port";
pub const ARG_CREDENTIALS: &str = "credentials";
pub const ARG_STATIC_DIR: &str = "static-dir";
pub const CMD_HASH_PASSWORD: &str = "hash-password";
pub const ARG_PASSWORD: &str = "password";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("mergington")
        .about("Extracurricular activity signup service")
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .arg(
            Arg::new(ARG_PORT)
                .short('p')
                .long("port")
                .help("Port to listen on")
                .default_value("8000")
                .env("MERGINGTON_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_CREDENTIALS)
                .short('c')
                .long("credentials")
                .help("Path to the teacher credentials JSON file")
                .long_help(
                    "Path to the teacher credentials JSON file, shaped as \
                     {\"teachers\": {\"<username>\": {\"password\": \"<argon2 hash>\"}}}. \
                     The file is re-read on every login and session check.",
                )
                .default_value("users.json")
                .env("MERGINGTON_CREDENTIALS"),
        )
        .arg(
            Arg::new(ARG_STATIC_DIR)
                .long("static-dir")
                .help("Directory served under /static")
                .default_value("static")
                .env("MERGINGTON_STATIC_DIR"),
        )
        .subcommand(
            Command::new(CMD_HASH_PASSWORD)
                .about("Print an Argon2 hash for the credentials file")
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .help("Password to hash")
                        .env("MERGINGTON_PASSWORD")
                        .hide_env_values(true)
                        .required(true),
                ),
        );

    logging::with_args(command)
}
