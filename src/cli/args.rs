//! Command-line argument parsing for ratewatch.

use crate::models::ThemeType;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Follow the live rate list (default)
    Home,
    /// Follow the live favorites list
    Favorites,
    /// Follow one rate
    Detail { id: String },
    /// Run a search and follow its results
    Search { query: String },
    /// Toggle a rate's favorite state
    ToggleFavorite { id: String },
    /// Show the theme, or set it when one is given
    Theme { set: Option<ThemeType> },
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Arguments that do not form a command
    Invalid { message: String },
}

/// Usage text printed by `--help` and on invalid arguments.
pub const USAGE: &str = "\
Usage: ratewatch [command]

Commands:
  home                 follow the live rate list (default)
  favorites            follow the live favorites list
  detail <id>          follow one rate
  search <query>       search rates by symbol
  favorite <id>        toggle a rate's favorite state
  theme [system|light|dark]
                       show or set the theme

Options:
  -h, --help           show this help
  -V, --version        show version information

Environment:
  RATEWATCH_BASE_URL, RATEWATCH_DATA_DIR, RATEWATCH_LIVE_INTERVAL_MS,
  RATEWATCH_FAVORITE_INTERVAL_MS, RATEWATCH_DETAIL_INTERVAL_MS,
  RATEWATCH_OFFLINE=1, RUST_LOG";

/// Parse command-line arguments and return the command to run.
///
/// # Examples
///
/// ```
/// use ratewatch::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["ratewatch".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    // Skip the program name
    let args: Vec<String> = args.skip(1).collect();

    if let Some(flag) = args.iter().find(|a| a.starts_with('-')) {
        return match flag.as_str() {
            "--version" | "-V" => CliCommand::Version,
            "--help" | "-h" => CliCommand::Help,
            other => CliCommand::Invalid {
                message: format!("unknown option '{}'", other),
            },
        };
    }

    let mut words = args.into_iter();
    let command = match words.next() {
        None => return CliCommand::Home,
        Some(command) => command,
    };
    let rest: Vec<String> = words.collect();

    match command.as_str() {
        "home" => expect_no_args(CliCommand::Home, &command, &rest),
        "favorites" => expect_no_args(CliCommand::Favorites, &command, &rest),
        "detail" => match rest.as_slice() {
            [id] => CliCommand::Detail { id: id.clone() },
            _ => invalid("detail takes exactly one rate id"),
        },
        "favorite" => match rest.as_slice() {
            [id] => CliCommand::ToggleFavorite { id: id.clone() },
            _ => invalid("favorite takes exactly one rate id"),
        },
        "search" if !rest.is_empty() => CliCommand::Search {
            query: rest.join(" "),
        },
        "search" => invalid("search needs a query"),
        "theme" => match rest.as_slice() {
            [] => CliCommand::Theme { set: None },
            [name] => match name.parse::<ThemeType>() {
                Ok(theme) => CliCommand::Theme { set: Some(theme) },
                Err(_) => invalid(&format!("unknown theme '{}'", name)),
            },
            _ => invalid("theme takes at most one value"),
        },
        other => invalid(&format!("unknown command '{}'", other)),
    }
}

fn expect_no_args(command: CliCommand, name: &str, rest: &[String]) -> CliCommand {
    if rest.is_empty() {
        command
    } else {
        invalid(&format!("{} takes no arguments", name))
    }
}

fn invalid(message: &str) -> CliCommand {
    CliCommand::Invalid {
        message: message.to_string(),
    }
}
