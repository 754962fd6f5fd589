//! Command parsing for player input.

/// A parsed player command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Take a careful look around the current location.
    Look,
    /// Move to a neighboring location by id or display name.
    Move {
        /// The target location, if one was given.
        target: Option<String>,
    },
    /// Search the current location for items.
    Search,
    /// Use a carried item.
    Use {
        /// The item id or name fragment, if one was given.
        target: Option<String>,
    },
    /// Report the player's vital statistics.
    Status,
    /// Show the command list.
    Help,
    /// The input was empty.
    Empty,
    /// The verb was not recognized.
    Unknown {
        /// The original input.
        input: String,
    },
}

/// Verb synonyms for command parsing.
const LOOK_VERBS: &[&str] = &["look", "l"];
const MOVE_VERBS: &[&str] = &["move", "go", "m"];
const SEARCH_VERBS: &[&str] = &["search", "s"];
const USE_VERBS: &[&str] = &["use", "u"];
const STATUS_VERBS: &[&str] = &["status", "stats"];
const HELP_VERBS: &[&str] = &["help", "?"];

/// Parse a player input string into a command.
///
/// The first whitespace-delimited word is the verb (case-insensitive);
/// everything after it is the argument, with its original casing kept for
/// display. Argument matching against ids and names happens later and is
/// itself case-insensitive.
pub fn parse_command(input: &str) -> Command {
    let input = input.trim();
    if input.is_empty() {
        return Command::Empty;
    }

    let mut parts = input.splitn(2, char::is_whitespace);
    let verb = parts.next().unwrap_or("").to_lowercase();
    let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

    if LOOK_VERBS.contains(&verb.as_str()) {
        return Command::Look;
    }
    if MOVE_VERBS.contains(&verb.as_str()) {
        return Command::Move {
            target: arg.map(str::to_string),
        };
    }
    if SEARCH_VERBS.contains(&verb.as_str()) {
        return Command::Search;
    }
    if USE_VERBS.contains(&verb.as_str()) {
        return Command::Use {
            target: arg.map(str::to_string),
        };
    }
    if STATUS_VERBS.contains(&verb.as_str()) {
        return Command::Status;
    }
    if HELP_VERBS.contains(&verb.as_str()) {
        return Command::Help;
    }

    Command::Unknown {
        input: input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_look() {
        assert_eq!(parse_command("look"), Command::Look);
        assert_eq!(parse_command("l"), Command::Look);
        assert_eq!(parse_command("LOOK"), Command::Look);
    }

    #[test]
    fn parse_move_with_target() {
        assert_eq!(
            parse_command("move hall"),
            Command::Move {
                target: Some("hall".to_string())
            }
        );
        assert_eq!(
            parse_command("go Long Hallway"),
            Command::Move {
                target: Some("Long Hallway".to_string())
            }
        );
        assert_eq!(
            parse_command("m cellar"),
            Command::Move {
                target: Some("cellar".to_string())
            }
        );
    }

    #[test]
    fn parse_move_without_target() {
        assert_eq!(parse_command("move"), Command::Move { target: None });
        assert_eq!(parse_command("move   "), Command::Move { target: None });
    }

    #[test]
    fn parse_search() {
        assert_eq!(parse_command("search"), Command::Search);
        assert_eq!(parse_command("s"), Command::Search);
    }

    #[test]
    fn parse_use() {
        assert_eq!(
            parse_command("use lantern"),
            Command::Use {
                target: Some("lantern".to_string())
            }
        );
        assert_eq!(parse_command("u"), Command::Use { target: None });
    }

    #[test]
    fn parse_status_and_help() {
        assert_eq!(parse_command("status"), Command::Status);
        assert_eq!(parse_command("stats"), Command::Status);
        assert_eq!(parse_command("help"), Command::Help);
        assert_eq!(parse_command("?"), Command::Help);
    }

    #[test]
    fn parse_empty() {
        assert_eq!(parse_command(""), Command::Empty);
        assert_eq!(parse_command("   "), Command::Empty);
    }

    #[test]
    fn parse_unknown_keeps_input() {
        assert_eq!(
            parse_command("dance wildly"),
            Command::Unknown {
                input: "dance wildly".to_string()
            }
        );
    }

    #[test]
    fn argument_keeps_original_casing() {
        assert_eq!(
            parse_command("USE Strange Potion"),
            Command::Use {
                target: Some("Strange Potion".to_string())
            }
        );
    }
}
