//! Shell command parsing and help registry.

use mythic_core::{CollectionId, InsightId};
use thiserror::Error;

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    /// Print collections, unassigned insights and the tray.
    Show,
    /// Print the current snapshot as JSON.
    Json,
    Themes,
    SelectTheme(u32),
    Input(String),
    Generate,
    /// Capture the latest passage into the tray.
    Capture,
    NewCollection {
        title: String,
        description: Option<String>,
    },
    EditCollection {
        id: CollectionId,
        title: String,
        description: Option<String>,
    },
    DeleteCollection(CollectionId),
    Drag(InsightId),
    Over(CollectionId),
    Leave(CollectionId),
    Drop {
        id: CollectionId,
        index: Option<usize>,
    },
    DropOutside,
    Cancel,
    DeleteInsight {
        collection: CollectionId,
        insight: InsightId,
    },
    Reorder {
        collection: CollectionId,
        from: usize,
        to: usize,
    },
}

/// Errors from parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("Unknown command: {0} (try `help`)")]
    Unknown(String),
    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),
    #[error("Invalid number: {0}")]
    InvalidNumber(String),
}

impl Command {
    /// Parse one input line. Blank lines yield `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, CommandError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }

        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let mut args = rest.split_whitespace();

        let command = match word {
            "help" | "?" => Self::Help,
            "quit" | "exit" => Self::Quit,
            "show" | "ls" => Self::Show,
            "json" => Self::Json,
            "themes" => Self::Themes,
            "theme" => Self::SelectTheme(number(args.next(), "theme id")?),
            "input" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("text"));
                }
                Self::Input(rest.to_string())
            }
            "generate" | "gen" => Self::Generate,
            "capture" => Self::Capture,
            "new" => {
                let (title, description) = title_and_description(rest)?;
                Self::NewCollection { title, description }
            }
            "edit" => {
                let id = collection(args.next())?;
                let remainder = rest
                    .split_once(char::is_whitespace)
                    .map(|(_, r)| r)
                    .unwrap_or("");
                let (title, description) = title_and_description(remainder)?;
                Self::EditCollection {
                    id,
                    title,
                    description,
                }
            }
            "rmcol" => Self::DeleteCollection(collection(args.next())?),
            "drag" => Self::Drag(InsightId::new(number(args.next(), "insight id")?)),
            "over" => Self::Over(collection(args.next())?),
            "leave" => Self::Leave(collection(args.next())?),
            "drop" => {
                let id = collection(args.next())?;
                let index = args.next().map(|s| number(Some(s), "index")).transpose()?;
                Self::Drop { id, index }
            }
            "outside" => Self::DropOutside,
            "cancel" => Self::Cancel,
            "rm" => Self::DeleteInsight {
                collection: collection(args.next())?,
                insight: InsightId::new(number(args.next(), "insight id")?),
            },
            "move" => Self::Reorder {
                collection: collection(args.next())?,
                from: number(args.next(), "source index")?,
                to: number(args.next(), "target index")?,
            },
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(Some(command))
    }
}

fn number<T: std::str::FromStr>(arg: Option<&str>, name: &'static str) -> Result<T, CommandError> {
    let arg = arg.ok_or(CommandError::MissingArgument(name))?;
    arg.parse()
        .map_err(|_| CommandError::InvalidNumber(arg.to_string()))
}

fn collection(arg: Option<&str>) -> Result<CollectionId, CommandError> {
    number(arg, "collection id").map(CollectionId::new)
}

/// Split `title | description`.
fn title_and_description(text: &str) -> Result<(String, Option<String>), CommandError> {
    let (title, description) = match text.split_once('|') {
        Some((title, description)) => (title.trim(), Some(description.trim())),
        None => (text.trim(), None),
    };
    if title.is_empty() {
        return Err(CommandError::MissingArgument("title"));
    }
    let description = description
        .filter(|d| !d.is_empty())
        .map(str::to_string);
    Ok((title.to_string(), description))
}

/// A command's usage line and description.
#[derive(Debug, Clone)]
pub struct CommandHelp {
    pub usage: &'static str,
    pub description: &'static str,
}

impl CommandHelp {
    pub const fn new(usage: &'static str, description: &'static str) -> Self {
        Self { usage, description }
    }
}

/// Registry of all shell commands.
pub struct CommandRegistry;

impl CommandRegistry {
    /// Get all registered commands.
    pub fn all() -> Vec<CommandHelp> {
        vec![
            CommandHelp::new("themes", "List themes"),
            CommandHelp::new("theme <id>", "Select a theme"),
            CommandHelp::new("input <text>", "Set the key element for the story"),
            CommandHelp::new("generate", "Generate the next passage"),
            CommandHelp::new("capture", "Capture the latest passage as an insight"),
            CommandHelp::new("new <title> [| description]", "Create a collection"),
            CommandHelp::new("edit <cid> <title> [| description]", "Edit a collection"),
            CommandHelp::new("rmcol <cid>", "Delete a collection"),
            CommandHelp::new("drag <iid>", "Start dragging an insight"),
            CommandHelp::new("over <cid>", "Drag over a collection"),
            CommandHelp::new("leave <cid>", "Drag away from a collection"),
            CommandHelp::new("drop <cid> [index]", "Drop on a collection"),
            CommandHelp::new("outside", "Drop outside any collection"),
            CommandHelp::new("cancel", "Cancel the drag"),
            CommandHelp::new("rm <cid> <iid>", "Remove an insight from a collection"),
            CommandHelp::new("move <cid> <from> <to>", "Reorder within a collection"),
            CommandHelp::new("show", "Show collections"),
            CommandHelp::new("json", "Dump the snapshot as JSON"),
            CommandHelp::new("quit", "Exit"),
        ]
    }

    /// Format all commands for display.
    pub fn help_text() -> String {
        let mut text = String::from("\n=== Commands ===\n");
        for help in Self::all() {
            text.push_str(&format!("  {:38} {}\n", help.usage, help.description));
        }
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank_line() {
        assert_eq!(Command::parse("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_collection_commands() {
        assert_eq!(
            Command::parse("new Omens | signs of things to come").unwrap(),
            Some(Command::NewCollection {
                title: "Omens".to_string(),
                description: Some("signs of things to come".to_string()),
            })
        );
        assert_eq!(
            Command::parse("edit 2 Portents").unwrap(),
            Some(Command::EditCollection {
                id: CollectionId::new(2),
                title: "Portents".to_string(),
                description: None,
            })
        );
        assert_eq!(
            Command::parse("move 1 3 0").unwrap(),
            Some(Command::Reorder {
                collection: CollectionId::new(1),
                from: 3,
                to: 0,
            })
        );
    }

    #[test]
    fn test_parse_drop_with_optional_index() {
        assert_eq!(
            Command::parse("drop 4").unwrap(),
            Some(Command::Drop {
                id: CollectionId::new(4),
                index: None,
            })
        );
        assert_eq!(
            Command::parse("drop 4 1").unwrap(),
            Some(Command::Drop {
                id: CollectionId::new(4),
                index: Some(1),
            })
        );
    }

    #[test]
    fn test_parse_input_keeps_spaces() {
        assert_eq!(
            Command::parse("input the first spark").unwrap(),
            Some(Command::Input("the first spark".to_string()))
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            Command::parse("fly"),
            Err(CommandError::Unknown("fly".to_string()))
        );
        assert_eq!(
            Command::parse("drag"),
            Err(CommandError::MissingArgument("insight id"))
        );
        assert_eq!(
            Command::parse("rmcol one"),
            Err(CommandError::InvalidNumber("one".to_string()))
        );
        assert_eq!(
            Command::parse("new  | only description"),
            Err(CommandError::MissingArgument("title"))
        );
    }

    #[test]
    fn test_help_lists_every_command() {
        let text = CommandRegistry::help_text();
        for help in CommandRegistry::all() {
            assert!(text.contains(help.usage));
        }
    }
}
