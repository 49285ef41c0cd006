//! Line-oriented command parsing.
//!
//! Lines starting with `/` are commands; anything else is sent as a chat
//! message. Parsing is separated from I/O so it can be unit tested.

use mirage_app::Command;

/// Parsed console input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// A runtime command to dispatch.
    Command(Command),
    /// Print the command reference.
    Help,
    /// Exit the program.
    Quit,
    /// Blank line; nothing to do.
    Empty,
}

/// A line that could not be parsed as a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Unrecognized slash command.
    UnknownCommand(String),
    /// Recognized command with the wrong number of arguments.
    Usage(&'static str),
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownCommand(name) => {
                write!(f, "unknown command: /{name} (try /help)")
            }
            Self::Usage(usage) => write!(f, "usage: {usage}"),
        }
    }
}

/// Command reference printed by `/help` and at startup.
pub const HELP_TEXT: &str = "\
/login <email> <password>                      sign in
/register <name> <email> <password> <confirm>  create an account
/logout                                        clear the session
/connect                                       join the chat room
/disconnect                                    stop background activity
/help                                          show this reference
/quit                                          exit
anything else                                  send as a chat message";

/// Parse a console line into an [`Input`].
pub fn parse_line(line: &str) -> Result<Input, ParseError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(Input::Empty);
    }
    let Some(rest) = trimmed.strip_prefix('/') else {
        return Ok(Input::Command(Command::SendMessage { text: trimmed.to_owned() }));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    match name.as_str() {
        "login" => match args.as_slice() {
            [email, password] => Ok(Input::Command(Command::Login {
                email: (*email).to_owned(),
                password: (*password).to_owned(),
            })),
            _ => Err(ParseError::Usage("/login <email> <password>")),
        },
        "register" => match args.as_slice() {
            [username, email, password, confirm] => Ok(Input::Command(Command::Register {
                username: (*username).to_owned(),
                email: (*email).to_owned(),
                password: (*password).to_owned(),
                password_confirm: (*confirm).to_owned(),
            })),
            _ => Err(ParseError::Usage("/register <name> <email> <password> <confirm>")),
        },
        "logout" => Ok(Input::Command(Command::Logout)),
        "connect" => Ok(Input::Command(Command::Connect)),
        "disconnect" => Ok(Input::Command(Command::Disconnect)),
        "help" => Ok(Input::Help),
        "quit" | "exit" => Ok(Input::Quit),
        other => Err(ParseError::UnknownCommand(other.to_owned())),
    }
}
