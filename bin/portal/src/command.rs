//! Shell command parsing.

use std::fmt;

use bank_portal_core::{ParseRoleError, Role};
use bank_portal_session::RegistrationProfile;

/// Usage text printed by `help`.
pub const USAGE: &str = "\
Commands:
  open <path>                                      navigate to a view
  login <email> <password>                         log in
  logout                                           log out
  register <username> <email> <password> <role>    create your account
  create-user <username> <email> <password> <role> create an account (admin)
  whoami                                           show the current identity
  routes                                           list views and who may see them
  help                                             show this text
  quit                                             exit";

/// A parsed shell command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Blank input.
    Empty,
    Open(String),
    Login {
        /// Account email.
        email: String,
        /// Account password.
        password: String,
    },
    Logout,
    Register(RegistrationProfile),
    CreateUser(RegistrationProfile),
    WhoAmI,
    Routes,
    Help,
    Quit,
}

/// Errors parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// No such command.
    Unknown {
        /// The command name as typed.
        name: String,
    },
    /// Wrong number of arguments.
    Usage {
        /// Expected form of the command.
        usage: &'static str,
    },
    /// Unrecognized role name.
    InvalidRole(ParseRoleError),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { name } => write!(f, "unknown command '{name}', try 'help'"),
            Self::Usage { usage } => write!(f, "usage: {usage}"),
            Self::InvalidRole(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<ParseRoleError> for CommandError {
    fn from(err: ParseRoleError) -> Self {
        Self::InvalidRole(err)
    }
}

impl Command {
    /// Parses one line of input.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown commands, wrong arity or an invalid role.
    pub fn parse(line: &str) -> Result<Self, CommandError> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(Self::Empty);
        };
        let args: Vec<&str> = words.collect();

        match (name, args.as_slice()) {
            ("open", [path]) => Ok(Self::Open((*path).to_string())),
            ("open", _) => Err(CommandError::Usage {
                usage: "open <path>",
            }),
            ("login", [email, password]) => Ok(Self::Login {
                email: (*email).to_string(),
                password: (*password).to_string(),
            }),
            ("login", _) => Err(CommandError::Usage {
                usage: "login <email> <password>",
            }),
            ("logout", []) => Ok(Self::Logout),
            ("register", args) => profile(args, "register <username> <email> <password> <role>")
                .map(Self::Register),
            ("create-user", args) => {
                profile(args, "create-user <username> <email> <password> <role>")
                    .map(Self::CreateUser)
            }
            ("whoami", []) => Ok(Self::WhoAmI),
            ("routes", []) => Ok(Self::Routes),
            ("help", _) => Ok(Self::Help),
            ("quit" | "exit", []) => Ok(Self::Quit),
            ("logout" | "whoami" | "routes" | "quit" | "exit", _) => Err(CommandError::Usage {
                usage: "takes no arguments",
            }),
            (other, _) => Err(CommandError::Unknown {
                name: other.to_string(),
            }),
        }
    }
}

fn profile(args: &[&str], usage: &'static str) -> Result<RegistrationProfile, CommandError> {
    let [username, email, password, role] = args else {
        return Err(CommandError::Usage { usage });
    };
    let role: Role = role.parse()?;
    Ok(RegistrationProfile::new(*username, *email, *password, role))
}
