use std::fmt;

use prep_core::model::{CatalogQuery, Facet, Level, SortKey};
use services::config::normalize_sqlite_url;
use services::{ContactKind, ContactMessage};

#[derive(Debug, PartialEq, Eq)]
pub enum ArgsError {
    MissingValue { flag: &'static str },
    MissingArgument { what: &'static str },
    UnknownArg(String),
    UnknownCommand(String),
    InvalidProgress { raw: String },
    InvalidLevel { raw: String },
    InvalidKind { raw: String },
    InvalidDbUrl { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::MissingArgument { what } => write!(f, "missing argument: {what}"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown subcommand: {cmd}"),
            ArgsError::InvalidProgress { raw } => write!(f, "invalid progress value: {raw}"),
            ArgsError::InvalidLevel { raw } => write!(f, "invalid --level value: {raw}"),
            ArgsError::InvalidKind { raw } => write!(f, "invalid --kind value: {raw}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
        }
    }
}

impl std::error::Error for ArgsError {}

pub fn print_usage() {
    eprintln!("Usage: prep [--db <sqlite_url> | --memory] <command>");
    eprintln!();
    eprintln!("Catalog:");
    eprintln!("  courses [--search <text>] [--category <name>] [--level <level>] [--sort <key>]");
    eprintln!("  course <id>");
    eprintln!("  categories");
    eprintln!();
    eprintln!("Session:");
    eprintln!("  login <email>");
    eprintln!("  signup <name> <email>");
    eprintln!("  logout");
    eprintln!("  whoami");
    eprintln!("  enroll <course_id>");
    eprintln!("  progress <course_id> <0-100>");
    eprintln!("  continue <course_id>");
    eprintln!("  dashboard");
    eprintln!();
    eprintln!("Other:");
    eprintln!("  contact <name> <email> <subject> <message> [--kind <type>]");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  PREP_DB_URL, PREP_SESSION_KEY, PREP_LATENCY_MS, PREP_LOG");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    Sqlite(String),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Courses(CatalogQuery),
    Course { id: String },
    Categories,
    Login { email: String },
    Signup { name: String, email: String },
    Logout,
    Whoami,
    Enroll { id: String },
    Progress { id: String, value: i64 },
    Continue { id: String },
    Dashboard,
    Contact(ContactMessage),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Args {
    pub storage: Option<StorageTarget>,
    pub command: Command,
}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

fn require_positional(
    args: &mut impl Iterator<Item = String>,
    what: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingArgument { what })
}

fn reject_extra(args: &mut impl Iterator<Item = String>) -> Result<(), ArgsError> {
    match args.next() {
        Some(extra) => Err(ArgsError::UnknownArg(extra)),
        None => Ok(()),
    }
}

impl Args {
    /// Parse the arguments after the program name.
    pub fn parse(argv: impl IntoIterator<Item = String>) -> Result<Self, ArgsError> {
        let mut storage = None;
        let mut args = argv.into_iter();

        // Storage flags are only recognised ahead of the subcommand.
        let cmd = loop {
            let Some(arg) = args.next() else {
                return Ok(Self {
                    storage,
                    command: Command::Help,
                });
            };
            match arg.as_str() {
                "--db" => {
                    let value = require_value(&mut args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    storage = Some(StorageTarget::Sqlite(normalize_sqlite_url(value)));
                }
                "--memory" => storage = Some(StorageTarget::Memory),
                _ => break arg,
            }
        };

        let command = match cmd.as_str() {
            "--help" | "-h" | "help" => Command::Help,
            "courses" => Command::Courses(parse_query(&mut args)?),
            "course" => Command::Course {
                id: require_positional(&mut args, "course id")?,
            },
            "categories" => Command::Categories,
            "login" => Command::Login {
                email: require_positional(&mut args, "email")?,
            },
            "signup" => Command::Signup {
                name: require_positional(&mut args, "name")?,
                email: require_positional(&mut args, "email")?,
            },
            "logout" => Command::Logout,
            "whoami" => Command::Whoami,
            "enroll" => Command::Enroll {
                id: require_positional(&mut args, "course id")?,
            },
            "progress" => {
                let id = require_positional(&mut args, "course id")?;
                let raw = require_positional(&mut args, "progress value")?;
                let value = raw
                    .trim()
                    .parse()
                    .map_err(|_| ArgsError::InvalidProgress { raw: raw.clone() })?;
                Command::Progress { id, value }
            }
            "continue" => Command::Continue {
                id: require_positional(&mut args, "course id")?,
            },
            "dashboard" => Command::Dashboard,
            "contact" => Command::Contact(parse_contact(&mut args)?),
            other => return Err(ArgsError::UnknownCommand(other.to_string())),
        };
        reject_extra(&mut args)?;

        Ok(Self { storage, command })
    }
}

fn parse_query(args: &mut impl Iterator<Item = String>) -> Result<CatalogQuery, ArgsError> {
    let mut query = CatalogQuery::default();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--search" => query.search_term = require_value(args, "--search")?,
            "--category" => {
                // Category names are free text; only the wildcard is special.
                let value = require_value(args, "--category")?;
                query.category = match Facet::<String>::parse(&value) {
                    Ok(facet) => facet,
                    Err(never) => match never {},
                };
            }
            "--level" => {
                let value = require_value(args, "--level")?;
                query.level = Facet::<Level>::parse(&value)
                    .map_err(|_| ArgsError::InvalidLevel { raw: value.clone() })?;
            }
            "--sort" => query.sort = SortKey::parse_or_default(&require_value(args, "--sort")?),
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(query)
}

fn parse_contact(args: &mut impl Iterator<Item = String>) -> Result<ContactMessage, ArgsError> {
    let mut message = ContactMessage {
        name: require_positional(args, "name")?,
        email: require_positional(args, "email")?,
        subject: require_positional(args, "subject")?,
        message: require_positional(args, "message")?,
        kind: ContactKind::default(),
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--kind" => {
                let value = require_value(args, "--kind")?;
                message.kind = value
                    .parse()
                    .map_err(|_| ArgsError::InvalidKind { raw: value.clone() })?;
            }
            _ => return Err(ArgsError::UnknownArg(arg)),
        }
    }
    Ok(message)
}
