//! Line commands of the headless browser.

use std::fmt;
use std::path::PathBuf;

use crate::host::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(Option<String>),
    Back,
    Forward,
    /// Edit the address bar fragment, e.g. `#/wishlist`.
    Hash(String),
    List,
    Click(NodeId),
    Fill {
        form: NodeId,
        name: String,
        value: String,
    },
    Attach {
        form: NodeId,
        name: String,
        path: PathBuf,
    },
    Submit(NodeId),
    Show,
    Where,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    Unknown(String),
    MissingArgument(&'static str),
    BadNode(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "empty command"),
            ParseError::Unknown(cmd) => write!(f, "unknown command '{cmd}' (try 'help')"),
            ParseError::MissingArgument(what) => write!(f, "missing {what}"),
            ParseError::BadNode(raw) => write!(f, "'{raw}' is not a node id"),
        }
    }
}

impl std::error::Error for ParseError {}

pub const HELP: &str = "\
go [page]                 load a page (default: index)
back | forward            move through history
hash <#/page>             edit the address bar fragment
ls                        list interactive elements
click <node>              click a link, action button or tab
fill <form> <name> <val>  set a text field
attach <form> <name> <f>  select a file into a file field
submit <form>             submit a form
show                      print the content region
where                     print address, page and history depth
quit";

/// Accepts `12` or `#12`.
fn node(raw: Option<&str>) -> Result<NodeId, ParseError> {
    let raw = raw.ok_or(ParseError::MissingArgument("node id"))?;
    raw.trim_start_matches('#')
        .parse::<u64>()
        .map(NodeId)
        .map_err(|_| ParseError::BadNode(raw.to_string()))
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(ParseError::Empty);
        };

        match verb.to_ascii_lowercase().as_str() {
            "go" => Ok(Command::Go(words.next().map(str::to_string))),
            "back" => Ok(Command::Back),
            "forward" => Ok(Command::Forward),
            "hash" => {
                let raw = words.next().ok_or(ParseError::MissingArgument("fragment"))?;
                Ok(Command::Hash(raw.to_string()))
            }
            "ls" => Ok(Command::List),
            "click" => Ok(Command::Click(node(words.next())?)),
            "fill" => {
                let form = node(words.next())?;
                let name = words.next().ok_or(ParseError::MissingArgument("field name"))?;
                // The value keeps its inner spaces.
                let value = words.collect::<Vec<_>>().join(" ");
                Ok(Command::Fill {
                    form,
                    name: name.to_string(),
                    value,
                })
            }
            "attach" => {
                let form = node(words.next())?;
                let name = words.next().ok_or(ParseError::MissingArgument("field name"))?;
                let path = words.next().ok_or(ParseError::MissingArgument("file path"))?;
                Ok(Command::Attach {
                    form,
                    name: name.to_string(),
                    path: PathBuf::from(path),
                })
            }
            "submit" => Ok(Command::Submit(node(words.next())?)),
            "show" => Ok(Command::Show),
            "where" => Ok(Command::Where),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(ParseError::Unknown(other.to_string())),
        }
    }
}
