//! Commands typed at the labeler prompt.

use shared::domain::LabelDimension;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Missing bounds fall back to the current range inputs.
    Load {
        start: Option<i64>,
        end: Option<i64>,
    },
    Move(i64),
    Label(LabelDimension, String),
    Annotator(String),
    Save,
    SkipLabeled(bool),
    ShowLabeled(bool),
    Progress,
    Item(i64),
    View,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown command '{0}' (type 'help')")]
    Unknown(String),
    #[error("'{command}' expects {expected}")]
    BadArgument {
        command: &'static str,
        expected: &'static str,
    },
}

pub const HELP: &str = "\
commands:
  load [start] [end]     fetch records for the range (defaults to the range inputs)
  next | prev            step through the working set
  move <delta>           jump by any number of records
  critical <label>       set the critical success label (no value clears it)
  popular <label>        set the popular success label
  commercial <label>     set the commercial success label
  annotator <name>       set the annotator name sent with every label
  save                   submit the labels for the current record
  skip on|off            skip records that already have a label when loading
  show on|off            include stored labels when loading
  progress               refresh the progress counter
  item <index>           show a single record by sample index
  view                   show the current record again
  help | quit";

fn parse_int(command: &'static str, raw: &str) -> Result<i64, ParseError> {
    raw.parse().map_err(|_| ParseError::BadArgument {
        command,
        expected: "an integer",
    })
}

fn parse_switch(command: &'static str, raw: Option<&str>) -> Result<bool, ParseError> {
    match raw.map(str::to_ascii_lowercase).as_deref() {
        Some("on" | "true" | "yes") => Ok(true),
        Some("off" | "false" | "no") => Ok(false),
        _ => Err(ParseError::BadArgument {
            command,
            expected: "on or off",
        }),
    }
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<Command>, ParseError> {
    let line = line.trim();
    let (head, rest) = match line.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (line, ""),
    };
    let mut args = rest.split_whitespace();

    let command = match head.to_ascii_lowercase().as_str() {
        "" => return Ok(None),
        "load" | "l" => Command::Load {
            start: args.next().map(|raw| parse_int("load", raw)).transpose()?,
            end: args.next().map(|raw| parse_int("load", raw)).transpose()?,
        },
        "next" | "n" => Command::Move(1),
        "prev" | "p" => Command::Move(-1),
        "move" | "m" => match args.next() {
            Some(raw) => Command::Move(parse_int("move", raw)?),
            None => {
                return Err(ParseError::BadArgument {
                    command: "move",
                    expected: "an integer",
                })
            }
        },
        "critical" => Command::Label(LabelDimension::Critical, rest.to_string()),
        "popular" => Command::Label(LabelDimension::Popular, rest.to_string()),
        "commercial" => Command::Label(LabelDimension::Commercial, rest.to_string()),
        "annotator" => Command::Annotator(rest.to_string()),
        "save" | "s" => Command::Save,
        "skip" => Command::SkipLabeled(parse_switch("skip", args.next())?),
        "show" => Command::ShowLabeled(parse_switch("show", args.next())?),
        "progress" => Command::Progress,
        "item" => match args.next() {
            Some(raw) => Command::Item(parse_int("item", raw)?),
            None => {
                return Err(ParseError::BadArgument {
                    command: "item",
                    expected: "a sample index",
                })
            }
        },
        "view" | "v" => Command::View,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(ParseError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}
