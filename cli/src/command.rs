use core::str::FromStr;
use minegrid_core::Coord2;
use thiserror::Error;

pub const HELP: &str = "\
commands:
  r ROW COL   reveal a cell
  f ROW COL   toggle a flag
  n           start a new game
  h           show this help
  q           quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    NewGame,
    Help,
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("unknown command `{0}`")]
    Unknown(String),
    #[error("expected ROW COL after `{0}`")]
    MissingCoords(String),
    #[error("`{0}` is not a valid row or column")]
    BadCoord(String),
    #[error("unexpected trailing input `{0}`")]
    Trailing(String),
}

fn parse_coord(word: &str) -> Result<u8, ParseCommandError> {
    word.parse()
        .map_err(|_| ParseCommandError::BadCoord(word.to_owned()))
}

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default().to_ascii_lowercase();

        let command = match verb.as_str() {
            "r" | "reveal" | "f" | "flag" => {
                let (Some(row), Some(col)) = (words.next(), words.next()) else {
                    return Err(ParseCommandError::MissingCoords(verb));
                };
                let coords = (parse_coord(row)?, parse_coord(col)?);
                if verb.starts_with('r') {
                    Command::Reveal(coords)
                } else {
                    Command::Flag(coords)
                }
            }
            "n" | "new" => Command::NewGame,
            "h" | "help" | "?" => Command::Help,
            "q" | "quit" | "exit" => Command::Quit,
            _ => return Err(ParseCommandError::Unknown(verb)),
        };

        match words.next() {
            Some(extra) => Err(ParseCommandError::Trailing(extra.to_owned())),
            None => Ok(command),
        }
    }
}
