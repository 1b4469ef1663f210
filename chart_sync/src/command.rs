//! Line commands accepted by the `chart-sync` terminal viewer.

use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    More,
    Symbol(String),
    Refresh,
    Retry,
    Width(u32),
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Err("empty command".to_string());
        };
        let arg = parts.next();
        match (head.to_lowercase().as_str(), arg) {
            ("more" | "m", None) => Ok(Command::More),
            ("symbol" | "s", Some(sym)) => Ok(Command::Symbol(sym.to_string())),
            ("refresh" | "r", None) => Ok(Command::Refresh),
            ("retry", None) => Ok(Command::Retry),
            ("width" | "w", Some(n)) => n
                .parse()
                .map(Command::Width)
                .map_err(|_| format!("invalid width: {n}")),
            ("help" | "h" | "?", None) => Ok(Command::Help),
            ("quit" | "q" | "exit", None) => Ok(Command::Quit),
            _ => Err(format!("unknown command: {}", line.trim())),
        }
    }
}

pub const HELP: &str = "\
commands:
  more | m            load the next page of history
  symbol | s <TICKER> switch symbol
  refresh | r         reload the first page
  retry               repeat the request that failed
  width | w <N>       resize the chart
  quit | q            exit";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_commands() {
        assert_eq!("more".parse(), Ok(Command::More));
        assert_eq!("  s msft ".parse(), Ok(Command::Symbol("msft".into())));
        assert_eq!("W 120".parse(), Ok(Command::Width(120)));
        assert_eq!("q".parse(), Ok(Command::Quit));
    }

    #[test]
    fn rejects_bad_input() {
        assert!("".parse::<Command>().is_err());
        assert!("symbol".parse::<Command>().is_err());
        assert!("width wide".parse::<Command>().is_err());
        assert!("dance".parse::<Command>().is_err());
    }
}
