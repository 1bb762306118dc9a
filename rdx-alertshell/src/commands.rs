//! Parsing of the shell's command line.

/// A command typed at the `>>` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Continue,
    Skip,
    Rest,
    Stats { json: bool },
    Status,
    Watch(bool),
    Help,
    Exit,
    Empty,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let args = line.split_whitespace().collect::<Vec<_>>();
        let Some(command) = args.first() else {
            return Ok(Command::Empty);
        };
        match *command {
            "continue" | "c" => Ok(Command::Continue),
            "skip" | "s" => Ok(Command::Skip),
            "rest" => Ok(Command::Rest),
            "stats" => match args.get(1) {
                None => Ok(Command::Stats { json: false }),
                Some(&"--json") => Ok(Command::Stats { json: true }),
                _ => Err("Usage: stats [--json]".to_string()),
            },
            "status" => Ok(Command::Status),
            "watch" => match args.get(1) {
                Some(&"on") => Ok(Command::Watch(true)),
                Some(&"off") => Ok(Command::Watch(false)),
                _ => Err("Usage: watch on|off".to_string()),
            },
            "help" => Ok(Command::Help),
            "exit" | "quit" => Ok(Command::Exit),
            _ => Err(format!("Unknown command: '{}'. Type 'help'.", line.trim())),
        }
    }
}

pub const HELP: &[(&str, &str)] = &[
    ("continue | c", "Finish the rest and count its duration."),
    ("skip | s", "Dismiss the rest without counting it."),
    ("rest", "Start a rest now instead of waiting."),
    ("stats [--json]", "Show total rest time and session history."),
    ("status", "Show the notification and its labels."),
    ("watch on|off", "Stream the live rest duration every second."),
    ("exit", "Quit. An unfinished rest is not counted."),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_short_and_long_forms() {
        assert_eq!(Command::parse("continue"), Ok(Command::Continue));
        assert_eq!(Command::parse("  c "), Ok(Command::Continue));
        assert_eq!(Command::parse("s"), Ok(Command::Skip));
        assert_eq!(Command::parse("quit"), Ok(Command::Exit));
    }

    #[test]
    fn parses_watch_toggle() {
        assert_eq!(Command::parse("watch on"), Ok(Command::Watch(true)));
        assert_eq!(Command::parse("watch off"), Ok(Command::Watch(false)));
        assert!(Command::parse("watch").is_err());
    }

    #[test]
    fn parses_stats_output_format() {
        assert_eq!(Command::parse("stats"), Ok(Command::Stats { json: false }));
        assert_eq!(
            Command::parse("stats --json"),
            Ok(Command::Stats { json: true })
        );
        assert!(Command::parse("stats yaml").is_err());
    }

    #[test]
    fn blank_line_is_empty() {
        assert_eq!(Command::parse("   "), Ok(Command::Empty));
    }

    #[test]
    fn unknown_command_is_reported() {
        let err = Command::parse("snooze 5").unwrap_err();
        assert!(err.contains("snooze 5"));
    }
}
