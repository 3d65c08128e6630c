//! Parsing of lines typed at the prompt.

/// What a line of input asks the client to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/join <room>`
    Join(String),
    /// `/leave`
    Leave,
    /// `/quit`
    Quit,
    /// Any other non-empty line
    Say(String),
    /// Blank line
    Empty,
    /// A slash command that could not be understood; carries a usage hint
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Command::Empty;
        }

        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Say(line.to_string());
        };

        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or_default();
        let arg = parts.next().map(str::trim).unwrap_or_default();

        match name {
            "join" if arg.is_empty() => Command::Invalid("usage: /join <room>".to_string()),
            "join" => Command::Join(arg.to_string()),
            "leave" => Command::Leave,
            "quit" | "exit" => Command::Quit,
            _ => Command::Invalid(format!(
                "unknown command '/{name}' (try /join <room>, /leave, /quit)"
            )),
        }
    }
}
