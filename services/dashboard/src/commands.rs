//! services/dashboard/src/commands.rs
//!
//! Parses the lines typed into the terminal dashboard and dispatches them to
//! the controller. Anything that is not a slash command is a chat message.

use club_dashboard_core::controller::DashboardController;
use club_dashboard_core::domain::{ChatFilters, Scope};
use tracing::info;

pub const HELP: &str = "\
commands:
  /health              check the backend and reload data
  /week /month /year   switch the leaderboard scope
  /members             reload the members view
  /refresh             resync backend data
  /member [NAME]       set or clear the member filter
  /month-filter [N]    set or clear the month filter
  /year-filter [N]     set or clear the year filter
  /clear-filters       clear every chat filter
  /help                show this text
  /quit                exit
anything else is sent as a question";

const UNKNOWN_COMMAND: &str = "unknown command, try /help";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Health,
    Leaderboard(Scope),
    Members,
    Refresh,
    MemberFilter(Option<String>),
    MonthFilter(Option<String>),
    YearFilter(Option<String>),
    ClearFilters,
    Help,
    Quit,
    Ask(String),
    Unknown(String),
}

/// What the input loop should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

impl Command {
    /// Parses one input line. Blank lines parse to `Ask("")`, which the
    /// controller ignores.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let Some(rest) = line.strip_prefix('/') else {
            return Command::Ask(line.to_string());
        };
        let (name, arg) = match rest.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, optional(arg)),
            None => (rest, None),
        };
        if let Ok(scope) = name.parse::<Scope>() {
            return Command::Leaderboard(scope);
        }
        match name.to_ascii_lowercase().as_str() {
            "health" => Command::Health,
            "members" => Command::Members,
            "refresh" => Command::Refresh,
            "member" => Command::MemberFilter(arg),
            "month-filter" => Command::MonthFilter(arg),
            "year-filter" => Command::YearFilter(arg),
            "clear-filters" => Command::ClearFilters,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

fn optional(arg: &str) -> Option<String> {
    let arg = arg.trim();
    (!arg.is_empty()).then(|| arg.to_string())
}

/// Runs one command against the controller.
pub async fn dispatch(dashboard: &mut DashboardController, command: Command) -> Flow {
    match command {
        Command::Health => {
            dashboard.check_health().await;
        }
        Command::Leaderboard(scope) => {
            dashboard.filter_leaderboard(scope).await;
        }
        Command::Members => {
            dashboard.load_members().await;
        }
        Command::Refresh => {
            dashboard.refresh().await;
        }
        Command::MemberFilter(value) => dashboard.filters_mut().member = value,
        Command::MonthFilter(value) => dashboard.filters_mut().month = value,
        Command::YearFilter(value) => dashboard.filters_mut().year = value,
        Command::ClearFilters => dashboard.set_filters(ChatFilters::default()),
        Command::Help => dashboard.notify(HELP),
        Command::Quit => return Flow::Exit,
        Command::Ask(query) => {
            dashboard.send(&query).await;
        }
        Command::Unknown(line) => {
            info!("Unknown command '{}'", line);
            dashboard.notify(UNKNOWN_COMMAND);
        }
    }
    Flow::Continue
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_question() {
        assert_eq!(
            Command::parse("  who ran the most?  "),
            Command::Ask("who ran the most?".into())
        );
        assert_eq!(Command::parse(""), Command::Ask(String::new()));
    }

    #[test]
    fn scope_and_filter_commands() {
        assert_eq!(Command::parse("/week"), Command::Leaderboard(Scope::Week));
        assert_eq!(Command::parse("/YEAR"), Command::Leaderboard(Scope::Year));
        assert_eq!(
            Command::parse("/member  Ana Putri "),
            Command::MemberFilter(Some("Ana Putri".into()))
        );
        assert_eq!(Command::parse("/month-filter"), Command::MonthFilter(None));
        assert_eq!(
            Command::parse("/year-filter 2024"),
            Command::YearFilter(Some("2024".into()))
        );
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse("/dance"), Command::Unknown("/dance".into()));
    }
}
