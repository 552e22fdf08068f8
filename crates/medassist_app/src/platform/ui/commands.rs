use medassist_core::Msg;

pub const HELP: &str = "\
Type a medical question and press Enter.
  /history   open the chat history
  /refresh   reload the chat history
  /export    export a PDF summary of the history
  /close     close the chat history
  /dismiss   clear the last export notice
  /quit      exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(Vec<Msg>),
    Help,
    Quit,
}

/// Maps one line of terminal input to core messages.
pub fn parse_line(line: &str) -> Command {
    let trimmed = line.trim();
    match trimmed {
        "/history" => Command::Send(vec![Msg::HistoryViewOpened]),
        "/refresh" => Command::Send(vec![Msg::HistoryRefreshRequested]),
        "/close" => Command::Send(vec![Msg::HistoryViewClosed]),
        "/export" => Command::Send(vec![Msg::ExportClicked]),
        "/dismiss" => Command::Send(vec![Msg::NoticeDismissed]),
        "/quit" | "/exit" => Command::Quit,
        "/help" | "/?" => Command::Help,
        _ if trimmed.starts_with('/') => Command::Help,
        // Blank lines still go through the dispatcher, which ignores them.
        _ => Command::Send(vec![Msg::InputChanged(line.to_string()), Msg::QuerySubmitted]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_becomes_input_then_submit() {
        assert_eq!(
            parse_line("Give me a diet plan"),
            Command::Send(vec![
                Msg::InputChanged("Give me a diet plan".to_string()),
                Msg::QuerySubmitted,
            ])
        );
    }

    #[test]
    fn slash_commands_are_recognised() {
        assert_eq!(parse_line(" /history "), Command::Send(vec![Msg::HistoryViewOpened]));
        assert_eq!(parse_line("/export"), Command::Send(vec![Msg::ExportClicked]));
        assert_eq!(parse_line("/quit"), Command::Quit);
        assert_eq!(parse_line("/bogus"), Command::Help);
    }
}
