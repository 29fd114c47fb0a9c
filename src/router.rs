//! Decides which lines the shell handles itself and which go to the system
//! shell.

/// A line the shell intercepts instead of executing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Exit,
    Help,
    ToggleChat,
    Clear,
    ListModels,
    ShowConfig,
    SwitchModel(String),
    HelpQuery(String),
}

/// Match a line against the intercepted forms, in a fixed order: the exact
/// built-ins first, then the `/model ` prefix, then a trailing `?`. Built-in
/// matching ignores case; model names and query stems keep theirs. `None`
/// means the line belongs to the system shell.
pub fn parse(input: &str) -> Option<Command> {
    let trimmed = input.trim();
    match trimmed.to_lowercase().as_str() {
        "exit" | "/exit" => return Some(Command::Exit),
        "help" => return Some(Command::Help),
        "/chat" => return Some(Command::ToggleChat),
        "clear" => return Some(Command::Clear),
        "/models" => return Some(Command::ListModels),
        "/config" => return Some(Command::ShowConfig),
        _ => {}
    }
    if let Some(name) = trimmed.strip_prefix("/model ") {
        return Some(Command::SwitchModel(name.trim().to_string()));
    }
    if let Some(stem) = trimmed.strip_suffix('?') {
        return Some(Command::HelpQuery(stem.trim().to_string()));
    }
    None
}

/// Control commands recognized inside chat mode. Anything else is a message
/// for the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatCommand {
    Exit,
    Clear,
    Help,
}

pub fn parse_chat(input: &str) -> Option<ChatCommand> {
    match input.trim().to_lowercase().as_str() {
        "/exit" => Some(ChatCommand::Exit),
        "/clear" => Some(ChatCommand::Clear),
        "/help" => Some(ChatCommand::Help),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_builtins_recognized() {
        assert_eq!(parse("exit"), Some(Command::Exit));
        assert_eq!(parse("/exit"), Some(Command::Exit));
        assert_eq!(parse("help"), Some(Command::Help));
        assert_eq!(parse("/chat"), Some(Command::ToggleChat));
        assert_eq!(parse("clear"), Some(Command::Clear));
        assert_eq!(parse("/models"), Some(Command::ListModels));
        assert_eq!(parse("/config"), Some(Command::ShowConfig));
    }

    #[test]
    fn test_exact_commands_beat_help_suffix() {
        assert_eq!(parse("exit?"), Some(Command::HelpQuery("exit".to_string())));
        assert_eq!(parse("exit"), Some(Command::Exit));
    }

    #[test]
    fn test_builtins_ignore_case() {
        assert_eq!(parse("EXIT"), Some(Command::Exit));
        assert_eq!(parse("/CHAT"), Some(Command::ToggleChat));
        assert_eq!(parse("Help"), Some(Command::Help));
        assert_eq!(parse("/Models"), Some(Command::ListModels));
    }

    #[test]
    fn test_model_switch_preserves_argument_case() {
        assert_eq!(
            parse("/model Mistral-7B"),
            Some(Command::SwitchModel("Mistral-7B".to_string()))
        );
    }

    #[test]
    fn test_model_prefix_is_case_sensitive() {
        assert_eq!(parse("/MODEL llama2"), None);
    }

    #[test]
    fn test_bare_model_goes_to_the_shell() {
        assert_eq!(parse("/model"), None);
        assert_eq!(parse("/model   "), None);
    }

    #[test]
    fn test_trailing_question_mark_is_a_help_query() {
        assert_eq!(parse("ls?"), Some(Command::HelpQuery("ls".to_string())));
        assert_eq!(
            parse("git rebase?"),
            Some(Command::HelpQuery("git rebase".to_string()))
        );
        assert_eq!(parse("Git?"), Some(Command::HelpQuery("Git".to_string())));
    }

    #[test]
    fn test_lone_question_mark_is_an_empty_query() {
        assert_eq!(parse("?"), Some(Command::HelpQuery(String::new())));
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(parse("  exit  "), Some(Command::Exit));
        assert_eq!(parse("  ls?  "), Some(Command::HelpQuery("ls".to_string())));
    }

    #[test]
    fn test_ordinary_commands_pass_through() {
        assert_eq!(parse("ls -la"), None);
        assert_eq!(parse("echo hello"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn test_chat_commands() {
        assert_eq!(parse_chat("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse_chat("/CLEAR"), Some(ChatCommand::Clear));
        assert_eq!(parse_chat(" /help "), Some(ChatCommand::Help));
        assert_eq!(parse_chat("what is sed"), None);
    }
}
