//! Interactive loop: reads lines, routes them to built-ins, chat, or the
//! system shell, and wires command failures into AI diagnostics.

use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::{history::FileHistory, Config, Editor};

use crate::config::ConfigStore;
use crate::context;
use crate::display::{self, style};
use crate::executor::ShellExecutor;
use crate::ollama::{AiError, OllamaClient, SwitchOutcome};
use crate::router::{self, ChatCommand, Command};
use crate::session::SessionState;
use crate::spinner::SpinnerGuard;
use crate::util;

#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Repl {
    config: ConfigStore,
    executor: ShellExecutor,
    client: OllamaClient,
    session: SessionState,
}

pub async fn run(config: ConfigStore) -> anyhow::Result<()> {
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("/"));
    let client = OllamaClient::new(config.base_url(), config.model())?;
    let mut repl = Repl {
        executor: ShellExecutor::new(cwd),
        client,
        session: SessionState::new(),
        config,
    };
    repl.run_loop().await
}

/// Re-exec the shell under sudo when the config asks for it. Returns only
/// when no relaunch is needed or the relaunch failed.
#[cfg(unix)]
pub fn maybe_relaunch_with_sudo(config: &ConfigStore) -> anyhow::Result<()> {
    if !config.start_with_sudo() {
        return Ok(());
    }
    if unsafe { libc::geteuid() } == 0 {
        return Ok(());
    }
    display::info("Restarting with sudo...");
    let exe = std::env::current_exe()?;
    match std::process::Command::new("sudo")
        .arg(exe)
        .args(std::env::args_os().skip(1))
        .status()
    {
        Ok(status) => std::process::exit(status.code().unwrap_or(1)),
        Err(e) => {
            tracing::warn!("sudo relaunch failed: {e}");
            display::warning(&format!("Could not restart with sudo: {e}"));
            display::dim("Continuing without root privileges...");
            Ok(())
        }
    }
}

/// Whether an input error ends the session. A lost terminal is fatal;
/// anything else is reported and the loop keeps going.
fn input_error_flow(err: &ReadlineError) -> Flow {
    match err {
        ReadlineError::Io(_) => Flow::Quit,
        #[cfg(unix)]
        ReadlineError::Errno(_) => Flow::Quit,
        _ => Flow::Continue,
    }
}

impl Repl {
    async fn run_loop(&mut self) -> anyhow::Result<()> {
        display::banner();
        self.report_ai_status().await;
        if !self.config.marker_exists("tutorial") {
            display::first_run_hint();
            self.config.write_marker("tutorial");
        }

        let editor_config = Config::builder()
            .max_history_size(self.config.history_size())?
            .history_ignore_space(true)
            .auto_add_history(true)
            .build();
        let mut rl: Editor<(), FileHistory> = Editor::with_config(editor_config)?;
        let history_path = self.config.history_path();
        let _ = rl.load_history(&history_path);

        loop {
            let prompt = self.prompt();
            match rl.readline(&prompt) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    self.session.record(line);
                    if self.session.chat_mode() {
                        self.handle_chat_line(line).await;
                    } else if let Some(command) = router::parse(line) {
                        if self.handle_command(command).await == Flow::Quit {
                            break;
                        }
                    } else {
                        self.run_shell_command(line).await;
                    }
                    self.maybe_show_tips();
                }
                Err(ReadlineError::Interrupted) => {
                    display::dim("^C");
                    if self.session.chat_mode() {
                        self.session.set_chat_mode(false);
                        display::info("Exited chat mode");
                    }
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    display::success("Goodbye!");
                    break;
                }
                Err(err) => {
                    display::error(&format!("Input error: {err}"));
                    if input_error_flow(&err) == Flow::Quit {
                        break;
                    }
                }
            }
        }

        if let Some(parent) = history_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let _ = rl.save_history(&history_path);
        Ok(())
    }

    fn prompt(&self) -> String {
        let base = format!("{} $ ", util::display_path(self.executor.cwd()));
        if self.session.chat_mode() {
            format!("[Chat] {base}")
        } else {
            base
        }
    }

    async fn report_ai_status(&self) {
        if !self.config.ai_enabled() {
            display::info("AI disabled in config");
            return;
        }
        if self.client.is_available().await {
            display::success(&format!("AI ready with model: {}", self.client.model()));
        } else {
            display::warning("AI enabled but Ollama not running. Start with: ollama serve");
        }
    }

    fn maybe_show_tips(&self) {
        let count = self.session.command_count();
        if count > 0 && count % 10 == 0 {
            for tip in context::contextual_tips(self.executor.cwd(), self.session.recent()) {
                display::info(&tip);
            }
        }
    }

    async fn handle_chat_line(&mut self, line: &str) {
        match router::parse_chat(line) {
            Some(ChatCommand::Exit) => {
                self.session.set_chat_mode(false);
                display::info("Exited chat mode");
            }
            Some(ChatCommand::Clear) => display::info("Chat context cleared"),
            Some(ChatCommand::Help) => display::chat_help(),
            None => self.send_chat_message(line).await,
        }
    }

    async fn send_chat_message(&mut self, message: &str) {
        if !self.client.is_available().await {
            display::warning("AI not available for chat mode");
            return;
        }
        let reply = {
            let _spinner = SpinnerGuard::new("Thinking");
            self.client.chat(message).await
        };
        match reply {
            Ok(text) => display::ai_response(self.client.model(), &text),
            Err(e) => self.report_ai_error(e),
        }
    }

    async fn handle_command(&mut self, command: Command) -> Flow {
        match command {
            Command::Exit => {
                display::success("Goodbye!");
                return Flow::Quit;
            }
            Command::Help => display::show_help(),
            Command::ToggleChat => {
                self.session.set_chat_mode(true);
                display::info("Entered chat mode - Ask questions in natural language");
                display::dim("Type /exit to return to normal mode");
            }
            Command::Clear => display::clear_screen(),
            Command::ListModels => self.cmd_list_models().await,
            Command::ShowConfig => {
                display::info("Current Configuration:");
                println!("{}", self.config.to_pretty());
            }
            Command::SwitchModel(name) => self.cmd_switch_model(&name).await,
            Command::HelpQuery(stem) => self.cmd_help_query(&stem).await,
        }
        Flow::Continue
    }

    async fn cmd_list_models(&mut self) {
        match self.client.list_models().await {
            Ok(models) if models.is_empty() => {
                display::warning("No Ollama models installed.");
                display::dim("Install a model with: ollama pull llama2");
            }
            Ok(models) => {
                eprintln!("{}Installed Ollama models:{}", style::BOLD, style::RESET);
                for model in &models {
                    if model.name == self.client.model() {
                        eprintln!(
                            "  {}✓{} {} ({:.1}GB) (current)",
                            style::GREEN,
                            style::RESET,
                            model.name,
                            model.size_gb()
                        );
                    } else {
                        eprintln!("    {} ({:.1}GB)", model.name, model.size_gb());
                    }
                }
                eprintln!();
                display::info(&format!("Current model: {}", self.client.model()));
                display::dim("Switch with: /model <model_name>");
            }
            Err(AiError::Connection { .. }) | Err(AiError::Timeout) => {
                display::error("Cannot connect to Ollama.");
                display::dim("Make sure Ollama is running: ollama serve");
            }
            Err(e) => display::error(&format!("Could not list models: {e}")),
        }
    }

    async fn cmd_switch_model(&mut self, name: &str) {
        if name.is_empty() {
            display::info("Usage: /model <model_name>");
            return;
        }
        match self.client.switch_model(name, &mut self.config).await {
            Ok(SwitchOutcome::Switched) => {
                display::success(&format!("Switched to model: {name}"));
            }
            Ok(SwitchOutcome::UnknownModel { available }) => {
                display::error(&format!("Model '{name}' not found."));
                if !available.is_empty() {
                    display::info("Available models:");
                    for model in &available {
                        eprintln!("  - {model}");
                    }
                }
                display::dim(&format!("Install with: ollama pull {name}"));
            }
            Err(AiError::Connection { .. }) | Err(AiError::Timeout) => {
                display::error("Cannot connect to Ollama.");
                display::dim("Make sure Ollama is running: ollama serve");
            }
            Err(e) => display::error(&format!("Could not switch model: {e}")),
        }
    }

    async fn cmd_help_query(&mut self, stem: &str) {
        let stem = stem.trim();
        if stem.is_empty() {
            display::info("Usage: <command>? (e.g., git?, docker?, ls?)");
            return;
        }
        let cwd = self.executor.cwd().to_path_buf();
        // A cached answer needs no server round-trip, so skip the probe.
        if self.client.is_help_cached(stem, &cwd) {
            match self.client.get_help(stem, &cwd).await {
                Ok(text) => display::ai_response(self.client.model(), &text),
                Err(e) => self.report_ai_error(e),
            }
            return;
        }
        if !self.client.is_available().await {
            let name = stem.split_whitespace().next().unwrap_or(stem);
            display::warning(&format!("AI not available for help. Try: man {name}"));
            return;
        }
        let reply = {
            let _spinner = SpinnerGuard::new("Getting help");
            self.client.get_help(stem, &cwd).await
        };
        match reply {
            Ok(text) => display::ai_response(self.client.model(), &text),
            Err(e) => self.report_ai_error(e),
        }
    }

    async fn run_shell_command(&mut self, line: &str) {
        tracing::debug!("executing: {line}");
        let result = self.executor.execute(line);
        let code = self.executor.last_exit_code();
        if code == 0 {
            return;
        }
        if code == 127 {
            let first = line.split_whitespace().next().unwrap_or("");
            let suggestions = context::suggest_commands(first);
            if !suggestions.is_empty() {
                let shown: Vec<&str> = suggestions.iter().take(3).map(String::as_str).collect();
                display::info(&format!("Did you mean: {}", shown.join(", ")));
            }
            return;
        }
        if !self.config.ai_enabled() || !self.config.help_on_error() {
            return;
        }
        if !self.client.is_available().await {
            return;
        }
        display::info("Command failed. Getting AI suggestions...");
        let error_output = if result.stderr.is_empty() {
            &result.stdout
        } else {
            &result.stderr
        };
        let reply = {
            let _spinner = SpinnerGuard::new("Analyzing error");
            self.client.error_help(line, error_output).await
        };
        match reply {
            Ok(text) => display::ai_response(self.client.model(), &text),
            Err(e) => display::dim(&format!("Could not get AI suggestions: {e}")),
        }
    }

    fn report_ai_error(&self, err: AiError) {
        match err {
            AiError::Timeout => display::warning("AI request timed out. The model may be busy."),
            AiError::Connection { .. } => {
                display::error("Cannot connect to Ollama.");
                display::dim("Make sure Ollama is running: ollama serve");
            }
            AiError::Other(msg) => display::error(&format!("AI error: {msg}")),
        }
    }
}
