//! Terminal output helpers: ANSI styling, status lines, banner, help text.

use std::io::Write;

pub mod style {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";

    pub const RED: &str = "\x1b[31m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";

    pub const BOLD_CYAN: &str = "\x1b[1;36m";
    pub const BOLD_WHITE: &str = "\x1b[1;37m";
}

pub fn success(msg: &str) {
    eprintln!("{}✓ {msg}{}", style::GREEN, style::RESET);
}

pub fn warning(msg: &str) {
    eprintln!("{}⚠ {msg}{}", style::YELLOW, style::RESET);
}

pub fn error(msg: &str) {
    eprintln!("{}✗ {msg}{}", style::RED, style::RESET);
}

pub fn info(msg: &str) {
    eprintln!("{}{msg}{}", style::CYAN, style::RESET);
}

pub fn dim(msg: &str) {
    eprintln!("{}{msg}{}", style::DIM, style::RESET);
}

/// Print an AI answer with the model it came from.
pub fn ai_response(model: &str, text: &str) {
    eprintln!();
    eprintln!("{}🤖 {model}:{}", style::BOLD_CYAN, style::RESET);
    eprintln!("{}{text}{}", style::CYAN, style::RESET);
}

pub fn banner() {
    eprintln!();
    eprintln!(
        "{}sagesh{} {}{}{}",
        style::BOLD_CYAN,
        style::RESET,
        style::DIM,
        env!("SAGESH_BUILD_VERSION"),
        style::RESET
    );
    eprintln!(
        "{}Type \"help\" for a guide. Add ? to any command for AI help (e.g. git?).{}",
        style::DIM,
        style::RESET
    );
    eprintln!();
}

pub fn first_run_hint() {
    eprintln!();
    info("First time using sagesh?");
    dim("Try \"git?\" to see AI help in action, or \"help\" for the full guide.");
    eprintln!();
}

pub fn show_help() {
    let b = style::BOLD_WHITE;
    let d = style::DIM;
    let r = style::RESET;
    eprintln!();
    eprintln!("{}sagesh commands{r}", style::BOLD_CYAN);
    eprintln!();
    eprintln!("  {b}help{r}              {d}Show this help message{r}");
    eprintln!("  {b}<command>?{r}        {d}Get AI help for any command (e.g. git?, docker?){r}");
    eprintln!("  {b}/chat{r}             {d}Start conversational AI mode{r}");
    eprintln!("  {b}/models{r}           {d}List installed AI models{r}");
    eprintln!("  {b}/model <name>{r}     {d}Switch AI model{r}");
    eprintln!("  {b}/config{r}           {d}Show current configuration{r}");
    eprintln!("  {b}clear{r}             {d}Clear the screen{r}");
    eprintln!("  {b}cd <path>{r}         {d}Change directory{r}");
    eprintln!("  {b}exit{r}              {d}Exit sagesh{r}");
    eprintln!();
    eprintln!("{d}Everything else runs in the system shell, pipes and redirects included.{r}");
    eprintln!("{d}Config file: ~/.sagesh/config.json{r}");
    eprintln!();
}

pub fn chat_help() {
    eprintln!();
    info("Chat mode - Ask questions in natural language");
    dim("Commands: /exit (exit chat), /clear (clear context), /help (this message)");
    eprintln!();
}

pub fn clear_screen() {
    print!("\x1b[2J\x1b[H");
    let _ = std::io::stdout().flush();
}
