//! Per-session state: chat mode, recent commands, and the command counter.

/// Recent commands kept around for contextual tips.
const RECENT_CAPACITY: usize = 50;

#[derive(Debug, Default)]
pub struct SessionState {
    chat_mode: bool,
    recent: Vec<String>,
    command_count: u64,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an input line the user submitted.
    pub fn record(&mut self, line: &str) {
        self.recent.push(line.to_string());
        if self.recent.len() > RECENT_CAPACITY {
            self.recent.remove(0);
        }
        self.command_count += 1;
    }

    pub fn recent(&self) -> &[String] {
        &self.recent
    }

    pub fn chat_mode(&self) -> bool {
        self.chat_mode
    }

    pub fn set_chat_mode(&mut self, on: bool) {
        self.chat_mode = on;
    }

    pub fn command_count(&self) -> u64 {
        self.command_count
    }
}
