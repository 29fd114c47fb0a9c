//! Shell command execution with an owned working directory.
//!
//! Every command runs as a fresh `sh -c` child so pipes, redirects, and
//! quoting behave exactly as the system shell defines them. The working
//! directory is a plain field here, never a process-wide chdir: `cd` is
//! intercepted and only this field moves.

use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

pub struct ShellExecutor {
    cwd: PathBuf,
    last_exit_code: i32,
}

impl ShellExecutor {
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            last_exit_code: 0,
        }
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn last_exit_code(&self) -> i32 {
        self.last_exit_code
    }

    /// Run one input line and echo its output. Empty input is a successful
    /// no-op.
    pub fn execute(&mut self, line: &str) -> CommandResult {
        let line = line.trim();
        if line.is_empty() {
            self.last_exit_code = 0;
            return CommandResult::default();
        }

        let result = if line == "cd" || line.starts_with("cd ") {
            self.change_directory(line)
        } else {
            self.run_shell(line)
        };
        self.last_exit_code = result.exit_code;
        echo(&result);
        result
    }

    fn change_directory(&mut self, line: &str) -> CommandResult {
        let parts = match shell_words::split(line) {
            Ok(parts) => parts,
            Err(e) => return failure(format!("cd: {e}")),
        };

        let target = match parts.get(1) {
            Some(arg) => expand_arg(arg),
            None => match dirs::home_dir() {
                Some(home) => home.to_string_lossy().into_owned(),
                None => return failure("cd: could not determine home directory".to_string()),
            },
        };

        let path = PathBuf::from(&target);
        let path = if path.is_absolute() {
            path
        } else {
            self.cwd.join(path)
        };

        match std::fs::canonicalize(&path) {
            Ok(canonical) if canonical.is_dir() => {
                self.cwd = canonical;
                CommandResult::default()
            }
            Ok(_) => failure(format!("cd: not a directory: {target}")),
            Err(e) => match e.kind() {
                std::io::ErrorKind::NotFound => {
                    failure(format!("cd: no such file or directory: {target}"))
                }
                std::io::ErrorKind::PermissionDenied => {
                    failure(format!("cd: permission denied: {target}"))
                }
                _ => failure(format!("cd: {e}")),
            },
        }
    }

    fn run_shell(&self, line: &str) -> CommandResult {
        #[cfg(unix)]
        let output = std::process::Command::new("sh")
            .arg("-c")
            .arg(line)
            .current_dir(&self.cwd)
            .output();
        #[cfg(windows)]
        let output = std::process::Command::new("cmd")
            .args(["/C", line])
            .current_dir(&self.cwd)
            .output();

        match output {
            Ok(output) => CommandResult {
                stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
                exit_code: output.status.code().unwrap_or(-1),
            },
            Err(e) => failure(format!("Command execution failed: {e}")),
        }
    }
}

fn failure(message: String) -> CommandResult {
    CommandResult {
        stdout: String::new(),
        stderr: message,
        exit_code: 1,
    }
}

fn expand_arg(arg: &str) -> String {
    shellexpand::full_with_context_no_errors(
        arg,
        || dirs::home_dir().map(|p| p.to_string_lossy().into_owned()),
        |var| std::env::var(var).ok(),
    )
    .into_owned()
}

fn echo(result: &CommandResult) {
    if !result.stdout.is_empty() {
        print!("{}", result.stdout);
        if !result.stdout.ends_with('\n') {
            println!();
        }
        let _ = std::io::stdout().flush();
    }
    if !result.stderr.is_empty() {
        eprint!("{}", result.stderr);
        if !result.stderr.ends_with('\n') {
            eprintln!();
        }
    }
}
