//! Working-directory awareness: project marker detection, contextual tips,
//! and suggestions for unknown commands.

use std::path::Path;

const COMMON_COMMANDS: &[&str] = &[
    "ls", "cd", "pwd", "mkdir", "rm", "cp", "mv", "grep", "find", "git", "docker", "npm", "pip",
    "python", "node", "vim", "nano", "tar", "curl", "wget", "ssh", "scp", "systemctl", "ps", "top",
];

/// Project markers found in a directory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirContext {
    pub git: bool,
    pub node: bool,
    pub docker: bool,
    pub python: bool,
}

impl DirContext {
    pub fn detect(dir: &Path) -> Self {
        Self {
            git: dir.join(".git").exists(),
            node: dir.join("package.json").exists(),
            docker: dir.join("Dockerfile").exists(),
            python: dir.join("requirements.txt").exists(),
        }
    }

    /// Description of the surrounding project when it is relevant to the
    /// command being asked about, e.g. `git?` inside a git repository.
    pub fn label_for_command(&self, command: &str) -> Option<&'static str> {
        let family = command.split_whitespace().next().unwrap_or("");
        match family {
            "git" if self.git => Some("a git repository"),
            "npm" | "node" | "yarn" if self.node => Some("a Node.js project"),
            "docker" if self.docker => Some("a Docker project"),
            "pip" | "pip3" | "python" | "python3" if self.python => Some("a Python project"),
            _ => None,
        }
    }
}

/// Tips surfaced periodically in the prompt loop. Capped at two so they
/// never turn into spam.
pub fn contextual_tips(dir: &Path, recent: &[String]) -> Vec<String> {
    let ctx = DirContext::detect(dir);
    let mut tips = Vec::new();

    if ctx.git {
        tips.push("Git repository detected! Try: git? for git help".to_string());
    }
    if ctx.node {
        tips.push("Node.js project detected! Try: npm? for npm help".to_string());
    }
    if ctx.docker {
        tips.push("Docker project detected! Try: docker? for docker help".to_string());
    }
    if ctx.python {
        tips.push("Python project detected! Try: pip? for pip help".to_string());
    }

    if let Some(last) = recent.last() {
        if last.contains("git") && !last.ends_with('?') {
            tips.push("Hint: Add ? to git commands for help (e.g., git?)".to_string());
        }
    }

    tips.truncate(2);
    tips
}

/// Suggestions for an unrecognized command: the help-query form first,
/// then common commands sharing the prefix.
pub fn suggest_commands(partial: &str) -> Vec<String> {
    let mut suggestions = Vec::new();
    if !partial.is_empty() && !partial.ends_with('?') {
        suggestions.push(format!("{partial}?"));
    }
    suggestions.extend(
        COMMON_COMMANDS
            .iter()
            .filter(|cmd| cmd.starts_with(partial))
            .take(5)
            .map(|cmd| (*cmd).to_string()),
    );
    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_empty_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(DirContext::detect(dir.path()), DirContext::default());
    }

    #[test]
    fn test_detect_markers() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "").unwrap();

        let ctx = DirContext::detect(dir.path());
        assert!(ctx.git);
        assert!(ctx.node);
        assert!(!ctx.docker);
        assert!(ctx.python);
    }

    #[test]
    fn test_label_matches_command_family() {
        let ctx = DirContext {
            git: true,
            python: true,
            ..Default::default()
        };
        assert_eq!(ctx.label_for_command("git status"), Some("a git repository"));
        assert_eq!(ctx.label_for_command("pip install"), Some("a Python project"));
        assert_eq!(ctx.label_for_command("npm install"), None);
        assert_eq!(ctx.label_for_command("ls"), None);
    }

    #[test]
    fn test_label_requires_marker() {
        let ctx = DirContext::default();
        assert_eq!(ctx.label_for_command("git status"), None);
        assert_eq!(ctx.label_for_command("docker ps"), None);
    }

    #[test]
    fn test_tips_for_git_repo() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();

        let tips = contextual_tips(dir.path(), &[]);
        assert_eq!(tips.len(), 1);
        assert!(tips[0].contains("Git repository detected"));
    }

    #[test]
    fn test_tips_capped_at_two() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join("package.json"), "{}").unwrap();
        std::fs::write(dir.path().join("Dockerfile"), "").unwrap();
        std::fs::write(dir.path().join("requirements.txt"), "").unwrap();

        let tips = contextual_tips(dir.path(), &[]);
        assert_eq!(tips.len(), 2);
    }

    #[test]
    fn test_git_hint_for_plain_git_command() {
        let dir = tempfile::tempdir().unwrap();
        let recent = vec!["git status".to_string()];
        let tips = contextual_tips(dir.path(), &recent);
        assert_eq!(tips.len(), 1);
        assert!(tips[0].contains("Add ? to git commands"));
    }

    #[test]
    fn test_no_git_hint_after_help_query() {
        let dir = tempfile::tempdir().unwrap();
        let recent = vec!["git?".to_string()];
        assert!(contextual_tips(dir.path(), &recent).is_empty());
    }

    #[test]
    fn test_suggest_prefix_matches() {
        let suggestions = suggest_commands("gi");
        assert_eq!(suggestions, vec!["gi?".to_string(), "git".to_string()]);
    }

    #[test]
    fn test_suggest_empty_partial_has_no_help_form() {
        let suggestions = suggest_commands("");
        assert!(!suggestions.iter().any(|s| s.ends_with('?')));
        assert_eq!(suggestions.len(), 5);
    }

    #[test]
    fn test_suggest_no_matches_still_offers_help_form() {
        let suggestions = suggest_commands("xyzzy");
        assert_eq!(suggestions, vec!["xyzzy?".to_string()]);
    }
}
