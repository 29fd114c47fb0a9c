use std::path::Path;

/// Truncate a string to at most `max_chars` characters, appending
/// an ellipsis indicator if truncated.
pub fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars).collect();
        format!("{truncated}\n[... truncated]")
    }
}

/// Render a path for the prompt, abbreviating the home directory to `~`.
pub fn display_path(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(rest) = path.strip_prefix(&home) {
            if rest.as_os_str().is_empty() {
                return "~".to_string();
            }
            return format!("~/{}", rest.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_truncate_short_string() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long_string() {
        assert_eq!(truncate("hello world", 5), "hello\n[... truncated]");
    }

    #[test]
    fn test_truncate_exact_boundary() {
        assert_eq!(truncate("hello", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte() {
        let emoji = "😀😀😀😀😀";
        assert_eq!(truncate(emoji, 3), "😀😀😀\n[... truncated]");
        assert_eq!(truncate(emoji, 5), emoji);
    }

    #[test]
    fn test_truncate_empty_string() {
        assert_eq!(truncate("", 10), "");
        assert_eq!(truncate("", 0), "");
    }

    #[test]
    fn test_display_path_home_becomes_tilde() {
        let home = dirs::home_dir().expect("home dir");
        assert_eq!(display_path(&home), "~");
    }

    #[test]
    fn test_display_path_under_home() {
        let home = dirs::home_dir().expect("home dir");
        let p = home.join("projects").join("demo");
        assert_eq!(display_path(&p), "~/projects/demo");
    }

    #[test]
    fn test_display_path_outside_home() {
        let p = PathBuf::from("/tmp/elsewhere");
        assert_eq!(display_path(&p), "/tmp/elsewhere");
    }
}
