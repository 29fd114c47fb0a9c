use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "sagesh",
    version = env!("SAGESH_BUILD_VERSION"),
    long_version = include_str!(concat!(env!("OUT_DIR"), "/long_version.txt")),
    about = "AI-augmented interactive shell"
)]
pub struct Cli {
    /// With no subcommand, start the interactive shell.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the resolved configuration
    Config,

    /// Print detailed version information
    Version,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_invocation_as_interactive() {
        let cli = Cli::try_parse_from(["sagesh"]).expect("bare invocation should parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_config_subcommand() {
        let cli = Cli::try_parse_from(["sagesh", "config"]).expect("config should parse");
        match cli.command {
            Some(Commands::Config) => {}
            _ => panic!("expected config command"),
        }
    }

    #[test]
    fn parses_version_subcommand() {
        let cli = Cli::try_parse_from(["sagesh", "version"]).expect("version should parse");
        match cli.command {
            Some(Commands::Version) => {}
            _ => panic!("expected version command"),
        }
    }

    #[test]
    fn rejects_unknown_subcommand() {
        let text = match Cli::try_parse_from(["sagesh", "bogus"]) {
            Ok(_) => panic!("expected parser error"),
            Err(err) => err.to_string(),
        };
        assert!(
            text.contains("unrecognized subcommand") || text.contains("invalid subcommand"),
            "unexpected error text: {text}"
        );
    }
}
