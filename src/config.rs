//! Runtime settings for gemterm.
//!
//! Everything comes from command-line flags or their environment variable
//! fallbacks (see [`crate::cli::Cli`]); there is no configuration file. The
//! API key is handled separately by [`crate::credential`].

use crate::cli::Cli;

/// Resolved settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Gemini model identifier.
    pub model: String,
    /// Optional system prompt sent as the agent preamble.
    pub system_prompt: Option<String>,
    /// Whether to clear the screen before the banner.
    pub clear_screen: bool,
}

impl From<Cli> for Config {
    fn from(cli: Cli) -> Self {
        Self {
            model: cli.model.trim().to_string(),
            system_prompt: cli
                .system_prompt
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            clear_screen: !cli.no_clear,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["gemterm"]).unwrap();
        let config = Config::from(cli);
        // GEMTERM_MODEL may be set in the developer's shell.
        if std::env::var("GEMTERM_MODEL").is_err() {
            assert_eq!(config.model, crate::constants::DEFAULT_MODEL);
        }
        assert!(config.clear_screen);
    }

    #[test]
    fn test_flags() {
        let cli = Cli::try_parse_from([
            "gemterm",
            "--model",
            " gemini-2.5-pro ",
            "--system-prompt",
            "   ",
            "--no-clear",
        ])
        .unwrap();
        let config = Config::from(cli);
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.system_prompt, None);
        assert!(!config.clear_screen);
    }
}
