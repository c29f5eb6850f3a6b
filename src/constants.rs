//! Centralized constants for gemterm.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

use std::time::Duration;

/// Application name used in CLI output and log targets.
pub const APP_NAME: &str = "gemterm";

/// Default Gemini model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Environment variable holding the Gemini API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Where users can create an API key.
pub const API_KEY_URL: &str = "https://aistudio.google.com/app/apikey";

// --- Banner ---

/// Banner title shown at startup.
pub const BANNER_TITLE: &str = "Gemini Terminal Assistant";

/// Banner subtitle shown under the title.
pub const BANNER_SUBTITLE: &str = "Powered by Google Gemini 2.5 Flash";

/// Width of the separator rule printed before the first prompt.
pub const SEPARATOR_WIDTH: usize = 50;

// --- Prompts and labels ---

/// Prompt label for user input.
pub const USER_LABEL: &str = "You";

/// Label printed above each assistant reply.
pub const ASSISTANT_LABEL: &str = "Gemini:";

/// Prompt label used when asking for the API key.
pub const API_KEY_PROMPT: &str = "API Key";

/// Commands (case-insensitive) that end the chat.
pub const EXIT_COMMANDS: &[&str] = &["exit", "quit"];

// --- Live rendering ---

/// Minimum interval between live redraws (~10 per second).
pub const REFRESH_INTERVAL: Duration = Duration::from_millis(100);

/// Text shown next to the spinner while waiting for the first fragment.
pub const THINKING_TEXT: &str = "Thinking...";

/// Braille spinner frames ("dots").
pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Terminal width assumed when the real width cannot be determined.
pub const FALLBACK_TERMINAL_WIDTH: usize = 80;

/// Terminal height assumed when the real height cannot be determined.
pub const FALLBACK_TERMINAL_HEIGHT: usize = 24;
