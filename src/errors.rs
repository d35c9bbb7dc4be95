// User-friendly error messages
//
// Turns startup failures into actionable text for whoever runs the server.

use std::fmt;
use std::path::Path;

/// Format a missing API key error with helpful suggestions
pub fn api_key_missing_error(provider: &str) -> String {
    format!(
        "{} API key is missing\n\n\
        Possible causes:\n\
        • OPENAI_API_KEY is not set in the environment or .env file\n\
        • [provider] api_key is not set in config.toml\n\n\
        Try:\n\
        1. Export the key before starting the server:\n\
           export OPENAI_API_KEY=\"sk-...\"\n\n\
        2. Get a new API key:\n\
           https://platform.openai.com/api-keys",
        provider
    )
}

/// Format a config parse error with helpful suggestions
pub fn config_parse_error(path: &Path, error: &impl fmt::Display) -> String {
    format!(
        "Failed to parse config file {}\n\n\
        \x1b[1;33mError:\x1b[0m {}\n\n\
        \x1b[1;32mTry:\x1b[0m\n\
        1. Check config file syntax:\n\
           \x1b[36mcat {}\x1b[0m\n\n\
        2. Common mistakes:\n\
           • Missing quotes around strings\n\
           • Unknown section names (valid: [server], [provider], [sessions])\n\
           • Numbers given as strings (port = \"8000\")",
        path.display(),
        error,
        path.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_key_missing_mentions_env_var() {
        let msg = api_key_missing_error("OpenAI");
        assert!(msg.starts_with("OpenAI API key is missing"));
        assert!(msg.contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_config_parse_error_includes_path_and_cause() {
        let msg = config_parse_error(Path::new("/tmp/oakbot.toml"), &"expected `=`");
        assert!(msg.contains("/tmp/oakbot.toml"));
        assert!(msg.contains("expected `=`"));
    }
}
