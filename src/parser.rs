//! Extraction of command payloads from raw model output.
//!
//! The model is instructed to answer with a single JSON object of the shape
//! `{"command": "..."}`, but in practice responses arrive wrapped in markdown
//! code fences or surrounded by prose. This module strips the wrapping and
//! decodes the payload, falling back to the raw message text when the response
//! is not valid JSON.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct CommandEnvelope {
    #[serde(default)]
    command: String,
}

/// A command recovered from one model message.
///
/// Keeps the fallback path explicit: a `RawFallback` means the message was not
/// valid JSON and its full text is being treated as the command itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandPayload {
    /// The `command` field of a successfully decoded JSON object.
    Parsed(String),
    /// The entire original message, used verbatim when JSON decoding fails.
    RawFallback(String),
}

impl CommandPayload {
    /// Converts the payload into the plain command string.
    pub fn into_command(self) -> String {
        match self {
            CommandPayload::Parsed(command) => command,
            CommandPayload::RawFallback(text) => text,
        }
    }
}

/// Returns the inner content of the first triple-backtick fence, or the
/// original text when no fence is present.
///
/// An optional language tag on the opening fence (e.g. ```` ```json ````) is
/// discarded along with the rest of that line.
pub fn extract_payload(text: &str) -> &str {
    let Some(open) = text.find("```") else {
        return text;
    };
    let after_open = &text[open + 3..];
    let body_start = match after_open.find('\n') {
        Some(newline) => newline + 1,
        None => return text,
    };
    let body = &after_open[body_start..];
    match body.find("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

/// Parses one model message into a command.
///
/// Returns `None` when the message yields an empty command, which callers
/// treat as "no suggestion" rather than an error.
pub fn parse_command(text: &str) -> Option<CommandPayload> {
    let payload = extract_payload(text);

    let candidate = match serde_json::from_str::<CommandEnvelope>(payload) {
        Ok(envelope) => CommandPayload::Parsed(envelope.command),
        Err(_) => CommandPayload::RawFallback(text.trim().to_string()),
    };

    match &candidate {
        CommandPayload::Parsed(command) if command.is_empty() => None,
        CommandPayload::RawFallback(raw) if raw.is_empty() => None,
        _ => Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_payload_without_fence_returns_input() {
        let text = r#"{"command": "ls"}"#;
        assert_eq!(extract_payload(text), text);
    }

    #[test]
    fn test_extract_payload_strips_json_fence() {
        let text = "```json\n{\"command\": \"echo hi\"}\n```";
        assert_eq!(extract_payload(text), r#"{"command": "echo hi"}"#);
    }

    #[test]
    fn test_extract_payload_strips_untagged_fence() {
        let text = "```\n{\"command\": \"pwd\"}\n```";
        assert_eq!(extract_payload(text), r#"{"command": "pwd"}"#);
    }

    #[test]
    fn test_extract_payload_ignores_surrounding_prose() {
        let text = "Sure, here you go:\n```json\n{\"command\": \"df -h\"}\n```\nLet me know!";
        assert_eq!(extract_payload(text), r#"{"command": "df -h"}"#);
    }

    #[test]
    fn test_extract_payload_unclosed_fence_takes_rest() {
        let text = "```json\n{\"command\": \"uptime\"}";
        assert_eq!(extract_payload(text), r#"{"command": "uptime"}"#);
    }

    #[test]
    fn test_parse_command_fenced_json() {
        let text = "```json\n{\"command\": \"echo hi\"}\n```";
        assert_eq!(
            parse_command(text),
            Some(CommandPayload::Parsed("echo hi".to_string()))
        );
    }

    #[test]
    fn test_parse_command_plain_json() {
        let text = r#"{"command": "echo hi"}"#;
        assert_eq!(
            parse_command(text).unwrap().into_command(),
            "echo hi"
        );
    }

    #[test]
    fn test_parse_command_non_json_falls_back_to_raw() {
        let result = parse_command("do the thing").unwrap();
        assert_eq!(result, CommandPayload::RawFallback("do the thing".to_string()));
        assert_eq!(result.into_command(), "do the thing");
    }

    #[test]
    fn test_parse_command_empty_command_field_is_discarded() {
        assert_eq!(parse_command(r#"{"command": ""}"#), None);
    }

    #[test]
    fn test_parse_command_json_without_command_field_is_discarded() {
        assert_eq!(parse_command(r#"{"other": "value"}"#), None);
    }

    #[test]
    fn test_parse_command_empty_message_is_discarded() {
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("   \n"), None);
    }
}
