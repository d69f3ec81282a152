//! Role-tagged message markers and their post-execution extraction.
//!
//! The message resolver emits `\x00MSG_START:<role>:<cache>:` into the
//! output stream; the executor appends the rendered body and
//! `\x00MSG_END\x00`. After execution a left-to-right scan turns
//! well-formed marker triples into [`MessageInfo`] records. A malformed
//! marker is skipped individually; the scan never aborts.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Opening sentinel prefix
pub(crate) const MSG_START: &str = "\u{0}MSG_START:";
/// Closing sentinel
pub(crate) const MSG_END: &str = "\u{0}MSG_END\u{0}";

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// System instructions
    System,
    /// End-user turn
    User,
    /// Assistant turn
    Assistant,
    /// Tool result turn
    Tool,
}

impl Role {
    /// The lowercase wire spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl FromStr for Role {
    type Err = ();

    /// Case-insensitive parse of the four valid roles
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "system" => Ok(Role::System),
            "user" => Ok(Role::User),
            "assistant" => Ok(Role::Assistant),
            "tool" => Ok(Role::Tool),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One extracted message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessageInfo {
    /// Message role
    pub role: Role,
    /// Whitespace-trimmed body
    pub content: String,
    /// Whether the message was marked cacheable
    pub cache: bool,
}

/// Build the opening sentinel for a message tag
pub(crate) fn start_marker(role: Role, cache: bool) -> String {
    format!("{MSG_START}{role}:{cache}:")
}

/// Extract well-formed messages from an executed output stream.
///
/// Markers appear in document order; each malformed marker (bad role, bad
/// cache flag, missing separators or end sentinel) is skipped and the scan
/// continues after its start sentinel.
pub fn extract_messages(output: &str) -> Vec<MessageInfo> {
    let mut messages = Vec::new();
    let mut rest = output;
    while let Some(start) = rest.find(MSG_START) {
        let after = &rest[start + MSG_START.len()..];
        match scan_message(after) {
            Some((message, consumed)) => {
                messages.push(message);
                rest = &after[consumed..];
            }
            None => rest = after,
        }
    }
    messages
}

/// Parse `<role>:<cache>:<content>\x00MSG_END\x00` from the marker tail
fn scan_message(after: &str) -> Option<(MessageInfo, usize)> {
    let (role_text, after_role) = after.split_once(':')?;
    let role = Role::from_str(role_text).ok()?;
    let (cache_text, body) = after_role.split_once(':')?;
    let cache = match cache_text {
        "true" => true,
        "false" => false,
        _ => return None,
    };
    let end = body.find(MSG_END)?;
    let content = body[..end].trim().to_string();
    let consumed = role_text.len() + 1 + cache_text.len() + 1 + end + MSG_END.len();
    Some((MessageInfo { role, content, cache }, consumed))
}

/// Remove message markers from an output stream, keeping the content
pub fn strip_markers(output: &str) -> String {
    let mut result = String::with_capacity(output.len());
    let mut rest = output;
    while let Some(start) = rest.find(MSG_START) {
        result.push_str(&rest[..start]);
        let after = &rest[start + MSG_START.len()..];
        match scan_message(after) {
            Some((message, consumed)) => {
                result.push_str(&message.content);
                rest = &after[consumed..];
            }
            None => {
                result.push_str(MSG_START);
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}
