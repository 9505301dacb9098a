//! Conversational reply generation
//!
//! The generator is an external collaborator: a local model run as a child
//! process. It is time-bounded and every failure degrades to a fixed
//! fallback line. Nothing here touches sentiment or sensor state.

use std::process::Stdio;
use std::time::Duration;
use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::ReplyConfig;
use crate::error::{Error, Result};
use crate::types::ChatMessage;

/// Fallback when the model printed nothing
pub const FALLBACK_EMPTY: &str = "I'm here with you. Tell me more.";

/// Fallback when cleaning removed everything
pub const FALLBACK_CLEANED: &str = "I'm here listening.";

/// Fallback on failure or timeout
pub const FALLBACK_ERROR: &str = "I'm here with you.";

const PERSONA: &str = "You are a caring companion for an elderly person. Be warm and brief.";

/// Output is cut at the first occurrence of each marker, in this order
const STOP_MARKERS: [&str; 14] = [
    "\n---", "\n###", "Instruction", "Note:", "Consider",
    "Let us", "System:", "scenario", "situation where",
    "Example:", "User:", "Assistant:", "Human:", "AI:",
];

/// A line containing any of these (lowercased) ends the reply
const INSTRUCTION_WORDS: [&str; 5] = ["instruction", "note:", "consider", "let us", "scenario"];

/// Sentences kept from a cleaned reply
const MAX_SENTENCES: usize = 2;

lazy_static! {
    static ref SENTENCE_END: Regex = Regex::new(r"[.!?]").unwrap();
}

/// Produces a reply to one utterance given recent conversation
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    /// Raw generated text
    async fn generate(&self, utterance: &str, history: &[ChatMessage]) -> Result<String>;

    /// Model name for status reporting
    fn model(&self) -> &str;
}

// =============================================================================
// COMMAND GENERATOR
// =============================================================================

/// Runs `<command> run <model> <prompt>` and returns its stdout
#[derive(Debug, Clone)]
pub struct CommandReply {
    command: String,
    model: String,
    context_messages: usize,
}

impl CommandReply {
    /// Create from config
    pub fn new(config: &ReplyConfig) -> Self {
        Self {
            command: config.command.clone(),
            model: config.model.clone(),
            context_messages: config.context_messages,
        }
    }

    /// Build the prompt from the last `context_messages` messages
    pub fn build_prompt(&self, utterance: &str, history: &[ChatMessage]) -> String {
        build_prompt(utterance, history, self.context_messages)
    }
}

#[async_trait]
impl ReplyGenerator for CommandReply {
    async fn generate(&self, utterance: &str, history: &[ChatMessage]) -> Result<String> {
        let prompt = self.build_prompt(utterance, history);

        let child = Command::new(&self.command)
            .args(["run", self.model.as_str(), prompt.as_str()])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| Error::Reply(format!("failed to spawn {}: {}", self.command, e)))?;

        let output = child.wait_with_output().await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Reply(format!(
                "{} exited with {}: {}",
                self.command,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// =============================================================================
// FIXED GENERATOR
// =============================================================================

/// Deterministic generator that always returns the same text
#[derive(Debug, Clone)]
pub struct FixedReply {
    reply: String,
}

impl FixedReply {
    pub fn new(reply: impl Into<String>) -> Self {
        Self { reply: reply.into() }
    }
}

#[async_trait]
impl ReplyGenerator for FixedReply {
    async fn generate(&self, _utterance: &str, _history: &[ChatMessage]) -> Result<String> {
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "fixed"
    }
}

// =============================================================================
// PROMPT + CLEANING
// =============================================================================

/// Persona line, recent conversation, then the utterance
pub fn build_prompt(utterance: &str, history: &[ChatMessage], context_messages: usize) -> String {
    let start = history.len().saturating_sub(context_messages);
    let context = history[start..]
        .iter()
        .map(ChatMessage::to_prompt_line)
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{}\n\nConversation:\n{}\n\nUser: {}\nAssistant:",
        PERSONA, context, utterance
    )
}

/// Strip leaked instructions and keep at most two sentences
pub fn clean_reply(raw: &str) -> String {
    let mut response = raw.trim().to_string();

    for marker in STOP_MARKERS {
        if let Some(idx) = response.find(marker) {
            response = response[..idx].trim().to_string();
        }
    }

    let mut lines = Vec::new();
    for line in response.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        if INSTRUCTION_WORDS.iter().any(|w| lower.contains(w)) {
            break;
        }
        lines.push(line);
    }
    let joined = lines.join(" ");

    let sentences: Vec<&str> = SENTENCE_END
        .split(&joined)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .take(MAX_SENTENCES)
        .collect();

    if sentences.is_empty() {
        String::new()
    } else {
        format!("{}.", sentences.join(". "))
    }
}

/// Generate a reply within `timeout`, substituting a fallback on any failure
pub async fn reply_or_fallback(
    generator: &dyn ReplyGenerator,
    utterance: &str,
    history: &[ChatMessage],
    timeout: Duration,
) -> String {
    let raw = match tokio::time::timeout(timeout, generator.generate(utterance, history)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            warn!(error = %e, "Reply generation failed");
            return FALLBACK_ERROR.to_string();
        }
        Err(_) => {
            let e = Error::ReplyTimeout(timeout.as_secs());
            warn!(error = %e, "Reply generation failed");
            return FALLBACK_ERROR.to_string();
        }
    };

    if raw.trim().is_empty() {
        debug!("Model returned empty output");
        return FALLBACK_EMPTY.to_string();
    }

    let cleaned = clean_reply(&raw);
    if cleaned.is_empty() {
        debug!(raw = %raw, "Reply empty after cleaning");
        FALLBACK_CLEANED.to_string()
    } else {
        cleaned
    }
}

// =============================================================================
// TESTS
// =============================================================================
