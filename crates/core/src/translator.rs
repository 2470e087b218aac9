//! Chat request translation: prompt rendering and output cleaning.
//!
//! Rendering is two-tier. The runtime's own chat template is tried first;
//! when it is missing or rejects the conversation, a fixed ChatML framing
//! takes over. The fallback never fails, whatever the roles or contents.

use crate::{ChatMessage, Runtime};
use anyhow::Result;
use regex::Regex;
use std::{borrow::Cow, sync::LazyLock};

/// Opening marker of a ChatML turn.
pub const TURN_START: &str = "<|im_start|>";

/// Closing marker of a ChatML turn.
pub const TURN_END: &str = "<|im_end|>";

/// Internal reasoning span emitted by thinking models.
static REASONING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<think>[\s\S]*?</think>\s*").expect("valid reasoning pattern"));

/// Converts a conversation into prompt text.
pub trait PromptFormatter {
    /// Render `messages`, ending with an open assistant turn.
    fn format(&self, messages: &[ChatMessage]) -> Result<String>;
}

/// Formatter backed by the runtime's chat template.
pub struct RuntimeTemplate<'r, R: Runtime> {
    runtime: &'r R,
    handle: &'r R::Handle,
}

impl<'r, R: Runtime> RuntimeTemplate<'r, R> {
    /// Borrow a runtime and a loaded handle.
    pub fn new(runtime: &'r R, handle: &'r R::Handle) -> Self {
        Self { runtime, handle }
    }
}

impl<R: Runtime> PromptFormatter for RuntimeTemplate<'_, R> {
    fn format(&self, messages: &[ChatMessage]) -> Result<String> {
        self.runtime.chat_template(self.handle, messages)
    }
}

/// Fixed ChatML framing, the always-available fallback.
#[derive(Debug, Default, Clone, Copy)]
pub struct ChatMl;

impl ChatMl {
    /// Render `messages` without any structural validation.
    pub fn render(messages: &[ChatMessage]) -> String {
        let mut output = String::new();
        for message in messages {
            output.push_str(TURN_START);
            output.push_str(&message.role);
            output.push('\n');
            output.push_str(&message.content);
            output.push_str(TURN_END);
            output.push('\n');
        }
        output.push_str(TURN_START);
        output.push_str("assistant\n");
        output
    }
}

impl PromptFormatter for ChatMl {
    fn format(&self, messages: &[ChatMessage]) -> Result<String> {
        Ok(Self::render(messages))
    }
}

/// Render `messages` with `primary`, falling back to [`ChatMl`] on error.
pub fn render(primary: &impl PromptFormatter, messages: &[ChatMessage]) -> String {
    match primary.format(messages) {
        Ok(prompt) => prompt,
        Err(e) => {
            tracing::debug!("chat template unavailable, using ChatML fallback: {e}");
            ChatMl::render(messages)
        }
    }
}

/// Strip internal reasoning spans from generated text.
///
/// Text without a complete reasoning span is returned unchanged.
pub fn clean(raw: &str) -> String {
    match REASONING.replace_all(raw, "") {
        Cow::Borrowed(untouched) => untouched.to_owned(),
        Cow::Owned(stripped) => stripped.trim().to_owned(),
    }
}

/// Reduce a path-like model identifier to its final segment.
///
/// Callers may pass either a bare logical name or a resolved artifact path;
/// anything containing `/` or `\` is treated as a path. Returns `None` when
/// no usable name is left: empty input, only separators, `.` or `..`.
pub fn normalize_model_name(raw: &str) -> Option<&str> {
    let name = raw
        .rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())?;
    match name {
        "." | ".." => None,
        name => Some(name),
    }
}
