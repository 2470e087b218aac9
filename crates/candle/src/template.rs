//! Built-in chat templates, keyed by `model_type`.

use anyhow::{Result, bail};
use icore::{ChatMessage, translator};

/// Model type rendered with the Qwen turn format.
const QWEN3: &str = "qwen3";

/// Render `messages` with the template of `model_type`.
///
/// Fails for model types without a known template.
pub fn for_model_type(model_type: &str, messages: &[ChatMessage]) -> Result<String> {
    if model_type == QWEN3 {
        Ok(qwen(messages))
    } else {
        bail!("no chat template for model type '{model_type}'")
    }
}

/// Qwen chat template with the generation prompt appended.
///
/// Earlier assistant turns lose their reasoning spans, like the tokenizer
/// template shipped with Qwen3 checkpoints.
pub fn qwen(messages: &[ChatMessage]) -> String {
    let mut prompt = String::new();
    for message in messages {
        let content = if message.role == "assistant" {
            translator::clean(&message.content)
        } else {
            message.content.clone()
        };
        prompt.push_str(&format!(
            "{}{}\n{}{}\n",
            translator::TURN_START,
            message.role,
            content,
            translator::TURN_END
        ));
    }
    prompt.push_str(translator::TURN_START);
    prompt.push_str("assistant\n");
    prompt
}
