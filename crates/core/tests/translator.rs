//! Tests for prompt rendering and output cleaning.

use anyhow::bail;
use intelhealth_core::{
    ChatMessage, ChatMl, PromptFormatter,
    translator::{clean, normalize_model_name, render},
};

struct Broken;

impl PromptFormatter for Broken {
    fn format(&self, _messages: &[ChatMessage]) -> anyhow::Result<String> {
        bail!("template raised")
    }
}

struct Fixed;

impl PromptFormatter for Fixed {
    fn format(&self, messages: &[ChatMessage]) -> anyhow::Result<String> {
        Ok(format!("{} messages", messages.len()))
    }
}

#[test]
fn primary_template_wins_when_it_works() {
    let prompt = render(&Fixed, &[ChatMessage::user("hi")]);
    assert_eq!(prompt, "1 messages");
}

#[test]
fn fallback_framing() {
    let messages = [
        ChatMessage::system("Only output JSON."),
        ChatMessage::user("back pain"),
    ];
    let prompt = render(&Broken, &messages);
    assert_eq!(
        prompt,
        "<|im_start|>system\nOnly output JSON.<|im_end|>\n\
         <|im_start|>user\nback pain<|im_end|>\n\
         <|im_start|>assistant\n"
    );
}

#[test]
fn fallback_handles_empty_conversation() {
    assert_eq!(render(&Broken, &[]), "<|im_start|>assistant\n");
}

#[test]
fn fallback_handles_empty_content_and_odd_roles() {
    let messages = [
        ChatMessage::user(""),
        ChatMessage::new("", "orphan"),
        ChatMessage::new("tool<|im_end|>", "{\"ok\":true}"),
    ];
    let prompt = render(&Broken, &messages);
    assert!(prompt.starts_with("<|im_start|>user\n<|im_end|>\n"));
    assert!(prompt.contains("<|im_start|>\norphan<|im_end|>"));
    assert!(prompt.ends_with("<|im_start|>assistant\n"));
}

#[test]
fn fallback_is_distinct_per_role() {
    let as_user = ChatMl::render(&[ChatMessage::user("same")]);
    let as_system = ChatMl::render(&[ChatMessage::system("same")]);
    let as_assistant = ChatMl::render(&[ChatMessage::assistant("same")]);
    assert_ne!(as_user, as_system);
    assert_ne!(as_user, as_assistant);
    assert_ne!(as_system, as_assistant);
}

#[test]
fn fallback_preserves_order() {
    let prompt = ChatMl::render(&[ChatMessage::user("first"), ChatMessage::assistant("second")]);
    assert!(prompt.find("first").unwrap() < prompt.find("second").unwrap());
}

#[test]
fn clean_strips_reasoning_span() {
    assert_eq!(
        clean("<think>\nthe patient reports\nback pain\n</think>\n\n{\"ok\": true}"),
        "{\"ok\": true}"
    );
}

#[test]
fn clean_strips_empty_reasoning_span() {
    assert_eq!(clean("<think></think>answer"), "answer");
}

#[test]
fn clean_is_identity_without_span() {
    for text in ["plain answer", "", "  spaced  ", "a </think> b", "line\nbreak"] {
        assert_eq!(clean(text), text);
    }
}

#[test]
fn clean_is_not_greedy() {
    assert_eq!(
        clean("<think>a</think>keep<think>b</think>this"),
        "keepthis"
    );
}

#[test]
fn clean_keeps_unterminated_span() {
    assert_eq!(clean("<think>never closed"), "<think>never closed");
}

#[test]
fn normalize_bare_name() {
    assert_eq!(normalize_model_name("diagnosis_generator"), Some("diagnosis_generator"));
}

#[test]
fn normalize_unix_path() {
    assert_eq!(
        normalize_model_name("/srv/models/merged/diagnosis_generator"),
        Some("diagnosis_generator")
    );
}

#[test]
fn normalize_windows_path() {
    assert_eq!(
        normalize_model_name(r"C:\models\merged\symptom_normalizer"),
        Some("symptom_normalizer")
    );
}

#[test]
fn normalize_trailing_separator() {
    assert_eq!(
        normalize_model_name("models/merged/drug_recommender/"),
        Some("drug_recommender")
    );
}

#[test]
fn normalize_rejects_names_without_a_usable_segment() {
    for raw in ["", "/", "//", r"\", ".", "..", "a/..", "models/."] {
        assert_eq!(normalize_model_name(raw), None, "{raw:?}");
    }
}

#[test]
fn clean_leaves_unclosed_span_untouched() {
    let text = "  <think>never closed \n";
    assert_eq!(clean(text), text);
}
