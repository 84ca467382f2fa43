//! History assembly for provider calls.
//!
//! Builds the ordered message list a provider receives: an optional
//! synthesized system message, then the conversation messages. Persisted
//! history is authoritative when present; the client's submitted messages
//! are only a fallback for brand-new sessions or a failed history read.

use courier_types::chat::{ChatMessage, MessageRole};

/// Separator between the instruction block and the context block inside the
/// single synthesized system message.
const CONTEXT_LABEL: &str = "\n\nContext:\n";

/// Assembles the outbound message list from history, fallbacks, and
/// instruction/context overlays.
#[derive(Debug, Clone, Default)]
pub struct HistoryAssembler {
    default_instruction: Option<String>,
    default_context: Option<String>,
}

impl HistoryAssembler {
    pub fn new(default_instruction: Option<String>, default_context: Option<String>) -> Self {
        Self {
            default_instruction,
            default_context,
        }
    }

    /// Build the final provider-bound message list.
    ///
    /// `persisted` wins over `submitted` whenever it is non-empty. The
    /// per-request `instruction` and `context` are concatenated after the
    /// configured defaults rather than replacing them.
    pub fn assemble(
        &self,
        persisted: Vec<ChatMessage>,
        submitted: &[ChatMessage],
        instruction: Option<&str>,
        context: Option<&str>,
    ) -> Vec<ChatMessage> {
        let mut conversation = if persisted.is_empty() {
            submitted.to_vec()
        } else {
            persisted
        };

        let instruction = merge(self.default_instruction.as_deref(), instruction);
        let context = merge(self.default_context.as_deref(), context);

        if let Some(system) = synthesize_system(instruction, context) {
            conversation.insert(0, ChatMessage::new(MessageRole::System, system));
        }
        conversation
    }
}

/// Join a configured default with a per-request value, default first.
fn merge(default: Option<&str>, request: Option<&str>) -> Option<String> {
    let parts: Vec<&str> = [default, request]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n\n"))
    }
}

/// Collapse instruction and context into at most one system message body.
///
/// The labeled separator only appears between the two blocks, so a request
/// carrying just one of them yields that block verbatim.
fn synthesize_system(instruction: Option<String>, context: Option<String>) -> Option<String> {
    match (instruction, context) {
        (None, None) => None,
        (Some(one), None) | (None, Some(one)) => Some(one),
        (Some(i), Some(c)) => Some(format!("{i}{CONTEXT_LABEL}{c}")),
    }
}
