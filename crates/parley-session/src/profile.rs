//! Agent instructions and their resolution from job metadata.
//!
//! Instruction resolution is a total function: whatever shape the metadata
//! takes (absent, empty, malformed JSON, wrong type, missing key), the
//! resolver produces a usable [`AgentProfile`]. Malformed per-job
//! configuration must never abort session startup.

use serde::Deserialize;

/// Persona the agent falls back to when a job carries no usable override.
pub const DEFAULT_INSTRUCTIONS: &str = "\
You are a helpful voice AI assistant.
You eagerly assist users with their questions by providing information from your extensive knowledge.
Your responses are concise, to the point, and without any complex formatting or punctuation including emojis, asterisks, or other symbols.
You are curious, friendly, and have a sense of humor.
When you first join a conversation, greet the user warmly and offer your assistance.";

/// Maximum number of characters of a custom prompt echoed into the log.
const PREVIEW_CHARS: usize = 100;

/// Structured payload expected inside `JobDescriptor::metadata`.
///
/// Only `prompt_instructions` is consumed; unrecognized keys are ignored.
/// Deserialization from anything other than a JSON object fails, which the
/// resolver treats the same as any other parse failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigPayload {
    #[serde(default)]
    pub prompt_instructions: Option<String>,
}

/// Immutable behavioral descriptor handed to a session.
///
/// Invariant: `instructions` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentProfile {
    instructions: String,
}

impl AgentProfile {
    /// Creates a profile with the given instructions, falling back to
    /// [`DEFAULT_INSTRUCTIONS`] when the text is empty.
    pub fn new(instructions: impl Into<String>) -> Self {
        let instructions = instructions.into();
        if instructions.is_empty() {
            Self::default()
        } else {
            Self { instructions }
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}

impl Default for AgentProfile {
    fn default() -> Self {
        Self {
            instructions: DEFAULT_INSTRUCTIONS.to_string(),
        }
    }
}

/// Parses job metadata into a [`ConfigPayload`]. Non-object JSON fails like
/// any other parse error.
fn parse_payload(raw: &str) -> Result<ConfigPayload, serde_json::Error> {
    serde_json::from_str(raw)
}

/// Derives the effective [`AgentProfile`] for a job.
///
/// Emits exactly one diagnostic per resolution: which instructions were
/// chosen and why. Never fails.
pub fn resolve_profile(metadata: Option<&str>) -> AgentProfile {
    let raw = match metadata {
        Some(raw) if !raw.is_empty() => raw,
        _ => {
            tracing::info!("no job metadata present, using default instructions");
            return AgentProfile::default();
        }
    };

    match parse_payload(raw) {
        Ok(payload) => match payload.prompt_instructions.filter(|s| !s.is_empty()) {
            Some(custom) => {
                let preview: String = custom.chars().take(PREVIEW_CHARS).collect();
                tracing::info!(preview = %preview, "using custom prompt instructions");
                AgentProfile { instructions: custom }
            }
            None => {
                tracing::warn!(
                    "job metadata has no usable prompt_instructions, using default instructions"
                );
                AgentProfile::default()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "could not parse job metadata, using default instructions");
            AgentProfile::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_metadata_resolves_to_default() {
        let profile = resolve_profile(None);
        assert_eq!(profile.instructions(), DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn empty_metadata_resolves_to_default() {
        let profile = resolve_profile(Some(""));
        assert_eq!(profile.instructions(), DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn invalid_json_resolves_to_default() {
        let profile = resolve_profile(Some("not json"));
        assert_eq!(profile.instructions(), DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn json_array_resolves_to_default() {
        let profile = resolve_profile(Some(r#"["prompt_instructions"]"#));
        assert_eq!(profile.instructions(), DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn missing_key_resolves_to_default() {
        let profile = resolve_profile(Some(r#"{"other_key": "x"}"#));
        assert_eq!(profile.instructions(), DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn empty_value_resolves_to_default() {
        let profile = resolve_profile(Some(r#"{"prompt_instructions": ""}"#));
        assert_eq!(profile.instructions(), DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn wrongly_typed_value_resolves_to_default() {
        let profile = resolve_profile(Some(r#"{"prompt_instructions": 42}"#));
        assert_eq!(profile.instructions(), DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn custom_instructions_used_verbatim() {
        let profile = resolve_profile(Some(r#"{"prompt_instructions": "Be terse."}"#));
        assert_eq!(profile.instructions(), "Be terse.");
    }

    #[test]
    fn custom_instructions_not_trimmed() {
        let profile = resolve_profile(Some(r#"{"prompt_instructions": "  padded  "}"#));
        assert_eq!(profile.instructions(), "  padded  ");
    }

    #[test]
    fn unrecognized_keys_are_ignored() {
        let profile = resolve_profile(Some(
            r#"{"prompt_instructions": "Be terse.", "voice": "alloy"}"#,
        ));
        assert_eq!(profile.instructions(), "Be terse.");
    }

    #[test]
    fn resolution_is_idempotent() {
        let metadata = Some(r#"{"prompt_instructions": "Be terse."}"#);
        assert_eq!(resolve_profile(metadata), resolve_profile(metadata));
        assert_eq!(resolve_profile(None), resolve_profile(None));
    }

    #[test]
    fn long_instructions_kept_in_full() {
        let long = "x".repeat(500);
        let metadata = format!(r#"{{"prompt_instructions": "{long}"}}"#);
        let profile = resolve_profile(Some(&metadata));
        assert_eq!(profile.instructions(), long);
    }

    #[test]
    fn profile_constructor_rejects_empty_instructions() {
        let profile = AgentProfile::new("");
        assert_eq!(profile.instructions(), DEFAULT_INSTRUCTIONS);
    }

    #[test]
    fn default_instructions_describe_the_persona() {
        assert!(DEFAULT_INSTRUCTIONS.contains("helpful voice AI assistant"));
        assert!(DEFAULT_INSTRUCTIONS.contains("concise"));
        assert!(DEFAULT_INSTRUCTIONS.contains("friendly"));
        assert!(!DEFAULT_INSTRUCTIONS.is_empty());
    }
}
