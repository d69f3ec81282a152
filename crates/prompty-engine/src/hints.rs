//! Actionable hints appended to thrown resolver errors.
//!
//! A hint is only offered when the failing tag defined neither `default=`
//! nor `onerror=`; a user who already chose a fallback knows about them.

use crate::error::ResolveError;

/// One contextual suggestion for a resolver failure, if any applies
pub fn hint_for(error: &ResolveError) -> Option<String> {
    let hint = match error {
        ResolveError::VariableNotFound { .. } => {
            "Use default=\"...\" to provide a fallback, or onerror=\"remove\" to drop the tag."
        }
        ResolveError::EnvVarRequired { .. } => {
            "Set the environment variable, or add default=\"...\" to the tag."
        }
        ResolveError::TemplateNotFound { .. } => {
            "Register the template with the engine before rendering."
        }
        ResolveError::EngineNotAvailable => {
            "Includes need a template engine; render through Engine rather than a bare executor."
        }
        ResolveError::RefNoResolver => {
            "Refs need a document resolver; wire one into the engine before rendering."
        }
        ResolveError::MessageInvalidRole { .. } => {
            "Valid roles are system, user, assistant, and tool."
        }
        _ => return None,
    };
    Some(hint.to_string())
}
