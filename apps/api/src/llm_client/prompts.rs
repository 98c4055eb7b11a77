// Shared prompt fragments sent with every completion request.
// Topic templates live in guidance::templates.

/// System message that opens every conversation sent upstream.
pub const ADVISOR_SYSTEM: &str = "You are an expert startup advisor providing structured, \
    practical guidance. Be specific, actionable, and encouraging.";
