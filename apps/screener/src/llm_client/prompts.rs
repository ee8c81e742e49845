// Shared prompt fragments for every analysis prompt.
// Mode-specific prompts live next to the screening module in screening/prompts.rs.

/// Placeholder line telling the model where the document is; the document itself
/// travels as an inline data part after the text part.
pub const INLINE_RESUME_MARKER: &str = "[Resume content is provided as an inline part]";

/// Closing instruction appended to every analysis prompt.
pub const JSON_ONLY_INSTRUCTION: &str =
    "Return ONLY the JSON object. Do not include any other text or markdown formatting.";
