// Shared prompt fragments. Each module that needs LLM calls defines its own
// prompts.rs alongside it; this file holds the cross-cutting pieces.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to every prompt that speaks for the represented person.
pub const GROUNDING_INSTRUCTION: &str = "\
    Only state facts that appear in the resume content provided. \
    If the resume does not cover a question, say so plainly instead of guessing. \
    Never invent employers, dates, titles, degrees or metrics.";
