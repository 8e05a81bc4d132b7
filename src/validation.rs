use crate::error::ClientError;

pub const MIN_PROMPT_CHARS: usize = 10;
pub const MAX_PROMPT_CHARS: usize = 5000;
pub const WARNING_PROMPT_CHARS: usize = 4500;

/// True iff the trimmed prompt is between the minimum and maximum length, inclusive.
pub fn is_input_valid(raw_prompt: &str) -> bool {
    let length = raw_prompt.trim().chars().count();
    (MIN_PROMPT_CHARS..=MAX_PROMPT_CHARS).contains(&length)
}

/// Returns the trimmed prompt, ready to be sent.
pub fn validate_prompt(raw_prompt: &str) -> Result<String, ClientError> {
    if is_input_valid(raw_prompt) {
        Ok(raw_prompt.trim().to_string())
    } else {
        Err(ClientError::Validation {
            min: MIN_PROMPT_CHARS,
            max: MAX_PROMPT_CHARS,
        })
    }
}

/// Visual tier of the live character counter. Counts the untrimmed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharCountTier {
    Normal,
    Warning,
    OverLimit,
}

impl CharCountTier {
    pub fn for_input(raw_prompt: &str) -> Self {
        match raw_prompt.chars().count() {
            count if count > MAX_PROMPT_CHARS => CharCountTier::OverLimit,
            count if count > WARNING_PROMPT_CHARS => CharCountTier::Warning,
            _ => CharCountTier::Normal,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharCountTier::Normal => "normal",
            CharCountTier::Warning => "warning",
            CharCountTier::OverLimit => "over-limit",
        }
    }
}
