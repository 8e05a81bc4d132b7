use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum PromptStyle {
    #[default]
    #[serde(rename = "BASIC")]
    Basic,
    #[serde(rename = "DETAIL")]
    Detail,
}

impl PromptStyle {
    pub const ALL: [PromptStyle; 2] = [PromptStyle::Basic, PromptStyle::Detail];

    /// Wire value, also used as the radio input value.
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptStyle::Basic => "BASIC",
            PromptStyle::Detail => "DETAIL",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PromptStyle::Basic => "Basic",
            PromptStyle::Detail => "Detailed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|style| style.as_str() == value)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum TargetAi {
    #[default]
    ChatGPT,
    Claude,
    Gemini,
    Other,
}

impl TargetAi {
    pub const ALL: [TargetAi; 4] = [
        TargetAi::ChatGPT,
        TargetAi::Claude,
        TargetAi::Gemini,
        TargetAi::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetAi::ChatGPT => "ChatGPT",
            TargetAi::Claude => "Claude",
            TargetAi::Gemini => "Gemini",
            TargetAi::Other => "Other",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|target| target.as_str() == value)
    }
}

/// Live values of the form fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub raw_prompt: String,
    pub prompt_style: PromptStyle,
    pub target_ai: TargetAi,
}

impl FormState {
    /// Applies every non-empty, recognized field of a snapshot; the rest keep their values.
    pub fn apply_snapshot(&mut self, snapshot: &PersistedFormSnapshot) {
        if let Some(raw_prompt) = snapshot.raw_prompt.as_deref().filter(|p| !p.is_empty()) {
            self.raw_prompt = raw_prompt.to_string();
        }
        if let Some(style) = snapshot.prompt_style.as_deref().and_then(PromptStyle::parse) {
            self.prompt_style = style;
        }
        if let Some(target) = snapshot.target_ai.as_deref().and_then(TargetAi::parse) {
            self.target_ai = target;
        }
    }

    pub fn snapshot(&self, timestamp_ms: i64) -> PersistedFormSnapshot {
        PersistedFormSnapshot::new(
            &self.raw_prompt,
            self.prompt_style,
            self.target_ai,
            timestamp_ms,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OptimizationRequest {
    pub raw_prompt: String,
    pub prompt_style: PromptStyle,
    pub target_ai: TargetAi,
}

impl OptimizationRequest {
    pub fn snapshot(&self, timestamp_ms: i64) -> PersistedFormSnapshot {
        PersistedFormSnapshot::new(
            &self.raw_prompt,
            self.prompt_style,
            self.target_ai,
            timestamp_ms,
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct OptimizationResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub improvements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub techniques_applied: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pro_tip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl OptimizationResult {
    pub fn is_error(&self) -> bool {
        self.error.unwrap_or(false)
    }

    pub fn to_display(&self) -> DisplayModel {
        let optimized_text = self
            .optimized_prompt
            .as_deref()
            .filter(|text| !text.is_empty())
            .or(self.raw_response.as_deref())
            .unwrap_or_default()
            .to_string();

        DisplayModel {
            optimized_text,
            improvements: self.improvements.clone().filter(|items| !items.is_empty()),
            techniques: self
                .techniques_applied
                .as_ref()
                .filter(|items| !items.is_empty())
                .map(|items| items.join(", ")),
            pro_tip: self.pro_tip.clone().filter(|tip| !tip.trim().is_empty()),
        }
    }
}

/// What the result panel renders for one successful optimization.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DisplayModel {
    pub optimized_text: String,
    pub improvements: Option<Vec<String>>,
    pub techniques: Option<String>,
    pub pro_tip: Option<String>,
}

/// Body of `GET /health`. Only `"status": "healthy"` counts as healthy; a missing,
/// null or non-string status still decodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct HealthReport {
    #[serde(default)]
    pub status: serde_json::Value,
}

impl HealthReport {
    pub fn new(status: &str) -> Self {
        Self {
            status: status.into(),
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status.as_str() == Some("healthy")
    }
}

/// Form fields as written to storage. Every field is optional on read so that a
/// partially written or older snapshot still restores what it can.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct PersistedFormSnapshot {
    #[serde(rename = "rawPrompt", default)]
    pub raw_prompt: Option<String>,
    #[serde(rename = "promptStyle", default)]
    pub prompt_style: Option<String>,
    #[serde(rename = "targetAI", default)]
    pub target_ai: Option<String>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

impl PersistedFormSnapshot {
    pub fn new(raw_prompt: &str, style: PromptStyle, target: TargetAi, timestamp_ms: i64) -> Self {
        Self {
            raw_prompt: Some(raw_prompt.to_string()),
            prompt_style: Some(style.as_str().to_string()),
            target_ai: Some(target.as_str().to_string()),
            timestamp: Some(timestamp_ms),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    #[serde(flatten)]
    pub result: OptimizationResult,
    pub timestamp: i64,
    pub input: OptimizationRequest,
}
