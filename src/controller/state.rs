use crate::config::StatusMessages;
use crate::types::{DisplayModel, FormState, OptimizationRequest, PromptStyle, TargetAi};
use crate::validation::{self, CharCountTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Loading,
    Ready,
    Error,
}

impl StatusKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Loading => "loading",
            StatusKind::Ready => "ready",
            StatusKind::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub kind: StatusKind,
    pub message: String,
}

impl Status {
    pub fn new(kind: StatusKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The region below the form. Result and error are never visible together.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Panel {
    #[default]
    Input,
    Result(DisplayModel),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    RawPrompt(String),
    Style(PromptStyle),
    Target(TargetAi),
}

/// Everything the UI renders from. Mutated only through the transitions below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub form: FormState,
    pub is_optimizing: bool,
    pub status: Status,
    pub panel: Panel,
}

impl ControllerState {
    pub fn new(messages: &StatusMessages) -> Self {
        Self {
            form: FormState::default(),
            is_optimizing: false,
            status: Status::new(StatusKind::Loading, messages.checking),
            panel: Panel::Input,
        }
    }

    pub fn is_input_valid(&self) -> bool {
        validation::is_input_valid(&self.form.raw_prompt)
    }

    pub fn can_submit(&self) -> bool {
        !self.is_optimizing && self.is_input_valid()
    }

    pub fn char_count(&self) -> usize {
        self.form.raw_prompt.chars().count()
    }

    pub fn char_tier(&self) -> CharCountTier {
        CharCountTier::for_input(&self.form.raw_prompt)
    }

    pub fn apply_edit(&mut self, edit: FormEdit) {
        match edit {
            FormEdit::RawPrompt(raw_prompt) => self.form.raw_prompt = raw_prompt,
            FormEdit::Style(style) => self.form.prompt_style = style,
            FormEdit::Target(target) => self.form.target_ai = target,
        }
    }

    /// Enters the submitting state and returns the request to send, or `None` when a
    /// request is already in flight or the input is invalid.
    pub fn begin_optimize(&mut self, messages: &StatusMessages) -> Option<OptimizationRequest> {
        if self.is_optimizing {
            return None;
        }
        let raw_prompt = validation::validate_prompt(&self.form.raw_prompt).ok()?;

        self.is_optimizing = true;
        self.panel = Panel::Input;
        self.status = Status::new(StatusKind::Loading, messages.optimizing);

        Some(OptimizationRequest {
            raw_prompt,
            prompt_style: self.form.prompt_style,
            target_ai: self.form.target_ai,
        })
    }

    pub fn show_result(&mut self, display: DisplayModel, messages: &StatusMessages) {
        self.panel = Panel::Result(display);
        self.status = Status::new(StatusKind::Ready, messages.complete);
    }

    pub fn show_error(&mut self, message: String, messages: &StatusMessages) {
        self.panel = Panel::Error(message);
        self.status = Status::new(StatusKind::Error, messages.failed);
    }

    pub fn finish_optimize(&mut self) {
        self.is_optimizing = false;
    }

    /// Applies a probe result unless an optimize request currently owns the status line.
    pub fn set_probe_status(&mut self, status: Status) {
        if !self.is_optimizing {
            self.status = status;
        }
    }

    pub fn reset_to_input(&mut self, messages: &StatusMessages) {
        self.panel = Panel::Input;
        self.status = Status::new(StatusKind::Ready, messages.ready_again);
    }

    pub fn clear_form(&mut self) {
        self.form = FormState::default();
    }
}
