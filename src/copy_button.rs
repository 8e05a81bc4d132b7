use leptos::logging::log;
use leptos::{html, prelude::*, task::spawn_local};
use leptos_use::use_timeout_fn;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;

pub const COPY_LABEL: &str = "Copy";
pub const COPIED_LABEL: &str = "✓ Copied!";
pub const SELECTED_LABEL: &str = "Selected";
pub const FEEDBACK_DURATION_MS: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CopyOutcome {
    /// Text is on the system clipboard.
    Copied,
    /// Clipboard unavailable; the text is selected in the page instead.
    Selected,
    Failed,
}

/// Temporary label for an outcome, or `None` to leave the button as it is.
pub fn feedback_label(outcome: CopyOutcome, selection_feedback: bool) -> Option<&'static str> {
    match outcome {
        CopyOutcome::Copied => Some(COPIED_LABEL),
        CopyOutcome::Selected if selection_feedback => Some(SELECTED_LABEL),
        CopyOutcome::Selected | CopyOutcome::Failed => None,
    }
}

/// Button label plus the generation of the most recent flash. A revert only applies to
/// the flash that armed it, so an earlier timer can never cut a later flash short.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyFeedback {
    label: &'static str,
    generation: u64,
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self {
            label: COPY_LABEL,
            generation: 0,
        }
    }
}

impl CopyFeedback {
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Shows the label for `outcome` and returns the generation its revert must carry.
    pub fn flash(&mut self, outcome: CopyOutcome, selection_feedback: bool) -> Option<u64> {
        let label = feedback_label(outcome, selection_feedback)?;
        self.generation += 1;
        self.label = label;
        Some(self.generation)
    }

    pub fn revert(&mut self, generation: u64) {
        if generation == self.generation {
            self.label = COPY_LABEL;
        }
    }
}

fn select_node_contents(element: &web_sys::HtmlPreElement) -> Result<(), JsValue> {
    let range = document().create_range()?;
    range.select_node(element)?;
    let selection = window()
        .get_selection()?
        .ok_or_else(|| JsValue::from_str("no selection available"))?;
    selection.remove_all_ranges()?;
    selection.add_range(&range)
}

fn select_fallback(target: NodeRef<html::Pre>) -> CopyOutcome {
    let Some(element) = target.get() else {
        return CopyOutcome::Failed;
    };
    match select_node_contents(&element) {
        Ok(()) => CopyOutcome::Selected,
        Err(e) => {
            log!("[ERROR] CopyButton: Failed to select text: {:?}", e);
            CopyOutcome::Failed
        }
    }
}

#[component]
pub fn CopyButton(
    #[prop(into)] text_to_copy: Signal<String>,
    fallback_target: NodeRef<html::Pre>,
    #[prop(optional)] selection_feedback: bool,
) -> impl IntoView {
    let feedback = RwSignal::new(CopyFeedback::default());

    // A new copy stops the pending revert before starting another, so at most one is armed.
    let timeout_controls = use_timeout_fn(
        move |generation: u64| feedback.update(|f| f.revert(generation)),
        FEEDBACK_DURATION_MS as f64,
    );

    let on_copy = move |_event: web_sys::MouseEvent| {
        let current_text_to_copy = text_to_copy.get_untracked();
        if current_text_to_copy.is_empty() {
            return;
        }

        let start = timeout_controls.start.clone();
        let stop = timeout_controls.stop.clone();
        let show_feedback = move |outcome: CopyOutcome| {
            let mut armed = None;
            feedback.update(|f| armed = f.flash(outcome, selection_feedback));
            if let Some(generation) = armed {
                stop();
                start(generation);
            }
        };

        // `clipboard()` can be `undefined` outside secure contexts.
        if let Some(clipboard) =
            Some(window().navigator().clipboard()).filter(|c| !c.is_undefined())
        {
            let promise = clipboard.write_text(&current_text_to_copy);
            spawn_local(async move {
                let outcome = match JsFuture::from(promise).await {
                    Ok(_) => CopyOutcome::Copied,
                    Err(e) => {
                        log!("[ERROR] CopyButton: Error copying to clipboard: {:?}", e);
                        select_fallback(fallback_target)
                    }
                };
                show_feedback(outcome);
            });
        } else {
            log!("[ERROR] CopyButton: Clipboard API not available or not in secure context.");
            show_feedback(select_fallback(fallback_target));
        }
    };

    view! {
        <button id="copyBtn" class="copy-button" data-size="compact" on:click=on_copy>
            {move || feedback.with(|f| f.label())}
        </button>
    }
}
