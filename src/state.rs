use std::future::Future;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::HttpApi;
use crate::config::{ControllerConfig, Variant};
use crate::controller::{ControllerState, FormController};
use crate::persistence::BrowserStore;
use crate::types::HistoryEntry;

pub type BrowserController = FormController<HttpApi, BrowserStore>;

/// Handles shared by every component of the page.
#[derive(Clone, Copy)]
pub struct AppContext {
    pub controller: StoredValue<BrowserController, LocalStorage>,
    // Render state
    pub state: RwSignal<ControllerState>,
    pub history: RwSignal<Vec<HistoryEntry>>,
    // Variant affordances
    pub variant: Variant,
    pub allow_form_reset: bool,
    pub submit_shortcut: bool,
    pub selection_feedback: bool,
}

impl AppContext {
    pub fn new(controller: BrowserController) -> Self {
        let config: &ControllerConfig = controller.config();
        Self {
            state: controller.state(),
            history: controller.history(),
            variant: config.variant,
            allow_form_reset: config.allow_form_reset,
            submit_shortcut: config.submit_shortcut,
            selection_feedback: config.selection_feedback,
            controller: StoredValue::new_local(controller),
        }
    }

    pub fn controller(&self) -> BrowserController {
        self.controller.get_value()
    }

    /// Runs a controller action on the local executor.
    pub fn run<F, Fut>(&self, action: F)
    where
        F: FnOnce(BrowserController) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        spawn_local(action(self.controller()));
    }
}
