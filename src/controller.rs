mod state;

pub use state::{ControllerState, FormEdit, Panel, Status, StatusKind};

use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use chrono::Utc;
use futures::future::LocalBoxFuture;
use futures::{pin_mut, select, FutureExt};
use leptos::logging::log;
use leptos::prelude::*;

use crate::api::OptimizerApi;
use crate::config::{ControllerConfig, StatusMessages};
use crate::error::ClientError;
use crate::persistence::{self, KeyValueStore};
use crate::types::{HealthReport, HistoryEntry, OptimizationRequest};

/// Produces a future that resolves after the given duration.
pub type Sleep = fn(Duration) -> LocalBoxFuture<'static, ()>;

fn browser_sleep(duration: Duration) -> LocalBoxFuture<'static, ()> {
    gloo_timers::future::sleep(duration).boxed_local()
}

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Races `work` against `deadline`. When the deadline wins, `work` is dropped and the
/// underlying request is left to finish on its own.
async fn with_deadline<T>(
    work: impl Future<Output = Result<T, ClientError>>,
    deadline: impl Future<Output = ()>,
) -> Result<T, ClientError> {
    let work = work.fuse();
    let deadline = deadline.fuse();
    pin_mut!(work, deadline);

    select! {
        result = work => result,
        _ = deadline => Err(ClientError::Timeout),
    }
}

fn probe_status(outcome: Result<HealthReport, ClientError>, messages: &StatusMessages) -> Status {
    match outcome {
        Ok(report) if report.is_healthy() => Status::new(StatusKind::Ready, messages.connected),
        Ok(report) => {
            log!("[WARN] [API] Health check reported status {}.", report.status);
            Status::new(StatusKind::Error, messages.unavailable)
        }
        Err(ClientError::Api { status, .. }) => {
            log!("[WARN] [API] Health check failed with HTTP {:?}.", status);
            Status::new(StatusKind::Error, messages.connection_failed)
        }
        Err(e) => {
            log!("[ERROR] [API] Backend status check failed: {}", e);
            Status::new(StatusKind::Error, messages.offline)
        }
    }
}

fn track_optimization(request: &OptimizationRequest, success: bool) {
    log!(
        "[INFO] [ANALYTICS] Optimization tracked: style={}, target={}, success={}, timestamp={}",
        request.prompt_style.as_str(),
        request.target_ai.as_str(),
        success,
        Utc::now().to_rfc3339()
    );
}

/// Owns the form state, runs the optimize lifecycle and persists form data and history.
#[derive(Clone)]
pub struct FormController<A, S> {
    config: Rc<ControllerConfig>,
    api: A,
    store: S,
    sleep: Sleep,
    state: RwSignal<ControllerState>,
    history: RwSignal<Vec<HistoryEntry>>,
}

impl<A: OptimizerApi, S: KeyValueStore> FormController<A, S> {
    pub fn new(config: ControllerConfig, api: A, store: S) -> Self {
        let state = RwSignal::new(ControllerState::new(&config.messages));
        Self {
            config: Rc::new(config),
            api,
            store,
            sleep: browser_sleep,
            state,
            history: RwSignal::new(Vec::new()),
        }
    }

    pub fn with_sleep(mut self, sleep: Sleep) -> Self {
        self.sleep = sleep;
        self
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn state(&self) -> RwSignal<ControllerState> {
        self.state
    }

    pub fn history(&self) -> RwSignal<Vec<HistoryEntry>> {
        self.history
    }

    /// Restores persisted data and probes the service concurrently.
    pub async fn init(&self) {
        let restore = async {
            self.restore_form().await;
            self.refresh_history().await;
        };
        futures::join!(restore, self.check_status());
    }

    pub async fn restore_form(&self) {
        let max_age = self.config.snapshot_max_age;
        match persistence::load_snapshot(&self.store, max_age, now_ms()).await {
            Ok(Some(snapshot)) => {
                log!("[DEBUG] [CONTROLLER] Restoring saved form data.");
                self.state.update(|s| s.form.apply_snapshot(&snapshot));
            }
            Ok(None) => {}
            Err(e) => log!(
                "[ERROR] [STORAGE] Failed to load saved data: {}",
                ClientError::from(e)
            ),
        }
    }

    pub async fn refresh_history(&self) {
        if self.config.history_limit.is_none() {
            return;
        }
        match persistence::load_history(&self.store).await {
            Ok(history) => self.history.set(history),
            Err(e) => log!(
                "[ERROR] [STORAGE] Failed to load optimization history: {}",
                ClientError::from(e)
            ),
        }
    }

    pub async fn check_status(&self) {
        let messages = &self.config.messages;
        self.state
            .update(|s| s.set_probe_status(Status::new(StatusKind::Loading, messages.checking)));

        let outcome = match self.config.health_timeout {
            Some(timeout) => with_deadline(self.api.health(), (self.sleep)(timeout)).await,
            None => self.api.health().await,
        };

        let status = probe_status(outcome, messages);
        self.state.update(|s| s.set_probe_status(status));
    }

    /// Applies a field edit to the render state without touching storage.
    pub fn apply_edit(&self, edit: FormEdit) {
        self.state.update(|s| s.apply_edit(edit));
    }

    pub async fn edit(&self, edit: FormEdit) {
        self.apply_edit(edit);
        if self.config.persist.on_change {
            self.save_form().await;
        }
    }

    /// Writes the current form fields with a fresh timestamp.
    pub async fn save_form(&self) {
        let snapshot = self.state.with_untracked(|s| s.form.snapshot(now_ms()));
        self.persist(persistence::save_snapshot(&self.store, &snapshot), "save form data")
            .await;
    }

    pub async fn optimize(&self) {
        let messages = &self.config.messages;
        let mut begun = None;
        self.state.update(|s| begun = s.begin_optimize(messages));
        let Some(request) = begun else {
            log!("[DEBUG] [CONTROLLER] Optimize ignored: request in flight or input invalid.");
            return;
        };

        if self.config.persist.on_submit {
            let snapshot = request.snapshot(now_ms());
            self.persist(persistence::save_snapshot(&self.store, &snapshot), "save form data")
                .await;
        }

        let outcome = with_deadline(
            self.api.optimize(&request),
            (self.sleep)(self.config.optimize_timeout),
        )
        .await;
        let success = outcome.is_ok();

        match outcome {
            Ok(result) => {
                self.state.update(|s| s.show_result(result.to_display(), messages));
                if let Some(limit) = self.config.history_limit {
                    let entry = HistoryEntry {
                        result,
                        timestamp: now_ms(),
                        input: request.clone(),
                    };
                    self.persist(
                        persistence::record_result(&self.store, &entry, limit),
                        "save optimization result",
                    )
                    .await;
                    self.refresh_history().await;
                }
            }
            Err(err) => {
                log!("[ERROR] [CONTROLLER] Optimization error: {}", err);
                let message = format!("{}{}", self.config.error_prefix, err.user_message());
                self.state.update(|s| s.show_error(message, messages));
            }
        }

        if self.config.track_analytics {
            track_optimization(&request, success);
        }
        self.state.update(|s| s.finish_optimize());
    }

    pub fn reset_to_input(&self) {
        let messages = &self.config.messages;
        self.state.update(|s| s.reset_to_input(messages));
    }

    /// Clears the fields and the saved snapshot. Only available in the web variant.
    pub async fn reset_form(&self) {
        if !self.config.allow_form_reset {
            return;
        }
        self.state.update(|s| s.clear_form());
        self.persist(persistence::clear_snapshot(&self.store), "clear saved data")
            .await;
        self.reset_to_input();
    }

    async fn persist(&self, operation: impl Future<Output = anyhow::Result<()>>, what: &str) {
        if let Err(e) = operation.await {
            log!("[ERROR] [STORAGE] Failed to {}: {}", what, ClientError::from(e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_API_URL;
    use crate::persistence::{MemoryStore, FORM_DATA_KEY, HISTORY_KEY, LATEST_RESULT_KEY};
    use crate::types::{FormState, OptimizationResult, PersistedFormSnapshot, PromptStyle, TargetAi};
    use anyhow::anyhow;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    const PROMPT: &str = "write a short poem about ownership";

    #[derive(Clone, Default)]
    struct FakeApi {
        health: Rc<RefCell<Option<Result<HealthReport, ClientError>>>>,
        responses: Rc<RefCell<VecDeque<Result<OptimizationResult, ClientError>>>>,
        requests: Rc<RefCell<Vec<OptimizationRequest>>>,
        hang: Rc<Cell<bool>>,
    }

    impl FakeApi {
        fn respond(&self, response: Result<OptimizationResult, ClientError>) {
            self.responses.borrow_mut().push_back(response);
        }

        fn request_count(&self) -> usize {
            self.requests.borrow().len()
        }
    }

    impl OptimizerApi for FakeApi {
        async fn health(&self) -> Result<HealthReport, ClientError> {
            if self.hang.get() {
                futures::future::pending::<()>().await;
            }
            let scripted = self.health.borrow().clone();
            scripted.unwrap_or_else(|| Ok(HealthReport::new("healthy")))
        }

        async fn optimize(
            &self,
            request: &OptimizationRequest,
        ) -> Result<OptimizationResult, ClientError> {
            self.requests.borrow_mut().push(request.clone());
            tokio::task::yield_now().await;
            if self.hang.get() {
                futures::future::pending::<()>().await;
            }
            let scripted = self.responses.borrow_mut().pop_front();
            scripted.unwrap_or_else(|| Ok(optimized("optimized prompt")))
        }
    }

    #[derive(Clone, Default)]
    struct FailingStore;

    impl KeyValueStore for FailingStore {
        async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
            Err(anyhow!("[STORAGE] quota exceeded reading '{}'", key))
        }

        async fn set(&self, key: &str, _value: &str) -> anyhow::Result<()> {
            Err(anyhow!("[STORAGE] quota exceeded writing '{}'", key))
        }

        async fn remove(&self, key: &str) -> anyhow::Result<()> {
            Err(anyhow!("[STORAGE] quota exceeded removing '{}'", key))
        }
    }

    fn never(_: Duration) -> LocalBoxFuture<'static, ()> {
        futures::future::pending().boxed_local()
    }

    fn immediately(_: Duration) -> LocalBoxFuture<'static, ()> {
        futures::future::ready(()).boxed_local()
    }

    fn optimized(text: &str) -> OptimizationResult {
        OptimizationResult {
            optimized_prompt: Some(text.to_string()),
            improvements: Some(vec!["Added context".into()]),
            ..Default::default()
        }
    }

    fn web(api: &FakeApi, store: &MemoryStore) -> FormController<FakeApi, MemoryStore> {
        FormController::new(ControllerConfig::web(DEFAULT_API_URL), api.clone(), store.clone())
            .with_sleep(never)
    }

    fn extension(api: &FakeApi, store: &MemoryStore) -> FormController<FakeApi, MemoryStore> {
        FormController::new(
            ControllerConfig::extension(DEFAULT_API_URL),
            api.clone(),
            store.clone(),
        )
        .with_sleep(never)
    }

    async fn stored_snapshot(store: &MemoryStore) -> Option<PersistedFormSnapshot> {
        persistence::read_json(store, FORM_DATA_KEY).await.unwrap()
    }

    #[tokio::test]
    async fn successful_optimize_renders_result_and_keeps_input() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = web(&api, &store);
        controller.edit(FormEdit::RawPrompt(format!("  {PROMPT}  "))).await;
        controller.edit(FormEdit::Style(PromptStyle::Detail)).await;
        api.respond(Ok(optimized("You are a poet...")));

        controller.optimize().await;

        let state = controller.state().get_untracked();
        assert!(!state.is_optimizing);
        assert_eq!(state.status, Status::new(StatusKind::Ready, "Optimization complete"));
        match &state.panel {
            Panel::Result(display) => {
                assert_eq!(display.optimized_text, "You are a poet...");
                assert_eq!(display.improvements, Some(vec!["Added context".to_string()]));
            }
            other => panic!("expected result panel, got {other:?}"),
        }
        assert_eq!(state.form.raw_prompt, format!("  {PROMPT}  "));
        assert_eq!(
            api.requests.borrow()[0],
            OptimizationRequest {
                raw_prompt: PROMPT.into(),
                prompt_style: PromptStyle::Detail,
                target_ai: TargetAi::ChatGPT,
            }
        );
    }

    #[tokio::test]
    async fn invalid_input_never_reaches_the_api() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = web(&api, &store);
        controller.edit(FormEdit::RawPrompt("   too short   ".into())).await;

        controller.optimize().await;

        assert_eq!(api.request_count(), 0);
        assert_eq!(controller.state().get_untracked().panel, Panel::Input);
    }

    #[tokio::test]
    async fn concurrent_optimize_calls_send_one_request() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = web(&api, &store);
        controller.edit(FormEdit::RawPrompt(PROMPT.into())).await;

        let (first, second) = (controller.clone(), controller.clone());
        futures::join!(first.optimize(), second.optimize());
        assert_eq!(api.request_count(), 1);

        controller.optimize().await;
        assert_eq!(api.request_count(), 2);
        assert!(!controller.state().get_untracked().is_optimizing);
    }

    #[tokio::test]
    async fn timeout_sets_error_and_releases_guard() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        api.hang.set(true);
        let controller = web(&api, &store).with_sleep(immediately);
        controller.edit(FormEdit::RawPrompt(PROMPT.into())).await;

        controller.optimize().await;

        let state = controller.state().get_untracked();
        assert!(!state.is_optimizing);
        assert_eq!(state.status.kind, StatusKind::Error);
        assert_eq!(
            state.panel,
            Panel::Error("Failed to optimize prompt. Request timed out. Please try again.".into())
        );
        assert!(state.can_submit());
    }

    #[tokio::test]
    async fn api_message_is_shown_and_input_kept() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = web(&api, &store);
        controller.edit(FormEdit::RawPrompt(PROMPT.into())).await;
        api.respond(Err(ClientError::Api {
            status: Some(429),
            message: "Rate limit exceeded. Please try again later.".into(),
        }));

        controller.optimize().await;

        let state = controller.state().get_untracked();
        assert_eq!(
            state.panel,
            Panel::Error(
                "Failed to optimize prompt. Rate limit exceeded. Please try again later.".into()
            )
        );
        assert_eq!(state.status, Status::new(StatusKind::Error, "Optimization failed"));
        assert_eq!(state.form.raw_prompt, PROMPT);
        assert_eq!(store.get(HISTORY_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn retry_after_network_failure_succeeds() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = extension(&api, &store);
        controller.edit(FormEdit::RawPrompt(PROMPT.into())).await;
        api.respond(Err(ClientError::Network("connection refused".into())));
        api.respond(Ok(optimized("second time lucky")));

        controller.optimize().await;
        let state = controller.state().get_untracked();
        assert!(matches!(
            &state.panel,
            Panel::Error(message) if message.starts_with("Network connection failed.")
        ));

        controller.optimize().await;
        let state = controller.state().get_untracked();
        assert!(matches!(
            &state.panel,
            Panel::Result(display) if display.optimized_text == "second time lucky"
        ));
        assert_eq!(api.request_count(), 2);
    }

    #[tokio::test]
    async fn eleven_optimizations_leave_ten_history_entries() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = web(&api, &store);

        for n in 1..=11 {
            controller.edit(FormEdit::RawPrompt(format!("{PROMPT} #{n}"))).await;
            api.respond(Ok(optimized(&format!("result {n}"))));
            controller.optimize().await;
        }

        let history = persistence::load_history(&store).await.unwrap();
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].result.optimized_prompt.as_deref(), Some("result 11"));
        assert_eq!(history[0].input.raw_prompt, format!("{PROMPT} #11"));
        assert_eq!(history[9].result.optimized_prompt.as_deref(), Some("result 2"));
        assert_eq!(controller.history().get_untracked(), history);

        let latest: HistoryEntry = persistence::read_json(&store, LATEST_RESULT_KEY)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(latest, history[0]);
    }

    #[tokio::test]
    async fn web_edits_persist_immediately() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = web(&api, &store);

        controller.edit(FormEdit::RawPrompt("half a thought".into())).await;
        controller.edit(FormEdit::Target(TargetAi::Claude)).await;

        let snapshot = stored_snapshot(&store).await.unwrap();
        assert_eq!(snapshot.raw_prompt.as_deref(), Some("half a thought"));
        assert_eq!(snapshot.target_ai.as_deref(), Some("Claude"));
        assert!(snapshot.timestamp.is_some());
    }

    #[tokio::test]
    async fn extension_persists_on_submit_without_history() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = extension(&api, &store);

        controller.edit(FormEdit::RawPrompt(format!("\n{PROMPT}\n"))).await;
        assert_eq!(stored_snapshot(&store).await, None);

        controller.optimize().await;
        let snapshot = stored_snapshot(&store).await.unwrap();
        assert_eq!(snapshot.raw_prompt.as_deref(), Some(PROMPT));
        assert_eq!(store.get(HISTORY_KEY).await.unwrap(), None);
        assert_eq!(store.get(LATEST_RESULT_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn stale_snapshot_is_ignored_by_web_only() {
        let store = MemoryStore::new();
        let stale = PersistedFormSnapshot {
            raw_prompt: Some("yesterday's prompt text".into()),
            prompt_style: Some("DETAIL".into()),
            target_ai: Some("Gemini".into()),
            timestamp: Some(now_ms() - 25 * 60 * 60 * 1000),
        };
        persistence::save_snapshot(&store, &stale).await.unwrap();

        let web_controller = web(&FakeApi::default(), &store);
        web_controller.init().await;
        let form = web_controller.state().get_untracked().form;
        assert_eq!(form.raw_prompt, "");
        assert_eq!(form.prompt_style, PromptStyle::Basic);
        assert_eq!(form.target_ai, TargetAi::ChatGPT);

        let extension_controller = extension(&FakeApi::default(), &store);
        extension_controller.init().await;
        let form = extension_controller.state().get_untracked().form;
        assert_eq!(form.raw_prompt, "yesterday's prompt text");
        assert_eq!(form.target_ai, TargetAi::Gemini);
    }

    #[tokio::test]
    async fn recent_snapshot_is_restored() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        web(&api, &store)
            .edit(FormEdit::RawPrompt("restore me after reload".into()))
            .await;

        let reloaded = web(&api, &store);
        reloaded.init().await;
        assert_eq!(
            reloaded.state().get_untracked().form.raw_prompt,
            "restore me after reload"
        );
    }

    #[tokio::test]
    async fn reset_form_clears_fields_and_snapshot() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = web(&api, &store);
        controller.edit(FormEdit::RawPrompt(PROMPT.into())).await;
        controller.edit(FormEdit::Style(PromptStyle::Detail)).await;
        controller.edit(FormEdit::Target(TargetAi::Other)).await;

        controller.reset_form().await;

        let state = controller.state().get_untracked();
        assert_eq!(state.form, FormState::default());
        assert_eq!(state.status, Status::new(StatusKind::Ready, "Ready for new optimization"));
        assert_eq!(store.get(FORM_DATA_KEY).await.unwrap(), None);

        let reloaded = web(&api, &store);
        reloaded.init().await;
        assert_eq!(reloaded.state().get_untracked().form, FormState::default());
    }

    #[tokio::test]
    async fn extension_cannot_reset_form() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        let controller = extension(&api, &store);
        controller.edit(FormEdit::RawPrompt(PROMPT.into())).await;

        controller.reset_form().await;
        assert_eq!(controller.state().get_untracked().form.raw_prompt, PROMPT);
    }

    #[tokio::test]
    async fn health_status_mapping() {
        let cases = [
            (
                Ok(HealthReport::new("healthy")),
                StatusKind::Ready,
                "Connected and ready",
            ),
            (
                Ok(HealthReport::new("degraded")),
                StatusKind::Error,
                "Backend service unavailable",
            ),
            (
                Ok(HealthReport::default()),
                StatusKind::Error,
                "Backend service unavailable",
            ),
            (
                Err(ClientError::from_status(500, Some("Internal Server Error"))),
                StatusKind::Error,
                "Backend connection failed",
            ),
            (
                Err(ClientError::InvalidResponse("expected value".into())),
                StatusKind::Error,
                "Backend offline - Please ensure the server is running",
            ),
            (
                Err(ClientError::Network("dns".into())),
                StatusKind::Error,
                "Backend offline - Please ensure the server is running",
            ),
        ];

        for (outcome, kind, message) in cases {
            let (api, store) = (FakeApi::default(), MemoryStore::new());
            *api.health.borrow_mut() = Some(outcome);
            let controller = web(&api, &store);
            controller.check_status().await;
            assert_eq!(controller.state().get_untracked().status, Status::new(kind, message));
        }
    }

    #[tokio::test]
    async fn health_timeout_reports_offline() {
        let (api, store) = (FakeApi::default(), MemoryStore::new());
        api.hang.set(true);
        let controller = web(&api, &store).with_sleep(immediately);

        controller.check_status().await;
        assert_eq!(
            controller.state().get_untracked().status,
            Status::new(StatusKind::Error, "Backend offline - Please ensure the server is running")
        );
    }

    #[tokio::test]
    async fn storage_failures_do_not_block_the_flow() {
        let api = FakeApi::default();
        let controller =
            FormController::new(ControllerConfig::web(DEFAULT_API_URL), api.clone(), FailingStore)
                .with_sleep(never);

        controller.init().await;
        controller.edit(FormEdit::RawPrompt(PROMPT.into())).await;
        controller.optimize().await;

        let state = controller.state().get_untracked();
        assert!(matches!(state.panel, Panel::Result(_)));
        assert!(!state.is_optimizing);
        assert_eq!(api.request_count(), 1);

        controller.reset_form().await;
        assert_eq!(controller.state().get_untracked().form, FormState::default());
    }
}
