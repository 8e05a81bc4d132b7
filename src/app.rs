use futures::FutureExt;
use leptos::ev;
use leptos::prelude::*;

use crate::api::HttpApi;
use crate::config::{self, ControllerConfig, Variant};
use crate::controller::FormController;
use crate::form::PromptForm;
use crate::header::Header;
use crate::history::HistoryList;
use crate::output::OutputPanel;
use crate::persistence::BrowserStore;
use crate::state::AppContext;
use crate::utils;

#[component]
pub fn App() -> impl IntoView {
    let variant = if utils::is_extension() {
        Variant::Extension
    } else {
        Variant::Web
    };
    let config = ControllerConfig::for_variant(variant, config::api_url());
    leptos::logging::log!(
        "[INFO] [APP] Starting in {:?} mode against {}",
        variant,
        config.api_url
    );

    let api = HttpApi::new(config.api_url.clone());
    let controller = FormController::new(config, api, BrowserStore::detect(variant));
    let ctx = AppContext::new(controller);
    provide_context(ctx);

    ctx.run(|controller| async move { controller.init().await });

    if ctx.controller().config().persist.on_change {
        // Local storage writes finish within the first poll, before the page goes away.
        let _ = window_event_listener(ev::beforeunload, move |_| {
            let _ = ctx.controller().save_form().now_or_never();
        });
    }
    let _ = window_event_listener(ev::popstate, move |_| ctx.controller().reset_to_input());

    let variant_name = match variant {
        Variant::Web => "web",
        Variant::Extension => "extension",
    };

    view! {
        <main data-variant=variant_name>
            <Header />
            <PromptForm />
            <OutputPanel />
            {(variant == Variant::Web).then(|| view! { <HistoryList /> })}
        </main>
    }
}
