use leptos::prelude::*;

use crate::config::Variant;
use crate::state::AppContext;

#[component]
pub fn Header() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext context not found");
    let state = ctx.state;
    let status = Memo::new(move |_| state.with(|s| s.status.clone()));

    let subtitle = match ctx.variant {
        Variant::Web => "Turn rough ideas into precise prompts",
        Variant::Extension => "Prompt optimizer",
    };

    view! {
        <header>
            <h1>"Lyra"</h1>
            <p class="subtitle">{subtitle}</p>
            <div class="status" style:margin-left="auto">
                <span
                    id="statusDot"
                    class=move || format!("status-dot {}", status.with(|s| s.kind.as_str()))
                ></span>
                <span id="statusText">{move || status.with(|s| s.message.clone())}</span>
            </div>
        </header>
    }
}
