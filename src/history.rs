use chrono::{DateTime, Local};
use leptos::prelude::*;

use crate::state::AppContext;
use crate::types::HistoryEntry;

const EXCERPT_CHARS: usize = 80;

fn excerpt(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= EXCERPT_CHARS {
        text.to_string()
    } else {
        let cut: String = text.chars().take(EXCERPT_CHARS).collect();
        format!("{}…", cut.trim_end())
    }
}

/// One-line description of a past optimization.
pub fn summarize(entry: &HistoryEntry) -> String {
    let when = DateTime::from_timestamp_millis(entry.timestamp)
        .map(|utc| utc.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default();
    format!(
        "{when} · {} · {} · {}",
        entry.input.prompt_style.label(),
        entry.input.target_ai.as_str(),
        excerpt(&entry.input.raw_prompt)
    )
}

#[component]
pub fn HistoryList() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext context not found");
    let history = ctx.history;

    view! {
        {move || {
            let entries = history.get();
            if entries.is_empty() {
                ().into_any()
            } else {
                view! {
                    <section class="history">
                        <h3>"Recent Optimizations"</h3>
                        <ol>
                            {entries
                                .iter()
                                .map(|entry| view! { <li>{summarize(entry)}</li> })
                                .collect_view()}
                        </ol>
                    </section>
                }
                    .into_any()
            }
        }}
    }
}
