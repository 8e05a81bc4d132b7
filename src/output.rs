use leptos::{html, prelude::*};

use crate::controller::Panel;
use crate::copy_button::CopyButton;
use crate::state::AppContext;
use crate::types::DisplayModel;

/// Renders whichever of the result and error panels the controller currently shows.
#[component]
pub fn OutputPanel() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext context not found");
    let state = ctx.state;
    let panel = Memo::new(move |_| state.with(|s| s.panel.clone()));

    view! {
        {move || match panel.get() {
            Panel::Input => ().into_any(),
            Panel::Result(display) => view! { <ResultPanel display=display /> }.into_any(),
            Panel::Error(message) => view! { <ErrorPanel message=message /> }.into_any(),
        }}
    }
}

#[component]
fn ResultPanel(display: DisplayModel) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext context not found");
    let section_ref: NodeRef<html::Section> = NodeRef::new();
    let text_ref: NodeRef<html::Pre> = NodeRef::new();

    Effect::new(move |_| {
        if let Some(section) = section_ref.get() {
            section.scroll_into_view();
        }
    });

    let DisplayModel {
        optimized_text,
        improvements,
        techniques,
        pro_tip,
    } = display;

    view! {
        <section id="resultsSection" class="results" node_ref=section_ref>
            <div class="result-header">
                <h2>"Optimized Prompt"</h2>
                <CopyButton
                    text_to_copy=Signal::stored(optimized_text.clone())
                    fallback_target=text_ref
                    selection_feedback=ctx.selection_feedback
                />
            </div>
            <pre id="optimizedPrompt" style:white-space="break-spaces" node_ref=text_ref>
                {optimized_text}
            </pre>
            {improvements
                .map(|items| {
                    view! {
                        <div id="improvementsCard" class="card">
                            <h3>"Key Improvements"</h3>
                            <ul id="improvementsList">
                                {items
                                    .into_iter()
                                    .map(|item| view! { <li>{item}</li> })
                                    .collect_view()}
                            </ul>
                        </div>
                    }
                })}
            {techniques
                .map(|techniques| {
                    view! {
                        <div id="techniquesCard" class="card">
                            <h3>"Techniques Applied"</h3>
                            <p id="techniquesList">{techniques}</p>
                        </div>
                    }
                })}
            {pro_tip
                .map(|tip| {
                    view! {
                        <div id="proTipCard" class="card">
                            <h3>"Pro Tip"</h3>
                            <p id="proTipText">{tip}</p>
                        </div>
                    }
                })}
            <button
                id="newOptimizationBtn"
                data-role="secondary"
                on:click=move |_| ctx.controller().reset_to_input()
            >
                "New Optimization"
            </button>
        </section>
    }
}

#[component]
fn ErrorPanel(message: String) -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext context not found");
    let section_ref: NodeRef<html::Section> = NodeRef::new();

    Effect::new(move |_| {
        if let Some(section) = section_ref.get() {
            section.scroll_into_view();
        }
    });

    view! {
        <section id="errorSection" class="error" node_ref=section_ref>
            <p id="errorMessage">{message}</p>
            <button
                id="retryBtn"
                data-role="primary"
                on:click=move |_| ctx.run(|controller| async move { controller.optimize().await })
            >
                "Try Again"
            </button>
            {ctx
                .allow_form_reset
                .then(|| {
                    view! {
                        <button
                            id="resetBtn"
                            data-role="secondary"
                            on:click=move |_| {
                                ctx.run(|controller| async move { controller.reset_form().await })
                            }
                        >
                            "Start Over"
                        </button>
                    }
                })}
        </section>
    }
}
