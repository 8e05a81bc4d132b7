mod controls;
mod shortcut;

pub use controls::SubmitButton;
pub use shortcut::create_submit_shortcut_handler;

use leptos::prelude::*;

use crate::controller::FormEdit;
use crate::state::AppContext;
use crate::types::{PromptStyle, TargetAi};
use crate::validation::MAX_PROMPT_CHARS;

#[component]
pub fn PromptForm() -> impl IntoView {
    let ctx = use_context::<AppContext>().expect("AppContext context not found");
    let state = ctx.state;

    let raw_prompt = Signal::derive(move || state.with(|s| s.form.raw_prompt.clone()));
    let can_submit = Memo::new(move |_| state.with(|s| s.can_submit()));
    let is_optimizing = Memo::new(move |_| state.with(|s| s.is_optimizing));
    let char_count = Memo::new(move |_| state.with(|s| s.char_count()));
    let char_tier = Memo::new(move |_| state.with(|s| s.char_tier()));

    // The field updates synchronously so the textarea never re-renders a stale value.
    let on_edit = move |edit: FormEdit| {
        ctx.run(|controller| {
            controller.apply_edit(edit);
            async move {
                if controller.config().persist.on_change {
                    controller.save_form().await;
                }
            }
        })
    };
    let submit = Callback::new(move |_: ()| {
        ctx.run(|controller| async move { controller.optimize().await })
    });
    let on_keydown =
        create_submit_shortcut_handler(ctx.submit_shortcut, can_submit.into(), submit);

    view! {
        <form
            class="prompt-form"
            on:submit=move |ev| {
                ev.prevent_default();
                submit.run(());
            }
        >
            <label for="rawPrompt">"Your prompt"</label>
            <textarea
                id="rawPrompt"
                placeholder="Describe what you want the AI to do..."
                prop:value=raw_prompt
                on:input:target=move |ev| on_edit(FormEdit::RawPrompt(ev.target().value()))
                on:keydown=on_keydown
            />
            <div class="char-counter" data-tier=move || char_tier.get().as_str()>
                <span id="charCount">{move || char_count.get().to_string()}</span>
                {format!(" / {MAX_PROMPT_CHARS}")}
            </div>

            <fieldset class="style-options">
                <legend>"Style"</legend>
                {PromptStyle::ALL
                    .into_iter()
                    .map(|style| {
                        view! {
                            <label class="style-option">
                                <input
                                    type="radio"
                                    name="promptStyle"
                                    value=style.as_str()
                                    prop:checked=move || {
                                        state.with(|s| s.form.prompt_style == style)
                                    }
                                    on:change=move |_| on_edit(FormEdit::Style(style))
                                />
                                {style.label()}
                            </label>
                        }
                    })
                    .collect_view()}
            </fieldset>

            <label for="targetAI">"Target AI"</label>
            <select
                id="targetAI"
                on:change:target=move |ev| {
                    if let Some(target) = TargetAi::parse(&ev.target().value()) {
                        on_edit(FormEdit::Target(target));
                    }
                }
            >
                {TargetAi::ALL
                    .into_iter()
                    .map(|target| {
                        view! {
                            <option
                                value=target.as_str()
                                prop:selected=move || state.with(|s| s.form.target_ai == target)
                            >
                                {target.as_str()}
                            </option>
                        }
                    })
                    .collect_view()}
            </select>

            <SubmitButton can_submit=can_submit is_optimizing=is_optimizing />
        </form>
    }
}
