use leptos::prelude::*;

#[component]
pub fn SubmitButton(
    #[prop(into)] can_submit: Signal<bool>,
    #[prop(into)] is_optimizing: Signal<bool>,
) -> impl IntoView {
    view! {
        <button
            id="optimizeBtn"
            type="submit"
            data-role="primary"
            disabled=move || !can_submit.get()
        >
            {move || {
                if is_optimizing.get() {
                    view! {
                        <span class="btn-loader">
                            <span class="spinner"></span>
                            "Optimizing..."
                        </span>
                    }
                        .into_any()
                } else {
                    view! { <span class="btn-content">"Optimize Prompt"</span> }.into_any()
                }
            }}
        </button>
    }
}
