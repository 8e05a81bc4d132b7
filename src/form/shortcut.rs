use leptos::ev::KeyboardEvent;
use leptos::prelude::*;

pub fn is_submit_shortcut(key: &str, ctrl: bool) -> bool {
    ctrl && key == "Enter"
}

/// Ctrl+Enter submits when `enabled`; plain Enter keeps inserting newlines.
pub fn create_submit_shortcut_handler(
    enabled: bool,
    can_submit: Signal<bool>,
    on_submit: Callback<()>,
) -> impl Fn(KeyboardEvent) {
    move |ev: KeyboardEvent| {
        if !enabled || !is_submit_shortcut(&ev.key(), ev.ctrl_key()) {
            return;
        }

        ev.prevent_default();
        if can_submit.get_untracked() {
            on_submit.run(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_ctrl_enter_submits() {
        assert!(is_submit_shortcut("Enter", true));
        assert!(!is_submit_shortcut("Enter", false));
        assert!(!is_submit_shortcut("a", true));
    }
}
