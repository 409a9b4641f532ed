//! Busy indicator

use leptos::prelude::*;

/// Spinning ring shown on buttons and the history header while a request runs
#[component]
pub fn LoadingSpinner(
    /// Tailwind size classes
    #[prop(default = "w-5 h-5")]
    size: &'static str,
) -> impl IntoView {
    view! {
        <span
            role="status"
            aria-label="Loading"
            class=format!(
                "inline-block {} rounded-full border-2 border-[var(--border-default)] border-t-[var(--accent-primary)] animate-spin",
                size
            )
        ></span>
    }
}
