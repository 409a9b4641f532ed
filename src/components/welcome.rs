//! Greeting shown before the first turn

use leptos::prelude::*;
use crate::state::AppState;

/// Greeting with the user's name; fades out while `exiting`
#[component]
pub fn Welcome(exiting: Signal<bool>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let full_name = move || {
        state
            .session
            .user()
            .map(|u| u.full_name)
            .unwrap_or_default()
    };

    view! {
        <div class=move || format!(
            "flex-1 flex flex-col items-center justify-center text-center px-4 transition-all duration-700 {}",
            if exiting.get() { "opacity-0 -translate-y-8" } else { "opacity-100 animate-fade-in-up" }
        )>
            <h2 class="text-4xl font-bold text-gradient mb-3">
                {move || format!("Hello {},", full_name())}
            </h2>
            <p class="text-lg text-[var(--text-secondary)] mb-2">
                "Explore deeper insights & learn smarter every day"
            </p>
            <p class="text-sm text-[var(--text-muted)]">"Powered by AI"</p>
        </div>
    }
}
