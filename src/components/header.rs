//! Top bar component

use leptos::prelude::*;
use leptos_router::hooks::use_navigate;
use crate::state::AppState;

/// Workspace top bar: branding on the left, user name and logout on the right
#[component]
pub fn Header() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();

    let full_name = Signal::derive(move || {
        state
            .session
            .user()
            .map(|u| u.full_name)
            .unwrap_or_default()
    });

    let logout = move |_| {
        tracing::info!("Logging out");
        state.session.logout();
        navigate("/login", Default::default());
    };

    view! {
        <header class="header h-16 sticky top-0 z-30">
            <div class="h-full px-6 flex items-center justify-between">
                <a href="/holder" class="logo hover:opacity-80 transition-opacity">
                    <h1 class="text-xl font-bold text-gradient">"EduQuest.ai"</h1>
                </a>

                // Name swaps to "Logout" on hover
                <button
                    on:click=logout
                    class="group btn btn-ghost min-w-[8rem] justify-end"
                >
                    <span class="group-hover:hidden">{move || full_name.get()}</span>
                    <span class="hidden group-hover:inline text-[var(--accent-error)]">"Logout"</span>
                </button>
            </div>
        </header>
    }
}
