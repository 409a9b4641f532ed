//! Toast stack

use leptos::prelude::*;
use crate::state::{AppState, ToastKind};

/// Renders the current notifications; each one can also be dismissed by click
#[component]
pub fn Toasts() -> impl IntoView {
    let state = expect_context::<AppState>();
    let notifications = state.notifications;

    view! {
        <div class="fixed top-4 left-1/2 -translate-x-1/2 z-50 flex flex-col gap-2 items-center">
            <For
                each=move || notifications.toasts()
                key=|toast| toast.id
                children=move |toast| {
                    let id = toast.id;
                    let tone = match toast.kind {
                        ToastKind::Success => "border-[var(--accent-success)] text-[var(--accent-success)]",
                        ToastKind::Info => "border-[var(--accent-primary)] text-[var(--text-primary)]",
                        ToastKind::Error => "border-[var(--accent-error)] text-[var(--accent-error)]",
                    };
                    view! {
                        <div
                            on:click=move |_| notifications.dismiss(id)
                            class=format!(
                                "px-4 py-2 rounded-[var(--radius-md)] border bg-[var(--bg-secondary)] shadow-lg text-sm cursor-pointer animate-fade-in-down {}",
                                tone
                            )
                        >
                            {toast.text}
                        </div>
                    }
                }
            />
        </div>
    }
}
