//! Transcript of the active chat

use leptos::prelude::*;
use crate::types::{Message, Sender};
use crate::workspace::Transcript;

/// Scrollable transcript; keeps the newest turn in view
#[component]
pub fn ChatView(#[prop(into)] transcript: Signal<Transcript>) -> impl IntoView {
    let container = NodeRef::<leptos::html::Div>::new();

    Effect::new(move |_| {
        transcript.track();
        if let Some(el) = container.get() {
            el.set_scroll_top(el.scroll_height());
        }
    });

    view! {
        <div node_ref=container class="flex-1 overflow-y-auto px-4 py-6">
            <div class="max-w-3xl mx-auto flex flex-col gap-4">
                <For
                    each=move || transcript.with(|t| {
                        t.messages
                            .iter()
                            .enumerate()
                            .map(|(i, message)| (t.separator_before(i), message.clone()))
                            .collect::<Vec<_>>()
                    })
                    key=|(_, message)| message.id.clone()
                    children=|(separator, message)| view! {
                        {separator.then(|| view! {
                            <hr class="border-[var(--border-default)] my-2" />
                        })}
                        <MessageBubble message=message />
                    }
                />
            </div>
        </div>
    }
}

/// Render a single transcript entry
#[component]
fn MessageBubble(message: Message) -> impl IntoView {
    let is_user = message.sender == Sender::User;
    let timestamp = message
        .timestamp
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default();

    view! {
        <div class=format!(
            "flex flex-col gap-1 message-appear {}",
            if is_user { "items-end" } else { "items-start" }
        )>
            {if is_user {
                view! {
                    <div class="max-w-[80%] px-4 py-3 rounded-2xl rounded-tr-sm bg-[var(--accent-primary)] text-white whitespace-pre-wrap break-words">
                        {message.text}
                    </div>
                }.into_any()
            } else {
                // Answers arrive as HTML from the backend
                view! {
                    <div
                        class="max-w-[90%] px-4 py-3 rounded-2xl rounded-tl-sm bg-[var(--bg-secondary)] text-[var(--text-primary)] prose break-words"
                        inner_html=message.text
                    ></div>
                }.into_any()
            }}
            <span class="text-xs text-[var(--text-muted)]">{timestamp}</span>
        </div>
    }
}
