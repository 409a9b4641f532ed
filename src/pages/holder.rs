//! Workspace shell: side panel, top bar, and the chat or quiz view

use gloo_timers::callback::Timeout;
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos_router::hooks::{use_navigate, use_query_map};
use crate::components::{ChatView, ComposerBar, Header, QuizPanel, Sidebar, Welcome};
use crate::composer::{AttachedDocument, Turn};
use crate::state::AppState;
use crate::types::ChatId;
use crate::workspace::{Mode, SendTicket, Shell, Transcript, WorkspaceView, SEND_EXIT_MILLIS};

/// Main workspace page
#[component]
pub fn HolderPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let navigate = use_navigate();
    let query = use_query_map();

    let shell = RwSignal::new(Shell::default());
    let collapsed = RwSignal::new(false);
    let send_timer: StoredValue<Option<Timeout>, LocalStorage> = StoredValue::new_local(None);
    let navigate = StoredValue::new_local(navigate);

    // Redirect if not authenticated
    Effect::new(move |_| {
        if !state.is_authenticated() {
            navigate.with_value(|nav| nav("/login", Default::default()));
        }
    });

    let mode = Memo::new(move |_| query.with(|q| Mode::from_query(q.get("mode").as_deref())));
    Effect::new(move |_| {
        let mode = mode.get();
        shell.update(|s| s.on_mode(mode));
    });

    on_cleanup(move || {
        send_timer.try_update_value(|t| t.take());
    });

    let view_state = Memo::new(move |_| shell.with(|s| s.view));
    let active_chat = Memo::new(move |_| shell.with(|s| s.active_chat));
    let transcript = Memo::new(move |_| shell.with(|s| s.transcript.clone()));

    let on_turn = Callback::new(move |(ticket, turn): (SendTicket, Turn)| {
        let queued = shell
            .try_update(|s| s.receive_turn(ticket, turn))
            .unwrap_or(false);
        if queued {
            // Replacing the timer cancels an earlier window; its turns were applied above
            send_timer.set_value(Some(Timeout::new(SEND_EXIT_MILLIS, move || {
                shell.try_update(|s| s.apply_pending());
            })));
        }
    });

    let on_select = Callback::new(move |chat_id: ChatId| {
        send_timer.try_update_value(|t| t.take());
        let opened = state
            .session
            .session_untracked()
            .and_then(|s| s.chat(chat_id).map(Transcript::from_chat))
            .unwrap_or_else(|| {
                tracing::warn!("Chat {} is not in the session", chat_id);
                Transcript {
                    chat_id: Some(chat_id),
                    messages: vec![],
                }
            });
        shell.update(|s| s.select_chat(opened));
        if mode.get_untracked() == Mode::Quiz {
            navigate.with_value(|nav| nav(Mode::Chat.href(), Default::default()));
        }
    });

    let on_new_chat = Callback::new(move |_: ()| {
        send_timer.try_update_value(|t| t.take());
        shell.update(Shell::reset);
        navigate.with_value(|nav| nav(Mode::Chat.href(), Default::default()));
    });

    let on_attached = Callback::new(move |doc: AttachedDocument| {
        send_timer.try_update_value(|t| t.take());
        shell.update(|s| s.attached(doc));
    });

    let on_removed = Callback::new(move |chat_id: ChatId| {
        tracing::info!("Chat {} removed with its document", chat_id);
        if shell.with_untracked(|s| s.active_chat == Some(chat_id)) {
            send_timer.try_update_value(|t| t.take());
        }
        shell.update(|s| s.document_removed(chat_id));
    });

    let in_quiz = Memo::new(move |_| view_state.get() == WorkspaceView::Quiz);

    view! {
        <div class="h-screen flex bg-[var(--bg-primary)] text-[var(--text-primary)]">
            <Sidebar
                collapsed=collapsed
                active_chat=active_chat
                on_select=on_select
                on_new_chat=on_new_chat
            />

            <div class="flex-1 flex flex-col min-w-0">
                <Header />

                {move || if in_quiz.get() {
                    view! { <QuizPanel /> }.into_any()
                } else {
                    view! {
                        <Show
                            when=move || view_state.get().shows_welcome()
                            fallback=move || view! { <ChatView transcript=transcript /> }
                        >
                            <Welcome exiting=Signal::derive(move || {
                                view_state.get() == WorkspaceView::Welcome { exiting: true }
                            }) />
                        </Show>
                        <ComposerBar
                            shell=shell
                            on_turn=on_turn
                            on_attached=on_attached
                            on_removed=on_removed
                        />
                    }.into_any()
                }}
            </div>
        </div>
    }
}
