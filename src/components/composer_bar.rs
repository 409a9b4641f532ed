//! Composer bar: question input, attachments, voice capture

use gloo_timers::callback::{Interval, Timeout};
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use leptos::task::spawn_local;
use crate::components::LoadingSpinner;
use crate::composer::{
    self, AttachedDocument, PlaceholderTyper, Removal, Turn, DOCUMENT_REMOVED_MESSAGE,
    FILE_INPUT_ACCEPT, PLACEHOLDER_TICK_MILLIS,
};
use crate::error::user_message;
use crate::state::AppState;
use crate::types::{ChatId, Upload};
use crate::workspace::{SendTicket, Shell};
use crate::voice::{VoiceCapture, VoiceEvent, VoiceStatus, VOICE_STATUS_MILLIS};

/// Question input with the attach, voice, and send controls
#[component]
pub fn ComposerBar(
    /// Active chat and document badge; `None` active chat starts a general chat
    shell: RwSignal<Shell>,
    /// A question was answered, tagged with the conversation it was asked in
    on_turn: Callback<(SendTicket, Turn)>,
    /// A document was uploaded and its chat opened
    on_attached: Callback<AttachedDocument>,
    /// The active chat was deleted along with its document
    on_removed: Callback<ChatId>,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let notifications = state.notifications;

    let question = RwSignal::new(String::new());
    let sending = RwSignal::new(false);
    let badge = Memo::new(move |_| shell.with(|s| s.badge.clone()));
    let modal_open = RwSignal::new(false);

    // Typewriter placeholder
    let placeholder = RwSignal::new(String::new());
    let typer = StoredValue::new(PlaceholderTyper::default());
    let typer_interval: StoredValue<Option<Interval>, LocalStorage> =
        StoredValue::new_local(Some(Interval::new(PLACEHOLDER_TICK_MILLIS, move || {
            if let Some(text) = typer.try_update_value(|t| t.tick()) {
                placeholder.set(text);
            }
        })));

    // Voice
    let voice_status = RwSignal::new(VoiceStatus::Idle);
    let voice_capture: StoredValue<Option<VoiceCapture>, LocalStorage> = StoredValue::new_local(None);
    let voice_timer: StoredValue<Option<Timeout>, LocalStorage> = StoredValue::new_local(None);

    on_cleanup(move || {
        typer_interval.try_update_value(|i| i.take());
        voice_capture.try_update_value(|c| c.take());
        voice_timer.try_update_value(|t| t.take());
    });

    let send = move || {
        let text = question.get_untracked();
        if text.trim().is_empty() || sending.get_untracked() {
            return;
        }
        let Some(user_id) = state.session.user_id_untracked() else {
            notifications.error("Please log in again");
            return;
        };
        let (ticket, current_chat) = shell.with_untracked(|s| (s.ticket(), s.active_chat));
        sending.set(true);

        spawn_local(async move {
            let backend = state.backend();
            let result = composer::ask(backend.as_ref(), user_id, current_chat, &text, |chat_id| {
                shell.try_update(|s| s.chat_created(ticket, chat_id));
            })
            .await;

            match result {
                Ok(Some(turn)) => {
                    question.set(String::new());
                    on_turn.run((ticket, turn));
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::error!("Ask failed: {}", e);
                    notifications.error(user_message(&e, "Could not get an answer. Please try again."));
                }
            }
            sending.set(false);
            let _ = state.session.refresh(backend.as_ref(), user_id).await;
        });
    };

    let on_keydown = move |ev: web_sys::KeyboardEvent| {
        if ev.key() == "Enter" && !ev.shift_key() {
            ev.prevent_default();
            send();
        }
    };

    let remove_document = move |_: web_sys::MouseEvent| {
        let document_chat = shell.with_untracked(|s| s.document_chat());
        spawn_local(async move {
            let backend = state.backend();
            match composer::remove_document(backend.as_ref(), document_chat).await {
                Ok(Removal::BadgeCleared) => {
                    shell.try_update(|s| s.clear_badge());
                }
                Ok(Removal::ChatDeleted(chat_id)) => {
                    on_removed.run(chat_id);
                    notifications.info(DOCUMENT_REMOVED_MESSAGE);
                    if let Some(user_id) = state.session.user_id_untracked() {
                        let _ = state.session.refresh(backend.as_ref(), user_id).await;
                    }
                }
                Err(e) => {
                    tracing::error!("Removing document failed: {}", e);
                    notifications.error(user_message(&e, "Could not remove document"));
                }
            }
        });
    };

    let start_voice = move |_: web_sys::MouseEvent| {
        voice_timer.set_value(None);
        let on_event = move |event: VoiceEvent| {
            if let VoiceEvent::Transcript(text) = &event {
                question.set(text.clone());
            }
            let before = voice_status.get_untracked();
            let after = before.next(&event);
            voice_status.set(after);
            if after.is_settled() && !before.is_settled() {
                voice_timer.set_value(Some(Timeout::new(VOICE_STATUS_MILLIS, move || {
                    voice_status.set(VoiceStatus::Idle);
                })));
            }
        };

        voice_status.set(VoiceStatus::Recording);
        match VoiceCapture::start(on_event) {
            Ok(capture) => voice_capture.set_value(Some(capture)),
            Err(e) => {
                voice_status.set(VoiceStatus::Idle);
                notifications.error(e.to_string());
            }
        }
    };

    view! {
        <div class="px-4 pb-4">
            <div class="max-w-3xl mx-auto flex flex-col gap-2">
                // Attached document badge
                {move || badge.get().map(|doc| view! {
                    <div class="self-start flex items-center gap-2 px-3 py-1.5 rounded-full bg-[var(--bg-secondary)] border border-[var(--border-default)] text-sm animate-fade-in">
                        <span>"📄"</span>
                        <span class="truncate max-w-[16rem]">{doc.filename}</span>
                        <button on:click=remove_document class="text-[var(--text-muted)] hover:text-[var(--accent-error)]" title="Remove document">
                            "✕"
                        </button>
                    </div>
                })}

                // Voice status popup
                {move || voice_status.get().label().map(|label| view! {
                    <div class="self-center px-3 py-1 rounded-full bg-[var(--bg-secondary)] text-xs text-[var(--text-secondary)] animate-fade-in">
                        {label}
                    </div>
                })}

                <div class="flex items-end gap-2 p-2 rounded-2xl bg-[var(--bg-secondary)] border border-[var(--border-default)]">
                    <button
                        on:click=move |_| modal_open.set(true)
                        class="btn btn-ghost p-3"
                        title="Attach document"
                    >
                        "📎"
                    </button>
                    <input
                        type="text"
                        prop:value=move || question.get()
                        on:input=move |ev| question.set(event_target_value(&ev))
                        on:keydown=on_keydown
                        placeholder=move || placeholder.get()
                        disabled=move || sending.get()
                        class="flex-1 bg-transparent px-2 py-3 text-[var(--text-primary)] placeholder-[var(--text-muted)] focus:outline-none disabled:opacity-50"
                    />
                    <button
                        on:click=start_voice
                        class="btn btn-ghost p-3"
                        title="Voice input"
                    >
                        "🎤"
                    </button>
                    <button
                        on:click=move |_| send()
                        disabled=move || sending.get() || question.get().trim().is_empty()
                        class="btn btn-primary p-3 rounded-xl disabled:opacity-50 disabled:cursor-not-allowed"
                    >
                        {move || if sending.get() {
                            view! { <LoadingSpinner /> }.into_any()
                        } else {
                            view! { <span>"➤"</span> }.into_any()
                        }}
                    </button>
                </div>
            </div>

            <Show when=move || modal_open.get()>
                <AttachModal
                    on_close=Callback::new(move |_: ()| modal_open.set(false))
                    on_attached=on_attached
                />
            </Show>
        </div>
    }
}

/// Upload dialog: browse or drag-and-drop a single file
#[component]
fn AttachModal(on_close: Callback<()>, on_attached: Callback<AttachedDocument>) -> impl IntoView {
    let state = expect_context::<AppState>();
    let notifications = state.notifications;

    let file_input = NodeRef::<leptos::html::Input>::new();
    let selected = RwSignal::new_local(Option::<Upload>::None);
    let drag_active = RwSignal::new(false);
    let uploading = RwSignal::new(false);

    let choose = move |file: Option<web_sys::File>| {
        let Some(file) = file else {
            return;
        };
        match composer::validate_attachment(Upload::from_file(file)) {
            Ok(upload) => selected.set(Some(upload)),
            Err(e) => notifications.error(e.to_string()),
        }
    };

    let on_change = move |ev: web_sys::Event| {
        let input = event_target::<web_sys::HtmlInputElement>(&ev);
        choose(input.files().and_then(|files| files.get(0)));
    };

    let on_drop = move |ev: web_sys::DragEvent| {
        ev.prevent_default();
        drag_active.set(false);
        choose(
            ev.data_transfer()
                .and_then(|dt| dt.files())
                .and_then(|files| files.get(0)),
        );
    };

    let start_upload = move |_: web_sys::MouseEvent| {
        let Some(upload) = selected.get_untracked() else {
            notifications.error("Select a file first!");
            return;
        };
        let Some(user_id) = state.session.user_id_untracked() else {
            notifications.error("Please log in again");
            return;
        };
        uploading.set(true);

        spawn_local(async move {
            let backend = state.backend();
            match composer::attach_document(backend.as_ref(), user_id, &upload).await {
                Ok(doc) => {
                    on_attached.run(doc);
                    let _ = state.session.refresh(backend.as_ref(), user_id).await;
                    uploading.set(false);
                    on_close.run(());
                    notifications.success("Upload successful, ready to chat!");
                }
                Err(e) => {
                    tracing::error!("Attaching {} failed: {}", upload.filename, e);
                    uploading.set(false);
                    notifications.error(format!("Something went wrong: {}", user_message(&e, "upload failed")));
                }
            }
        });
    };

    view! {
        <div class="fixed inset-0 bg-black/60 backdrop-blur-sm z-40 flex items-center justify-center animate-fade-in">
            <div class="card w-full max-w-md p-6">
                <div class="flex items-center justify-between mb-4">
                    <h3 class="font-semibold">"Upload a document"</h3>
                    <button on:click=move |_| on_close.run(()) class="btn btn-ghost p-1">"✕"</button>
                </div>

                <div
                    on:dragover=move |ev: web_sys::DragEvent| {
                        ev.prevent_default();
                        drag_active.set(true);
                    }
                    on:dragleave=move |_| drag_active.set(false)
                    on:drop=on_drop
                    class=move || format!(
                        "border-2 border-dashed rounded-[var(--radius-md)] p-8 text-center transition-colors {}",
                        if drag_active.get() {
                            "border-[var(--accent-primary)] bg-[var(--accent-primary)]/10"
                        } else {
                            "border-[var(--border-default)]"
                        }
                    )
                >
                    <p class="text-sm text-[var(--text-secondary)] mb-3">"Drag & drop a file here, or"</p>
                    <button
                        on:click=move |_| {
                            if let Some(input) = file_input.get() {
                                input.click();
                            }
                        }
                        class="btn btn-ghost"
                    >
                        "Browse"
                    </button>
                    <input
                        node_ref=file_input
                        type="file"
                        accept=FILE_INPUT_ACCEPT
                        on:change=on_change
                        class="hidden"
                    />
                    <p class="text-xs text-[var(--text-muted)] mt-3">"PDF, TXT, PNG or JPG"</p>
                </div>

                {move || selected.with(|s| s.as_ref().map(|u| u.filename.clone())).map(|name| view! {
                    <p class="mt-3 text-sm truncate">"Selected: " {name}</p>
                })}

                <button
                    on:click=start_upload
                    disabled=move || uploading.get()
                    class="btn btn-primary w-full py-3 mt-4"
                >
                    <Show when=move || uploading.get()>
                        <LoadingSpinner />
                    </Show>
                    {move || if uploading.get() { "Uploading..." } else { "Upload" }}
                </button>
            </div>
        </div>
    }
}
