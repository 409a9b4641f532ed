//! Side panel component

use leptos::prelude::*;
use leptos::task::spawn_local;
use crate::components::LoadingSpinner;
use crate::search::ChatSearch;
use crate::state::AppState;
use crate::types::ChatId;
use crate::workspace::Mode;

/// Side panel with navigation actions and the chat history
#[component]
pub fn Sidebar(
    /// Collapsed to an icon rail
    collapsed: RwSignal<bool>,
    /// Chat shown in the main pane, highlighted in the list
    #[prop(into)]
    active_chat: Signal<Option<ChatId>>,
    on_select: Callback<ChatId>,
    on_new_chat: Callback<()>,
) -> impl IntoView {
    let state = expect_context::<AppState>();
    let search_open = RwSignal::new(false);
    let search = ChatSearch::new();

    let select_hit = Callback::new(move |chat_id: ChatId| {
        search_open.set(false);
        on_select.run(chat_id);
    });

    view! {
        <aside class=move || format!(
            "sidebar relative h-full flex flex-col border-r border-[var(--border-default)] transition-all duration-300 {}",
            if collapsed.get() { "w-16" } else { "w-72" }
        )>
            <div class="p-3 flex items-center justify-end border-b border-[var(--border-default)]">
                <button
                    on:click=move |_| collapsed.update(|c| *c = !*c)
                    class="btn btn-ghost p-2"
                    title=move || if collapsed.get() { "Expand" } else { "Collapse" }
                >
                    {move || if collapsed.get() { "»" } else { "«" }}
                </button>
            </div>

            <nav class="p-3 flex flex-col gap-1">
                <SidebarAction
                    icon="＋"
                    label="New Chat"
                    collapsed=collapsed
                    on_click=move |_| on_new_chat.run(())
                />
                <a href=Mode::Quiz.href() class="sidebar-item w-full text-left">
                    <span class="text-lg">"📝"</span>
                    <Show when=move || !collapsed.get()>
                        <span class="text-sm font-medium">"Generate Quiz"</span>
                    </Show>
                </a>
                <SidebarAction
                    icon="🔍"
                    label="Search History"
                    collapsed=collapsed
                    on_click=move |_| search_open.set(true)
                />
            </nav>

            <Show when=move || !collapsed.get()>
                <div class="flex-1 overflow-y-auto p-3">
                    <div class="flex items-center justify-between mb-3 px-2">
                        <h3 class="text-xs font-semibold text-[var(--text-muted)] uppercase tracking-wider">
                            "History"
                        </h3>
                        <Show when=move || state.session.is_loading()>
                            <LoadingSpinner size="w-3 h-3" />
                        </Show>
                    </div>
                    <div class="space-y-1">
                        {move || {
                            let chats = state.session.chats();
                            if chats.is_empty() {
                                view! {
                                    <p class="px-2 text-sm text-[var(--text-muted)]">"No chats yet"</p>
                                }.into_any()
                            } else {
                                chats.into_iter().map(|chat| {
                                    let chat_id = chat.chat_id;
                                    view! {
                                        <button
                                            on:click=move |_| on_select.run(chat_id)
                                            class=move || format!(
                                                "sidebar-item w-full text-left {}",
                                                if active_chat.get() == Some(chat_id) { "sidebar-item-active" } else { "" }
                                            )
                                        >
                                            <span class="text-sm truncate">{chat.title}</span>
                                        </button>
                                    }
                                }).collect::<Vec<_>>().into_any()
                            }
                        }}
                    </div>
                </div>
            </Show>
        </aside>

        <Show when=move || search_open.get()>
            <SearchModal
                search=search
                on_select=select_hit
                on_close=Callback::new(move |_: ()| search_open.set(false))
            />
        </Show>
    }
}

/// Navigation button that hides its label when the panel is collapsed
#[component]
fn SidebarAction(
    icon: &'static str,
    label: &'static str,
    collapsed: RwSignal<bool>,
    on_click: impl Fn(web_sys::MouseEvent) + 'static,
) -> impl IntoView {
    view! {
        <button on:click=on_click class="sidebar-item w-full text-left" title=label>
            <span class="text-lg">{icon}</span>
            <Show when=move || !collapsed.get()>
                <span class="text-sm font-medium">{label}</span>
            </Show>
        </button>
    }
}

/// Keyword search over chat titles; every keystroke searches
#[component]
fn SearchModal(
    search: ChatSearch,
    on_select: Callback<ChatId>,
    on_close: Callback<()>,
) -> impl IntoView {
    let state = expect_context::<AppState>();

    let on_input = move |ev: web_sys::Event| {
        let keyword = event_target_value(&ev);
        let Some(user_id) = state.session.user_id_untracked() else {
            return;
        };
        spawn_local(async move {
            let backend = state.backend();
            if let Err(e) = search.search(backend.as_ref(), user_id, keyword).await {
                tracing::error!("Chat search failed: {}", e);
            }
        });
    };

    view! {
        <div
            class="fixed inset-0 bg-black/60 backdrop-blur-sm z-40 flex items-start justify-center pt-24 animate-fade-in"
            on:click=move |_| on_close.run(())
        >
            <div
                class="card w-full max-w-lg p-4"
                on:click=|ev| ev.stop_propagation()
            >
                <div class="flex items-center justify-between mb-3">
                    <h3 class="font-semibold">"Search History"</h3>
                    <button on:click=move |_| on_close.run(()) class="btn btn-ghost p-1">"✕"</button>
                </div>
                <input
                    type="text"
                    prop:value=move || search.query()
                    on:input=on_input
                    placeholder="Search chats..."
                    class="input w-full"
                />
                <div class="mt-3 max-h-80 overflow-y-auto space-y-1">
                    {move || {
                        let hits = search.results();
                        if hits.is_empty() {
                            view! {
                                <p class="text-sm text-[var(--text-muted)] px-2 py-4 text-center">"No results"</p>
                            }.into_any()
                        } else {
                            hits.into_iter().map(|hit| {
                                let chat_id = hit.chat_id;
                                view! {
                                    <button
                                        on:click=move |_| on_select.run(chat_id)
                                        class="sidebar-item w-full text-left"
                                    >
                                        <span class="text-sm truncate">{hit.title}</span>
                                    </button>
                                }
                            }).collect::<Vec<_>>().into_any()
                        }
                    }}
                </div>
            </div>
        </div>
    }
}
