//! EduQuest.ai - Leptos frontend for the EduQuest study assistant
//!
//! Chat with uploaded documents, ask general questions, and quiz yourself on
//! what you uploaded. All persistence and AI work happens behind the HTTP API.

pub mod api;
pub mod auth;
pub mod components;
pub mod composer;
pub mod config;
pub mod error;
pub mod pages;
pub mod quiz;
pub mod search;
pub mod state;
pub mod types;
pub mod voice;
pub mod workspace;

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_meta::{provide_meta_context, Title};
use leptos_router::{
    components::{Redirect, Route, Router, Routes},
    path,
};

use components::Toasts;
use config::ClientConfig;
use pages::{holder::HolderPage, login::LoginPage};
use state::AppState;

/// Main application component
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    // Initialize global state
    let app_state = AppState::new(ClientConfig::from_build_env());
    provide_context(app_state);

    // Rebuild the session from a persisted token
    spawn_local(async move {
        let backend = app_state.backend();
        if let Some(Err(e)) = app_state.session.restore(backend.as_ref()).await {
            tracing::warn!("Could not restore session: {}", e);
        }
    });

    view! {
        <Title text="EduQuest.ai" />
        <Router>
            <Toasts />
            <main class="min-h-screen bg-[var(--bg-primary)] text-[var(--text-primary)]">
                <Routes fallback=|| view! { <NotFound /> }>
                    <Route path=path!("/") view=|| view! { <Redirect path="/login" /> } />
                    <Route path=path!("/login") view=LoginPage />
                    <Route path=path!("/holder") view=HolderPage />
                </Routes>
            </main>
        </Router>
    }
}

/// 404 Not Found page
#[component]
fn NotFound() -> impl IntoView {
    view! {
        <div class="min-h-screen flex items-center justify-center">
            <div class="text-center">
                <h1 class="text-6xl font-bold text-[var(--text-muted)] mb-4">"404"</h1>
                <p class="text-xl text-[var(--text-secondary)] mb-8">"Page not found"</p>
                <a href="/holder" class="btn btn-primary px-6 py-3">
                    "Back to EduQuest"
                </a>
            </div>
        </div>
    }
}
