//! Signup/Login page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_navigate;
use crate::auth::{self, AuthMode, SignupForm};
use crate::components::LoadingSpinner;
use crate::error::user_message;
use crate::state::AppState;

/// Authentication screen; opens on the signup form
#[component]
pub fn LoginPage() -> impl IntoView {
    let state = expect_context::<AppState>();
    let notifications = state.notifications;
    let navigate = use_navigate();

    // Form state
    let mode = RwSignal::new(AuthMode::default());
    let first_name = RwSignal::new(String::new());
    let last_name = RwSignal::new(String::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let is_loading = RwSignal::new(false);

    // Redirect if already logged in
    let navigate_for_redirect = navigate.clone();
    Effect::new(move |_| {
        if state.is_authenticated() {
            navigate_for_redirect("/holder", Default::default());
        }
    });

    let on_signup = move || {
        let form = SignupForm {
            first_name: first_name.get_untracked(),
            last_name: last_name.get_untracked(),
            email: email.get_untracked(),
            password: password.get_untracked(),
        };
        is_loading.set(true);

        spawn_local(async move {
            let backend = state.backend();
            match auth::signup(backend.as_ref(), &form).await {
                Ok(()) => {
                    notifications.success("Account created successfully!");
                    mode.set(AuthMode::Login);
                }
                Err(e) => {
                    tracing::warn!("Signup failed: {}", e);
                    notifications.error(user_message(&e, "Error creating account"));
                }
            }
            is_loading.set(false);
        });
    };

    let on_login = move || {
        let email_val = email.get_untracked();
        let password_val = password.get_untracked();
        let navigate = navigate.clone();
        is_loading.set(true);

        spawn_local(async move {
            let backend = state.backend();
            let result = auth::login(backend.as_ref(), &state.session, &email_val, &password_val).await;
            is_loading.set(false);

            match result {
                Ok(_) => {
                    notifications.success("Login successful!");
                    navigate("/holder", Default::default());
                }
                Err(e) => {
                    tracing::warn!("Login failed: {}", e);
                    notifications.error(user_message(&e, "Login failed! Something went wrong."));
                }
            }
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if is_loading.get_untracked() {
            return;
        }
        match mode.get_untracked() {
            AuthMode::Signup => on_signup(),
            AuthMode::Login => on_login(),
        }
    };

    let is_signup = move || mode.get() == AuthMode::Signup;

    view! {
        <div class="min-h-screen flex bg-[var(--bg-primary)]">
            // Branding
            <div class="hidden lg:flex flex-1 items-center justify-center p-12">
                <h1 class="text-4xl font-bold text-gradient max-w-md leading-tight">
                    "Ignite Your Growth With Guided Intelligence"
                </h1>
            </div>

            <main class="auth-container flex-1">
                <div class="w-full max-w-md px-4">
                    <div class="auth-card">
                        <div class="auth-header">
                            <div class="text-2xl font-bold text-gradient mb-2">"EduQuest.ai"</div>
                            <h1 class="auth-title">
                                {move || if is_signup() { "Create Account" } else { "Welcome Back" }}
                            </h1>
                        </div>

                        <form on:submit=on_submit class="auth-form">
                            <Show when=is_signup>
                                <div class="flex gap-3 animate-fade-in-down">
                                    <div class="auth-input-group flex-1">
                                        <label class="auth-label">"First name"</label>
                                        <input
                                            type="text"
                                            prop:value=move || first_name.get()
                                            on:input=move |ev| first_name.set(event_target_value(&ev))
                                            class="input"
                                        />
                                    </div>
                                    <div class="auth-input-group flex-1">
                                        <label class="auth-label">"Last name"</label>
                                        <input
                                            type="text"
                                            prop:value=move || last_name.get()
                                            on:input=move |ev| last_name.set(event_target_value(&ev))
                                            class="input"
                                        />
                                    </div>
                                </div>
                            </Show>

                            <div class="auth-input-group">
                                <label class="auth-label">"Email"</label>
                                <input
                                    type="email"
                                    prop:value=move || email.get()
                                    on:input=move |ev| email.set(event_target_value(&ev))
                                    placeholder="you@example.com"
                                    class="input"
                                />
                            </div>

                            <div class="auth-input-group">
                                <label class="auth-label">"Password"</label>
                                <input
                                    type="password"
                                    prop:value=move || password.get()
                                    on:input=move |ev| password.set(event_target_value(&ev))
                                    placeholder="••••••••"
                                    class="input"
                                />
                            </div>

                            <Show when=is_signup>
                                <label class="flex items-center gap-2 text-sm text-[var(--text-secondary)]">
                                    <input type="checkbox" />
                                    <span>"Terms & Conditions"</span>
                                </label>
                            </Show>

                            <button
                                type="submit"
                                disabled=move || is_loading.get()
                                class="btn btn-primary w-full py-3"
                            >
                                <Show when=move || is_loading.get()>
                                    <LoadingSpinner />
                                </Show>
                                {move || if is_signup() { "Sign Up" } else { "Log In" }}
                            </button>
                        </form>

                        <div class="auth-footer">
                            {move || if is_signup() {
                                "Already have an account? "
                            } else {
                                "Don't have an account? "
                            }}
                            <button
                                on:click=move |_| mode.update(|m| *m = m.toggled())
                                class="auth-link"
                            >
                                {move || if is_signup() { "Log in" } else { "Sign up" }}
                            </button>
                        </div>
                    </div>
                </div>
            </main>
        </div>
    }
}
