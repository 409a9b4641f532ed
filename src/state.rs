//! Global application state

use crate::api::{Backend, HttpBackend};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::{Chat, Document, Session, Token, UserDataResponse, UserId, UserProfile};
use gloo_storage::{LocalStorage as BrowserStorage, Storage};
use leptos::prelude::*;
use leptos::reactive::owner::LocalStorage;
use std::cell::RefCell;
use std::rc::Rc;

const STORAGE_KEY_TOKEN: &str = "user_basic";

/// How long a toast stays on screen
pub const TOAST_MILLIS: u32 = 1500;

// ============= Token persistence =============

/// Where the identity token lives between page loads
pub trait TokenStore {
    fn load(&self) -> Option<Token>;
    fn save(&self, token: &Token) -> Result<()>;
    fn clear(&self);
}

/// `localStorage`-backed token store
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserTokenStore;

impl BrowserTokenStore {
    /// Private browsing modes can refuse `localStorage` outright.
    pub fn is_available() -> bool {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .is_some()
    }
}

impl TokenStore for BrowserTokenStore {
    fn load(&self) -> Option<Token> {
        BrowserStorage::get(STORAGE_KEY_TOKEN).ok()
    }

    fn save(&self, token: &Token) -> Result<()> {
        BrowserStorage::set(STORAGE_KEY_TOKEN, token).map_err(|e| ClientError::Storage(e.to_string()))
    }

    fn clear(&self) {
        BrowserStorage::delete(STORAGE_KEY_TOKEN);
    }
}

/// Token store that forgets everything on reload
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RefCell<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn with_token(token: Token) -> Self {
        Self {
            token: RefCell::new(Some(token)),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<Token> {
        self.token.borrow().clone()
    }

    fn save(&self, token: &Token) -> Result<()> {
        *self.token.borrow_mut() = Some(token.clone());
        Ok(())
    }

    fn clear(&self) {
        self.token.borrow_mut().take();
    }
}

// ============= Request ordering =============

/// Monotonic request counter; only the latest issued request may apply its response.
#[derive(Clone, Copy)]
pub struct RequestGeneration {
    latest: StoredValue<u64>,
}

impl RequestGeneration {
    pub fn new() -> Self {
        Self {
            latest: StoredValue::new(0),
        }
    }

    /// Issue a new generation, invalidating every earlier one.
    pub fn begin(&self) -> u64 {
        self.latest
            .try_update_value(|g| {
                *g += 1;
                *g
            })
            .unwrap_or_default()
    }

    /// False once a newer generation was issued or the owner is gone.
    pub fn is_current(&self, generation: u64) -> bool {
        self.latest.try_get_value() == Some(generation)
    }
}

impl Default for RequestGeneration {
    fn default() -> Self {
        Self::new()
    }
}

// ============= Session store =============

/// Result of a session refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refresh {
    /// The response replaced the session
    Applied,
    /// A newer refresh was issued while this one was in flight
    Stale,
}

/// Single source of truth for the signed-in user's data.
///
/// Components read snapshots; only `set_session`, `clear_session`,
/// `refresh` and `logout` write.
#[derive(Clone, Copy)]
pub struct SessionStore {
    session: RwSignal<Option<Session>>,
    loading: RwSignal<bool>,
    generation: RequestGeneration,
    tokens: StoredValue<Rc<dyn TokenStore>, LocalStorage>,
}

impl SessionStore {
    pub fn new(tokens: Rc<dyn TokenStore>) -> Self {
        Self {
            session: RwSignal::new(None),
            loading: RwSignal::new(false),
            generation: RequestGeneration::new(),
            tokens: StoredValue::new_local(tokens),
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.session.get()
    }

    pub fn session_untracked(&self) -> Option<Session> {
        self.session.get_untracked()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.session.with(|s| s.as_ref().map(|s| s.user.clone()))
    }

    /// User id without subscribing, falling back to the persisted token
    pub fn user_id_untracked(&self) -> Option<UserId> {
        self.session
            .with_untracked(|s| s.as_ref().map(|s| s.user.user_id))
            .or_else(|| self.token().map(|t| t.user_id))
    }

    pub fn chats(&self) -> Vec<Chat> {
        self.session.with(|s| s.as_ref().map(|s| s.chats.clone()).unwrap_or_default())
    }

    pub fn documents(&self) -> Vec<Document> {
        self.session
            .with(|s| s.as_ref().map(|s| s.documents.clone()).unwrap_or_default())
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    pub fn is_loading_untracked(&self) -> bool {
        self.loading.get_untracked()
    }

    pub fn set_session(&self, session: Session) {
        self.session.set(Some(session));
    }

    pub fn clear_session(&self) {
        self.session.set(None);
    }

    pub fn token(&self) -> Option<Token> {
        self.tokens.with_value(|t| t.load())
    }

    pub fn persist_token(&self, token: &Token) -> Result<()> {
        self.tokens.with_value(|t| t.save(token))
    }

    /// Forget the persisted token and the in-memory session.
    pub fn logout(&self) {
        self.generation.begin();
        self.tokens.with_value(|t| t.clear());
        self.loading.set(false);
        self.clear_session();
    }

    /// Replace the whole session with a fresh fetch.
    ///
    /// On failure the previous session stays and the error is only logged.
    pub async fn refresh(&self, backend: &dyn Backend, user_id: UserId) -> Result<Refresh> {
        let generation = self.generation.begin();
        self.loading.set(true);

        let result = backend.fetch_user(user_id).await.and_then(session_from_response);

        if !self.generation.is_current(generation) {
            tracing::debug!("Discarding stale session refresh (generation {})", generation);
            return Ok(Refresh::Stale);
        }
        self.loading.set(false);

        match result {
            Ok(session) => {
                tracing::info!(
                    "Session refreshed for user {}: {} chats, {} documents",
                    session.user.user_id,
                    session.chats.len(),
                    session.documents.len()
                );
                self.set_session(session);
                Ok(Refresh::Applied)
            }
            Err(e) => {
                tracing::error!("Failed to fetch user data: {}", e);
                Err(e)
            }
        }
    }

    /// Rebuild the session from the persisted token, if there is one.
    pub async fn restore(&self, backend: &dyn Backend) -> Option<Result<Refresh>> {
        let token = self.token()?;
        tracing::info!("Restoring session for user {}", token.user_id);
        Some(self.refresh(backend, token.user_id).await)
    }
}

fn session_from_response(resp: UserDataResponse) -> Result<Session> {
    if resp.status == Some(false) {
        return Err(ClientError::rejected(resp.message, "User not found"));
    }
    let user = resp
        .user
        .ok_or_else(|| ClientError::Decode("user data response has no user".to_string()))?;
    Ok(Session {
        user,
        chats: resp.chats,
        documents: resp.documents,
    })
}

// ============= Notifications =============

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: u64,
    pub kind: ToastKind,
    pub text: String,
}

/// Transient messages shown at the top of the screen
#[derive(Clone, Copy)]
pub struct Notifications {
    toasts: RwSignal<Vec<Toast>>,
    next_id: StoredValue<u64>,
}

impl Notifications {
    pub fn new() -> Self {
        Self {
            toasts: RwSignal::new(vec![]),
            next_id: StoredValue::new(0),
        }
    }

    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.get()
    }

    /// Add a toast without scheduling its removal.
    pub fn push(&self, kind: ToastKind, text: impl Into<String>) -> u64 {
        self.next_id.update_value(|id| *id += 1);
        let id = self.next_id.get_value();
        let text = text.into();
        self.toasts.update(|t| t.push(Toast { id, kind, text }));
        id
    }

    pub fn dismiss(&self, id: u64) {
        self.toasts.update(|t| t.retain(|toast| toast.id != id));
    }

    /// Show a toast that removes itself after [`TOAST_MILLIS`].
    pub fn notify(&self, kind: ToastKind, text: impl Into<String>) {
        let id = self.push(kind, text);
        let this = *self;
        gloo_timers::callback::Timeout::new(TOAST_MILLIS, move || this.dismiss(id)).forget();
    }

    pub fn success(&self, text: impl Into<String>) {
        self.notify(ToastKind::Success, text);
    }

    pub fn info(&self, text: impl Into<String>) {
        self.notify(ToastKind::Info, text);
    }

    pub fn error(&self, text: impl Into<String>) {
        self.notify(ToastKind::Error, text);
    }
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new()
    }
}

// ============= App state =============

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    backend: StoredValue<Rc<dyn Backend>, LocalStorage>,
    /// Signed-in user's data
    pub session: SessionStore,
    /// Toasts
    pub notifications: Notifications,
}

impl AppState {
    /// State wired to the real backend and browser storage
    pub fn new(config: ClientConfig) -> Self {
        let tokens: Rc<dyn TokenStore> = if BrowserTokenStore::is_available() {
            Rc::new(BrowserTokenStore)
        } else {
            tracing::warn!("localStorage unavailable; session will not survive a reload");
            Rc::new(MemoryTokenStore::default())
        };
        let backend = Rc::new(HttpBackend::new(&config));
        Self::with_parts(backend, tokens)
    }

    /// State over any backend and token store
    pub fn with_parts(backend: Rc<dyn Backend>, tokens: Rc<dyn TokenStore>) -> Self {
        Self {
            backend: StoredValue::new_local(backend),
            session: SessionStore::new(tokens),
            notifications: Notifications::new(),
        }
    }

    pub fn backend(&self) -> Rc<dyn Backend> {
        self.backend.get_value()
    }

    /// Reactive: re-evaluates whenever the session is set or cleared.
    pub fn is_authenticated(&self) -> bool {
        self.session.session.track();
        self.session.token().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserProfile;

    fn session(user_id: UserId, name: &str) -> Session {
        Session {
            user: UserProfile {
                user_id,
                full_name: name.to_string(),
                email: "x@y.z".to_string(),
                created_at: None,
            },
            chats: vec![],
            documents: vec![],
        }
    }

    #[test]
    fn generation_invalidates_older_requests() {
        let generation = RequestGeneration::new();
        let first = generation.begin();
        let second = generation.begin();
        assert!(!generation.is_current(first));
        assert!(generation.is_current(second));
    }

    #[test]
    fn memory_token_store_round_trip() {
        let store = MemoryTokenStore::default();
        assert!(store.load().is_none());
        let token = Token {
            user_id: 1,
            full_name: "A B".into(),
            email: "a@b.c".into(),
        };
        store.save(&token).unwrap();
        assert_eq!(store.load(), Some(token));
        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn set_and_clear_session() {
        let store = SessionStore::new(Rc::new(MemoryTokenStore::default()));
        assert!(store.session_untracked().is_none());
        store.set_session(session(4, "Grace"));
        assert_eq!(store.user_id_untracked(), Some(4));
        store.clear_session();
        assert!(store.session_untracked().is_none());
    }

    #[test]
    fn logout_clears_token_and_session() {
        let token = Token {
            user_id: 4,
            full_name: "Grace".into(),
            email: "g@h.i".into(),
        };
        let store = SessionStore::new(Rc::new(MemoryTokenStore::with_token(token)));
        store.set_session(session(4, "Grace"));
        store.logout();
        assert!(store.token().is_none());
        assert!(store.session_untracked().is_none());
        assert_eq!(store.user_id_untracked(), None);
    }

    #[test]
    fn rejected_user_data_is_an_error() {
        let resp = UserDataResponse {
            status: Some(false),
            message: Some("User not found".into()),
            ..Default::default()
        };
        assert_eq!(
            session_from_response(resp),
            Err(ClientError::Rejected("User not found".into()))
        );
    }

    #[test]
    fn app_state_is_authenticated_by_token() {
        let token = Token {
            user_id: 8,
            full_name: "Lin".into(),
            email: "l@m.n".into(),
        };
        let backend: Rc<dyn Backend> = Rc::new(HttpBackend::new(&ClientConfig::default()));
        let state = AppState::with_parts(backend, Rc::new(MemoryTokenStore::with_token(token)));
        assert!(state.is_authenticated());
        state.session.logout();
        assert!(!state.is_authenticated());
    }

    #[test]
    fn pushed_toasts_can_be_dismissed() {
        let notifications = Notifications::new();
        let first = notifications.push(ToastKind::Info, "one");
        let second = notifications.push(ToastKind::Error, "two");
        notifications.dismiss(first);
        let remaining = notifications.toasts.get_untracked();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second);
    }
}
