//! Reusable UI components

pub mod chat_view;
pub mod composer_bar;
pub mod header;
pub mod loading;
pub mod quiz_panel;
pub mod sidebar;
pub mod toast;
pub mod welcome;

pub use chat_view::ChatView;
pub use composer_bar::ComposerBar;
pub use header::Header;
pub use loading::LoadingSpinner;
pub use quiz_panel::QuizPanel;
pub use sidebar::Sidebar;
pub use toast::Toasts;
pub use welcome::Welcome;
