//! Composer flows: document attachment, asking questions, removing documents

use crate::api::Backend;
use crate::error::{ClientError, Result};
use crate::types::{
    AskRequest, ChatId, CreateChatRequest, DocumentId, RemoveChatDocumentRequest, Upload, UserId,
};

/// MIME types the upload dialog accepts
pub const ALLOWED_MIME_TYPES: [&str; 5] = [
    "application/pdf",
    "text/plain",
    "image/png",
    "image/jpeg",
    "image/jpg",
];

/// `accept` attribute for the hidden file input
pub const FILE_INPUT_ACCEPT: &str = ".pdf, .txt, .png, .jpg, .jpeg";

/// Title given to chats started by a free-text question
pub const GENERAL_CHAT_TITLE: &str = "New Chat";

pub const DOCUMENT_REMOVED_MESSAGE: &str = "Chat deleted because document removed";

/// Reject anything outside the allow-list before it reaches the network.
pub fn validate_attachment(upload: Upload) -> Result<Upload> {
    if ALLOWED_MIME_TYPES.contains(&upload.mime.as_str()) {
        Ok(upload)
    } else {
        tracing::warn!("Rejected attachment {} ({})", upload.filename, upload.mime);
        Err(ClientError::UnsupportedFile { mime: upload.mime })
    }
}

/// Document shown as a badge above the composer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachedDocument {
    pub chat_id: ChatId,
    pub document_id: DocumentId,
    pub filename: String,
}

/// Upload, process, and open a chat bound to the new document.
///
/// Stops at the first failing step. Earlier steps are not rolled back.
pub async fn attach_document(
    backend: &dyn Backend,
    user_id: UserId,
    upload: &Upload,
) -> Result<AttachedDocument> {
    let uploaded = backend.upload_document(user_id, upload).await?;
    let document_id = match (uploaded.status, uploaded.document_id) {
        (true, Some(id)) => id,
        _ => return Err(ClientError::rejected(uploaded.message, "Upload failed")),
    };
    tracing::info!("Uploaded {} as document {}", upload.filename, document_id);

    let processed = backend.process_document(document_id).await?;
    if processed.is_rejected() {
        return Err(ClientError::rejected(processed.message, "Processing failed"));
    }
    tracing::info!("Processed document {}", document_id);

    let created = backend
        .create_chat(&CreateChatRequest {
            user_id,
            document_id: Some(document_id),
            title: None,
        })
        .await?;
    let chat_id = match (created.status, created.chat_id) {
        (true, Some(id)) => id,
        _ => return Err(ClientError::rejected(created.message, "Chat creation failed")),
    };

    Ok(AttachedDocument {
        chat_id,
        document_id,
        filename: upload.filename.clone(),
    })
}

/// One completed question/answer exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    /// Chat the question was asked in; new when none was active
    pub chat_id: ChatId,
    pub created_chat: bool,
    pub question: String,
    /// Backend HTML
    pub answer: String,
}

/// Ask a question, creating a general chat first if none is active.
///
/// Returns `Ok(None)` for a blank question; nothing is sent. A newly created
/// chat is reported through `on_chat_created` before the question goes out,
/// so it stays active even if asking fails.
pub async fn ask(
    backend: &dyn Backend,
    user_id: UserId,
    active_chat: Option<ChatId>,
    question: &str,
    on_chat_created: impl FnOnce(ChatId),
) -> Result<Option<Turn>> {
    if question.trim().is_empty() {
        return Ok(None);
    }

    let (chat_id, created_chat) = match active_chat {
        Some(id) => (id, false),
        None => {
            let created = backend
                .create_chat(&CreateChatRequest {
                    user_id,
                    document_id: None,
                    title: Some(GENERAL_CHAT_TITLE.to_string()),
                })
                .await?;
            let id = match created.chat_id {
                Some(id) if created.status => id,
                _ => return Err(ClientError::rejected(created.message, "Chat creation failed")),
            };
            tracing::info!("Created general chat {}", id);
            on_chat_created(id);
            (id, true)
        }
    };

    let resp = backend
        .ask(&AskRequest {
            chat_id,
            user_id,
            question: question.to_string(),
        })
        .await?;
    if resp.status == Some(false) {
        return Err(ClientError::rejected(resp.message, "No answer received"));
    }

    Ok(Some(Turn {
        chat_id,
        created_chat,
        question: question.to_string(),
        answer: resp.answer.unwrap_or_default(),
    }))
}

/// What removing the attached document did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// No open chat owns the document; only the badge goes away
    BadgeCleared,
    /// The backend deleted the chat bound to the document
    ChatDeleted(ChatId),
}

/// Remove the badge's document. `document_chat` is the open chat bound to it;
/// without one only the badge is cleared.
pub async fn remove_document(backend: &dyn Backend, document_chat: Option<ChatId>) -> Result<Removal> {
    let Some(chat_id) = document_chat else {
        return Ok(Removal::BadgeCleared);
    };

    let resp = backend
        .remove_chat_document(&RemoveChatDocumentRequest { chat_id })
        .await?;
    if resp.is_rejected() {
        return Err(ClientError::rejected(resp.message, "Could not remove document"));
    }
    tracing::info!("Removed document chat {}", chat_id);
    Ok(Removal::ChatDeleted(chat_id))
}

// ============= Placeholder animation =============

pub const PLACEHOLDER_TEXT: &str = "Ask the Assistant...";
pub const PLACEHOLDER_TICK_MILLIS: u32 = 120;
pub const PLACEHOLDER_PAUSE_MILLIS: u32 = 2000;

/// Typewriter effect for the composer placeholder.
///
/// Each tick reveals one more character; once the text is complete the
/// typer holds it for the pause and then starts over.
#[derive(Debug, Clone)]
pub struct PlaceholderTyper {
    chars: Vec<char>,
    shown: usize,
    paused_ticks: u32,
}

impl PlaceholderTyper {
    pub fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            shown: 0,
            paused_ticks: 0,
        }
    }

    fn pause_ticks() -> u32 {
        PLACEHOLDER_PAUSE_MILLIS / PLACEHOLDER_TICK_MILLIS
    }

    /// Advance one tick and return the text to display.
    pub fn tick(&mut self) -> String {
        if self.shown < self.chars.len() {
            self.shown += 1;
        } else if self.paused_ticks < Self::pause_ticks() {
            self.paused_ticks += 1;
        } else {
            self.shown = 0;
            self.paused_ticks = 0;
        }
        self.current()
    }

    pub fn current(&self) -> String {
        self.chars[..self.shown].iter().collect()
    }
}

impl Default for PlaceholderTyper {
    fn default() -> Self {
        Self::new(PLACEHOLDER_TEXT)
    }
}
