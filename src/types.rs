//! API types matching the EduQuest backend, plus the view models built from them

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub type UserId = i64;
pub type ChatId = i64;
pub type DocumentId = i64;
pub type QuizId = i64;

// ============= Authentication =============

/// Signup request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// Signup response; success is signalled by the message text alone
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<UserId>,
}

/// Login request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Minimal identity persisted in the browser so a reload can restore the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
}

// ============= Session data =============

/// User profile as returned by `/user_full_data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: UserId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Backend message inside a chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    #[serde(default)]
    pub message_id: Option<i64>,
    pub role: String,
    pub content: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Persisted conversation, optionally bound to one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub chat_id: ChatId,
    pub title: String,
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Uploaded document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub document_id: DocumentId,
    pub filename: String,
    #[serde(default)]
    pub uploaded_at: Option<String>,
    #[serde(default)]
    pub num_chunks: Option<i64>,
}

/// Consolidated client-side view of the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub user: UserProfile,
    #[serde(default)]
    pub chats: Vec<Chat>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Session {
    pub fn chat(&self, chat_id: ChatId) -> Option<&Chat> {
        self.chats.iter().find(|c| c.chat_id == chat_id)
    }
}

/// Raw `/user_full_data` payload; an unknown user comes back as `status: false`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserDataResponse {
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user: Option<UserProfile>,
    #[serde(default)]
    pub chats: Vec<Chat>,
    #[serde(default)]
    pub documents: Vec<Document>,
}

// ============= Chats =============

/// Create chat request. `document_id` is sent as `null` for general chats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateChatRequest {
    pub user_id: UserId,
    pub document_id: Option<DocumentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Create chat response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateChatResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub chat_id: Option<ChatId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Ask request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AskRequest {
    pub chat_id: ChatId,
    pub user_id: UserId,
    pub question: String,
}

/// Ask response. The answer is HTML produced by the backend.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskResponse {
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Remove the document bound to a chat (deletes the chat)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RemoveChatDocumentRequest {
    pub chat_id: ChatId,
}

/// Generic `{status, message}` acknowledgement
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusResponse {
    #[serde(default)]
    pub status: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
}

impl StatusResponse {
    /// Only an explicit `status: false` counts as a rejection.
    pub fn is_rejected(&self) -> bool {
        self.status == Some(false)
    }
}

/// Chat search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub chat_id: ChatId,
    pub title: String,
}

/// Chat search response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub results: Vec<SearchHit>,
}

// ============= Documents =============

/// Upload response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Bytes behind an upload
#[derive(Debug, Clone)]
pub enum UploadSource {
    /// File picked in the browser (input or drag-and-drop)
    File(web_sys::File),
    /// In-memory content
    Bytes(Vec<u8>),
}

/// A file chosen for upload, already checked against the allow-list
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: String,
    pub mime: String,
    pub source: UploadSource,
}

impl Upload {
    pub fn from_file(file: web_sys::File) -> Self {
        Self {
            filename: file.name(),
            mime: file.type_(),
            source: UploadSource::File(file),
        }
    }

    pub fn from_bytes(filename: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            mime: mime.into(),
            source: UploadSource::Bytes(bytes),
        }
    }
}

// ============= Quiz =============

/// Answer option letter; maps positionally onto a question's `options`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionLetter {
    A,
    B,
    C,
    D,
}

impl OptionLetter {
    pub const ALL: [OptionLetter; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "A" | "a" => Some(Self::A),
            "B" | "b" => Some(Self::B),
            "C" | "c" => Some(Self::C),
            "D" | "d" => Some(Self::D),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        }
    }
}

impl fmt::Display for OptionLetter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Multiple-choice question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: Vec<String>,
}

impl QuizQuestion {
    /// Text of the option a letter points at, if the question has it.
    pub fn option_text(&self, letter: OptionLetter) -> Option<&str> {
        self.options.get(letter.index()).map(String::as_str)
    }
}

/// Generated quiz held by the quiz view
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    pub quiz_id: QuizId,
    pub questions: Vec<QuizQuestion>,
}

/// Generate quiz request
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerateQuizRequest {
    pub user_id: UserId,
    pub document_id: DocumentId,
    pub num_questions: u32,
}

/// Generate quiz response. `quiz` stays untyped so a malformed question
/// list can be reported instead of failing the whole decode.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerateQuizResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub quiz_id: Option<QuizId>,
    #[serde(default)]
    pub quiz: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Answers keyed by 1-based question number; unanswered questions are absent
pub type Answers = BTreeMap<u32, OptionLetter>;

/// Validate quiz request. Keys serialize as strings: `{"1": "A"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidateQuizRequest {
    pub quiz_id: QuizId,
    pub user_id: UserId,
    pub answers: Answers,
}

/// Per-question grading detail
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizDetail {
    #[serde(default)]
    pub question_no: Option<u32>,
    pub question: String,
    #[serde(default)]
    pub your_answer: Option<String>,
    pub correct_answer: String,
}

/// Graded quiz, rendered exactly as returned
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizResult {
    pub score: u32,
    pub total: u32,
    #[serde(default)]
    pub details: Vec<QuizDetail>,
}

/// One past quiz with its latest attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizAttemptSummary {
    pub quiz_id: QuizId,
    #[serde(default)]
    pub document_id: Option<DocumentId>,
    #[serde(default)]
    pub num_questions: Option<u32>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_score: Option<u32>,
    #[serde(default)]
    pub total_questions: Option<u32>,
    #[serde(default)]
    pub attempted_at: Option<String>,
}

/// Quiz history response
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuizHistoryResponse {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub history: Vec<QuizAttemptSummary>,
}

/// Error body from the API (`message` from handlers, `detail` from HTTP exceptions)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiError {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ApiError {
    pub fn text(self) -> Option<String> {
        self.message.or(self.detail)
    }
}

// ============= View models =============

/// Who a transcript entry came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    /// Backend role `"user"` is the user; every other role renders as the assistant.
    pub fn from_role(role: &str) -> Self {
        if role == "user" {
            Sender::User
        } else {
            Sender::Ai
        }
    }
}

/// Transcript entry
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    /// Stable key for list rendering
    pub id: String,
    pub sender: Sender,
    /// Plain text for the user, backend HTML for the assistant
    pub text: String,
    pub timestamp: Option<chrono::NaiveDateTime>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Sender::User, text, Some(chrono::Local::now().naive_local()))
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(Sender::Ai, text, Some(chrono::Local::now().naive_local()))
    }

    pub fn from_backend(msg: &ChatMessage) -> Self {
        let timestamp = msg
            .created_at
            .as_deref()
            .and_then(|s| s.parse::<chrono::NaiveDateTime>().ok());
        Self::new(Sender::from_role(&msg.role), msg.content.clone(), timestamp)
    }

    fn new(sender: Sender, text: impl Into<String>, timestamp: Option<chrono::NaiveDateTime>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp,
        }
    }
}
