//! Mock implementations for testing.
//!
//! `RecordingBackend` answers every backend call from canned responses and
//! records the calls in order, so tests can assert both on what the client
//! did with a response and on what it sent (or did not send).

use async_trait::async_trait;
use eduquest_ui::api::Backend;
use eduquest_ui::error::{ClientError, Result};
use eduquest_ui::types::*;
use futures::channel::oneshot;
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};

/// One backend call, with the payload the client sent
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Signup(SignupRequest),
    Login(LoginRequest),
    FetchUser(UserId),
    CreateChat(CreateChatRequest),
    Ask(AskRequest),
    Upload { user_id: UserId, filename: String },
    Process(DocumentId),
    RemoveChatDocument(ChatId),
    Search { user_id: UserId, query: String },
    GenerateQuiz(GenerateQuizRequest),
    ValidateQuiz(ValidateQuizRequest),
    QuizHistory(UserId),
}

/// Endpoints that can be switched to a transport failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    Signup,
    Login,
    FetchUser,
    CreateChat,
    Ask,
    Upload,
    Process,
    RemoveChatDocument,
    Search,
    GenerateQuiz,
    ValidateQuiz,
    QuizHistory,
}

/// Reply resolved by the test through a oneshot channel
pub type Deferred<T> = oneshot::Sender<Result<T>>;

/// Backend double with configurable responses and a call log.
///
/// # Examples
///
/// ```ignore
/// let backend = RecordingBackend::new()
///     .with_login(login_ok(7, "Ada Lovelace"))
///     .with_user_data(user_data(7, "Ada Lovelace", vec![]));
///
/// // ... drive a flow ...
/// assert_eq!(backend.calls(), vec![Call::Login(..), Call::FetchUser(7)]);
/// ```
#[derive(Default)]
pub struct RecordingBackend {
    calls: RefCell<Vec<Call>>,
    failing: RefCell<HashSet<Endpoint>>,
    signup: SignupResponse,
    login: LoginResponse,
    user_data: UserDataResponse,
    deferred_user_data: RefCell<VecDeque<oneshot::Receiver<Result<UserDataResponse>>>>,
    create_chat: CreateChatResponse,
    ask: AskResponse,
    upload: UploadResponse,
    process: StatusResponse,
    remove: StatusResponse,
    search: SearchResponse,
    deferred_search: RefCell<VecDeque<oneshot::Receiver<Result<SearchResponse>>>>,
    generate: GenerateQuizResponse,
    validate: Option<QuizResult>,
    history: QuizHistoryResponse,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_signup(mut self, resp: SignupResponse) -> Self {
        self.signup = resp;
        self
    }

    pub fn with_login(mut self, resp: LoginResponse) -> Self {
        self.login = resp;
        self
    }

    pub fn with_user_data(mut self, resp: UserDataResponse) -> Self {
        self.user_data = resp;
        self
    }

    pub fn with_create_chat(mut self, resp: CreateChatResponse) -> Self {
        self.create_chat = resp;
        self
    }

    pub fn with_ask(mut self, resp: AskResponse) -> Self {
        self.ask = resp;
        self
    }

    pub fn with_upload(mut self, resp: UploadResponse) -> Self {
        self.upload = resp;
        self
    }

    pub fn with_process(mut self, resp: StatusResponse) -> Self {
        self.process = resp;
        self
    }

    pub fn with_remove(mut self, resp: StatusResponse) -> Self {
        self.remove = resp;
        self
    }

    pub fn with_search(mut self, resp: SearchResponse) -> Self {
        self.search = resp;
        self
    }

    pub fn with_generate(mut self, resp: GenerateQuizResponse) -> Self {
        self.generate = resp;
        self
    }

    pub fn with_validate(mut self, result: QuizResult) -> Self {
        self.validate = Some(result);
        self
    }

    pub fn with_history(mut self, resp: QuizHistoryResponse) -> Self {
        self.history = resp;
        self
    }

    /// Make an endpoint fail as if the network were down.
    pub fn failing(self, endpoint: Endpoint) -> Self {
        self.failing.borrow_mut().insert(endpoint);
        self
    }

    /// Queue a `fetch_user` reply the test resolves later.
    pub fn defer_user_data(&self) -> Deferred<UserDataResponse> {
        let (tx, rx) = oneshot::channel();
        self.deferred_user_data.borrow_mut().push_back(rx);
        tx
    }

    /// Queue a `search_chats` reply the test resolves later.
    pub fn defer_search(&self) -> Deferred<SearchResponse> {
        let (tx, rx) = oneshot::channel();
        self.deferred_search.borrow_mut().push_back(rx);
        tx
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }

    fn record(&self, call: Call, endpoint: Endpoint) -> Result<()> {
        self.calls.borrow_mut().push(call);
        if self.failing.borrow().contains(&endpoint) {
            return Err(ClientError::Network("mock network failure".to_string()));
        }
        Ok(())
    }
}

async fn resolve<T>(rx: oneshot::Receiver<Result<T>>) -> Result<T> {
    rx.await
        .unwrap_or_else(|_| Err(ClientError::Network("deferred reply dropped".to_string())))
}

#[async_trait(?Send)]
impl Backend for RecordingBackend {
    async fn signup(&self, req: &SignupRequest) -> Result<SignupResponse> {
        self.record(Call::Signup(req.clone()), Endpoint::Signup)?;
        Ok(self.signup.clone())
    }

    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        self.record(Call::Login(req.clone()), Endpoint::Login)?;
        Ok(self.login.clone())
    }

    async fn fetch_user(&self, user_id: UserId) -> Result<UserDataResponse> {
        self.record(Call::FetchUser(user_id), Endpoint::FetchUser)?;
        let deferred = self.deferred_user_data.borrow_mut().pop_front();
        match deferred {
            Some(rx) => resolve(rx).await,
            None => Ok(self.user_data.clone()),
        }
    }

    async fn create_chat(&self, req: &CreateChatRequest) -> Result<CreateChatResponse> {
        self.record(Call::CreateChat(req.clone()), Endpoint::CreateChat)?;
        Ok(self.create_chat.clone())
    }

    async fn ask(&self, req: &AskRequest) -> Result<AskResponse> {
        self.record(Call::Ask(req.clone()), Endpoint::Ask)?;
        Ok(self.ask.clone())
    }

    async fn upload_document(&self, user_id: UserId, upload: &Upload) -> Result<UploadResponse> {
        self.record(
            Call::Upload {
                user_id,
                filename: upload.filename.clone(),
            },
            Endpoint::Upload,
        )?;
        Ok(self.upload.clone())
    }

    async fn process_document(&self, document_id: DocumentId) -> Result<StatusResponse> {
        self.record(Call::Process(document_id), Endpoint::Process)?;
        Ok(self.process.clone())
    }

    async fn remove_chat_document(&self, req: &RemoveChatDocumentRequest) -> Result<StatusResponse> {
        self.record(Call::RemoveChatDocument(req.chat_id), Endpoint::RemoveChatDocument)?;
        Ok(self.remove.clone())
    }

    async fn search_chats(&self, user_id: UserId, query: &str) -> Result<SearchResponse> {
        self.record(
            Call::Search {
                user_id,
                query: query.to_string(),
            },
            Endpoint::Search,
        )?;
        let deferred = self.deferred_search.borrow_mut().pop_front();
        match deferred {
            Some(rx) => resolve(rx).await,
            None => Ok(self.search.clone()),
        }
    }

    async fn generate_quiz(&self, req: &GenerateQuizRequest) -> Result<GenerateQuizResponse> {
        self.record(Call::GenerateQuiz(req.clone()), Endpoint::GenerateQuiz)?;
        Ok(self.generate.clone())
    }

    async fn validate_quiz(&self, req: &ValidateQuizRequest) -> Result<QuizResult> {
        self.record(Call::ValidateQuiz(req.clone()), Endpoint::ValidateQuiz)?;
        self.validate
            .clone()
            .ok_or_else(|| ClientError::Decode("no canned quiz result".to_string()))
    }

    async fn quiz_history(&self, user_id: UserId) -> Result<QuizHistoryResponse> {
        self.record(Call::QuizHistory(user_id), Endpoint::QuizHistory)?;
        Ok(self.history.clone())
    }
}

// ============= Fixtures =============

pub fn login_ok(user_id: UserId, full_name: &str) -> LoginResponse {
    LoginResponse {
        status: true,
        user_id: Some(user_id),
        full_name: Some(full_name.to_string()),
        message: None,
    }
}

pub fn chat(chat_id: ChatId, title: &str, turns: &[(&str, &str)]) -> Chat {
    Chat {
        chat_id,
        title: title.to_string(),
        document_id: None,
        messages: turns
            .iter()
            .map(|(role, content)| ChatMessage {
                message_id: None,
                role: role.to_string(),
                content: content.to_string(),
                created_at: Some("2025-01-15T10:30:00".to_string()),
            })
            .collect(),
        created_at: None,
    }
}

pub fn user_data(user_id: UserId, full_name: &str, chats: Vec<Chat>) -> UserDataResponse {
    UserDataResponse {
        status: None,
        message: None,
        user: Some(UserProfile {
            user_id,
            full_name: full_name.to_string(),
            email: format!("user{}@example.com", user_id),
            created_at: None,
        }),
        chats,
        documents: vec![],
    }
}

pub fn created_chat(chat_id: ChatId) -> CreateChatResponse {
    CreateChatResponse {
        status: true,
        chat_id: Some(chat_id),
        title: None,
        message: None,
    }
}

pub fn answer(html: &str) -> AskResponse {
    AskResponse {
        status: Some(true),
        answer: Some(html.to_string()),
        message: None,
    }
}

pub fn ok_status() -> StatusResponse {
    StatusResponse {
        status: Some(true),
        message: None,
    }
}

pub fn rejected_status(message: &str) -> StatusResponse {
    StatusResponse {
        status: Some(false),
        message: Some(message.to_string()),
    }
}
