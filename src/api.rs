//! API client for communicating with the EduQuest backend

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::types::*;
use async_trait::async_trait;
use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Every backend route the client talks to, derived from the base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: String,
}

impl Endpoints {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            base: config.api_base.clone(),
        }
    }

    pub fn signup(&self) -> String {
        format!("{}/adduser", self.base)
    }

    pub fn login(&self) -> String {
        format!("{}/login", self.base)
    }

    pub fn user_full_data(&self, user_id: UserId) -> String {
        format!("{}/user_full_data/{}", self.base, user_id)
    }

    pub fn create_chat(&self) -> String {
        format!("{}/create_chat", self.base)
    }

    pub fn ask(&self) -> String {
        format!("{}/ask", self.base)
    }

    pub fn remove_chat_document(&self) -> String {
        format!("{}/remove_chat_document", self.base)
    }

    /// Search path; the keyword goes in the `q` query parameter.
    pub fn search_chats(&self, user_id: UserId) -> String {
        format!("{}/search_chats/{}", self.base, user_id)
    }

    pub fn upload_document(&self, user_id: UserId) -> String {
        format!("{}/upload_document?user_id={}", self.base, user_id)
    }

    pub fn process_document(&self, document_id: DocumentId) -> String {
        format!("{}/process_document/{}", self.base, document_id)
    }

    pub fn generate_quiz(&self) -> String {
        format!("{}/generate_quiz", self.base)
    }

    pub fn validate_quiz(&self) -> String {
        format!("{}/validate_quiz", self.base)
    }

    pub fn quiz_history(&self, user_id: UserId) -> String {
        format!("{}/quiz_history/{}", self.base, user_id)
    }
}

/// Remote collaborator holding all business logic.
///
/// Implemented over HTTP by [`HttpBackend`]; tests substitute a recording
/// double. Single-threaded WASM, so futures are not `Send`.
#[async_trait(?Send)]
pub trait Backend {
    async fn signup(&self, req: &SignupRequest) -> Result<SignupResponse>;

    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse>;

    async fn fetch_user(&self, user_id: UserId) -> Result<UserDataResponse>;

    async fn create_chat(&self, req: &CreateChatRequest) -> Result<CreateChatResponse>;

    async fn ask(&self, req: &AskRequest) -> Result<AskResponse>;

    /// Multipart upload of a single `file` field
    async fn upload_document(&self, user_id: UserId, upload: &Upload) -> Result<UploadResponse>;

    async fn process_document(&self, document_id: DocumentId) -> Result<StatusResponse>;

    async fn remove_chat_document(&self, req: &RemoveChatDocumentRequest) -> Result<StatusResponse>;

    async fn search_chats(&self, user_id: UserId, query: &str) -> Result<SearchResponse>;

    async fn generate_quiz(&self, req: &GenerateQuizRequest) -> Result<GenerateQuizResponse>;

    async fn validate_quiz(&self, req: &ValidateQuizRequest) -> Result<QuizResult>;

    async fn quiz_history(&self, user_id: UserId) -> Result<QuizHistoryResponse>;
}

/// `Backend` over `fetch`
#[derive(Debug, Clone)]
pub struct HttpBackend {
    endpoints: Endpoints,
}

impl HttpBackend {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            endpoints: Endpoints::new(config),
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }
}

/// Send a prepared GET request and decode the JSON body
async fn get_json<R: DeserializeOwned>(req: RequestBuilder) -> Result<R> {
    let resp = req
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    read_json(resp).await
}

/// POST a JSON body
async fn post_json<T, R>(url: &str, body: &T) -> Result<R>
where
    T: Serialize,
    R: DeserializeOwned,
{
    let req = Request::post(url)
        .header("Content-Type", "application/json")
        .json(body)
        .map_err(|e| ClientError::Decode(format!("Failed to serialize request: {}", e)))?;

    let resp = req
        .send()
        .await
        .map_err(|e| ClientError::Network(e.to_string()))?;
    read_json(resp).await
}

async fn read_json<R: DeserializeOwned>(resp: Response) -> Result<R> {
    if !resp.ok() {
        let status = resp.status();
        let message = match resp.json::<ApiError>().await {
            Ok(err) => err.text(),
            Err(_) => None,
        }
        .unwrap_or_else(|| resp.status_text());
        return Err(ClientError::Status { status, message });
    }

    resp.json::<R>()
        .await
        .map_err(|e| ClientError::Decode(e.to_string()))
}

fn form_data(upload: &Upload) -> Result<web_sys::FormData> {
    let js_err = |e: wasm_bindgen::JsValue| ClientError::Network(format!("{:?}", e));
    let form = web_sys::FormData::new().map_err(js_err)?;

    match &upload.source {
        UploadSource::File(file) => {
            form.append_with_blob_and_filename("file", file, &upload.filename)
                .map_err(js_err)?;
        }
        UploadSource::Bytes(bytes) => {
            let parts = js_sys::Array::new();
            parts.push(&js_sys::Uint8Array::from(bytes.as_slice()));
            let props = web_sys::BlobPropertyBag::new();
            props.set_type(&upload.mime);
            let blob = web_sys::Blob::new_with_u8_array_sequence_and_options(&parts, &props)
                .map_err(js_err)?;
            form.append_with_blob_and_filename("file", &blob, &upload.filename)
                .map_err(js_err)?;
        }
    }
    Ok(form)
}

#[async_trait(?Send)]
impl Backend for HttpBackend {
    async fn signup(&self, req: &SignupRequest) -> Result<SignupResponse> {
        post_json(&self.endpoints.signup(), req).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<LoginResponse> {
        post_json(&self.endpoints.login(), req).await
    }

    async fn fetch_user(&self, user_id: UserId) -> Result<UserDataResponse> {
        get_json(Request::get(&self.endpoints.user_full_data(user_id))).await
    }

    async fn create_chat(&self, req: &CreateChatRequest) -> Result<CreateChatResponse> {
        post_json(&self.endpoints.create_chat(), req).await
    }

    async fn ask(&self, req: &AskRequest) -> Result<AskResponse> {
        post_json(&self.endpoints.ask(), req).await
    }

    async fn upload_document(&self, user_id: UserId, upload: &Upload) -> Result<UploadResponse> {
        let form = form_data(upload)?;
        let req = Request::post(&self.endpoints.upload_document(user_id))
            .body(form)
            .map_err(|e| ClientError::Network(e.to_string()))?;
        let resp = req
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        read_json(resp).await
    }

    async fn process_document(&self, document_id: DocumentId) -> Result<StatusResponse> {
        let resp = Request::post(&self.endpoints.process_document(document_id))
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        read_json(resp).await
    }

    async fn remove_chat_document(&self, req: &RemoveChatDocumentRequest) -> Result<StatusResponse> {
        post_json(&self.endpoints.remove_chat_document(), req).await
    }

    async fn search_chats(&self, user_id: UserId, query: &str) -> Result<SearchResponse> {
        get_json(Request::get(&self.endpoints.search_chats(user_id)).query([("q", query)])).await
    }

    async fn generate_quiz(&self, req: &GenerateQuizRequest) -> Result<GenerateQuizResponse> {
        post_json(&self.endpoints.generate_quiz(), req).await
    }

    async fn validate_quiz(&self, req: &ValidateQuizRequest) -> Result<QuizResult> {
        post_json(&self.endpoints.validate_quiz(), req).await
    }

    async fn quiz_history(&self, user_id: UserId) -> Result<QuizHistoryResponse> {
        get_json(Request::get(&self.endpoints.quiz_history(user_id))).await
    }
}
