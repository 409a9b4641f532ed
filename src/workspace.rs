//! Workspace shell state: mode, visible view, and the active transcript

use crate::composer::{AttachedDocument, Turn};
use crate::types::{Chat, ChatId, Message, Sender};

/// Delay between starting to send and showing the new turn, so the welcome
/// screen can animate out
pub const SEND_EXIT_MILLIS: u32 = 700;

/// Sub-view selected by the `mode` query parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Chat,
    Quiz,
}

impl Mode {
    /// Anything other than `quiz` means chat.
    pub fn from_query(mode: Option<&str>) -> Self {
        match mode {
            Some("quiz") => Mode::Quiz,
            _ => Mode::Chat,
        }
    }

    pub fn href(self) -> &'static str {
        match self {
            Mode::Chat => "/holder",
            Mode::Quiz => "/holder?mode=quiz",
        }
    }
}

/// What the main pane shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkspaceView {
    /// Greeting; `exiting` while the send animation plays
    Welcome { exiting: bool },
    Conversation,
    Quiz,
}

impl Default for WorkspaceView {
    fn default() -> Self {
        WorkspaceView::Welcome { exiting: false }
    }
}

impl WorkspaceView {
    /// Follow a mode change. Entering quiz mode skips the greeting; returning
    /// to chat keeps whatever conversation was open.
    pub fn on_mode(self, mode: Mode) -> Self {
        match (mode, self) {
            (Mode::Quiz, _) => WorkspaceView::Quiz,
            (Mode::Chat, WorkspaceView::Quiz) => WorkspaceView::Conversation,
            (Mode::Chat, view) => view,
        }
    }

    pub fn select_chat(self) -> Self {
        WorkspaceView::Conversation
    }

    /// Start the exit animation; only meaningful from the greeting.
    pub fn begin_send(self) -> Self {
        match self {
            WorkspaceView::Welcome { .. } => WorkspaceView::Welcome { exiting: true },
            view => view,
        }
    }

    pub fn finish_send(self) -> Self {
        WorkspaceView::Conversation
    }

    pub fn reset() -> Self {
        WorkspaceView::default()
    }

    pub fn shows_welcome(self) -> bool {
        matches!(self, WorkspaceView::Welcome { .. })
    }
}

/// Ordered user/assistant turns for the active chat
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    pub chat_id: Option<ChatId>,
    pub messages: Vec<Message>,
}

impl Transcript {
    /// Rebuild from a stored chat, one entry per backend message.
    pub fn from_chat(chat: &Chat) -> Self {
        Self {
            chat_id: Some(chat.chat_id),
            messages: chat.messages.iter().map(Message::from_backend).collect(),
        }
    }

    /// Append a user turn immediately followed by the assistant's reply.
    pub fn push_turn(&mut self, question: impl Into<String>, answer: impl Into<String>) {
        self.messages.push(Message::user(question));
        self.messages.push(Message::ai(answer));
    }

    pub fn clear(&mut self) {
        self.chat_id = None;
        self.messages.clear();
    }

    /// A horizontal rule goes before every user turn except the first entry.
    pub fn separator_before(&self, index: usize) -> bool {
        index > 0
            && self
                .messages
                .get(index)
                .is_some_and(|m| m.sender == Sender::User)
    }
}

/// Identifies the conversation a send started in. Switching, resetting, or
/// attaching starts a new conversation and invalidates older tickets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendTicket(u64);

/// Everything the workspace shell shows for the chat side: the view, the
/// active chat and its transcript, the document badge, and turns waiting
/// for the exit animation to finish.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Shell {
    pub view: WorkspaceView,
    pub transcript: Transcript,
    pub active_chat: Option<ChatId>,
    /// Shown only while its chat is the active one
    pub badge: Option<AttachedDocument>,
    conversation: u64,
    pending: Vec<Turn>,
}

impl Shell {
    pub fn ticket(&self) -> SendTicket {
        SendTicket(self.conversation)
    }

    pub fn is_current(&self, ticket: SendTicket) -> bool {
        ticket.0 == self.conversation
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn on_mode(&mut self, mode: Mode) {
        self.view = self.view.on_mode(mode);
    }

    /// A send created a general chat before asking. Returns false if the
    /// user has moved on since.
    pub fn chat_created(&mut self, ticket: SendTicket, chat_id: ChatId) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("Chat {} created for a conversation that is gone", chat_id);
            return false;
        }
        self.active_chat = Some(chat_id);
        true
    }

    /// Queue an answered turn behind the exit animation.
    ///
    /// A turn from an abandoned conversation is dropped and leaves the active
    /// chat alone; the backend already has it. Turns still waiting from an
    /// earlier send are applied first so the order holds.
    pub fn receive_turn(&mut self, ticket: SendTicket, turn: Turn) -> bool {
        if !self.is_current(ticket) {
            tracing::debug!("Dropping answer for chat {}; conversation changed", turn.chat_id);
            return false;
        }
        self.apply_pending();
        self.active_chat = Some(turn.chat_id);
        self.badge = None;
        self.pending.push(turn);
        self.view = self.view.begin_send();
        true
    }

    /// End of the exit animation: show the queued turns.
    pub fn apply_pending(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        self.view = self.view.finish_send();
        for turn in std::mem::take(&mut self.pending) {
            self.transcript.chat_id = Some(turn.chat_id);
            self.transcript.push_turn(turn.question, turn.answer);
        }
    }

    /// Open a chat from history, replacing the transcript wholesale.
    pub fn select_chat(&mut self, transcript: Transcript) {
        self.start_conversation();
        if self.badge.as_ref().map(|b| b.chat_id) != transcript.chat_id {
            self.badge = None;
        }
        self.active_chat = transcript.chat_id;
        self.transcript = transcript;
        self.view = self.view.select_chat();
    }

    /// A freshly attached document gets its own, still empty, conversation.
    pub fn attached(&mut self, doc: AttachedDocument) {
        self.start_conversation();
        self.active_chat = Some(doc.chat_id);
        self.transcript = Transcript {
            chat_id: Some(doc.chat_id),
            messages: vec![],
        };
        self.badge = Some(doc);
    }

    /// Chat the badge's ✕ would delete: the badge's own chat, and only while
    /// it is the active one.
    pub fn document_chat(&self) -> Option<ChatId> {
        self.badge
            .as_ref()
            .map(|b| b.chat_id)
            .filter(|chat_id| self.active_chat == Some(*chat_id))
    }

    pub fn clear_badge(&mut self) {
        self.badge = None;
    }

    /// The backend deleted `chat_id` with its document. Back to the greeting
    /// if that chat is still open.
    pub fn document_removed(&mut self, chat_id: ChatId) {
        if self.active_chat == Some(chat_id) {
            self.reset();
        } else if self.badge.as_ref().is_some_and(|b| b.chat_id == chat_id) {
            self.badge = None;
        }
    }

    /// New chat: greeting, nothing active.
    pub fn reset(&mut self) {
        self.start_conversation();
        self.view = WorkspaceView::reset();
        self.transcript = Transcript::default();
        self.active_chat = None;
        self.badge = None;
    }

    fn start_conversation(&mut self) {
        self.conversation += 1;
        self.pending.clear();
    }
}
