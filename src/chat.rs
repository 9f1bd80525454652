//! Seller chat
//!
//! The per-product conversation with the AI seller assistant. Each product
//! view gets its own [`SellerChat`] with a fresh generation token; replies
//! that outlive their view resolve as stale and are discarded, so a slow
//! assistant can never write into another view's transcript.

use async_trait::async_trait;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::warn;

use crate::products::{Product, ProductId};

/// Transcript entry shown when the assistant answered with an empty reply.
pub const EMPTY_REPLY_FALLBACK: &str = "Desculpe, não consegui processar sua dúvida.";

/// Transcript entry shown when the assistant call failed outright.
pub const SELLER_UNREACHABLE_FALLBACK: &str = "Erro ao conectar com o vendedor.";

/// Failure reported by the external assistant service.
#[derive(Debug, Error)]
pub enum AssistantError {
    /// The assistant could not be reached or returned an error.
    #[error("assistant unavailable: {0}")]
    Unavailable(String),
}

/// The external generative-assistant service.
///
/// The contract is a single logical call: product context, a user utterance
/// and the ordered prior turns go in; assistant text or an explicit failure
/// comes out. No latency guarantee is made and the core imposes no timeout.
#[async_trait]
pub trait SellerAssistant {
    /// Produce the seller's reply to `message` about `product_title`.
    ///
    /// # Errors
    ///
    /// Returns an [`AssistantError`] when the service cannot produce a reply.
    async fn converse(
        &self,
        product_title: &str,
        message: &str,
        history: &[ChatTurn],
    ) -> Result<String, AssistantError>;
}

/// Who produced a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    /// The shopper.
    User,

    /// The assistant playing the seller.
    Model,
}

/// One transcript entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    role: ChatRole,
    text: String,
}

impl ChatTurn {
    /// A shopper turn.
    pub fn user(text: impl Into<String>) -> Self {
        ChatTurn {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    /// An assistant turn.
    pub fn model(text: impl Into<String>) -> Self {
        ChatTurn {
            role: ChatRole::Model,
            text: text.into(),
        }
    }

    /// Who produced the turn.
    pub fn role(&self) -> ChatRole {
        self.role
    }

    /// The turn's text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Whether the chat is waiting on the assistant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatState {
    /// Ready for the next question.
    Idle,

    /// A question is out; input is disabled until the reply resolves.
    AwaitingReply,
}

/// Errors related to submitting a chat message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChatError {
    /// No product conversation is open.
    #[error("no product conversation is open")]
    NoActiveChat,

    /// Blank messages are not sent.
    #[error("message is blank")]
    BlankMessage,

    /// A reply is already pending for this conversation.
    #[error("a seller reply is already pending")]
    ReplyPending,
}

/// What happened to a resolved reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyDisposition {
    /// The reply was appended to the transcript.
    Applied,

    /// The reply belonged to a conversation that is no longer current and
    /// was discarded.
    Stale,
}

/// Everything the assistant call needs, captured at submission time.
///
/// The generation token ties the prompt to the conversation it came from;
/// [`SellerChat::resolve`] discards replies whose generation no longer
/// matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    product_title: String,
    message: String,
    history: Vec<ChatTurn>,
    generation: u64,
}

impl ChatPrompt {
    /// Title of the product under discussion.
    pub fn product_title(&self) -> &str {
        &self.product_title
    }

    /// The submitted question.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Turns exchanged before this question, oldest first.
    pub fn history(&self) -> &[ChatTurn] {
        &self.history
    }

    /// The conversation this prompt belongs to.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// A per-product-view conversation: `Idle → AwaitingReply → Idle`, with the
/// transcript accumulating turns.
#[derive(Debug)]
pub struct SellerChat {
    product: ProductId,
    product_title: String,
    transcript: SmallVec<[ChatTurn; 8]>,
    state: ChatState,
    generation: u64,
}

impl SellerChat {
    /// Open a fresh conversation about a product.
    pub fn open(product: &Product, generation: u64) -> Self {
        SellerChat {
            product: product.id.clone(),
            product_title: product.title.clone(),
            transcript: SmallVec::new(),
            state: ChatState::Idle,
            generation,
        }
    }

    /// The product under discussion.
    pub fn product_id(&self) -> &ProductId {
        &self.product
    }

    /// Title of the product under discussion.
    pub fn product_title(&self) -> &str {
        &self.product_title
    }

    /// The transcript so far, oldest first.
    pub fn transcript(&self) -> &[ChatTurn] {
        &self.transcript
    }

    /// Whether the chat is idle or waiting on the assistant.
    pub fn state(&self) -> ChatState {
        self.state
    }

    /// Whether a reply is pending.
    pub fn is_awaiting_reply(&self) -> bool {
        self.state == ChatState::AwaitingReply
    }

    /// The generation token of this conversation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Submit a question: append the user turn optimistically, enter
    /// `AwaitingReply` and return the prompt for the assistant call. The
    /// prompt's history is the transcript as it stood before this question.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::BlankMessage`] for whitespace-only input and
    /// [`ChatError::ReplyPending`] while an earlier question is unresolved.
    pub fn compose(&mut self, message: &str) -> Result<ChatPrompt, ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::BlankMessage);
        }

        if self.state == ChatState::AwaitingReply {
            return Err(ChatError::ReplyPending);
        }

        let prompt = ChatPrompt {
            product_title: self.product_title.clone(),
            message: message.to_string(),
            history: self.transcript.to_vec(),
            generation: self.generation,
        };

        self.transcript.push(ChatTurn::user(message));
        self.state = ChatState::AwaitingReply;

        Ok(prompt)
    }

    /// Apply the outcome of the assistant call for `prompt`.
    ///
    /// A successful reply is appended as a model turn, with the fixed
    /// empty-reply fallback standing in for blank text. A failed call appends
    /// the fixed seller-unreachable fallback. Either way the chat returns to
    /// idle. A prompt from another conversation, or one that was already
    /// resolved, is discarded as [`ReplyDisposition::Stale`].
    pub fn resolve(
        &mut self,
        prompt: &ChatPrompt,
        outcome: Result<String, AssistantError>,
    ) -> ReplyDisposition {
        if prompt.generation != self.generation || self.state != ChatState::AwaitingReply {
            return ReplyDisposition::Stale;
        }

        let text = match outcome {
            Ok(reply) if reply.trim().is_empty() => EMPTY_REPLY_FALLBACK.to_string(),
            Ok(reply) => reply,
            Err(error) => {
                warn!(product_id = %self.product, %error, "seller assistant call failed");
                SELLER_UNREACHABLE_FALLBACK.to_string()
            }
        };

        self.transcript.push(ChatTurn::model(text));
        self.state = ChatState::Idle;

        ReplyDisposition::Applied
    }

    /// Submit a question and drive the assistant call to completion.
    ///
    /// # Errors
    ///
    /// Returns a [`ChatError`] if the message cannot be submitted; assistant
    /// failures are absorbed into the transcript, never returned.
    pub async fn send<A>(
        &mut self,
        assistant: &A,
        message: &str,
    ) -> Result<ReplyDisposition, ChatError>
    where
        A: SellerAssistant + ?Sized,
    {
        let prompt = self.compose(message)?;

        let outcome = assistant
            .converse(&prompt.product_title, &prompt.message, &prompt.history)
            .await;

        Ok(self.resolve(&prompt, outcome))
    }
}
