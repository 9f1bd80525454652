//! Integration test for the seller chat bridge over a live storefront.
//!
//! Uses scripted assistants to exercise the three reply paths (text, empty,
//! failure) and the stale-reply guard that protects a product view from
//! replies that outlive it.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use testresult::TestResult;

use feira::{
    chat::{
        AssistantError, ChatRole, ChatTurn, EMPTY_REPLY_FALLBACK, ReplyDisposition,
        SELLER_UNREACHABLE_FALLBACK, SellerAssistant,
    },
    fixtures::Fixture,
    products::ProductId,
};

/// Replies with a script, one entry per call, and counts invocations.
struct ScriptedAssistant {
    calls: AtomicUsize,
    script: Vec<Result<String, AssistantError>>,
}

impl ScriptedAssistant {
    fn new(script: Vec<Result<String, AssistantError>>) -> Self {
        ScriptedAssistant {
            calls: AtomicUsize::new(0),
            script,
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SellerAssistant for ScriptedAssistant {
    async fn converse(
        &self,
        _product_title: &str,
        _message: &str,
        _history: &[ChatTurn],
    ) -> Result<String, AssistantError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);

        match self.script.get(call) {
            Some(Ok(text)) => Ok(text.clone()),
            Some(Err(AssistantError::Unavailable(reason))) => {
                Err(AssistantError::Unavailable(reason.clone()))
            }
            None => Ok("Sem roteiro.".to_string()),
        }
    }
}

#[tokio::test]
async fn conversation_accumulates_turns_in_order() -> TestResult {
    let mut store = Fixture::new().storefront("default")?;
    let assistant = ScriptedAssistant::new(vec![
        Ok("Sim, está disponível.".to_string()),
        Ok("Aceito pix e cartão.".to_string()),
    ]);

    store.open_product(&ProductId::from_raw("seed-07"))?;

    store.ask_seller(&assistant, "Ainda está disponível?").await?;
    store.ask_seller(&assistant, "Quais formas de pagamento?").await?;

    let chat = store.chat().expect("expected an open chat");
    let roles: Vec<ChatRole> = chat.transcript().iter().map(ChatTurn::role).collect();

    assert_eq!(
        roles,
        [
            ChatRole::User,
            ChatRole::Model,
            ChatRole::User,
            ChatRole::Model
        ]
    );
    assert_eq!(
        chat.transcript().last().map(ChatTurn::text),
        Some("Aceito pix e cartão.")
    );
    assert_eq!(assistant.calls(), 2);
    assert!(!chat.is_awaiting_reply());

    Ok(())
}

#[tokio::test]
async fn failure_then_empty_reply_use_distinct_fallbacks() -> TestResult {
    let mut store = Fixture::new().storefront("default")?;
    let assistant = ScriptedAssistant::new(vec![
        Err(AssistantError::Unavailable("connection refused".to_string())),
        Ok(String::new()),
    ]);

    store.open_product(&ProductId::from_raw("seed-01"))?;

    store.ask_seller(&assistant, "Tem garantia?").await?;
    store.ask_seller(&assistant, "E nota fiscal?").await?;

    let chat = store.chat().expect("expected an open chat");
    let model_texts: Vec<&str> = chat
        .transcript()
        .iter()
        .filter(|turn| turn.role() == ChatRole::Model)
        .map(ChatTurn::text)
        .collect();

    assert_eq!(
        model_texts,
        [SELLER_UNREACHABLE_FALLBACK, EMPTY_REPLY_FALLBACK]
    );

    Ok(())
}

#[tokio::test]
async fn reply_for_a_left_view_is_discarded() -> TestResult {
    let mut store = Fixture::new().storefront("default")?;

    store.open_product(&ProductId::from_raw("seed-01"))?;

    let prompt = store.compose_question("Ainda tem?")?;

    // The shopper wanders off to another product before the reply lands.
    store.open_product(&ProductId::from_raw("seed-02"))?;

    let disposition = store.apply_seller_reply(&prompt, Ok("Tenho sim!".to_string()));

    assert_eq!(disposition, ReplyDisposition::Stale);

    let chat = store.chat().expect("expected the new product's chat");

    assert!(chat.transcript().is_empty());
    assert!(!chat.is_awaiting_reply());

    // And a reply landing after leaving product views entirely is discarded
    // too.
    let prompt = store.compose_question("Qual o prazo?")?;

    store.search("cafeteira");

    let disposition = store.apply_seller_reply(&prompt, Ok("Dois dias.".to_string()));

    assert_eq!(disposition, ReplyDisposition::Stale);
    assert!(store.chat().is_none());

    Ok(())
}

#[tokio::test]
async fn history_sent_to_the_assistant_grows_with_the_transcript() -> TestResult {
    /// Records the history length of each call.
    struct HistoryProbe {
        lengths: std::sync::Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl SellerAssistant for HistoryProbe {
        async fn converse(
            &self,
            _product_title: &str,
            _message: &str,
            history: &[ChatTurn],
        ) -> Result<String, AssistantError> {
            if let Ok(mut lengths) = self.lengths.lock() {
                lengths.push(history.len());
            }

            Ok("Certo.".to_string())
        }
    }

    let probe = HistoryProbe {
        lengths: std::sync::Mutex::new(Vec::new()),
    };

    let mut store = Fixture::new().storefront("default")?;

    store.open_product(&ProductId::from_raw("seed-05"))?;

    store.ask_seller(&probe, "Primeira").await?;
    store.ask_seller(&probe, "Segunda").await?;
    store.ask_seller(&probe, "Terceira").await?;

    let lengths = probe.lengths.lock().expect("poisoned lock");

    // Each prompt carries the turns exchanged before it: 0, then 2, then 4.
    assert_eq!(*lengths, [0, 2, 4]);

    Ok(())
}
