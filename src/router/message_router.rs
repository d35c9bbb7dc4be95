// Message router: picks a canned reply or delegates to the completion API

use thiserror::Error;

use super::{RouteDecision, Router};
use crate::conversation::ConversationHistory;
use crate::delegate::DelegateStatus;

pub const UNAVAILABLE_MESSAGE: &str =
    "Sorry, the AI service is currently unavailable. Please try again later.";

#[derive(Debug, Error)]
pub enum ChatError {
    /// Caller-correctable input problem
    #[error("{0}")]
    Validation(String),

    /// Delegation failed; the source is reported to the caller as details
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ChatError {
    /// Full cause chain of an internal error, outermost context first
    pub fn details(&self) -> Option<String> {
        match self {
            ChatError::Validation(_) => None,
            ChatError::Internal(e) => Some(format!("{:#}", e)),
        }
    }
}

pub struct MessageRouter {
    router: Router,
    delegate: DelegateStatus,
}

impl MessageRouter {
    pub fn new(router: Router, delegate: DelegateStatus) -> Self {
        Self { router, delegate }
    }

    pub fn delegate_status(&self) -> &DelegateStatus {
        &self.delegate
    }

    /// Reject input that must never reach a session
    pub fn validate(message: &str) -> Result<(), ChatError> {
        if message.is_empty() {
            return Err(ChatError::Validation("Message is required".to_string()));
        }
        Ok(())
    }

    /// Produce a reply for `message`
    ///
    /// Only successful delegations are recorded in `history`.
    pub async fn handle_chat(
        &self,
        history: &mut ConversationHistory,
        message: &str,
    ) -> Result<String, ChatError> {
        Self::validate(message)?;

        match self.router.route(message) {
            RouteDecision::Canned(reply) => {
                tracing::info!(reply = reply.as_str(), "Answering with canned reply");
                Ok(reply.text())
            }
            RouteDecision::Delegate => match &self.delegate {
                DelegateStatus::Ready(delegate) => {
                    let response = delegate
                        .complete(history.messages(), message)
                        .await
                        .map_err(|e| {
                            tracing::error!(error = %e, "Completion delegate failed");
                            ChatError::Internal(e)
                        })?;
                    history.add_turn(message, response.clone());
                    Ok(response)
                }
                DelegateStatus::Unavailable { reason } => {
                    tracing::warn!(reason = %reason, "AI service unavailable, sending apology");
                    Ok(UNAVAILABLE_MESSAGE.to_string())
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delegate::{CompletionDelegate, Knowledge};
    use crate::providers::{LlmProvider, ProviderRequest, ProviderResponse};
    use async_trait::async_trait;
    use std::sync::Arc;

    struct FixedProvider {
        reply: Option<&'static str>,
    }

    #[async_trait]
    impl LlmProvider for FixedProvider {
        async fn send_message(&self, request: &ProviderRequest) -> anyhow::Result<ProviderResponse> {
            let content = self
                .reply
                .ok_or_else(|| anyhow::anyhow!("connection reset by peer"))?;
            Ok(ProviderResponse {
                id: "fixed".to_string(),
                model: request.model.clone(),
                content: content.to_string(),
                stop_reason: None,
                provider: "fixed".to_string(),
            })
        }

        fn name(&self) -> &str {
            "fixed"
        }

        fn default_model(&self) -> &str {
            "fixed-model"
        }
    }

    fn router_with(reply: Option<&'static str>) -> MessageRouter {
        let delegate = CompletionDelegate::new(Arc::new(FixedProvider { reply }), Knowledge::default());
        MessageRouter::new(Router::default(), DelegateStatus::Ready(delegate))
    }

    fn unavailable_router() -> MessageRouter {
        MessageRouter::new(
            Router::default(),
            DelegateStatus::Unavailable {
                reason: "no key".to_string(),
            },
        )
    }

    #[tokio::test]
    async fn test_empty_message_is_validation_error() {
        let mut history = ConversationHistory::new();
        let err = router_with(Some("x"))
            .handle_chat(&mut history, "")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
        assert_eq!(err.to_string(), "Message is required");
    }

    #[tokio::test]
    async fn test_delegation_records_turn() {
        let mut history = ConversationHistory::new();
        let reply = router_with(Some("Khoury College offers a BS in CS."))
            .handle_chat(&mut history, "Tell me about the CS program")
            .await
            .unwrap();

        assert_eq!(reply, "Khoury College offers a BS in CS.");
        assert_eq!(history.turn_count(), 1);
    }

    #[tokio::test]
    async fn test_canned_reply_skips_history() {
        let mut history = ConversationHistory::new();
        let reply = router_with(Some("unused"))
            .handle_chat(&mut history, "Any feedback forms?")
            .await
            .unwrap();

        assert!(reply.contains("forms.gle"));
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_keywords_work_while_unavailable() {
        let mut history = ConversationHistory::new();
        let reply = unavailable_router()
            .handle_chat(&mut history, "What's on the calendar?")
            .await
            .unwrap();
        assert!(reply.starts_with("Check out upcoming Northeastern events here:"));
    }

    #[tokio::test]
    async fn test_unavailable_apologizes() {
        let mut history = ConversationHistory::new();
        let reply = unavailable_router()
            .handle_chat(&mut history, "Where is Snell Library?")
            .await
            .unwrap();
        assert_eq!(reply, UNAVAILABLE_MESSAGE);
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_delegate_failure_is_internal() {
        let mut history = ConversationHistory::new();
        let err = router_with(None)
            .handle_chat(&mut history, "Where is Snell Library?")
            .await
            .unwrap_err();

        assert!(matches!(err, ChatError::Internal(_)));
        assert_eq!(err.to_string(), "Internal server error");
        assert_eq!(err.details().as_deref(), Some("connection reset by peer"));
        assert!(history.is_empty());
    }

    #[test]
    fn test_details_include_cause_chain() {
        let err = ChatError::Internal(
            anyhow::anyhow!("tcp connect error: Connection refused")
                .context("Failed to send request to OpenAI API"),
        );

        assert_eq!(
            err.details().as_deref(),
            Some("Failed to send request to OpenAI API: tcp connect error: Connection refused")
        );
    }
}
