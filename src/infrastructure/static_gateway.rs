use crate::domain::authorization::{AuthorizationResult, ChallengeParams};
use crate::domain::order::OrderPayment;
use crate::domain::ports::AuthorizationClient;
use crate::error::{CallbackError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone)]
enum Reply {
    Result(AuthorizationResult),
    Unreachable(String),
}

/// A gateway that answers every authorization with the same reply.
///
/// Stands in for the real gateway client in sandboxes and tests. Clones share
/// the call counter.
#[derive(Debug, Clone)]
pub struct StaticAuthorizationClient {
    reply: Reply,
    calls: Arc<AtomicUsize>,
}

impl StaticAuthorizationClient {
    pub fn replying(result: AuthorizationResult) -> Self {
        Self {
            reply: Reply::Result(result),
            calls: Arc::default(),
        }
    }

    /// A gateway whose every call fails at the transport level.
    pub fn unreachable(reason: impl Into<String>) -> Self {
        Self {
            reply: Reply::Unreachable(reason.into()),
            calls: Arc::default(),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AuthorizationClient for StaticAuthorizationClient {
    async fn authorize_3d_secure(
        &self,
        _payment: &OrderPayment,
        _params: &ChallengeParams,
    ) -> Result<AuthorizationResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Result(result) => Ok(result.clone()),
            Reply::Unreachable(reason) => Err(CallbackError::Gateway(reason.clone())),
        }
    }
}
