use super::authorization::{AdditionalData, AuthorizationResult, ChallengeParams};
use super::order::{OrderPayment, PendingOrder};
use super::token::StoredPaymentToken;
use crate::error::Result;
use async_trait::async_trait;

/// The payment gateway's 3DS authorization endpoint.
#[async_trait]
pub trait AuthorizationClient: Send + Sync {
    async fn authorize_3d_secure(
        &self,
        payment: &OrderPayment,
        params: &ChallengeParams,
    ) -> Result<AuthorizationResult>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn load(&self, increment_id: &str) -> Result<Option<PendingOrder>>;
    /// Appends a comment to the persisted order history without touching
    /// anything else on the order.
    async fn append_history(&self, increment_id: &str, comment: &str) -> Result<()>;
    /// Persists the whole order, payment flags and history together.
    async fn save(&self, order: &PendingOrder) -> Result<()>;
}

/// Storage for reusable card references.
///
/// Implementations must tolerate the same token being stored twice.
#[async_trait]
pub trait TokenVault: Send + Sync {
    async fn store_token(&self, increment_id: &str, token: &StoredPaymentToken) -> Result<()>;
    async fn create_billing_agreement(
        &self,
        increment_id: &str,
        data: &AdditionalData,
    ) -> Result<()>;
}

#[async_trait]
pub trait SessionCartRestorer: Send + Sync {
    /// Reactivates the cart the shopper checked out with.
    async fn restore_cart(&self, increment_id: &str) -> Result<()>;
}

pub type AuthorizationClientBox = Box<dyn AuthorizationClient>;
pub type OrderStoreBox = Box<dyn OrderStore>;
pub type TokenVaultBox = Box<dyn TokenVault>;
pub type SessionCartRestorerBox = Box<dyn SessionCartRestorer>;
