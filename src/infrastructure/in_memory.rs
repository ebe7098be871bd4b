use crate::domain::authorization::AdditionalData;
use crate::domain::order::PendingOrder;
use crate::domain::ports::{OrderStore, SessionCartRestorer, TokenVault};
use crate::domain::token::{BillingAgreement, StoredPaymentToken};
use crate::error::{CallbackError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;

/// A thread-safe in-memory order store.
///
/// Uses `Arc<RwLock<HashMap<String, PendingOrder>>>` keyed by increment id.
/// Clones share the same orders, so a test can keep a handle after boxing one
/// into the handler. Every write is counted.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, PendingOrder>>>,
    writes: Arc<AtomicUsize>,
}

impl InMemoryOrderStore {
    /// Creates a new, empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` and `append_history` calls so far.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn load(&self, increment_id: &str) -> Result<Option<PendingOrder>> {
        let orders = self.orders.read().await;
        Ok(orders.get(increment_id).cloned())
    }

    async fn append_history(&self, increment_id: &str, comment: &str) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(increment_id)
            .ok_or_else(|| CallbackError::Store(format!("order {increment_id} not found")))?;
        order.add_status_history(comment);
        Ok(())
    }

    async fn save(&self, order: &PendingOrder) -> Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        let mut orders = self.orders.write().await;
        orders.insert(order.increment_id.clone(), order.clone());
        Ok(())
    }
}

/// An in-memory vault for card tokens and billing agreements.
///
/// Storing the same gateway token twice for an order is a no-op.
#[derive(Default, Clone)]
pub struct InMemoryTokenVault {
    tokens: Arc<RwLock<HashMap<String, Vec<StoredPaymentToken>>>>,
    agreements: Arc<RwLock<HashMap<String, BillingAgreement>>>,
}

impl InMemoryTokenVault {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn tokens(&self, increment_id: &str) -> Vec<StoredPaymentToken> {
        let tokens = self.tokens.read().await;
        tokens.get(increment_id).cloned().unwrap_or_default()
    }

    pub async fn billing_agreement(&self, increment_id: &str) -> Option<BillingAgreement> {
        let agreements = self.agreements.read().await;
        agreements.get(increment_id).cloned()
    }
}

#[async_trait]
impl TokenVault for InMemoryTokenVault {
    async fn store_token(&self, increment_id: &str, token: &StoredPaymentToken) -> Result<()> {
        let mut tokens = self.tokens.write().await;
        let stored = tokens.entry(increment_id.to_string()).or_default();
        if !stored.iter().any(|t| t.gateway_token == token.gateway_token) {
            stored.push(token.clone());
        }
        Ok(())
    }

    async fn create_billing_agreement(
        &self,
        increment_id: &str,
        data: &AdditionalData,
    ) -> Result<()> {
        let agreement = BillingAgreement::from_additional_data(increment_id, data)?;
        let mut agreements = self.agreements.write().await;
        agreements.insert(increment_id.to_string(), agreement);
        Ok(())
    }
}

/// Records which carts were restored.
#[derive(Default, Clone)]
pub struct InMemoryCartRestorer {
    restored: Arc<RwLock<Vec<String>>>,
}

impl InMemoryCartRestorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn restored(&self) -> Vec<String> {
        self.restored.read().await.clone()
    }
}

#[async_trait]
impl SessionCartRestorer for InMemoryCartRestorer {
    async fn restore_cart(&self, increment_id: &str) -> Result<()> {
        let mut restored = self.restored.write().await;
        restored.push(increment_id.to_string());
        Ok(())
    }
}
