#![allow(dead_code)]

use async_trait::async_trait;
use threeds_callback::application::callback::ThreeDSecureCallbackHandler;
use threeds_callback::config::CallbackConfig;
use threeds_callback::domain::authorization::{
    AdditionalData, AuthorizationResult, ChallengeParams, ResultCode,
};
use threeds_callback::domain::order::{OrderPayment, PendingOrder};
use threeds_callback::domain::ports::{OrderStore, TokenVault, TokenVaultBox};
use threeds_callback::domain::token::StoredPaymentToken;
use threeds_callback::error::{CallbackError, Result};
use threeds_callback::infrastructure::in_memory::{
    InMemoryCartRestorer, InMemoryOrderStore, InMemoryTokenVault,
};
use threeds_callback::infrastructure::static_gateway::StaticAuthorizationClient;

pub const ORDER_ID: &str = "100000042";

/// Handler wired to in-memory adapters, with handles kept for assertions.
pub struct Harness {
    pub handler: ThreeDSecureCallbackHandler,
    pub gateway: StaticAuthorizationClient,
    pub store: InMemoryOrderStore,
    pub vault: InMemoryTokenVault,
    pub restorer: InMemoryCartRestorer,
}

impl Harness {
    pub async fn stored_order(&self) -> PendingOrder {
        self.store.load(ORDER_ID).await.unwrap().unwrap()
    }
}

pub fn harness(gateway: StaticAuthorizationClient, vault_enabled: bool) -> Harness {
    let vault = InMemoryTokenVault::new();
    harness_with_vault(gateway, vault_enabled, vault.clone(), Box::new(vault))
}

pub fn harness_with_vault(
    gateway: StaticAuthorizationClient,
    vault_enabled: bool,
    vault: InMemoryTokenVault,
    vault_port: TokenVaultBox,
) -> Harness {
    let store = InMemoryOrderStore::new();
    let restorer = InMemoryCartRestorer::new();
    let config = CallbackConfig {
        return_path: "adyen/return".to_string(),
        credit_card_vault_enabled: vault_enabled,
        ..CallbackConfig::default()
    };

    let handler = ThreeDSecureCallbackHandler::new(
        config,
        Box::new(gateway.clone()),
        Box::new(store.clone()),
        vault_port,
        Box::new(restorer.clone()),
    );

    Harness {
        handler,
        gateway,
        store,
        vault,
        restorer,
    }
}

pub fn order(active: bool, success: bool, apm: bool) -> PendingOrder {
    let mut payment = OrderPayment::default();
    payment.additional_information.three_ds_active = active;
    payment.additional_information.three_ds_success = success;
    payment.additional_information.checkout_apm = apm;
    PendingOrder::new(ORDER_ID).with_payment(payment)
}

pub fn params() -> Option<ChallengeParams> {
    Some(ChallengeParams::new("merchant-data", "issuer-response"))
}

pub fn recurring_data(expiry: &str) -> AdditionalData {
    AdditionalData {
        recurring_reference: Some("8416000000000002".to_string()),
        expiry_date: Some(expiry.to_string()),
        payment_method_type: Some("visa".to_string()),
        masked_card: Some("1111".to_string()),
    }
}

pub fn authorised_with_recurring(expiry: &str) -> AuthorizationResult {
    AuthorizationResult::new(ResultCode::Authorised).with_additional_data(recurring_data(expiry))
}

pub async fn seed(store: &InMemoryOrderStore, order: &PendingOrder) {
    store.save(order).await.unwrap();
}

/// A vault whose backend is down.
pub struct UnavailableTokenVault;

#[async_trait]
impl TokenVault for UnavailableTokenVault {
    async fn store_token(&self, _increment_id: &str, _token: &StoredPaymentToken) -> Result<()> {
        Err(CallbackError::Vault("vault backend unavailable".to_string()))
    }

    async fn create_billing_agreement(
        &self,
        _increment_id: &str,
        _data: &AdditionalData,
    ) -> Result<()> {
        Err(CallbackError::Vault("vault backend unavailable".to_string()))
    }
}
