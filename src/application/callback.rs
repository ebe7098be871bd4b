use crate::config::CallbackConfig;
use crate::domain::authorization::{
    AdditionalData, AuthorizationOutcome, AuthorizationResult, ChallengeParams, ResultCode,
};
use crate::domain::decision::CallbackState;
use crate::domain::order::{OrderPayment, PendingOrder};
use crate::domain::ports::{
    AuthorizationClientBox, OrderStoreBox, SessionCartRestorerBox, TokenVaultBox,
};
use crate::domain::token::StoredPaymentToken;
use crate::error::Result;
use tracing::{error, info, instrument, warn};

pub const SUCCESS_NOTE: &str = "3D-secure validation was successful";
pub const FAILURE_NOTE: &str = "3D-secure validation was unsuccessful. This order will be cancelled when the related notification has been processed.";
pub const FAILURE_MESSAGE: &str = "3D-secure validation was unsuccessful";
pub const AWAITING_CHALLENGE_NOTICE: &str = "Customer was redirected to bank for 3D-secure validation. Once the shopper authenticated, the order status will be updated accordingly.";

/// Query parameter appended to the success page so analytics keep the
/// original traffic source instead of attributing the order to the bank.
pub const TRACKING_PARAM: (&str, &str) = ("utm_nooverride", "1");

/// A storefront-relative path plus query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectTarget {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl RedirectTarget {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackResponse {
    Redirect(RedirectTarget),
    /// Render the return page itself, with any queued messages.
    Render,
}

/// A message queued for the shopper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Notice(String),
    Error(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackOutcome {
    pub response: CallbackResponse,
    pub messages: Vec<Message>,
    /// Effective gateway result, when the gateway was consulted.
    pub result_code: Option<ResultCode>,
}

impl CallbackOutcome {
    fn render(messages: Vec<Message>) -> Self {
        Self {
            response: CallbackResponse::Render,
            messages,
            result_code: None,
        }
    }

    pub fn is_redirect_to(&self, path: &str) -> bool {
        matches!(&self.response, CallbackResponse::Redirect(target) if target.path == path)
    }
}

/// Handles the shopper's return from a 3DS challenge.
///
/// Holds only configuration and `Send + Sync` ports, so a single instance
/// can serve concurrent requests for different orders.
pub struct ThreeDSecureCallbackHandler {
    config: CallbackConfig,
    gateway: AuthorizationClientBox,
    order_store: OrderStoreBox,
    token_vault: TokenVaultBox,
    cart_restorer: SessionCartRestorerBox,
}

impl ThreeDSecureCallbackHandler {
    pub fn new(
        config: CallbackConfig,
        gateway: AuthorizationClientBox,
        order_store: OrderStoreBox,
        token_vault: TokenVaultBox,
        cart_restorer: SessionCartRestorerBox,
    ) -> Self {
        Self {
            config,
            gateway,
            order_store,
            token_vault,
            cart_restorer,
        }
    }

    /// Loads the order the shopper just placed and handles the return for it.
    ///
    /// An unknown order has nothing to validate and goes to the success page,
    /// like an order without a payment record.
    #[instrument(skip(self, params))]
    pub async fn handle_increment_id(
        &self,
        increment_id: &str,
        params: Option<ChallengeParams>,
    ) -> CallbackOutcome {
        match self.order_store.load(increment_id).await {
            Ok(Some(order)) => self.handle(order, params).await,
            Ok(None) => {
                warn!("Order not found, skipping 3D secure validation");
                self.success()
            }
            Err(e) => {
                error!("Failed to load order: {}", e);
                self.success()
            }
        }
    }

    #[instrument(skip_all, fields(order = %order.increment_id))]
    pub async fn handle(
        &self,
        order: PendingOrder,
        params: Option<ChallengeParams>,
    ) -> CallbackOutcome {
        let info = order.additional_information();
        if info.three_ds_active && !info.three_ds_success {
            info!("3D secure is active");
        }

        match CallbackState::resolve(&info, params) {
            CallbackState::PassThrough => self.success(),
            CallbackState::AwaitingAsyncMethod => CallbackOutcome::render(Vec::new()),
            CallbackState::AwaitingChallenge => {
                info!("Customer was redirected to bank for 3D-secure validation.");
                CallbackOutcome::render(vec![Message::Notice(
                    AWAITING_CHALLENGE_NOTICE.to_string(),
                )])
            }
            CallbackState::Authorize(params) => self.authorize(order, params).await,
        }
    }

    async fn authorize(
        &self,
        mut order: PendingOrder,
        params: ChallengeParams,
    ) -> CallbackOutcome {
        info!("Process 3D secure payment");

        let outcome = match order.payment.as_mut() {
            Some(payment) => {
                payment.record_challenge(&params);
                let response = self.gateway.authorize_3d_secure(payment, &params).await;
                AuthorizationOutcome::from_gateway(response)
            }
            None => {
                AuthorizationOutcome::TransportError("order has no payment record".to_string())
            }
        };

        let result_code = outcome.result_code();
        info!("Process 3D secure payment result is: {}", result_code);

        let mut callback = match outcome {
            AuthorizationOutcome::Authorised(result) => self.on_authorised(order, result).await,
            AuthorizationOutcome::Refused(result) => {
                warn!(
                    psp_reference = result.psp_reference.as_deref().unwrap_or_default(),
                    "Process 3D secure payment was refused: {}", result.result_code
                );
                self.on_refused(order).await
            }
            AuthorizationOutcome::TransportError(e) => {
                warn!("Process 3D secure payment was refused, gateway call failed: {}", e);
                self.on_refused(order).await
            }
        };
        callback.result_code = Some(result_code);
        callback
    }

    async fn on_authorised(
        &self,
        mut order: PendingOrder,
        result: AuthorizationResult,
    ) -> CallbackOutcome {
        order.add_status_history(SUCCESS_NOTE);

        if let Some(payment) = order.payment.as_mut() {
            payment.mark_three_ds_validated();

            if let Some(data) = result.additional_data.as_ref()
                && data.recurring_reference().is_some()
            {
                self.store_recurring(&order.increment_id, payment, data).await;
            }
        }

        // Flags and history are persisted in a single write.
        if let Err(e) = self.order_store.save(&order).await {
            error!("Failed to save order after 3D secure validation: {}", e);
        }

        self.success()
    }

    async fn store_recurring(
        &self,
        increment_id: &str,
        payment: &mut OrderPayment,
        data: &AdditionalData,
    ) {
        if !self.config.credit_card_vault_enabled {
            if let Err(e) = self
                .token_vault
                .create_billing_agreement(increment_id, data)
                .await
            {
                error!("Failed to create billing agreement: {}", e);
            }
            return;
        }

        // TODO: queue failed token writes for retry; today the shopper silently
        // loses the stored card.
        match self.vault_token(increment_id, data).await {
            Ok(token) => payment.attach_vault_token(token),
            Err(e) => error!("Failed to store vault payment token: {}", e),
        }
    }

    async fn vault_token(
        &self,
        increment_id: &str,
        data: &AdditionalData,
    ) -> Result<StoredPaymentToken> {
        let token = StoredPaymentToken::from_additional_data(data)?;
        self.token_vault.store_token(increment_id, &token).await?;
        Ok(token)
    }

    async fn on_refused(&self, mut order: PendingOrder) -> CallbackOutcome {
        // No cancellation here: the authorisation notification is authoritative
        // and may still arrive with a conflicting result. Flags stay as they are;
        // only the challenge echo and the note are persisted.
        order.add_status_history(FAILURE_NOTE);
        if let Err(e) = self.order_store.save(&order).await {
            error!("Failed to save order after 3D secure refusal: {}", e);
        }

        if let Err(e) = self.cart_restorer.restore_cart(&order.increment_id).await {
            error!("Failed to restore cart: {}", e);
        }

        CallbackOutcome {
            response: CallbackResponse::Redirect(RedirectTarget::new(&self.config.return_path)),
            messages: vec![Message::Error(FAILURE_MESSAGE.to_string())],
            result_code: None,
        }
    }

    fn success(&self) -> CallbackOutcome {
        let (key, value) = TRACKING_PARAM;
        CallbackOutcome {
            response: CallbackResponse::Redirect(
                RedirectTarget::new(&self.config.success_path).with_query(key, value),
            ),
            messages: Vec::new(),
            result_code: None,
        }
    }
}
