use super::authorization::ChallengeParams;
use super::token::StoredPaymentToken;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// 3DS bookkeeping kept in the payment's additional-information map.
///
/// Keys match what the checkout step writes when it starts a challenge, so an
/// order serialized by the storefront deserializes here unchanged.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Default)]
pub struct AdditionalInformation {
    /// A 3DS challenge was requested and has not been validated yet.
    #[serde(rename = "3dActive", default, deserialize_with = "deserialize_flag")]
    pub three_ds_active: bool,
    /// The current challenge has been validated by the gateway.
    #[serde(rename = "3dSuccess", default, deserialize_with = "deserialize_flag")]
    pub three_ds_success: bool,
    /// The order was placed with an asynchronous alternative payment method.
    #[serde(rename = "checkoutAPM", default, deserialize_with = "deserialize_flag")]
    pub checkout_apm: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md: Option<String>,
    #[serde(rename = "paRequest", default, skip_serializing_if = "Option::is_none")]
    pub pa_request: Option<String>,
    #[serde(rename = "paResponse", default, skip_serializing_if = "Option::is_none")]
    pub pa_response: Option<String>,
}

// Storefronts write these flags loosely: `true`, `"1"`, `""` and `null` all occur.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(Value::String(s)) => !matches!(s.trim(), "" | "0" | "false"),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    })
}

/// Typed extension data attached to a payment.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct PaymentExtension {
    pub vault_payment_token: Option<StoredPaymentToken>,
}

/// The payment record of an order.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Default)]
pub struct OrderPayment {
    pub additional_information: AdditionalInformation,
    /// Free-form serialized data the payment resource persists alongside the record.
    #[serde(default)]
    pub additional_data: Map<String, Value>,
    #[serde(default)]
    pub extension: PaymentExtension,
}

impl OrderPayment {
    /// A payment that has just been sent to the bank for a 3DS challenge.
    pub fn awaiting_challenge() -> Self {
        let mut payment = Self::default();
        payment.additional_information.three_ds_active = true;
        payment
    }

    /// Echoes the redirect parameters into the additional information so the
    /// gateway request can be built from the payment alone.
    pub fn record_challenge(&mut self, params: &ChallengeParams) {
        let info = &mut self.additional_information;
        info.md = Some(params.merchant_data.clone());
        info.pa_request = Some(params.payment_response.clone());
        info.pa_response = Some(params.payment_response.clone());
    }

    /// Closes the challenge. `3dActive` is cleared so that navigating back to
    /// the redirect page after success starts a fresh cycle.
    pub fn mark_three_ds_validated(&mut self) {
        self.additional_information.three_ds_active = false;
        self.additional_information.three_ds_success = true;
    }

    /// Links a vault token and asks the payment resource to persist it even
    /// when nothing else on the record changed.
    pub fn attach_vault_token(&mut self, token: StoredPaymentToken) {
        self.extension.vault_payment_token = Some(token);
        self.additional_data
            .insert("force_save".to_string(), Value::Bool(true));
    }
}

/// An order waiting for its payment to be finalized.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PendingOrder {
    pub increment_id: String,
    pub payment: Option<OrderPayment>,
    #[serde(default)]
    pub status_history: Vec<String>,
}

impl PendingOrder {
    pub fn new(increment_id: impl Into<String>) -> Self {
        Self {
            increment_id: increment_id.into(),
            payment: None,
            status_history: Vec::new(),
        }
    }

    pub fn with_payment(mut self, payment: OrderPayment) -> Self {
        self.payment = Some(payment);
        self
    }

    /// The payment's additional information, or all-false flags when the
    /// order has no payment record.
    pub fn additional_information(&self) -> AdditionalInformation {
        self.payment
            .as_ref()
            .map(|p| p.additional_information.clone())
            .unwrap_or_default()
    }

    pub fn add_status_history(&mut self, comment: impl Into<String>) {
        self.status_history.push(comment.into());
    }
}
