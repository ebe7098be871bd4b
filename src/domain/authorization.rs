use crate::error::CallbackError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Parameters the issuer sends back with the shopper after a 3DS challenge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChallengeParams {
    /// Opaque merchant data (`MD`) round-tripped through the issuer.
    pub merchant_data: String,
    /// The issuer's authentication response (`PaRes`).
    pub payment_response: String,
}

impl ChallengeParams {
    pub fn new(merchant_data: impl Into<String>, payment_response: impl Into<String>) -> Self {
        Self {
            merchant_data: merchant_data.into(),
            payment_response: payment_response.into(),
        }
    }

    /// Builds the parameters only when both halves are present and non-empty.
    /// Anything less means the shopper has not come back from the bank yet.
    pub fn from_parts(
        merchant_data: Option<String>,
        payment_response: Option<String>,
    ) -> Option<Self> {
        match (merchant_data, payment_response) {
            (Some(md), Some(pa_res)) if !md.is_empty() && !pa_res.is_empty() => {
                Some(Self::new(md, pa_res))
            }
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ResultCode {
    Authorised,
    Refused,
    Cancelled,
    Error,
    Pending,
    Received,
    RedirectShopper,
    Other(String),
}

impl From<String> for ResultCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "Authorised" => Self::Authorised,
            "Refused" => Self::Refused,
            "Cancelled" => Self::Cancelled,
            "Error" => Self::Error,
            "Pending" => Self::Pending,
            "Received" => Self::Received,
            "RedirectShopper" => Self::RedirectShopper,
            _ => Self::Other(code),
        }
    }
}

impl From<ResultCode> for String {
    fn from(code: ResultCode) -> Self {
        code.to_string()
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Authorised => "Authorised",
            Self::Refused => "Refused",
            Self::Cancelled => "Cancelled",
            Self::Error => "Error",
            Self::Pending => "Pending",
            Self::Received => "Received",
            Self::RedirectShopper => "RedirectShopper",
            Self::Other(code) => code,
        };
        f.write_str(s)
    }
}

/// Recurring-payment fields the gateway returns when the shopper agreed to
/// store their card.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdditionalData {
    #[serde(rename = "recurring.recurringDetailReference", default)]
    pub recurring_reference: Option<String>,
    /// Printed card expiry, `M/YYYY`.
    #[serde(rename = "expiryDate", default)]
    pub expiry_date: Option<String>,
    #[serde(rename = "paymentMethod", default)]
    pub payment_method_type: Option<String>,
    #[serde(rename = "cardSummary", default)]
    pub masked_card: Option<String>,
}

impl AdditionalData {
    pub fn recurring_reference(&self) -> Option<&str> {
        self.recurring_reference
            .as_deref()
            .filter(|reference| !reference.is_empty())
    }
}

/// The gateway's answer to a 3DS authorization request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResult {
    #[serde(rename = "resultCode")]
    pub result_code: ResultCode,
    #[serde(rename = "pspReference", default, skip_serializing_if = "Option::is_none")]
    pub psp_reference: Option<String>,
    #[serde(rename = "additionalData", default, skip_serializing_if = "Option::is_none")]
    pub additional_data: Option<AdditionalData>,
}

impl AuthorizationResult {
    pub fn new(result_code: ResultCode) -> Self {
        Self {
            result_code,
            psp_reference: None,
            additional_data: None,
        }
    }

    pub fn with_additional_data(mut self, additional_data: AdditionalData) -> Self {
        self.additional_data = Some(additional_data);
        self
    }

    pub fn recurring_reference(&self) -> Option<&str> {
        self.additional_data
            .as_ref()
            .and_then(AdditionalData::recurring_reference)
    }
}

/// What the handler acts on after calling the gateway.
///
/// `TransportError` follows the same shopper path as `Refused`; it is kept
/// apart so operators can tell a decline from an unreachable gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
    Authorised(AuthorizationResult),
    Refused(AuthorizationResult),
    TransportError(String),
}

impl AuthorizationOutcome {
    pub fn from_gateway(response: Result<AuthorizationResult, CallbackError>) -> Self {
        match response {
            Ok(result) if result.result_code == ResultCode::Authorised => Self::Authorised(result),
            Ok(result) => Self::Refused(result),
            Err(e) => Self::TransportError(e.to_string()),
        }
    }

    /// The effective result code; transport faults fail closed as `Refused`.
    pub fn result_code(&self) -> ResultCode {
        match self {
            Self::Authorised(result) | Self::Refused(result) => result.result_code.clone(),
            Self::TransportError(_) => ResultCode::Refused,
        }
    }

    pub fn is_authorised(&self) -> bool {
        matches!(self, Self::Authorised(_))
    }
}
