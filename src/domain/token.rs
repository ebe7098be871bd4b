use super::authorization::AdditionalData;
use crate::error::{CallbackError, Result};
use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    #[default]
    Card,
}

/// Card details shown to the shopper next to a stored token.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct TokenDetails {
    #[serde(rename = "type")]
    pub card_type: String,
    #[serde(rename = "maskedCC")]
    pub masked_cc: String,
    #[serde(rename = "expirationDate")]
    pub expiration_date: String,
}

/// A reusable card reference stored after a successful 3DS authorization.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct StoredPaymentToken {
    pub token_type: TokenType,
    pub gateway_token: String,
    pub expires_at: DateTime<Utc>,
    pub details: TokenDetails,
}

impl StoredPaymentToken {
    /// Builds a card token from the gateway's recurring fields.
    pub fn from_additional_data(data: &AdditionalData) -> Result<Self> {
        let gateway_token = data
            .recurring_reference()
            .ok_or(CallbackError::MissingField("recurring.recurringDetailReference"))?;
        let expiry = data
            .expiry_date
            .as_deref()
            .ok_or(CallbackError::MissingField("expiryDate"))?;
        let card_type = data
            .payment_method_type
            .as_deref()
            .ok_or(CallbackError::MissingField("paymentMethod"))?;
        let masked_cc = data
            .masked_card
            .as_deref()
            .ok_or(CallbackError::MissingField("cardSummary"))?;

        Ok(Self {
            token_type: TokenType::Card,
            gateway_token: gateway_token.to_string(),
            expires_at: token_expiry(expiry)?,
            details: TokenDetails {
                card_type: card_type.to_string(),
                masked_cc: masked_cc.to_string(),
                expiration_date: expiry.to_string(),
            },
        })
    }

    /// Token details in the JSON shape the vault stores.
    pub fn details_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.details)?)
    }
}

/// A recurring-payment reference recorded when the card vault is disabled.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct BillingAgreement {
    pub increment_id: String,
    pub recurring_reference: String,
    pub payment_method: Option<String>,
    pub card_summary: Option<String>,
}

impl BillingAgreement {
    pub fn from_additional_data(increment_id: &str, data: &AdditionalData) -> Result<Self> {
        let reference = data
            .recurring_reference()
            .ok_or(CallbackError::MissingField("recurring.recurringDetailReference"))?;
        Ok(Self {
            increment_id: increment_id.to_string(),
            recurring_reference: reference.to_string(),
            payment_method: data.payment_method_type.clone(),
            card_summary: data.masked_card.clone(),
        })
    }
}

/// Converts a printed card expiry (`M/YYYY`) into the instant the token stops
/// being usable: midnight UTC on the first day of the following month.
pub fn token_expiry(printed: &str) -> Result<DateTime<Utc>> {
    let invalid = || CallbackError::InvalidExpiry(printed.to_string());

    let (month, year) = printed.trim().split_once('/').ok_or_else(invalid)?;
    let month: u32 = month.trim().parse().map_err(|_| invalid())?;
    let year = year.trim();
    if year.len() != 4 {
        return Err(invalid());
    }
    let year: i32 = year.parse().map_err(|_| invalid())?;

    let first_of_month = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let expires = first_of_month
        .checked_add_months(Months::new(1))
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(invalid)?;

    Ok(expires.and_utc())
}
