use super::authorization::ChallengeParams;
use super::order::AdditionalInformation;

/// Where an order stands when the shopper lands on the 3DS return page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackState {
    /// No challenge pending, or it was already validated: send the shopper on.
    PassThrough,
    /// An asynchronous payment method has not completed yet.
    AwaitingAsyncMethod,
    /// The challenge is open but the bank has not redirected back.
    AwaitingChallenge,
    /// The bank redirected back; the gateway has to authorize.
    Authorize(ChallengeParams),
}

impl CallbackState {
    /// Resolves the return-page decision table.
    ///
    /// An open challenge (`3dActive` set, `3dSuccess` not) always takes
    /// precedence over the alternative-payment flag.
    pub fn resolve(info: &AdditionalInformation, params: Option<ChallengeParams>) -> Self {
        if info.three_ds_active && !info.three_ds_success {
            match params {
                Some(params) => Self::Authorize(params),
                None => Self::AwaitingChallenge,
            }
        } else if !info.three_ds_active && info.checkout_apm {
            Self::AwaitingAsyncMethod
        } else {
            Self::PassThrough
        }
    }
}
