use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CallbackError {
    #[error("Order store error: {0}")]
    #[diagnostic(code(threeds::store))]
    Store(String),
    #[error("Token vault error: {0}")]
    #[diagnostic(code(threeds::vault))]
    Vault(String),
    #[error("Gateway error: {0}")]
    #[diagnostic(code(threeds::gateway))]
    Gateway(String),
    #[error("Invalid card expiry date: {0}")]
    #[diagnostic(
        code(threeds::invalid_expiry),
        help("expected the gateway's `M/YYYY` format, e.g. `3/2030`")
    )]
    InvalidExpiry(String),
    #[error("Missing field in gateway additional data: {0}")]
    #[diagnostic(code(threeds::missing_field))]
    MissingField(&'static str),
    #[error("Serialization error: {0}")]
    #[diagnostic(code(threeds::serialization))]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CallbackError>;
