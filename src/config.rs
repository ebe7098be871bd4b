/// Storefront settings the callback handler needs to pick redirect targets
/// and the recurring-payment persistence path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackConfig {
    /// Checkout success page, relative to the storefront root.
    pub success_path: String,
    /// Where the shopper goes back to when 3DS validation fails.
    pub return_path: String,
    /// Whether the platform card vault is enabled. When disabled, recurring
    /// references are recorded as billing agreements instead of vault tokens.
    pub credit_card_vault_enabled: bool,
}

pub const DEFAULT_SUCCESS_PATH: &str = "checkout/onepage/success";
pub const DEFAULT_RETURN_PATH: &str = "checkout/cart";

impl Default for CallbackConfig {
    fn default() -> Self {
        Self {
            success_path: DEFAULT_SUCCESS_PATH.to_string(),
            return_path: DEFAULT_RETURN_PATH.to_string(),
            credit_card_vault_enabled: true,
        }
    }
}

impl CallbackConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup, falling back to the defaults
    /// for unset keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            success_path: lookup("THREEDS_SUCCESS_PATH")
                .unwrap_or_else(|| DEFAULT_SUCCESS_PATH.to_string()),
            return_path: lookup("THREEDS_RETURN_PATH")
                .unwrap_or_else(|| DEFAULT_RETURN_PATH.to_string()),
            credit_card_vault_enabled: lookup("THREEDS_CARD_VAULT_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
