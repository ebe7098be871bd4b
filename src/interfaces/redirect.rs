use crate::application::callback::RedirectTarget;
use crate::domain::authorization::ChallengeParams;
use std::fmt;
use url::form_urlencoded;

/// Query parameter the issuer uses for the merchant data.
pub const MERCHANT_DATA_PARAM: &str = "MD";
/// Query parameter the issuer uses for the authentication response.
pub const PAYMENT_RESPONSE_PARAM: &str = "PaRes";

/// Reads the 3DS return parameters from a raw query string.
///
/// Accepts the string with or without its leading `?`. Returns `None` until
/// both parameters are present and non-empty.
pub fn parse_challenge_params(query: &str) -> Option<ChallengeParams> {
    let mut merchant_data = None;
    let mut payment_response = None;

    for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
        match key.as_ref() {
            MERCHANT_DATA_PARAM if merchant_data.is_none() => {
                merchant_data = Some(value.into_owned())
            }
            PAYMENT_RESPONSE_PARAM if payment_response.is_none() => {
                payment_response = Some(value.into_owned())
            }
            _ => {}
        }
    }

    ChallengeParams::from_parts(merchant_data, payment_response)
}

impl fmt::Display for RedirectTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)?;
        if !self.query.is_empty() {
            let query = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(&self.query)
                .finish();
            write!(f, "?{query}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_both_params() {
        let params = parse_challenge_params("?MD=abc%3D%3D&PaRes=eJzV%2Bw").unwrap();
        assert_eq!(params.merchant_data, "abc==");
        assert_eq!(params.payment_response, "eJzV+w");
    }

    #[test]
    fn test_parse_without_leading_question_mark() {
        assert!(parse_challenge_params("PaRes=x&MD=y").is_some());
    }

    #[test]
    fn test_missing_or_empty_params_are_absent() {
        assert!(parse_challenge_params("").is_none());
        assert!(parse_challenge_params("MD=abc").is_none());
        assert!(parse_challenge_params("MD=abc&PaRes=").is_none());
        assert!(parse_challenge_params("md=abc&pares=def").is_none());
    }

    #[test]
    fn test_first_value_wins() {
        let params = parse_challenge_params("MD=first&MD=second&PaRes=p").unwrap();
        assert_eq!(params.merchant_data, "first");
    }

    #[test]
    fn test_redirect_target_rendering() {
        let target =
            RedirectTarget::new("checkout/onepage/success").with_query("utm_nooverride", "1");
        assert_eq!(target.to_string(), "checkout/onepage/success?utm_nooverride=1");

        let bare = RedirectTarget::new("checkout/cart");
        assert_eq!(bare.to_string(), "checkout/cart");

        let encoded = RedirectTarget::new("checkout/cart").with_query("note", "a b&c");
        assert_eq!(encoded.to_string(), "checkout/cart?note=a+b%26c");
    }
}
