mod common;

use common::{ORDER_ID, harness, order, params, seed};
use threeds_callback::application::callback::{
    AWAITING_CHALLENGE_NOTICE, CallbackResponse, Message, RedirectTarget,
};
use threeds_callback::domain::authorization::{AuthorizationResult, ResultCode};
use threeds_callback::domain::order::PendingOrder;
use threeds_callback::infrastructure::static_gateway::StaticAuthorizationClient;

fn authorising_gateway() -> StaticAuthorizationClient {
    StaticAuthorizationClient::replying(AuthorizationResult::new(ResultCode::Authorised))
}

#[tokio::test]
async fn test_inactive_order_always_goes_to_success() {
    for success in [false, true] {
        for challenge in [None, params()] {
            let h = harness(authorising_gateway(), true);
            let outcome = h.handler.handle(order(false, success, false), challenge).await;

            assert_eq!(
                outcome.response,
                CallbackResponse::Redirect(
                    RedirectTarget::new("checkout/onepage/success")
                        .with_query("utm_nooverride", "1")
                )
            );
            assert_eq!(h.gateway.calls(), 0);
            assert_eq!(h.store.writes(), 0);
        }
    }
}

#[tokio::test]
async fn test_order_without_payment_goes_to_success() {
    let h = harness(authorising_gateway(), true);
    let outcome = h.handler.handle(PendingOrder::new(ORDER_ID), params()).await;

    assert!(outcome.is_redirect_to("checkout/onepage/success"));
    assert_eq!(h.gateway.calls(), 0);
}

#[tokio::test]
async fn test_alternative_payment_method_renders_page() {
    let h = harness(authorising_gateway(), true);
    let outcome = h.handler.handle(order(false, false, true), params()).await;

    assert_eq!(outcome.response, CallbackResponse::Render);
    assert!(outcome.messages.is_empty());
    assert_eq!(h.gateway.calls(), 0);
    assert_eq!(h.store.writes(), 0);
}

#[tokio::test]
async fn test_validated_challenge_is_not_reauthorized() {
    let h = harness(authorising_gateway(), true);
    seed(&h.store, &order(true, true, false)).await;
    let writes_before = h.store.writes();

    let outcome = h.handler.handle_increment_id(ORDER_ID, params()).await;

    assert!(outcome.is_redirect_to("checkout/onepage/success"));
    assert_eq!(outcome.result_code, None);
    assert_eq!(h.gateway.calls(), 0);
    assert_eq!(h.store.writes(), writes_before);
}

#[tokio::test]
async fn test_open_challenge_without_params_only_renders() {
    let h = harness(authorising_gateway(), true);
    let pending = order(true, false, false);
    seed(&h.store, &pending).await;
    let writes_before = h.store.writes();

    let outcome = h.handler.handle_increment_id(ORDER_ID, None).await;

    assert_eq!(outcome.response, CallbackResponse::Render);
    assert_eq!(
        outcome.messages,
        vec![Message::Notice(AWAITING_CHALLENGE_NOTICE.to_string())]
    );
    assert_eq!(h.gateway.calls(), 0);
    assert_eq!(h.store.writes(), writes_before);
    assert_eq!(h.stored_order().await, pending);
    assert!(h.restorer.restored().await.is_empty());
}
