//! Application layer orchestrating the 3DS return flow.
//!
//! `ThreeDSecureCallbackHandler` is the entry point. It resolves the decision
//! table and drives the gateway, order store, vault and cart restorer ports.

pub mod callback;
