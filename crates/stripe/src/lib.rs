//! Stripe payment-intent integration.
//!
//! [`StripeApi`] wraps the two payment-intent endpoints this service uses
//! (create and retrieve). [`PaymentGateway`] is the seam the credential
//! lifecycle talks through: [`LiveGateway`] drives the real API, while
//! [`SimulatedGateway`] settles instantly for deployments that have no
//! processor credentials. [`GatewayMode`] picks between them once at
//! startup and refuses dangerous key/mode combinations.

pub mod api;
pub mod gateway;

pub use api::{GatewayError, PaymentIntent, PaymentIntentStatus, StripeApi};
pub use gateway::{GatewayMode, LiveGateway, PaymentGateway, PaymentHandle, SimulatedGateway};
