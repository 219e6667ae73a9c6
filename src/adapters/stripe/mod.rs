//! Stripe payment provider adapter.
//!
//! Implements the `PaymentProvider` port for Stripe charges, plus a mock for
//! tests.
//!
//! # Security
//!
//! - Only tokenized payment sources are sent; raw card data never passes
//!   through this service
//! - The API key is handled via `secrecy::SecretString`

mod mock_payment_provider;
mod stripe_adapter;

pub use mock_payment_provider::MockPaymentProvider;
pub use stripe_adapter::{StripeConfig, StripePaymentAdapter};
