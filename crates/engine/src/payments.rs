//! Payment collaborator seam.
//!
//! The engine only reads the event price and asks the processor for a
//! payment intent; settlement and refunds live elsewhere.

use std::error::Error;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::Currency;

/// What a client needs to present the processor's payment sheet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSheet {
    pub client_secret: String,
    pub customer: String,
}

pub type PaymentResult = Result<PaymentSheet, Box<dyn Error + Send + Sync>>;

pub trait PaymentGateway: Send + Sync {
    /// Request an intent for `amount_minor` (cents for EUR).
    fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: Currency,
    ) -> BoxFuture<'static, PaymentResult>;
}
