//! Stripe payment intents over the REST API.

use engine::{Currency, PaymentGateway, PaymentResult, PaymentSheet};
use futures::future::BoxFuture;
use serde::Deserialize;

pub const STRIPE_API_BASE: &str = "https://api.stripe.com";

#[derive(Debug, Deserialize)]
struct PaymentIntent {
    client_secret: String,
    customer: Option<String>,
}

#[derive(Clone, Debug)]
pub struct StripeGateway {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl StripeGateway {
    pub fn new(http: reqwest::Client, secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http,
            secret_key: secret_key.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    fn intents_url(&self) -> String {
        format!("{}/v1/payment_intents", self.api_base)
    }
}

impl PaymentGateway for StripeGateway {
    fn create_payment_intent(
        &self,
        amount_minor: i64,
        currency: Currency,
    ) -> BoxFuture<'static, PaymentResult> {
        let request = self
            .http
            .post(self.intents_url())
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount_minor.to_string()),
                ("currency", currency.code().to_lowercase()),
                ("payment_method_types[]", "card".to_string()),
            ]);
        Box::pin(async move {
            let intent: PaymentIntent = request.send().await?.error_for_status()?.json().await?;
            tracing::debug!(amount_minor, "payment intent created");
            Ok(PaymentSheet {
                client_secret: intent.client_secret,
                customer: intent.customer.unwrap_or_default(),
            })
        })
    }
}
