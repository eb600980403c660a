//! HTTP Basic Auth credentials for the RESTful API.

use base64::Engine;

use crate::error::{ConvoAiError, Result};

/// Customer ID + secret pair used for HTTP Basic Authentication.
///
/// The pair maps onto the console's "RESTful API Customer ID / Customer
/// Secret". Both values are opaque and immutable once the credential is
/// constructed.
#[derive(Clone)]
pub struct BasicAuthCredential {
    customer_id: String,
    customer_secret: String,
}

impl std::fmt::Debug for BasicAuthCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print the secret.
        f.debug_struct("BasicAuthCredential")
            .field("customer_id", &self.customer_id)
            .finish_non_exhaustive()
    }
}

impl BasicAuthCredential {
    pub fn new(customer_id: impl Into<String>, customer_secret: impl Into<String>) -> Result<Self> {
        let customer_id = customer_id.into();
        let customer_secret = customer_secret.into();
        if customer_id.is_empty() {
            return Err(ConvoAiError::Validation("customer_id cannot be empty".into()));
        }
        if customer_secret.is_empty() {
            return Err(ConvoAiError::Validation(
                "customer_secret cannot be empty".into(),
            ));
        }
        Ok(Self {
            customer_id,
            customer_secret,
        })
    }

    /// The `Authorization` header value: `Basic base64(id:secret)`.
    pub fn authorization(&self) -> String {
        let pair = format!("{}:{}", self.customer_id, self.customer_secret);
        let encoded = base64::engine::general_purpose::STANDARD.encode(pair.as_bytes());
        format!("Basic {encoded}")
    }
}
