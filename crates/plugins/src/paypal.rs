//! PayPal plugin: client token for the PayPal JS SDK.

use extensions::{ClientContext, ClientError, Headers, Plugin, RequestSpec};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Token that initialises the PayPal JS SDK in the browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateClientTokenOutput {
    pub client_token: String,
}

/// Registers the `paypal` namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct PaypalPlugin;

impl Plugin for PaypalPlugin {
    const NAME: &'static str = "paypal";
    type Endpoints = PaypalEndpoints;

    fn endpoints(&self, ctx: &ClientContext) -> PaypalEndpoints {
        PaypalEndpoints { ctx: ctx.clone() }
    }
}

/// PayPal endpoint functions.
#[derive(Debug, Clone)]
pub struct PaypalEndpoints {
    ctx: ClientContext,
}

impl PaypalEndpoints {
    /// `POST /store/paypal/client-token`
    #[instrument(skip_all, fields(plugin = PaypalPlugin::NAME))]
    pub async fn create_client_token(
        &self,
        headers: Option<Headers>,
    ) -> Result<CreateClientTokenOutput, ClientError> {
        self.ctx
            .send("/store/paypal/client-token", RequestSpec::post(), headers)
            .await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use extensions::testing::RecordingClient;
    use extensions::{BearerToken, ClientOptions, HttpMethod};
    use serde_json::json;

    use super::*;

    #[tokio::test]
    async fn test_create_client_token_posts_with_auth() {
        let client = Arc::new(RecordingClient::responding(json!({ "client_token": "ct_1" })));
        let ctx = ClientContext::new(
            client.clone(),
            ClientOptions::new().with_auth(BearerToken::new("jwt")),
        );

        let token = PaypalPlugin.endpoints(&ctx).create_client_token(None).await.unwrap();

        assert_eq!(token.client_token, "ct_1");
        let request = client.last_request().unwrap();
        assert_eq!(request.path, "/store/paypal/client-token");
        assert_eq!(request.spec.method, HttpMethod::Post);
        assert_eq!(request.spec.body, None);
        assert_eq!(request.spec.headers.get("authorization"), Some("Bearer jwt"));
    }
}
