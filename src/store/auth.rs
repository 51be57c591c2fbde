//! Delegated authentication against the store's auth API.
//!
//! Credentials never touch our own storage: sign-in exchanges email and
//! password for an access token, and every later request is checked by
//! asking the auth API who the token belongs to.

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use super::{StoreClient, StoreError, StoreResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// Token pair returned by a successful sign-in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: User,
}

impl StoreClient {
    fn auth_url(&self, endpoint: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url(), endpoint)
    }

    /// Exchange email and password for a session.
    pub async fn sign_in(&self, email: &str, password: &str) -> StoreResult<Session> {
        let request = self
            .http()
            .post(self.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }));
        let response = self.authorize(request).send().await?;
        let response = Self::check(response).await?;
        let session: Session = response.json().await?;

        info!("User {} signed in", session.user.id);
        Ok(session)
    }

    /// Revoke the session this client carries.
    pub async fn sign_out(&self) -> StoreResult<()> {
        let request = self.http().post(self.auth_url("logout"));
        let response = self.authorize(request).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    /// The user owning this client's access token.
    ///
    /// `Ok(None)` means the token is missing, expired or revoked. Other
    /// failures (store unreachable, server errors) are returned as errors so
    /// callers can tell "signed out" from "could not check".
    pub async fn current_user(&self) -> StoreResult<Option<User>> {
        let request = self.http().get(self.auth_url("user"));
        let response = self.authorize(request).send().await?;
        match Self::check(response).await {
            Ok(response) => Ok(Some(response.json().await?)),
            Err(err) if err.is_unauthorized() => Ok(None),
            Err(StoreError::Api { status, message }) if status.is_client_error() => {
                warn!("Auth API rejected token ({}): {}", status, message);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_body() -> serde_json::Value {
        json!({
            "access_token": "jwt-token",
            "token_type": "bearer",
            "expires_in": 3600,
            "refresh_token": "refresh",
            "user": {"id": "u1", "email": "admin@example.com", "role": "authenticated"}
        })
    }

    // ==================== Sign In Tests ====================

    #[tokio::test]
    async fn test_sign_in_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .and(query_param("grant_type", "password"))
            .and(header("apikey", "anon"))
            .and(body_json(json!({"email": "admin@example.com", "password": "pw"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(session_body()))
            .expect(1)
            .mount(&server)
            .await;

        let client = StoreClient::new(server.uri(), "anon");
        let session = client.sign_in("admin@example.com", "pw").await.unwrap();

        assert_eq!(session.access_token, "jwt-token");
        assert_eq!(session.expires_in, Some(3600));
        assert_eq!(session.user.email.as_deref(), Some("admin@example.com"));
    }

    #[tokio::test]
    async fn test_sign_in_bad_credentials() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials"
            })))
            .mount(&server)
            .await;

        let client = StoreClient::new(server.uri(), "anon");
        let err = client.sign_in("admin@example.com", "wrong").await.unwrap_err();
        assert!(err.to_string().contains("Invalid login credentials"));
    }

    // ==================== Session Tests ====================

    #[tokio::test]
    async fn test_current_user_with_valid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .and(header("authorization", "Bearer jwt-token"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({"id": "u1", "email": null})),
            )
            .mount(&server)
            .await;

        let client = StoreClient::new(server.uri(), "anon").with_access_token("jwt-token");
        let user = client.current_user().await.unwrap().unwrap();
        assert_eq!(user.id, "u1");
        assert!(user.email.is_none());
    }

    #[tokio::test]
    async fn test_current_user_with_expired_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({"msg": "invalid JWT"})),
            )
            .mount(&server)
            .await;

        let client = StoreClient::new(server.uri(), "anon").with_access_token("old");
        assert!(client.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_current_user_server_error_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/v1/user"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let client = StoreClient::new(server.uri(), "anon").with_access_token("jwt");
        assert!(client.current_user().await.is_err());
    }

    #[tokio::test]
    async fn test_sign_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v1/logout"))
            .and(header("authorization", "Bearer jwt-token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = StoreClient::new(server.uri(), "anon").with_access_token("jwt-token");
        client.sign_out().await.unwrap();
    }
}
