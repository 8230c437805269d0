use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use super::records::{decode_candidates, decode_detail};
use super::{AccountDetail, AccountsApi, AccountsError, Candidate, LifecycleState};
use crate::config::Settings;

/// Filter selecting inactive training accounts awaiting cleanup.
pub const CANDIDATE_QUERY: &[(&str, &str)] = &[
    ("user_type", "TRAINING"),
    ("lifecycle_state", "AWAITING_CLEANUP"),
    ("is_active", "false"),
];

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Authenticated accounts portal client exposing a synchronous facade over
/// reqwest. The bearer token is acquired once in [`HttpAccountsClient::connect`];
/// dropping the client closes its connection pool and runtime.
pub struct HttpAccountsClient {
    http: Client,
    runtime: Runtime,
    users_endpoint: String,
    access_token: SecretString,
}

impl HttpAccountsClient {
    pub fn connect(settings: &Settings) -> Result<Self, AccountsError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|err| AccountsError::Runtime(err.to_string()))?;
        let http = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        let access_token = runtime.block_on(request_token(&http, settings))?;
        info!(
            token_endpoint = %settings.token_endpoint,
            "authenticated with accounts API"
        );

        Ok(Self {
            http,
            runtime,
            users_endpoint: settings.data_endpoints.users.clone(),
            access_token,
        })
    }

    fn send(&self, request: RequestBuilder) -> Result<Vec<u8>, AccountsError> {
        self.runtime.block_on(async {
            let response = request
                .bearer_auth(self.access_token.expose_secret())
                .header(ACCEPT, "application/json")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Err(AccountsError::Status {
                    status: status.as_u16(),
                    url: response.url().to_string(),
                });
            }

            Ok::<_, AccountsError>(response.bytes().await?.to_vec())
        })
    }
}

impl std::fmt::Debug for HttpAccountsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpAccountsClient")
            .field("users_endpoint", &self.users_endpoint)
            .finish_non_exhaustive()
    }
}

impl AccountsApi for HttpAccountsClient {
    fn list_candidates(&self) -> Result<Vec<Candidate>, AccountsError> {
        let body = self.send(self.http.get(&self.users_endpoint).query(CANDIDATE_QUERY))?;
        decode_candidates(&body)
    }

    fn fetch_detail(&self, candidate: &Candidate) -> Result<AccountDetail, AccountsError> {
        debug!(
            username = %candidate.username,
            url = %candidate.api_url,
            "fetching account detail"
        );
        let body = self.send(self.http.get(&candidate.api_url))?;
        decode_detail(&body)
    }

    fn mark_normal(&self, candidate: &Candidate) -> Result<(), AccountsError> {
        let form = [("lifecycle_state", LifecycleState::Normal.as_str())];
        self.send(self.http.patch(&candidate.api_url).form(&form))?;
        Ok(())
    }
}

/// Client-credentials grant with HTTP Basic client authentication.
async fn request_token(http: &Client, settings: &Settings) -> Result<SecretString, AccountsError> {
    let scope = settings.scope();
    let response = http
        .post(&settings.token_endpoint)
        .basic_auth(
            &settings.client_id,
            Some(settings.client_secret.expose_secret()),
        )
        .header(ACCEPT, "application/json")
        .form(&[
            ("grant_type", "client_credentials"),
            ("scope", scope.as_str()),
        ])
        .send()
        .await
        .map_err(|err| AccountsError::Authentication(err.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(AccountsError::Authentication(format!(
            "token endpoint returned {status}"
        )));
    }

    let body = response
        .bytes()
        .await
        .map_err(|err| AccountsError::Authentication(err.to_string()))?;
    let token: TokenResponse = serde_json::from_slice(&body).map_err(|err| {
        AccountsError::Authentication(format!("token response carried no access token: {err}"))
    })?;

    Ok(SecretString::from(token.access_token))
}
