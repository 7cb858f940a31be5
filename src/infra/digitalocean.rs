//! DigitalOcean API client: implements the `CloudApi` port with `ureq`.

use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::application::ports::{CloudApi, RemoteKey};
use crate::domain::error::ProvisionError;

/// Page size for list endpoints (the API maximum).
const PER_PAGE: &str = "200";
/// Upper bound on pages fetched from one list endpoint.
const MAX_PAGES: u32 = 50;

#[derive(Deserialize)]
struct ApiKey {
    id: u64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    fingerprint: String,
    #[serde(default)]
    public_key: String,
}

impl From<ApiKey> for RemoteKey {
    fn from(k: ApiKey) -> Self {
        Self {
            id: k.id,
            name: k.name,
            fingerprint: k.fingerprint,
            public_key: k.public_key,
        }
    }
}

#[derive(Deserialize)]
struct KeysPage {
    #[serde(default)]
    ssh_keys: Vec<ApiKey>,
    #[serde(default)]
    links: Links,
}

#[derive(Deserialize, Default)]
struct Links {
    #[serde(default)]
    pages: Option<Pages>,
}

#[derive(Deserialize)]
struct Pages {
    #[serde(default)]
    next: Option<String>,
}

#[derive(Deserialize)]
struct KeyEnvelope {
    ssh_key: ApiKey,
}

#[derive(Deserialize)]
struct DropletsPage {
    #[serde(default)]
    droplets: Vec<ApiDroplet>,
}

#[derive(Deserialize)]
struct ApiDroplet {
    name: String,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Blocking client for the account-keys and droplets endpoints.
pub struct DigitalOceanClient {
    agent: ureq::Agent,
    base_url: String,
    token: String,
}

impl DigitalOceanClient {
    #[must_use]
    pub fn new(base_url: &str, token: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(timeout)
            .user_agent(concat!("dropship/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorized(&self, req: ureq::Request) -> ureq::Request {
        req.set("Authorization", &format!("Bearer {}", self.token))
            .set("Accept", "application/json")
    }

    fn send(
        &self,
        operation: &'static str,
        req: ureq::Request,
        body: Option<&serde_json::Value>,
    ) -> Result<String> {
        tracing::debug!(operation, url = req.url(), "api request");
        let req = self.authorized(req);
        let result = match body {
            Some(b) => req
                .set("Content-Type", "application/json")
                .send_string(&b.to_string()),
            None => req.call(),
        };
        match result {
            Ok(resp) => resp.into_string().map_err(|e| {
                ProvisionError::Api {
                    operation,
                    status: None,
                    message: format!("reading response: {e}"),
                }
                .into()
            }),
            Err(ureq::Error::Status(code, resp)) => {
                let body = resp.into_string().unwrap_or_default();
                let message = serde_json::from_str::<ApiErrorBody>(&body)
                    .map(|b| b.message)
                    .unwrap_or_else(|_| body.trim().to_string());
                tracing::debug!(operation, code, "api error");
                Err(ProvisionError::Api {
                    operation,
                    status: Some(code),
                    message: if message.is_empty() {
                        "no details".to_string()
                    } else {
                        message
                    },
                }
                .into())
            }
            Err(ureq::Error::Transport(t)) => Err(ProvisionError::Api {
                operation,
                status: None,
                message: t.to_string(),
            }
            .into()),
        }
    }

    fn parse<T: DeserializeOwned>(operation: &'static str, body: &str) -> Result<T> {
        serde_json::from_str(body).map_err(|e| {
            ProvisionError::Api {
                operation,
                status: None,
                message: format!("unexpected response: {e}"),
            }
            .into()
        })
    }
}

impl CloudApi for DigitalOceanClient {
    fn list_keys(&self) -> Result<Vec<RemoteKey>> {
        const OP: &str = "list keys";
        let mut keys = Vec::new();
        for page in 1..=MAX_PAGES {
            let page_str = page.to_string();
            let req = self
                .agent
                .get(&self.url("/v2/account/keys"))
                .query("page", &page_str)
                .query("per_page", PER_PAGE);
            let body = self.send(OP, req, None)?;
            let parsed: KeysPage = Self::parse(OP, &body)?;
            let fetched = parsed.ssh_keys.len();
            keys.extend(parsed.ssh_keys.into_iter().map(RemoteKey::from));
            let has_next = parsed.links.pages.and_then(|p| p.next).is_some();
            if fetched == 0 || !has_next {
                break;
            }
        }
        Ok(keys)
    }

    fn create_key(&self, name: &str, public_key: &str) -> Result<RemoteKey> {
        const OP: &str = "create key";
        let req = self.agent.post(&self.url("/v2/account/keys"));
        let body = serde_json::json!({ "name": name, "public_key": public_key });
        let resp = self.send(OP, req, Some(&body))?;
        let parsed: KeyEnvelope = Self::parse(OP, &resp)?;
        Ok(parsed.ssh_key.into())
    }

    fn droplet_exists(&self, name: &str) -> Result<bool> {
        const OP: &str = "list droplets";
        let req = self
            .agent
            .get(&self.url("/v2/droplets"))
            .query("name", name)
            .query("per_page", PER_PAGE);
        let body = self.send(OP, req, None)?;
        let parsed: DropletsPage = Self::parse(OP, &body)?;
        Ok(parsed.droplets.iter().any(|d| d.name == name))
    }
}
