//! HTTP session against the console REST API (v3).
//!
//! The v3 API authenticates every request with HTTP basic auth. A [`Session`]
//! holds the credentials that passed the login check and drops them on logout,
//! after which every call fails with `RemoteError::NotAuthenticated`.

use log::{debug, error, info, warn};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::wire::{
    AlertBody, AlertResource, CreatedReference, ErrorBody, Resources, ScanTemplateResource,
    ScheduleBody, SiteCreateBody, SiteResource,
};
use super::{ConsoleSession, SiteApi};
use crate::config::{
    RunConfig, API_INFO_PATH, API_SCAN_TEMPLATES_PATH, API_SITES_PATH, DEFAULT_TIMEOUT_SECS,
    SITE_PAGE_SIZE,
};
use crate::error_handling::{AuthError, InitializationError, RemoteError};
use crate::initialization::{console_base_url, init_client};
use crate::models::{AlertConfig, NewSite, SiteId, SiteRef, SiteSummary};

/// Opens sessions against one console.
#[derive(Debug, Clone)]
pub struct Connector {
    base_url: Url,
    timeout_seconds: u64,
    accept_invalid_certs: bool,
}

impl Connector {
    /// Connector for the console at `base_url` with default client settings.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            accept_invalid_certs: false,
        }
    }

    /// Connector for the console and client settings named in `config`.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::BaseUrlError` if host and port do not form
    /// a valid URL.
    pub fn from_config(config: &RunConfig) -> Result<Self, InitializationError> {
        let base_url = console_base_url(&config.host, config.port)?;
        Ok(Self::new(base_url)
            .timeout_seconds(config.timeout_seconds)
            .accept_invalid_certs(config.accept_invalid_certs))
    }

    pub fn timeout_seconds(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Logs in as `username` and returns the authenticated session.
    ///
    /// # Errors
    ///
    /// - `AuthError::Rejected` if the console refuses the credentials (401/403)
    /// - `AuthError::Unexpected` for any other non-success status
    /// - `AuthError::Unreachable` if the request does not complete
    /// - `AuthError::Client` if the HTTP client or login URL cannot be built
    pub async fn connect(&self, username: &str, password: &str) -> Result<Session, AuthError> {
        let client = init_client(self.timeout_seconds, self.accept_invalid_certs)?;
        let host = self.base_url.host_str().unwrap_or_default().to_string();
        let login_url =
            self.base_url
                .join(API_INFO_PATH)
                .map_err(|source| InitializationError::BaseUrlError {
                    address: self.base_url.to_string(),
                    source,
                })?;

        debug!("Checking credentials of {} against {}", username, login_url);
        let response = client
            .get(login_url)
            .basic_auth(username, Some(password))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| AuthError::Unreachable {
                host: host.clone(),
                source,
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AuthError::Rejected {
                host,
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(AuthError::Unexpected {
                host,
                status: status.as_u16(),
            });
        }

        info!("Logged in to {} as {}", host, username);
        Ok(Session {
            client,
            base_url: self.base_url.clone(),
            credentials: Some(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }),
        })
    }
}

struct Credentials {
    username: String,
    password: String,
}

/// An authenticated console session.
///
/// Dropping the session logs it out.
pub struct Session {
    client: reqwest::Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl Session {
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, RemoteError> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or(RemoteError::NotAuthenticated)?;
        let url = self
            .base_url
            .join(path)
            .map_err(|source| RemoteError::Url {
                resource: format!("{} /{}", method, path),
                source,
            })?;
        debug!("{} {}", method, url);
        Ok(self
            .client
            .request(method, url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .header(ACCEPT, "application/json"))
    }

    async fn send(
        &self,
        request: RequestBuilder,
        resource: String,
    ) -> Result<(Response, String), RemoteError> {
        let response = match request.send().await {
            Ok(response) => response,
            Err(source) => return Err(RemoteError::Transport { resource, source }),
        };

        let status = response.status();
        if status.is_success() {
            return Ok((response, resource));
        }

        // Best effort: the console usually explains the failure in a JSON body
        let message = response
            .text()
            .await
            .ok()
            .and_then(|text| serde_json::from_str::<ErrorBody>(&text).ok())
            .and_then(|body| body.message);
        Err(RemoteError::Status {
            resource,
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, RemoteError> {
        let request = self.request(Method::GET, path)?.query(query);
        let (response, resource) = self.send(request, format!("GET /{}", path)).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| RemoteError::Decode { resource, source })
    }

    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let request = self.request(Method::POST, path)?.json(body);
        let (response, resource) = self.send(request, format!("POST /{}", path)).await?;
        response
            .json::<T>()
            .await
            .map_err(|source| RemoteError::Decode { resource, source })
    }

    async fn post_discard<B: Serialize>(&self, path: &str, body: &B) -> Result<(), RemoteError> {
        let request = self.request(Method::POST, path)?.json(body);
        self.send(request, format!("POST /{}", path)).await?;
        Ok(())
    }

    async fn delete_site(&self, id: SiteId) -> Result<(), RemoteError> {
        let path = format!("{}/{}", API_SITES_PATH, id);
        let request = self.request(Method::DELETE, &path)?;
        self.send(request, format!("DELETE /{}", path)).await?;
        Ok(())
    }

    async fn scan_template_name(&self, template_id: &str) -> Result<String, RemoteError> {
        if template_id.is_empty() {
            return Ok(String::new());
        }
        let path = format!("{}/{}", API_SCAN_TEMPLATES_PATH, template_id);
        let template: ScanTemplateResource = self.get_json(&path, &[]).await?;
        Ok(template.name)
    }

    async fn add_schedules_and_alerts(&self, id: SiteId, site: &NewSite) -> Result<(), RemoteError> {
        for schedule in &site.schedules {
            let path = format!("{}/{}/scan_schedules", API_SITES_PATH, id);
            self.post_discard(&path, &ScheduleBody::from(schedule))
                .await?;
        }

        for alert in &site.alerts {
            let Some((segment, body)) = AlertBody::from_alert(alert) else {
                warn!(
                    "Site {}: skipping alert '{}' of a notification type that cannot be recreated",
                    id, alert.name
                );
                continue;
            };
            let path = format!("{}/{}/alerts/{}", API_SITES_PATH, id, segment);
            self.post_discard(&path, &body).await?;
        }
        Ok(())
    }
}

impl SiteApi for Session {
    async fn list_sites(&self) -> Result<Vec<SiteRef>, RemoteError> {
        let mut sites = Vec::new();
        let mut page = 0u32;
        loop {
            let query = [
                ("page", page.to_string()),
                ("size", SITE_PAGE_SIZE.to_string()),
            ];
            let batch: Resources<SiteResource> = self.get_json(API_SITES_PATH, &query).await?;
            sites.extend(batch.resources.into_iter().map(SiteRef::from));
            page += 1;
            match batch.page {
                Some(info) if page < info.total_pages => continue,
                _ => break,
            }
        }
        debug!("Console reports {} sites", sites.len());
        Ok(sites)
    }

    async fn load_site(&self, id: SiteId) -> Result<SiteSummary, RemoteError> {
        let site_path = format!("{}/{}", API_SITES_PATH, id);
        let site: SiteResource = self.get_json(&site_path, &[]).await?;

        let scan_template_id = site.scan_template.unwrap_or_default();
        let scan_template_name = self.scan_template_name(&scan_template_id).await?;

        let alerts_path = format!("{}/{}/alerts", API_SITES_PATH, id);
        let alerts: Resources<AlertResource> = self.get_json(&alerts_path, &[]).await?;

        Ok(SiteSummary {
            id: SiteId(site.id),
            name: site.name,
            description: site.description.unwrap_or_default(),
            scan_template_id,
            scan_template_name,
            alerts: alerts.resources.into_iter().map(AlertConfig::from).collect(),
        })
    }

    async fn save_site(&self, site: &NewSite) -> Result<SiteId, RemoteError> {
        let created: CreatedReference = self
            .post_json(API_SITES_PATH, &SiteCreateBody::from(site))
            .await?;
        let id = SiteId(created.id);
        debug!("Created site {} ('{}')", id, site.name);

        if let Err(e) = self.add_schedules_and_alerts(id, site).await {
            warn!(
                "Site {} ('{}') was created but is incomplete, removing it: {}",
                id, site.name, e
            );
            if let Err(rollback) = self.delete_site(id).await {
                error!("Site {} ('{}') is left on the console: {}", id, site.name, rollback);
                return Err(RemoteError::Incomplete {
                    site: id,
                    source: Box::new(e),
                });
            }
            return Err(e);
        }
        Ok(id)
    }
}

impl ConsoleSession for Session {
    fn is_authenticated(&self) -> bool {
        self.credentials.is_some()
    }

    fn logout(&mut self) {
        if let Some(credentials) = self.credentials.take() {
            info!(
                "Logged out of {} as {}",
                self.base_url.host_str().unwrap_or_default(),
                credentials.username
            );
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.logout();
    }
}
