//! Container registry tag listing.
//!
//! Tags are read through the distribution API with `oci-distribution`, which
//! owns reference normalization (Docker Hub's `library/` namespace) and the
//! token authentication flow. The async client is driven by a current-thread
//! tokio runtime so callers stay synchronous.

use oci_distribution::client::{ClientConfig, ClientProtocol};
use oci_distribution::errors::{OciDistributionError, OciErrorCode};
use oci_distribution::secrets::RegistryAuth;
use oci_distribution::{Client, Reference};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use crate::error::{Result, SverError};

/// Registry used when none is configured
pub const DEFAULT_SERVER: &str = "https://registry-1.docker.io/";

/// Tags requested per page
pub const DEFAULT_PAGE_SIZE: usize = 100;

const DOCKER_HUB_HOSTS: [&str; 3] = ["docker.io", "index.docker.io", "registry-1.docker.io"];

/// Source of already-published tags for an image
pub trait TagSource {
    /// All tags of `image`; an unknown repository yields an empty list
    fn list_tags(&self, image: &str) -> Result<Vec<String>>;
}

/// Basic credentials for a registry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// `None` when no username is given
    pub fn from_parts(username: Option<String>, password: Option<String>) -> Option<Self> {
        match username {
            Some(username) if !username.is_empty() => Some(Credentials {
                username,
                password: password.unwrap_or_default(),
            }),
            _ => None,
        }
    }
}

/// Lists tags of images in one registry
pub struct RegistryClient {
    client: Client,
    runtime: Runtime,
    host: Option<String>,
    credentials: Option<Credentials>,
    page_size: usize,
}

impl RegistryClient {
    /// Client for `server`, given as a URL or a bare host
    ///
    /// An `http://` server is spoken to over plain HTTP; anything else uses
    /// HTTPS. Docker Hub host names all resolve to Docker Hub.
    pub fn new(server: &str, credentials: Option<Credentials>) -> Result<Self> {
        let (protocol, host) = parse_server(server)?;
        let config = ClientConfig {
            protocol,
            ..Default::default()
        };

        Ok(RegistryClient {
            client: Client::new(config),
            runtime: Builder::new_current_thread().enable_all().build()?,
            host,
            credentials,
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Number of tags requested per page
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Reference to `image` on this registry
    pub fn reference(&self, image: &str) -> Result<Reference> {
        let image = image.trim_matches('/');
        let qualified = match &self.host {
            Some(host) => format!("{}/{}", host, image),
            None => image.to_string(),
        };

        parse_reference(&qualified)
    }

    fn get_auth(&self) -> RegistryAuth {
        match &self.credentials {
            Some(creds) => RegistryAuth::Basic(creds.username.clone(), creds.password.clone()),
            None => RegistryAuth::Anonymous,
        }
    }

    /// All tags of `image`, page by page.
    ///
    /// A repository the registry does not know yields an empty list. Rejected
    /// credentials are reported as [`SverError::RegistryAuthFailed`].
    pub fn fetch_tags(&self, image: &str) -> Result<Vec<String>> {
        let reference = self.reference(image)?;
        let auth = self.get_auth();
        debug!(registry = %reference.registry(), repository = %reference.repository(), "listing registry tags");

        let mut tags: Vec<String> = Vec::new();
        let mut last: Option<String> = None;

        loop {
            let page = self.runtime.block_on(self.client.list_tags(
                &reference,
                &auth,
                Some(self.page_size),
                last.as_deref(),
            ));

            let page = match page {
                Ok(page) => page.tags,
                Err(e) if last.is_none() && is_not_found(&e) => {
                    debug!(%image, "repository not found");
                    return Ok(Vec::new());
                }
                Err(e) => return Err(classify(e)),
            };

            // A registry ignoring `last` serves the same page again.
            if last.is_some() && page.last() == last.as_ref() {
                break;
            }

            let full = page.len() >= self.page_size;
            last = page.last().cloned();
            tags.extend(page);

            if !full || last.is_none() {
                break;
            }
        }

        debug!(count = tags.len(), %image, "listed registry tags");
        Ok(tags)
    }
}

impl TagSource for RegistryClient {
    fn list_tags(&self, image: &str) -> Result<Vec<String>> {
        self.fetch_tags(image)
    }
}

/// Protocol and host of a server setting; `None` host means Docker Hub
fn parse_server(server: &str) -> Result<(ClientProtocol, Option<String>)> {
    let server = server.trim();
    let (protocol, rest) = if let Some(rest) = server.strip_prefix("http://") {
        (ClientProtocol::Http, rest)
    } else if let Some(rest) = server.strip_prefix("https://") {
        (ClientProtocol::Https, rest)
    } else if server.contains("://") {
        return Err(SverError::config(format!(
            "unsupported registry scheme in '{}'",
            server
        )));
    } else {
        (ClientProtocol::Https, server)
    };

    let host = rest.split('/').next().unwrap_or_default();
    if host.is_empty() {
        return Err(SverError::config(format!(
            "registry server '{}' has no host",
            server
        )));
    }

    if DOCKER_HUB_HOSTS.contains(&host) {
        Ok((protocol, None))
    } else {
        Ok((protocol, Some(host.to_string())))
    }
}

fn parse_reference(image: &str) -> Result<Reference> {
    image.parse().map_err(|e: oci_distribution::ParseError| {
        SverError::registry(format!("invalid image reference '{}': {}", image, e))
    })
}

fn is_not_found(err: &OciDistributionError) -> bool {
    match err {
        OciDistributionError::ServerError { code, .. } => *code == 404,
        OciDistributionError::RegistryError { envelope, .. } => envelope
            .errors
            .iter()
            .any(|e| matches!(e.code, OciErrorCode::NameUnknown)),
        _ => false,
    }
}

/// Map registry failures onto sver errors
fn classify(err: OciDistributionError) -> SverError {
    let auth_failed = match &err {
        OciDistributionError::AuthenticationFailure(_)
        | OciDistributionError::UnauthorizedError { .. } => true,
        OciDistributionError::ServerError { code, .. } => *code == 401 || *code == 403,
        OciDistributionError::RegistryError { envelope, .. } => envelope
            .errors
            .iter()
            .any(|e| matches!(e.code, OciErrorCode::Unauthorized | OciErrorCode::Denied)),
        _ => false,
    };

    if auth_failed {
        SverError::RegistryAuthFailed(err.to_string())
    } else if is_not_found(&err) {
        SverError::registry(format!("tag listing stopped midway: {}", err))
    } else {
        SverError::Oci(err)
    }
}
