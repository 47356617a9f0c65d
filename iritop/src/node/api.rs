//! Node API
//!
//! The IRI node exposes a single JSON-over-HTTP endpoint; each call is a
//! POST carrying `{"command": "..."}`. Only the two read-only commands the
//! dashboard needs are wrapped here.

use super::model::{NodeSnapshot, PeerRecord};
use crate::Error;

use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Value of the `X-IOTA-API-Version` header sent with every request.
pub const API_VERSION: &str = "1";

/// Source of node data. Both calls must be idempotent reads.
pub trait NodeApi {
    fn node_info(&self) -> Result<NodeSnapshot, Error>;
    fn neighbors(&self) -> Result<Vec<PeerRecord>, Error>;
}

/// HTTP basic auth, for nodes sitting behind an authenticating proxy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

pub struct HttpNodeApi {
    client: Client,
    url: Url,
    credentials: Option<Credentials>,
}

#[derive(Deserialize)]
struct NeighborsReply {
    neighbors: Vec<PeerRecord>,
}

impl HttpNodeApi {
    pub fn new(
        url: &str,
        credentials: Option<Credentials>,
        timeout: Duration,
    ) -> Result<HttpNodeApi, Error> {
        let url = parse_node_url(url)?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpNodeApi {
            client,
            url,
            credentials,
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    fn command<T: DeserializeOwned>(&self, command: &'static str) -> Result<T, Error> {
        let mut request = self
            .client
            .post(self.url.clone())
            .header("X-IOTA-API-Version", API_VERSION)
            .json(&serde_json::json!({ "command": command }));
        if let Some(creds) = &self.credentials {
            request = request.basic_auth(&creds.username, Some(&creds.password));
        }

        let response = request.send()?;
        let status = response.status();
        let body = response.text()?;
        debug!(command, status = status.as_u16(), bytes = body.len(), "node reply");

        if !status.is_success() {
            return Err(Error::Status {
                code: status.as_u16(),
                body,
            });
        }
        serde_json::from_str(&body).map_err(|source| Error::Malformed { command, source })
    }
}

impl NodeApi for HttpNodeApi {
    fn node_info(&self) -> Result<NodeSnapshot, Error> {
        self.command("getNodeInfo")
    }

    fn neighbors(&self) -> Result<Vec<PeerRecord>, Error> {
        self.command::<NeighborsReply>("getNeighbors")
            .map(|reply| reply.neighbors)
    }
}

/// Issues both requests concurrently and returns only once both are in, so
/// callers never see node info and neighbors from different moments.
pub fn fetch<A: NodeApi + Sync>(api: &A) -> Result<(NodeSnapshot, Vec<PeerRecord>), Error> {
    let (info, neighbors) = crossbeam::thread::scope(|s| {
        let neighbors = s.spawn(|_| api.neighbors());
        let info = api.node_info();
        (info, neighbors.join())
    })
    .map_err(|_| Error::WorkerPanicked)?;

    let neighbors = neighbors.map_err(|_| Error::WorkerPanicked)?;
    Ok((info?, neighbors?))
}

/// Accepts `http(s)://host[:port][/path]` where host is a DNS name,
/// `localhost`, an IPv4 address or a bracketed IPv6 address.
pub fn parse_node_url(raw: &str) -> Result<Url, Error> {
    let invalid = || Error::InvalidUrl(raw.to_string());

    let lower = raw.to_ascii_lowercase();
    if !(lower.starts_with("http://") || lower.starts_with("https://")) {
        return Err(invalid());
    }
    let url = Url::parse(raw).map_err(|_| invalid())?;
    if url.host_str().is_none() || url.port() == Some(0) {
        return Err(invalid());
    }
    if let Some(domain) = url.domain() {
        if !valid_domain(domain) {
            return Err(invalid());
        }
    }
    Ok(url)
}

fn valid_domain(domain: &str) -> bool {
    let domain = domain.strip_suffix('.').unwrap_or(domain);
    !domain.is_empty()
        && domain.split('.').all(|label| {
            !label.is_empty()
                && label.len() <= 63
                && !label.starts_with('-')
                && !label.ends_with('-')
                && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
        })
}
