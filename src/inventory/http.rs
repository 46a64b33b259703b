//! HTTP implementation of the inventory client

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::error::{InventoryError, InventoryResult};
use super::InventoryClient;
use crate::types::{NewFileRecord, RemoteFileRecord};

/// Header announcing the client version to the server
const CLIENT_VERSION_HEADER: &str = "X-Client-Version";

/// Query parameter the inventory uses for exact hash equality
const HASH_QUERY_PARAM: &str = "md5_eq";

/// Version information published by the inventory server
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VersionInfo {
    pub version: String,
    pub min_client_version: String,
}

/// Blocking HTTP client for the inventory's files endpoint
pub struct HttpInventory {
    client: Client,
    files_url: Url,
    token: Option<String>,
}

impl HttpInventory {
    /// Create a client for `files_url` with a per-call timeout
    pub fn new(files_url: Url, token: Option<String>, timeout: Duration) -> InventoryResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            files_url,
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// The endpoint records are queried from and posted to
    pub fn files_url(&self) -> &Url {
        &self.files_url
    }

    /// Fetch the server's version and minimum supported client version
    pub fn server_version(&self) -> InventoryResult<VersionInfo> {
        let url = self.files_url.join("/version")?;
        let response = self.authorize(self.client.get(url)).send()?;
        Ok(check_status(response)?.json()?)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header(CLIENT_VERSION_HEADER, crate::VERSION);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl InventoryClient for HttpInventory {
    fn query_by_hash(&self, hash: &str) -> InventoryResult<Vec<RemoteFileRecord>> {
        debug!(hash, "querying inventory");
        let request = self
            .client
            .get(self.files_url.clone())
            .query(&[(HASH_QUERY_PARAM, hash)]);
        let response = check_status(self.authorize(request).send()?)?;
        Ok(response.json()?)
    }

    fn create(&self, record: &NewFileRecord) -> InventoryResult<()> {
        debug!(path = %record.full_path, status = %record.duplicate_status, "posting record");
        let request = self.client.post(self.files_url.clone()).json(record);
        check_status(self.authorize(request).send()?)?;
        Ok(())
    }
}

/// Turn a non-2xx response into an error carrying the body text
fn check_status(response: Response) -> InventoryResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .unwrap_or_else(|_| "Unable to read error message".to_string());
    Err(InventoryError::Status {
        status: status.as_u16(),
        body,
    })
}
