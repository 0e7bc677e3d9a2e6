//! The Drive API client used by the request handlers.

use std::fmt;
use std::sync::Arc;

use bytes::{BufMut, Bytes, BytesMut};
use serde::de::DeserializeOwned;

use crate::auth::{Scope, TokenProvider};
use crate::error::ProviderError;
use crate::types::{CreatedFile, FileEntry, FileList};

/// The Google API endpoint.
pub const API_ENDPOINT: &str = "https://www.googleapis.com";

/// Fields requested from the list endpoint.
const LIST_FIELDS: &str = "files(id, name, size, mimeType, createdTime, webViewLink)";

/// Fields requested back when creating a file.
const CREATE_FIELDS: &str = "id, name, webViewLink";

/// Page size cap for folder listings. Folders with more entries are cut off,
/// pagination is out of scope.
const LIST_PAGE_SIZE: &str = "100";

/// Boundary for the `multipart/related` upload body. Generated server-side,
/// never derived from client input.
const UPLOAD_BOUNDARY: &str = "drivebridge-47cd3bfe6e5a4a09";

/// Configuration to initialize a [`DriveClient`].
#[derive(Debug, Default)]
pub struct DriveConfig {
    /// Base URL of the Google APIs, overridable for tests and emulators. When
    /// `None`, [`API_ENDPOINT`] is used.
    pub api_endpoint: Option<String>,
}

/// Client for the Drive v3 API.
///
/// Cheap to clone; one instance is created at server startup and shared with
/// all request handlers.
#[derive(Clone, Debug)]
pub struct DriveClient(Arc<DriveClientInner>);

struct DriveClientInner {
    http: reqwest::Client,
    tokens: Box<dyn TokenProvider>,
    api_endpoint: String,
}

impl fmt::Debug for DriveClientInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriveClient")
            .field("api_endpoint", &self.api_endpoint)
            .field("tokens", &self.tokens)
            .finish_non_exhaustive()
    }
}

impl DriveClient {
    /// Creates a client that authorizes requests through the given token
    /// provider.
    pub fn new(config: DriveConfig, tokens: Box<dyn TokenProvider>, http: reqwest::Client) -> Self {
        let api_endpoint = config
            .api_endpoint
            .unwrap_or_else(|| API_ENDPOINT.to_owned())
            .trim_end_matches('/')
            .to_owned();

        Self(Arc::new(DriveClientInner {
            http,
            tokens,
            api_endpoint,
        }))
    }

    /// Lists the non-trashed children of the given folder.
    ///
    /// Returns at most 100 entries, in the order the API yields them.
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn list_children(&self, folder_id: &str) -> Result<Vec<FileEntry>, ProviderError> {
        let token = self.0.tokens.access_token(Scope::ReadOnly).await?;
        let url = format!("{}/drive/v3/files", self.0.api_endpoint);
        let query = format!("'{folder_id}' in parents and trashed=false");

        let response = self
            .0
            .http
            .get(&url)
            .bearer_auth(token)
            .query(&[
                ("q", query.as_str()),
                ("fields", LIST_FIELDS),
                ("pageSize", LIST_PAGE_SIZE),
            ])
            .send()
            .await?;

        let list: FileList = expect_json(response, "file list").await?;
        Ok(list.files)
    }

    /// Creates a file with the given name and contents inside a folder.
    ///
    /// This performs a `multipart/related` upload: a JSON metadata part
    /// naming the file and its parent folder, followed by the media part.
    #[tracing::instrument(level = "debug", skip(self, contents), fields(len = contents.len()))]
    pub async fn create_file(
        &self,
        name: &str,
        mime_type: &str,
        folder_id: &str,
        contents: &[u8],
    ) -> Result<CreatedFile, ProviderError> {
        let token = self.0.tokens.access_token(Scope::File).await?;
        let url = format!("{}/upload/drive/v3/files", self.0.api_endpoint);

        let metadata = serde_json::json!({
            "name": name,
            "parents": [folder_id],
        });
        let body = related_body(&metadata.to_string(), mime_type, contents);

        let response = self
            .0
            .http
            .post(&url)
            .bearer_auth(token)
            .query(&[("uploadType", "multipart"), ("fields", CREATE_FIELDS)])
            .header(
                reqwest::header::CONTENT_TYPE,
                format!("multipart/related; boundary={UPLOAD_BOUNDARY}"),
            )
            .body(body)
            .send()
            .await?;

        expect_json(response, "created file").await
    }
}

/// Serializes the two-part `multipart/related` upload body.
fn related_body(metadata: &str, mime_type: &str, contents: &[u8]) -> Bytes {
    let mut body = BytesMut::with_capacity(metadata.len() + contents.len() + 256);
    body.put(format!("--{UPLOAD_BOUNDARY}\r\n").as_bytes());
    body.put(&b"Content-Type: application/json; charset=UTF-8\r\n\r\n"[..]);
    body.put(metadata.as_bytes());
    body.put(format!("\r\n--{UPLOAD_BOUNDARY}\r\n").as_bytes());
    body.put(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
    body.put(contents);
    body.put(format!("\r\n--{UPLOAD_BOUNDARY}--").as_bytes());
    body.freeze()
}

async fn expect_json<T: DeserializeOwned>(
    response: reqwest::Response,
    context: &str,
) -> Result<T, ProviderError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ProviderError::UnexpectedStatus { status, body });
    }

    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|cause| ProviderError::Json {
        context: context.to_owned(),
        cause,
    })
}
