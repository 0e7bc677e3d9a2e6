use serde::{Deserialize, Serialize};

/// A file as returned by the Drive `files.list` endpoint.
///
/// Only the fields requested by the list query are populated, everything else
/// the API may return is ignored. Refer to
/// <https://developers.google.com/drive/api/reference/rest/v3/files#File>.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// The opaque file ID assigned by Drive.
    pub id: String,
    /// The file name.
    pub name: String,
    /// The size in bytes, as a decimal string. Folders and shortcuts carry no
    /// size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    /// The MIME type Drive associates with the file.
    pub mime_type: String,
    /// RFC 3339 creation timestamp.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_time: Option<String>,
    /// A link for opening the file in a browser.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_view_link: Option<String>,
}

/// Envelope of the `files.list` response.
#[derive(Debug, Deserialize)]
pub(crate) struct FileList {
    pub(crate) files: Vec<FileEntry>,
}

/// The file identity returned by the `files.create` endpoint.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFile {
    /// The ID Drive assigned to the new file.
    pub id: String,
    /// The stored file name.
    pub name: String,
    /// A link for opening the file in a browser.
    pub web_view_link: Option<String>,
}
