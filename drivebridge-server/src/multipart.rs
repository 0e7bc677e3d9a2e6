//! Decoder for `multipart/form-data` request bodies.
//!
//! The upload endpoint receives the complete request body and needs the
//! decoded result in a single step, with parse failures distinguishable from
//! a body that decoded cleanly but carried no file. `axum`'s multipart
//! extractor consumes the body as a stream and folds both cases into one
//! error, so the decoding is done here instead.
//!
//! This covers the subset of RFC 7578 that browsers produce: CRLF line
//! endings, `--boundary` delimiters, and `Content-Disposition: form-data`
//! part headers.

use std::collections::HashMap;

use bytes::Bytes;
use thiserror::Error;

/// Errors from decoding a multipart body.
#[derive(Debug, Error)]
pub enum MultipartError {
    /// The body does not follow the framing declared by the boundary.
    #[error("malformed multipart body: {0}")]
    Parse(&'static str),

    /// The body decoded cleanly but contained no file part.
    #[error("no file part in multipart body")]
    MissingFile,
}

/// A decoded file part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    /// The filename declared in the part's `Content-Disposition` header,
    /// recorded verbatim. Not safe for filesystem use.
    pub file_name: String,
    /// The declared content type of the part, or `application/octet-stream`
    /// if the part declared none.
    pub mime_type: String,
    /// The raw part body.
    pub bytes: Bytes,
}

/// A fully decoded `multipart/form-data` body: text fields plus one file.
#[derive(Debug)]
pub struct Form {
    /// Text form fields by disposition name. A repeated name keeps the last
    /// value.
    pub fields: HashMap<String, String>,
    /// The first file part of the body. Subsequent file parts are ignored.
    pub file: Attachment,
}

impl Form {
    /// Decodes a complete request body delimited by the given boundary.
    pub fn parse(body: &[u8], boundary: &str) -> Result<Self, MultipartError> {
        if boundary.is_empty() {
            return Err(MultipartError::Parse("empty boundary"));
        }

        let delimiter = format!("--{boundary}");
        let closing = format!("\r\n{delimiter}");

        let mut fields = HashMap::new();
        let mut file: Option<Attachment> = None;

        // The body opens with the first delimiter; anything before it is
        // preamble and is skipped.
        let mut rest = match find(body, delimiter.as_bytes()) {
            Some(pos) => &body[pos + delimiter.len()..],
            None => return Err(MultipartError::Parse("opening boundary not found")),
        };

        loop {
            // After a delimiter, "--" terminates the stream and CRLF opens
            // the next part.
            if rest.starts_with(b"--") {
                break;
            }
            rest = rest
                .strip_prefix(b"\r\n")
                .ok_or(MultipartError::Parse("garbage after boundary"))?;

            let header_end = find(rest, b"\r\n\r\n")
                .ok_or(MultipartError::Parse("part headers not terminated"))?;
            let headers = parse_part_headers(&rest[..header_end])?;

            // The part body runs until the next delimiter.
            let content = &rest[header_end + 4..];
            let end = find(content, closing.as_bytes())
                .ok_or(MultipartError::Parse("closing boundary not found"))?;
            let part_body = &content[..end];
            rest = &content[end + closing.len()..];

            match headers.filename {
                // First file part wins, later ones are dropped.
                Some(file_name) => {
                    if file.is_none() {
                        file = Some(Attachment {
                            file_name,
                            mime_type: headers
                                .content_type
                                .unwrap_or_else(|| "application/octet-stream".to_owned()),
                            bytes: Bytes::copy_from_slice(part_body),
                        });
                    }
                }
                None => {
                    let value = String::from_utf8(part_body.to_vec())
                        .map_err(|_| MultipartError::Parse("field value is not valid utf-8"))?;
                    fields.insert(headers.name, value);
                }
            }
        }

        let file = file.ok_or(MultipartError::MissingFile)?;
        Ok(Form { fields, file })
    }
}

struct PartHeaders {
    name: String,
    filename: Option<String>,
    content_type: Option<String>,
}

fn parse_part_headers(raw: &[u8]) -> Result<PartHeaders, MultipartError> {
    let raw = std::str::from_utf8(raw)
        .map_err(|_| MultipartError::Parse("part headers are not valid utf-8"))?;

    let mut name = None;
    let mut filename = None;
    let mut content_type = None;

    for line in raw.split("\r\n") {
        let Some((header, value)) = line.split_once(':') else {
            return Err(MultipartError::Parse("malformed part header"));
        };
        let value = value.trim();

        if header.eq_ignore_ascii_case("content-disposition") {
            for param in value.split(';').map(str::trim) {
                if let Some(v) = param.strip_prefix("name=") {
                    name = Some(unquote(v).to_owned());
                } else if let Some(v) = param.strip_prefix("filename=") {
                    filename = Some(unquote(v).to_owned());
                }
            }
        } else if header.eq_ignore_ascii_case("content-type") {
            content_type = Some(value.to_owned());
        }
    }

    let name = name.ok_or(MultipartError::Parse("part is missing a disposition name"))?;
    Ok(PartHeaders {
        name,
        filename,
        content_type,
    })
}

/// Extracts the boundary token from a `Content-Type` header value.
///
/// Returns `None` unless the header declares `multipart/form-data` with a
/// boundary parameter. Quoted and unquoted boundaries are both accepted.
pub fn boundary(content_type: &str) -> Option<&str> {
    let (kind, params) = content_type.split_once(';')?;
    if !kind.trim().eq_ignore_ascii_case("multipart/form-data") {
        return None;
    }

    params
        .split(';')
        .map(str::trim)
        .find_map(|param| param.strip_prefix("boundary="))
        .map(unquote)
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "X-TEST-BOUNDARY";

    fn field(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(name: &str, filename: &str, content_type: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n\
             {value}\r\n"
        )
    }

    fn close() -> String {
        format!("--{BOUNDARY}--\r\n")
    }

    #[test]
    fn decodes_field_and_file() {
        let body = format!(
            "{}{}{}",
            field("folderId", "F1"),
            file_part("file", "a.txt", "text/plain", "hello"),
            close()
        );

        let form = Form::parse(body.as_bytes(), BOUNDARY).unwrap();
        assert_eq!(form.fields.get("folderId").unwrap(), "F1");
        assert_eq!(form.file.file_name, "a.txt");
        assert_eq!(form.file.mime_type, "text/plain");
        assert_eq!(form.file.bytes.as_ref(), b"hello");
    }

    #[test]
    fn duplicate_field_keeps_last_value() {
        let body = format!(
            "{}{}{}{}",
            field("folderId", "F1"),
            field("folderId", "F2"),
            file_part("file", "a.txt", "text/plain", "x"),
            close()
        );

        let form = Form::parse(body.as_bytes(), BOUNDARY).unwrap();
        assert_eq!(form.fields.get("folderId").unwrap(), "F2");
    }

    #[test]
    fn second_file_part_is_ignored() {
        let body = format!(
            "{}{}{}{}",
            field("folderId", "F1"),
            file_part("file", "first.txt", "text/plain", "first"),
            file_part("file", "second.txt", "text/plain", "second"),
            close()
        );

        let form = Form::parse(body.as_bytes(), BOUNDARY).unwrap();
        assert_eq!(form.file.file_name, "first.txt");
        assert_eq!(form.file.bytes.as_ref(), b"first");
    }

    #[test]
    fn missing_file_is_distinct_from_parse_error() {
        let body = format!("{}{}", field("folderId", "F1"), close());
        let err = Form::parse(body.as_bytes(), BOUNDARY).unwrap_err();
        assert!(matches!(err, MultipartError::MissingFile));

        let err = Form::parse(b"this is not multipart at all", BOUNDARY).unwrap_err();
        assert!(matches!(err, MultipartError::Parse(_)));
    }

    #[test]
    fn wrong_boundary_is_a_parse_error() {
        let body = format!(
            "{}{}",
            file_part("file", "a.txt", "text/plain", "hello"),
            close()
        );
        let err = Form::parse(body.as_bytes(), "some-other-boundary").unwrap_err();
        assert!(matches!(err, MultipartError::Parse(_)));
    }

    #[test]
    fn truncated_body_is_a_parse_error() {
        let full = format!(
            "{}{}",
            file_part("file", "a.txt", "text/plain", "hello"),
            close()
        );
        let truncated = &full.as_bytes()[..full.len() - 12];
        let err = Form::parse(truncated, BOUNDARY).unwrap_err();
        assert!(matches!(err, MultipartError::Parse(_)));
    }

    #[test]
    fn keeps_binary_attachment_bytes() {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"file\"; filename=\"blob.bin\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        let payload = [0x00u8, 0xff, 0x0d, 0x0a, 0x2d, 0x2d, 0x01];
        body.extend_from_slice(&payload);
        body.extend_from_slice(format!("\r\n{}", close()).as_bytes());

        let form = Form::parse(&body, BOUNDARY).unwrap();
        assert_eq!(form.file.bytes.as_ref(), payload);
    }

    #[test]
    fn attachment_without_content_type_defaults_to_octet_stream() {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"a\"\r\n\r\n\
             data\r\n{}",
            close()
        );
        let form = Form::parse(body.as_bytes(), BOUNDARY).unwrap();
        assert_eq!(form.file.mime_type, "application/octet-stream");
    }

    #[test]
    fn filename_is_recorded_verbatim() {
        let body = format!(
            "{}{}",
            file_part("file", "../../etc/passwd", "text/plain", "x"),
            close()
        );
        let form = Form::parse(body.as_bytes(), BOUNDARY).unwrap();
        assert_eq!(form.file.file_name, "../../etc/passwd");
    }

    #[test]
    fn extracts_boundary_from_content_type() {
        assert_eq!(
            boundary("multipart/form-data; boundary=XYZ"),
            Some("XYZ")
        );
        assert_eq!(
            boundary("multipart/form-data; boundary=\"quoted value\""),
            Some("quoted value")
        );
        assert_eq!(
            boundary("multipart/form-data; charset=utf-8; boundary=XYZ"),
            Some("XYZ")
        );
        assert_eq!(boundary("application/json"), None);
        assert_eq!(boundary("multipart/form-data"), None);
        assert_eq!(boundary("text/plain; boundary=XYZ"), None);
    }
}
