//! File attachments.
//!
//! An attachment is either read from disk (file mode) or given directly
//! (manual mode). Both set the body and a `Content-Disposition` header.

use std::io;
use std::path::{Path, PathBuf};

use axum::body::Bytes;
use axum::http::{header, HeaderValue};

use crate::http::error::{ResponseError, ResponseResult};
use crate::http::response::ResponseBuilder;

/// Description of an attachment, built with chained setters.
#[derive(Debug, Clone, Default)]
pub struct Attachment {
    path: Option<PathBuf>,
    content: Option<Bytes>,
    filename: Option<String>,
    inline: bool,
}

impl Attachment {
    /// Attach the file at `path`; the filename defaults to its last component.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Attach in-memory content. Both `content` and `filename` are required.
    pub fn manual() -> Self {
        Self::default()
    }

    /// Ignored in file mode.
    pub fn content(mut self, content: impl Into<Bytes>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    pub fn inline(mut self, inline: bool) -> Self {
        self.inline = inline;
        self
    }
}

/// `Content-Disposition` value for `filename`.
pub fn content_disposition(filename: &str, inline: bool) -> ResponseResult<HeaderValue> {
    let style = if inline { "inline" } else { "attachment" };
    Ok(HeaderValue::from_str(&format!(
        "{}; filename='{}'",
        style, filename
    ))?)
}

impl ResponseBuilder {
    /// Use `attachment` as the response body.
    ///
    /// Nothing is modified when this returns an error.
    pub async fn attach(&mut self, attachment: Attachment) -> ResponseResult<()> {
        let Attachment {
            path,
            content,
            filename,
            inline,
        } = attachment;

        let (body, filename) = match path {
            Some(path) => {
                if content.is_some() {
                    tracing::debug!(path = %path.display(), "Ignoring manual content for file attachment");
                }
                let body = read_file(&path).await?;
                let filename = match filename {
                    Some(name) => name,
                    None => path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .ok_or(ResponseError::MissingFilename)?,
                };
                (body, filename)
            }
            None => {
                let body = content.ok_or(ResponseError::MissingContent)?;
                let filename = filename.ok_or(ResponseError::MissingFilename)?;
                (body, filename)
            }
        };

        let disposition = content_disposition(&filename, inline)?;
        tracing::debug!(
            filename = %filename,
            inline,
            bytes = body.len(),
            "Attaching content"
        );

        self.set_content(body);
        self.insert_header(header::CONTENT_DISPOSITION, disposition);
        Ok(())
    }
}

async fn read_file(path: &Path) -> ResponseResult<Bytes> {
    let metadata = match tokio::fs::metadata(path).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ResponseError::FileNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };
    if !metadata.is_file() {
        return Err(ResponseError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    Ok(Bytes::from(tokio::fs::read(path).await?))
}
