//! Conversion of uploaded documents into plain text.

mod docx;
mod pdf;

#[cfg(test)]
pub(crate) use docx::tests::make_docx;
#[cfg(test)]
pub(crate) use pdf::tests::make_pdf;

use std::error::Error as StdError;
use std::fmt::{self, Display, Formatter};
use std::str;

use mime::Mime;

/// Media type of OOXML word-processing documents.
pub const DOCX_MEDIA_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

type BoxedError = Box<dyn StdError + Send + Sync + 'static>;

/// The closed set of document formats that can be extracted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// UTF-8 plain text.
    PlainText,
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing document.
    Docx,
}

impl DocumentFormat {
    /// Resolves a declared media type.
    ///
    /// Parameters such as `charset` are ignored and the comparison is
    /// case-insensitive. Returns `None` for anything outside the supported
    /// set, including strings that are not media types at all.
    pub fn from_media_type(media_type: &str) -> Option<Self> {
        let mime = media_type.trim().parse::<Mime>().ok()?;
        let essence = mime.essence_str().to_ascii_lowercase();
        match essence.as_str() {
            "text/plain" => Some(Self::PlainText),
            "application/pdf" => Some(Self::Pdf),
            DOCX_MEDIA_TYPE => Some(Self::Docx),
            _ => None,
        }
    }

    /// Resolves a file extension (without the dot), case-insensitively.
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "txt" => Some(Self::PlainText),
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    /// Returns the canonical media type of this format.
    #[inline]
    pub fn media_type(&self) -> &'static str {
        match self {
            Self::PlainText => "text/plain",
            Self::Pdf => "application/pdf",
            Self::Docx => DOCX_MEDIA_TYPE,
        }
    }

    fn extract_text(&self, bytes: &[u8]) -> Result<String, BoxedError> {
        match self {
            Self::PlainText => Ok(str::from_utf8(bytes)?.to_owned()),
            Self::Pdf => pdf::extract_text(bytes),
            Self::Docx => docx::extract_text(bytes),
        }
    }
}

impl Display for DocumentFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::PlainText => "plain text",
            Self::Pdf => "PDF",
            Self::Docx => "DOCX",
        };
        f.write_str(name)
    }
}

/// The text extracted from one uploaded document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedDocument {
    source_media_type: String,
    text: String,
}

impl ExtractedDocument {
    /// Returns the media type the document was declared with.
    #[inline]
    pub fn source_media_type(&self) -> &str {
        &self.source_media_type
    }

    /// Returns the extracted text. It may be empty.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consumes the document and returns the extracted text.
    #[inline]
    pub fn into_text(self) -> String {
        self.text
    }
}

/// Errors returned by [`extract`].
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// The declared media type is not one of the supported formats.
    #[error("unsupported document type: {0}")]
    UnsupportedFormat(String),
    /// The document is of a supported type but could not be parsed.
    #[error("failed to extract {format} document: {source}")]
    Failure {
        /// The format the document was declared as.
        format: DocumentFormat,
        /// The underlying parse error.
        #[source]
        source: BoxedError,
    },
}

/// Extracts plain text from `bytes` declared as `media_type`.
///
/// Extraction is all-or-nothing: either the whole document is converted or
/// an error is returned.
pub fn extract(
    media_type: &str,
    bytes: &[u8],
) -> Result<ExtractedDocument, ExtractError> {
    let Some(format) = DocumentFormat::from_media_type(media_type) else {
        return Err(ExtractError::UnsupportedFormat(media_type.to_owned()));
    };

    let text = format
        .extract_text(bytes)
        .map_err(|source| ExtractError::Failure { format, source })?;
    debug!(
        "extracted {} chars from {format} document ({} bytes)",
        text.chars().count(),
        bytes.len()
    );

    Ok(ExtractedDocument {
        source_media_type: media_type.to_owned(),
        text,
    })
}
