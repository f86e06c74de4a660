//! PDF document properties extraction
//!
//! Reads page count, header version, encryption flag, file size, and the Info
//! dictionary fields from a document, and can save the result as JSON.

use std::fs;
use std::path::Path;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use log::debug;
use lopdf::{Dictionary, Document, Object};
use serde::Serialize;

use crate::error::{Error, Result};

/// Properties of a PDF document
#[derive(Debug, Clone, Serialize)]
pub struct PdfProperties {
    /// Number of pages in the document
    pub page_count: usize,
    /// PDF version from the file header (e.g. "1.7")
    pub pdf_version: String,
    /// Whether the document carries an encryption dictionary
    pub encrypted: bool,
    /// Size of the file on disk, in bytes
    pub file_size: u64,
    /// Document title (if present)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Document author (if present)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    /// Document subject (if present)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    /// Document keywords (if present)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    /// Application that created the original document (if present)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    /// Application that produced the PDF (if present)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    /// Creation date from the Info dictionary (if present and parseable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<FixedOffset>>,
    /// Modification date from the Info dictionary (if present and parseable)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<FixedOffset>>,
}

/// Count pages by reading the Count entry of the root Pages node
///
/// More reliable than walking page lists for documents with nested page trees.
fn page_count_from_catalog(doc: &Document) -> Result<usize> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| Error::General("Document has no catalog".to_string()))?;
    let catalog = doc.get_object(catalog_id)?.as_dict()?;

    let pages_id = catalog.get(b"Pages").and_then(Object::as_reference)?;
    let pages = doc.get_object(pages_id)?.as_dict()?;

    let count = pages.get(b"Count").and_then(Object::as_i64)?;
    Ok(count as usize)
}

/// Read a text entry from the Info dictionary
fn info_string(info: &Dictionary, key: &[u8]) -> Option<String> {
    let bytes = info.get(key).ok()?.as_str().ok()?;
    Some(String::from_utf8_lossy(bytes).into_owned())
}

/// Locate the Info dictionary, which may be referenced or inlined
fn info_dictionary(doc: &Document) -> Option<&Dictionary> {
    match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

/// Parse a PDF date string into a fixed-offset datetime
///
/// PDF dates look like `D:YYYYMMDDHHmmSS+HH'mm'`; everything after the year
/// is optional, and the offset may be `Z`, `+HH'mm'`, or `-HH'mm'`. Returns
/// None for anything that does not fit, so a single bad date never fails a
/// whole extraction.
pub fn parse_pdf_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let trimmed = raw.trim();
    let s = trimmed.strip_prefix("D:").unwrap_or(trimmed);

    let digit_len = s.bytes().take_while(|b| b.is_ascii_digit()).count();
    let (num, rest) = s.split_at(digit_len);
    if num.len() < 4 {
        return None;
    }

    let year: i32 = num[0..4].parse().ok()?;
    let field = |from: usize, to: usize, default: u32| -> u32 {
        num.get(from..to)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    };
    let month = field(4, 6, 1);
    let day = field(6, 8, 1);
    let hour = field(8, 10, 0);
    let minute = field(10, 12, 0);
    let second = field(12, 14, 0);

    let datetime = NaiveDate::from_ymd_opt(year, month, day)?.and_hms_opt(hour, minute, second)?;
    let offset = parse_utc_offset(rest).unwrap_or(FixedOffset::east_opt(0)?);
    offset.from_local_datetime(&datetime).single()
}

/// Parse the `Z` / `+HH'mm'` / `-HH'mm'` tail of a PDF date
fn parse_utc_offset(rest: &str) -> Option<FixedOffset> {
    let rest = rest.trim();
    let (sign, tail) = match rest.as_bytes().first()? {
        b'Z' => return FixedOffset::east_opt(0),
        b'+' => (1, &rest[1..]),
        b'-' => (-1, &rest[1..]),
        _ => return None,
    };

    let mut parts = tail.split('\'').filter(|p| !p.is_empty());
    let hours: i32 = parts.next()?.trim().parse().ok()?;
    let minutes: i32 = parts
        .next()
        .and_then(|m| m.trim().parse().ok())
        .unwrap_or(0);

    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

/// Extract the properties of a PDF file
pub fn extract_properties(path: &Path) -> Result<PdfProperties> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let file_size = fs::metadata(path)?.len();
    let doc = Document::load(path)?;

    let page_count = page_count_from_catalog(&doc)?;
    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    let mut props = PdfProperties {
        page_count,
        pdf_version: doc.version.clone(),
        encrypted: doc.trailer.get(b"Encrypt").is_ok(),
        file_size,
        title: None,
        author: None,
        subject: None,
        keywords: None,
        creator: None,
        producer: None,
        created: None,
        modified: None,
    };

    if let Some(info) = info_dictionary(&doc) {
        props.title = info_string(info, b"Title");
        props.author = info_string(info, b"Author");
        props.subject = info_string(info, b"Subject");
        props.keywords = info_string(info, b"Keywords");
        props.creator = info_string(info, b"Creator");
        props.producer = info_string(info, b"Producer");
        props.created = info_string(info, b"CreationDate")
            .as_deref()
            .and_then(parse_pdf_date);
        props.modified = info_string(info, b"ModDate")
            .as_deref()
            .and_then(parse_pdf_date);
    }

    debug!(
        "{}: {} pages, version {}",
        path.display(),
        props.page_count,
        props.pdf_version
    );

    Ok(props)
}

/// Save properties as a pretty-printed JSON file
pub fn write_properties_json(props: &PdfProperties, path: &Path) -> Result<()> {
    let file = fs::File::create(path)?;
    serde_json::to_writer_pretty(file, props)?;
    Ok(())
}

/// Count the number of pages in a PDF file
///
/// This is a quick operation that reads the Count field from the Pages dictionary.
pub fn count_pages(path: &Path) -> Result<usize> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.to_path_buf()));
    }

    let doc = Document::load(path)?;
    let page_count = page_count_from_catalog(&doc)?;

    if page_count == 0 {
        return Err(Error::EmptyPdf(path.to_path_buf()));
    }

    Ok(page_count)
}
