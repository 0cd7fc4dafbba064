//! Queue id extraction from deep links and scanned codes.
//!
//! Both inputs follow the same convention: the payload contains a literal
//! `paika` marker token and the substring after it is the queue id.
//! A URL like `https://host/np/paika1f3a` and a scanned code `paika1f3a`
//! both resolve to queue `1f3a`.

use thiserror::Error;

use crate::queue::QueueId;

/// Literal token that precedes the queue id in links and scanned codes.
const MARKER: &str = "paika";

/// Errors from queue id extraction.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LinkError {
    /// The marker token does not appear in the input.
    #[error("no valid parameter: `paika` marker not found")]
    MissingMarker,

    /// The marker is present but nothing usable follows it.
    #[error("no valid parameter: nothing follows the `paika` marker")]
    EmptyParameter,
}

/// Extract the queue id following the last `paika` marker.
///
/// The id runs from the end of the marker to the next path or query
/// delimiter (`/`, `?`, `#`) or the end of the input. Missing marker or an
/// empty remainder is an error; the caller reports it and changes no state.
pub fn extract_queue_id(input: &str) -> Result<QueueId, LinkError> {
    let start = input.rfind(MARKER).ok_or(LinkError::MissingMarker)? + MARKER.len();
    let rest = &input[start..];
    let end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    QueueId::parse(&rest[..end]).map_err(|_| LinkError::EmptyParameter)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn extracts_from_url_path() {
        let id = extract_queue_id("https://example.com/np/paika1f3a").unwrap();
        assert_eq!(id.as_str(), "1f3a");
    }

    #[test]
    fn extracts_from_scanned_code() {
        let id = extract_queue_id("paikaQ42").unwrap();
        assert_eq!(id.as_str(), "Q42");
    }

    #[test]
    fn stops_at_query_delimiter() {
        let id = extract_queue_id("https://example.com/paikaQ1?utm=x").unwrap();
        assert_eq!(id.as_str(), "Q1");
    }

    #[test]
    fn missing_marker_is_reported() {
        assert_eq!(extract_queue_id("https://example.com/np/Q1"), Err(LinkError::MissingMarker));
    }

    #[test]
    fn marker_with_no_id_is_reported() {
        assert_eq!(extract_queue_id("https://example.com/paika"), Err(LinkError::EmptyParameter));
        assert_eq!(extract_queue_id("paika/"), Err(LinkError::EmptyParameter));
    }

    #[test]
    fn last_marker_wins() {
        // A path may mention the token more than once; the id follows the
        // final occurrence.
        let id = extract_queue_id("/paika/paikaZ9").unwrap();
        assert_eq!(id.as_str(), "Z9");
    }
}
