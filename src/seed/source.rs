//! External catalog sources.
//!
//! The reseed coordinator only needs `(name, reference)` pairs; how a
//! source obtains them is its own business.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by a [`PokemonSource`].
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request could not be sent or completed.
    #[error("request to {url} failed: {message}")]
    Request {
        url: String,
        message: String,
    },

    /// The source answered with a non-success status.
    #[error("{url} answered with status {status}")]
    Status {
        url: String,
        status: u16,
    },

    /// The payload did not have the expected shape.
    #[error("could not decode source payload: {0}")]
    Decode(String),

    /// A record reference did not carry a numeric id.
    #[error("reference {url:?} has no numeric id as its second-to-last segment")]
    InvalidReference {
        url: String,
    },
}

/// One record as published by the external catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceRecord {
    /// Display name, casing as published.
    pub name: String,
    /// Slash-delimited reference such as `.../pokemon/25/`.
    pub url: String,
}

impl SourceRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// The catalog number encoded in the reference.
    ///
    /// # Errors
    ///
    /// See [`parse_reference_no`].
    pub fn no(&self) -> Result<u32, SourceError> {
        parse_reference_no(&self.url)
    }
}

/// A page of the external listing.
///
/// `results` is required: an error body such as `{"detail":"Not found."}`
/// must not read as an empty listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePage {
    /// Records in listing order.
    pub results: Vec<SourceRecord>,
}

impl SourcePage {
    /// Decodes a listing page. Unknown fields are ignored.
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the JSON is not an object with a `results` array
    /// of `{name, url}` records.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        serde_json::from_str(json).map_err(|e| SourceError::Decode(e.to_string()))
    }
}

/// Extracts the catalog number from a reference.
///
/// The number is the second-to-last `/`-separated segment, so references
/// end with a trailing slash: `https://pokeapi.co/api/v2/pokemon/25/` is 25.
///
/// # Errors
///
/// Returns `InvalidReference` if that segment is missing or is not a
/// positive integer.
pub fn parse_reference_no(url: &str) -> Result<u32, SourceError> {
    let invalid = || SourceError::InvalidReference {
        url: url.to_string(),
    };

    let segments: Vec<&str> = url.split('/').collect();
    let segment = segments
        .len()
        .checked_sub(2)
        .and_then(|i| segments.get(i))
        .ok_or_else(invalid)?;

    segment
        .parse::<u32>()
        .ok()
        .filter(|no| *no >= 1)
        .ok_or_else(invalid)
}

/// Producer of external records.
pub trait PokemonSource: Send + Sync {
    /// Fetch at most `limit` records from the start of the listing.
    fn fetch(&self, limit: usize) -> Result<Vec<SourceRecord>, SourceError>;
}

/// Source backed by a fixed list of records.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    records: Vec<SourceRecord>,
}

impl StaticSource {
    /// Creates a source serving `records` in order.
    #[must_use]
    pub fn new(records: Vec<SourceRecord>) -> Self {
        Self { records }
    }

    /// Creates a source from a JSON page (`{"results": [...]}`).
    ///
    /// # Errors
    ///
    /// Returns `Decode` if the JSON does not have the listing shape.
    pub fn from_json(json: &str) -> Result<Self, SourceError> {
        Ok(Self::new(SourcePage::from_json(json)?.results))
    }
}

impl PokemonSource for StaticSource {
    fn fetch(&self, limit: usize) -> Result<Vec<SourceRecord>, SourceError> {
        Ok(self.records.iter().take(limit).cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_second_to_last_segment() {
        assert_eq!(
            parse_reference_no("https://pokeapi.co/api/v2/pokemon/25/").unwrap(),
            25
        );
        assert_eq!(parse_reference_no("pokemon/1/").unwrap(), 1);
    }

    #[test]
    fn rejects_references_without_numeric_segment() {
        for url in [
            "https://pokeapi.co/api/v2/pokemon/25",
            "https://pokeapi.co/api/v2/pokemon/pikachu/",
            "https://pokeapi.co/api/v2/pokemon/0/",
            "25",
            "",
        ] {
            let err = parse_reference_no(url).unwrap_err();
            assert!(
                matches!(&err, SourceError::InvalidReference { url: u } if u == url),
                "{url:?} -> {err:?}"
            );
        }
    }

    #[test]
    fn static_source_respects_limit() {
        let source = StaticSource::new(vec![
            SourceRecord::new("bulbasaur", "https://pokeapi.co/api/v2/pokemon/1/"),
            SourceRecord::new("ivysaur", "https://pokeapi.co/api/v2/pokemon/2/"),
        ]);
        assert_eq!(source.fetch(1).unwrap().len(), 1);
        assert_eq!(source.fetch(10).unwrap().len(), 2);
        assert!(source.fetch(0).unwrap().is_empty());
    }

    #[test]
    fn static_source_from_json() {
        let source = StaticSource::from_json(
            r#"{"count":1302,"next":null,"results":[
                {"name":"pikachu","url":"https://pokeapi.co/api/v2/pokemon/25/"}
            ]}"#,
        )
        .unwrap();
        let records = source.fetch(10).unwrap();
        assert_eq!(
            records,
            vec![SourceRecord::new(
                "pikachu",
                "https://pokeapi.co/api/v2/pokemon/25/"
            )]
        );
        assert_eq!(records[0].no().unwrap(), 25);

        assert!(StaticSource::from_json(r#"{"results":[]}"#)
            .unwrap()
            .fetch(10)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn page_without_results_is_a_decode_error() {
        for json in ["[]", "{}", r#"{"detail":"Not found."}"#, r#"{"results":null}"#] {
            assert!(
                matches!(SourcePage::from_json(json), Err(SourceError::Decode(_))),
                "{json}"
            );
            assert!(
                matches!(StaticSource::from_json(json), Err(SourceError::Decode(_))),
                "{json}"
            );
        }
    }
}
