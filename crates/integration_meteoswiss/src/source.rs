//! Raw feed decoding
//!
//! Turns response bodies into the row and document shapes consumed by
//! [`crate::mapping`].

use serde_json::Value;

use crate::error::MeteoError;
use crate::mapping::CsvRow;

/// Character encoding of a CSV feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextEncoding {
    /// Current conditions feed
    Utf8,
    /// Open-data pollen and station feeds
    Latin1,
}

impl TextEncoding {
    /// Decode a response body to text
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected. Latin-1 maps
    /// every byte to the code point of the same value.
    #[must_use]
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Self::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Self::Latin1 => bytes.iter().copied().map(char::from).collect(),
        }
    }
}

/// Decode a `;`-separated CSV body with a header row
///
/// Rows with fewer fields than the header only carry the columns they have.
///
/// # Errors
///
/// Returns [`MeteoError::ParseError`] if the header or a record cannot be read.
pub fn decode_csv(bytes: &[u8], encoding: TextEncoding) -> Result<Vec<CsvRow>, MeteoError> {
    let text = encoding.decode(bytes);
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| MeteoError::ParseError(format!("Invalid CSV header: {e}")))?
        .clone();

    reader
        .records()
        .map(|record| {
            let record =
                record.map_err(|e| MeteoError::ParseError(format!("Invalid CSV record: {e}")))?;
            Ok(headers
                .iter()
                .zip(record.iter())
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect())
        })
        .collect()
}

/// Decode a JSON body
///
/// # Errors
///
/// Returns [`MeteoError::ParseError`] if the body is not valid JSON.
pub fn decode_json(bytes: &[u8]) -> Result<Value, MeteoError> {
    serde_json::from_slice(bytes).map_err(|e| MeteoError::ParseError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latin1_decoding() {
        let bytes = b"station_name;station_abbr\nZ\xfcrich;PZH\nGen\xe8ve;PGE\n";

        let rows = decode_csv(bytes, TextEncoding::Latin1).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["station_name"], "Zürich");
        assert_eq!(rows[1]["station_name"], "Genève");
        assert_eq!(rows[1]["station_abbr"], "PGE");
    }

    #[test]
    fn test_utf8_decoding() {
        let body = "Station/Location;Date;tre200s0\nKLO;202406151230;24.8\n";

        let rows = decode_csv(body.as_bytes(), TextEncoding::Utf8).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Station/Location"], "KLO");
        assert_eq!(rows[0]["tre200s0"], "24.8");
    }

    #[test]
    fn test_short_rows_are_kept() {
        let body = "Station;Abbr.;Canton\nlicense;CC BY\n";

        let rows = decode_csv(body.as_bytes(), TextEncoding::Latin1).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["Station"], "license");
        assert!(!rows[0].contains_key("Canton"));
    }

    #[test]
    fn test_empty_body() {
        assert!(decode_csv(b"", TextEncoding::Utf8).unwrap().is_empty());
    }

    #[test]
    fn test_decode_json() {
        let value = decode_json(br#"{"currentWeather": {"temperature": 21.5}}"#).unwrap();
        assert_eq!(value["currentWeather"]["temperature"], 21.5);

        assert!(matches!(
            decode_json(b"<html>"),
            Err(MeteoError::ParseError(_))
        ));
    }
}
