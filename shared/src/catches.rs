use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ===== CATCH IDENTIFIERS =====

/// Numeric identifier of a logged catch.
///
/// Ids reach the client both as JSON numbers and as strings (data attributes,
/// route parameters), so deserialization accepts either form.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(try_from = "RawCatchId", into = "i64")]
pub struct CatchId(pub i64);

impl CatchId {
    /// Integer-prefix parse: optional sign and leading digits, anything after
    /// the digits is ignored (`"3"`, `" 3 "`, `"3.0"` and `"3abc"` all give 3).
    pub fn parse_lenient(text: &str) -> Option<Self> {
        let text = text.trim_start();
        let (sign, digits) = match text.as_bytes().first() {
            Some(b'-') => (-1, &text[1..]),
            Some(b'+') => (1, &text[1..]),
            _ => (1, text),
        };
        let end = digits
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return None;
        }
        digits[..end].parse::<i64>().ok().map(|value| CatchId(sign * value))
    }
}

impl fmt::Display for CatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CatchId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(CatchId)
    }
}

impl From<CatchId> for i64 {
    fn from(id: CatchId) -> Self {
        id.0
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCatchId {
    Number(i64),
    Text(String),
}

impl TryFrom<RawCatchId> for CatchId {
    type Error = String;

    fn try_from(raw: RawCatchId) -> Result<Self, Self::Error> {
        match raw {
            RawCatchId::Number(value) => Ok(CatchId(value)),
            RawCatchId::Text(text) => {
                CatchId::parse_lenient(&text).ok_or_else(|| format!("invalid catch id '{text}'"))
            }
        }
    }
}

// ===== COORDINATES =====

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LocationError {
    #[error("location '{0}' is not in 'lat,lon' form")]
    MissingSeparator(String),
    #[error("location part '{0}' is not a number")]
    InvalidNumber(String),
    #[error("location '{0}' contains a non-finite coordinate")]
    NotFinite(String),
}

impl FromStr for Coordinates {
    type Err = LocationError;

    /// Parses the catch API's `"lat,lon"` location strings.
    fn from_str(location: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = location
            .split_once(',')
            .ok_or_else(|| LocationError::MissingSeparator(location.to_string()))?;
        let parse_part = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|_| LocationError::InvalidNumber(part.trim().to_string()))
        };
        let coordinates = Coordinates::new(parse_part(lat)?, parse_part(lon)?);
        if !coordinates.is_finite() {
            return Err(LocationError::NotFinite(location.to_string()));
        }
        Ok(coordinates)
    }
}

// ===== CATCH RECORDS =====

/// One logged catch as served by the catch API.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CatchRecord {
    pub id: CatchId,
    pub species: String,
    /// Centimetres
    pub length: f64,
    /// Grams
    pub weight: f64,
    pub location: String,
    #[serde(default)]
    pub date: String,
    #[serde(rename = "imageurl", alias = "imageUrl", default)]
    pub image_url: String,
    pub username: String,
}

impl CatchRecord {
    pub fn coordinates(&self) -> Result<Coordinates, LocationError> {
        self.location.parse()
    }

    pub fn is_owned_by(&self, username: Option<&str>) -> bool {
        username.is_some_and(|name| name == self.username)
    }
}

/// Body of `GET /catches`: either the records or an error payload.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum CatchesResponse {
    Catches(Vec<CatchRecord>),
    Error { error: String },
}

impl CatchesResponse {
    pub fn into_result(self) -> Result<Vec<CatchRecord>, String> {
        match self {
            CatchesResponse::Catches(records) => Ok(records),
            CatchesResponse::Error { error } => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_id_lenient_parse() {
        assert_eq!(CatchId::parse_lenient("3"), Some(CatchId(3)));
        assert_eq!(CatchId::parse_lenient(" 42 "), Some(CatchId(42)));
        assert_eq!(CatchId::parse_lenient("7.0"), Some(CatchId(7)));
        assert_eq!(CatchId::parse_lenient("12abc"), Some(CatchId(12)));
        assert_eq!(CatchId::parse_lenient("-5"), Some(CatchId(-5)));
        assert_eq!(CatchId::parse_lenient("abc"), None);
        assert_eq!(CatchId::parse_lenient(""), None);
        assert_eq!(CatchId::parse_lenient("-"), None);
    }

    #[test]
    fn test_location_parsing() {
        let coordinates: Coordinates = "56.0,12.5".parse().unwrap();
        assert_eq!(coordinates, Coordinates::new(56.0, 12.5));

        let spaced: Coordinates = " 57.25 , 13.0 ".parse().unwrap();
        assert_eq!(spaced, Coordinates::new(57.25, 13.0));
    }

    #[test]
    fn test_malformed_locations() {
        assert!(matches!(
            "56.0".parse::<Coordinates>(),
            Err(LocationError::MissingSeparator(_))
        ));
        assert!(matches!(
            "north,12.5".parse::<Coordinates>(),
            Err(LocationError::InvalidNumber(part)) if part == "north"
        ));
        assert!(matches!(
            "inf,12.5".parse::<Coordinates>(),
            Err(LocationError::NotFinite(_))
        ));
    }

    #[test]
    fn test_record_deserializes_api_payload() {
        let json = r#"{
            "id": 1,
            "species": "Pike",
            "length": 40,
            "weight": 1200,
            "location": "56.0,12.5",
            "date": "2021-05-01",
            "imageurl": "/uploads/pike.jpg",
            "username": "alice"
        }"#;
        let record: CatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, CatchId(1));
        assert_eq!(record.length, 40.0);
        assert_eq!(record.image_url, "/uploads/pike.jpg");
        assert!(record.is_owned_by(Some("alice")));
        assert!(!record.is_owned_by(Some("bob")));
        assert!(!record.is_owned_by(None));
    }

    #[test]
    fn test_record_accepts_string_id_and_camel_case_image() {
        let json = r#"{"id":"9","species":"Perch","length":15,"weight":150,
            "location":"57.0,13.0","imageUrl":"perch.png","username":"bob"}"#;
        let record: CatchRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, CatchId(9));
        assert_eq!(record.image_url, "perch.png");
        assert_eq!(record.date, "");
    }

    #[test]
    fn test_catches_response_variants() {
        let ok: CatchesResponse = serde_json::from_str("[]").unwrap();
        assert_eq!(ok.into_result(), Ok(vec![]));

        let failed: CatchesResponse =
            serde_json::from_str(r#"{"error":"Database unavailable"}"#).unwrap();
        assert_eq!(failed.into_result(), Err("Database unavailable".to_string()));
    }
}
