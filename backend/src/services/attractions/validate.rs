//! The validation gate in front of ingestion, and the conversion of an accepted
//! payload into the record stored in the cache.

use crate::error::{Error, Result};
use crate::matching::normalize;
use common::model::attraction::{AttractionRecord, RawAttraction};
use regex::Regex;
use serde_json::error::Category;

const VIABLE_CATEGORIES: [&str; 3] = ["nature", "heritage", "museums"];

/// Latin and Lithuanian letters.
const CITY_PATTERN: &str = r"[A-Za-z\x{0104}-\x{0105}\x{010C}-\x{010D}\x{0116}-\x{0119}\x{012E}-\x{012F}\x{0160}-\x{0161}\x{016A}-\x{016B}\x{0172}-\x{0173}\x{017E}-\x{017F}]+";
const HOURS_PATTERN: &str = r"[0-9]{2}:[0-9]{2}-[0-9]{2}:[0-9]{2}";

/// Bounding box of Lithuania: (min, max) latitude and longitude.
const LATITUDE: (f32, f32) = (53.53, 56.27);
const LONGITUDE: (f32, f32) = (20.56, 26.5);

/// Parses `body` and enforces the field rules. Every rejection is
/// `Error::Validation` carrying the message returned to the client.
pub fn validate(body: &[u8]) -> Result<RawAttraction> {
    let raw = parse_body(body)?;

    if raw.description.info.chars().count() <= 30 {
        return Err(Error::Validation("Object description is too short".into()));
    }
    if raw.description.name.chars().count() <= 3 {
        return Err(Error::Validation("Name is too short".into()));
    }

    let city_re = Regex::new(CITY_PATTERN)?;
    let city = &raw.location.city;
    if city.chars().count() <= 3 || !city_re.is_match(city) {
        return Err(Error::Validation("City is invalid".into()));
    }

    let hours_re = Regex::new(HOURS_PATTERN)?;
    let hours = &raw.description.hours;
    if [&hours.wkd, &hours.std, &hours.snd]
        .iter()
        .any(|range| !hours_re.is_match(range))
    {
        return Err(Error::Validation("Invalid open hours".into()));
    }

    if !VIABLE_CATEGORIES.contains(&raw.category.as_str()) {
        return Err(Error::Validation("Invalid category".into()));
    }

    let coords = raw.location.coordinates;
    let inside = (LATITUDE.0..=LATITUDE.1).contains(&coords.latitude)
        && (LONGITUDE.0..=LONGITUDE.1).contains(&coords.longitude);
    if !inside {
        return Err(Error::Validation("Location is outside of Lithuania".into()));
    }

    Ok(raw)
}

fn parse_body(body: &[u8]) -> Result<RawAttraction> {
    serde_json::from_slice(body).map_err(|e| {
        let msg = match e.classify() {
            Category::Eof if body.iter().all(u8::is_ascii_whitespace) => {
                "Request body is empty".to_string()
            }
            Category::Data => format!("Request body contains an invalid value: {}", e),
            Category::Syntax | Category::Eof => format!("Request body is not valid JSON: {}", e),
            Category::Io => e.to_string(),
        };
        Error::Validation(msg)
    })
}

/// Flattens an accepted payload. The id is derived from the name as submitted;
/// the stored name is trimmed.
pub fn wrap(mut raw: RawAttraction) -> Result<AttractionRecord> {
    let id = normalize(&raw.description.name);
    raw.description.name = raw.description.name.trim().to_string();

    let description =
        serde_json::to_string(&raw.description).map_err(|e| Error::Validation(e.to_string()))?;
    let location =
        serde_json::to_string(&raw.location).map_err(|e| Error::Validation(e.to_string()))?;

    Ok(AttractionRecord {
        id,
        category: raw.category,
        description,
        location,
        name: raw.description.name,
        image_url: non_empty(raw.image.url),
        image_copyright: non_empty(raw.image.copyright),
    })
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
