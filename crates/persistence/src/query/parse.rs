//! Parsing of raw query-string values into typed filter inputs.
//!
//! Each helper takes the raw string exactly as it arrived on the request and
//! the parameter name it arrived under, so errors can name the offending
//! parameter.

use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::error::{ValidationError, ValidationResult};

/// Default number of decimal places kept by [`truncate_float`].
pub const DEFAULT_FLOAT_PRECISION: u32 = 4;

/// Truncates a float toward zero to `precision` decimal places.
///
/// ```
/// use airq_persistence::query::parse::truncate_float;
///
/// assert_eq!(truncate_float(1.123456, 4), 1.1234);
/// assert_eq!(truncate_float(-77.03691, 4), -77.0369);
/// ```
pub fn truncate_float(value: f64, precision: u32) -> f64 {
    let factor = 10_f64.powi(precision as i32);
    let scaled = value * factor;
    // Binary representation can leave an exact decimal a hair below the
    // integer it denotes (38.7916 * 1e4 = 387915.99999...).
    let nearest = scaled.round();
    let scaled = if (nearest - scaled).abs() < 1e-6 {
        nearest
    } else {
        scaled
    };
    scaled.trunc() / factor
}

/// Parses a comma-separated list (`"1,2,3"`) or a single value (`"1"`).
pub fn parse_comma_separated<T>(parameter: &str, raw: &str) -> ValidationResult<Vec<T>>
where
    T: FromStr,
{
    raw.split(',')
        .map(str::trim)
        .map(|item| {
            if item.is_empty() {
                return Err(ValidationError::invalid(parameter, "empty list item"));
            }
            item.parse::<T>().map_err(|_| {
                ValidationError::invalid(parameter, format!("'{}' is not a valid value", item))
            })
        })
        .collect()
}

/// Parses a single number, naming `parameter` on failure.
pub fn parse_number<T>(parameter: &str, raw: &str) -> ValidationResult<T>
where
    T: FromStr,
{
    raw.trim().parse::<T>().map_err(|_| {
        ValidationError::invalid(parameter, format!("'{}' is not a valid number", raw))
    })
}

/// Parses a boolean flag.
pub fn parse_bool(parameter: &str, raw: &str) -> ValidationResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" | "t" | "y" => Ok(true),
        "false" | "0" | "no" | "off" | "f" | "n" => Ok(false),
        _ => Err(ValidationError::invalid(
            parameter,
            format!("'{}' is not a valid boolean", raw),
        )),
    }
}

/// Parses `"lat,lon"` into a range-checked `(lat, lon)` pair.
pub fn parse_coordinates(parameter: &str, raw: &str) -> ValidationResult<(f64, f64)> {
    let values: Vec<f64> = parse_comma_separated(parameter, raw)?;
    let [lat, lon] = values[..] else {
        return Err(ValidationError::invalid(
            parameter,
            "coordinates must be a latitude,longitude pair",
        ));
    };
    check_latitude(parameter, lat)?;
    check_longitude(parameter, lon)?;
    Ok((
        truncate_float(lat, DEFAULT_FLOAT_PRECISION),
        truncate_float(lon, DEFAULT_FLOAT_PRECISION),
    ))
}

/// Parses `"minx,miny,maxx,maxy"` into a range-checked bounding box.
pub fn parse_bbox(parameter: &str, raw: &str) -> ValidationResult<[f64; 4]> {
    let values: Vec<f64> = parse_comma_separated(parameter, raw)?;
    let [minx, miny, maxx, maxy] = values[..] else {
        return Err(ValidationError::invalid(
            parameter,
            "bbox must have exactly four values: minx,miny,maxx,maxy",
        ));
    };
    check_longitude(parameter, minx)?;
    check_latitude(parameter, miny)?;
    check_longitude(parameter, maxx)?;
    check_latitude(parameter, maxy)?;
    Ok([minx, miny, maxx, maxy])
}

fn check_latitude(parameter: &str, lat: f64) -> ValidationResult<()> {
    if (-90.0..=90.0).contains(&lat) {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            parameter,
            format!("latitude {} must be between -90 and 90", lat),
        ))
    }
}

fn check_longitude(parameter: &str, lon: f64) -> ValidationResult<()> {
    if (-180.0..=180.0).contains(&lon) {
        Ok(())
    } else {
        Err(ValidationError::invalid(
            parameter,
            format!("longitude {} must be between -180 and 180", lon),
        ))
    }
}

/// A date or timestamp accepted by the date range filters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DateParam {
    /// Bare calendar date (`2022-10-01`).
    Date(NaiveDate),
    /// Timestamp without a timezone offset (`2022-10-01T14:47:27`).
    Naive(NaiveDateTime),
    /// Timestamp with an explicit offset (`2022-10-01T14:47:27-00:00`).
    Aware(DateTime<FixedOffset>),
}

impl DateParam {
    /// Returns true when the value must be interpreted in the row's local timezone.
    pub fn is_local(&self) -> bool {
        !matches!(self, DateParam::Aware(_))
    }
}

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

const AWARE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%:z"];

/// Parses a bare date or a timestamp with or without a timezone offset.
pub fn parse_date_param(parameter: &str, raw: &str) -> ValidationResult<DateParam> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(DateParam::Aware(ts));
    }
    for format in AWARE_FORMATS {
        if let Ok(ts) = DateTime::parse_from_str(raw, format) {
            return Ok(DateParam::Aware(ts));
        }
    }
    for format in NAIVE_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(DateParam::Naive(ts));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Ok(DateParam::Date(date));
    }

    Err(ValidationError::invalid(
        parameter,
        format!("'{}' is not a valid date or datetime", raw),
    ))
}
