//! Spatial filters: radius search around a point and bounding-box search.

use crate::error::{ValidationError, ValidationResult};
use crate::query::parse::{parse_bbox, parse_coordinates, parse_number};
use crate::query::value::Params;

use super::{QueryFilter, RawParams};

/// Geography column compared against by [`RadiusQuery`] unless overridden.
pub const DEFAULT_GEOGRAPHY_COLUMN: &str = "geog";

/// Geometry column compared against by [`BboxQuery`] unless overridden.
pub const DEFAULT_GEOMETRY_COLUMN: &str = "geom";

/// Smallest accepted search radius in meters.
pub const MIN_RADIUS: i64 = 1;

/// Largest accepted search radius in meters.
pub const MAX_RADIUS: i64 = 25_000;

/// Radius search around a `lat,lon` point.
///
/// `coordinates` and `radius` must be supplied together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadiusQuery {
    coordinates: Option<String>,
    radius: Option<i64>,
    lat: Option<f64>,
    lon: Option<f64>,
}

impl RadiusQuery {
    /// Validates and builds a radius filter.
    pub fn new(coordinates: Option<&str>, radius: Option<i64>) -> ValidationResult<Self> {
        match (coordinates, radius) {
            (None, None) => Ok(Self::default()),
            (Some(_), None) | (None, Some(_)) => Err(ValidationError::conflict(
                "radius and coordinates must be used together",
            )),
            (Some(coordinates), Some(radius)) => {
                if !(MIN_RADIUS..=MAX_RADIUS).contains(&radius) {
                    return Err(ValidationError::invalid(
                        "radius",
                        format!(
                            "radius must be between {} and {} meters",
                            MIN_RADIUS, MAX_RADIUS
                        ),
                    ));
                }
                let (lat, lon) = parse_coordinates("coordinates", coordinates)?;
                Ok(Self {
                    coordinates: Some(coordinates.to_string()),
                    radius: Some(radius),
                    lat: Some(lat),
                    lon: Some(lon),
                })
            }
        }
    }

    /// Builds the filter from the `coordinates` and `radius` request parameters.
    pub fn from_params(raw: &RawParams) -> ValidationResult<Self> {
        let radius = raw
            .get("radius")
            .map(|r| parse_number::<i64>("radius", r))
            .transpose()?;
        Self::new(raw.get("coordinates"), radius)
    }

    /// Search radius in meters.
    pub fn radius(&self) -> Option<i64> {
        self.radius
    }

    /// Latitude of the search point.
    pub fn lat(&self) -> Option<f64> {
        self.lat
    }

    /// Longitude of the search point.
    pub fn lon(&self) -> Option<f64> {
        self.lon
    }

    /// Distance predicate against `column`.
    pub fn where_for(&self, column: &str) -> Option<String> {
        self.is_active().then(|| {
            format!(
                "ST_DWithin(ST_MakePoint(:lon, :lat)::geography, {}, :radius)",
                column
            )
        })
    }

    /// Distance projection against `column`.
    pub fn fields_for(&self, column: &str) -> Option<String> {
        self.is_active().then(|| {
            format!(
                "ST_Distance({}, ST_MakePoint(:lon, :lat)::geography) as distance",
                column
            )
        })
    }
}

impl QueryFilter for RadiusQuery {
    fn name(&self) -> &'static str {
        "radius"
    }

    fn is_active(&self) -> bool {
        self.radius.is_some() && self.lat.is_some() && self.lon.is_some()
    }

    fn where_clause(&self) -> Option<String> {
        self.where_for(DEFAULT_GEOGRAPHY_COLUMN)
    }

    fn fields(&self) -> Option<String> {
        self.fields_for(DEFAULT_GEOGRAPHY_COLUMN)
    }

    fn is_spatial(&self) -> bool {
        self.is_active()
    }

    fn params(&self) -> Params {
        Params::from([
            ("coordinates".to_string(), self.coordinates.clone().into()),
            ("radius".to_string(), self.radius.into()),
            ("lat".to_string(), self.lat.into()),
            ("lon".to_string(), self.lon.into()),
        ])
    }
}

/// Bounding-box search over `minx,miny,maxx,maxy` in WGS84.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BboxQuery {
    bbox: Option<String>,
    extent: Option<[f64; 4]>,
}

impl BboxQuery {
    /// Validates and builds a bounding-box filter from its raw string form.
    pub fn new(bbox: Option<&str>) -> ValidationResult<Self> {
        let Some(bbox) = bbox else {
            return Ok(Self::default());
        };
        let extent = parse_bbox("bbox", bbox)?;
        Ok(Self {
            bbox: Some(bbox.to_string()),
            extent: Some(extent),
        })
    }

    /// Builds the filter from the `bbox` request parameter.
    pub fn from_params(raw: &RawParams) -> ValidationResult<Self> {
        Self::new(raw.get("bbox"))
    }

    /// Western edge.
    pub fn minx(&self) -> Option<f64> {
        self.extent.map(|e| e[0])
    }

    /// Southern edge.
    pub fn miny(&self) -> Option<f64> {
        self.extent.map(|e| e[1])
    }

    /// Eastern edge.
    pub fn maxx(&self) -> Option<f64> {
        self.extent.map(|e| e[2])
    }

    /// Northern edge.
    pub fn maxy(&self) -> Option<f64> {
        self.extent.map(|e| e[3])
    }

    /// Intersection predicate against `column`.
    pub fn where_for(&self, column: &str) -> Option<String> {
        self.is_active().then(|| {
            format!(
                "ST_MakeEnvelope(:minx, :miny, :maxx, :maxy, 4326) && {}",
                column
            )
        })
    }
}

impl QueryFilter for BboxQuery {
    fn name(&self) -> &'static str {
        "bbox"
    }

    fn is_active(&self) -> bool {
        self.extent.is_some()
    }

    fn where_clause(&self) -> Option<String> {
        self.where_for(DEFAULT_GEOMETRY_COLUMN)
    }

    fn is_spatial(&self) -> bool {
        self.is_active()
    }

    fn params(&self) -> Params {
        Params::from([
            ("bbox".to_string(), self.bbox.clone().into()),
            ("minx".to_string(), self.minx().into()),
            ("miny".to_string(), self.miny().into()),
            ("maxx".to_string(), self.maxx().into()),
            ("maxy".to_string(), self.maxy().into()),
        ])
    }
}
