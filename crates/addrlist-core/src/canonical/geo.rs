//! Geo-location entries (`COUNTRY` or `COUNTRY:REGION`)

use std::fmt;

use super::country;
use crate::config::GeoLocationParam;
use crate::error::ValidationError;

/// Separator between country code and region
pub const REGION_SEPARATOR: char = ':';

/// A resolved geo-location entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GeoLocation {
    country: &'static str,
    region: Option<String>,
}

impl GeoLocation {
    /// Resolve a country (code or full name) and an optional region
    ///
    /// A region that is blank or whitespace-only is dropped.
    pub fn new(country: &str, region: Option<&str>) -> Result<Self, ValidationError> {
        let code = country::resolve(country.trim())
            .ok_or_else(|| ValidationError::UnknownCountry(country.to_string()))?;
        let region = region
            .filter(|r| !r.trim().is_empty())
            .map(str::to_string);
        Ok(Self {
            country: code,
            region,
        })
    }

    /// ISO-3166 alpha-2 country code
    pub fn country(&self) -> &'static str {
        self.country
    }

    /// Region, if any
    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }
}

impl TryFrom<&GeoLocationParam> for GeoLocation {
    type Error = ValidationError;

    fn try_from(param: &GeoLocationParam) -> Result<Self, Self::Error> {
        Self::new(&param.country, param.region.as_deref())
    }
}

impl fmt::Display for GeoLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.region {
            Some(region) => write!(f, "{}{}{}", self.country, REGION_SEPARATOR, region),
            None => f.write_str(self.country),
        }
    }
}
