// # Canonicalizer
//
// Turns raw desired-state parameters into validated, normalized and sorted
// field values.
//
// ## Rules
//
// - `addresses`: each entry parses as IPv4 or IPv6
// - `address_ranges`: `start-stop`, same IP version, swapped when reversed
// - `address_lists`: fully qualified as `/partition/name`
// - `fqdns`: letters-digits-hyphen hostnames
// - `geo_locations`: `COUNTRY` or `COUNTRY:REGION`, country resolved to a code
//
// Every collection is de-duplicated and sorted lexicographically, so two
// canonical values compare equal exactly when they hold the same entries.
// Fields absent from the input stay absent.

pub mod address;
pub mod country;
pub mod geo;
pub mod hostname;
pub mod list_ref;

pub use address::{AddressRange, RANGE_SEPARATOR, parse_address};
pub use geo::GeoLocation;
pub use hostname::is_valid_hostname;
pub use list_ref::ListRef;

use std::collections::BTreeSet;

use crate::config::{AddressListParams, GeoLocationParam};
use crate::error::ValidationError;
use crate::fields::FieldSet;

/// Desired state of one address list, in canonical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredList {
    pub name: String,
    pub partition: String,
    pub fields: FieldSet,
}

impl DesiredList {
    /// Validate and canonicalize raw parameters
    ///
    /// Fails on the first invalid entry; nothing is sent to the device
    /// before this succeeds.
    pub fn canonicalize(params: &AddressListParams) -> Result<Self, ValidationError> {
        params.validate()?;

        let fields = FieldSet {
            description: params.description.clone(),
            addresses: params.addresses.as_deref().map(canonical_addresses).transpose()?,
            address_ranges: params
                .address_ranges
                .as_deref()
                .map(canonical_ranges)
                .transpose()?,
            address_lists: params
                .address_lists
                .as_deref()
                .map(|lists| canonical_list_refs(lists, &params.partition))
                .transpose()?,
            fqdns: params.fqdns.as_deref().map(canonical_fqdns).transpose()?,
            geo_locations: params
                .geo_locations
                .as_deref()
                .map(canonical_geo_locations)
                .transpose()?,
        };

        Ok(Self {
            name: params.name.clone(),
            partition: params.partition.clone(),
            fields,
        })
    }

    /// `/partition/name` of the list itself
    pub fn full_path(&self) -> String {
        format!("/{}/{}", self.partition, self.name)
    }
}

/// Collect into a sorted, de-duplicated vector
pub(crate) fn sorted<I>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    items.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Canonicalize single addresses
pub fn canonical_addresses<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>, ValidationError> {
    let parsed = raw
        .iter()
        .map(|a| parse_address(a.as_ref()).map(|ip| ip.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sorted(parsed))
}

/// Canonicalize `start-stop` ranges
pub fn canonical_ranges<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>, ValidationError> {
    let parsed = raw
        .iter()
        .map(|r| r.as_ref().parse::<AddressRange>().map(|r| r.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sorted(parsed))
}

/// Canonicalize list references against `partition`
pub fn canonical_list_refs<S: AsRef<str>>(
    raw: &[S],
    partition: &str,
) -> Result<Vec<String>, ValidationError> {
    let parsed = raw
        .iter()
        .map(|l| ListRef::resolve(l.as_ref(), partition).map(|r| r.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sorted(parsed))
}

/// Validate FQDNs
pub fn canonical_fqdns<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>, ValidationError> {
    let checked = raw
        .iter()
        .map(|h| {
            let h = h.as_ref();
            if is_valid_hostname(h) {
                Ok(h.to_string())
            } else {
                Err(ValidationError::InvalidHostname(h.to_string()))
            }
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sorted(checked))
}

/// Resolve geo-locations to `COUNTRY[:REGION]`
pub fn canonical_geo_locations(
    raw: &[GeoLocationParam],
) -> Result<Vec<String>, ValidationError> {
    let parsed = raw
        .iter()
        .map(|g| GeoLocation::try_from(g).map(|g| g.to_string()))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(sorted(parsed))
}
