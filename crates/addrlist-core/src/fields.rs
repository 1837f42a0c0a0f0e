//! Updatable fields of an address list
//!
//! [`Field`] is the explicit dispatch table used by the differ, the wire
//! translation and the report. [`FieldSet`] holds canonical values for every
//! field; `None` means "no opinion" and is never the same as an empty list.

use serde::Serialize;

/// An updatable address-list field, by canonical name
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Addresses,
    AddressRanges,
    AddressLists,
    Description,
    Fqdns,
    GeoLocations,
}

/// Wire attribute name ↔ canonical field, for names that differ
///
/// `addresses` and `address_ranges` share the `addresses` wire attribute and
/// are handled separately.
pub const API_MAP: &[(&str, Field)] = &[
    ("addressLists", Field::AddressLists),
    ("geo", Field::GeoLocations),
];

impl Field {
    /// Every field that participates in reconciliation
    pub const UPDATABLES: [Field; 6] = [
        Field::Addresses,
        Field::AddressRanges,
        Field::AddressLists,
        Field::Description,
        Field::Fqdns,
        Field::GeoLocations,
    ];

    /// Canonical (report) name
    pub fn name(self) -> &'static str {
        match self {
            Field::Addresses => "addresses",
            Field::AddressRanges => "address_ranges",
            Field::AddressLists => "address_lists",
            Field::Description => "description",
            Field::Fqdns => "fqdns",
            Field::GeoLocations => "geo_locations",
        }
    }

    /// Attribute name used by the device API
    pub fn wire_name(self) -> &'static str {
        API_MAP
            .iter()
            .find(|(_, field)| *field == self)
            .map(|(wire, _)| *wire)
            .unwrap_or(match self {
                Field::AddressRanges => Field::Addresses.name(),
                other => other.name(),
            })
    }

    /// Canonical field for a device attribute name
    ///
    /// The shared `addresses` attribute maps to [`Field::Addresses`].
    pub fn from_wire_name(wire: &str) -> Option<Field> {
        if let Some((_, field)) = API_MAP.iter().find(|(name, _)| *name == wire) {
            return Some(*field);
        }
        Self::UPDATABLES
            .into_iter()
            .filter(|f| *f != Field::AddressRanges)
            .find(|f| f.wire_name() == wire)
    }

    /// Whether the field holds a collection rather than a scalar
    pub fn is_collection(self) -> bool {
        !matches!(self, Field::Description)
    }
}

/// A canonical field value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// True for an empty string or an empty list
    pub fn is_empty(&self) -> bool {
        match self {
            FieldValue::Text(s) => s.is_empty(),
            FieldValue::List(items) => items.is_empty(),
        }
    }

    /// The list items, if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            FieldValue::Text(_) => None,
        }
    }
}

/// Canonical values for every updatable field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldSet {
    pub description: Option<String>,
    pub addresses: Option<Vec<String>>,
    pub address_ranges: Option<Vec<String>>,
    pub address_lists: Option<Vec<String>>,
    pub fqdns: Option<Vec<String>>,
    pub geo_locations: Option<Vec<String>>,
}

impl FieldSet {
    /// Current value of `field`, if supplied
    pub fn get(&self, field: Field) -> Option<FieldValue> {
        match field {
            Field::Description => self.description.clone().map(FieldValue::Text),
            Field::Addresses => self.addresses.clone().map(FieldValue::List),
            Field::AddressRanges => self.address_ranges.clone().map(FieldValue::List),
            Field::AddressLists => self.address_lists.clone().map(FieldValue::List),
            Field::Fqdns => self.fqdns.clone().map(FieldValue::List),
            Field::GeoLocations => self.geo_locations.clone().map(FieldValue::List),
        }
    }

    /// List value of a collection field, if supplied
    pub fn list(&self, field: Field) -> Option<&[String]> {
        match field {
            Field::Description => None,
            Field::Addresses => self.addresses.as_deref(),
            Field::AddressRanges => self.address_ranges.as_deref(),
            Field::AddressLists => self.address_lists.as_deref(),
            Field::Fqdns => self.fqdns.as_deref(),
            Field::GeoLocations => self.geo_locations.as_deref(),
        }
    }
}
