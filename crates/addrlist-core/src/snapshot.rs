// # Device-State Snapshot
//
// Rebuilds canonical field values from an address list read off the device.
//
// The device returns single addresses and ranges merged into one `addresses`
// array. Entries are split into [`AddressEntry`] at this boundary; ranges are
// re-validated and re-normalized because the list may have been edited out of
// band. Every collection is sorted exactly like desired state, so the differ
// can compare structurally.

use crate::canonical::{AddressRange, RANGE_SEPARATOR, sorted};
use crate::error::Result;
use crate::fields::{Field, FieldSet};
use crate::wire::{AddressListResource, ListReference, NameEntry};

/// One entry of the device's mixed `addresses` array
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressEntry {
    Address(String),
    Range(AddressRange),
}

impl AddressEntry {
    /// Classify a raw device entry by the presence of the range separator
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        if raw.contains(RANGE_SEPARATOR) {
            Ok(AddressEntry::Range(raw.parse()?))
        } else {
            Ok(AddressEntry::Address(raw.to_string()))
        }
    }
}

/// Live state of one address list, in canonical form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressListState {
    pub name: String,
    pub partition: String,
    pub fields: FieldSet,
}

impl AddressListState {
    /// State of a list that does not exist yet
    pub fn empty(name: impl Into<String>, partition: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partition: partition.into(),
            fields: FieldSet::default(),
        }
    }

    /// Canonicalize a resource read from the device
    pub fn from_resource(resource: &AddressListResource) -> Result<Self> {
        let mut fields = FieldSet {
            description: resource.attribute(Field::Description.wire_name())?,
            ..FieldSet::default()
        };

        if let Some(entries) = resource.attribute::<Vec<NameEntry>>(Field::Addresses.wire_name())? {
            let mut addresses = Vec::new();
            let mut ranges = Vec::new();
            for entry in &entries {
                match AddressEntry::parse(&entry.name)? {
                    AddressEntry::Address(a) => addresses.push(a),
                    AddressEntry::Range(r) => ranges.push(r.to_string()),
                }
            }
            fields.addresses = Some(sorted(addresses));
            fields.address_ranges = Some(sorted(ranges));
        }

        fields.address_lists = resource
            .attribute::<Vec<ListReference>>(Field::AddressLists.wire_name())?
            .map(|refs| sorted(refs.into_iter().map(|r| format!("/{}/{}", r.partition, r.name))));

        fields.fqdns = resource
            .attribute::<Vec<NameEntry>>(Field::Fqdns.wire_name())?
            .map(|entries| sorted(entries.into_iter().map(|e| e.name)));

        fields.geo_locations = resource
            .attribute::<Vec<NameEntry>>(Field::GeoLocations.wire_name())?
            .map(|entries| sorted(entries.into_iter().map(|e| e.name)));

        Ok(Self {
            name: resource.name.clone(),
            partition: resource.partition.clone(),
            fields,
        })
    }
}
