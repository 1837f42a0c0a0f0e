//! Invocation report
//!
//! A [`Report`] carries the `changed` flag plus the new canonical value of
//! every field that changed (or would change, in dry-run). Fields that did
//! not change are left out of the serialized form entirely.

use serde::Serialize;

use crate::diff::ChangeSet;
use crate::fields::{Field, FieldValue};

/// Changed fields, by canonical name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportableChangeSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addresses: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_ranges: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_lists: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fqdns: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_locations: Option<Vec<String>>,
}

impl ReportableChangeSet {
    /// True when no field is reported
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl From<&ChangeSet> for ReportableChangeSet {
    fn from(changes: &ChangeSet) -> Self {
        let mut out = Self::default();
        for (field, value) in changes.iter() {
            match (field, value.clone()) {
                (Field::Description, FieldValue::Text(text)) => out.description = Some(text),
                (Field::Addresses, FieldValue::List(items)) => out.addresses = Some(items),
                (Field::AddressRanges, FieldValue::List(items)) => out.address_ranges = Some(items),
                (Field::AddressLists, FieldValue::List(items)) => out.address_lists = Some(items),
                (Field::Fqdns, FieldValue::List(items)) => out.fqdns = Some(items),
                (Field::GeoLocations, FieldValue::List(items)) => out.geo_locations = Some(items),
                // Mismatched pairs are never produced by the differ
                _ => {}
            }
        }
        out
    }
}

/// Outcome of one reconciliation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Report {
    /// Whether the device was (or, in dry-run, would be) changed
    pub changed: bool,
    #[serde(flatten)]
    pub changes: ReportableChangeSet,
}

impl Report {
    /// Nothing changed
    pub fn unchanged() -> Self {
        Self::default()
    }

    /// A change occurred, carrying the fields that changed
    pub fn changed(changes: &ChangeSet) -> Self {
        Self {
            changed: true,
            changes: ReportableChangeSet::from(changes),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn only_present_fields_are_serialized() {
        let mut changes = ChangeSet::default();
        changes.insert(
            Field::Addresses,
            FieldValue::List(vec!["1.1.1.1".into(), "2.2.2.2".into()]),
        );
        changes.insert(Field::AddressLists, FieldValue::List(vec!["/Common/x".into()]));

        let report = Report::changed(&changes);

        assert_eq!(
            serde_json::to_value(&report).unwrap(),
            json!({
                "changed": true,
                "addresses": ["1.1.1.1", "2.2.2.2"],
                "address_lists": ["/Common/x"]
            })
        );
    }

    #[test]
    fn unchanged_report_is_just_the_flag() {
        let report = Report::unchanged();
        assert!(report.changes.is_empty());
        assert_eq!(serde_json::to_value(&report).unwrap(), json!({"changed": false}));
    }

    #[test]
    fn empty_collection_is_still_reported() {
        let mut changes = ChangeSet::default();
        changes.insert(Field::Fqdns, FieldValue::List(Vec::new()));
        let report = Report::changed(&changes);
        assert_eq!(report.changes.fqdns, Some(Vec::new()));
    }
}
