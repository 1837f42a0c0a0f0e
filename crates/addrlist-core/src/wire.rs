//! Device wire shapes
//!
//! The device stores an address list as a flat JSON object whose attribute
//! names differ from the canonical field names (see [`crate::fields::API_MAP`]).
//! Single addresses and ranges share one `addresses` array of `{name}` objects;
//! nested lists are `{name, partition}` objects.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canonical::ListRef;
use crate::diff::ChangeSet;
use crate::error::{Error, Result, ValidationError};
use crate::fields::{Field, FieldSet, FieldValue};

/// Attribute payload sent to `create` / `modify`
pub type WireAttributes = Map<String, Value>;

/// `{ "name": ... }` entry used by addresses, fqdns and geo
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameEntry {
    pub name: String,
}

/// `{ "name": ..., "partition": ... }` reference to another list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListReference {
    pub name: String,
    pub partition: String,
}

impl From<&ListRef> for ListReference {
    fn from(r: &ListRef) -> Self {
        Self {
            name: r.name().to_string(),
            partition: r.partition().to_string(),
        }
    }
}

/// An address list as read from the device
#[derive(Debug, Clone, PartialEq)]
pub struct AddressListResource {
    pub name: String,
    pub partition: String,
    /// Every other attribute the device returned, by wire name
    pub attributes: WireAttributes,
}

impl AddressListResource {
    /// Build a resource from the device's JSON representation
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(mut attributes) = value else {
            return Err(Error::Other(
                "Invalid resource format: expected a JSON object".to_string(),
            ));
        };

        let mut take_str = |key: &str| match attributes.remove(key) {
            Some(Value::String(s)) => Ok(s),
            _ => Err(Error::Other(format!(
                "Invalid resource format: '{}' is not a string",
                key
            ))),
        };
        let name = take_str("name")?;
        let partition = take_str("partition")?;

        Ok(Self {
            name,
            partition,
            attributes,
        })
    }

    /// `/partition/name` of the resource
    pub fn full_path(&self) -> String {
        format!("/{}/{}", self.partition, self.name)
    }

    /// Decode one attribute, `None` when the device omitted it
    pub fn attribute<T>(&self, wire_name: &str) -> Result<Option<T>>
    where
        T: serde::de::DeserializeOwned,
    {
        self.attributes
            .get(wire_name)
            .map(|v| serde_json::from_value(v.clone()))
            .transpose()
            .map_err(Error::from)
    }
}

fn name_entries(items: &[String]) -> Value {
    Value::Array(
        items
            .iter()
            .map(|name| serde_json::json!({ "name": name }))
            .collect(),
    )
}

/// Render a change-set as device attributes
///
/// `want` and `have` are consulted only for the shared `addresses` array:
/// when either addresses or ranges change, the untouched half is taken from
/// desired state when supplied, else from live state, so the device never
/// loses entries of the other kind.
pub fn build_attributes(changes: &ChangeSet, want: &FieldSet, have: &FieldSet) -> Result<WireAttributes> {
    let mut attrs = WireAttributes::new();

    for (field, value) in changes.iter() {
        match (field, value) {
            (Field::Description, FieldValue::Text(text)) => {
                attrs.insert(field.wire_name().to_string(), Value::String(text.clone()));
            }
            (Field::Addresses | Field::AddressRanges, _) => {
                if attrs.contains_key(field.wire_name()) {
                    continue;
                }
                let pick = |f: Field| {
                    changes
                        .get(f)
                        .and_then(FieldValue::as_list)
                        .or_else(|| want.list(f))
                        .or_else(|| have.list(f))
                        .unwrap_or_default()
                };
                let merged: Vec<String> = pick(Field::Addresses)
                    .iter()
                    .chain(pick(Field::AddressRanges))
                    .cloned()
                    .collect();
                attrs.insert(field.wire_name().to_string(), name_entries(&merged));
            }
            (Field::AddressLists, FieldValue::List(paths)) => {
                let refs = paths
                    .iter()
                    .map(|p| ListRef::parse_absolute(p).map(|r| ListReference::from(&r)))
                    .collect::<std::result::Result<Vec<_>, ValidationError>>()?;
                attrs.insert(field.wire_name().to_string(), serde_json::to_value(refs)?);
            }
            (Field::Fqdns | Field::GeoLocations, FieldValue::List(items)) => {
                attrs.insert(field.wire_name().to_string(), name_entries(items));
            }
            (field, value) => {
                return Err(Error::Other(format!(
                    "Field {} cannot hold {:?}",
                    field.name(),
                    value
                )));
            }
        }
    }

    Ok(attrs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resource_from_json_splits_identity() {
        let res = AddressListResource::from_json(json!({
            "kind": "tm:security:firewall:address-list:address-liststate",
            "name": "foo",
            "partition": "Common",
            "addresses": [{"name": "1.1.1.1"}]
        }))
        .unwrap();

        assert_eq!(res.full_path(), "/Common/foo");
        assert!(!res.attributes.contains_key("name"));
        let addresses: Option<Vec<NameEntry>> = res.attribute("addresses").unwrap();
        assert_eq!(addresses.unwrap()[0].name, "1.1.1.1");
        let fqdns: Option<Vec<NameEntry>> = res.attribute("fqdns").unwrap();
        assert!(fqdns.is_none());
    }

    #[test]
    fn resource_without_name_is_rejected() {
        assert!(AddressListResource::from_json(json!({"partition": "Common"})).is_err());
        assert!(AddressListResource::from_json(json!([1, 2])).is_err());
    }

    #[test]
    fn attributes_use_wire_names() {
        let mut changes = ChangeSet::default();
        changes.insert(
            Field::AddressLists,
            FieldValue::List(vec!["/Common/a".into(), "/Tenant/b".into()]),
        );
        changes.insert(Field::GeoLocations, FieldValue::List(vec!["US:California".into()]));
        changes.insert(Field::Description, FieldValue::Text("desc".into()));

        let attrs = build_attributes(&changes, &FieldSet::default(), &FieldSet::default()).unwrap();

        assert_eq!(
            attrs["addressLists"],
            json!([
                {"name": "a", "partition": "Common"},
                {"name": "b", "partition": "Tenant"}
            ])
        );
        assert_eq!(attrs["geo"], json!([{"name": "US:California"}]));
        assert_eq!(attrs["description"], json!("desc"));
        assert!(!attrs.contains_key("address_lists"));
    }

    #[test]
    fn address_change_keeps_live_ranges() {
        let mut changes = ChangeSet::default();
        changes.insert(Field::Addresses, FieldValue::List(vec!["1.1.1.1".into()]));
        let have = FieldSet {
            addresses: Some(vec!["9.9.9.9".into()]),
            address_ranges: Some(vec!["2.2.2.2-3.3.3.3".into()]),
            ..FieldSet::default()
        };

        let attrs = build_attributes(&changes, &FieldSet::default(), &have).unwrap();

        assert_eq!(
            attrs["addresses"],
            json!([{"name": "1.1.1.1"}, {"name": "2.2.2.2-3.3.3.3"}])
        );
    }

    #[test]
    fn range_change_prefers_desired_addresses() {
        let mut changes = ChangeSet::default();
        changes.insert(
            Field::AddressRanges,
            FieldValue::List(vec!["4.4.4.4-5.5.5.5".into()]),
        );
        let want = FieldSet {
            addresses: Some(vec!["1.1.1.1".into()]),
            ..FieldSet::default()
        };
        let have = FieldSet {
            addresses: Some(vec!["1.1.1.1".into(), "7.7.7.7".into()]),
            ..FieldSet::default()
        };

        let attrs = build_attributes(&changes, &want, &have).unwrap();

        assert_eq!(
            attrs["addresses"],
            json!([{"name": "1.1.1.1"}, {"name": "4.4.4.4-5.5.5.5"}])
        );
    }
}
