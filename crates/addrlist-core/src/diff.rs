//! Desired vs. live comparison
//!
//! Each [`Field`] is dispatched to a [`Comparator`]. A field whose desired
//! value is absent never changes; otherwise the whole desired value replaces
//! the live one whenever they differ. Element-level add/remove is not
//! attempted since the device API only accepts whole collections.

use std::collections::{BTreeMap, BTreeSet};

use crate::fields::{Field, FieldSet, FieldValue};

/// How a field's desired and live values are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// Set equality over canonical collections; order and duplicates ignored
    SortedSet,
    /// Plain inequality of the canonical value
    Direct,
}

impl Comparator {
    /// Compare `want` against `have`, returning the change if any
    pub fn compare(self, want: Option<FieldValue>, have: Option<FieldValue>) -> Option<FieldValue> {
        let want = want?;
        let Some(have) = have else {
            return Some(want);
        };
        let differs = match (self, &want, &have) {
            (Comparator::SortedSet, FieldValue::List(w), FieldValue::List(h)) => {
                w.iter().collect::<BTreeSet<_>>() != h.iter().collect::<BTreeSet<_>>()
            }
            _ => want != have,
        };
        differs.then_some(want)
    }
}

impl Field {
    /// Comparator used for this field
    pub fn comparator(self) -> Comparator {
        if self.is_collection() {
            Comparator::SortedSet
        } else {
            Comparator::Direct
        }
    }
}

/// Fields whose desired value differs from live state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: BTreeMap<Field, FieldValue>,
}

impl ChangeSet {
    /// Record a change
    pub fn insert(&mut self, field: Field, value: FieldValue) {
        self.changes.insert(field, value);
    }

    /// New value of `field`, if it changes
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.changes.get(&field)
    }

    /// True when nothing changes
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Number of changing fields
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Changing fields in [`Field`] order
    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.changes.iter().map(|(f, v)| (*f, v))
    }

    /// Names of the changing fields
    pub fn field_names(&self) -> Vec<&'static str> {
        self.changes.keys().map(|f| f.name()).collect()
    }

    /// Drop empty strings and empty collections
    pub fn without_empty(mut self) -> Self {
        self.changes.retain(|_, v| !v.is_empty());
        self
    }
}

/// Desired and live field values of one address list
#[derive(Debug, Clone, Copy)]
pub struct Difference<'a> {
    want: &'a FieldSet,
    have: &'a FieldSet,
}

impl<'a> Difference<'a> {
    pub fn new(want: &'a FieldSet, have: &'a FieldSet) -> Self {
        Self { want, have }
    }

    /// Change for one field, if any
    pub fn compare(&self, field: Field) -> Option<FieldValue> {
        field
            .comparator()
            .compare(self.want.get(field), self.have.get(field))
    }

    /// Changes across every updatable field
    pub fn change_set(&self) -> ChangeSet {
        let mut changes = ChangeSet::default();
        for field in Field::UPDATABLES {
            if let Some(value) = self.compare(field) {
                changes.insert(field, value);
            }
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addresses(items: &[&str]) -> FieldSet {
        FieldSet {
            addresses: Some(items.iter().map(|s| s.to_string()).collect()),
            ..FieldSet::default()
        }
    }

    #[test]
    fn same_set_in_different_order_is_unchanged() {
        let want = addresses(&["1.1.1.1", "2.2.2.2"]);
        let have = addresses(&["2.2.2.2", "1.1.1.1"]);
        assert!(Difference::new(&want, &have).change_set().is_empty());
    }

    #[test]
    fn subset_replaces_whole_collection() {
        let want = addresses(&["1.1.1.1"]);
        let have = addresses(&["1.1.1.1", "2.2.2.2"]);
        assert_eq!(
            Difference::new(&want, &have).compare(Field::Addresses),
            Some(FieldValue::List(vec!["1.1.1.1".into()]))
        );
    }

    #[test]
    fn absent_desired_value_never_changes() {
        let want = FieldSet::default();
        let have = addresses(&["1.1.1.1"]);
        assert!(Difference::new(&want, &have).change_set().is_empty());
    }

    #[test]
    fn absent_live_value_takes_desired() {
        let want = FieldSet {
            fqdns: Some(vec!["example.com".into()]),
            ..FieldSet::default()
        };
        let changes = Difference::new(&want, &FieldSet::default()).change_set();
        assert_eq!(changes.field_names(), vec!["fqdns"]);
    }

    #[test]
    fn empty_desired_list_clears_live_list() {
        let want = addresses(&[]);
        let have = addresses(&["1.1.1.1"]);
        assert_eq!(
            Difference::new(&want, &have).compare(Field::Addresses),
            Some(FieldValue::List(Vec::new()))
        );
    }

    #[test]
    fn description_uses_direct_comparison() {
        assert_eq!(Field::Description.comparator(), Comparator::Direct);
        let want = FieldSet {
            description: Some("new".into()),
            ..FieldSet::default()
        };
        let have = FieldSet {
            description: Some("old".into()),
            ..FieldSet::default()
        };
        assert_eq!(
            Difference::new(&want, &have).compare(Field::Description),
            Some(FieldValue::Text("new".into()))
        );
        assert_eq!(Difference::new(&want, &want).compare(Field::Description), None);
    }

    #[test]
    fn without_empty_drops_empty_values() {
        let mut changes = ChangeSet::default();
        changes.insert(Field::Addresses, FieldValue::List(Vec::new()));
        changes.insert(Field::Description, FieldValue::Text(String::new()));
        changes.insert(Field::Fqdns, FieldValue::List(vec!["a.com".into()]));
        let changes = changes.without_empty();
        assert_eq!(changes.len(), 1);
        assert!(changes.get(Field::Fqdns).is_some());
    }
}
