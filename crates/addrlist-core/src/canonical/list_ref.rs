//! Fully-qualified references to other address lists

use std::fmt;

use crate::error::ValidationError;

/// A `/partition/name` reference to another address list
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ListRef {
    partition: String,
    name: String,
}

impl ListRef {
    /// Resolve `raw` against `default_partition`
    ///
    /// Absolute references (leading `/`) must be exactly `/partition/name`;
    /// bare names inherit `default_partition`.
    pub fn resolve(raw: &str, default_partition: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidListReference(raw.to_string());

        let (partition, name) = match raw.strip_prefix('/') {
            Some(path) => path.split_once('/').ok_or_else(invalid)?,
            None => (default_partition, raw),
        };
        if partition.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        Ok(Self {
            partition: partition.to_string(),
            name: name.to_string(),
        })
    }

    /// Parse an already fully-qualified reference
    pub fn parse_absolute(path: &str) -> Result<Self, ValidationError> {
        if !path.starts_with('/') {
            return Err(ValidationError::InvalidListReference(path.to_string()));
        }
        Self::resolve(path, "")
    }

    /// Partition the referenced list lives in
    pub fn partition(&self) -> &str {
        &self.partition
    }

    /// Name of the referenced list
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ListRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.partition, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_inherits_partition() {
        let r = ListRef::resolve("foo", "Common").unwrap();
        assert_eq!(r.to_string(), "/Common/foo");
    }

    #[test]
    fn absolute_reference_is_unchanged() {
        let r = ListRef::resolve("/Tenant/bar", "Common").unwrap();
        assert_eq!(r.to_string(), "/Tenant/bar");
        assert_eq!(r.partition(), "Tenant");
        assert_eq!(r.name(), "bar");
    }

    #[test]
    fn malformed_references_are_rejected() {
        for raw in ["/Common", "/Common/", "//foo", "/a/b/c", "a/b", ""] {
            assert!(
                ListRef::resolve(raw, "Common").is_err(),
                "expected {raw:?} to be rejected"
            );
        }
    }

    #[test]
    fn parse_absolute_requires_leading_slash() {
        assert!(ListRef::parse_absolute("foo").is_err());
        assert_eq!(
            ListRef::parse_absolute("/Common/foo").unwrap().name(),
            "foo"
        );
    }
}
