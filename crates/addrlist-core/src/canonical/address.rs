//! Address and address-range normalization

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use crate::error::ValidationError;

/// Separator between the two endpoints of a range
pub const RANGE_SEPARATOR: char = '-';

/// Parse a single IPv4 or IPv6 address
pub fn parse_address(raw: &str) -> Result<IpAddr, ValidationError> {
    raw.trim()
        .parse()
        .map_err(|_| ValidationError::InvalidAddress(raw.to_string()))
}

/// An inclusive address range with `start <= stop`
///
/// Construction swaps reversed endpoints and rejects ranges mixing IPv4 and
/// IPv6, so every value of this type is already canonical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressRange {
    start: IpAddr,
    stop: IpAddr,
}

impl AddressRange {
    /// Build a range from two endpoints given in any order
    pub fn new(a: IpAddr, b: IpAddr) -> Result<Self, ValidationError> {
        if a.is_ipv4() != b.is_ipv4() {
            return Err(ValidationError::MixedIpVersion(format!("{a}{RANGE_SEPARATOR}{b}")));
        }
        let (start, stop) = if a > b { (b, a) } else { (a, b) };
        Ok(Self { start, stop })
    }

    /// First address of the range
    pub fn start(&self) -> IpAddr {
        self.start
    }

    /// Last address of the range
    pub fn stop(&self) -> IpAddr {
        self.stop
    }
}

impl FromStr for AddressRange {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut parts = raw.split(RANGE_SEPARATOR);
        let (Some(start), Some(stop), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ValidationError::InvalidRange(raw.to_string()));
        };
        Self::new(parse_address(start)?, parse_address(stop)?)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start, RANGE_SEPARATOR, self.stop)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reversed_range_is_swapped() {
        let a: AddressRange = "2.2.2.2-1.1.1.1".parse().unwrap();
        let b: AddressRange = "1.1.1.1-2.2.2.2".parse().unwrap();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "1.1.1.1-2.2.2.2");
        assert_eq!(a.start(), "1.1.1.1".parse::<IpAddr>().unwrap());
        assert_eq!(a.stop(), "2.2.2.2".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn ordering_is_numeric_not_lexical() {
        let range: AddressRange = "10.0.0.1-9.0.0.1".parse().unwrap();
        assert_eq!(range.to_string(), "9.0.0.1-10.0.0.1");
    }

    #[test]
    fn endpoints_are_trimmed() {
        let range: AddressRange = " 1.1.1.1 - 1.1.1.9 ".parse().unwrap();
        assert_eq!(range.to_string(), "1.1.1.1-1.1.1.9");
    }

    #[test]
    fn mixed_versions_are_rejected() {
        let err = "1.1.1.1-::1".parse::<AddressRange>().unwrap_err();
        assert!(matches!(err, ValidationError::MixedIpVersion(_)));
    }

    #[test]
    fn ipv6_ranges_are_compressed() {
        let range: AddressRange = "2001:db8::ff-2001:0db8:0:0::1".parse().unwrap();
        assert_eq!(range.to_string(), "2001:db8::1-2001:db8::ff");
    }

    #[test]
    fn malformed_ranges_are_rejected() {
        assert!(matches!(
            "1.1.1.1".parse::<AddressRange>(),
            Err(ValidationError::InvalidRange(_))
        ));
        assert!(matches!(
            "1.1.1.1-2.2.2.2-3.3.3.3".parse::<AddressRange>(),
            Err(ValidationError::InvalidRange(_))
        ));
        assert!(matches!(
            "1.1.1.1-nope".parse::<AddressRange>(),
            Err(ValidationError::InvalidAddress(_))
        ));
    }
}
