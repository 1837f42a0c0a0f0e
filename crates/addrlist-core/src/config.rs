//! Configuration types for the address-list reconciler
//!
//! This module defines the device client configuration, the reconciler
//! settings and the raw invocation parameters that describe the desired
//! address list.

use serde::{Deserialize, Serialize};

/// Partition used when none is given
pub const DEFAULT_PARTITION: &str = "Common";

/// Device API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientConfig {
    /// BIG-IP iControl REST client
    Bigip {
        /// Management address (hostname or IP)
        server: String,
        /// Management port
        #[serde(default = "default_server_port")]
        server_port: u16,
        /// API user
        user: String,
        /// API password
        password: String,
        /// Whether to validate the device TLS certificate
        #[serde(default = "default_validate_certs")]
        validate_certs: bool,
    },

    /// Custom client
    Custom {
        /// Factory name to use
        factory: String,
        /// Custom configuration data
        config: serde_json::Value,
    },
}

impl ClientConfig {
    /// Validate the client configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        match self {
            ClientConfig::Bigip {
                server,
                server_port,
                user,
                ..
            } => {
                if server.is_empty() {
                    return Err(crate::Error::config("BIG-IP server cannot be empty"));
                }
                if *server_port == 0 {
                    return Err(crate::Error::config("BIG-IP server port must be > 0"));
                }
                if user.is_empty() {
                    return Err(crate::Error::config("BIG-IP user cannot be empty"));
                }
                Ok(())
            }
            ClientConfig::Custom { factory, config } => {
                if factory.is_empty() {
                    return Err(crate::Error::config("Custom client factory cannot be empty"));
                }
                if config.is_null() {
                    return Err(crate::Error::config("Custom client config cannot be null"));
                }
                Ok(())
            }
        }
    }

    /// Get the client type name
    pub fn type_name(&self) -> &str {
        match self {
            ClientConfig::Bigip { .. } => "bigip",
            ClientConfig::Custom { factory, .. } => factory,
        }
    }
}

/// Reconciler settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcilerConfig {
    /// Decide and report, but never call a mutating device operation
    #[serde(default)]
    pub dry_run: bool,

    /// Capacity of the reconciler event channel
    ///
    /// When full, events are dropped with a warning log.
    #[serde(default = "default_event_channel_capacity")]
    pub event_channel_capacity: usize,
}

impl ReconcilerConfig {
    /// Validate the reconciler settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.event_channel_capacity == 0 {
            return Err(crate::Error::config("Event channel capacity must be > 0"));
        }
        Ok(())
    }
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            dry_run: false,
            event_channel_capacity: default_event_channel_capacity(),
        }
    }
}

/// Whether the address list should exist on the device
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesiredState {
    #[default]
    Present,
    Absent,
}

impl std::str::FromStr for DesiredState {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "present" => Ok(DesiredState::Present),
            "absent" => Ok(DesiredState::Absent),
            other => Err(crate::Error::config(format!(
                "state must be 'present' or 'absent', got '{}'",
                other
            ))),
        }
    }
}

/// A geo-location as supplied by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocationParam {
    /// Country name or 2 character ISO code
    pub country: String,
    /// Optional region within the country
    #[serde(default)]
    pub region: Option<String>,
}

impl GeoLocationParam {
    /// Create a geo-location without a region
    pub fn new(country: impl Into<String>) -> Self {
        Self {
            country: country.into(),
            region: None,
        }
    }

    /// Set the region
    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }
}

/// Raw invocation parameters for one address list
///
/// Every collection is optional: `None` leaves the device value untouched,
/// `Some(vec![])` empties it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressListParams {
    /// Address list name
    pub name: String,

    /// Partition the list lives in
    #[serde(default = "default_partition")]
    pub partition: String,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub addresses: Option<Vec<String>>,

    #[serde(default)]
    pub address_ranges: Option<Vec<String>>,

    #[serde(default)]
    pub address_lists: Option<Vec<String>>,

    #[serde(default)]
    pub fqdns: Option<Vec<String>>,

    #[serde(default)]
    pub geo_locations: Option<Vec<GeoLocationParam>>,

    /// Whether the list should exist
    #[serde(default)]
    pub state: DesiredState,
}

impl AddressListParams {
    /// Create parameters for `name` in the default partition
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            partition: default_partition(),
            description: None,
            addresses: None,
            address_ranges: None,
            address_lists: None,
            fqdns: None,
            geo_locations: None,
            state: DesiredState::Present,
        }
    }

    /// Set the partition
    pub fn with_partition(mut self, partition: impl Into<String>) -> Self {
        self.partition = partition.into();
        self
    }

    /// Set the desired state
    pub fn with_state(mut self, state: DesiredState) -> Self {
        self.state = state;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the single addresses
    pub fn with_addresses<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.addresses = Some(addresses.into_iter().map(Into::into).collect());
        self
    }

    /// Set the address ranges
    pub fn with_address_ranges<I, S>(mut self, ranges: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.address_ranges = Some(ranges.into_iter().map(Into::into).collect());
        self
    }

    /// Set the nested list references
    pub fn with_address_lists<I, S>(mut self, lists: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.address_lists = Some(lists.into_iter().map(Into::into).collect());
        self
    }

    /// Set the FQDNs
    pub fn with_fqdns<I, S>(mut self, fqdns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fqdns = Some(fqdns.into_iter().map(Into::into).collect());
        self
    }

    /// Set the geo-locations
    pub fn with_geo_locations(mut self, geo: Vec<GeoLocationParam>) -> Self {
        self.geo_locations = Some(geo);
        self
    }

    /// Validate the identifying parameters
    pub fn validate(&self) -> Result<(), crate::error::ValidationError> {
        use crate::error::ValidationError;

        if self.name.trim().is_empty() {
            return Err(ValidationError::InvalidInput(
                "Address list name cannot be empty".to_string(),
            ));
        }
        if self.name.contains('/') {
            return Err(ValidationError::InvalidInput(format!(
                "Address list name '{}' cannot contain '/'",
                self.name
            )));
        }
        if self.partition.is_empty() || self.partition.contains('/') {
            return Err(ValidationError::InvalidInput(format!(
                "Partition '{}' must be a non-empty name without '/'",
                self.partition
            )));
        }
        Ok(())
    }
}

fn default_partition() -> String {
    DEFAULT_PARTITION.to_string()
}

fn default_server_port() -> u16 {
    443
}

fn default_validate_certs() -> bool {
    true
}

fn default_event_channel_capacity() -> usize {
    100
}
