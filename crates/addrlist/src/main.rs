// # addrlist - Address List Reconciler
//
// Thin integration layer: all reconciliation logic lives in addrlist-core.
//
// The binary is responsible for:
// 1. Reading configuration from environment variables
// 2. Initializing logging and the runtime
// 3. Registering device clients
// 4. Running one reconciliation and printing the JSON report to stdout
//
// ## Configuration
//
// ### Device
// - `ADDRLIST_CLIENT_TYPE`: Device client (bigip, memory); default bigip
// - `ADDRLIST_SERVER`: Management address of the device
// - `ADDRLIST_SERVER_PORT`: Management port; default 443
// - `ADDRLIST_USER` / `ADDRLIST_PASSWORD`: Credentials
// - `ADDRLIST_VALIDATE_CERTS`: Validate TLS certificates; default true
//
// ### Address list
// - `ADDRLIST_NAME`: Name of the list (required)
// - `ADDRLIST_PARTITION`: Partition; falls back to `F5_PARTITION`, then `Common`
// - `ADDRLIST_DESCRIPTION`
// - `ADDRLIST_ADDRESSES`, `ADDRLIST_ADDRESS_RANGES`, `ADDRLIST_ADDRESS_LISTS`,
//   `ADDRLIST_FQDNS`: Comma-separated lists
// - `ADDRLIST_GEO_LOCATIONS`: Comma-separated `Country[:Region]` entries
// - `ADDRLIST_STATE`: present or absent; default present
//
// An unset list variable leaves that field untouched on the device; a
// variable set to an empty string clears it.
//
// ### Run
// - `ADDRLIST_DRY_RUN`: Report what would change without changing it
// - `ADDRLIST_LOG_LEVEL`: trace, debug, info, warn, error; default info
//
// ## Example
//
// ```bash
// export ADDRLIST_SERVER=10.0.0.1
// export ADDRLIST_USER=admin
// export ADDRLIST_PASSWORD=secret
// export ADDRLIST_NAME=blocklist
// export ADDRLIST_ADDRESSES=192.0.2.10,192.0.2.11
//
// addrlist
// ```

use addrlist_core::{
    AddressListParams, ClientConfig, ClientRegistry, DesiredState, GeoLocationParam, Reconciler,
    ReconcilerConfig, Report,
};
use anyhow::{Context, Result};
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for different termination scenarios
///
/// - 0: Success (changed or not)
/// - 1: Configuration or input validation error
/// - 2: Device or runtime error
#[derive(Debug, Clone, Copy)]
enum AddrlistExitCode {
    Success = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<AddrlistExitCode> for ExitCode {
    fn from(code: AddrlistExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    client: ClientConfig,
    params: AddressListParams,
    dry_run: bool,
    log_level: String,
}

/// Split a comma-separated variable; unset stays `None`, empty is `Some([])`
fn list(value: Option<String>) -> Option<Vec<String>> {
    value.map(|v| {
        v.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => anyhow::bail!("{} must be true or false. Got: {}", key, other),
    }
}

fn parse_geo(entry: &str) -> GeoLocationParam {
    match entry.split_once(':') {
        Some((country, region)) => GeoLocationParam::new(country.trim()).with_region(region.trim()),
        None => GeoLocationParam::new(entry.trim()),
    }
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through `var`, which returns `None` for unset keys
    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let client_type = var("ADDRLIST_CLIENT_TYPE").unwrap_or_else(|| "bigip".to_string());
        let client = match client_type.as_str() {
            "bigip" => ClientConfig::Bigip {
                server: var("ADDRLIST_SERVER").context("ADDRLIST_SERVER is required")?,
                server_port: var("ADDRLIST_SERVER_PORT")
                    .map(|p| p.parse())
                    .transpose()
                    .context("ADDRLIST_SERVER_PORT must be a port number")?
                    .unwrap_or(443),
                user: var("ADDRLIST_USER").context("ADDRLIST_USER is required")?,
                password: var("ADDRLIST_PASSWORD").unwrap_or_default(),
                validate_certs: var("ADDRLIST_VALIDATE_CERTS")
                    .map(|v| parse_bool("ADDRLIST_VALIDATE_CERTS", &v))
                    .transpose()?
                    .unwrap_or(true),
            },
            other => ClientConfig::Custom {
                factory: other.to_string(),
                config: serde_json::json!({}),
            },
        };

        let partition = var("ADDRLIST_PARTITION")
            .or_else(|| var("F5_PARTITION"))
            .unwrap_or_else(|| addrlist_core::config::DEFAULT_PARTITION.to_string());

        let state: DesiredState = var("ADDRLIST_STATE")
            .map(|s| s.parse())
            .transpose()?
            .unwrap_or_default();

        let params = AddressListParams {
            name: var("ADDRLIST_NAME").context("ADDRLIST_NAME is required")?,
            partition,
            description: var("ADDRLIST_DESCRIPTION"),
            addresses: list(var("ADDRLIST_ADDRESSES")),
            address_ranges: list(var("ADDRLIST_ADDRESS_RANGES")),
            address_lists: list(var("ADDRLIST_ADDRESS_LISTS")),
            fqdns: list(var("ADDRLIST_FQDNS")),
            geo_locations: list(var("ADDRLIST_GEO_LOCATIONS"))
                .map(|entries| entries.iter().map(|e| parse_geo(e)).collect()),
            state,
        };

        Ok(Self {
            client,
            params,
            dry_run: var("ADDRLIST_DRY_RUN")
                .map(|v| parse_bool("ADDRLIST_DRY_RUN", &v))
                .transpose()?
                .unwrap_or(false),
            log_level: var("ADDRLIST_LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        self.client
            .validate()
            .map_err(|e| anyhow::anyhow!("Device configuration: {}", e))?;

        self.params
            .validate()
            .map_err(|e| anyhow::anyhow!("Address list configuration: {}", e))?;

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => anyhow::bail!(
                "ADDRLIST_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                self.log_level
            ),
        }

        Ok(())
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {:#}", e);
            return AddrlistExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {:#}", e);
        return AddrlistExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // stdout carries the report only
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return AddrlistExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return AddrlistExitCode::RuntimeError.into();
        }
    };

    let code = rt.block_on(async {
        match run(config).await {
            Ok(report) => {
                print_report(&report);
                AddrlistExitCode::Success
            }
            Err(e) if e.is_validation() => {
                error!("{}", e);
                AddrlistExitCode::ConfigError
            }
            Err(e) => {
                error!("{}", e);
                AddrlistExitCode::RuntimeError
            }
        }
    });

    code.into()
}

/// Build the client and reconcile the configured list
async fn run(config: Config) -> addrlist_core::Result<Report> {
    let registry = ClientRegistry::with_builtin();
    addrlist_client_bigip::register(&registry);
    debug!("Registered device clients: {:?}", registry.list_clients());

    let client = registry.create_client(&config.client)?;
    info!(
        "Reconciling /{}/{} via {} (state: {:?}, dry_run: {})",
        config.params.partition,
        config.params.name,
        client.client_name(),
        config.params.state,
        config.dry_run
    );

    let reconciler_config = ReconcilerConfig {
        dry_run: config.dry_run,
        ..ReconcilerConfig::default()
    };
    let (reconciler, _events) = Reconciler::new(client, reconciler_config)?;

    reconciler.reconcile(&config.params).await
}

/// Print the report as JSON; failures are logged and otherwise ignored
fn print_report(report: &Report) {
    match serde_json::to_string(report) {
        Ok(json) => println!("{}", json),
        Err(e) => error!("Failed to serialize report: {}", e),
    }
}
