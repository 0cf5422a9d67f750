use crate::domain::fleet::VehicleClass;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub store: StoreSettings,
    pub availability: AvailabilitySettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl ServerSettings {
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreSettings {
    pub data_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct AvailabilitySettings {
    pub refresh_interval_secs: u64,
    pub unit_goal_percent: f64,
    pub composition_goal_percent: f64,
}

impl AvailabilitySettings {
    pub fn default_goal(&self, class: VehicleClass) -> f64 {
        match class {
            VehicleClass::Unit => self.unit_goal_percent,
            VehicleClass::Composition => self.composition_goal_percent,
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.refresh_interval_secs > 0,
            "availability.refresh_interval_secs must be at least 1"
        );
        Ok(())
    }
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        Self {
            refresh_interval_secs: 60,
            unit_goal_percent: 90.0,
            composition_goal_percent: 90.0,
        }
    }
}

/// Load `config/fleet` (any format the `config` crate reads, optional),
/// then `FLEET__SECTION__KEY` environment overrides, on top of defaults.
pub fn load_app_config() -> anyhow::Result<AppConfig> {
    let builder = builder_with_defaults()?
        .add_source(config::File::with_name("config/fleet").required(false))
        .add_source(config::Environment::with_prefix("FLEET").separator("__"));

    build_config(builder)
}

fn build_config(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<AppConfig> {
    let config: AppConfig = builder.build()?.try_deserialize()?;
    config.availability.validate()?;
    Ok(config)
}

fn builder_with_defaults() -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    let availability = AvailabilitySettings::default();

    Ok(config::Config::builder()
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("store.data_dir", "data")?
        .set_default(
            "availability.refresh_interval_secs",
            availability.refresh_interval_secs,
        )?
        .set_default("availability.unit_goal_percent", availability.unit_goal_percent)?
        .set_default(
            "availability.composition_goal_percent",
            availability.composition_goal_percent,
        )?)
}
