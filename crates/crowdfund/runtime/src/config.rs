//! Configuration for a crowdfund deployment

use crowdfund_types::{Amount, AmountParseError, ContributionPolicy, Timestamp};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrowdfundConfig {
    /// Campaign parameters
    #[serde(default)]
    pub campaign: CampaignConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Campaign parameters fixed at deployment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignConfig {
    /// Funding threshold in ether
    #[serde(default = "default_threshold")]
    pub threshold: String,

    /// Seconds from deployment until the deadline
    #[serde(default = "default_duration")]
    pub duration_secs: u64,

    /// Whether contributions are still taken after resolution
    #[serde(default)]
    pub contribution_policy: ContributionPolicy,

    /// Deploy a recipient that rejects the forwarded funds
    #[serde(default)]
    pub recipient_refuses_funds: bool,
}

impl Default for CampaignConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            duration_secs: default_duration(),
            contribution_policy: ContributionPolicy::default(),
            recipient_refuses_funds: false,
        }
    }
}

impl CampaignConfig {
    pub fn threshold_amount(&self) -> Result<Amount, ConfigError> {
        Ok(Amount::from_ether(&self.threshold)?)
    }

    pub fn deadline_from(&self, now: Timestamp) -> Timestamp {
        now.plus_secs(self.duration_secs)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.threshold_amount()?;
        if self.duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid threshold: {0}")]
    InvalidThreshold(#[from] AmountParseError),

    #[error("Campaign duration must be greater than zero")]
    ZeroDuration,
}

// Default value helpers
fn default_threshold() -> String {
    "1".to_string()
}

fn default_duration() -> u64 {
    30
}

fn default_log_level() -> String {
    "info".to_string()
}

impl CrowdfundConfig {
    /// Load configuration: defaults, then `path` if given, then `CROWDFUND_*`
    /// environment variables (`CROWDFUND_CAMPAIGN__DURATION_SECS=60`).
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&CrowdfundConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CROWDFUND")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = builder.build()?.try_deserialize()?;
        config.campaign.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;

    /// Serializes tests that read `CROWDFUND_*` variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn env_guard() -> std::sync::MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[test]
    fn test_default_config() {
        let config = CrowdfundConfig::default();
        assert_eq!(config.campaign.threshold, "1");
        assert_eq!(config.campaign.duration_secs, 30);
        assert_eq!(
            config.campaign.contribution_policy,
            ContributionPolicy::AcceptAlways
        );
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn test_campaign_derivations() {
        let campaign = CampaignConfig::default();
        assert_eq!(campaign.threshold_amount().unwrap(), Amount::ether(1));
        assert_eq!(
            campaign.deadline_from(Timestamp::from_secs(100)),
            Timestamp::from_secs(130)
        );
        assert!(campaign.validate().is_ok());
    }

    #[test]
    fn test_validation_failures() {
        let campaign = CampaignConfig {
            duration_secs: 0,
            ..Default::default()
        };
        assert!(matches!(campaign.validate(), Err(ConfigError::ZeroDuration)));

        let campaign = CampaignConfig {
            threshold: "one".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            campaign.validate(),
            Err(ConfigError::InvalidThreshold(_))
        ));
    }

    #[test]
    fn test_load_from_toml_file() {
        let _env = env_guard();
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[campaign]
threshold = "2.5"
duration_secs = 3600
contribution_policy = "reject_after_resolution"

[logging]
level = "debug"
"#
        )
        .unwrap();

        let config = CrowdfundConfig::load(Some(file.path())).unwrap();
        assert_eq!(
            config.campaign.threshold_amount().unwrap(),
            Amount::from_ether("2.5").unwrap()
        );
        assert_eq!(config.campaign.duration_secs, 3600);
        assert_eq!(
            config.campaign.contribution_policy,
            ContributionPolicy::RejectAfterResolution
        );
        assert!(!config.campaign.recipient_refuses_funds);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_missing_file_fails() {
        let _env = env_guard();
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(matches!(
            CrowdfundConfig::load(Some(&missing)),
            Err(ConfigError::Load(_))
        ));
    }

    #[test]
    fn test_load_rejects_zero_duration() {
        let _env = env_guard();
        let mut file = tempfile::Builder::new()
            .suffix(".json")
            .tempfile()
            .unwrap();
        write!(file, r#"{{"campaign": {{"duration_secs": 0}}}}"#).unwrap();

        assert!(matches!(
            CrowdfundConfig::load(Some(file.path())),
            Err(ConfigError::ZeroDuration)
        ));
    }

    #[test]
    fn test_environment_overrides_defaults_and_file() {
        let _env = env_guard();
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[campaign]\nthreshold = \"2\"\nduration_secs = 3600\n\n[logging]\nlevel = \"warn\""
        )
        .unwrap();

        std::env::set_var("CROWDFUND_CAMPAIGN__DURATION_SECS", "60");
        std::env::set_var("CROWDFUND_CAMPAIGN__THRESHOLD", "0.5");
        let from_file = CrowdfundConfig::load(Some(file.path()));
        let from_defaults = CrowdfundConfig::load(None);
        std::env::remove_var("CROWDFUND_CAMPAIGN__DURATION_SECS");
        std::env::remove_var("CROWDFUND_CAMPAIGN__THRESHOLD");

        let from_file = from_file.unwrap();
        assert_eq!(from_file.campaign.duration_secs, 60);
        assert_eq!(
            from_file.campaign.threshold_amount().unwrap(),
            Amount::from_ether("0.5").unwrap()
        );
        assert_eq!(from_file.logging.level, "warn");

        let from_defaults = from_defaults.unwrap();
        assert_eq!(from_defaults.campaign.duration_secs, 60);
        assert_eq!(
            from_defaults.campaign.threshold_amount().unwrap(),
            Amount::from_ether("0.5").unwrap()
        );
        assert_eq!(from_defaults.logging.level, "info");
    }
}
