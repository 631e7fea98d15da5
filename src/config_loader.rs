use crate::config::PlannerConfig;
use crate::ip::LoopbackFormat;
use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use log::info;
use std::fs;
use std::path::Path;

/// Load and parse configuration from a YAML file
pub fn load_config(config_path: &Path) -> Result<PlannerConfig> {
    info!("Loading configuration from: {:?}", config_path);

    let content = fs::read_to_string(config_path)
        .wrap_err_with(|| format!("Failed to read configuration '{}'", config_path.display()))?;

    // An empty file is a valid "all defaults" configuration
    let config: PlannerConfig = if content.trim().is_empty() {
        PlannerConfig::default()
    } else {
        serde_yaml::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse configuration '{}'", config_path.display()))?
    };

    config.validate()?;

    Ok(config)
}

/// CLI arguments that override YAML settings
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub ip_base: Option<String>,
    pub loopback_format: Option<LoopbackFormat>,
    pub output_name: Option<String>,
}

/// Apply CLI overrides to a configuration
pub fn apply_overrides(config: &mut PlannerConfig, overrides: &ConfigOverrides) -> Result<()> {
    if let Some(ip_base) = &overrides.ip_base {
        info!("Base prefix overridden from the command line: {}", ip_base);
        config.ip_base = ip_base.clone();
    }

    if let Some(format) = overrides.loopback_format {
        info!("Loopback format overridden from the command line: {}", format);
        config.loopback_format = format;
    }

    if let Some(output_name) = &overrides.output_name {
        config.output_name = output_name.clone();
    }

    // Re-validate after applying overrides
    config.validate()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config() {
        let yaml = r#"
ip_base: "fd00:10::/32"
loopback_format: with_as
router_node_types: [dynamips, iou]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", yaml).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.ip_base, "fd00:10::/32");
        assert_eq!(config.loopback_format, LoopbackFormat::AsQualified);
        assert_eq!(config.router_node_types, vec!["dynamips", "iou"]);
    }

    #[test]
    fn test_load_empty_config() {
        let temp_file = NamedTempFile::new().unwrap();
        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config, PlannerConfig::default());
    }

    #[test]
    fn test_load_invalid_config() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "ip_base: \"2000:1:2:3::/64\"\n").unwrap();
        assert!(load_config(temp_file.path()).is_err());

        assert!(load_config(Path::new("/nonexistent/topoplan.yaml")).is_err());
    }

    #[test]
    fn test_apply_overrides() {
        let mut config = PlannerConfig::default();
        let overrides = ConfigOverrides {
            ip_base: Some("2001:db8::/32".to_string()),
            loopback_format: Some(LoopbackFormat::AsQualified),
            output_name: None,
        };

        apply_overrides(&mut config, &overrides).unwrap();
        assert_eq!(config.ip_base, "2001:db8::/32");
        assert_eq!(config.loopback_format, LoopbackFormat::AsQualified);
        assert_eq!(config.output_name, "topology.json");

        let bad = ConfigOverrides {
            ip_base: Some("garbage".to_string()),
            ..Default::default()
        };
        assert!(apply_overrides(&mut config, &bad).is_err());
    }
}
