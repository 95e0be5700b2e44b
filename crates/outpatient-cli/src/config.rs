//! Start-up configuration: JSON file first, then command-line overrides.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};
use outpatient_core::EngineConfig;

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub queue_capacity: Option<usize>,
    pub no_seed: bool,
}

/// Build the engine configuration.
pub fn load(path: Option<&Path>, overrides: &Overrides) -> anyhow::Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading config file {}", path.display()))?;
            EngineConfig::from_json(&text)
                .with_context(|| format!("parsing config file {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(capacity) = overrides.queue_capacity {
        config.default_queue_capacity = capacity;
    }
    if overrides.no_seed {
        config.seed_sample_data = false;
    }
    if config.default_queue_capacity == 0 {
        bail!("default queue capacity must be at least 1");
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use outpatient_core::DEFAULT_QUEUE_CAPACITY;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults_without_file() {
        let config = load(None, &Overrides::default()).unwrap();
        assert_eq!(config.default_queue_capacity, DEFAULT_QUEUE_CAPACITY);
        assert!(config.seed_sample_data);
    }

    #[test]
    fn test_partial_file() {
        let file = config_file(r#"{ "default_queue_capacity": 4 }"#);
        let config = load(Some(file.path()), &Overrides::default()).unwrap();
        assert_eq!(config.default_queue_capacity, 4);
        assert!(config.seed_sample_data);
    }

    #[test]
    fn test_overrides_win() {
        let file = config_file(r#"{ "default_queue_capacity": 4, "seed_sample_data": true }"#);
        let overrides = Overrides {
            queue_capacity: Some(7),
            no_seed: true,
        };
        let config = load(Some(file.path()), &overrides).unwrap();
        assert_eq!(config.default_queue_capacity, 7);
        assert!(!config.seed_sample_data);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let overrides = Overrides {
            queue_capacity: Some(0),
            no_seed: false,
        };
        assert!(load(None, &overrides).is_err());
    }

    #[test]
    fn test_bad_json_names_file() {
        let file = config_file("{ not json");
        let err = load(Some(file.path()), &Overrides::default()).unwrap_err();
        assert!(err.to_string().contains("parsing config file"));
    }

    #[test]
    fn test_missing_file() {
        let err = load(Some(Path::new("/nonexistent/outpatient.json")), &Overrides::default())
            .unwrap_err();
        assert!(err.to_string().contains("reading config file"));
    }
}
