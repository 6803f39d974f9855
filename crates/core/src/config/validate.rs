use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Archive timeout, rows and container cap are non-zero
/// - At least one video extension is allowed
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if config.archive.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "archive.timeout_secs cannot be 0".to_string(),
        ));
    }

    if config.archive.rows == 0 {
        return Err(ConfigError::ValidationError(
            "archive.rows cannot be 0".to_string(),
        ));
    }

    if config.archive.max_containers == 0 {
        return Err(ConfigError::ValidationError(
            "archive.max_containers cannot be 0".to_string(),
        ));
    }

    if config.filter.video_extensions.is_empty() {
        return Err(ConfigError::ValidationError(
            "filter.video_extensions cannot be empty".to_string(),
        ));
    }

    if let Some(tmdb) = &config.tmdb {
        if tmdb.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "tmdb.timeout_secs cannot be 0".to_string(),
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ArchiveConfig, FilterConfig, ServerConfig};

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_validate_port_zero_fails() {
        let config = Config {
            server: ServerConfig {
                port: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_validate_zero_max_containers_fails() {
        let config = Config {
            archive: ArchiveConfig {
                max_containers: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_empty_extensions_fails() {
        let config = Config {
            filter: FilterConfig {
                video_extensions: vec![],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_zero_min_size_is_allowed() {
        let config = Config {
            filter: FilterConfig {
                min_size_bytes: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_ok());
    }
}
