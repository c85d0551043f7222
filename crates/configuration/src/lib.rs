use crate::error::ConfigError;
use std::path::Path;
use tracing_subscriber::EnvFilter;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod telemetry;

// Re-export the core types to provide a clean public API.
pub use settings::{Config, Data, Server, Telemetry};
pub use telemetry::init_tracing;

/// Prefix of environment overrides, e.g. `EMALAB__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "EMALAB";
const ENV_SEPARATOR: &str = "__";

/// Loads the application configuration.
///
/// Layers, lowest precedence first: built-in defaults, the TOML file at
/// `path` (optional), then `EMALAB__*` environment variables. A `.env` file
/// in the working directory is loaded into the environment beforehand.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    dotenvy::dotenv().ok();
    build_config(path, environment())
}

fn environment() -> config::Environment {
    config::Environment::with_prefix(ENV_PREFIX)
        .prefix_separator(ENV_SEPARATOR)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
}

fn build_config(path: &Path, env: config::Environment) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.to_path_buf()).required(false))
        .add_source(env)
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.data.source_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError("data.source_dir must not be empty".into()));
    }
    if config.data.output_dir.as_os_str().is_empty() {
        return Err(ConfigError::ValidationError("data.output_dir must not be empty".into()));
    }
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError("server.port must be non-zero".into()));
    }
    if let Err(e) = EnvFilter::try_new(&config.telemetry.log_level) {
        return Err(ConfigError::ValidationError(format!(
            "telemetry.log_level {:?} is not a valid filter: {e}",
            config.telemetry.log_level
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;

    fn no_env() -> config::Environment {
        environment().source(Some(config::Map::new()))
    }

    fn env(vars: &[(&str, &str)]) -> config::Environment {
        let map = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<config::Map<String, String>>();
        environment().source(Some(map))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = build_config(Path::new("does-not-exist.toml"), no_env()).unwrap();
        assert_eq!(config.data.source_dir, PathBuf::from("originData"));
        assert_eq!(config.data.output_dir, PathBuf::from("data"));
        assert_eq!(config.server.address(), "0.0.0.0:3000");
        assert!(config.server.static_dir.is_none());
        assert_eq!(config.telemetry.log_level, "info");
    }

    #[test]
    fn file_values_override_defaults_section_by_section() {
        let file = toml_file(
            r#"
            [server]
            port = 8081
            static_dir = "web/dist"

            [telemetry]
            log_level = "debug,hyper=warn"
            "#,
        );
        let config = build_config(file.path(), no_env()).unwrap();
        assert_eq!(config.server.port, 8081);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.static_dir, Some(PathBuf::from("web/dist")));
        assert_eq!(config.data.source_dir, PathBuf::from("originData"));
        assert_eq!(config.telemetry.log_level, "debug,hyper=warn");
    }

    #[test]
    fn environment_overrides_the_file() {
        let file = toml_file("[server]\nport = 8081\n");
        let vars = env(&[
            ("EMALAB__SERVER__PORT", "9090"),
            ("EMALAB__DATA__OUTPUT_DIR", "/srv/emalab"),
        ]);
        let config = build_config(file.path(), vars).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.data.output_dir, PathBuf::from("/srv/emalab"));
    }

    #[test]
    fn zero_port_is_rejected() {
        let file = toml_file("[server]\nport = 0\n");
        let err = build_config(file.path(), no_env()).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn empty_directories_are_rejected() {
        let file = toml_file("[data]\nsource_dir = \"\"\n");
        let err = build_config(file.path(), no_env()).unwrap_err();
        assert!(err.to_string().contains("data.source_dir"));
    }

    #[test]
    fn bad_log_level_is_rejected() {
        let file = toml_file("[telemetry]\nlog_level = \"emalab=loud\"\n");
        let err = build_config(file.path(), no_env()).unwrap_err();
        assert!(err.to_string().contains("telemetry.log_level"));
    }
}
