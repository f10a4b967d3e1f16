//! Config file discovery and layered loading.
//!
//! Implements the `Config::load()` algorithm:
//! 1. Parse `defaults.toml` → base
//! 2. Merge `/etc/folio/config.toml` (system)
//! 3. Merge `~/.folio/config.toml` or `$FOLIO_HOME/config.toml` (user)
//! 4. Merge the explicit file, if one was given
//! 5. Apply env var fallbacks for fields no file set
//! 6. Resolve `${VAR}` references
//! 7. Deserialize merged tree → `Config`
//! 8. Validate
//! 9. Return `ResolvedConfig`

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::env::{apply_env_fallbacks, collect_env_vars, resolve_env_references};
use crate::error::{ConfigError, ConfigResult};
use crate::merge::{ConfigLayer, FieldSources, deep_merge_tracking, record_leaves};
use crate::types::Config;
use crate::validate;

/// Embedded default configuration.
const DEFAULTS_TOML: &str = include_str!("defaults.toml");

/// Maximum allowed config file size (1 MB).
const MAX_CONFIG_FILE_SIZE: u64 = 1_048_576;

/// A validated configuration plus where its values came from.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    /// The final configuration.
    pub config: Config,
    /// Which layer set each field.
    pub field_sources: FieldSources,
    /// Files merged, in order.
    pub loaded_files: Vec<String>,
}

impl ResolvedConfig {
    /// The layer that set a dotted field path, if any.
    #[must_use]
    pub fn source_of(&self, field: &str) -> Option<&ConfigLayer> {
        self.field_sources.get(field)
    }
}

/// Load the configuration with layered file precedence.
///
/// `explicit` is a file the caller insists on (e.g. from a `--config`
/// option); unlike the discovered layers it must exist.
///
/// `folio_home_override` replaces user-level discovery: the path is treated
/// as the `.folio` directory itself.
///
/// # Errors
///
/// Returns a [`ConfigError`] if any config file is malformed, or if the
/// final merged configuration fails validation.
pub fn load(
    explicit: Option<&Path>,
    folio_home_override: Option<&Path>,
) -> ConfigResult<ResolvedConfig> {
    let env_vars = collect_env_vars();

    // 1. Parse embedded defaults.
    let mut merged: toml::Value =
        toml::from_str(DEFAULTS_TOML).map_err(|e| ConfigError::ParseError {
            path: "<embedded defaults>".to_owned(),
            source: e,
        })?;

    let mut field_sources = FieldSources::new();
    let mut loaded_files = Vec::new();
    record_leaves(&merged, "", &ConfigLayer::Defaults, &mut field_sources);

    // 2. System config.
    let system_path = PathBuf::from("/etc/folio/config.toml");
    if let Some(overlay) = try_load_file(&system_path)? {
        deep_merge_tracking(
            &mut merged,
            &overlay,
            "",
            &ConfigLayer::System,
            &mut field_sources,
        );
        loaded_files.push(system_path.display().to_string());
        info!(path = %system_path.display(), "loaded system config");
    }

    // 3. User config.
    let user_path = match folio_home_override {
        Some(home) => Some(home.join("config.toml")),
        None => user_config_path(env_vars.get("FOLIO_HOME").map(String::as_str)),
    };
    if let Some(path) = user_path {
        if let Some(overlay) = try_load_file(&path)? {
            deep_merge_tracking(
                &mut merged,
                &overlay,
                "",
                &ConfigLayer::User,
                &mut field_sources,
            );
            loaded_files.push(path.display().to_string());
            info!(path = %path.display(), "loaded user config");
        }
    }

    // 4. Explicit file.
    if let Some(path) = explicit {
        let overlay = read_toml(path)?;
        let layer = ConfigLayer::File(path.display().to_string());
        deep_merge_tracking(&mut merged, &overlay, "", &layer, &mut field_sources);
        loaded_files.push(path.display().to_string());
        info!(path = %path.display(), "loaded config file");
    }

    // 5. Env var fallbacks.
    let env_count = apply_env_fallbacks(&mut merged, &mut field_sources, &env_vars);
    if env_count > 0 {
        debug!(count = env_count, "applied environment variable fallbacks");
    }

    // 6–7. Resolve ${VAR} references, then deserialize.
    resolve_env_references(&mut merged, &env_vars);
    let config: Config =
        merged
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::ParseError {
                path: "<merged config>".to_owned(),
                source: e,
            })?;

    // 8. Validate.
    validate::validate(&config)?;

    Ok(ResolvedConfig {
        config,
        field_sources,
        loaded_files,
    })
}

/// Load a config from a specific file path (no layering, no environment).
///
/// # Errors
///
/// Returns a [`ConfigError`] if the file cannot be read, parsed, or fails
/// validation.
pub fn load_file(path: &Path) -> ConfigResult<Config> {
    let content = read_bounded(path)?;
    let config: Config = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })?;

    validate::validate(&config)?;
    Ok(config)
}

/// User config location: `$FOLIO_HOME/config.toml` when set, else
/// `~/.folio/config.toml`.
fn user_config_path(folio_home: Option<&str>) -> Option<PathBuf> {
    if let Some(home) = folio_home.filter(|h| !h.is_empty()) {
        return Some(PathBuf::from(home).join("config.toml"));
    }
    match home_directory() {
        Ok(home) => Some(home.join(".folio").join("config.toml")),
        Err(e) => {
            debug!(error = %e, "skipping user config");
            None
        },
    }
}

/// Try to load a file, returning `None` if the file doesn't exist.
fn try_load_file(path: &Path) -> ConfigResult<Option<toml::Value>> {
    match read_toml(path) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::ReadError { source, .. })
            if source.kind() == std::io::ErrorKind::NotFound =>
        {
            debug!(path = %path.display(), "config file not found, skipping");
            Ok(None)
        },
        Err(e) => Err(e),
    }
}

fn read_toml(path: &Path) -> ConfigResult<toml::Value> {
    let content = read_bounded(path)?;
    toml::from_str(&content).map_err(|e| ConfigError::ParseError {
        path: path.display().to_string(),
        source: e,
    })
}

/// Read a file, rejecting anything over [`MAX_CONFIG_FILE_SIZE`].
///
/// The size is checked after a single read to avoid a stat/read race.
fn read_bounded(path: &Path) -> ConfigResult<String> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    if content.len() as u64 > MAX_CONFIG_FILE_SIZE {
        return Err(ConfigError::ValidationError {
            field: path.display().to_string(),
            message: format!(
                "config file is {} bytes, exceeding the {} byte limit",
                content.len(),
                MAX_CONFIG_FILE_SIZE
            ),
        });
    }

    Ok(content)
}

/// Determine the user's home directory.
fn home_directory() -> ConfigResult<PathBuf> {
    directories::BaseDirs::new()
        .map(|d| d.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_deserialize_to_config() {
        let config: Config = toml::from_str(DEFAULTS_TOML).unwrap();
        assert_eq!(config.media.default_lifetime_minutes, 60);
        assert_eq!(config.media.refresh_margin_secs, 60);
        assert!(config.media.secret.is_none());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "compact");
        assert!(validate::validate(&config).is_ok());
    }

    #[test]
    fn test_load_file_nonexistent() {
        let result = load_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_try_load_file_missing() {
        let result = try_load_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
            [media]
            secret = "s3cret"
            base_url = "https://media.example.com"
            default_lifetime_minutes = 30
        "#,
        )
        .unwrap();

        let config = load_file(&path).unwrap();
        assert_eq!(config.media.require_secret().unwrap(), "s3cret");
        assert_eq!(config.media.default_lifetime_minutes, 30);
        assert_eq!(config.media.refresh_margin_secs, 60);
    }

    #[test]
    fn test_load_layers_and_sources() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[media]\nsecret = \"user-secret\"\ndefault_lifetime_minutes = 20\n",
        )
        .unwrap();

        let explicit_dir = tempfile::tempdir().unwrap();
        let explicit = explicit_dir.path().join("site.toml");
        std::fs::write(&explicit, "[media]\ndefault_lifetime_minutes = 45\n").unwrap();

        let resolved = load(Some(&explicit), Some(home.path())).unwrap();
        let media = &resolved.config.media;

        assert_eq!(media.require_secret().unwrap(), "user-secret");
        assert_eq!(media.default_lifetime_minutes, 45);
        assert_eq!(resolved.source_of("media.secret"), Some(&ConfigLayer::User));
        assert!(matches!(
            resolved.source_of("media.default_lifetime_minutes"),
            Some(ConfigLayer::File(_))
        ));
        assert_eq!(
            resolved.source_of("media.refresh_margin_secs"),
            Some(&ConfigLayer::Defaults)
        );
        assert_eq!(resolved.loaded_files.len(), 2);
    }

    #[test]
    fn test_explicit_file_must_exist() {
        let home = tempfile::tempdir().unwrap();
        let result = load(Some(Path::new("/nonexistent/site.toml")), Some(home.path()));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }

    #[test]
    fn test_invalid_merged_config_rejected() {
        let home = tempfile::tempdir().unwrap();
        std::fs::write(
            home.path().join("config.toml"),
            "[media]\ndefault_lifetime_minutes = 500\n",
        )
        .unwrap();

        let result = load(None, Some(home.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_user_config_path_prefers_folio_home() {
        assert_eq!(
            user_config_path(Some("/srv/folio")),
            Some(PathBuf::from("/srv/folio/config.toml"))
        );
    }

    #[test]
    fn test_serialize_omits_secret() {
        let mut config = Config::default();
        config.media.secret = Some("super-secret-value".to_owned());

        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("super-secret-value"));
        assert!(!json.contains("\"secret\""));

        let debug = format!("{:?}", config.media);
        assert!(!debug.contains("super-secret-value"));
        assert!(debug.contains("has_secret: true"));
    }

    #[test]
    fn test_oversized_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("huge.toml");
        let data = "x = \"".to_owned() + &"a".repeat(1_100_000) + "\"";
        std::fs::write(&file_path, data).unwrap();

        let result = try_load_file(&file_path);
        assert!(
            matches!(result, Err(ConfigError::ValidationError { .. })),
            "Expected ValidationError for oversized config, got: {result:?}"
        );
    }
}
