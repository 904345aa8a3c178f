use manuscript_syntax::render::{Registry, Render, RenderError, RenderOptions};
use regex::Regex;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid renderer `{0}`, expected name or name(key=value, ...)")]
    InvalidRendererSpec(String),
}

/// A renderer name with its options, as written `pdf(font=courier, size=12)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RendererSpec {
    pub name: String,
    pub options: RenderOptions,
}

impl RendererSpec {
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        static SPEC_REGEX: OnceLock<Regex> = OnceLock::new();
        let spec_regex = SPEC_REGEX.get_or_init(|| {
            Regex::new(r"^(\w+)(?:\((\s*\w+\s*=\s*\w+\s*(?:,\s*\w+\s*=\s*\w+\s*)*)\))?$")
                .expect("Invalid renderer spec regex")
        });

        let captures = spec_regex
            .captures(spec.trim())
            .ok_or_else(|| ConfigError::InvalidRendererSpec(spec.to_string()))?;

        let mut options = RenderOptions::new();
        if let Some(pairs) = captures.get(2) {
            // The regex guarantees every pair has exactly one `=`
            for pair in pairs.as_str().split(',') {
                if let Some((key, value)) = pair.split_once('=') {
                    options.insert(key.trim(), value.trim());
                }
            }
        }

        Ok(Self {
            name: captures[1].to_string(),
            options,
        })
    }

    /// Construct the named renderer from `registry`.
    pub fn resolve(&self, registry: &Registry) -> Result<Box<dyn Render>, RenderError> {
        registry.resolve(&self.name, &self.options)
    }
}

fn default_renderer() -> String {
    "pdf".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Renderer selection, e.g. `pdf` or `pdf(font=courier)`.
    #[serde(default = "default_renderer")]
    pub renderer: String,
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            renderer: default_renderer(),
            output_dir: None,
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            log::debug!("no config file at {}", config_path.display());
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in the output directory
        config.output_dir = config
            .output_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

        log::debug!("loaded config from {}", config_path.display());
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/manuscript");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    pub fn renderer_spec(&self) -> Result<RendererSpec, ConfigError> {
        RendererSpec::parse(&self.renderer)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use manuscript_syntax::Document;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::env;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let config_file = dir.path().join("config.toml");
        std::fs::write(&config_file, content).unwrap();
        config_file
    }

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/manuscript/config.toml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(
            &temp_dir,
            r#"
renderer = "pdf(font=courier)"
output_dir = "/tmp/manuscripts"
"#,
        );

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(
            config,
            Config {
                renderer: "pdf(font=courier)".to_string(),
                output_dir: Some(PathBuf::from("/tmp/manuscripts")),
            }
        );
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(&temp_dir, "");

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.renderer, "pdf");
    }

    #[test]
    fn test_invalid_toml_is_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(&temp_dir, "renderer = [unterminated");

        let err = Config::load_from_path(&config_file).unwrap_err();

        match err {
            ConfigError::ConfigParseError { config_path, .. } => assert_eq!(config_path, config_file),
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_output_dir_with_env_var() {
        unsafe {
            env::set_var("MANUSCRIPT_OUT", "/custom/out");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(&temp_dir, r#"output_dir = "$MANUSCRIPT_OUT/drafts""#);
        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.output_dir, Some(PathBuf::from("/custom/out/drafts")));

        unsafe {
            env::remove_var("MANUSCRIPT_OUT");
        }
    }

    #[test]
    fn test_output_dir_with_tilde() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = write_config(&temp_dir, r#"output_dir = "~/drafts""#);
        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        let output_dir = config.output_dir.unwrap();
        assert!(!output_dir.to_string_lossy().starts_with('~'));
        assert!(output_dir.to_string_lossy().ends_with("drafts"));
    }

    #[rstest]
    #[case("pdf", "pdf", &[])]
    #[case("  bbcode  ", "bbcode", &[])]
    #[case("pdf(font=courier)", "pdf", &[("font", "courier")])]
    #[case("pdf( font = courier , size=12 )", "pdf", &[("font", "courier"), ("size", "12")])]
    fn test_parse_renderer_spec(
        #[case] spec: &str,
        #[case] name: &str,
        #[case] options: &[(&str, &str)],
    ) {
        let parsed = RendererSpec::parse(spec).unwrap();

        assert_eq!(parsed.name, name);
        assert_eq!(parsed.options.iter().collect::<Vec<_>>(), options.to_vec());
    }

    #[rstest]
    #[case("")]
    #[case("pdf()")]
    #[case("pdf(font)")]
    #[case("pdf(font=)")]
    #[case("pdf(font=courier,)")]
    #[case("two words")]
    #[case("pdf(font=a b)")]
    fn test_invalid_renderer_spec(#[case] spec: &str) {
        let err = RendererSpec::parse(spec).unwrap_err();

        assert!(matches!(err, ConfigError::InvalidRendererSpec(ref s) if s == spec));
    }

    struct Named(String);

    impl Render for Named {
        fn render(&self, _document: &Document, out: &mut dyn Write) -> Result<(), RenderError> {
            out.write_all(self.0.as_bytes())?;
            Ok(())
        }
    }

    #[test]
    fn test_renderer_spec_resolves_from_registry() {
        let mut registry = Registry::new();
        registry.register("named", |options| {
            let name = options.get("as").unwrap_or("default").to_string();
            Ok(Box::new(Named(name)))
        });

        let document = manuscript_syntax::parse(
            "@type shortStory\n@title T\n@authorByline A\n@begin\nText.\n",
        )
        .unwrap();

        let renderer = RendererSpec::parse("named(as=custom)")
            .unwrap()
            .resolve(&registry)
            .unwrap();
        let mut out = Vec::new();
        renderer.render(&document, &mut out).unwrap();
        assert_eq!(out, b"custom");

        let config = Config::default();
        let err = config.renderer_spec().unwrap().resolve(&registry).err().unwrap();
        assert!(matches!(err, RenderError::UnknownRenderer(ref name) if name == "pdf"));
    }
}
