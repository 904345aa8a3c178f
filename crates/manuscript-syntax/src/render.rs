//! The seam between the parser and output formats.
//!
//! Renderers live outside this crate. Each one implements [`Render`] and is
//! registered under a name in a [`Registry`] together with a constructor
//! that receives the user's [`RenderOptions`]:
//!
//! ```
//! use std::io::Write;
//! use manuscript_syntax::render::{Registry, Render, RenderError, RenderOptions};
//! use manuscript_syntax::Document;
//!
//! struct Titles;
//!
//! impl Render for Titles {
//!     fn render(&self, document: &Document, out: &mut dyn Write) -> Result<(), RenderError> {
//!         writeln!(out, "{}", document.metadata.title)?;
//!         Ok(())
//!     }
//! }
//!
//! let mut registry = Registry::new();
//! registry.register("titles", |_options| Ok(Box::new(Titles)));
//!
//! let doc = manuscript_syntax::parse("@type novel\n@title T\n@authorByline A\n@begin\n").unwrap();
//! let renderer = registry.resolve("titles", &RenderOptions::default()).unwrap();
//! let mut out = Vec::new();
//! renderer.render(&doc, &mut out).unwrap();
//! assert_eq!(out, b"T\n");
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::str::FromStr;

use thiserror::Error;

use crate::document::Document;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("{0} is not a valid renderer")]
    UnknownRenderer(String),

    #[error("Invalid value `{value}` for renderer option `{option}`")]
    InvalidOption { option: String, value: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a finished document to an output stream.
///
/// The document is only ever borrowed, so one document can be rendered by
/// several renderers, on several threads, without copying.
pub trait Render {
    fn render(&self, document: &Document, out: &mut dyn Write) -> Result<(), RenderError>;
}

/// Named string options for a renderer, e.g. `font=courier`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RenderOptions(BTreeMap<String, String>);

impl RenderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Parse an option's value, if it is set.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<Option<T>, RenderError> {
        self.get(name)
            .map(|value| {
                value.parse().map_err(|_| RenderError::InvalidOption {
                    option: name.to_string(),
                    value: value.to_string(),
                })
            })
            .transpose()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RenderOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Builds a renderer from its options.
pub type Constructor = Box<dyn Fn(&RenderOptions) -> Result<Box<dyn Render>, RenderError>>;

/// Renderers available by name.
#[derive(Default)]
pub struct Registry {
    constructors: BTreeMap<String, Constructor>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: impl Into<String>, constructor: F)
    where
        F: Fn(&RenderOptions) -> Result<Box<dyn Render>, RenderError> + 'static,
    {
        self.constructors.insert(name.into(), Box::new(constructor));
    }

    /// Registered renderer names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }

    /// Construct the renderer registered as `name`.
    pub fn resolve(&self, name: &str, options: &RenderOptions) -> Result<Box<dyn Render>, RenderError> {
        let constructor = self
            .constructors
            .get(name)
            .ok_or_else(|| RenderError::UnknownRenderer(name.to_string()))?;
        log::debug!("resolved renderer {name} with {} option(s)", options.len());
        constructor(options)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("renderers", &self.constructors.keys().collect::<Vec<_>>())
            .finish()
    }
}
