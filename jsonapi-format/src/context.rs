//! Packing configuration shared by every wrapper of one API

use crate::error::{JsonApiError, Result};
use crate::types::json_type_name;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

/// Default hyperlink prefix
pub const DEFAULT_BASE_URL: &str = "/";

/// Recognized options, merged over the defaults.
///
/// Keys are camelCase on the wire (`baseUrl`, `verbose`, `urlTemplates`).
/// Unrecognized keys are kept in `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Prefix for generated hyperlinks (default: `/`)
    pub base_url: String,
    /// Emit `{id, type, href}` link objects instead of bare ids (default: false)
    pub verbose: bool,
    /// Emit the top-level `links` template section (default: false)
    pub url_templates: bool,
    /// Unrecognized options, preserved as given
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            verbose: false,
            url_templates: false,
            extra: Map::new(),
        }
    }
}

impl Options {
    fn from_json(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(Self::default()),
            Value::Object(_) => serde_json::from_value(value)
                .map_err(|e| JsonApiError::InvalidOptions(e.to_string())),
            other => Err(JsonApiError::InvalidOptions(format!(
                "expected an options object, found {}",
                json_type_name(&other)
            ))),
        }
    }
}

/// Read-only settings consulted by every pack operation.
///
/// Build it once, wrap it in an [`Arc`] and hand it to each wrapper.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    options: Options,
}

impl Context {
    /// Context with the given base URL and default options
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_options(base_url, Options::default())
    }

    /// Context from a full options set
    pub fn from_options(options: Options) -> Self {
        Self { options }
    }

    /// Context from options with an explicit base URL taking precedence
    pub fn with_options(base_url: impl Into<String>, mut options: Options) -> Self {
        options.base_url = base_url.into();
        Self { options }
    }

    /// Context from a JSON options object (`null` gives the defaults)
    pub fn from_value(value: Value) -> Result<Self> {
        Options::from_json(value).map(Self::from_options)
    }

    /// Context from loosely-shaped constructor arguments.
    ///
    /// An object as `first` is the whole options set and `options` is ignored.
    /// A string as `first` is the base URL, merged over `options`. `null` leaves
    /// the base URL to `options` or the default.
    pub fn from_args(first: Value, options: Option<Value>) -> Result<Self> {
        match first {
            Value::Object(_) => Self::from_value(first),
            Value::String(base_url) => {
                let options = Options::from_json(options.unwrap_or(Value::Null))?;
                Ok(Self::with_options(base_url, options))
            }
            Value::Null => Self::from_value(options.unwrap_or(Value::Null)),
            other => Err(JsonApiError::InvalidOptions(format!(
                "expected a base URL string or an options object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Wrap in an [`Arc`] for sharing across wrappers and threads
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Hyperlink prefix
    pub fn base_url(&self) -> &str {
        &self.options.base_url
    }

    /// Whether links are emitted as `{id, type, href}` objects
    pub fn verbose(&self) -> bool {
        self.options.verbose
    }

    /// Whether the link template section is emitted
    pub fn url_templates(&self) -> bool {
        self.options.url_templates
    }

    /// All options, including unrecognized ones
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Look up an unrecognized option
    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.options.extra.get(key)
    }
}
