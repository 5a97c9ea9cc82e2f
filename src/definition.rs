//! Binding definitions and bind-time normalization.
//!
//! A caller registers an identifier with a [`Binding`], the raw input union
//! accepted by [`Container::bind`](crate::Container::bind). Normalization maps
//! every accepted shape onto exactly one [`Definition`] case and fails closed
//! on anything else, so resolution never has to inspect value shapes at
//! runtime.

use std::sync::Arc;

use crate::container::Container;
use crate::error::{DiError, DiResult};
use crate::params::Params;
use crate::value::{Config, Value};

/// Factory signature: `(container, merged_params, config) -> instance`.
///
/// The container passes itself so the factory can resolve its own
/// dependencies, the caller params merged over the identifier's stored
/// defaults, and the residual configuration.
pub type FactoryFn = Arc<dyn Fn(&Container, &Params, &Config) -> DiResult<Value> + Send + Sync>;

/// Raw definition accepted by `bind`.
///
/// One of: nothing (the identifier names itself), an alias to another
/// identifier, a factory closure, an already-built instance, or a recipe map
/// with an optional explicit class.
///
/// # Examples
///
/// ```rust
/// use bindery::{config, value, Binding};
///
/// // Alias: `&str` converts directly
/// let alias: Binding = "ConcreteMailer".into();
///
/// // Recipe with residual configuration
/// let recipe = Binding::recipe(
///     Some("Connection"),
///     config! { "dsn" => "postgres://localhost".to_string() },
/// );
///
/// // Pre-built instance
/// let instance = Binding::instance(value(42u64));
/// # let _ = (alias, recipe, instance);
/// ```
#[derive(Clone)]
pub enum Binding {
    /// Empty definition: the identifier is its own concrete type
    Bare,
    /// The identifier resolves to another identifier
    Alias(String),
    /// A closure invoked at resolution time
    Factory(FactoryFn),
    /// An already-built instance, cached as the identifier's singleton
    Instance(Value),
    /// Concrete class (defaults to the identifier) plus configuration
    Recipe {
        /// Explicit concrete class, or `None` to use the bound identifier
        class: Option<String>,
        /// Configuration applied when the class is instantiated
        config: Config,
    },
}

impl Binding {
    /// Empty definition; equivalent to `Binding::Bare`.
    pub fn bare() -> Self {
        Binding::Bare
    }

    /// Alias to another identifier.
    pub fn alias(target: impl Into<String>) -> Self {
        Binding::Alias(target.into())
    }

    /// Factory closure invoked with `(container, merged_params, config)`.
    pub fn factory<F>(f: F) -> Self
    where
        F: Fn(&Container, &Params, &Config) -> DiResult<Value> + Send + Sync + 'static,
    {
        Binding::Factory(Arc::new(f))
    }

    /// Already-built instance.
    pub fn instance(v: Value) -> Self {
        Binding::Instance(v)
    }

    /// Recipe: optional explicit class plus configuration entries.
    pub fn recipe(class: Option<&str>, config: Config) -> Self {
        Binding::Recipe {
            class: class.map(str::to_string),
            config,
        }
    }
}

impl Default for Binding {
    fn default() -> Self {
        Binding::Bare
    }
}

impl From<&str> for Binding {
    fn from(target: &str) -> Self {
        Binding::Alias(target.to_string())
    }
}

impl From<String> for Binding {
    fn from(target: String) -> Self {
        Binding::Alias(target)
    }
}

/// Normalized construction recipe stored per identifier.
///
/// Exactly one case is active per definition; [`Definition::normalize`]
/// guarantees this at bind time.
#[derive(Clone)]
pub(crate) enum Definition {
    /// Instantiate `class` with `config`; aliases are recipes whose class
    /// differs from the bound identifier
    Recipe { class: String, config: Config },
    /// Invoke the stored factory
    Factory(FactoryFn),
    /// Return the stored instance
    Instance(Value),
}

impl Definition {
    /// Normalizes a raw binding for `id`.
    ///
    /// - empty -> recipe for `id` itself
    /// - alias -> recipe for the target
    /// - factory / instance -> stored as-is
    /// - recipe without a class -> `id` injected as the class
    ///
    /// Empty identifiers, alias targets, and class names fail with
    /// [`DiError::InvalidConfiguration`].
    pub(crate) fn normalize(id: &str, binding: Binding) -> DiResult<Definition> {
        if id.is_empty() {
            return Err(DiError::InvalidConfiguration(
                "cannot bind an empty identifier".to_string(),
            ));
        }
        match binding {
            Binding::Bare => Ok(Definition::Recipe {
                class: id.to_string(),
                config: Config::new(),
            }),
            Binding::Alias(target) => {
                if target.is_empty() {
                    return Err(DiError::InvalidConfiguration(format!(
                        "empty alias target for \"{}\"",
                        id
                    )));
                }
                Ok(Definition::Recipe {
                    class: target,
                    config: Config::new(),
                })
            }
            Binding::Factory(f) => Ok(Definition::Factory(f)),
            Binding::Instance(v) => Ok(Definition::Instance(v)),
            Binding::Recipe { class, config } => {
                let class = class.unwrap_or_else(|| id.to_string());
                if class.is_empty() {
                    return Err(DiError::InvalidConfiguration(format!(
                        "empty class in definition for \"{}\"",
                        id
                    )));
                }
                Ok(Definition::Recipe { class, config })
            }
        }
    }
}
