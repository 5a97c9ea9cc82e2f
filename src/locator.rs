//! Scoped service location over a shared container.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::container::Container;
use crate::definition::{Binding, Definition};
use crate::error::DiResult;
use crate::global::global;
use crate::params::Params;
use crate::value::{downcast, Config, Value};

type SingletonSlot = Arc<OnceCell<Value>>;

/// Per-scope override layer in front of a shared [`Container`].
///
/// A locator holds its own private definition store and singleton cache,
/// consulted before falling back to the shared container. Binding through a
/// locator never mutates the shared container, so one object graph can shadow
/// an identifier without affecting the rest of the process.
///
/// Dependencies of locator-local recipes and factories still resolve through
/// the shared container.
///
/// # Examples
///
/// ```rust
/// use bindery::{value, Binding, Container, ServiceLocator};
/// use std::sync::Arc;
///
/// let container = Arc::new(Container::new());
/// container.singleton("greeting", Binding::instance(value("hello".to_string())), bindery::params![]).unwrap();
///
/// let locator = ServiceLocator::with_container(container.clone());
///
/// // Shadow "greeting" for this scope only
/// locator.singleton("greeting", Binding::instance(value("hi".to_string()))).unwrap();
/// let local = locator.get_as::<String>("greeting").unwrap();
/// assert_eq!(local.as_str(), "hi");
///
/// // The shared container is untouched
/// let shared = container.get_as::<String>("greeting").unwrap();
/// assert_eq!(shared.as_str(), "hello");
/// ```
pub struct ServiceLocator {
    container: Arc<Container>,
    definitions: RwLock<HashMap<String, Definition>>,
    singletons: RwLock<HashMap<String, SingletonSlot>>,
}

impl ServiceLocator {
    /// Locator over the process-wide container from [`global`](crate::global).
    pub fn new() -> Self {
        Self::with_container(global())
    }

    /// Locator over an explicitly constructed container.
    pub fn with_container(container: Arc<Container>) -> Self {
        Self {
            container,
            definitions: RwLock::new(HashMap::new()),
            singletons: RwLock::new(HashMap::new()),
        }
    }

    /// The shared container this locator falls back to.
    pub fn container(&self) -> &Arc<Container> {
        &self.container
    }

    /// Whether `name` has a locator-local definition.
    pub fn has_local(&self, name: &str) -> bool {
        self.definitions.read().contains_key(name)
    }

    /// Registers a locator-local definition for `name`, replacing any prior
    /// one. The shared container is not consulted or modified.
    pub fn bind(
        &self,
        name: impl Into<String>,
        binding: impl Into<Binding>,
        shared: bool,
    ) -> DiResult<&Self> {
        let name = name.into();
        let definition = Definition::normalize(&name, binding.into())?;
        debug!(name = %name, shared, "locator bind");

        self.definitions.write().insert(name.clone(), definition);
        let mut singletons = self.singletons.write();
        if shared {
            singletons.entry(name).or_insert_with(|| Arc::new(OnceCell::new()));
        } else {
            singletons.remove(&name);
        }
        Ok(self)
    }

    /// Sugar for a shared [`bind`](Self::bind).
    pub fn singleton(&self, name: impl Into<String>, binding: impl Into<Binding>) -> DiResult<&Self> {
        self.bind(name, binding, true)
    }

    /// Resolves `name`: local singleton cache first, then the local
    /// definition store, then the shared container.
    pub fn get(&self, name: &str) -> DiResult<Value> {
        if let Some(slot) = self.singleton_slot(name) {
            if let Some(existing) = slot.get() {
                trace!(name, "locator cache hit");
                return Ok(existing.clone());
            }
        }

        let definition = self.definitions.read().get(name).cloned();
        let Some(definition) = definition else {
            return self.container.get(name);
        };

        let object = match definition {
            Definition::Factory(factory) => {
                factory(self.container.as_ref(), &Params::new(), &Config::new())?
            }
            Definition::Instance(instance) => {
                let slot = self.ensure_slot(name);
                return Ok(slot.get_or_init(|| instance).clone());
            }
            Definition::Recipe { class, config } => {
                if class == name {
                    self.container.build(&class, Params::new(), config)?
                } else {
                    self.container.get_with(&class, Params::new(), config)?
                }
            }
        };

        if let Some(slot) = self.singleton_slot(name) {
            return Ok(slot.get_or_init(|| object).clone());
        }
        Ok(object)
    }

    /// Resolves `name` and downcasts the result.
    pub fn get_as<T: Send + Sync + 'static>(&self, name: &str) -> DiResult<Arc<T>> {
        downcast(&self.get(name)?)
    }

    fn singleton_slot(&self, name: &str) -> Option<SingletonSlot> {
        self.singletons.read().get(name).cloned()
    }

    fn ensure_slot(&self, name: &str) -> SingletonSlot {
        self.singletons
            .write()
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}

impl Default for ServiceLocator {
    fn default() -> Self {
        Self::new()
    }
}
