//! The container: binding registry, resolver, and singleton cache.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::definition::{Binding, Definition};
use crate::error::{DiError, DiResult};
use crate::internal::StackGuard;
use crate::params::Params;
use crate::reflection::{Constructible, ReflectionCache, ReflectionEntry, TypeDescriptor};
use crate::value::{downcast, merge_config, Config, Value};

/// Identifier slot in the singleton cache: an empty cell means "registered
/// shared, not yet built"; a filled cell holds the materialized instance.
type SingletonSlot = Arc<OnceCell<Value>>;

/// Dependency injection container.
///
/// Maps string identifiers (type names, interface names, or arbitrary
/// aliases) to normalized construction recipes, and resolves object graphs
/// on demand through registered [`TypeDescriptor`]s. Identifiers registered
/// as shared materialize once and are served from the singleton cache
/// afterwards.
///
/// All methods take `&self`; the container synchronizes internally and can be
/// shared across threads behind an `Arc`.
///
/// # Examples
///
/// ```rust
/// use bindery::{arg, params, Binding, Constructible, Container, ParameterSlot, TypeDescriptor, Value};
/// use std::sync::Arc;
///
/// struct Connection {
///     dsn: String,
/// }
///
/// impl Constructible for Connection {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::new::<Connection, _>("Connection", |args: &[Value]| {
///             Ok(Connection {
///                 dsn: arg::<String>(args, 0)?.as_ref().clone(),
///             })
///         })
///         .slot(ParameterSlot::with_default("dsn", "sqlite::memory:".to_string()))
///     }
/// }
///
/// struct Repository {
///     conn: Arc<Connection>,
/// }
///
/// impl Constructible for Repository {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::new::<Repository, _>("Repository", |args: &[Value]| {
///             Ok(Repository {
///                 conn: arg::<Connection>(args, 0)?,
///             })
///         })
///         .slot(ParameterSlot::dependency("conn", "Connection"))
///     }
/// }
///
/// let container = Container::new();
/// container.register::<Connection>().register::<Repository>();
/// container.singleton("Connection", Binding::bare(), params![]).unwrap();
///
/// let repo = container.get_as::<Repository>("Repository").unwrap();
/// assert_eq!(repo.conn.dsn, "sqlite::memory:");
///
/// // The shared Connection is one instance everywhere
/// let conn = container.get_as::<Connection>("Connection").unwrap();
/// assert!(Arc::ptr_eq(&repo.conn, &conn));
/// ```
pub struct Container {
    definitions: RwLock<HashMap<String, Definition>>,
    params: RwLock<HashMap<String, Params>>,
    singletons: RwLock<HashMap<String, SingletonSlot>>,
    reflection: ReflectionCache,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("definitions", &self.definitions.read().len())
            .field("params", &self.params.read().len())
            .field("singletons", &self.singletons.read().len())
            .finish_non_exhaustive()
    }
}

impl Container {
    /// Creates an empty container.
    pub fn new() -> Self {
        Self {
            definitions: RwLock::new(HashMap::new()),
            params: RwLock::new(HashMap::new()),
            singletons: RwLock::new(HashMap::new()),
            reflection: ReflectionCache::new(),
        }
    }

    // ----- Descriptor registry -----

    /// Registers `T`'s constructor descriptor under its declared type name.
    pub fn register<T: Constructible>(&self) -> &Self {
        self.register_descriptor(T::describe())
    }

    /// Registers a hand-built descriptor, replacing any previous one for the
    /// same type name.
    pub fn register_descriptor(&self, descriptor: TypeDescriptor) -> &Self {
        trace!(class = descriptor.type_name(), "register descriptor");
        self.reflection.register(descriptor);
        self
    }

    // ----- Definition store -----

    /// Registers a definition for `id`, replacing any prior one.
    ///
    /// `binding` accepts the shapes of [`Binding`]: bare, alias (plain
    /// `&str`), factory, instance, or recipe. `params` become the stored
    /// default constructor parameters merged under caller params at
    /// resolution time. `shared` marks the identifier as a singleton;
    /// re-binding with `shared = false` drops any cached instance, while
    /// re-binding with `shared = true` keeps one already materialized.
    pub fn bind(
        &self,
        id: impl Into<String>,
        binding: impl Into<Binding>,
        params: Params,
        shared: bool,
    ) -> DiResult<&Self> {
        let id = id.into();
        let definition = Definition::normalize(&id, binding.into())?;
        debug!(id = %id, shared, "bind");

        self.definitions.write().insert(id.clone(), definition);
        self.params.write().insert(id.clone(), params);

        let mut singletons = self.singletons.write();
        if shared {
            singletons.entry(id).or_insert_with(|| Arc::new(OnceCell::new()));
        } else {
            singletons.remove(&id);
        }
        Ok(self)
    }

    /// Sugar for a shared [`bind`](Self::bind).
    pub fn singleton(
        &self,
        id: impl Into<String>,
        binding: impl Into<Binding>,
        params: Params,
    ) -> DiResult<&Self> {
        self.bind(id, binding, params, true)
    }

    /// Whether `id` has a definition.
    pub fn has(&self, id: &str) -> bool {
        self.definitions.read().contains_key(id)
    }

    // ----- Resolution -----

    /// Resolves `id` with no caller parameters or configuration.
    pub fn get(&self, id: &str) -> DiResult<Value> {
        self.get_with(id, Params::new(), Config::new())
    }

    /// Resolves `id` with caller-supplied positional parameters and
    /// configuration.
    ///
    /// A materialized singleton is returned directly, ignoring `params` and
    /// `config`. An identifier with no definition is treated as a concrete
    /// type and built directly. Alias chains resolve transitively; stored
    /// definition config merges under caller config (caller keys win).
    pub fn get_with(&self, id: &str, params: Params, config: Config) -> DiResult<Value> {
        let _guard = StackGuard::enter(id)?;
        self.get_impl(id, params, config)
    }

    /// Resolves `id` and downcasts the result.
    pub fn get_as<T: Send + Sync + 'static>(&self, id: &str) -> DiResult<Arc<T>> {
        downcast(&self.get(id)?)
    }

    /// Constructs `class` directly, bypassing the definition store.
    ///
    /// Always builds a fresh instance; only the reflection entry is cached.
    pub fn build(&self, class: &str, params: Params, config: Config) -> DiResult<Value> {
        let _guard = StackGuard::enter(class)?;
        self.build_impl(class, params, config)
    }

    /// [`build`](Self::build) plus a downcast of the result.
    pub fn build_as<T: Send + Sync + 'static>(
        &self,
        class: &str,
        params: Params,
        config: Config,
    ) -> DiResult<Arc<T>> {
        downcast(&self.build(class, params, config)?)
    }

    /// Merges caller params over the defaults stored for `id`.
    ///
    /// No stored defaults: caller params pass through unchanged. Empty caller
    /// params: stored defaults pass through. Otherwise every index present in
    /// the caller params overwrites the stored value at that index.
    pub fn merge_params(&self, id: &str, params: Params) -> Params {
        let stored = self.params.read().get(id).cloned();
        match stored {
            None => params,
            Some(stored) if stored.is_empty() => params,
            Some(stored) if params.is_empty() => stored,
            Some(stored) => stored.overlay(&params),
        }
    }

    fn get_impl(&self, id: &str, params: Params, config: Config) -> DiResult<Value> {
        if let Some(slot) = self.singleton_slot(id) {
            if let Some(existing) = slot.get() {
                trace!(id, "singleton cache hit");
                return Ok(existing.clone());
            }
        }

        let definition = self.definitions.read().get(id).cloned();
        let Some(definition) = definition else {
            // Never bound: the identifier is its own concrete type
            return self.build_impl(id, params, config);
        };

        let object = match definition {
            Definition::Factory(factory) => {
                let merged = self.merge_params(id, params);
                trace!(id, "invoking factory");
                factory(self, &merged, &config)?
            }
            Definition::Instance(instance) => {
                let slot = self.ensure_slot(id);
                return Ok(slot.get_or_init(|| instance).clone());
            }
            Definition::Recipe { class, config: stored } => {
                let merged_config = merge_config(&stored, &config);
                let merged_params = self.merge_params(id, params);
                if class == id {
                    self.build_impl(&class, merged_params, merged_config)?
                } else {
                    // Alias: re-enter resolution under the target identifier
                    self.get_with(&class, merged_params, merged_config)?
                }
            }
        };

        if let Some(slot) = self.singleton_slot(id) {
            // First writer wins; a racing builder observes the stored instance
            let stored = slot.get_or_init(|| object).clone();
            trace!(id, "singleton materialized");
            return Ok(stored);
        }
        Ok(object)
    }

    fn build_impl(&self, class: &str, params: Params, config: Config) -> DiResult<Value> {
        let entry = self.dependencies_for(class, &params)?;
        let descriptor = &entry.descriptor;

        // Caller values win at their index; every other index keeps the
        // cached value. Indices past the constructor arity are ignored.
        let mut args = entry.dependencies.clone();
        for (index, val) in params.iter() {
            if index < args.len() {
                args[index] = val.clone();
            }
        }

        trace!(class, arity = args.len(), "build");

        if config.is_empty() {
            return Ok(Arc::from(descriptor.construct(&args)?));
        }

        if descriptor.takes_trailing_config() && !args.is_empty() {
            // Configuration rides the trailing constructor parameter
            let last = args.len() - 1;
            args[last] = Arc::new(config) as Value;
            return Ok(Arc::from(descriptor.construct(&args)?));
        }

        if descriptor.has_apply() {
            let mut built = descriptor.construct(&args)?;
            descriptor.apply_config(built.as_mut(), &config)?;
            return Ok(Arc::from(built));
        }

        Err(DiError::InvalidConfiguration(format!(
            "\"{}\" does not accept configuration",
            class
        )))
    }

    /// Reflection entry for `class`, building and memoizing it on first use.
    ///
    /// Slots covered by the caller's params keep the caller's values; the
    /// rest take their literal default or an eagerly resolved dependency.
    /// The entry, caller values included, is reused by every subsequent
    /// construction of the type.
    fn dependencies_for(&self, class: &str, params: &Params) -> DiResult<Arc<ReflectionEntry>> {
        if let Some(entry) = self.reflection.entry(class) {
            return Ok(entry);
        }

        let descriptor = self.reflection.descriptor(class)?;
        let mut dependencies = Vec::with_capacity(descriptor.slots().len());
        for (index, slot) in descriptor.slots().iter().enumerate() {
            if let Some(supplied) = params.get(index) {
                dependencies.push(supplied.clone());
            } else if let Some(default) = slot.default() {
                dependencies.push(default.clone());
            } else if let Some(dependency) = slot.dependency_class() {
                // Dependencies are built before the dependent type
                dependencies.push(self.get(dependency)?);
            } else {
                return Err(DiError::MissingDependency {
                    class: class.to_string(),
                    param: slot.name().to_string(),
                });
            }
        }

        Ok(self.reflection.memoize(
            class,
            ReflectionEntry {
                descriptor,
                dependencies,
            },
        ))
    }

    fn singleton_slot(&self, id: &str) -> Option<SingletonSlot> {
        self.singletons.read().get(id).cloned()
    }

    fn ensure_slot(&self, id: &str) -> SingletonSlot {
        self.singletons
            .write()
            .entry(id.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone()
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}
