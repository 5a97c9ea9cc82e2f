//! Constructor descriptors and the reflection cache.
//!
//! The container never inspects types at runtime. Instead, each constructible
//! type supplies a [`TypeDescriptor`]: its constructor parameters in
//! declaration order plus a closure that builds an instance from a positional
//! argument list. Descriptors are registered up front (usually through the
//! [`Constructible`] trait) and looked up by type name during resolution.
//!
//! The [`ReflectionCache`] memoizes, per concrete type, the descriptor
//! together with the fully resolved default argument list, so repeated
//! construction skips both the registry lookup and the dependency walk.
//! Dependencies captured when the entry is first built are reused by every
//! later construction of that type; only positions the caller supplies
//! explicitly are replaced per call.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{DiError, DiResult};
use crate::value::{value, Config, Value};

type ConstructFn = Arc<dyn Fn(&[Value]) -> DiResult<Box<dyn Any + Send + Sync>> + Send + Sync>;
type ApplyFn = Arc<dyn Fn(&mut (dyn Any + Send + Sync), &str, &Value) -> DiResult<()> + Send + Sync>;

/// One constructor parameter of a concrete type.
///
/// Position is given by the slot's index in the descriptor's slot list. A slot
/// is satisfied, in order of precedence, by a caller-supplied positional
/// value, its literal default, or a recursive resolution of its declared
/// dependency. A slot with none of the three fails resolution with
/// [`DiError::MissingDependency`].
#[derive(Clone)]
pub struct ParameterSlot {
    name: &'static str,
    dependency: Option<&'static str>,
    default: Option<Value>,
}

impl ParameterSlot {
    /// Parameter whose declared type is resolvable through the container.
    pub fn dependency(name: &'static str, class: &'static str) -> Self {
        Self {
            name,
            dependency: Some(class),
            default: None,
        }
    }

    /// Parameter with a literal default value.
    pub fn with_default<T: Send + Sync + 'static>(name: &'static str, default: T) -> Self {
        Self {
            name,
            dependency: None,
            default: Some(value(default)),
        }
    }

    /// Parameter the caller must always supply positionally.
    pub fn required(name: &'static str) -> Self {
        Self {
            name,
            dependency: None,
            default: None,
        }
    }

    /// Parameter name, used in error messages.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Identifier of the declared dependency type, if any.
    pub fn dependency_class(&self) -> Option<&'static str> {
        self.dependency
    }

    /// Literal default value, if any.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Construction recipe for one concrete type.
///
/// Holds the ordered [`ParameterSlot`] list, the constructor closure, and the
/// type's configuration capability: either configuration is passed through the
/// trailing constructor parameter ([`trailing_config`](Self::trailing_config)),
/// or it is applied key-by-key after construction via the [`Configurable`]
/// trait ([`configurable`](Self::configurable)). A type with neither rejects
/// non-empty configuration.
///
/// # Examples
///
/// ```rust
/// use bindery::{arg, Constructible, ParameterSlot, TypeDescriptor};
///
/// struct Engine {
///     cylinders: u8,
/// }
///
/// impl Constructible for Engine {
///     fn describe() -> TypeDescriptor {
///         TypeDescriptor::new::<Engine, _>("Engine", |args: &[bindery::Value]| {
///             Ok(Engine {
///                 cylinders: *arg::<u8>(args, 0)?,
///             })
///         })
///         .slot(ParameterSlot::with_default("cylinders", 4u8))
///     }
/// }
/// ```
#[derive(Clone)]
pub struct TypeDescriptor {
    type_name: &'static str,
    slots: Vec<ParameterSlot>,
    construct: ConstructFn,
    apply: Option<ApplyFn>,
    trailing_config: bool,
}

impl TypeDescriptor {
    /// Creates a descriptor for `T` with its constructor closure.
    ///
    /// The closure receives the merged positional argument list, one entry per
    /// slot in declaration order; [`arg`](crate::arg) recovers typed values.
    pub fn new<T, F>(type_name: &'static str, construct: F) -> Self
    where
        T: Send + Sync + 'static,
        F: Fn(&[Value]) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            type_name,
            slots: Vec::new(),
            construct: Arc::new(move |args: &[Value]| {
                construct(args).map(|v| Box::new(v) as Box<dyn Any + Send + Sync>)
            }),
            apply: None,
            trailing_config: false,
        }
    }

    /// Appends a constructor parameter slot. Order is declaration order.
    pub fn slot(mut self, slot: ParameterSlot) -> Self {
        self.slots.push(slot);
        self
    }

    /// Marks the type as taking configuration through its trailing
    /// constructor parameter: when resolution carries a non-empty config, the
    /// last argument is replaced with an `Arc<Config>` before construction.
    pub fn trailing_config(mut self) -> Self {
        self.trailing_config = true;
        self
    }

    /// Wires the [`Configurable`] capability: after construction, each config
    /// key is applied to the fresh instance via [`Configurable::set`].
    pub fn configurable<T: Configurable>(mut self) -> Self {
        self.apply = Some(Arc::new(
            |obj: &mut (dyn Any + Send + Sync), key: &str, val: &Value| {
                match obj.downcast_mut::<T>() {
                    Some(target) => target.set(key, val),
                    None => Err(DiError::TypeMismatch {
                        expected: std::any::type_name::<T>(),
                    }),
                }
            },
        ));
        self
    }

    /// The type name this descriptor is registered under.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Constructor parameters in declaration order.
    pub fn slots(&self) -> &[ParameterSlot] {
        &self.slots
    }

    pub(crate) fn construct(&self, args: &[Value]) -> DiResult<Box<dyn Any + Send + Sync>> {
        (self.construct)(args)
    }

    pub(crate) fn takes_trailing_config(&self) -> bool {
        self.trailing_config
    }

    pub(crate) fn apply_config(&self, obj: &mut (dyn Any + Send + Sync), config: &Config) -> DiResult<()> {
        let apply = self.apply.as_ref().ok_or_else(|| {
            DiError::InvalidConfiguration(format!(
                "\"{}\" does not accept configuration",
                self.type_name
            ))
        })?;
        for (key, val) in config {
            apply(&mut *obj, key, val)?;
        }
        Ok(())
    }

    pub(crate) fn has_apply(&self) -> bool {
        self.apply.is_some()
    }
}

/// Types whose descriptor the container can look up by name.
///
/// Implementing `Constructible` and calling
/// [`Container::register`](crate::Container::register) is the usual way a
/// type joins the registry; hand-built descriptors can also be registered
/// directly with
/// [`Container::register_descriptor`](crate::Container::register_descriptor).
pub trait Constructible: Send + Sync + 'static {
    /// The type's constructor descriptor.
    fn describe() -> TypeDescriptor;
}

/// Capability for applying residual configuration to a built instance.
///
/// Models "assign each config key as a property" as an explicit, structured
/// operation: the container never mutates fields it cannot see. Implementors
/// should reject unknown keys with [`DiError::InvalidConfiguration`].
///
/// # Examples
///
/// ```rust
/// use bindery::{downcast, Configurable, DiError, DiResult, Value};
///
/// struct Connection {
///     dsn: String,
/// }
///
/// impl Configurable for Connection {
///     fn set(&mut self, key: &str, val: &Value) -> DiResult<()> {
///         match key {
///             "dsn" => {
///                 self.dsn = downcast::<String>(val)?.as_ref().clone();
///                 Ok(())
///             }
///             other => Err(DiError::InvalidConfiguration(format!(
///                 "Connection has no property \"{}\"",
///                 other
///             ))),
///         }
///     }
/// }
/// ```
pub trait Configurable: Send + Sync + 'static {
    /// Applies one configuration entry to the instance.
    fn set(&mut self, key: &str, val: &Value) -> DiResult<()>;
}

/// Memoized reflection data for one concrete type.
pub(crate) struct ReflectionEntry {
    pub(crate) descriptor: Arc<TypeDescriptor>,
    /// Default argument list, one entry per slot: first-caller params where
    /// supplied, literal defaults, or eagerly resolved dependencies.
    pub(crate) dependencies: Vec<Value>,
}

/// Descriptor registry plus per-type memoized entries.
///
/// Reads never observe a partially written descriptor or entry: both maps
/// hand out `Arc`s cloned under a short read lock, and entry insertion is
/// first-writer-wins so racing resolvers converge on one entry.
pub(crate) struct ReflectionCache {
    descriptors: RwLock<HashMap<&'static str, Arc<TypeDescriptor>>>,
    entries: RwLock<HashMap<String, Arc<ReflectionEntry>>>,
}

impl ReflectionCache {
    pub(crate) fn new() -> Self {
        Self {
            descriptors: RwLock::new(HashMap::new()),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a descriptor under its type name, replacing any previous one.
    /// A replaced descriptor also drops the type's memoized entry.
    pub(crate) fn register(&self, descriptor: TypeDescriptor) {
        let name = descriptor.type_name();
        self.descriptors.write().insert(name, Arc::new(descriptor));
        self.entries.write().remove(name);
    }

    /// Descriptor for `class`, or [`DiError::NotInstantiable`] if the type
    /// never registered a constructor (the abstract/interface case).
    pub(crate) fn descriptor(&self, class: &str) -> DiResult<Arc<TypeDescriptor>> {
        self.descriptors
            .read()
            .get(class)
            .cloned()
            .ok_or_else(|| DiError::NotInstantiable(class.to_string()))
    }

    pub(crate) fn entry(&self, class: &str) -> Option<Arc<ReflectionEntry>> {
        self.entries.read().get(class).cloned()
    }

    /// Memoizes an entry; the first writer wins and everyone gets its entry.
    pub(crate) fn memoize(&self, class: &str, entry: ReflectionEntry) -> Arc<ReflectionEntry> {
        self.entries
            .write()
            .entry(class.to_string())
            .or_insert_with(|| Arc::new(entry))
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::arg;

    struct Widget {
        size: u32,
    }

    impl Constructible for Widget {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::new::<Widget, _>("Widget", |args: &[Value]| {
                Ok(Widget {
                    size: *arg::<u32>(args, 0)?,
                })
            })
            .slot(ParameterSlot::with_default("size", 7u32))
        }
    }

    #[test]
    fn unregistered_type_is_not_instantiable() {
        let cache = ReflectionCache::new();
        assert!(matches!(
            cache.descriptor("Widget"),
            Err(DiError::NotInstantiable(_))
        ));
    }

    #[test]
    fn register_replaces_and_drops_memoized_entry() {
        let cache = ReflectionCache::new();
        cache.register(Widget::describe());

        let descriptor = cache.descriptor("Widget").unwrap();
        cache.memoize(
            "Widget",
            ReflectionEntry {
                descriptor: descriptor.clone(),
                dependencies: vec![value(7u32)],
            },
        );
        assert!(cache.entry("Widget").is_some());

        cache.register(Widget::describe());
        assert!(cache.entry("Widget").is_none());
    }

    #[test]
    fn memoize_is_first_writer_wins() {
        let cache = ReflectionCache::new();
        cache.register(Widget::describe());
        let descriptor = cache.descriptor("Widget").unwrap();

        let first = cache.memoize(
            "Widget",
            ReflectionEntry {
                descriptor: descriptor.clone(),
                dependencies: vec![value(1u32)],
            },
        );
        let second = cache.memoize(
            "Widget",
            ReflectionEntry {
                descriptor,
                dependencies: vec![value(2u32)],
            },
        );
        assert!(Arc::ptr_eq(&first, &second));
    }
}
