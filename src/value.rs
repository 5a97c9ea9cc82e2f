//! Type-erased values exchanged with the container.
//!
//! Everything the container stores or produces (literal defaults, caller
//! parameters, configuration entries, constructed instances) travels as a
//! [`Value`]: a shared, type-erased `Arc`. Callers recover concrete types with
//! [`downcast`], and constructor closures pull typed arguments out of their
//! positional slice with [`arg`].

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DiError, DiResult};

/// Type-erased shared value.
///
/// The currency of the container: resolved dependencies, singleton instances,
/// and configuration values are all `Value`s. Cloning is an `Arc` clone.
pub type Value = Arc<dyn Any + Send + Sync>;

/// Residual key/value configuration applied to a built instance.
///
/// Keys name the target's configurable properties; values are type-erased.
/// Merging is last-writer-wins per key (caller config over stored config).
pub type Config = HashMap<String, Value>;

/// Wraps a concrete value into a [`Value`].
///
/// # Examples
///
/// ```rust
/// use bindery::{downcast, value};
///
/// let v = value(8080u16);
/// assert_eq!(*downcast::<u16>(&v).unwrap(), 8080);
/// ```
pub fn value<T: Send + Sync + 'static>(v: T) -> Value {
    Arc::new(v)
}

/// Downcasts a [`Value`] back to `Arc<T>`.
///
/// Fails with [`DiError::TypeMismatch`] when the value holds a different type.
pub fn downcast<T: Send + Sync + 'static>(v: &Value) -> DiResult<Arc<T>> {
    v.clone().downcast::<T>().map_err(|_| DiError::TypeMismatch {
        expected: std::any::type_name::<T>(),
    })
}

/// Pulls the `index`-th constructor argument out of a positional slice.
///
/// Intended for use inside [`TypeDescriptor`](crate::TypeDescriptor)
/// constructor closures, where the container hands over the merged argument
/// list in declaration order.
///
/// # Examples
///
/// ```rust
/// use bindery::{arg, value, Value};
///
/// let args: Vec<Value> = vec![value("localhost".to_string()), value(5432u16)];
/// let host = arg::<String>(&args, 0).unwrap();
/// let port = arg::<u16>(&args, 1).unwrap();
/// assert_eq!(host.as_str(), "localhost");
/// assert_eq!(*port, 5432);
/// ```
pub fn arg<T: Send + Sync + 'static>(args: &[Value], index: usize) -> DiResult<Arc<T>> {
    let v = args.get(index).ok_or_else(|| {
        DiError::InvalidConfiguration(format!("missing constructor argument at position {}", index))
    })?;
    downcast(v)
}

/// Merges caller-supplied configuration over stored definition configuration.
/// Caller keys win.
pub(crate) fn merge_config(stored: &Config, caller: &Config) -> Config {
    if stored.is_empty() {
        return caller.clone();
    }
    let mut merged = stored.clone();
    for (key, val) in caller {
        merged.insert(key.clone(), val.clone());
    }
    merged
}
