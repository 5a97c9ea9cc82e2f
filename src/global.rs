//! The process-wide container instance.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::container::Container;

// The one process-wide container, created on first access.
static GLOBAL_CONTAINER: Lazy<Arc<Container>> = Lazy::new(|| Arc::new(Container::new()));

/// Handle to the process-wide [`Container`].
///
/// Initialized once, thread-safely, on first access. Components that can take
/// an explicit container should prefer
/// [`ServiceLocator::with_container`](crate::ServiceLocator::with_container);
/// this accessor exists for code that genuinely needs ambient process-wide
/// bindings.
///
/// # Examples
///
/// ```rust
/// use bindery::{global, value, Binding};
///
/// global()
///     .singleton("app.name", Binding::instance(value("bindery-demo".to_string())), bindery::params![])
///     .unwrap();
///
/// let name = global().get_as::<String>("app.name").unwrap();
/// assert_eq!(name.as_str(), "bindery-demo");
/// ```
pub fn global() -> Arc<Container> {
    GLOBAL_CONTAINER.clone()
}
