//! Error types for the dependency injection container.

use std::fmt;

/// Dependency injection errors
///
/// Represents the error conditions that can occur while registering bindings
/// or resolving object graphs in bindery.
///
/// # Examples
///
/// ```rust
/// use bindery::{Container, DiError};
///
/// // Resolving an identifier nobody registered a constructor for
/// let container = Container::new();
/// match container.get("Connection") {
///     Err(DiError::NotInstantiable(name)) => {
///         assert_eq!(name, "Connection");
///     }
///     _ => unreachable!(),
/// }
/// ```
///
/// ```rust
/// use bindery::DiError;
///
/// let missing = DiError::MissingDependency {
///     class: "Connection".to_string(),
///     param: "dsn".to_string(),
/// };
/// let cyclic = DiError::CyclicDependency(vec![
///     "A".to_string(), "B".to_string(), "A".to_string(),
/// ]);
///
/// // All errors implement Display
/// println!("Error: {}", missing);
/// println!("Error: {}", cyclic);
/// ```
#[derive(Debug, Clone)]
pub enum DiError {
    /// A definition's shape is unrecognized or configuration cannot be applied
    InvalidConfiguration(String),
    /// The resolved concrete type has no registered constructor descriptor
    NotInstantiable(String),
    /// A constructor parameter has no default and no resolvable dependency
    MissingDependency {
        /// Concrete type being instantiated
        class: String,
        /// Name of the unsatisfiable parameter
        param: String,
    },
    /// Resolution re-entered an identifier already being resolved (includes path)
    CyclicDependency(Vec<String>),
    /// Maximum resolution depth exceeded
    DepthExceeded(usize),
    /// A stored value could not be downcast to the requested type
    TypeMismatch {
        /// The type the caller asked for
        expected: &'static str,
    },
}

impl fmt::Display for DiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiError::InvalidConfiguration(msg) => {
                write!(f, "Invalid configuration: {}", msg)
            }
            DiError::NotInstantiable(name) => {
                write!(f, "Not instantiable: no constructor registered for \"{}\"", name)
            }
            DiError::MissingDependency { class, param } => {
                write!(
                    f,
                    "Missing required parameter \"{}\" when instantiating \"{}\"",
                    param, class
                )
            }
            DiError::CyclicDependency(path) => {
                write!(f, "Cyclic dependency: {}", path.join(" -> "))
            }
            DiError::DepthExceeded(depth) => write!(f, "Max resolution depth {} exceeded", depth),
            DiError::TypeMismatch { expected } => {
                write!(f, "Type mismatch: stored value is not a {}", expected)
            }
        }
    }
}

impl std::error::Error for DiError {}

/// Result type for DI operations
///
/// A convenience alias for `Result<T, DiError>` used throughout bindery.
pub type DiResult<T> = Result<T, DiError>;
