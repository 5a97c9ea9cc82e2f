//! # bindery
//!
//! String-keyed dependency injection: a registry mapping identifiers (type
//! names, interface names, or arbitrary aliases) to normalized construction
//! recipes, resolving object graphs on demand through explicit constructor
//! descriptors.
//!
//! ## Features
//!
//! - **Normalized definitions**: bare, alias, factory, instance, and recipe
//!   bindings collapse into one tagged definition at bind time
//! - **Descriptor-based resolution**: each constructible type declares its
//!   constructor parameters once; no runtime type inspection
//! - **Singleton cache**: shared identifiers materialize once, idempotently
//!   under concurrent resolution
//! - **Positional parameter merge**: caller params overlay stored defaults
//!   index by index, sparse overrides included
//! - **Cycle detection**: resolution fails fast with the full dependency path
//!   instead of recursing forever
//! - **Service locator**: per-scope overrides shadowing a shared container
//!   without mutating it
//!
//! ## Quick Start
//!
//! ```rust
//! use bindery::{arg, params, Binding, Constructible, Container, ParameterSlot, TypeDescriptor, Value};
//! use std::sync::Arc;
//!
//! // Declare constructible types and their constructor slots
//! struct Connection {
//!     dsn: String,
//! }
//!
//! impl Constructible for Connection {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::new::<Connection, _>("Connection", |args: &[Value]| {
//!             Ok(Connection {
//!                 dsn: arg::<String>(args, 0)?.as_ref().clone(),
//!             })
//!         })
//!         .slot(ParameterSlot::with_default("dsn", "postgres://localhost".to_string()))
//!     }
//! }
//!
//! struct UserRepo {
//!     conn: Arc<Connection>,
//! }
//!
//! impl Constructible for UserRepo {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::new::<UserRepo, _>("UserRepo", |args: &[Value]| {
//!             Ok(UserRepo {
//!                 conn: arg::<Connection>(args, 0)?,
//!             })
//!         })
//!         .slot(ParameterSlot::dependency("conn", "Connection"))
//!     }
//! }
//!
//! // Register descriptors and bindings
//! let container = Container::new();
//! container.register::<Connection>().register::<UserRepo>();
//! container.singleton("Connection", Binding::bare(), params![]).unwrap();
//!
//! // Resolve: the dependency is built first and shared thereafter
//! let repo = container.get_as::<UserRepo>("UserRepo").unwrap();
//! assert_eq!(repo.conn.dsn, "postgres://localhost");
//!
//! let conn = container.get_as::<Connection>("Connection").unwrap();
//! assert!(Arc::ptr_eq(&repo.conn, &conn));
//! ```
//!
//! ## Aliases and recipes
//!
//! An identifier may point at another identifier, forming chains that resolve
//! transitively, and a recipe may carry configuration applied at build time:
//!
//! ```rust
//! use bindery::{arg, config, params, Binding, Constructible, Container, ParameterSlot, TypeDescriptor, Value};
//!
//! struct Mailer {
//!     transport: String,
//! }
//!
//! impl Constructible for Mailer {
//!     fn describe() -> TypeDescriptor {
//!         TypeDescriptor::new::<Mailer, _>("Mailer", |args: &[Value]| {
//!             Ok(Mailer {
//!                 transport: arg::<String>(args, 0)?.as_ref().clone(),
//!             })
//!         })
//!         .slot(ParameterSlot::with_default("transport", "sendmail".to_string()))
//!     }
//! }
//!
//! let container = Container::new();
//! container.register::<Mailer>();
//!
//! // "MailerContract" -> "mailer" -> Mailer
//! container.bind("MailerContract", "mailer", params![], false).unwrap();
//! container
//!     .bind("mailer", Binding::recipe(Some("Mailer"), config![]), params!["smtp".to_string()], false)
//!     .unwrap();
//!
//! let mailer = container.get_as::<Mailer>("MailerContract").unwrap();
//! assert_eq!(mailer.transport, "smtp");
//! ```

// Module declarations
pub mod container;
pub mod definition;
pub mod error;
pub mod global;
pub mod locator;
pub mod params;
pub mod reflection;
pub mod value;

// Internal modules
mod internal;
mod macros;

// Re-export core types
pub use container::Container;
pub use definition::{Binding, FactoryFn};
pub use error::{DiError, DiResult};
pub use global::global;
pub use locator::ServiceLocator;
pub use params::Params;
pub use reflection::{Configurable, Constructible, ParameterSlot, TypeDescriptor};
pub use value::{arg, downcast, value, Config, Value};
