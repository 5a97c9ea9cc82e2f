use bindery::{arg, config, params, value, Binding, Constructible, Container, ParameterSlot, TypeDescriptor, Value};
use std::sync::Arc;

struct Clock {
    precision_ms: u64,
}

impl Constructible for Clock {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Clock, _>("Clock", |args: &[Value]| {
            Ok(Clock {
                precision_ms: *arg::<u64>(args, 0)?,
            })
        })
        .slot(ParameterSlot::with_default("precision_ms", 1000u64))
    }
}

#[test]
fn test_unbound_identifier_builds_like_direct_build() {
    let container = Container::new();
    container.register::<Clock>();

    let got = container.get_as::<Clock>("Clock").unwrap();
    let built = container
        .build_as::<Clock>("Clock", params![], config![])
        .unwrap();

    assert_eq!(got.precision_ms, 1000);
    assert_eq!(built.precision_ms, 1000);
    assert!(!Arc::ptr_eq(&got, &built)); // Fresh construction each time
}

#[test]
fn test_shared_identifier_returns_same_instance() {
    let container = Container::new();
    container.register::<Clock>();
    container.singleton("Clock", Binding::bare(), params![]).unwrap();

    let a = container.get_as::<Clock>("Clock").unwrap();
    // Differing params and config are ignored once materialized
    let b = container
        .get_with("Clock", params![5u64], config! { "ignored" => true })
        .unwrap();
    let b = bindery::downcast::<Clock>(&b).unwrap();

    assert!(Arc::ptr_eq(&a, &b));
    assert_eq!(b.precision_ms, 1000);
}

#[test]
fn test_non_shared_identifier_returns_distinct_instances() {
    let container = Container::new();
    container.register::<Clock>();
    container.bind("Clock", Binding::bare(), params![], false).unwrap();

    let a = container.get_as::<Clock>("Clock").unwrap();
    let b = container.get_as::<Clock>("Clock").unwrap();
    assert!(!Arc::ptr_eq(&a, &b));
}

#[test]
fn test_instance_binding_is_cached_even_when_non_shared() {
    let container = Container::new();
    container
        .bind("answer", Binding::instance(value(42u64)), params![], false)
        .unwrap();

    let a = container.get_as::<u64>("answer").unwrap();
    let b = container.get_as::<u64>("answer").unwrap();
    assert_eq!(*a, 42);
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_rebinding_replaces_definition_and_params() {
    let container = Container::new();
    container.register::<Clock>();

    container
        .bind("Clock", Binding::bare(), params![], false)
        .unwrap();
    container
        .bind("Clock", Binding::bare(), params![250u64], false)
        .unwrap();

    // First construction of the type captures the merged params
    let clock = container.get_as::<Clock>("Clock").unwrap();
    assert_eq!(clock.precision_ms, 250);
}

#[test]
fn test_rebinding_non_shared_drops_the_cached_instance() {
    struct Marker {
        generation: u32,
    }

    impl Constructible for Marker {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::new::<Marker, _>("Marker", |args: &[Value]| {
                Ok(Marker {
                    generation: *arg::<u32>(args, 0)?,
                })
            })
            .slot(ParameterSlot::required("generation"))
        }
    }

    let container = Container::new();
    container.register::<Marker>();
    container
        .singleton("Marker", Binding::bare(), params![1u32])
        .unwrap();

    let first = container.get_as::<Marker>("Marker").unwrap();
    assert_eq!(first.generation, 1);

    // Re-bind as non-shared with a factory: the cached instance must go
    container
        .bind(
            "Marker",
            Binding::factory(|_c: &Container, _p: &bindery::Params, _cfg: &bindery::Config| {
                Ok(value(Marker { generation: 2 }))
            }),
            params![],
            false,
        )
        .unwrap();

    let second = container.get_as::<Marker>("Marker").unwrap();
    assert_eq!(second.generation, 2);
    assert!(!Arc::ptr_eq(&first, &second));
}

#[test]
fn test_rebinding_shared_keeps_a_materialized_instance() {
    let container = Container::new();
    container.register::<Clock>();
    container.singleton("Clock", Binding::bare(), params![]).unwrap();

    let first = container.get_as::<Clock>("Clock").unwrap();

    container.singleton("Clock", Binding::bare(), params![9u64]).unwrap();
    let second = container.get_as::<Clock>("Clock").unwrap();

    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_has_reports_definitions_only() {
    let container = Container::new();
    container.register::<Clock>();
    assert!(!container.has("Clock"));

    container.bind("Clock", Binding::bare(), params![], false).unwrap();
    assert!(container.has("Clock"));
}
