use bindery::{arg, config, params, value, Binding, Constructible, Container, DiError, ParameterSlot, ServiceLocator, TypeDescriptor, Value};
use std::sync::Arc;

struct Cache {
    capacity: usize,
}

impl Constructible for Cache {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Cache, _>("Cache", |args: &[Value]| {
            Ok(Cache {
                capacity: *arg::<usize>(args, 0)?,
            })
        })
        .slot(ParameterSlot::with_default("capacity", 128usize))
    }
}

fn shared_container() -> Arc<Container> {
    let container = Arc::new(Container::new());
    container.register::<Cache>();
    container
}

#[test]
fn test_locator_falls_back_to_the_container() {
    let container = shared_container();
    container.singleton("Cache", Binding::bare(), params![]).unwrap();

    let locator = ServiceLocator::with_container(container.clone());
    let from_locator = locator.get_as::<Cache>("Cache").unwrap();
    let from_container = container.get_as::<Cache>("Cache").unwrap();

    assert_eq!(from_locator.capacity, 128);
    assert!(Arc::ptr_eq(&from_locator, &from_container));
}

#[test]
fn test_local_binding_shadows_without_mutating_the_container() {
    let container = shared_container();
    container
        .singleton("Cache", Binding::recipe(None, config![]), params![256usize])
        .unwrap();

    let locator = ServiceLocator::with_container(container.clone());
    locator
        .singleton("Cache", Binding::instance(value(Cache { capacity: 8 })))
        .unwrap();

    let local = locator.get_as::<Cache>("Cache").unwrap();
    assert_eq!(local.capacity, 8);

    // The shared container never saw the override
    let shared = container.get_as::<Cache>("Cache").unwrap();
    assert_eq!(shared.capacity, 256);
    assert!(!Arc::ptr_eq(&local, &shared));
    assert!(locator.has_local("Cache"));
}

#[test]
fn test_locator_singleton_is_cached_per_locator() {
    let container = shared_container();

    let locator_a = ServiceLocator::with_container(container.clone());
    let locator_b = ServiceLocator::with_container(container.clone());

    locator_a.singleton("Cache", Binding::bare()).unwrap();
    locator_b.singleton("Cache", Binding::bare()).unwrap();

    let a1 = locator_a.get_as::<Cache>("Cache").unwrap();
    let a2 = locator_a.get_as::<Cache>("Cache").unwrap();
    let b = locator_b.get_as::<Cache>("Cache").unwrap();

    assert!(Arc::ptr_eq(&a1, &a2)); // Cached within a locator
    assert!(!Arc::ptr_eq(&a1, &b)); // Independent across locators
}

#[test]
fn test_locator_factory_resolves_dependencies_via_the_container() {
    let container = shared_container();
    container.singleton("Cache", Binding::bare(), params![]).unwrap();

    let locator = ServiceLocator::with_container(container.clone());
    locator
        .bind(
            "report",
            Binding::factory(|c: &Container, _p: &bindery::Params, _cfg: &bindery::Config| {
                let cache = c.get_as::<Cache>("Cache")?;
                Ok(value(format!("capacity={}", cache.capacity)))
            }),
            false,
        )
        .unwrap();

    let report = locator.get_as::<String>("report").unwrap();
    assert_eq!(report.as_str(), "capacity=128");
}

#[test]
fn test_locator_recipe_aliases_into_the_container() {
    let container = shared_container();

    let locator = ServiceLocator::with_container(container.clone());
    locator.bind("fast-cache", "Cache", false).unwrap();

    let cache = locator.get_as::<Cache>("fast-cache").unwrap();
    assert_eq!(cache.capacity, 128);
}

#[test]
fn test_locator_propagates_container_errors() {
    let container = Arc::new(Container::new());
    let locator = ServiceLocator::with_container(container);

    assert!(matches!(
        locator.get("Missing"),
        Err(DiError::NotInstantiable(_))
    ));
}
