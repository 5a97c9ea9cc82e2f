use bindery::{arg, params, Constructible, Container, DiError, ParameterSlot, TypeDescriptor, Value};
use std::sync::Arc;

struct Chicken {
    #[allow(dead_code)]
    egg: Arc<Egg>,
}

impl Constructible for Chicken {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Chicken, _>("Chicken", |args: &[Value]| {
            Ok(Chicken {
                egg: arg::<Egg>(args, 0)?,
            })
        })
        .slot(ParameterSlot::dependency("egg", "Egg"))
    }
}

struct Egg {
    #[allow(dead_code)]
    chicken: Arc<Chicken>,
}

impl Constructible for Egg {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::new::<Egg, _>("Egg", |args: &[Value]| {
            Ok(Egg {
                chicken: arg::<Chicken>(args, 0)?,
            })
        })
        .slot(ParameterSlot::dependency("chicken", "Chicken"))
    }
}

#[test]
fn test_two_type_dependency_cycle_fails_with_path() {
    let container = Container::new();
    container.register::<Chicken>().register::<Egg>();

    match container.get("Chicken") {
        Err(DiError::CyclicDependency(path)) => {
            assert_eq!(path, vec!["Chicken", "Egg", "Chicken"]);
        }
        other => panic!("expected CyclicDependency, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_alias_loop_fails_with_path() {
    let container = Container::new();
    container.bind("X", "Y", params![], false).unwrap();
    container.bind("Y", "X", params![], false).unwrap();

    match container.get("X") {
        Err(DiError::CyclicDependency(path)) => {
            assert_eq!(path, vec!["X", "Y", "X"]);
        }
        other => panic!("expected CyclicDependency, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_failed_resolution_leaves_the_container_usable() {
    struct Standalone;

    impl Constructible for Standalone {
        fn describe() -> TypeDescriptor {
            TypeDescriptor::new::<Standalone, _>("Standalone", |_args: &[Value]| Ok(Standalone))
        }
    }

    let container = Container::new();
    container.register::<Chicken>().register::<Egg>().register::<Standalone>();

    assert!(container.get("Chicken").is_err());
    // The resolution stack unwound; unrelated identifiers still resolve
    assert!(container.get_as::<Standalone>("Standalone").is_ok());
    // And the cycle still reports correctly a second time
    assert!(matches!(
        container.get("Egg"),
        Err(DiError::CyclicDependency(_))
    ));
}
