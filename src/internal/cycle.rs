//! Cyclic dependency detection infrastructure.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};

const MAX_DEPTH: usize = 1024;

// Thread-local resolution stack for cycle detection
thread_local! {
    static RESOLUTION_TLS: RefCell<Vec<String>> = RefCell::new(Vec::new());
}

/// Guard for the thread-local resolution stack.
///
/// Entering pushes the identifier being resolved; dropping pops it. A second
/// entry for an identifier already on the stack means resolution looped back
/// into itself, and the guard fails with the complete path.
pub(crate) struct StackGuard {
    name: String,
}

impl StackGuard {
    pub(crate) fn enter(name: &str) -> DiResult<Self> {
        RESOLUTION_TLS.with(|tls| {
            let mut stack = tls.borrow_mut();

            // Cycle check BEFORE pushing the new name
            if stack.iter().any(|n| n == name) {
                let mut path = stack.clone();
                path.push(name.to_string());
                return Err(DiError::CyclicDependency(path));
            }

            // Depth backstop for non-cyclic runaway graphs
            if stack.len() >= MAX_DEPTH {
                return Err(DiError::DepthExceeded(stack.len()));
            }

            stack.push(name.to_string());
            Ok(())
        })?;

        Ok(Self {
            name: name.to_string(),
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        RESOLUTION_TLS.with(|tls| {
            if let Some(last) = tls.borrow_mut().pop() {
                debug_assert_eq!(last, self.name);
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reentry_reports_the_full_path() {
        let _a = StackGuard::enter("A").unwrap();
        let _b = StackGuard::enter("B").unwrap();
        match StackGuard::enter("A") {
            Err(DiError::CyclicDependency(path)) => {
                assert_eq!(path, vec!["A".to_string(), "B".to_string(), "A".to_string()]);
            }
            _ => panic!("expected CyclicDependency"),
        }
    }

    #[test]
    fn depth_backstop_trips_without_a_cycle() {
        let mut guards = Vec::new();
        for i in 0..MAX_DEPTH {
            guards.push(StackGuard::enter(&format!("t{}", i)).unwrap());
        }
        assert!(matches!(
            StackGuard::enter("one-too-many"),
            Err(DiError::DepthExceeded(_))
        ));
    }

    #[test]
    fn drop_unwinds_the_stack() {
        {
            let _a = StackGuard::enter("A").unwrap();
        }
        // "A" popped on drop, so entering again succeeds
        let _a = StackGuard::enter("A").unwrap();
    }
}
