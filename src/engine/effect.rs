//! Effects and dependency tracking.
//!
//! An [`EffectHook`] is an action plus a list of dependency trackers, one per
//! declared state cell. The update walk calls [`EffectHook::run_if_changed`]
//! once per pass: the action runs on the very first evaluation, and after
//! that only when at least one tracked cell's value differs from the value
//! cached when the action last ran. Detection is by polling and `PartialEq`,
//! not by write notification.
//!
//! Dependencies are declared with the [`deps!`](crate::deps) macro, which
//! accepts any mix of [`State<T>`] handles and [`Prop<T>`] values. A prop
//! only contributes a tracker when its active variant is a state cell;
//! literal and getter props cannot be cheaply observed and are skipped.

use super::prop::Prop;
use super::state::State;

// =============================================================================
// Dependency trackers
// =============================================================================

/// Change detection for one tracked state cell.
///
/// Implementations cache the last value observed when the owning effect ran
/// and answer "did it change since then?".
pub trait Dependency {
    /// Whether the current value differs from the cached one.
    ///
    /// No cached value yet always counts as changed; an unbound handle
    /// always counts as unchanged.
    fn has_changed(&self) -> bool;

    /// Refresh the cache from the current value. Called only after the
    /// owning effect's action actually ran.
    fn update_last_value(&mut self);
}

/// [`Dependency`] backed by a [`State<T>`] cell.
///
/// Comparison is full `PartialEq` on the whole value, collections included.
/// Effects over large collections re-run on any content change; declare a
/// cheaper sentinel cell (a counter or length) as the dependency instead if
/// that matters.
struct Tracked<T: Clone + PartialEq> {
    state: State<T>,
    last: Option<T>,
}

impl<T: Clone + PartialEq> Dependency for Tracked<T> {
    fn has_changed(&self) -> bool {
        let Ok(current) = self.state.try_get() else {
            return false;
        };
        match &self.last {
            None => true,
            Some(previous) => current != *previous,
        }
    }

    fn update_last_value(&mut self) {
        self.last = self.state.try_get().ok();
    }
}

/// Conversion of a declared dependency into a tracker.
///
/// Returns `None` for values that contribute no tracker (literal and getter
/// props).
pub trait IntoDependency {
    fn into_dependency(&self) -> Option<Box<dyn Dependency>>;
}

impl<T: Clone + PartialEq + 'static> IntoDependency for State<T> {
    fn into_dependency(&self) -> Option<Box<dyn Dependency>> {
        Some(Box::new(Tracked {
            state: self.clone(),
            last: None,
        }))
    }
}

impl<T: Clone + PartialEq + 'static> IntoDependency for Prop<T> {
    fn into_dependency(&self) -> Option<Box<dyn Dependency>> {
        match self {
            Prop::State(state) => state.into_dependency(),
            Prop::Value(_) | Prop::Getter(_) => None,
        }
    }
}

/// Collect a heterogeneous dependency list for [`Node::effect`].
///
/// Accepts state cells and props in any mix; props that hold a literal or a
/// getter are silently skipped (they contribute no tracker).
///
/// ```
/// use twig_tui::{deps, engine::Node};
///
/// let node = Node::new();
/// let a = node.state(1);
/// let b = node.state("x");
/// node.effect(|| {}, deps![a, b]);
/// ```
///
/// [`Node::effect`]: crate::engine::Node::effect
#[macro_export]
macro_rules! deps {
    () => {
        ::std::vec::Vec::new()
    };
    ($($dep:expr),+ $(,)?) => {{
        let mut list: ::std::vec::Vec<::std::boxed::Box<dyn $crate::engine::Dependency>> =
            ::std::vec::Vec::new();
        $(
            if let ::std::option::Option::Some(tracker) =
                $crate::engine::IntoDependency::into_dependency(&$dep)
            {
                list.push(tracker);
            }
        )+
        list
    }};
}

// =============================================================================
// Effect hook
// =============================================================================

/// A dependency-gated action owned by a node's hook storage.
pub struct EffectHook {
    action: Box<dyn FnMut()>,
    dependencies: Vec<Box<dyn Dependency>>,
    first_run: bool,
}

impl EffectHook {
    pub fn new(action: impl FnMut() + 'static, dependencies: Vec<Box<dyn Dependency>>) -> Self {
        Self {
            action: Box::new(action),
            dependencies,
            first_run: true,
        }
    }

    /// Run the action if this is the first evaluation or any dependency
    /// changed, then refresh every tracker's cache.
    ///
    /// Trackers are checked in declaration order and checking stops at the
    /// first change, so tie-break order is deterministic. An effect with no
    /// dependencies runs exactly once, on its first evaluation - the legal
    /// degenerate form for mount-only setup.
    pub fn run_if_changed(&mut self) {
        let changed = self.first_run || self.dependencies.iter().any(|dep| dep.has_changed());
        if !changed {
            return;
        }
        (self.action)();
        for dep in &mut self.dependencies {
            dep.update_last_value();
        }
        self.first_run = false;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::engine::Node;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut() + 'static) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        (count, move || inner.set(inner.get() + 1))
    }

    #[test]
    fn first_run_always_executes() {
        let node = Node::new();
        let dep = node.state(5);
        let (count, action) = counter();
        let mut hook = EffectHook::new(action, deps![dep]);
        hook.run_if_changed();
        assert_eq!(count.get(), 1, "first evaluation must run the action");
    }

    #[test]
    fn zero_dependency_effect_runs_exactly_once() {
        let (count, action) = counter();
        let mut hook = EffectHook::new(action, deps![]);
        for _ in 0..5 {
            hook.run_if_changed();
        }
        assert_eq!(count.get(), 1, "mount-only effect must not re-run");
    }

    #[test]
    fn unchanged_dependency_does_not_rerun() {
        let node = Node::new();
        let dep = node.state(5);
        let (count, action) = counter();
        let mut hook = EffectHook::new(action, deps![dep]);
        hook.run_if_changed();
        hook.run_if_changed();
        hook.run_if_changed();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn changed_dependency_reruns_exactly_once() {
        let node = Node::new();
        let dep = node.state(5);
        let (count, action) = counter();
        let mut hook = EffectHook::new(action, deps![dep]);
        hook.run_if_changed();

        dep.set(9);
        hook.run_if_changed();
        assert_eq!(count.get(), 2);

        // Setting the same value again is not a change.
        dep.set(9);
        hook.run_if_changed();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn any_of_several_dependencies_triggers() {
        let node = Node::new();
        let a = node.state(1);
        let b = node.state("x");
        let (count, action) = counter();
        let mut hook = EffectHook::new(action, deps![a, b]);
        hook.run_if_changed();

        b.set("y");
        hook.run_if_changed();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn literal_and_getter_props_are_not_tracked() {
        let node = Node::new();
        let literal: Prop<i32> = Prop::from(3);
        let source = Rc::new(Cell::new(0));
        let source_for_getter = source.clone();
        let getter: Prop<i32> = Prop::getter(move || source_for_getter.get());

        let (count, action) = counter();
        let mut hook = EffectHook::new(action, deps![literal, getter]);
        hook.run_if_changed();

        // Mutating what the getter reads must not re-trigger: the prop
        // contributed no tracker.
        source.set(99);
        hook.run_if_changed();
        assert_eq!(count.get(), 1);

        let _ = node;
    }

    #[test]
    fn state_prop_is_tracked() {
        let node = Node::new();
        let cell = node.state(1);
        let prop: Prop<i32> = Prop::from(cell.clone());

        let (count, action) = counter();
        let mut hook = EffectHook::new(action, deps![prop]);
        hook.run_if_changed();

        cell.set(2);
        hook.run_if_changed();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn collection_dependency_compares_full_contents() {
        let node = Node::new();
        let items = node.state(vec![1, 2, 3]);
        let (count, action) = counter();
        let mut hook = EffectHook::new(action, deps![items]);
        hook.run_if_changed();

        // Same length, different contents: full equality still detects it.
        items.set(vec![1, 2, 4]);
        hook.run_if_changed();
        assert_eq!(count.get(), 2);
    }

    #[test]
    fn unbound_dependency_counts_as_unchanged() {
        let unbound: State<i32> = State::default();
        let (count, action) = counter();
        let mut hook = EffectHook::new(action, deps![unbound]);
        hook.run_if_changed();
        hook.run_if_changed();
        assert_eq!(count.get(), 1, "unbound tracker must not keep firing");
    }

    #[test]
    fn mutation_made_by_action_is_snapshotted() {
        let node = Node::new();
        let dep = node.state(0);
        let log = Rc::new(RefCell::new(Vec::new()));

        let dep_in_action = dep.clone();
        let log_in_action = log.clone();
        let mut hook = EffectHook::new(
            move || log_in_action.borrow_mut().push(dep_in_action.get()),
            deps![dep],
        );

        dep.set(1);
        hook.run_if_changed();
        hook.run_if_changed();
        assert_eq!(*log.borrow(), vec![1], "cache refresh happens after the run");
    }
}
