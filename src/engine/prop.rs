//! Props - polymorphic value sources.
//!
//! A [`Prop<T>`] lets a component accept a plain value, a live state cell,
//! or a getter closure through one parameter, and resolve it fresh on every
//! read. Nothing is cached: a getter is invoked each time, a cell is read
//! each time.

use std::rc::Rc;

use super::state::{State, StateError};

/// A property value: a literal, a state cell, or a getter.
///
/// # Example
///
/// ```
/// use twig_tui::engine::{Node, Prop};
///
/// let node = Node::new();
/// let score = node.state(0u32);
///
/// let fixed: Prop<String> = Prop::from(String::from("title"));
/// let live: Prop<u32> = Prop::from(score.clone());
/// let score_for_label = score.clone();
/// let label: Prop<String> = Prop::getter(move || format!("Score: {}", score_for_label.get()));
///
/// score.set(2);
/// assert_eq!(fixed.get(), "title");
/// assert_eq!(live.get(), 2);
/// assert_eq!(label.get(), "Score: 2");
/// ```
pub enum Prop<T> {
    /// A plain value, not reactive.
    Value(T),
    /// A live handle; reads see the cell's current value.
    State(State<T>),
    /// A closure invoked on every read.
    Getter(Rc<dyn Fn() -> T>),
}

impl<T> Clone for Prop<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        match self {
            Prop::Value(v) => Prop::Value(v.clone()),
            Prop::State(s) => Prop::State(s.clone()),
            Prop::Getter(f) => Prop::Getter(f.clone()),
        }
    }
}

impl<T: Clone> Prop<T> {
    /// Wrap a getter closure.
    pub fn getter(f: impl Fn() -> T + 'static) -> Self {
        Prop::Getter(Rc::new(f))
    }

    /// Resolve the current value, or report an unbound cell variant.
    pub fn try_get(&self) -> Result<T, StateError> {
        match self {
            Prop::Value(v) => Ok(v.clone()),
            Prop::State(s) => s.try_get(),
            Prop::Getter(f) => Ok(f()),
        }
    }

    /// Resolve the current value.
    ///
    /// # Panics
    ///
    /// Panics if the active variant is an unbound state handle.
    pub fn get(&self) -> T {
        match self.try_get() {
            Ok(v) => v,
            Err(e) => panic!("Prop::get: {e}"),
        }
    }
}

impl<T> From<T> for Prop<T> {
    fn from(value: T) -> Self {
        Prop::Value(value)
    }
}

impl<T> From<State<T>> for Prop<T> {
    fn from(state: State<T>) -> Self {
        Prop::State(state)
    }
}
