//! Literal-or-computed property values.
//!
//! Many configuration fields are either a fixed value ("deal 2
//! damage") or derived from the resolution context at the moment they
//! are needed ("deal damage equal to the source's power"). `Prop`
//! makes that choice explicit as a two-variant sum instead of runtime
//! type sniffing.
//!
//! The derived variant is a plain `fn` pointer, which keeps `Prop`
//! cheap to copy and lets systems be snapshotted into events.

/// A property that is either a fixed value or computed from a context.
pub enum Prop<T, C> {
    /// A fixed literal value.
    Value(T),
    /// Computed from the context at resolution time.
    Derived(fn(&C) -> T),
}

impl<T: Clone, C> Prop<T, C> {
    /// Resolve the property against a context.
    pub fn resolve(&self, ctx: &C) -> T {
        match self {
            Prop::Value(v) => v.clone(),
            Prop::Derived(f) => f(ctx),
        }
    }
}

impl<T: Clone, C> Clone for Prop<T, C> {
    fn clone(&self) -> Self {
        match self {
            Prop::Value(v) => Prop::Value(v.clone()),
            Prop::Derived(f) => Prop::Derived(*f),
        }
    }
}

impl<T: Copy, C> Copy for Prop<T, C> {}

impl<T: std::fmt::Debug, C> std::fmt::Debug for Prop<T, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prop::Value(v) => f.debug_tuple("Value").field(v).finish(),
            Prop::Derived(_) => f.write_str("Derived(..)"),
        }
    }
}

impl<T, C> From<T> for Prop<T, C> {
    fn from(value: T) -> Self {
        Prop::Value(value)
    }
}
