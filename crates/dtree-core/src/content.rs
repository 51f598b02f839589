//! The capability leaf payloads must provide.

use std::fmt;

use crate::error::AppendError;

/// A renderable unit carried by a [`Leaf`](crate::Leaf).
///
/// The engine treats content as opaque. It only needs to know how to fold
/// an incremental update into existing content and how to compute the
/// secondary view a leaf memoizes.
pub trait Content: Clone + fmt::Debug + Send + Sync + 'static {
    /// Payload of an `AppendToLeaf` mutation.
    type Increment: Clone + fmt::Debug + Send + Sync;

    /// Expensive derived representation, computed at most once per leaf.
    type Derived: Send + Sync;

    /// Combine `self` with `increment` into new content.
    ///
    /// Implementations should be associative: appending `a` then `b` must
    /// yield the same content as appending the combination of `a` and `b`.
    fn append(&self, increment: &Self::Increment) -> Result<Self, AppendError>;

    /// Compute the derived representation.
    fn derive(&self) -> Self::Derived;
}

/// Plain text: increments concatenate and the derived view is the line list.
impl Content for String {
    type Increment = String;
    type Derived = Vec<String>;

    fn append(&self, increment: &String) -> Result<Self, AppendError> {
        let mut out = String::with_capacity(self.len() + increment.len());
        out.push_str(self);
        out.push_str(increment);
        Ok(out)
    }

    fn derive(&self) -> Vec<String> {
        self.lines().map(str::to_owned).collect()
    }
}
