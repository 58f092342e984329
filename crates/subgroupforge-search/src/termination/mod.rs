//! Termination conditions checked between beam levels.

mod composite;
mod evaluation_count;
mod external;
mod time;

use std::fmt::Debug;

use crate::scope::SearchScope;

pub use composite::OrTermination;
pub use evaluation_count::EvaluationCountTermination;
pub use external::ExternalTermination;
pub use time::TimeTermination;

/// Decides whether a search should stop before its next level.
pub trait Termination: Send + Sync + Debug {
    fn is_terminated(&self, scope: &SearchScope) -> bool;
}

impl<T: Termination + ?Sized> Termination for Box<T> {
    fn is_terminated(&self, scope: &SearchScope) -> bool {
        (**self).is_terminated(scope)
    }
}

#[cfg(test)]
mod tests;
