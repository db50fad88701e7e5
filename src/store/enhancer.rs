//! Store construction and enhancer composition.

use crate::module::ModuleInstance;

use super::Store;

/// Signature of the base store constructor handed to enhancers.
pub type StoreCreator = fn(Vec<ModuleInstance>) -> Store;

/// Wraps store construction to extend or intercept it.
///
/// Implemented for any `FnOnce(StoreCreator) -> C` where
/// `C: FnOnce(Vec<ModuleInstance>) -> S`, so an enhancer is written as a
/// closure returning a closure. Its output can be any type, typically a
/// struct holding the [`Store`] plus extra fields.
pub trait Enhancer {
    type Output;

    fn enhance(self, creator: StoreCreator, instances: Vec<ModuleInstance>) -> Self::Output;
}

impl<E, C, S> Enhancer for E
where
    E: FnOnce(StoreCreator) -> C,
    C: FnOnce(Vec<ModuleInstance>) -> S,
{
    type Output = S;

    fn enhance(self, creator: StoreCreator, instances: Vec<ModuleInstance>) -> S {
        (self)(creator)(instances)
    }
}

/// Create a store and register `instances` in order.
pub fn create_store(instances: Vec<ModuleInstance>) -> Store {
    Store::new(instances)
}

/// Build the store through `enhancer`, returning whatever it produces.
pub fn create_store_with<E: Enhancer>(instances: Vec<ModuleInstance>, enhancer: E) -> E::Output {
    tracing::debug!(modules = instances.len(), "Creating store through enhancer");
    enhancer.enhance(create_store, instances)
}
