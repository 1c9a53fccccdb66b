//! Bundled modules for the recognized `data` namespaces.
//!
//! Each module diffs one namespace of the old and new descriptor and issues
//! only the host calls needed to go from one to the other.

mod attributes;
mod class;
mod eventlisteners;
mod props;
mod style;

pub use attributes::AttributesModule;
pub use class::ClassModule;
pub use eventlisteners::EventListenersModule;
pub use props::PropsModule;
pub use style::StyleModule;

use crate::module::Module;

/// Every bundled module, in the order class, props, attributes, style,
/// event listeners.
pub fn all() -> Vec<Box<dyn Module>> {
    vec![
        Box::new(ClassModule),
        Box::new(PropsModule),
        Box::new(AttributesModule),
        Box::new(StyleModule::new()),
        Box::new(EventListenersModule::new()),
    ]
}
