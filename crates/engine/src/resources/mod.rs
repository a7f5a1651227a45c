//! Built-in resource declarations.

mod bgp_template;
pub mod common;

pub use bgp_template::bgp_template;

use crate::schema::ResourceSchema;

/// Every resource type shipped with the engine.
pub fn builtin() -> Vec<ResourceSchema> {
    vec![bgp_template()]
}
