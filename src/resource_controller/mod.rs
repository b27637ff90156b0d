//! Resource controller
//!
//! Account-level resource management: resource groups and the service
//! instances, keys and bindings provisioned into them.

mod bindings;
mod groups;
mod instances;
mod keys;

pub use bindings::{CreateResourceBinding, ResourceBindings};
pub use groups::{resource_group_ref, CreateResourceGroup, ResourceGroups};
pub use instances::{CreateResourceInstance, ResourceInstances};
pub use keys::{role_crn, CreateResourceKey, ResourceKeys};
