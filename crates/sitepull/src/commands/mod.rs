//! CLI command implementations.

pub(crate) mod convert;
mod site;
pub(crate) mod sync;

pub(crate) use convert::ConvertArgs;
pub(crate) use sync::SyncArgs;
