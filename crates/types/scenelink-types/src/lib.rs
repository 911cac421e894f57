//! scenelink-types: typed views over the host application's object model.
//!
//! Every type here is generated at build time from `schema/*.json`. A view
//! is a bridge handle plus an accessor path; reads, writes and calls are
//! forwarded one request at a time and nothing is cached.
//!
//! ```ignore
//! let bevel: BevelModifier = bind(&bridge, AccessorPath::parse("obj.modifiers[0]")?);
//! bevel.set_width(2.5)?;
//! ```

#[allow(
    unused_imports,
    clippy::new_ret_no_self,
    clippy::should_implement_trait,
    clippy::too_many_arguments
)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
}

pub use generated::*;
pub use scenelink_bridge_core::{
    bind, AccessorPath, Bridge, BridgeError, CallOptions, Collection, EnumSet, RemoteEnum,
    RemoteStruct, SharedBridge, SpecializedCollection,
};
