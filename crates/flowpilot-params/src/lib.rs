//! FlowPilot Params Crate
//!
//! Typed client over the persisted key-value store shared by the dashboard
//! and its helper processes, plus the in-memory and directory backends.

pub mod client;
pub mod dir;
pub mod error;
pub mod key;
pub mod keys;
pub mod memory;
pub mod store;
pub mod value;

pub use client::Params;
pub use dir::DirStore;
pub use error::{ParamsError, ParamsResult};
pub use key::{is_valid_key, ParamKey};
pub use memory::MemoryStore;
pub use store::ParamStore;
pub use value::ParamValue;
