//! Helpers shared by the other crates in this workspace.

pub mod logger;
mod utils;

pub use crate::utils::{plain_list_names, prettyprint_usize};
