pub mod config;
pub mod error;
pub mod identity;
pub mod import;
pub mod io;
pub mod kanban;
pub mod marker;
pub mod openspec;
pub mod paths;
pub mod plan;
pub mod reconcile;
pub mod scaffold;
pub mod tags;
pub mod tasks_md;

pub use error::{Result, VkflowError};
