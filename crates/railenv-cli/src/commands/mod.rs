//! CLI command implementations

pub mod delete;
pub mod list;
pub mod provision;

// Export command functions with clear names
pub use delete::execute as execute_delete;
pub use list::execute as execute_list;
pub use provision::execute as execute_provision;
