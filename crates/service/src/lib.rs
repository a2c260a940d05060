//! Service layer providing the forms operations on top of models.
//! - Separates business logic from data access (`forms::repository`).
//! - Reuses validation and entity definitions in `models` crate.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod pagination;
pub mod db;
pub mod forms;
#[cfg(test)]
pub mod test_support;
