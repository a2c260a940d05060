//! Forms access layer: filters, storage contract and the operations behind the HTTP handlers.

pub mod filter;
pub mod memory;
pub mod repository;
pub mod service;

pub use filter::FormFilter;
pub use memory::InMemoryFormRepository;
pub use repository::{FormRepository, SeaOrmFormRepository};
pub use service::FormService;
