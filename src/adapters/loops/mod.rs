//! Loops contact directory adapter.
//!
//! - `LoopsApi` - Wire-level REST contract, one method per endpoint
//! - `LoopsClient` - reqwest implementation of `LoopsApi`
//! - `InMemoryLoopsApi` - In-memory `LoopsApi` for tests and local runs
//! - `LoopsContactDirectory` - `ContactDirectory` port on top of any `LoopsApi`
//!
//! # Configuration
//!
//! Required environment variables:
//! - `MAILER__LOOPS__API_KEY`: Loops API key

mod api;
mod directory;
mod in_memory;
mod pagination;
pub mod types;

pub use api::{LoopsApi, LoopsClient, LoopsError};
pub use directory::LoopsContactDirectory;
pub use in_memory::InMemoryLoopsApi;
pub use pagination::{drain, paginate, Cursor, Page, PageRequest, DEFAULT_PAGE_SIZE};
