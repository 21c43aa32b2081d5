//! Service abstraction, star models, and the fetch pipeline.

pub mod credentials;
pub mod http;
pub mod logging;
pub mod models;
pub mod pagination;
pub mod pipeline;
pub mod prompt;
pub mod registry;
pub mod service;

pub use credentials::{KeyringTokenStore, TokenStore, resolve_token};
pub use models::{Star, StarBuilder, StarResult};
pub use pagination::{Page, PageCursor};
pub use pipeline::{FetchSummary, STREAM_CAPACITY, fetch_stars};
pub use prompt::{Prompter, Question, TerminalPrompter};
pub use registry::Registries;
pub use service::{Service, ServiceRegistry};
