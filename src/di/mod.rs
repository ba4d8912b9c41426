//! Dependency injection infrastructure for the updater
//!
//! Configuration and the HTTP session are reached through traits so the
//! update pipeline can run against in-memory doubles in tests.
//!
//! # Example (Production)
//! ```no_run
//! use updater::di::ServiceContainer;
//!
//! # fn example() -> updater::core::UpdaterResult<()> {
//! let container = ServiceContainer::load()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use updater::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let config = Arc::new(MockConfigProvider::default());
//! let transport = Arc::new(MockTransport::new("https://origin.test/"));
//!
//! let container = ServiceContainer::with_providers(config, transport);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

pub use container::ServiceContainer;
pub use traits::{ConfigProvider, Transport};
