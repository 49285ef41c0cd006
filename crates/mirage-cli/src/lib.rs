//! Terminal frontend for the Mirage chat simulation.
//!
//! A thin shell over [`mirage_app::Runtime`] that provides real-world I/O:
//! system time and OS randomness, a JSON credential file, and a line-oriented
//! console presenter. All simulation logic lives in the generic runtime.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod env;
pub mod input;
pub mod presenter;
pub mod store;

pub use env::SystemEnv;
pub use input::{Input, ParseError};
pub use presenter::ConsolePresenter;
pub use store::FileStore;
