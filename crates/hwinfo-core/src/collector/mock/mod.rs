//! In-memory fakes for [`FileSystem`](super::FileSystem) and
//! [`CommandRunner`](super::CommandRunner), plus canned machine scenarios.

mod filesystem;
mod runner;
mod scenarios;

pub use filesystem::MockFs;
pub use runner::MockRunner;
