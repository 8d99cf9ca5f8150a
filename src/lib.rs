pub mod banners;
pub mod config;
pub mod error;
pub mod logging;
pub mod path;
pub mod session;
pub mod shell;
pub mod system;
pub mod vfs;

pub use config::SandboxConfig;
pub use error::{ShellError, SnapshotError};
pub use shell::{CommandResult, Shell};
pub use system::{Sandbox, System};
pub use vfs::{Directory, Fs, Node};
