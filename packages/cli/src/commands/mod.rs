pub mod apply;
pub mod init;
pub mod inspect;
pub mod migrate;
pub mod new;

pub use apply::{apply, ApplyArgs};
pub use init::{init, InitArgs};
pub use inspect::{inspect, InspectArgs};
pub use migrate::{migrate, MigrateArgs};
pub use new::{create, NewArgs};

use std::path::{Path, PathBuf};

/// Resolve a command-line path against the working directory
pub(crate) fn resolve(cwd: &str, file: &Path) -> PathBuf {
    PathBuf::from(cwd).join(file)
}
