//! Local repository introspection.
//!
//! Native parsing of on-disk Git metadata: locating the metadata directory
//! (including worktree indirection), reading HEAD, resolving the remote
//! configured for the checked-out branch, and normalising remote URLs. No
//! subprocess is spawned and no object database is touched; everything is
//! derived from the handful of plain-text files git keeps under `.git`.

pub mod config_file;
pub mod discovery;
pub mod error;
pub mod gitdir;
pub mod head;
pub mod remote;

pub use config_file::GitConfig;
pub use discovery::{BranchOrigin, discover_branch_origin};
pub use error::{DiscoveryError, OriginError, RemoteError};
pub use gitdir::GitDir;
pub use head::HeadRef;
pub use remote::{RemoteInfo, parse_remote_url, redact_userinfo};
