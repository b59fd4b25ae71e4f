//! Clap commands handled by the CLI.

mod call;
pub use call::CallCmd;

mod config;
pub use config::ConfigCmd;

mod kv;
pub use kv::KvCmd;

mod list;
pub use list::ListCmd;

mod verify;
pub use verify::VerifyCmd;
