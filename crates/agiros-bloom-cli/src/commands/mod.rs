//! CLI command implementations

pub mod context;
pub mod generate;
pub mod init;
pub mod prompt;
pub mod resolve;
pub mod validate;

pub use generate::{BackendArg, GenerateCommand, OutputFormat};
pub use init::InitCommand;
pub use resolve::ResolveCommand;
pub use validate::ValidateCommand;
