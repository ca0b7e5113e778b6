// cutlist-cli/src/lib.rs
//
// Library portion of the Cutlist CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, FixArgs, GenerateArgs, ProjectArgs, ScanArgs};
pub use commands::fix::run_fix;
pub use commands::generate::run_generate;
pub use commands::scan::run_scan;
pub use error::{CliErrorContext, CliResult};
