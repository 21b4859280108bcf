// ytsize-host/src/lib.rs
//
// Library portion of the ytsize native messaging host.
// Contains argument definitions, protocol framing and command logic.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod messaging;

// Re-export items needed by the binary or integration tests
pub use cli::Cli;
pub use commands::probe::run_probe;
pub use commands::serve::{handle_request, run_native_host, serve};
pub use messaging::{HostResponse, SizeRequest, read_message, write_message};
