//! Settings file (`config`) and command line (`clap`) for the `careermatch` binary.

mod cli;
pub use clap::Parser;
pub use cli::*;

mod settings;
pub use settings::*;
