//! `echo` host module binary.
//!
//! Usage: `echo <args.json>` or `echo < args.json`

use modai::host::{self, ArgSource};
use modai::modules::echo;
use std::process::ExitCode;

fn main() -> ExitCode {
    host::init_tracing();

    let source = ArgSource::from_args(std::env::args_os());
    echo::run(&echo::module(), source).emit()
}
