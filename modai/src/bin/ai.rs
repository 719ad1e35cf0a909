//! `ai` host module binary.
//!
//! Usage: `ai <args.json>` or `ai < args.json`

use modai::host::{self, ArgSource};
use modai::modules::ai;
use modai::provider::ProviderOptions;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    host::init_tracing();

    let source = ArgSource::from_args(std::env::args_os());
    ai::run(&ai::module(), source, &ProviderOptions::default())
        .await
        .emit()
}
