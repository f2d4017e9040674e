//=========================================================================
// Hotswap Platformer
//
// Opens the game window. Pass a TOML tuning file as the first argument
// to have it re-read on every hot reload (F5 or R).
//
//   RUST_LOG=reload=debug hotswap_platformer tuning.toml
//
//=========================================================================

use std::process::ExitCode;

use hotswap_platformer::logging::{init_logging, LoggingConfig};
use hotswap_platformer::RuntimeBuilder;

fn main() -> ExitCode {
    init_logging(LoggingConfig::default());

    let mut builder = RuntimeBuilder::new();
    if let Some(path) = std::env::args_os().nth(1) {
        builder = builder.with_tuning_file(path);
    }

    match builder.build().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
