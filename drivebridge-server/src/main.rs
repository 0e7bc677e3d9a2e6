//! The drivebridge server binary.
//!
//! All functionality lives in the `drivebridge-server` library crate; this
//! only dispatches into the CLI.

use anyhow::Result;

fn main() -> Result<()> {
    drivebridge_server::cli::execute()
}
