//! sprout-build - build orchestration for the Magnolia engine and Sprout editor

use std::process::ExitCode;

use sprout_build::cli;

fn main() -> ExitCode {
    cli::run()
}
