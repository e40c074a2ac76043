//! Compute server: `GET /`, `GET /info`, `GET /math/divide`

use std::process::ExitCode;

fn main() -> ExitCode {
    example_servers::run(example_servers::App::Compute)
}
