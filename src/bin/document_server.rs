//! Document server: `GET /`, `GET /time`, `GET|POST /data`, `POST /echo`

use std::process::ExitCode;

fn main() -> ExitCode {
    example_servers::run(example_servers::App::Documents)
}
