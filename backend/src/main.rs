use std::process::ExitCode;

fn main() -> ExitCode {
  songbook_lib::run()
}
