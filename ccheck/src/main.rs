use std::process::ExitCode;

use ccheck_driver::{Argument, Parser};

fn main() -> ExitCode {
    let argument = Argument::parse();
    ccheck_driver::run(&argument)
}
