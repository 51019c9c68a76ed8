use std::env;
use std::process;

use rtl_compiler::run;

fn main() {
    let args = env::args().collect();

    if let Err(err) = run(args) {
        eprintln!("{}", err);
        process::exit(1);
    }
}
