#![warn(clippy::all)]

use std::io::{self, Write as _};

use structopt::StructOpt;

use cfgen::{Opt, Result};
use cfgen_util::console::Console;

fn main() -> Result<()> {
    let opt = Opt::from_args();
    let mut cnsl = Console::term().with_quiet(opt.is_quiet());
    let stdout = io::stdout();
    let mut stdout = stdout.lock();
    opt.run(&mut cnsl, &mut stdout).map_err(|err| {
        stdout.flush().unwrap_or(());
        eprintln!();
        err
    })
}
