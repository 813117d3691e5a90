//! Shell completion scripts

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{Shell, generate};

use crate::cli::Cli;

/// Write the completion script for `shell`
pub fn write_to<W: Write>(shell: Shell, out: &mut W) {
    let mut command = Cli::command();
    let name = command.get_name().to_string();
    generate(shell, &mut command, name, out);
}

/// Print the completion script to stdout
pub fn run(shell: Shell) {
    write_to(shell, &mut std::io::stdout());
}
