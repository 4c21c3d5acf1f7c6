use std::path::Path;
use std::process::Command;

use stencil_constants::WHITE_COMMANDS;
use stencil_error::{Result, StencilError};

/// Splits a command line on whitespace and checks the program against the
/// whitelist.
pub fn parse_command(command_line: &str) -> Result<(String, Vec<String>)> {
    let mut parts = command_line.split_whitespace();
    let program = parts
        .next()
        .ok_or_else(|| StencilError::CommandNotAllowed(command_line.to_string()))?;

    if !WHITE_COMMANDS.contains(&program) {
        return Err(StencilError::CommandNotAllowed(program.to_string()));
    }

    Ok((program.to_string(), parts.map(String::from).collect()))
}

/// Runs a whitelisted command in `cwd` with inherited stdio.
pub fn run_command(cwd: &Path, command_line: &str) -> Result<()> {
    let (program, args) = parse_command(command_line)?;

    stencil_logger::shell(command_line);

    // npm and friends are .cmd shims on windows
    let status = if cfg!(target_os = "windows") {
        Command::new("cmd")
            .arg("/C")
            .arg(&program)
            .args(&args)
            .current_dir(cwd)
            .status()?
    } else {
        Command::new(&program).args(&args).current_dir(cwd).status()?
    };

    if status.success() {
        Ok(())
    } else {
        Err(StencilError::CommandFailed(
            command_line.to_string(),
            status.code().unwrap_or(-1),
        ))
    }
}
