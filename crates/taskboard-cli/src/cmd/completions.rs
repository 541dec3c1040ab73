//! `tb completions`: print a shell completion script.

use anyhow::Result;
use clap::Args;
use clap_complete::{Shell, generate};
use std::io::Write;

/// Arguments for `tb completions`.
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Target shell for completion script generation.
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Write the completion script for `command` to `out`.
pub fn write_completions(shell: Shell, command: &mut clap::Command, out: &mut dyn Write) {
    let bin_name = command.get_name().to_string();
    generate(shell, command, bin_name, out);
}

/// Generate shell completion script to stdout.
///
/// # Errors
///
/// Returns an error if flushing stdout fails.
pub fn run_completions(shell: Shell, command: &mut clap::Command) -> Result<()> {
    let mut out = std::io::stdout().lock();
    write_completions(shell, command, &mut out);
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bash_script_mentions_subcommands() {
        let mut command = clap::Command::new("tb")
            .subcommand(clap::Command::new("show"))
            .subcommand(clap::Command::new("toggle"));
        let mut out = Vec::new();
        write_completions(Shell::Bash, &mut command, &mut out);
        let script = String::from_utf8(out).expect("utf8");
        assert!(script.contains("show"));
        assert!(script.contains("toggle"));
    }
}
