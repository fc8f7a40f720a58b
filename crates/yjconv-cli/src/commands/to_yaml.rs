//! to-yaml command implementation

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;
use yjconv::FormatOptions;

/// Arguments for the to-yaml command
#[derive(Debug)]
pub struct ToYamlArgs {
    /// Input file; stdin when `None` or `-`
    pub input: Option<PathBuf>,
    pub indent: usize,
}

/// Execute the to-yaml command
pub fn execute(args: ToYamlArgs) -> Result<()> {
    let json = super::read_input(args.input.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_yaml(&json, &args, &mut out)?;
    out.flush().context("Failed to write output")
}

fn write_yaml(json: &[u8], args: &ToYamlArgs, out: &mut impl Write) -> Result<()> {
    let options = FormatOptions::default().with_indent(args.indent);
    debug!(indent = options.indent, "converting JSON to YAML");

    let yaml = yjconv::json_to_yaml_with(json, &options)?;
    out.write_all(&yaml).context("Failed to write YAML")?;
    Ok(())
}
