//! to-json command implementation

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;
use yjconv::{ConvertOptions, FloatPrecision};

/// Arguments for the to-json command
#[derive(Debug)]
pub struct ToJsonArgs {
    /// Input file; stdin when `None` or `-`
    pub input: Option<PathBuf>,
    pub pretty: bool,
    pub double_precision: bool,
}

/// Execute the to-json command
pub fn execute(args: ToJsonArgs) -> Result<()> {
    let yaml = super::read_input(args.input.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_json(&yaml, &args, &mut out)?;
    out.flush().context("Failed to write output")
}

fn write_json(yaml: &[u8], args: &ToJsonArgs, out: &mut impl Write) -> Result<()> {
    let precision = if args.double_precision {
        FloatPrecision::Double
    } else {
        FloatPrecision::Single
    };
    let options = ConvertOptions::default().with_float_precision(precision);
    debug!(?options, pretty = args.pretty, "converting YAML to JSON");

    if args.pretty {
        let value = yjconv::yaml_to_value(yaml, &options)?;
        serde_json::to_writer_pretty(&mut *out, &value).context("Failed to write JSON")?;
    } else {
        let json = yjconv::yaml_to_json_with(yaml, &options)?;
        out.write_all(&json).context("Failed to write JSON")?;
    }
    writeln!(out).context("Failed to write output")?;
    Ok(())
}
