//! Decode NSLogger files to text files

use anyhow::{Context, Result};
use nslog::{Decoder, JsonFormat};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::OutputFormat;
use crate::config::Settings;

/// Default output path: the input path with the format's extension appended
pub fn output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let mut name = OsString::from(input.as_os_str());
    name.push(".");
    name.push(format.extension());
    PathBuf::from(name)
}

/// Decode one file and return the rendered output
pub fn decode_file(input: &Path, settings: &Settings) -> Result<String> {
    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;

    let decoder = Decoder::new(settings.options);
    let decoded = match settings.format {
        OutputFormat::Text => decoder.decode(&data, &settings.separator),
        OutputFormat::Json => decoder.decode_with(&data, &JsonFormat),
    };

    decoded.with_context(|| format!("Failed to decode {}", input.display()))
}

/// Decode one file and write the result next to it (or to `output`)
///
/// Nothing is written when decoding fails.
pub fn convert_file(input: &Path, output: Option<&Path>, settings: &Settings) -> Result<PathBuf> {
    let text = decode_file(input, settings)?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| output_path(input, settings.format));

    fs::write(&path, &text).with_context(|| format!("Failed to write {}", path.display()))?;

    tracing::info!(
        input = %input.display(),
        output = %path.display(),
        lines = text.lines().count(),
        "decoded"
    );

    Ok(path)
}
