//! Report serialization.

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::report::Report;

/// Pretty JSON with a single-space indent and a trailing newline.
pub fn render_report(report: &Report) -> io::Result<String> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b" "));
    report.serialize(&mut ser)?;
    buf.push(b'\n');
    String::from_utf8(buf).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

pub fn write_report(report: &Report, path: &Path) -> io::Result<()> {
    let rendered = render_report(report)?;
    fs::write(path, rendered)
}
