use std::io::{self, Write};

use serde_json::Value;
use trendlens_core::Envelope;

use crate::cli::OutputFormat;
use crate::error::CliError;

pub fn render(
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_envelope(&mut out, envelope, format, pretty)?;
    out.flush()?;
    Ok(())
}

pub fn write_envelope<W: Write>(
    out: &mut W,
    envelope: &Envelope<Value>,
    format: OutputFormat,
    pretty: bool,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(envelope)?
            } else {
                serde_json::to_string(envelope)?
            };
            writeln!(out, "{payload}")?;
        }
        OutputFormat::Table => write_table(out, envelope)?,
    }

    Ok(())
}

fn write_table<W: Write>(out: &mut W, envelope: &Envelope<Value>) -> Result<(), CliError> {
    writeln!(out, "request_id  : {}", envelope.meta.request_id)?;
    writeln!(out, "schema      : {}", envelope.meta.schema_version)?;
    writeln!(out, "generated_at: {}", envelope.meta.generated_at)?;
    writeln!(out, "latency_ms  : {}", envelope.meta.latency_ms)?;

    if !envelope.meta.warnings.is_empty() {
        writeln!(out, "warnings:")?;
        for warning in &envelope.meta.warnings {
            writeln!(out, "  - {warning}")?;
        }
    }

    writeln!(out, "data:")?;
    match envelope.data.get("rows").and_then(Value::as_array) {
        Some(rows) => write_rows(out, rows)?,
        None => {
            let pretty_data = serde_json::to_string_pretty(&envelope.data)?;
            for line in pretty_data.lines() {
                writeln!(out, "  {line}")?;
            }
        }
    }

    if !envelope.errors.is_empty() {
        writeln!(out, "errors:")?;
        for error in &envelope.errors {
            match &error.entity {
                Some(entity) => writeln!(out, "  - {entity}: {}: {}", error.code, error.message)?,
                None => writeln!(out, "  - {}: {}", error.code, error.message)?,
            }
        }
    }

    Ok(())
}

// One line per row object, columns in the order of the first row.
fn write_rows<W: Write>(out: &mut W, rows: &[Value]) -> Result<(), CliError> {
    let Some(Value::Object(first)) = rows.first() else {
        return Ok(());
    };
    let columns: Vec<&String> = first.keys().collect();
    let header: Vec<String> = columns.iter().map(|c| format!("{c:>12}")).collect();
    writeln!(out, "  {}", header.join(" "))?;

    for row in rows {
        let cells: Vec<String> = columns
            .iter()
            .map(|column| match row.get(column.as_str()) {
                Some(Value::String(text)) => format!("{text:>12}"),
                Some(Value::Null) | None => format!("{:>12}", "-"),
                Some(other) => format!("{:>12}", other.to_string()),
            })
            .collect();
        writeln!(out, "  {}", cells.join(" "))?;
    }
    Ok(())
}
