use csv::{QuoteStyle, Terminator, WriterBuilder};
use graphview_core::Node;
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Serialize `nodes` as CSV, projecting `columns` out of their attributes.
///
/// The header is `ID` followed by the column names. Every data field is
/// quoted. Rows are separated by `\n` with no trailing terminator.
pub fn export_csv<'a, I>(nodes: I, columns: &[String]) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Node>,
{
    let mut buffer = Vec::new();

    {
        let mut header = WriterBuilder::new()
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buffer);
        header.write_record(std::iter::once("ID").chain(columns.iter().map(String::as_str)))?;
        header.flush()?;
    }

    let mut rows = 0usize;
    {
        let mut writer = WriterBuilder::new()
            .quote_style(QuoteStyle::Always)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(&mut buffer);
        for node in nodes {
            let mut record = Vec::with_capacity(columns.len() + 1);
            record.push(node.id.as_str().to_string());
            for column in columns {
                record.push(cell(node.attributes.get(column)));
            }
            writer.write_record(&record)?;
            rows += 1;
        }
        writer.flush()?;
    }

    let mut text = String::from_utf8(buffer)?;
    if text.ends_with('\n') {
        text.pop();
    }
    tracing::debug!("Exported {} rows x {} columns", rows, columns.len() + 1);
    Ok(text)
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
