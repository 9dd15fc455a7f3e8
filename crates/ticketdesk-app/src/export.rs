// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow};
use csv::{QuoteStyle, Terminator, WriterBuilder};
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::{Page, Table, TableId};

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvDownload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: String,
}

pub fn export_file_name(date: Date) -> Result<String> {
    let stamp = date
        .format(format_description!("[year]-[month]-[day]"))
        .context("format export date")?;
    Ok(format!("tickets_export_{stamp}.csv"))
}

/// Visible rows of `table` as CSV. Header cells are trimmed and written
/// as-is. Data cells are trimmed, have commas swapped for semicolons, and are
/// wrapped in quotes with no escaping of embedded quotes. Lines are joined
/// with `\n` and the last one has no terminator.
pub fn render_csv(table: &Table) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .flexible(true)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());
    writer
        .write_record(table.headers.iter().map(|cell| cell.trim()))
        .context("write csv header")?;
    for row in table.visible_rows() {
        writer
            .write_record(
                row.cells
                    .iter()
                    .map(|cell| format!("\"{}\"", cell.trim().replace(',', ";"))),
            )
            .context("write csv row")?;
    }

    let mut buffer = writer
        .into_inner()
        .map_err(|error| anyhow!("flush csv output: {}", error.error()))?;
    if buffer.last() == Some(&b'\n') {
        buffer.pop();
    }
    String::from_utf8(buffer).context("csv output is not UTF-8")
}

/// `None` when the table is not on the page.
pub fn export_table(page: &Page, table: &TableId, now: OffsetDateTime) -> Result<Option<CsvDownload>> {
    let Some(table) = page.table(table) else {
        return Ok(None);
    };
    let date = now.to_offset(UtcOffset::UTC).date();
    Ok(Some(CsvDownload {
        file_name: export_file_name(date)?,
        mime_type: CSV_MIME_TYPE,
        content: render_csv(table)?,
    }))
}
