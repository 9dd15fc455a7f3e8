// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use ticketdesk_app::{FieldId, Page, PageEffect, PageHost, TableId};
use time::OffsetDateTime;

/// Host backed by the local clock and a y/n prompt on the terminal.
pub struct TerminalHost<R, W> {
    assume_yes: bool,
    input: R,
    prompt: W,
}

impl<R: BufRead, W: Write> TerminalHost<R, W> {
    pub fn new(input: R, prompt: W, assume_yes: bool) -> Self {
        Self {
            assume_yes,
            input,
            prompt,
        }
    }

    fn ask(&mut self, message: &str) -> Result<bool> {
        write!(self.prompt, "{message} [s/N] ")?;
        if self.assume_yes {
            writeln!(self.prompt, "s")?;
            return Ok(true);
        }
        self.prompt.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            writeln!(self.prompt)?;
            return Ok(false);
        }
        Ok(is_affirmative(&answer))
    }
}

impl<R: BufRead, W: Write> PageHost for TerminalHost<R, W> {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    fn confirm(&mut self, message: &str) -> bool {
        match self.ask(message) {
            Ok(answer) => answer,
            Err(error) => {
                tracing::warn!(error = %format!("{error:#}"), "confirmation prompt failed; declining");
                false
            }
        }
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(
        answer.trim().to_lowercase().as_str(),
        "s" | "si" | "sí" | "y" | "yes"
    )
}

pub fn load_snapshot(path: &Path) -> Result<Page> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read page snapshot {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("parse page snapshot {}", path.display()))
}

pub fn save_snapshot(page: &Page, path: &Path) -> Result<()> {
    let raw = serde_json::to_string_pretty(page).context("encode page snapshot")?;
    fs::write(path, raw).with_context(|| format!("write page snapshot {}", path.display()))
}

/// Carries page effects out to the terminal and filesystem.
pub struct EffectSink<W> {
    export_dir: PathBuf,
    out: W,
}

impl<W: Write> EffectSink<W> {
    pub fn new(export_dir: PathBuf, out: W) -> Self {
        Self { export_dir, out }
    }

    pub fn apply(&mut self, effect: &PageEffect) -> Result<()> {
        match effect {
            PageEffect::RowsFiltered {
                table,
                visible,
                total,
            } => {
                tracing::debug!(%table, visible, total, "rows filtered");
            }
            PageEffect::CounterUpdated { table, text } => {
                tracing::debug!(%table, text, "counter updated");
            }
            PageEffect::Download(download) => {
                fs::create_dir_all(&self.export_dir).with_context(|| {
                    format!("create export directory {}", self.export_dir.display())
                })?;
                let path = self.export_dir.join(&download.file_name);
                fs::write(&path, &download.content)
                    .with_context(|| format!("write export {}", path.display()))?;
                writeln!(self.out, "saved {} ({})", path.display(), download.mime_type)?;
            }
            PageEffect::Navigate(url) => writeln!(self.out, "navigate {url}")?,
            PageEffect::FollowLink(href) => writeln!(self.out, "follow {href}")?,
            PageEffect::Alert(message) => writeln!(self.out, "alert: {message}")?,
            PageEffect::Focused(field) => {
                let field = match field {
                    FieldId::Description => "description",
                    FieldId::Category => "category",
                };
                writeln!(self.out, "focus {field}")?;
            }
            PageEffect::SubmissionBlocked => writeln!(self.out, "submission blocked")?,
            PageEffect::SubmissionAccepted => writeln!(self.out, "submission accepted")?,
            PageEffect::DescriptionResized { rows } => {
                writeln!(self.out, "description rows {rows}")?;
            }
            PageEffect::ButtonLoading(button) => writeln!(self.out, "button {button} loading")?,
            PageEffect::ActionCancelled(button) => {
                writeln!(self.out, "button {button} cancelled")?;
            }
            PageEffect::ClickIgnored(button) => writeln!(self.out, "button {button} ignored")?,
            PageEffect::MyTicketsFiltered { visible } => {
                writeln!(self.out, "my tickets visible {visible}")?;
            }
        }
        Ok(())
    }

    pub fn summary(&mut self, page: &Page, tables: &[TableId]) -> Result<()> {
        for id in tables {
            let Some(table) = page.table(id) else {
                continue;
            };
            writeln!(
                self.out,
                "{id}: {}/{} visible",
                table.visible_count(),
                table.rows.len()
            )?;
        }
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::{EffectSink, TerminalHost, is_affirmative, load_snapshot, save_snapshot};
    use anyhow::Result;
    use std::io::Cursor;
    use ticketdesk_app::export::CSV_MIME_TYPE;
    use ticketdesk_app::{CsvDownload, FieldId, Page, PageEffect, PageHost, TableId};
    use url::Url;

    fn sink(dir: &std::path::Path) -> EffectSink<Vec<u8>> {
        EffectSink::new(dir.join("exports"), Vec::new())
    }

    #[test]
    fn confirm_reads_an_answer_per_prompt() {
        let mut host = TerminalHost::new(Cursor::new("sí\nn\n"), Vec::new(), false);
        assert!(host.confirm("¿Eliminar?"));
        assert!(!host.confirm("¿Eliminar?"));
        assert!(!host.confirm("¿Eliminar?"));
        let prompt = String::from_utf8_lossy(&host.prompt).into_owned();
        assert_eq!(prompt.matches("[s/N]").count(), 3);
    }

    #[test]
    fn assume_yes_skips_reading() {
        let mut host = TerminalHost::new(Cursor::new(""), Vec::new(), true);
        assert!(host.confirm("¿Eliminar?"));
    }

    #[test]
    fn affirmative_answers() {
        for answer in ["s", "Si", " SÍ ", "y", "yes\n"] {
            assert!(is_affirmative(answer), "{answer:?}");
        }
        for answer in ["", "n", "no", "maybe"] {
            assert!(!is_affirmative(answer), "{answer:?}");
        }
    }

    #[test]
    fn download_is_written_into_export_dir() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut sink = sink(temp.path());
        sink.apply(&PageEffect::Download(CsvDownload {
            file_name: "tickets_export_2026-10-18.csv".to_owned(),
            mime_type: CSV_MIME_TYPE,
            content: "ID\n\"1\"\n".to_owned(),
        }))?;

        let path = temp.path().join("exports/tickets_export_2026-10-18.csv");
        assert_eq!(std::fs::read_to_string(&path)?, "ID\n\"1\"\n");
        let out = String::from_utf8(sink.into_inner())?;
        assert!(out.starts_with("saved "));
        assert!(out.contains("text/csv;charset=utf-8"));
        Ok(())
    }

    #[test]
    fn effects_render_one_line_each() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut sink = sink(temp.path());
        let effects = [
            PageEffect::Navigate(Url::parse("https://desk.example/?page=2&search=printer")?),
            PageEffect::Alert("Por favor, seleccione una categoría.".to_owned()),
            PageEffect::Focused(FieldId::Category),
            PageEffect::ButtonLoading("create-ticket".into()),
            PageEffect::CounterUpdated {
                table: "open-tickets".into(),
                text: "2".to_owned(),
            },
        ];
        for effect in &effects {
            sink.apply(effect)?;
        }
        let out = String::from_utf8(sink.into_inner())?;
        assert_eq!(
            out,
            "navigate https://desk.example/?page=2&search=printer\n\
             alert: Por favor, seleccione una categoría.\n\
             focus category\n\
             button create-ticket loading\n"
        );
        Ok(())
    }

    #[test]
    fn summary_lists_present_tables_only() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let mut page = Page::new(Url::parse("https://desk.example/")?);
        page.tables.push(ticketdesk_app::Table {
            id: "open-tickets".into(),
            headers: Vec::new(),
            rows: vec![ticketdesk_app::Row::new(["#1"])],
        });
        let mut sink = sink(temp.path());
        sink.summary(
            &page,
            &[TableId::new("open-tickets"), TableId::new("closed-tickets")],
        )?;
        assert_eq!(String::from_utf8(sink.into_inner())?, "open-tickets: 1/1 visible\n");
        Ok(())
    }

    #[test]
    fn snapshot_file_errors_name_the_path() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("page.json");
        let error = load_snapshot(&path).expect_err("missing snapshot should fail");
        assert!(error.to_string().contains("page.json"));

        std::fs::write(&path, "{ not json")?;
        let error = load_snapshot(&path).expect_err("malformed snapshot should fail");
        assert!(error.to_string().contains("parse page snapshot"));

        let page = Page::new(Url::parse("https://desk.example/admin")?);
        save_snapshot(&page, &path)?;
        assert_eq!(load_snapshot(&path)?, page);
        Ok(())
    }
}
