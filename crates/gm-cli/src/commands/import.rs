//! Import command for enrolling a batch of extracted disciplines.
//!
//! Reads one JSON draft per line (`{"name", "code", "scheduleCode",
//! "location", "workloadHours"}`). Each draft is validated on its own; the
//! valid ones are then checked in input order against the student's active
//! disciplines and everything imported before them, so two clashing drafts in
//! the same batch cannot both get in. A bad draft never aborts the batch.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use clap::Args;

use gm_core::{BatchReport, DisciplineDraft, plan_validated, validate_batch};
use gm_db::DisciplineRecord;

use super::util::{student_id, summarize};
use crate::Config;

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Student the disciplines belong to.
    #[arg(long)]
    pub student: String,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    args: &ImportArgs,
    config: &Config,
) -> Result<BatchReport<DisciplineRecord>> {
    let student = student_id(&args.student)?;
    let parsed = parse_drafts(reader)?;
    let mut report = BatchReport::new(parsed.extracted);
    let mut errors = parsed.errors;

    let mut db = config.open_database()?;
    let mut existing = db.active_disciplines_except(&student, None)?;

    let validated = validate_batch(&parsed.drafts);
    for ((line, draft), result) in parsed.lines.into_iter().zip(&parsed.drafts).zip(validated) {
        let label = error_label(line, draft);
        let plan = match result
            .and_then(|valid| plan_validated(draft, valid, &existing, config.conflict_policy))
        {
            Ok(plan) => plan,
            Err(err) => {
                tracing::debug!(line, error = %err, "draft rejected");
                errors.push((line, format!("{label}: {err}")));
                continue;
            }
        };
        match db.insert_discipline(&student, &plan) {
            Ok(record) => {
                existing.push(record.clone());
                report.push_created(record);
            }
            Err(err) => {
                tracing::warn!(line, error = %err, "failed to store draft");
                errors.push((line, format!("{label}: {err}")));
            }
        }
    }

    errors.sort_by_key(|(line, _)| *line);
    for (_, error) in errors {
        report.push_error(error);
    }

    tracing::info!(
        extracted = report.extracted_count,
        created = report.created_count,
        errors = report.errors.len(),
        "import finished"
    );
    write_report(writer, &report, args.json)?;
    Ok(report)
}

/// Input split into drafts and per-line parse errors. Line numbers are 1-based.
#[derive(Debug, Default)]
struct ParsedDrafts {
    lines: Vec<usize>,
    drafts: Vec<DisciplineDraft>,
    errors: Vec<(usize, String)>,
    extracted: usize,
}

/// Blank lines are skipped and not counted.
fn parse_drafts<R: BufRead>(reader: R) -> Result<ParsedDrafts> {
    let mut parsed = ParsedDrafts::default();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {line_no}"))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        parsed.extracted += 1;
        match serde_json::from_str::<DisciplineDraft>(trimmed) {
            Ok(draft) => {
                parsed.lines.push(line_no);
                parsed.drafts.push(draft);
            }
            Err(err) => parsed
                .errors
                .push((line_no, format!("line {line_no}: invalid JSON: {err}"))),
        }
    }
    Ok(parsed)
}

fn error_label(line: usize, draft: &DisciplineDraft) -> String {
    let code = draft.code.trim();
    if code.is_empty() {
        format!("line {line}")
    } else {
        format!("line {line} ({code})")
    }
}

fn write_report<W: Write>(
    writer: &mut W,
    report: &BatchReport<DisciplineRecord>,
    json: bool,
) -> Result<()> {
    if json {
        writeln!(writer, "{}", serde_json::to_string_pretty(report)?)?;
        return Ok(());
    }

    writeln!(
        writer,
        "Imported {} of {} disciplines.",
        report.created_count, report.extracted_count
    )?;
    for record in &report.created {
        writeln!(writer, "  + {}", summarize(record))?;
    }
    for error in &report.errors {
        writeln!(writer, "  ! {error}")?;
    }
    Ok(())
}
