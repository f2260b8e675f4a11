//! Verification step: re-check shipped fonts and write a compliance report.

use std::{fs::create_dir_all, fs::write, process::Command};

use anyhow::{Context, Result, bail};
use charon_font_fixer::validate;

use super::PipelineContext;
use crate::io::FontFile;

/// Validate every output font and write a per-family Markdown report.
///
/// Compliance findings are reported, not fatal. A font that no longer
/// parses is fatal.
pub fn verify(ctx: &PipelineContext) -> Result<()> {
    let fonts = ctx.output_fonts()?;
    if fonts.is_empty() {
        bail!("no output fonts to verify for plan '{}'", ctx.plan.name);
    }

    let mut report = String::new();
    report.push_str(&format!("# Compliance report: {}\n\n", ctx.plan.family));
    report.push_str(&format!(
        "Generated: {}\n\n",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    ));
    report.push_str("| Font | Status | Findings |\n|------|--------|----------|\n");

    let mut total_findings = 0;
    for path in &fonts {
        let data = FontFile::new(path).read()?;
        let findings = validate(&data)
            .with_context(|| format!("output font is corrupt: {}", path.display()))?;

        let file_name = path.file_name().and_then(|s| s.to_str()).unwrap_or("?");
        if findings.is_empty() {
            report.push_str(&format!("| {file_name} | clean | |\n"));
        } else {
            total_findings += findings.len();
            let summary: Vec<String> =
                findings.iter().map(|f| format!("{}: {}", f.check, f.message)).collect();
            report.push_str(&format!("| {file_name} | findings | {} |\n", summary.join("; ")));
            for finding in &findings {
                log::warn!("{file_name}: {}: {}", finding.check, finding.message);
            }
        }
    }

    report.push_str(&format!(
        "\n{} fonts checked, {total_findings} findings\n",
        fonts.len()
    ));

    let report_path = ctx.report_path();
    if let Some(parent) = report_path.parent() {
        create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    write(&report_path, &report)
        .with_context(|| format!("Failed to write report: {}", report_path.display()))?;
    println!("  report: {}", report_path.display());

    if let Some(linter) = &ctx.linter {
        run_linter(ctx, linter)?;
    }

    Ok(())
}

/// Split a configured command line into program and leading arguments.
fn split_command(command: &str) -> Option<(&str, Vec<&str>)> {
    let mut parts = command.split_whitespace();
    let program = parts.next()?;
    Some((program, parts.collect()))
}

/// Run the configured external QA command over the output directory.
fn run_linter(ctx: &PipelineContext, linter: &str) -> Result<()> {
    let Some((program, args)) = split_command(linter) else {
        return Ok(());
    };
    let fonts_dir = ctx.fonts_dir();
    log::info!("running linter: {linter} {}", fonts_dir.display());
    let status = Command::new(program)
        .args(args)
        .arg(&fonts_dir)
        .status()
        .with_context(|| format!("Failed to run linter '{linter}'"))?;
    if !status.success() {
        log::warn!("linter '{linter}' reported issues ({status})");
    }
    Ok(())
}
