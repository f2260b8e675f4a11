//! Clean step: remove staged and shipped fonts for a plan.

use std::fs::remove_dir_all;

use anyhow::{Context, Result};

use super::PipelineContext;

pub fn clean(ctx: &PipelineContext) -> Result<()> {
    for dir in [ctx.raw_dir(), ctx.fonts_dir()] {
        if dir.exists() {
            remove_dir_all(&dir)
                .with_context(|| format!("Failed to remove {}", dir.display()))?;
            println!("  removed {}", dir.display());
        }
    }
    let report = ctx.report_path();
    if report.exists() {
        std::fs::remove_file(&report)
            .with_context(|| format!("Failed to remove {}", report.display()))?;
        println!("  removed {}", report.display());
    }
    Ok(())
}
