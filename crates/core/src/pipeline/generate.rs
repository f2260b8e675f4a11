//! Generation step: drive the upstream npm toolchain.

use std::{
    fs::{copy, create_dir_all},
    path::Path,
    process::Command,
};

use anyhow::{Context, Result, bail};

use super::PipelineContext;
use crate::io::glob_fonts;

fn run_tool(cwd: &Path, program: &str, args: &[&str]) -> Result<()> {
    log::info!("running: {program} {}", args.join(" "));
    let status = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .status()
        .with_context(|| format!("Failed to run {program} in {}", cwd.display()))?;
    if !status.success() {
        bail!("{program} {} exited with {status}", args.join(" "));
    }
    Ok(())
}

/// Build the plan's TTFs upstream and stage them into the raw dir.
pub fn generate(ctx: &PipelineContext) -> Result<()> {
    if !ctx.skip_npm_install && !ctx.source_dir.join("node_modules").is_dir() {
        run_tool(&ctx.source_dir, "npm", &["ci"])?;
    }

    let target = format!("ttf::{}", ctx.plan.name);
    run_tool(&ctx.source_dir, "npm", &["run", "build", "--", &target])?;

    let dist_dir = ctx.dist_dir();
    if !dist_dir.is_dir() {
        bail!("dist folder not found after build: {}", dist_dir.display());
    }

    let fonts = glob_fonts(&dist_dir, "*.ttf")?;
    if fonts.is_empty() {
        bail!("upstream build produced no TTFs for plan '{}'", ctx.plan.name);
    }

    let raw_dir = ctx.raw_dir();
    create_dir_all(&raw_dir)
        .with_context(|| format!("Failed to create directory: {}", raw_dir.display()))?;
    for font in &fonts {
        let file_name = font.file_name().context("font path has no file name")?;
        copy(font, raw_dir.join(file_name))
            .with_context(|| format!("Failed to stage {}", font.display()))?;
    }

    println!("  staged {} raw fonts for '{}'", fonts.len(), ctx.plan.name);
    Ok(())
}
