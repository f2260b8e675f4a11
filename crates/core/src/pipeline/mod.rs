//! Build pipeline logic for Charon Sans.

mod clean;
mod generate;
mod postprocess;
mod verify;

pub use clean::clean;
pub use generate::generate;
pub use postprocess::postprocess;
pub use verify::verify;

use std::{
    path::PathBuf,
    time::Instant,
};

use anyhow::Result;
use charon_font_fixer::FixOptions;

use crate::{io::glob_fonts, plan::BuildPlan};

pub struct PipelineContext {
    /// Upstream checkout holding `package.json` and the build plans file.
    pub source_dir: PathBuf,
    /// Root for `raw/`, `fonts/`, and `reports/`.
    pub output_dir: PathBuf,
    pub plan: BuildPlan,
    /// Only ship Regular/Bold/Italic/Bold Italic.
    pub ribbi_only: bool,
    pub skip_npm_install: bool,
    /// External QA command run over the output directory, when configured.
    pub linter: Option<String>,
}

impl PipelineContext {
    pub fn new(source_dir: PathBuf, output_dir: PathBuf, plan: BuildPlan) -> Self {
        Self {
            source_dir,
            output_dir,
            plan,
            ribbi_only: false,
            skip_npm_install: false,
            linter: None,
        }
    }

    /// Where the generator's TTFs land for this plan.
    pub fn dist_dir(&self) -> PathBuf {
        self.source_dir.join("dist").join(&self.plan.name).join("TTF")
    }

    /// Staging dir for raw fonts awaiting post-processing.
    pub fn raw_dir(&self) -> PathBuf {
        self.output_dir.join("raw").join(&self.plan.name)
    }

    /// Final output dir for this plan's family.
    pub fn fonts_dir(&self) -> PathBuf {
        self.output_dir.join("fonts").join(self.plan.slug())
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join("reports").join(format!("{}.md", self.plan.slug()))
    }

    pub fn raw_fonts(&self) -> Result<Vec<PathBuf>> {
        glob_fonts(&self.raw_dir(), "*.ttf")
    }

    pub fn output_fonts(&self) -> Result<Vec<PathBuf>> {
        glob_fonts(&self.fonts_dir(), "*.ttf")
    }

    pub fn fix_options(&self) -> FixOptions {
        FixOptions { family_name: self.plan.family.clone(), ..FixOptions::default() }
    }
}

pub type PipelineStep = (&'static str, fn(&PipelineContext) -> Result<()>);

pub const BUILD_STEPS: &[PipelineStep] =
    &[("generate", generate), ("postprocess", postprocess), ("verify", verify)];

pub fn run_step(
    name: &str,
    step_num: usize,
    total: usize,
    ctx: &PipelineContext,
    f: impl Fn(&PipelineContext) -> Result<()>,
) -> Result<()> {
    println!("\n[{step_num}/{total}] {name}");
    let start = Instant::now();
    f(ctx)?;
    println!("  ✓ {name} ({:.2}s)", start.elapsed().as_secs_f64());
    Ok(())
}

pub fn run_steps(steps: &[PipelineStep], ctx: &PipelineContext) -> Result<()> {
    let total = steps.len();
    for (i, (name, step_fn)) in steps.iter().enumerate() {
        run_step(name, i + 1, total, ctx, step_fn)?;
    }
    Ok(())
}

/// Run the full pipeline for one plan: generate, post-process, verify.
pub fn build_plan(ctx: &PipelineContext) -> Result<()> {
    let start = Instant::now();

    println!("═══════════════════════════════════════════════════════════════════════════════");
    println!("Charon Sans Build Pipeline: {}", ctx.plan.family);
    println!("═══════════════════════════════════════════════════════════════════════════════");

    run_steps(BUILD_STEPS, ctx)?;

    println!("\n═══════════════════════════════════════════════════════════════════════════════");
    println!("✨ Build complete in {:.2}s", start.elapsed().as_secs_f64());
    println!("   Output: {}", ctx.fonts_dir().display());
    Ok(())
}
