//! Post-processing step: fix raw fonts and place them for distribution.

use std::{fs::create_dir_all, path::Path};

use anyhow::{Context, Result, bail};
use charon_font_fixer::{Style, fix_font};

use super::PipelineContext;
use crate::{io::FontFile, parallel::process_parallel_iter};

/// Spellings the upstream generator uses that distribution names avoid.
const STEM_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("ExtraBold", "Extrabold"),
    ("ExtraLight", "Extralight"),
    ("SemiBold", "Semibold"),
];

/// Normalize a raw filename stem for distribution.
pub fn normalize_stem(stem: &str) -> String {
    let mut stem = stem.to_string();
    for (from, to) in STEM_SUBSTITUTIONS {
        stem = stem.replace(from, to);
    }
    stem
}

fn file_stem(path: &Path) -> Result<&str> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("invalid font filename: {}", path.display()))
}

/// Fix every raw font for the plan and write it under `fonts/<slug>/`.
///
/// A font that fails to fix or validate leaves no output file; the step
/// fails after the whole batch has been attempted.
pub fn postprocess(ctx: &PipelineContext) -> Result<()> {
    let mut fonts = ctx.raw_fonts()?;
    if ctx.ribbi_only {
        fonts.retain(|path| {
            file_stem(path).map(|stem| Style::from_file_stem(stem).is_ribbi()).unwrap_or(false)
        });
    }
    if fonts.is_empty() {
        bail!("no raw fonts to post-process for plan '{}'", ctx.plan.name);
    }

    let out_dir = ctx.fonts_dir();
    create_dir_all(&out_dir)
        .with_context(|| format!("Failed to create directory: {}", out_dir.display()))?;

    let options = ctx.fix_options();
    let result = process_parallel_iter("postprocess", fonts, |path| {
        let stem = normalize_stem(file_stem(&path)?);
        let data = FontFile::new(&path).read()?;

        let outcome = fix_font(&data, &stem, &options)
            .with_context(|| format!("Failed to fix {}", path.display()))?;
        for fix in &outcome.applied {
            log::info!("{stem}: {fix}");
        }

        FontFile::new(out_dir.join(format!("{stem}.ttf"))).write(&outcome.data)?;
        Ok(())
    })?;

    result.ok_or_bail("postprocess")
}
