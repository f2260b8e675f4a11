//! Compliance fixes for shipping TTF binaries.
//!
//! Takes raw build output and normalizes it for distribution: version
//! alignment, vertical metrics, family/style naming, license entries,
//! table hygiene, and a dotted-circle placeholder. Every fix is
//! idempotent, so re-running the fixer over its own output is a no-op.

mod cmap;
mod error;
pub mod font_ops;
mod legal;
mod metrics;
pub mod naming;
mod tables;
mod validate;
mod version;

pub use error::{FixError, Result};
pub use metrics::MetricsTargets;
pub use naming::Style;
pub use validate::{Finding, validate};
pub use version::FontVersion;

/// Configuration for a fix run.
#[derive(Debug, Clone)]
pub struct FixOptions {
    /// Typographic family name written into the name table.
    pub family_name: String,
    pub metrics: MetricsTargets,
    /// Force this version instead of parsing name ID 5.
    pub version: Option<FontVersion>,
    /// Copyright used when the font carries no name ID 0.
    pub copyright_template: String,
}

impl Default for FixOptions {
    fn default() -> Self {
        Self {
            family_name: "Charon Sans".to_string(),
            metrics: MetricsTargets::default(),
            version: None,
            copyright_template: "Copyright 2026 The Charon Sans Project Authors".to_string(),
        }
    }
}

/// The result of fixing one font.
#[derive(Debug)]
pub struct FixOutcome {
    /// The fixed font, already validated.
    pub data: Vec<u8>,
    /// Human-readable descriptions of the fixes applied.
    pub applied: Vec<String>,
    /// Remaining compliance findings (reported, not fatal).
    pub findings: Vec<Finding>,
}

/// Fix one font.
///
/// `file_stem` is the output filename without extension; the style is
/// detected from its final `-` segment. The returned bytes have been
/// re-parsed and structurally validated; a font that cannot be parsed,
/// or whose fixed form cannot, is an error and nothing is returned.
pub fn fix_font(data: &[u8], file_stem: &str, options: &FixOptions) -> Result<FixOutcome> {
    // Fail before any work if the input is not a font at all.
    read_fonts::FontRef::new(data)?;

    let style = Style::from_file_stem(file_stem);
    let mut applied = Vec::new();

    let data = version::apply(data, options.version, &mut applied)?;
    let data = naming::apply(&data, &options.family_name, &style, &mut applied)?;
    let data = metrics::apply(&data, &options.metrics, &mut applied)?;
    let data = legal::apply(&data, &options.copyright_template, &mut applied)?;
    let data = tables::apply(&data, &mut applied)?;
    let data = cmap::apply(&data, &mut applied)?;

    let findings = validate::validate(&data)?;
    for finding in &findings {
        log::warn!("{file_stem}: {}: {}", finding.check, finding.message);
    }

    Ok(FixOutcome { data, applied, findings })
}
