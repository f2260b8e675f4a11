//! Post-fix validation.
//!
//! The fixed bytes are re-parsed from scratch; structural failures are
//! hard errors (the caller must not write the file), while compliance
//! findings are returned for reporting.

use std::sync::LazyLock;

use read_fonts::{FontRef, TableProvider, types::Tag};
use regex::Regex;

use crate::{FixError, Result, font_ops::name_entry};

static VERSION_STRING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Version \d+\.\d+\.\d+$").unwrap());

/// A non-fatal compliance finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub check: &'static str,
    pub message: String,
}

impl Finding {
    fn new(check: &'static str, message: impl Into<String>) -> Self {
        Self { check, message: message.into() }
    }
}

/// Validate fixed font data.
///
/// Errors when the data does not parse as a structurally sound font;
/// otherwise returns the list of compliance findings (empty = clean).
pub fn validate(data: &[u8]) -> Result<Vec<Finding>> {
    let font = FontRef::new(data)
        .map_err(|e| FixError::InvalidOutput(format!("font does not parse: {e}")))?;

    let head = font
        .head()
        .map_err(|e| FixError::InvalidOutput(format!("head does not parse: {e}")))?;
    let hhea = font
        .hhea()
        .map_err(|e| FixError::InvalidOutput(format!("hhea does not parse: {e}")))?;
    let os2 = font
        .os2()
        .map_err(|e| FixError::InvalidOutput(format!("OS/2 does not parse: {e}")))?;
    font.name()
        .map_err(|e| FixError::InvalidOutput(format!("name does not parse: {e}")))?;
    font.cmap()
        .map_err(|e| FixError::InvalidOutput(format!("cmap does not parse: {e}")))?;

    let mut findings = Vec::new();

    if os2.s_typo_ascender() != hhea.ascender().to_i16()
        || os2.s_typo_descender() != hhea.descender().to_i16()
        || os2.s_typo_line_gap() != hhea.line_gap().to_i16()
    {
        findings.push(Finding::new(
            "typo-metrics",
            format!(
                "OS/2 typo metrics {}/{}/{} differ from hhea {}/{}/{}",
                os2.s_typo_ascender(),
                os2.s_typo_descender(),
                os2.s_typo_line_gap(),
                hhea.ascender().to_i16(),
                hhea.descender().to_i16(),
                hhea.line_gap().to_i16()
            ),
        ));
    }

    if (os2.us_win_ascent() as i32) < head.y_max().max(0) as i32 {
        findings.push(Finding::new(
            "win-ascent",
            format!("usWinAscent {} below yMax {}", os2.us_win_ascent(), head.y_max()),
        ));
    }
    if (os2.us_win_descent() as i32) < head.y_min().min(0).unsigned_abs() as i32 {
        findings.push(Finding::new(
            "win-descent",
            format!("usWinDescent {} below |yMin| {}", os2.us_win_descent(), head.y_min()),
        ));
    }

    match name_entry(&font, 5) {
        Some(version) if VERSION_STRING_RE.is_match(&version) => {}
        Some(version) => {
            findings.push(Finding::new(
                "version-string",
                format!("non-canonical version string '{version}'"),
            ));
        }
        None => {
            findings.push(Finding::new("version-string", "no version string"));
        }
    }

    if font.table_data(Tag::new(b"DSIG")).is_some() {
        findings.push(Finding::new("dsig", "DSIG table still present"));
    }

    Ok(findings)
}
