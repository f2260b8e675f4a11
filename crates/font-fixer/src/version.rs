//! Font version alignment.
//!
//! Upstream builds stamp name ID 5 with strings like
//! `Version 33.2.7; ttfautohint (v1.8.3)` while `head.fontRevision` ends up
//! a hair below the advertised value (33.19999 instead of 33.2). Both are
//! normalized here: the name record becomes exactly `Version {major}.{minor}.{patch}`
//! and the revision becomes exactly `{major}.{minor}`.

use std::sync::LazyLock;

use read_fonts::TableProvider;
use regex::Regex;
use write_fonts::{from_obj::ToOwnedTable, tables::head::Head, types::Fixed};

use crate::{
    Result,
    font_ops::{name_entries, name_entry, rewrite_font, set_name_entries},
};

const NAME_ID_VERSION: u16 = 5;

static VERSION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Version\s+(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

/// A semantic font version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FontVersion {
    pub major: u16,
    pub minor: u16,
    pub patch: u16,
}

impl FontVersion {
    pub fn new(major: u16, minor: u16, patch: u16) -> Self {
        Self { major, minor, patch }
    }

    /// Parse from a name ID 5 string, ignoring tool suffixes.
    pub fn parse(version_string: &str) -> Option<Self> {
        let caps = VERSION_RE.captures(version_string)?;
        let major = caps[1].parse().ok()?;
        let minor = caps[2].parse().ok()?;
        let patch = caps.get(3).and_then(|m| m.as_str().parse().ok()).unwrap_or(0);
        Some(Self { major, minor, patch })
    }

    /// The canonical name ID 5 string.
    pub fn version_string(&self) -> String {
        format!("Version {}.{}.{}", self.major, self.minor, self.patch)
    }

    /// The `head.fontRevision` value: `major.minor` as 16.16 fixed.
    pub fn revision(&self) -> Fixed {
        let value: f64 =
            format!("{}.{}", self.major, self.minor).parse().unwrap_or(self.major as f64);
        Fixed::from_f64(value)
    }
}

/// Align `head.fontRevision` and name ID 5 with the font's version.
///
/// Fonts without a parseable version string pass through unchanged;
/// validation reports them as a finding.
pub fn apply(
    data: &[u8],
    version_override: Option<FontVersion>,
    applied: &mut Vec<String>,
) -> Result<Vec<u8>> {
    let font = read_fonts::FontRef::new(data)?;
    let version = match version_override
        .or_else(|| name_entry(&font, NAME_ID_VERSION).and_then(|s| FontVersion::parse(&s)))
    {
        Some(v) => v,
        None => {
            log::warn!("no parseable version string, skipping version alignment");
            return Ok(data.to_vec());
        }
    };

    let version_string = version.version_string();
    let revision = version.revision();

    let strings = name_entries(&font, NAME_ID_VERSION);
    let already_aligned = font.head().map(|h| h.font_revision() == revision).unwrap_or(false)
        && !strings.is_empty()
        && strings.iter().all(|s| s == &version_string);
    if already_aligned {
        return Ok(data.to_vec());
    }

    let fixed = rewrite_font(data, |font, builder| {
        let mut new_head: Head = font.head()?.to_owned_table();
        new_head.font_revision = revision;
        builder.add_table(&new_head)?;

        let new_name =
            set_name_entries(font, &[(NAME_ID_VERSION, Some(version_string.clone()))])?;
        builder.add_table(&new_name)?;
        Ok(())
    })?;

    applied.push(format!("version aligned to {version_string}"));
    Ok(fixed)
}
