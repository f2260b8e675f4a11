//! Vertical metrics normalization.
//!
//! Win metrics must cover the union bounding box so nothing clips on
//! Windows; hhea and OS/2 typo metrics are pinned to the same values so
//! every rasterizer computes the same line height.

use font_types::FWord;
use read_fonts::TableProvider;
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        hhea::Hhea,
        os2::{Os2, SelectionFlags},
    },
};

use crate::{Result, font_ops::rewrite_font};

/// Target vertical metrics.
#[derive(Debug, Clone, Copy)]
pub struct MetricsTargets {
    /// Minimum `usWinAscent`; raised to `head.yMax` when the box is taller.
    pub win_ascent: u16,
    /// Minimum `usWinDescent`; raised to `|head.yMin|` when the box is deeper.
    pub win_descent: u16,
    pub hhea_ascender: i16,
    pub hhea_descender: i16,
}

impl Default for MetricsTargets {
    fn default() -> Self {
        Self { win_ascent: 1198, win_descent: 604, hhea_ascender: 1015, hhea_descender: -265 }
    }
}

/// Apply the metric targets to the OS/2 and hhea tables.
pub fn apply(data: &[u8], targets: &MetricsTargets, applied: &mut Vec<String>) -> Result<Vec<u8>> {
    let fixed = rewrite_font(data, |font, builder| {
        let head = font.head()?;
        let y_max = head.y_max().max(0) as u16;
        let y_min_abs = head.y_min().min(0).unsigned_abs();

        let win_ascent = targets.win_ascent.max(y_max);
        let win_descent = targets.win_descent.max(y_min_abs);

        let mut new_hhea: Hhea = font.hhea()?.to_owned_table();
        new_hhea.ascender = FWord::new(targets.hhea_ascender);
        new_hhea.descender = FWord::new(targets.hhea_descender);
        new_hhea.line_gap = FWord::new(0);
        builder.add_table(&new_hhea)?;

        let os2 = font.os2()?;
        let os2_version = os2.version();
        let mut new_os2: Os2 = os2.to_owned_table();
        new_os2.us_win_ascent = win_ascent;
        new_os2.us_win_descent = win_descent;
        new_os2.s_typo_ascender = targets.hhea_ascender;
        new_os2.s_typo_descender = targets.hhea_descender;
        new_os2.s_typo_line_gap = 0;
        if os2_version >= 4 {
            new_os2.fs_selection |= SelectionFlags::USE_TYPO_METRICS;
        }
        builder.add_table(&new_os2)?;

        applied.push(format!(
            "metrics: win {win_ascent}/{win_descent}, hhea {}/{}",
            targets.hhea_ascender, targets.hhea_descender
        ));
        Ok(())
    })?;

    Ok(fixed)
}
