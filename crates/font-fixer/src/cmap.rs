//! Character map fixes.
//!
//! Shaping engines expect U+25CC DOTTED CIRCLE as the base for orphaned
//! combining marks; fonts that lack it get a placeholder mapped to an
//! existing blank glyph. While the mapping is in hand, the PANOSE
//! proportion byte is corrected for fixed-pitch fonts.

use read_fonts::{
    FontRef, TableProvider,
    tables::cmap::{Cmap as ReadCmap, CmapSubtable, PlatformId},
    types::GlyphId,
};
use write_fonts::{FontBuilder, from_obj::ToOwnedTable, tables::cmap::Cmap, tables::os2::Os2};

use crate::{FixError, Result, font_ops::rewrite_font};

const DOTTED_CIRCLE: u32 = 0x25CC;
/// Codepoints whose glyph can stand in for the dotted circle.
const PLACEHOLDER_SOURCES: &[u32] = &[0x20, 0xA0, 0x2E];
const PANOSE_MONOSPACED: u8 = 9;

/// Pick the richest cmap subtable: format 12 over format 4 over anything.
fn find_best_subtable<'a>(cmap: &'a ReadCmap<'a>) -> Option<CmapSubtable<'a>> {
    let records = cmap.encoding_records();

    for record in records {
        if (record.platform_id() == PlatformId::Unicode
            || (record.platform_id() == PlatformId::Windows && record.encoding_id() == 10))
            && let Ok(subtable) = record.subtable(cmap.offset_data())
            && matches!(subtable, CmapSubtable::Format12(_))
        {
            return Some(subtable);
        }
    }

    for record in records {
        if (record.platform_id() == PlatformId::Unicode
            || (record.platform_id() == PlatformId::Windows && record.encoding_id() == 1))
            && let Ok(subtable) = record.subtable(cmap.offset_data())
            && matches!(subtable, CmapSubtable::Format4(_))
        {
            return Some(subtable);
        }
    }

    records.iter().find_map(|r| r.subtable(cmap.offset_data()).ok())
}

fn collect_mappings(font: &FontRef) -> Result<Vec<(u32, GlyphId)>> {
    let cmap = font.cmap()?;
    let subtable = find_best_subtable(&cmap).ok_or(FixError::MissingTable("cmap"))?;
    Ok(subtable.iter().collect())
}

/// True when every mapped glyph has the same advance width.
fn is_fixed_pitch(font: &FontRef, mappings: &[(u32, GlyphId)]) -> bool {
    let Ok(hmtx) = font.hmtx() else {
        return false;
    };
    let mut advances = mappings.iter().filter_map(|(_, gid)| hmtx.advance(*gid));
    let Some(first) = advances.next() else {
        return false;
    };
    advances.all(|a| a == first)
}

/// Ensure a U+25CC mapping and a correct PANOSE proportion byte.
pub fn apply(data: &[u8], applied: &mut Vec<String>) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    let mut mappings = collect_mappings(&font)?;

    let dotted_circle_gid = mappings
        .iter()
        .find(|(cp, _)| *cp == DOTTED_CIRCLE)
        .map(|(_, gid)| *gid);

    let placeholder = if dotted_circle_gid.is_none() {
        let gid = PLACEHOLDER_SOURCES.iter().find_map(|source| {
            mappings.iter().find(|(cp, _)| cp == source).map(|(_, gid)| *gid)
        });
        if gid.is_none() {
            log::warn!("no placeholder glyph available for U+25CC, skipping");
        }
        gid
    } else {
        None
    };

    let fixed_pitch = is_fixed_pitch(&font, &mappings);
    let panose_stale = font
        .os2()
        .map(|os2| fixed_pitch && os2.panose_10()[3] != PANOSE_MONOSPACED)
        .unwrap_or(false);

    if placeholder.is_none() && !panose_stale {
        return Ok(data.to_vec());
    }

    let fixed = rewrite_font(data, |font, builder| {
        if let Some(gid) = placeholder {
            mappings.push((DOTTED_CIRCLE, gid));
            mappings.sort_by_key(|(cp, _)| *cp);
            rebuild_cmap(&mappings, builder)?;
            applied.push("mapped U+25CC placeholder".to_string());
        }

        if panose_stale {
            let mut new_os2: Os2 = font.os2()?.to_owned_table();
            new_os2.panose_10[3] = PANOSE_MONOSPACED;
            builder.add_table(&new_os2)?;
            applied.push("PANOSE proportion set to monospaced".to_string());
        }

        Ok(())
    })?;

    Ok(fixed)
}

fn rebuild_cmap(mappings: &[(u32, GlyphId)], builder: &mut FontBuilder) -> Result<()> {
    let char_mappings: Vec<(char, GlyphId)> = mappings
        .iter()
        .filter_map(|(cp, gid)| char::from_u32(*cp).map(|ch| (ch, *gid)))
        .collect();

    let new_cmap = Cmap::from_mappings(char_mappings).map_err(|_| FixError::CmapBuildError)?;
    builder.add_table(&new_cmap)?;
    Ok(())
}
