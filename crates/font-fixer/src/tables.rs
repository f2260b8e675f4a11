//! Table hygiene: drop tables that break compliance or bloat shipping fonts.
//!
//! `DSIG` signatures are invalidated by every other fix anyway, `FFTM` is
//! FontForge build metadata, and `prop` is AAT-only.

use read_fonts::{FontRef, types::Tag};
use write_fonts::FontBuilder;

use crate::Result;

const UNWANTED: &[Tag] = &[Tag::new(b"DSIG"), Tag::new(b"FFTM"), Tag::new(b"prop")];

/// Strip unwanted tables, returning the input untouched when none are present.
pub fn apply(data: &[u8], applied: &mut Vec<String>) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;

    let mut removed: Vec<Tag> = Vec::new();
    let mut builder = FontBuilder::new();
    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if UNWANTED.contains(&tag) {
            removed.push(tag);
            continue;
        }
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    if removed.is_empty() {
        return Ok(data.to_vec());
    }

    for tag in &removed {
        applied.push(format!("removed {tag} table"));
    }
    Ok(builder.build())
}
