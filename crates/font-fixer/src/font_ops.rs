//! Shared font manipulation helpers.

use read_fonts::{FontRef, TableProvider};
use write_fonts::{
    FontBuilder,
    tables::name::{Name, NameRecord},
};

use crate::Result;

/// Windows platform identifiers used for records we synthesize.
const WINDOWS_PLATFORM: u16 = 3;
const WINDOWS_UNICODE_BMP: u16 = 1;
const WINDOWS_ENGLISH_US: u16 = 0x409;

/// Rewrite font data by applying a transformation function.
///
/// Copies all tables from the source font, then calls `f` to modify/add tables.
pub fn rewrite_font(
    data: &[u8],
    f: impl FnOnce(&FontRef, &mut FontBuilder) -> Result<()>,
) -> Result<Vec<u8>> {
    let font = FontRef::new(data)?;
    let mut builder = FontBuilder::new();

    for record in font.table_directory.table_records() {
        let tag = record.tag();
        if let Some(table_data) = font.table_data(tag) {
            builder.add_raw(tag, table_data);
        }
    }

    f(&font, &mut builder)?;
    Ok(builder.build())
}

/// Read the first decodable string for a name ID, preferring Windows records.
pub fn name_entry(font: &FontRef, name_id: u16) -> Option<String> {
    let name = font.name().ok()?;
    let mut fallback = None;

    for record in name.name_record() {
        if record.name_id().to_u16() != name_id {
            continue;
        }
        let Ok(s) = record.string(name.string_data()) else {
            continue;
        };
        let s = s.chars().collect::<String>();
        if record.platform_id() == WINDOWS_PLATFORM {
            return Some(s);
        }
        fallback.get_or_insert(s);
    }

    fallback
}

/// All decodable strings carrying a name ID, across platforms.
pub fn name_entries(font: &FontRef, name_id: u16) -> Vec<String> {
    let Ok(name) = font.name() else {
        return Vec::new();
    };

    name.name_record()
        .iter()
        .filter(|record| record.name_id().to_u16() == name_id)
        .filter_map(|record| record.string(name.string_data()).ok())
        .map(|s| s.chars().collect())
        .collect()
}

/// Rewrite the name table from a set of per-ID edits.
///
/// `Some(value)` replaces every record carrying that ID (appending a
/// Windows record when the font has none); `None` removes the ID.
/// IDs absent from `entries` pass through untouched.
pub fn set_name_entries(font: &FontRef, entries: &[(u16, Option<String>)]) -> Result<Name> {
    let name = font.name()?;
    let mut new_records = Vec::new();
    let mut seen: Vec<u16> = Vec::new();

    for record in name.name_record() {
        let name_id = record.name_id().to_u16();
        let current = match record.string(name.string_data()) {
            Ok(s) => s.chars().collect::<String>(),
            Err(_) => continue,
        };

        let new_string = match entries.iter().find(|(id, _)| *id == name_id) {
            Some((_, None)) => continue,
            Some((_, Some(value))) => {
                seen.push(name_id);
                value.clone()
            }
            None => current,
        };

        new_records.push(NameRecord::new(
            record.platform_id(),
            record.encoding_id(),
            record.language_id(),
            read_fonts::types::NameId::new(name_id),
            new_string.into(),
        ));
    }

    for (name_id, value) in entries {
        if let Some(value) = value
            && !seen.contains(name_id)
        {
            new_records.push(NameRecord::new(
                WINDOWS_PLATFORM,
                WINDOWS_UNICODE_BMP,
                WINDOWS_ENGLISH_US,
                read_fonts::types::NameId::new(*name_id),
                value.clone().into(),
            ));
        }
    }

    // The name table requires sorted records; appended ones land out of order.
    new_records.sort();

    Ok(Name::new(new_records))
}
