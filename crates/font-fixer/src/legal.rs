//! License, copyright, and credit name entries.

use crate::{
    Result,
    font_ops::{name_entries, name_entry, rewrite_font, set_name_entries},
};

const NAME_ID_COPYRIGHT: u16 = 0;
const NAME_ID_LICENSE: u16 = 13;
const NAME_ID_LICENSE_URL: u16 = 14;
/// Manufacturer, designer, and description entries sometimes carry
/// stale QA-tool references left behind by earlier build setups.
const TOOL_CREDIT_IDS: &[u16] = &[8, 9, 10];
const STALE_TOOL_REFERENCE: &str = "fontbakery";

const OFL_LICENSE: &str = "This Font Software is licensed under the SIL Open Font License, \
Version 1.1. This license is available with a FAQ at: https://openfontlicense.org";
const OFL_URL: &str = "https://openfontlicense.org";

/// Ensure OFL license entries and a copyright notice, and drop credit
/// entries that reference QA tooling.
///
/// License IDs 13 and 14 are always pinned to the OFL strings; the
/// copyright is only synthesized from `copyright_template` when ID 0 is
/// missing. Fonts already carrying all of this pass through unchanged.
pub fn apply(data: &[u8], copyright_template: &str, applied: &mut Vec<String>) -> Result<Vec<u8>> {
    let font = read_fonts::FontRef::new(data)?;
    let copyright = name_entry(&font, NAME_ID_COPYRIGHT);

    let mut entries = vec![
        (
            NAME_ID_COPYRIGHT,
            Some(copyright.clone().unwrap_or_else(|| copyright_template.to_string())),
        ),
        (NAME_ID_LICENSE, Some(OFL_LICENSE.to_string())),
        (NAME_ID_LICENSE_URL, Some(OFL_URL.to_string())),
    ];

    let mut scrubbed = Vec::new();
    for name_id in TOOL_CREDIT_IDS {
        let stale = name_entries(&font, *name_id)
            .iter()
            .any(|s| s.to_lowercase().contains(STALE_TOOL_REFERENCE));
        if stale {
            entries.push((*name_id, None));
            scrubbed.push(*name_id);
        }
    }

    let entry_matches = |id: u16, expected: &str| {
        let strings = name_entries(&font, id);
        !strings.is_empty() && strings.iter().all(|s| s == expected)
    };
    let license_ok = entry_matches(NAME_ID_LICENSE, OFL_LICENSE)
        && entry_matches(NAME_ID_LICENSE_URL, OFL_URL)
        && copyright.is_some();
    if license_ok && scrubbed.is_empty() {
        return Ok(data.to_vec());
    }

    let fixed = rewrite_font(data, |font, builder| {
        let new_name = set_name_entries(font, &entries)?;
        builder.add_table(&new_name)?;
        Ok(())
    })?;

    if !license_ok {
        applied.push("license entries set".to_string());
    }
    for name_id in scrubbed {
        applied.push(format!("removed stale tool reference from name ID {name_id}"));
    }
    Ok(fixed)
}
