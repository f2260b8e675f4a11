//! Family and style naming.
//!
//! Styles come from the filename stem. RIBBI styles (Regular, Bold,
//! Italic, Bold Italic) keep the plain family in ID 1 with the style in
//! ID 2 and no typographic names; every other weight moves into ID 1
//! (`Family Medium`) with the real style in IDs 16/17 so legacy
//! environments see at most four styles per family.

use read_fonts::TableProvider;
use write_fonts::{
    from_obj::ToOwnedTable,
    tables::{
        head::{Head, MacStyle},
        os2::{Os2, SelectionFlags},
    },
};

use crate::{Result, font_ops::rewrite_font, font_ops::set_name_entries};

const NAME_ID_FAMILY: u16 = 1;
const NAME_ID_SUBFAMILY: u16 = 2;
const NAME_ID_FULL_NAME: u16 = 4;
const NAME_ID_POSTSCRIPT: u16 = 6;
const NAME_ID_TYPO_FAMILY: u16 = 16;
const NAME_ID_TYPO_SUBFAMILY: u16 = 17;

/// Known weights, longest name first so `Extralight` never matches `Light`.
const WEIGHTS: &[(&str, u16, &str)] = &[
    ("extralight", 200, "Extralight"),
    ("extrabold", 800, "Extrabold"),
    ("semibold", 600, "Semibold"),
    ("regular", 400, "Regular"),
    ("medium", 500, "Medium"),
    ("light", 300, "Light"),
    ("heavy", 900, "Black"),
    ("black", 900, "Black"),
    ("thin", 100, "Thin"),
    ("bold", 700, "Bold"),
];

/// A style detected from a filename stem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Style {
    /// Display weight name (`Regular`, `Semibold`, ...).
    pub weight_name: &'static str,
    /// OS/2 usWeightClass value.
    pub weight_class: u16,
    pub italic: bool,
}

impl Style {
    /// Detect the style from a filename stem like `CharonSans-SemiBoldItalic`.
    ///
    /// Unrecognized stems fall back to upright Regular.
    pub fn from_file_stem(stem: &str) -> Self {
        let style_part = stem.rsplit('-').next().unwrap_or(stem).to_ascii_lowercase();
        let italic = style_part.contains("italic");
        let weight_part = style_part.replace("italic", "");

        let (weight_name, weight_class) = WEIGHTS
            .iter()
            .find(|(needle, _, _)| weight_part.contains(needle))
            .map(|(_, class, display)| (*display, *class))
            .unwrap_or(("Regular", 400));

        Self { weight_name, weight_class, italic }
    }

    /// Whether this style fits the four-slot legacy family model.
    pub fn is_ribbi(&self) -> bool {
        matches!(self.weight_name, "Regular" | "Bold")
    }

    /// The RIBBI subfamily name (only meaningful when `is_ribbi`).
    pub fn ribbi_subfamily(&self) -> &'static str {
        match (self.weight_name, self.italic) {
            ("Bold", false) => "Bold",
            ("Bold", true) => "Bold Italic",
            (_, true) => "Italic",
            (_, false) => "Regular",
        }
    }

    /// The full style name (`Semibold Italic`, `Italic`, `Regular`).
    pub fn full_style(&self) -> String {
        match (self.weight_name, self.italic) {
            ("Regular", true) => "Italic".to_string(),
            (name, true) => format!("{name} Italic"),
            (name, false) => name.to_string(),
        }
    }
}

/// The complete set of name entries for a family/style pair.
#[derive(Debug)]
pub struct NamePlan {
    pub family: String,
    pub subfamily: String,
    pub full_name: String,
    pub postscript_name: String,
    /// `None` removes the typographic IDs (RIBBI styles).
    pub typographic: Option<(String, String)>,
}

impl NamePlan {
    pub fn new(family: &str, style: &Style) -> Self {
        let family_compact = family.replace(' ', "");

        if style.is_ribbi() {
            let subfamily = style.ribbi_subfamily().to_string();
            let full_name = format!("{family} {subfamily}");
            let postscript_name = format!("{family_compact}-{}", subfamily.replace(' ', ""));
            return Self {
                family: family.to_string(),
                subfamily,
                full_name,
                postscript_name,
                typographic: None,
            };
        }

        let full_style = style.full_style();
        let legacy_family = format!("{family} {}", style.weight_name);
        let full_name = if style.italic {
            format!("{family} {full_style}")
        } else {
            // Upright non-RIBBI full names carry no trailing "Regular".
            legacy_family.clone()
        };
        let postscript_name = format!("{family_compact}-{}", full_style.replace(' ', ""));

        Self {
            family: legacy_family,
            subfamily: if style.italic { "Italic" } else { "Regular" }.to_string(),
            full_name,
            postscript_name,
            typographic: Some((family.to_string(), full_style)),
        }
    }

    fn entries(&self) -> Vec<(u16, Option<String>)> {
        let (typo_family, typo_subfamily) = match &self.typographic {
            Some((f, s)) => (Some(f.clone()), Some(s.clone())),
            None => (None, None),
        };
        vec![
            (NAME_ID_FAMILY, Some(self.family.clone())),
            (NAME_ID_SUBFAMILY, Some(self.subfamily.clone())),
            (NAME_ID_FULL_NAME, Some(self.full_name.clone())),
            (NAME_ID_POSTSCRIPT, Some(self.postscript_name.clone())),
            (NAME_ID_TYPO_FAMILY, typo_family),
            (NAME_ID_TYPO_SUBFAMILY, typo_subfamily),
        ]
    }
}

/// Rewrite names and style bits for the detected style.
pub fn apply(
    data: &[u8],
    family: &str,
    style: &Style,
    applied: &mut Vec<String>,
) -> Result<Vec<u8>> {
    let plan = NamePlan::new(family, style);
    let bold = style.weight_name == "Bold";
    let italic = style.italic;
    let weight_class = style.weight_class;

    let fixed = rewrite_font(data, |font, builder| {
        let new_name = set_name_entries(font, &plan.entries())?;
        builder.add_table(&new_name)?;

        let mut new_os2: Os2 = font.os2()?.to_owned_table();
        new_os2.us_weight_class = weight_class;
        new_os2.fs_selection &=
            !(SelectionFlags::ITALIC | SelectionFlags::BOLD | SelectionFlags::REGULAR);
        if italic {
            new_os2.fs_selection |= SelectionFlags::ITALIC;
        }
        if bold {
            new_os2.fs_selection |= SelectionFlags::BOLD;
        }
        if !italic && !bold {
            new_os2.fs_selection |= SelectionFlags::REGULAR;
        }
        builder.add_table(&new_os2)?;

        let mut new_head: Head = font.head()?.to_owned_table();
        let mut mac_style = new_head.mac_style & !(MacStyle::BOLD | MacStyle::ITALIC);
        if bold {
            mac_style |= MacStyle::BOLD;
        }
        if italic {
            mac_style |= MacStyle::ITALIC;
        }
        new_head.mac_style = mac_style;
        builder.add_table(&new_head)?;

        Ok(())
    })?;

    applied.push(format!("naming: '{}' / '{}'", plan.family, plan.subfamily));
    Ok(fixed)
}
