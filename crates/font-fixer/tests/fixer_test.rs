//! End-to-end fixer tests over synthetic TrueType fonts.

use std::collections::HashMap;

use charon_font_fixer::{FixOptions, MetricsTargets, fix_font, font_ops::name_entry, validate};
use read_fonts::{FontRef, TableProvider, types::GlyphId, types::Tag};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::Head,
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::Os2,
        post::Post,
    },
};

const GLYPHS: &[&str] = &[".notdef", "space", "period", "A"];
const CMAP: &[(u32, &str)] = &[(0x20, "space"), (0x2E, "period"), (0x41, "A")];

/// Build a minimal TrueType font resembling raw build output.
fn make_test_font(names: &[(u16, &str)]) -> Vec<u8> {
    let (x_min, y_min, x_max, y_max) = (0i16, -200i16, 500i16, 700i16);

    let name_to_gid: HashMap<&str, u16> =
        GLYPHS.iter().enumerate().map(|(i, name)| (*name, i as u16)).collect();

    let mut glyf_builder = GlyfLocaBuilder::new();
    for _ in GLYPHS {
        let simple = SimpleGlyph {
            bbox: Bbox { x_min, y_min, x_max, y_max },
            contours: vec![],
            instructions: vec![],
        };
        let _ = glyf_builder.add_glyph(&Glyph::Simple(simple));
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let cmap_mappings: Vec<(char, GlyphId)> = CMAP
        .iter()
        .filter_map(|(cp, name)| {
            let gid = name_to_gid.get(name)?;
            let ch = char::from_u32(*cp)?;
            Some((ch, GlyphId::new(*gid as u32)))
        })
        .collect();
    let cmap = Cmap::from_mappings(cmap_mappings).expect("cmap");

    let head = Head {
        font_revision: font_types::Fixed::from_f64(33.19999),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: write_fonts::tables::head::Flags::empty(),
        units_per_em: 1000,
        created: font_types::LongDateTime::new(0),
        modified: font_types::LongDateTime::new(0),
        x_min,
        y_min,
        x_max,
        y_max,
        mac_style: write_fonts::tables::head::MacStyle::empty(),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: match loca_format {
            write_fonts::tables::loca::LocaFormat::Short => 0,
            write_fonts::tables::loca::LocaFormat::Long => 1,
        },
    };

    let hhea = Hhea {
        ascender: font_types::FWord::new(700),
        descender: font_types::FWord::new(-200),
        line_gap: font_types::FWord::new(90),
        advance_width_max: font_types::UfWord::new(500),
        min_left_side_bearing: font_types::FWord::new(0),
        min_right_side_bearing: font_types::FWord::new(0),
        x_max_extent: font_types::FWord::new(500),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: GLYPHS.len() as u16,
    };

    let hmtx = Hmtx {
        h_metrics: GLYPHS.iter().map(|_| LongMetric { advance: 500, side_bearing: 0 }).collect(),
        left_side_bearings: vec![],
    };

    let maxp = Maxp {
        num_glyphs: GLYPHS.len() as u16,
        max_points: Some(0),
        max_contours: Some(0),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };

    let post = Post {
        version: font_types::Version16Dot16::VERSION_3_0,
        italic_angle: font_types::Fixed::from_f64(0.0),
        underline_position: font_types::FWord::new(-100),
        underline_thickness: font_types::FWord::new(50),
        is_fixed_pitch: 0,
        min_mem_type42: 0,
        max_mem_type42: 0,
        min_mem_type1: 0,
        max_mem_type1: 0,
        num_glyphs: Some(GLYPHS.len() as u16),
        glyph_name_index: None,
        string_data: None,
    };

    let os2 = Os2 {
        x_avg_char_width: 500,
        us_weight_class: 400,
        us_width_class: 5,
        fs_type: 0,
        y_subscript_x_size: 650,
        y_subscript_y_size: 600,
        y_subscript_x_offset: 0,
        y_subscript_y_offset: 75,
        y_superscript_x_size: 650,
        y_superscript_y_size: 600,
        y_superscript_x_offset: 0,
        y_superscript_y_offset: 350,
        y_strikeout_size: 50,
        y_strikeout_position: 300,
        s_family_class: 0,
        panose_10: [0; 10],
        ul_unicode_range_1: 0,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: font_types::Tag::new(b"NONE"),
        fs_selection: write_fonts::tables::os2::SelectionFlags::REGULAR,
        us_first_char_index: 0x20,
        us_last_char_index: 0x7E,
        s_typo_ascender: 700,
        s_typo_descender: -200,
        s_typo_line_gap: 90,
        us_win_ascent: 900,
        us_win_descent: 200,
        ul_code_page_range_1: Some(0),
        ul_code_page_range_2: Some(0),
        sx_height: Some(500),
        s_cap_height: Some(700),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        us_lower_optical_point_size: None,
        us_upper_optical_point_size: None,
    };

    let name = Name::new(
        names
            .iter()
            .map(|(id, value)| {
                NameRecord::new(
                    3,
                    1,
                    0x409,
                    read_fonts::types::NameId::new(*id),
                    String::from(*value).into(),
                )
            })
            .collect(),
    );

    let mut builder = FontBuilder::new();
    builder.add_table(&head).unwrap();
    builder.add_table(&hhea).unwrap();
    builder.add_table(&hmtx).unwrap();
    builder.add_table(&maxp).unwrap();
    builder.add_table(&cmap).unwrap();
    builder.add_table(&post).unwrap();
    builder.add_table(&glyf).unwrap();
    builder.add_table(&loca).unwrap();
    builder.add_table(&os2).unwrap();
    builder.add_table(&name).unwrap();
    builder.build()
}

fn raw_build_names() -> Vec<(u16, &'static str)> {
    vec![
        (1, "Charon Sans"),
        (2, "Regular"),
        (4, "Charon Sans Regular"),
        (5, "Version 33.2.7; ttfautohint (v1.8.3)"),
        (6, "CharonSans-Regular"),
    ]
}

#[test]
fn test_fix_is_idempotent() {
    let raw = make_test_font(&raw_build_names());
    let options = FixOptions::default();

    let once = fix_font(&raw, "CharonSans-Regular", &options).expect("first fix");
    let twice = fix_font(&once.data, "CharonSans-Regular", &options).expect("second fix");

    assert_eq!(once.data, twice.data);
}

#[test]
fn test_fix_is_idempotent_across_stem_renaming() {
    // A second pass sees the normalized stem, not the raw one.
    let raw = make_test_font(&raw_build_names());
    let options = FixOptions::default();

    let once = fix_font(&raw, "CharonSans-SemiBold", &options).expect("first fix");
    let twice = fix_font(&once.data, "CharonSans-Semibold", &options).expect("second fix");

    assert_eq!(once.data, twice.data);
}

#[test]
fn test_second_pass_applies_nothing_redundant() {
    let raw = make_test_font(&raw_build_names());
    let options = FixOptions::default();

    let once = fix_font(&raw, "CharonSans-Regular", &options).unwrap();
    assert!(once.applied.iter().any(|a| a.contains("version")));
    assert!(once.applied.iter().any(|a| a.contains("license")));

    let twice = fix_font(&once.data, "CharonSans-Regular", &options).unwrap();
    assert!(!twice.applied.iter().any(|a| a.contains("version")));
    assert!(!twice.applied.iter().any(|a| a.contains("license")));
}

#[test]
fn test_stale_tool_references_are_scrubbed() {
    let mut names = raw_build_names();
    names.push((9, "QA run with fontbakery 0.12"));
    let raw = make_test_font(&names);

    let outcome = fix_font(&raw, "CharonSans-Regular", &FixOptions::default()).unwrap();
    let font = FontRef::new(&outcome.data).unwrap();
    assert_eq!(name_entry(&font, 9), None);
    assert!(outcome.applied.iter().any(|a| a.contains("stale tool reference")));
}

#[test]
fn test_metrics_are_consistent() {
    let raw = make_test_font(&raw_build_names());
    let outcome = fix_font(&raw, "CharonSans-Regular", &FixOptions::default()).unwrap();

    let font = FontRef::new(&outcome.data).unwrap();
    let os2 = font.os2().unwrap();
    let hhea = font.hhea().unwrap();
    let head = font.head().unwrap();
    let targets = MetricsTargets::default();

    assert_eq!(hhea.ascender().to_i16(), targets.hhea_ascender);
    assert_eq!(hhea.descender().to_i16(), targets.hhea_descender);
    assert_eq!(hhea.line_gap().to_i16(), 0);
    assert_eq!(os2.s_typo_ascender(), hhea.ascender().to_i16());
    assert_eq!(os2.s_typo_descender(), hhea.descender().to_i16());
    assert_eq!(os2.s_typo_line_gap(), 0);
    assert!(os2.us_win_ascent() as i32 >= head.y_max() as i32);
    assert!(os2.us_win_descent() as i32 >= head.y_min().abs() as i32);
    // USE_TYPO_METRICS on a version 4 OS/2
    assert!(os2.fs_selection().bits() & 0x80 != 0);
}

#[test]
fn test_version_alignment() {
    let raw = make_test_font(&raw_build_names());
    let outcome = fix_font(&raw, "CharonSans-Regular", &FixOptions::default()).unwrap();

    let font = FontRef::new(&outcome.data).unwrap();
    assert_eq!(name_entry(&font, 5).as_deref(), Some("Version 33.2.7"));
    assert_eq!(font.head().unwrap().font_revision(), font_types::Fixed::from_f64(33.2));
}

#[test]
fn test_dsig_removed() {
    let raw = make_test_font(&raw_build_names());

    // Re-pack with a dummy signature table attached.
    let font = FontRef::new(&raw).unwrap();
    let mut builder = FontBuilder::new();
    for record in font.table_directory.table_records() {
        if let Some(data) = font.table_data(record.tag()) {
            builder.add_raw(record.tag(), data);
        }
    }
    let dsig: &[u8] = &[0, 0, 0, 1, 0, 0, 0, 0];
    builder.add_raw(Tag::new(b"DSIG"), dsig);
    let signed = builder.build();

    let outcome = fix_font(&signed, "CharonSans-Regular", &FixOptions::default()).unwrap();
    let fixed = FontRef::new(&outcome.data).unwrap();
    assert!(fixed.table_data(Tag::new(b"DSIG")).is_none());
    assert!(outcome.applied.iter().any(|a| a.contains("DSIG")));
}

#[test]
fn test_ribbi_names() {
    let raw = make_test_font(&raw_build_names());
    let outcome = fix_font(&raw, "CharonSans-Bold", &FixOptions::default()).unwrap();

    let font = FontRef::new(&outcome.data).unwrap();
    assert_eq!(name_entry(&font, 1).as_deref(), Some("Charon Sans"));
    assert_eq!(name_entry(&font, 2).as_deref(), Some("Bold"));
    assert_eq!(name_entry(&font, 4).as_deref(), Some("Charon Sans Bold"));
    assert_eq!(name_entry(&font, 6).as_deref(), Some("CharonSans-Bold"));
    assert_eq!(name_entry(&font, 16), None);
    assert_eq!(name_entry(&font, 17), None);
    assert_eq!(font.os2().unwrap().us_weight_class(), 700);
    // BOLD selection bit set, REGULAR cleared
    let fs = font.os2().unwrap().fs_selection().bits();
    assert!(fs & 0x20 != 0);
    assert!(fs & 0x40 == 0);
}

#[test]
fn test_non_ribbi_names() {
    let raw = make_test_font(&raw_build_names());
    let outcome = fix_font(&raw, "CharonSans-SemiBoldItalic", &FixOptions::default()).unwrap();

    let font = FontRef::new(&outcome.data).unwrap();
    assert_eq!(name_entry(&font, 1).as_deref(), Some("Charon Sans Semibold"));
    assert_eq!(name_entry(&font, 2).as_deref(), Some("Italic"));
    assert_eq!(name_entry(&font, 4).as_deref(), Some("Charon Sans Semibold Italic"));
    assert_eq!(name_entry(&font, 6).as_deref(), Some("CharonSans-SemiboldItalic"));
    assert_eq!(name_entry(&font, 16).as_deref(), Some("Charon Sans"));
    assert_eq!(name_entry(&font, 17).as_deref(), Some("Semibold Italic"));
    assert_eq!(font.os2().unwrap().us_weight_class(), 600);
}

#[test]
fn test_license_entries_added() {
    let raw = make_test_font(&raw_build_names());
    let outcome = fix_font(&raw, "CharonSans-Regular", &FixOptions::default()).unwrap();

    let font = FontRef::new(&outcome.data).unwrap();
    assert!(name_entry(&font, 13).unwrap().contains("SIL Open Font License"));
    assert_eq!(name_entry(&font, 14).as_deref(), Some("https://openfontlicense.org"));
    assert!(name_entry(&font, 0).is_some());
}

#[test]
fn test_dotted_circle_placeholder() {
    let raw = make_test_font(&raw_build_names());
    let outcome = fix_font(&raw, "CharonSans-Regular", &FixOptions::default()).unwrap();

    let font = FontRef::new(&outcome.data).unwrap();
    let cmap = font.cmap().unwrap();
    let space_gid = cmap.map_codepoint(0x20u32).unwrap();
    assert_eq!(cmap.map_codepoint(0x25CCu32), Some(space_gid));
}

#[test]
fn test_fixed_output_validates_clean() {
    let raw = make_test_font(&raw_build_names());
    let outcome = fix_font(&raw, "CharonSans-Regular", &FixOptions::default()).unwrap();
    assert!(outcome.findings.is_empty());
    assert!(validate(&outcome.data).unwrap().is_empty());
}

#[test]
fn test_truncated_input_is_an_error() {
    let raw = make_test_font(&raw_build_names());
    assert!(fix_font(&raw[..30], "CharonSans-Regular", &FixOptions::default()).is_err());
}

#[test]
fn test_not_a_font_is_an_error() {
    assert!(fix_font(b"not a font at all", "CharonSans-Regular", &FixOptions::default()).is_err());
}
