//! Build plan discovery.
//!
//! Plans live in the upstream `private-build-plans.toml`. Only top-level
//! `[buildPlans.X]` sections are plans; dotted sections like
//! `[buildPlans.X.weights.Bold]` configure them and are skipped.

use std::{fs::read_to_string, path::Path, sync::LazyLock};

use anyhow::{Context, Result, bail};
use regex::Regex;

static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[buildPlans\.([^.\]]+)\]$").unwrap());
static FAMILY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"^family\s*=\s*"([^"]+)""#).unwrap());

/// One `[buildPlans.X]` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildPlan {
    /// Section key, used for `npm run build -- ttf::<name>`.
    pub name: String,
    /// Display family name.
    pub family: String,
}

impl BuildPlan {
    /// Output directory name: family lowercased with spaces removed.
    pub fn slug(&self) -> String {
        self.family.to_lowercase().replace(' ', "")
    }
}

/// Split a CamelCase plan name into a spaced family name.
fn camel_to_family(name: &str) -> String {
    let mut out = String::with_capacity(name.len() + 4);
    let mut prev_lower = false;
    for ch in name.chars() {
        if ch.is_uppercase() && prev_lower {
            out.push(' ');
        }
        prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        out.push(ch);
    }
    out
}

/// Parse the plans from a build-plans TOML file.
///
/// Parsing is line-wise: the upstream file mixes plan sections with large
/// glyph-variant blocks that are irrelevant here.
pub fn parse_build_plans(path: &Path) -> Result<Vec<BuildPlan>> {
    let content = read_to_string(path)
        .with_context(|| format!("Failed to read build plans: {}", path.display()))?;

    let mut plans: Vec<BuildPlan> = Vec::new();
    let mut in_plan_section = false;

    for line in content.lines() {
        let line = line.trim();

        if let Some(caps) = SECTION_RE.captures(line) {
            plans.push(BuildPlan {
                name: caps[1].to_string(),
                family: camel_to_family(&caps[1]),
            });
            in_plan_section = true;
            continue;
        }
        if line.starts_with('[') {
            // Any other section (including dotted variant sections) ends the plan.
            in_plan_section = false;
            continue;
        }
        if in_plan_section && let Some(caps) = FAMILY_RE.captures(line) {
            if let Some(plan) = plans.last_mut() {
                plan.family = caps[1].to_string();
            }
        }
    }

    if plans.is_empty() {
        log::warn!("no build plans found in {}", path.display());
    }
    Ok(plans)
}

/// Find one plan by name, listing the alternatives on failure.
pub fn find_plan(plans: &[BuildPlan], name: &str) -> Result<BuildPlan> {
    match plans.iter().find(|p| p.name == name) {
        Some(plan) => Ok(plan.clone()),
        None => {
            let known: Vec<&str> = plans.iter().map(|p| p.name.as_str()).collect();
            bail!("unknown build plan '{name}' (known plans: {})", known.join(", "))
        }
    }
}
