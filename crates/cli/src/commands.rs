//! Subcommand implementations. Output goes to any `Write` so tests can
//! capture it.

use std::{io::Write, path::Path, sync::Arc};

use anyhow::{anyhow, bail, Context, Result};
use muster_core::{
    Catalog, CatalogDocument, CatalogLoader, CategoryView, MusterPolicy, RosterEngine, RuleKind,
    SelectionState,
};
use tracing::{info, warn};

/// Inputs for the `build` subcommand.
pub struct BuildRequest {
    pub faction: String,
    pub detachment: String,
    pub adds: Vec<String>,
    pub policy: MusterPolicy,
    pub json: bool,
}

/// Print every integrity issue in the document; fail if there are any.
pub fn validate(path: &Path, out: &mut impl Write) -> Result<()> {
    let document = CatalogDocument::read(path)?;
    let issues = document.validate();
    if issues.is_empty() {
        let units: usize = document.factions.iter().map(|f| f.units.len()).sum();
        writeln!(
            out,
            "{}: ok ({} factions, {} units)",
            path.display(),
            document.factions.len(),
            units
        )?;
        info!("validation passed");
        return Ok(());
    }

    for issue in &issues {
        writeln!(out, "{}: {issue}", path.display())?;
    }
    bail!("{} integrity issue(s) in {}", issues.len(), path.display())
}

/// List factions, or one faction's detachments and units.
pub fn list(
    loader: &CatalogLoader,
    faction_id: Option<&str>,
    search: &str,
    out: &mut impl Write,
) -> Result<()> {
    let Some(faction_id) = faction_id else {
        for faction in loader.factions_matching(search)? {
            writeln!(
                out,
                "{:<20} {} ({} detachments, {} units)",
                faction.id,
                faction.name,
                faction.detachments.len(),
                faction.units.len()
            )?;
        }
        return Ok(());
    };

    let catalog = loader.catalog()?;
    let faction = catalog
        .faction(faction_id)
        .ok_or_else(|| anyhow!("unknown faction '{faction_id}'"))?;

    writeln!(out, "{}", faction.name)?;
    writeln!(out, "Detachments:")?;
    for detachment in &faction.detachments {
        writeln!(
            out,
            "  {:<24} {} [{}]",
            detachment.id, detachment.name, detachment.detachment_rule.name
        )?;
    }
    writeln!(out, "Units:")?;
    for unit in faction.units_matching(search) {
        writeln!(
            out,
            "  {:<28} {:>4} pts  {}",
            unit.id,
            unit.points,
            unit.keywords.join(", ")
        )?;
    }
    Ok(())
}

/// Select, apply adds in order, then print the resulting roster.
///
/// Rejected adds are reported and skipped; they do not fail the command.
pub fn build(catalog: Arc<Catalog>, request: &BuildRequest, out: &mut impl Write) -> Result<()> {
    let mut engine = RosterEngine::new(catalog).with_policy(request.policy);
    engine.select_faction(&request.faction);
    if engine.selection_state() == SelectionState::NoFaction {
        bail!("unknown faction '{}'", request.faction);
    }
    engine.select_detachment(&request.detachment);
    if engine.selection_state() != SelectionState::DetachmentSelected {
        bail!(
            "faction '{}' has no detachment '{}'",
            request.faction,
            request.detachment
        );
    }

    let mut rejected = Vec::new();
    for unit_id in &request.adds {
        if let Err(err) = engine.add_unit_by_id(unit_id) {
            warn!("skipping {unit_id}: {err}");
            rejected.push(err.to_string());
        }
    }

    if request.json {
        let snapshot = engine.snapshot();
        serde_json::to_writer_pretty(&mut *out, &snapshot).context("failed to write snapshot")?;
        writeln!(out)?;
        return Ok(());
    }

    render_roster(&engine, &rejected, out)
}

fn render_roster(engine: &RosterEngine, rejected: &[String], out: &mut impl Write) -> Result<()> {
    let (Some(faction), Some(detachment)) = (engine.faction(), engine.detachment()) else {
        return Ok(());
    };

    writeln!(
        out,
        "{} / {}    Points: {}",
        faction.name,
        detachment.name,
        engine.points_label()
    )?;
    writeln!(
        out,
        "Rule: {}: {}",
        detachment.detachment_rule.name, detachment.detachment_rule.description
    )?;

    for category in engine.categorized_view() {
        render_category(&category, out)?;
    }

    writeln!(out)?;
    writeln!(out, "Roster:")?;
    if engine.entries().is_empty() {
        writeln!(out, "  (empty)")?;
    }
    for entry in engine.entries() {
        writeln!(
            out,
            "  {:<5} {:<28} {:>4} pts",
            entry.entry_id.to_string(),
            entry.unit.name,
            entry.unit.points
        )?;
    }
    writeln!(out, "Total: {} pts", engine.total_points())?;

    for reason in rejected {
        writeln!(out, "Rejected: {reason}")?;
    }
    Ok(())
}

fn render_category(category: &CategoryView, out: &mut impl Write) -> Result<()> {
    writeln!(out)?;
    match &category.header_limit {
        Some(limit) => writeln!(out, "{} [{}]", category.category_name, limit)?,
        None => writeln!(out, "{}", category.category_name)?,
    }
    for offer in &category.units {
        let marker = if offer.is_disabled { "-" } else { "+" };
        let count = if category.rule_type == RuleKind::SelectUpToXEach
            && offer.specific_unit_count > 0
        {
            format!("  x{}", offer.specific_unit_count)
        } else {
            String::new()
        };
        writeln!(
            out,
            "  {marker} {:<28} {:>4} pts{count}",
            offer.unit.name, offer.unit.points
        )?;
    }
    Ok(())
}
