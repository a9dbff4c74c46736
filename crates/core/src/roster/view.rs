//! Categorized availability derived from a rule set and a roster.

use serde::Serialize;

use crate::models::{Detachment, Faction, MusteringRule, RuleKind, RuleLimit, Unit};

use super::entry::RosterEntry;

/// Why a unit cannot currently be selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BlockReason {
    /// The category's shared cap is used up.
    CategoryFull {
        /// Selections counted against the category.
        used: u32,
        /// Category cap.
        limit: u32,
    },
    /// This unit has reached its own cap.
    UnitLimitReached {
        /// Copies of the unit already selected.
        count: u32,
        /// Per-unit cap.
        limit: u32,
    },
}

/// A unit offered in a category, annotated with its current availability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitAvailability {
    /// The offered unit.
    #[serde(flatten)]
    pub unit: Unit,
    /// Copies of this exact unit already in the roster.
    pub specific_unit_count: u32,
    /// Whether the unit may not be added right now.
    pub is_disabled: bool,
    /// Set whenever `is_disabled` is.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<BlockReason>,
}

/// One displayable mustering rule and the units it offers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    /// Category display name.
    pub category_name: String,
    /// Kind of the underlying rule.
    pub rule_type: RuleKind,
    /// `"{used} / {limit}"` for shared-cap categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_limit: Option<String>,
    /// Selections counted against the category.
    pub category_total_count: u32,
    /// Offered units in faction order.
    pub units: Vec<UnitAvailability>,
}

impl CategoryView {
    /// Look up a unit offered in this category.
    pub fn unit(&self, unit_id: &str) -> Option<&UnitAvailability> {
        self.units.iter().find(|offer| offer.unit.id == unit_id)
    }
}

/// Compute the categorized view for `detachment` over `entries`.
///
/// One record per rule with an allowed-unit set, in declared order. A unit
/// governed by several rules is listed under each of them and evaluated
/// independently.
pub fn categorize(
    faction: &Faction,
    detachment: &Detachment,
    entries: &[RosterEntry],
) -> Vec<CategoryView> {
    detachment
        .displayable_rules()
        .map(|(rule, limit)| categorize_rule(faction, rule, limit, entries))
        .collect()
}

fn categorize_rule(
    faction: &Faction,
    rule: &MusteringRule,
    limit: RuleLimit,
    entries: &[RosterEntry],
) -> CategoryView {
    let category_total_count = count_where(entries, |entry| rule.allows(entry.unit_id()));

    let units = faction
        .units
        .iter()
        .filter(|unit| rule.allows(&unit.id))
        .map(|unit| {
            let specific_unit_count = count_where(entries, |entry| entry.unit_id() == unit.id);
            let block_reason = block_reason(limit, category_total_count, specific_unit_count);
            UnitAvailability {
                unit: unit.clone(),
                specific_unit_count,
                is_disabled: block_reason.is_some(),
                block_reason,
            }
        })
        .collect();

    let header_limit = match limit {
        RuleLimit::Total(limit) => Some(format!("{category_total_count} / {limit}")),
        RuleLimit::PerUnit(_) => None,
    };

    CategoryView {
        category_name: rule.category_name.clone(),
        rule_type: rule.kind,
        header_limit,
        category_total_count,
        units,
    }
}

/// Decide whether a unit is blocked under a single rule.
pub fn block_reason(limit: RuleLimit, category_count: u32, unit_count: u32) -> Option<BlockReason> {
    match limit {
        RuleLimit::Total(limit) if category_count >= limit => Some(BlockReason::CategoryFull {
            used: category_count,
            limit,
        }),
        RuleLimit::PerUnit(limit) if unit_count >= limit => Some(BlockReason::UnitLimitReached {
            count: unit_count,
            limit,
        }),
        _ => None,
    }
}

fn count_where(entries: &[RosterEntry], predicate: impl Fn(&RosterEntry) -> bool) -> u32 {
    let count = entries.iter().filter(|&entry| predicate(entry)).count();
    u32::try_from(count).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::fixtures, roster::entry::EntryId};

    fn entries_for(faction: &Faction, unit_ids: &[&str]) -> Vec<RosterEntry> {
        unit_ids
            .iter()
            .enumerate()
            .map(|(index, id)| {
                let unit = faction.unit(id).expect("fixture unit").clone();
                RosterEntry::new(EntryId::from(index as u64 + 1), unit)
            })
            .collect()
    }

    #[test]
    fn shared_cap_blocks_whole_category() {
        let catalog = fixtures::catalog();
        let faction = catalog.faction("sm").expect("sm");
        let detachment = faction.detachment("strike").expect("strike");

        let view = categorize(faction, detachment, &entries_for(faction, &["capt"]));
        let leaders = &view[0];
        assert_eq!(leaders.header_limit.as_deref(), Some("1 / 2"));
        assert!(leaders.units.iter().all(|offer| !offer.is_disabled));

        let view = categorize(faction, detachment, &entries_for(faction, &["capt", "lt"]));
        let leaders = &view[0];
        assert_eq!(leaders.header_limit.as_deref(), Some("2 / 2"));
        assert!(leaders.units.iter().all(|offer| offer.is_disabled));
        assert_eq!(
            leaders.unit("ancient").and_then(|offer| offer.block_reason),
            Some(BlockReason::CategoryFull { used: 2, limit: 2 })
        );
    }

    #[test]
    fn per_unit_cap_ignores_siblings() {
        let catalog = fixtures::catalog();
        let faction = catalog.faction("sm").expect("sm");
        let detachment = faction.detachment("strike").expect("strike");

        let view = categorize(
            faction,
            detachment,
            &entries_for(faction, &["scout", "scout", "scout"]),
        );
        let troops = &view[1];
        assert_eq!(troops.header_limit, None);
        assert_eq!(troops.category_total_count, 3);

        let scout = troops.unit("scout").expect("scout offered");
        assert_eq!(scout.specific_unit_count, 3);
        assert!(scout.is_disabled);
        assert_eq!(
            scout.block_reason,
            Some(BlockReason::UnitLimitReached { count: 3, limit: 3 })
        );

        let intercessors = troops.unit("intercessors").expect("intercessors offered");
        assert_eq!(intercessors.specific_unit_count, 0);
        assert!(!intercessors.is_disabled);
    }

    #[test]
    fn units_keep_faction_order_and_skip_informational_rules() {
        let catalog = fixtures::catalog();
        let faction = catalog.faction("sm").expect("sm");
        let detachment = faction.detachment("strike").expect("strike");

        let view = categorize(faction, detachment, &[]);
        let names: Vec<_> = view.iter().map(|c| c.category_name.as_str()).collect();
        assert_eq!(names, vec!["Leaders", "Troops", "Elites"]);

        // The allowed set is declared in reverse; offers follow faction order.
        let leader_ids: Vec<_> = view[0].units.iter().map(|o| o.unit.id.as_str()).collect();
        assert_eq!(leader_ids, vec!["capt", "lt", "ancient"]);
    }

    #[test]
    fn shared_unit_is_evaluated_per_category() {
        let catalog = fixtures::catalog();
        let faction = catalog.faction("sm").expect("sm");
        let detachment = faction.detachment("strike").expect("strike");

        let view = categorize(faction, detachment, &entries_for(faction, &["ancient"]));
        let in_leaders = view[0].unit("ancient").expect("leaders lists ancient");
        let in_elites = view[2].unit("ancient").expect("elites lists ancient");

        assert_eq!(in_leaders.specific_unit_count, 1);
        assert!(!in_leaders.is_disabled);
        assert_eq!(in_elites.specific_unit_count, 1);
        assert!(in_elites.is_disabled);
    }

    #[test]
    fn zero_limit_blocks_immediately() {
        assert_eq!(
            block_reason(RuleLimit::Total(0), 0, 0),
            Some(BlockReason::CategoryFull { used: 0, limit: 0 })
        );
        assert_eq!(block_reason(RuleLimit::PerUnit(2), 9, 1), None);
    }

    #[test]
    fn view_serializes_for_presentation() {
        let catalog = fixtures::catalog();
        let faction = catalog.faction("sm").expect("sm");
        let detachment = faction.detachment("strike").expect("strike");

        let view = categorize(faction, detachment, &entries_for(faction, &["capt"]));
        let value = serde_json::to_value(&view).expect("serialize");
        assert_eq!(value[0]["categoryName"], "Leaders");
        assert_eq!(value[0]["ruleType"], "select_up_to_x");
        assert_eq!(value[0]["headerLimit"], "1 / 2");
        assert_eq!(value[0]["units"][0]["specificUnitCount"], 1);
        assert_eq!(value[0]["units"][0]["isDisabled"], false);
        assert!(value[1].get("headerLimit").is_none());
    }
}
