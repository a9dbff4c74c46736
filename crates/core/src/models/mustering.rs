use serde::{Deserialize, Serialize};

/// Wire name of a mustering rule's kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    /// Caps the combined count of every unit in the allowed set.
    SelectUpToX,
    /// Caps each allowed unit independently.
    SelectUpToXEach,
}

impl RuleKind {
    /// Identifier used in catalog documents.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SelectUpToX => "select_up_to_x",
            Self::SelectUpToXEach => "select_up_to_x_each",
        }
    }

    /// Document field that carries this kind's cap.
    pub const fn limit_field(&self) -> &'static str {
        match self {
            Self::SelectUpToX => "limit",
            Self::SelectUpToXEach => "limit_per_unit",
        }
    }
}

/// Selection cap carried by a mustering rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleLimit {
    /// At most `n` units in total across the category.
    Total(u32),
    /// At most `n` copies of each unit in the category.
    PerUnit(u32),
}

impl RuleLimit {
    /// The numeric cap regardless of kind.
    pub const fn value(&self) -> u32 {
        match self {
            Self::Total(value) | Self::PerUnit(value) => *value,
        }
    }
}

/// A constraint on which units a detachment may muster, and how many.
///
/// A rule with an allowed-unit set always carries a cap of its kind. Rules
/// without a set are informational: they may omit the cap and never form a
/// category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawMusteringRule", into = "RawMusteringRule")]
pub struct MusteringRule {
    /// Display name of the category this rule produces.
    pub category_name: String,
    /// Rule kind as it appears in catalog documents.
    pub kind: RuleKind,
    /// Kind-specific cap.
    pub limit: Option<RuleLimit>,
    /// Unit identifiers governed by the rule.
    pub allowed_units: Option<Vec<String>>,
}

impl MusteringRule {
    /// The cap of a rule that forms a category; `None` for informational rules.
    pub fn category_limit(&self) -> Option<RuleLimit> {
        self.allowed_units.as_ref().and(self.limit)
    }

    /// Whether the given unit identifier is governed by this rule.
    pub fn allows(&self, unit_id: &str) -> bool {
        self.allowed_units
            .as_deref()
            .map(|units| units.iter().any(|allowed| allowed == unit_id))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawMusteringRule {
    category_name: String,
    #[serde(rename = "type")]
    kind: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    limit_per_unit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    allowed_units: Option<Vec<String>>,
}

impl TryFrom<RawMusteringRule> for MusteringRule {
    type Error = String;

    fn try_from(raw: RawMusteringRule) -> Result<Self, Self::Error> {
        let limit = match raw.kind {
            RuleKind::SelectUpToX => raw.limit.map(RuleLimit::Total),
            RuleKind::SelectUpToXEach => raw.limit_per_unit.map(RuleLimit::PerUnit),
        };
        if limit.is_none() && raw.allowed_units.is_some() {
            return Err(format!(
                "mustering rule '{}' of type {} is missing '{}'",
                raw.category_name,
                raw.kind.as_str(),
                raw.kind.limit_field()
            ));
        }

        Ok(Self {
            category_name: raw.category_name,
            kind: raw.kind,
            limit,
            allowed_units: raw.allowed_units,
        })
    }
}

impl From<MusteringRule> for RawMusteringRule {
    fn from(rule: MusteringRule) -> Self {
        let (limit, limit_per_unit) = match rule.limit {
            Some(RuleLimit::Total(value)) => (Some(value), None),
            Some(RuleLimit::PerUnit(value)) => (None, Some(value)),
            None => (None, None),
        };
        Self {
            category_name: rule.category_name,
            kind: rule.kind,
            limit,
            limit_per_unit,
            allowed_units: rule.allowed_units,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_both_rule_kinds() {
        let total: MusteringRule = serde_json::from_value(json!({
            "category_name": "Leaders",
            "type": "select_up_to_x",
            "limit": 2,
            "allowed_units": ["capt", "lt"]
        }))
        .expect("total rule");
        assert_eq!(total.limit, Some(RuleLimit::Total(2)));
        assert_eq!(total.kind, RuleKind::SelectUpToX);
        assert_eq!(total.category_limit(), Some(RuleLimit::Total(2)));
        assert!(total.allows("lt"));
        assert!(!total.allows("scout"));

        let each: MusteringRule = serde_json::from_value(json!({
            "category_name": "Troops",
            "type": "select_up_to_x_each",
            "limit_per_unit": 3,
            "allowed_units": ["scout"]
        }))
        .expect("per-unit rule");
        assert_eq!(each.limit, Some(RuleLimit::PerUnit(3)));
        assert_eq!(each.limit.map(|limit| limit.value()), Some(3));
    }

    #[test]
    fn categorized_rule_missing_its_limit_is_rejected() {
        let err = serde_json::from_value::<MusteringRule>(json!({
            "category_name": "Troops",
            "type": "select_up_to_x_each",
            "limit": 3,
            "allowed_units": ["scout"]
        }))
        .expect_err("limit_per_unit is required");
        assert!(err.to_string().contains("limit_per_unit"));
    }

    #[test]
    fn informational_rule_may_omit_its_limit() {
        let notes: MusteringRule = serde_json::from_value(json!({
            "category_name": "Notes",
            "type": "select_up_to_x_each"
        }))
        .expect("informational rule");
        assert_eq!(notes.kind, RuleKind::SelectUpToXEach);
        assert_eq!(notes.limit, None);
        assert_eq!(notes.category_limit(), None);
        assert!(!notes.allows("scout"));

        let value = serde_json::to_value(&notes).expect("serialize");
        assert_eq!(
            value,
            json!({ "category_name": "Notes", "type": "select_up_to_x_each" })
        );
    }

    #[test]
    fn informational_rule_with_a_limit_has_no_category() {
        let notes: MusteringRule = serde_json::from_value(json!({
            "category_name": "Notes",
            "type": "select_up_to_x",
            "limit": 0
        }))
        .expect("informational rule");
        assert_eq!(notes.limit, Some(RuleLimit::Total(0)));
        assert_eq!(notes.category_limit(), None);
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result = serde_json::from_value::<MusteringRule>(json!({
            "category_name": "Troops",
            "type": "select_all",
            "limit": 3
        }));
        assert!(result.is_err());
    }

    #[test]
    fn serializes_back_to_catalog_shape() {
        let rule = MusteringRule {
            category_name: "Leaders".to_string(),
            kind: RuleKind::SelectUpToX,
            limit: Some(RuleLimit::Total(1)),
            allowed_units: None,
        };
        let value = serde_json::to_value(&rule).expect("serialize");
        assert_eq!(
            value,
            json!({ "category_name": "Leaders", "type": "select_up_to_x", "limit": 1 })
        );
        assert!(!rule.allows("capt"));
    }
}
