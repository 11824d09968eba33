use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

/// Canonical form for controller and action names. Registration input and
/// per-request lookups both pass through here, so `"Files "` and `"files"`
/// name the same controller.
pub(crate) fn canonical(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

fn canonical_set<'de, D>(deserializer: D) -> Result<HashSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Vec::<String>::deserialize(deserializer)?;
    Ok(raw.iter().map(|c| canonical(c)).collect())
}

/// One or more action names under a single controller.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(untagged)]
pub enum Actions {
    One(String),
    Many(Vec<String>),
}

impl Actions {
    fn matches(&self, action: &str) -> bool {
        match self {
            Actions::One(a) => canonical(a) == action,
            Actions::Many(actions) => actions.iter().any(|a| canonical(a) == action),
        }
    }
}

/// Fine-grained coverage outside the blanket controller set: one controller
/// plus the specific actions guarded under it.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ActionSpec {
    pub controller: String,
    pub actions: Actions,
}

impl ActionSpec {
    pub fn new(controller: impl Into<String>, actions: Actions) -> Self {
        ActionSpec {
            controller: controller.into(),
            actions,
        }
    }
}

/// A named feature and the endpoints it guards.
///
/// Every action under a controller in `controllers` matches; `other_actions`
/// adds individual (controller, action) pairs beyond that blanket set.
/// Definitions are built at registration time and immutable afterwards.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FeatureDefinition {
    pub identifier: String,
    #[serde(deserialize_with = "canonical_set")]
    controllers: HashSet<String>,
    #[serde(default)]
    other_actions: Vec<ActionSpec>,
}

impl FeatureDefinition {
    pub fn new<I, S>(identifier: impl Into<String>, controllers: I, other_actions: Vec<ActionSpec>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        FeatureDefinition {
            identifier: identifier.into(),
            controllers: controllers.into_iter().map(|c| canonical(c.as_ref())).collect(),
            other_actions,
        }
    }

    /// Does this feature cover (controller, action)? A blanket controller
    /// match short-circuits; otherwise `other_actions` is scanned in order.
    pub fn includes_action(&self, controller: &str, action: &str) -> bool {
        let controller = canonical(controller);
        if self.controllers.contains(&controller) {
            return true;
        }
        let action = canonical(action);
        self.other_actions
            .iter()
            .any(|spec| canonical(&spec.controller) == controller && spec.actions.matches(&action))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blanket_controller_covers_every_action() {
        let files = FeatureDefinition::new("Files", ["files", "file_comments"], vec![]);
        assert!(files.includes_action("files", "index"));
        assert!(files.includes_action("files", "destroy"));
        assert!(files.includes_action("file_comments", "create"));
        assert!(!files.includes_action("wiki", "index"));
    }

    #[test]
    fn other_actions_cover_single_pairs() {
        let wiki = FeatureDefinition::new(
            "Wiki",
            ["wiki"],
            vec![ActionSpec::new("users", Actions::One("my_pages".into()))],
        );
        assert!(wiki.includes_action("users", "my_pages"));
        assert!(!wiki.includes_action("users", "edit_profile"));
    }

    #[test]
    fn other_actions_cover_action_sets() {
        let reports = FeatureDefinition::new(
            "Reports",
            Vec::<&str>::new(),
            vec![ActionSpec::new(
                "projects",
                Actions::Many(vec!["summary".into(), "export".into()]),
            )],
        );
        assert!(reports.includes_action("projects", "summary"));
        assert!(reports.includes_action("projects", "export"));
        assert!(!reports.includes_action("projects", "index"));
    }

    #[test]
    fn names_are_canonicalized_both_ways() {
        let files = FeatureDefinition::new("Files", ["Files"], vec![]);
        assert!(files.includes_action("files", "index"));
        assert!(files.includes_action(" FILES ", "index"));
    }

    #[test]
    fn empty_coverage_matches_nothing() {
        let empty = FeatureDefinition::new("Empty", Vec::<&str>::new(), vec![]);
        assert!(!empty.includes_action("files", "index"));
    }

    #[test]
    fn deserializes_from_json() {
        let json = r#"{
            "identifier": "Wiki",
            "controllers": ["Wiki"],
            "other_actions": [
                { "controller": "users", "actions": "my_pages" },
                { "controller": "projects", "actions": ["summary", "export"] }
            ]
        }"#;
        let wiki: FeatureDefinition = serde_json::from_str(json).unwrap();
        assert!(wiki.includes_action("wiki", "show"));
        assert!(wiki.includes_action("users", "my_pages"));
        assert!(wiki.includes_action("projects", "export"));
    }

    #[test]
    fn other_actions_field_is_optional_in_json() {
        let json = r#"{ "identifier": "Files", "controllers": ["files"] }"#;
        let files: FeatureDefinition = serde_json::from_str(json).unwrap();
        assert!(files.includes_action("files", "index"));
    }
}
