/// WBS grouping: how raw WBS line items are merged into named analysis groups.
/// Every original label belongs to exactly one group at analysis time.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::errors::WbsError;

/// A user-defined merge of several original labels under one name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeDefinition {
    pub name: String,
    pub members: Vec<String>,
}

/// A named analysis unit: a lone original label or a merge group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WbsGroup {
    pub name: String,
    pub members: Vec<String>,
    pub merged: bool,
}

impl WbsGroup {
    fn single(label: &str) -> Self {
        Self {
            name: label.to_string(),
            members: vec![label.to_string()],
            merged: false,
        }
    }

    fn from_merge(def: &MergeDefinition) -> Self {
        Self {
            name: def.name.clone(),
            members: def.members.clone(),
            merged: true,
        }
    }
}

/// The distinct labels of one sheet plus the merges defined over them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WbsGrouping {
    labels: Vec<String>,
    merges: Vec<MergeDefinition>,
}

impl WbsGrouping {
    /// Labels are sorted and de-duplicated.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: BTreeSet<String> = labels.into_iter().map(Into::into).collect();
        Self {
            labels: labels.into_iter().collect(),
            merges: Vec::new(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn merges(&self) -> &[MergeDefinition] {
        &self.merges
    }

    /// Name of the merge group that has consumed `label`, if any.
    pub fn merged_into(&self, label: &str) -> Option<&str> {
        self.merges
            .iter()
            .find(|m| m.members.iter().any(|l| l == label))
            .map(|m| m.name.as_str())
    }

    /// Add a merge group. All checks run before anything changes, so a
    /// rejected merge leaves the grouping exactly as it was.
    pub fn add_merge<S: AsRef<str>>(&mut self, name: &str, members: &[S]) -> Result<(), WbsError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(WbsError::BlankName);
        }
        if self.merges.iter().any(|m| m.name == name) {
            return Err(WbsError::GroupExists(name.to_string()));
        }

        let mut unique: Vec<String> = Vec::new();
        for member in members {
            let label: &str = member.as_ref();
            if !self.labels.iter().any(|l| l == label) {
                return Err(WbsError::UnknownLabel(label.to_string()));
            }
            if let Some(group) = self.merged_into(label) {
                return Err(WbsError::AlreadyMerged {
                    label: label.to_string(),
                    group: group.to_string(),
                });
            }
            if !unique.iter().any(|l| l == label) {
                unique.push(label.to_string());
            }
        }
        if unique.is_empty() {
            return Err(WbsError::NoMembers(name.to_string()));
        }
        // An unmerged label with the same name would make the group list ambiguous
        if self.labels.iter().any(|l| l == name)
            && !unique.iter().any(|l| l == name)
            && self.merged_into(name).is_none()
        {
            return Err(WbsError::NameClash(name.to_string()));
        }

        self.merges.push(MergeDefinition {
            name: name.to_string(),
            members: unique,
        });
        Ok(())
    }

    /// Dissolve a merge group, returning its members to the unmerged pool.
    pub fn remove_merge(&mut self, name: &str) -> Option<MergeDefinition> {
        dissolve_merge(&mut self.merges, name)
    }

    pub fn clear_merges(&mut self) {
        self.merges.clear();
    }

    /// Canonical group list: merge groups in definition order, then every
    /// unmerged original label.
    pub fn groups(&self) -> Vec<WbsGroup> {
        let mut groups: Vec<WbsGroup> = self.merges.iter().map(WbsGroup::from_merge).collect();
        groups.extend(
            self.labels
                .iter()
                .filter(|l| self.merged_into(l).is_none())
                .map(|l| WbsGroup::single(l)),
        );
        groups
    }

    /// The group an original label maps to. `None` for labels not in the sheet.
    pub fn group_of(&self, label: &str) -> Option<&str> {
        if let Some(group) = self.merged_into(label) {
            return Some(group);
        }
        self.labels
            .iter()
            .find(|l| *l == label)
            .map(String::as_str)
    }

    /// Canonical groups that pass the selection filter.
    pub fn selected_groups(&self, selection: &WbsSelection) -> Vec<WbsGroup> {
        self.groups()
            .into_iter()
            .filter(|g| selection.is_selected(&g.name))
            .collect()
    }
}

/// Remove merge `name` from `merges`. A freed member named like another
/// merge group joins that group.
pub fn dissolve_merge(merges: &mut Vec<MergeDefinition>, name: &str) -> Option<MergeDefinition> {
    let pos = merges.iter().position(|m| m.name == name)?;
    let removed = merges.remove(pos);
    for label in &removed.members {
        if let Some(owner) = merges.iter_mut().find(|m| m.name == *label) {
            owner.members.push(label.clone());
        }
    }
    Some(removed)
}

/// Per-session filter over the canonical group list. Everything is
/// selected until excluded; membership is never affected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WbsSelection {
    excluded: BTreeSet<String>,
}

impl WbsSelection {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn exclude(&mut self, group: &str) {
        self.excluded.insert(group.to_string());
    }

    pub fn include(&mut self, group: &str) {
        self.excluded.remove(group);
    }

    pub fn is_selected(&self, group: &str) -> bool {
        !self.excluded.contains(group)
    }
}
