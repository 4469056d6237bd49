/// Versioned analysis session: the caller-owned configuration snapshot
/// (merges, selections, mass allocations, escalation years) plus a revision
/// number bumped on every change. Analysis re-derives everything from it.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{info, warn};

use crate::allocation::MassAllocation;
use crate::config::EstimatorConfig;
use crate::errors::{ConfigError, EstimateError, WbsError};
use crate::estimate::{analyze_sheet, SheetAnalysis, SubsystemConfig};
use crate::inflation::{Escalation, InflationIndex};
use crate::rollup::CostRollup;
use crate::sheet::{HistoricalSheet, RawSheet};
use crate::wbs::{dissolve_merge, MergeDefinition, WbsGrouping};

#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    pub config: EstimatorConfig,
    subsystems: BTreeMap<String, SubsystemConfig>,
    revision: u64,
}

/// A sheet that could not be analysed, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedSheet {
    pub sheet: String,
    pub reason: String,
}

/// Everything derived from one session revision.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub revision: u64,
    pub escalation: Escalation,
    pub analyses: Vec<SheetAnalysis>,
    pub skipped: Vec<SkippedSheet>,
    pub rollup: CostRollup,
}

impl SessionReport {
    pub fn analysis(&self, sheet: &str) -> Option<&SheetAnalysis> {
        self.analyses.iter().find(|a| a.sheet == sheet)
    }
}

impl AnalysisSession {
    pub fn new(config: EstimatorConfig) -> Self {
        Self {
            config,
            subsystems: BTreeMap::new(),
            revision: 0,
        }
    }

    /// Current revision; changes whenever any setting changes.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    fn bump(&mut self) {
        self.revision += 1;
    }

    pub fn subsystem(&self, sheet: &str) -> Option<&SubsystemConfig> {
        self.subsystems.get(sheet)
    }

    fn subsystem_mut(&mut self, sheet: &str) -> &mut SubsystemConfig {
        let unit = self.config.mass_unit;
        self.subsystems
            .entry(sheet.to_string())
            .or_insert_with(|| SubsystemConfig::new(unit))
    }

    /// Define a merge group for `sheet`. Rejected merges leave the session
    /// (and its revision) untouched.
    pub fn add_merge<S: AsRef<str>>(
        &mut self,
        sheet: &HistoricalSheet,
        name: &str,
        members: &[S],
    ) -> Result<(), WbsError> {
        let mut grouping = WbsGrouping::new(sheet.distinct_labels());
        if let Some(existing) = self.subsystems.get(&sheet.name) {
            for merge in &existing.merges {
                grouping.add_merge(&merge.name, &merge.members)?;
            }
        }
        grouping.add_merge(name, members)?;
        let added = grouping.merges().last().cloned();

        let config = self.subsystem_mut(&sheet.name);
        config.merges.extend(added);
        self.bump();
        Ok(())
    }

    pub fn remove_merge(&mut self, sheet: &str, name: &str) -> Option<MergeDefinition> {
        let config = self.subsystems.get_mut(sheet)?;
        let removed = dissolve_merge(&mut config.merges, name)?;
        config.selection.include(name);
        self.bump();
        Some(removed)
    }

    /// Drop every merge on `sheet`; labels return to their own groups.
    pub fn clear_merges(&mut self, sheet: &str) {
        if let Some(config) = self.subsystems.get_mut(sheet) {
            for merge in config.merges.drain(..) {
                config.selection.include(&merge.name);
            }
            self.bump();
        }
    }

    pub fn exclude_group(&mut self, sheet: &str, group: &str) {
        self.subsystem_mut(sheet).selection.exclude(group);
        self.bump();
    }

    pub fn include_group(&mut self, sheet: &str, group: &str) {
        self.subsystem_mut(sheet).selection.include(group);
        self.bump();
    }

    pub fn set_allocation(&mut self, sheet: &str, allocation: MassAllocation) {
        self.subsystem_mut(sheet).allocation = allocation;
        self.bump();
    }

    /// Change the escalation years; both must be in `index`.
    pub fn set_years(&mut self, index: &InflationIndex, base_year: i32, target_year: i32) -> Result<(), ConfigError> {
        let config = EstimatorConfig {
            base_year: Some(base_year),
            target_year: Some(target_year),
            ..self.config.clone()
        };
        config.validate_years(index)?;
        self.config = config;
        self.bump();
        Ok(())
    }

    /// Resolve and analyse every raw sheet. Sheets that fail validation are
    /// listed as skipped; the rest still produce results. A year missing from
    /// `index` escalates neutrally and shows up as a caveat on each sheet.
    pub fn analyze(&self, sheets: &[RawSheet], index: &InflationIndex) -> Result<SessionReport, ConfigError> {
        let escalation = self.config.escalation(index)?;
        let tolerance = self.config.effective_mass_tolerance();
        let default_config = SubsystemConfig::new(self.config.mass_unit);

        let mut analyses = Vec::new();
        let mut skipped = Vec::new();
        let mut rollup = CostRollup::new();

        for raw in sheets {
            let outcome = raw
                .resolve()
                .map_err(EstimateError::from)
                .and_then(|sheet| {
                    let config = self.subsystems.get(&raw.name).unwrap_or(&default_config);
                    analyze_sheet(&sheet, config, escalation, tolerance)
                });
            match outcome {
                Ok(analysis) => {
                    rollup.add_sheet(&analysis);
                    analyses.push(analysis);
                }
                Err(e) => {
                    warn!(sheet = %raw.name, error = %e, "skipping sheet");
                    skipped.push(SkippedSheet {
                        sheet: raw.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            revision = self.revision,
            analysed = analyses.len(),
            skipped = skipped.len(),
            "session analysed"
        );
        Ok(SessionReport {
            revision: self.revision,
            escalation,
            analyses,
            skipped,
            rollup,
        })
    }
}
