//! FILENAME: core/pivot-engine/src/settings.rs
//! Saved pivot settings.
//!
//! One JSON document holds everything needed to reproduce a pivot: the
//! configuration, display options, cell format, conditional rules, filters
//! and sorts. Missing sections fall back to their defaults, so documents
//! written by older versions still load.

use pivot_data::{CellFormat, Record};
use serde::{Deserialize, Serialize};

use crate::conditional::ConditionalRule;
use crate::definition::{DisplayOptions, PivotConfig, SortState};
use crate::engine::{calculate_pivot, PivotData};
use crate::error::PivotError;
use crate::filter::FilterState;
use crate::view::{render_view, PivotView};
use crate::{log_info, log_warn};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PivotSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Free-form save date, kept as written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub pivot_config: PivotConfig,
    pub display_options: DisplayOptions,
    pub cell_format: CellFormat,
    pub conditional_rules: Vec<ConditionalRule>,
    pub field_filters: FilterState,
    pub field_sorts: SortState,
}

impl PivotSettings {
    pub fn new(pivot_config: PivotConfig) -> Self {
        PivotSettings {
            pivot_config,
            ..PivotSettings::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, PivotError> {
        let settings: PivotSettings = serde_json::from_str(json).map_err(|e| {
            log_warn!("SETTINGS", "failed to parse settings: {}", e);
            PivotError::from(e)
        })?;
        log_info!(
            "SETTINGS",
            "loaded settings name={:?} rows={} cols={} values={}",
            settings.name,
            settings.pivot_config.rows.len(),
            settings.pivot_config.cols.len(),
            settings.pivot_config.values.len()
        );
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, PivotError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Filters, builds and sorts `records` with these settings.
    pub fn calculate(&self, records: &[Record]) -> PivotData {
        calculate_pivot(records, &self.pivot_config, &self.field_filters, &self.field_sorts)
    }

    pub fn render(&self, data: &PivotData) -> PivotView {
        render_view(data, &self.cell_format, &self.conditional_rules, &self.display_options)
    }

    /// Calculates and renders in one go. `None` when no field is placed in
    /// any zone.
    pub fn view(&self, records: &[Record]) -> Option<PivotView> {
        if self.pivot_config.is_empty() {
            return None;
        }
        Some(self.render(&self.calculate(records)))
    }

    /// Drops filter entries that no longer restrict `records`.
    pub fn normalize_filters(&mut self, records: &[Record]) {
        self.field_filters.normalize(records);
    }
}
