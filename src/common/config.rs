use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::layout_engine::GridError;

pub const DEFAULT_CONFIG: &str = include_str!("../../paged-grid.default.toml");

pub fn config_file() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("paged-grid")
        .join("config.toml")
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Default)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub grid: GridSettings,
    #[serde(default)]
    pub edge_flip: EdgeFlipSettings,
    #[serde(default)]
    pub animation: AnimationSettings,
}

/// Static geometry of the paged grid.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct GridSettings {
    #[serde(default = "default_items_per_row")]
    pub items_per_row: usize,
    #[serde(default = "default_rows_per_page")]
    pub rows_per_page: usize,
    #[serde(default = "default_margin_left")]
    pub margin_left: f64,
    #[serde(default = "default_margin_top")]
    pub margin_top: f64,
    #[serde(default = "default_page_width")]
    pub page_width: f64,
    /// Added to every measured width and height before layout.
    #[serde(default = "default_spacing")]
    pub spacing: f64,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            items_per_row: default_items_per_row(),
            rows_per_page: default_rows_per_page(),
            margin_left: default_margin_left(),
            margin_top: default_margin_top(),
            page_width: default_page_width(),
            spacing: default_spacing(),
        }
    }
}

/// Page flips triggered by holding a dragged tile past a page edge.
#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct EdgeFlipSettings {
    #[serde(default = "default_dwell_ms")]
    pub dwell_ms: u64,
    /// Share of the tile width that must cross the left page edge.
    #[serde(default = "default_edge_fraction")]
    pub backward_fraction: f64,
    /// Share of the tile width measured back from the right page edge.
    #[serde(default = "default_edge_fraction")]
    pub forward_fraction: f64,
}

impl Default for EdgeFlipSettings {
    fn default() -> Self {
        Self {
            dwell_ms: default_dwell_ms(),
            backward_fraction: default_edge_fraction(),
            forward_fraction: default_edge_fraction(),
        }
    }
}

impl EdgeFlipSettings {
    pub fn dwell(&self) -> Duration { Duration::from_millis(self.dwell_ms) }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        for (name, value) in [
            ("backward_fraction", self.backward_fraction),
            ("forward_fraction", self.forward_fraction),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                issues.push(format!("edge_flip.{name} must be within 0..=1, got {value}"));
            }
        }

        issues
    }
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone)]
#[serde(deny_unknown_fields)]
pub struct AnimationSettings {
    /// How long displaced tiles take to glide to their new slot.
    #[serde(default = "default_settle_duration_ms")]
    pub settle_duration_ms: u64,
}

impl Default for AnimationSettings {
    fn default() -> Self {
        Self {
            settle_duration_ms: default_settle_duration_ms(),
        }
    }
}

impl GridSettings {
    /// `None` when the product does not fit in a `usize`.
    pub fn items_per_page(&self) -> Option<usize> {
        self.items_per_row.checked_mul(self.rows_per_page)
    }

    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.items_per_row == 0 {
            issues.push("grid.items_per_row must be at least 1".to_string());
        }

        if self.rows_per_page == 0 {
            issues.push("grid.rows_per_page must be at least 1".to_string());
        }

        if self.items_per_page().is_none() {
            issues.push(format!(
                "grid.items_per_row * grid.rows_per_page overflows ({} * {})",
                self.items_per_row, self.rows_per_page
            ));
        }

        if !self.page_width.is_finite() || self.page_width <= 0.0 {
            issues.push(format!(
                "grid.page_width must be positive, got {}",
                self.page_width
            ));
        }

        for (name, value) in [
            ("margin_left", self.margin_left),
            ("margin_top", self.margin_top),
            ("spacing", self.spacing),
        ] {
            if !value.is_finite() || value < 0.0 {
                issues.push(format!("grid.{name} must be non-negative, got {value}"));
            }
        }

        issues
    }
}

impl Config {
    pub fn read(path: &Path) -> anyhow::Result<Config> {
        let buf = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&buf)
    }

    pub fn parse(buf: &str) -> anyhow::Result<Config> { Ok(toml::from_str(buf)?) }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let toml_string = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml_string.as_bytes())?;

        Ok(())
    }

    /// Validates the entire configuration and returns a list of issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        issues.extend(self.grid.validate());
        issues.extend(self.edge_flip.validate());
        issues
    }
}

/// Validated grid geometry. Once built it never changes for the lifetime of
/// an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridConfig {
    items_per_row: usize,
    rows_per_page: usize,
    items_per_page: usize,
    pub margin_left: f64,
    pub margin_top: f64,
    pub page_width: f64,
    pub spacing: f64,
}

impl GridConfig {
    pub fn new(settings: &GridSettings) -> Result<Self, GridError> {
        let issues = settings.validate();
        let items_per_page = match settings.items_per_page() {
            Some(items_per_page) if issues.is_empty() => items_per_page,
            _ => return Err(GridError::InvalidConfig(issues)),
        };
        Ok(Self {
            items_per_row: settings.items_per_row,
            rows_per_page: settings.rows_per_page,
            items_per_page,
            margin_left: settings.margin_left,
            margin_top: settings.margin_top,
            page_width: settings.page_width,
            spacing: settings.spacing,
        })
    }

    pub fn items_per_row(&self) -> usize { self.items_per_row }

    pub fn rows_per_page(&self) -> usize { self.rows_per_page }

    pub fn items_per_page(&self) -> usize { self.items_per_page }

    pub fn page_of(&self, order: usize) -> usize { order / self.items_per_page }

    pub fn first_slot_of_page(&self, page: usize) -> usize { page * self.items_per_page }

    pub fn page_count(&self, tiles: usize) -> usize { tiles.div_ceil(self.items_per_page) }
}

fn default_items_per_row() -> usize { 3 }

fn default_rows_per_page() -> usize { 4 }

fn default_margin_left() -> f64 { 16.0 }

fn default_margin_top() -> f64 { 4.0 }

fn default_page_width() -> f64 { 300.0 }

fn default_spacing() -> f64 { 5.0 }

fn default_dwell_ms() -> u64 { 500 }

fn default_edge_fraction() -> f64 { 0.25 }

fn default_settle_duration_ms() -> u64 { 200 }
