//! Layered tab-set settings.
//!
//! Settings resolve from four layers, lowest precedence first:
//!
//! 1. built-in defaults ([`TabsSettings::default`])
//! 2. page-wide global settings (a [`SettingsLayer`] handed to the page)
//! 3. per-instance attributes read from the host markup
//! 4. explicit construction options
//!
//! Each layer is a [`SettingsLayer`] whose unset fields fall through to the
//! layer below.

use std::fmt;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, TabsError};

/// Default hover debounce before a hover counts as activation.
pub const DEFAULT_HOVER_DELAY_MS: u64 = 80;

/// Default repeatable query key selecting initial panels.
pub const DEFAULT_QUERY_KEY: &str = "tabs";

/// Default cap on blocks a single grouping walk may consume.
pub const DEFAULT_MAX_GROUP_BLOCKS: usize = 200;

/// Orientation of the navigation strip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum LayoutMode {
    #[default]
    Horizontal,
    Vertical,
}

impl LayoutMode {
    /// Parse a layout name. Accepts the legacy `horiztonal` spelling.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "horizontal" | "horiztonal" => Ok(Self::Horizontal),
            "vertical" => Ok(Self::Vertical),
            other => Err(TabsError::Config(format!("unknown layout: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        }
    }
}

impl TryFrom<String> for LayoutMode {
    type Error = TabsError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What pointer interaction activates a tab button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum ActivationMode {
    #[default]
    Click,
    /// Pointer enter, debounced by the hover delay. Click still works.
    Hover,
}

impl ActivationMode {
    /// Parse an activation name.
    ///
    /// `hover`, `mouseover`, `mouseenter` and `pointerenter` all mean
    /// [`ActivationMode::Hover`]. This is the only normalization site.
    pub fn parse(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "click" => Ok(Self::Click),
            "hover" | "mouseover" | "mouseenter" | "pointerenter" => Ok(Self::Hover),
            other => Err(TabsError::Config(format!("unknown activation event: {other}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Hover => "hover",
        }
    }
}

impl TryFrom<String> for ActivationMode {
    type Error = TabsError;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl fmt::Display for ActivationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One settings layer. Unset fields fall through to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SettingsLayer {
    pub layout: Option<LayoutMode>,
    #[serde(alias = "activation")]
    pub event: Option<ActivationMode>,
    #[serde(alias = "tabbingDelay")]
    pub hover_delay_ms: Option<u64>,
    #[serde(alias = "inAnimation")]
    pub transition: Option<String>,
    pub query_key: Option<String>,
    pub max_group_blocks: Option<usize>,
}

impl SettingsLayer {
    /// Parse a TOML settings layer.
    pub fn from_toml(src: &str) -> Result<Self> {
        Ok(toml::from_str(src)?)
    }

    /// Parse a JSON settings layer.
    pub fn from_json(src: &str) -> Result<Self> {
        Ok(serde_json::from_str(src)?)
    }

    /// Load a settings layer from disk. `.json` files parse as JSON,
    /// everything else as TOML.
    pub fn from_file(path: &Path) -> Result<Self> {
        let src = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&src),
            _ => Self::from_toml(&src),
        }
    }

    /// Build a layer from host markup attributes (`data-layout`,
    /// `data-event`).
    ///
    /// Markup is authored by hand, so unknown values are logged and
    /// ignored rather than failing the instance.
    pub fn from_attributes(layout: Option<&str>, event: Option<&str>) -> Self {
        let layout = layout.and_then(|v| match LayoutMode::parse(v) {
            Ok(mode) => Some(mode),
            Err(e) => {
                log::warn!("Ignoring data-layout attribute: {e}");
                None
            },
        });
        let event = event.and_then(|v| match ActivationMode::parse(v) {
            Ok(mode) => Some(mode),
            Err(e) => {
                log::warn!("Ignoring data-event attribute, using click: {e}");
                None
            },
        });
        Self {
            layout,
            event,
            ..Self::default()
        }
    }

    /// Overlay `upper` on top of `self`: fields set in `upper` win.
    pub fn overlay(&self, upper: &SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            layout: upper.layout.or(self.layout),
            event: upper.event.or(self.event),
            hover_delay_ms: upper.hover_delay_ms.or(self.hover_delay_ms),
            transition: upper.transition.clone().or_else(|| self.transition.clone()),
            query_key: upper.query_key.clone().or_else(|| self.query_key.clone()),
            max_group_blocks: upper.max_group_blocks.or(self.max_group_blocks),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsLayer::default()
    }
}

/// Fully resolved settings for one tab set.
#[derive(Debug, Clone, PartialEq)]
pub struct TabsSettings {
    pub layout: LayoutMode,
    pub activation: ActivationMode,
    pub hover_delay_ms: u64,
    /// Named transition hint, passed through to styling untouched.
    pub transition: String,
    pub query_key: String,
    pub max_group_blocks: usize,
}

impl Default for TabsSettings {
    fn default() -> Self {
        Self {
            layout: LayoutMode::Horizontal,
            activation: ActivationMode::Click,
            hover_delay_ms: DEFAULT_HOVER_DELAY_MS,
            transition: "slideIn".to_string(),
            query_key: DEFAULT_QUERY_KEY.to_string(),
            max_group_blocks: DEFAULT_MAX_GROUP_BLOCKS,
        }
    }
}

impl TabsSettings {
    /// Resolve settings from layers ordered lowest precedence first,
    /// on top of the built-in defaults.
    pub fn resolve(layers: &[&SettingsLayer]) -> Self {
        let merged = layers
            .iter()
            .fold(SettingsLayer::default(), |acc, layer| acc.overlay(layer));
        let mut settings = Self::default();
        if let Some(layout) = merged.layout {
            settings.layout = layout;
        }
        if let Some(event) = merged.event {
            settings.activation = event;
        }
        if let Some(delay) = merged.hover_delay_ms {
            settings.hover_delay_ms = delay;
        }
        if let Some(transition) = merged.transition {
            settings.transition = transition;
        }
        if let Some(key) = merged.query_key {
            settings.query_key = key;
        }
        if let Some(max) = merged.max_group_blocks {
            settings.max_group_blocks = max.max(1);
        }
        settings
    }
}
