//! Normalized brightness-temperature datasets.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::{Attributes, ChannelKey, Grid, TbError};

/// One normalized channel: its grid plus the source field's attributes.
#[derive(Debug, Clone, Serialize)]
pub struct TbVariable {
    pub grid: Grid,
    pub attrs: Attributes,
}

/// Provenance of a dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceMetadata {
    /// Data product name (e.g. "NSIDC-0001")
    pub data_source: String,
    pub resolution: f64,
    pub resolution_units: String,
}

/// Brightness temperatures keyed by canonical channel.
///
/// All grids in a dataset share one shape.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TbDataset {
    variables: BTreeMap<ChannelKey, TbVariable>,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<SourceMetadata>,
}

impl TbDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach provenance metadata.
    pub fn with_source(
        mut self,
        data_source: impl Into<String>,
        resolution: f64,
        resolution_units: impl Into<String>,
    ) -> Self {
        self.source = Some(SourceMetadata {
            data_source: data_source.into(),
            resolution,
            resolution_units: resolution_units.into(),
        });
        self
    }

    /// Insert a channel, enforcing the shared-shape invariant.
    ///
    /// Returns the previous variable for `key`, if any.
    pub fn insert(
        &mut self,
        key: ChannelKey,
        grid: Grid,
        attrs: Attributes,
    ) -> Result<Option<TbVariable>, TbError> {
        if let Some(expected) = self.shape() {
            if grid.shape() != expected {
                return Err(TbError::ShapeMismatch {
                    name: key.to_string(),
                    expected,
                    actual: grid.shape(),
                });
            }
        }
        Ok(self.variables.insert(key, TbVariable { grid, attrs }))
    }

    /// Shared grid shape, or `None` for an empty dataset.
    pub fn shape(&self) -> Option<(usize, usize)> {
        self.variables.values().next().map(|v| v.grid.shape())
    }

    pub fn get(&self, key: &ChannelKey) -> Option<&TbVariable> {
        self.variables.get(key)
    }

    /// Look up a channel by its rendered key (e.g. "h19").
    pub fn channel(&self, key: &str) -> Option<&TbVariable> {
        key.parse::<ChannelKey>()
            .ok()
            .and_then(|k| self.variables.get(&k))
    }

    pub fn contains(&self, key: &str) -> bool {
        self.channel(key).is_some()
    }

    /// Channel keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &ChannelKey> {
        self.variables.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ChannelKey, &TbVariable)> {
        self.variables.iter()
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn source(&self) -> Option<&SourceMetadata> {
        self.source.as_ref()
    }
}
