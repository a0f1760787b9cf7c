use std::collections::{BTreeMap, HashMap};

use crate::ir::{ChordData, CohortMetadata};
use crate::theme::CATEGORY10;

/// Resolves a group (cohort) name to a CSS colour. `None` lets the renderer
/// fall back to the theme's neutral colour.
pub trait ColorLookup {
    fn color_for(&self, group: &str) -> Option<String>;
}

impl ColorLookup for HashMap<String, String> {
    fn color_for(&self, group: &str) -> Option<String> {
        self.get(group).cloned()
    }
}

impl ColorLookup for BTreeMap<String, String> {
    fn color_for(&self, group: &str) -> Option<String> {
        self.get(group).cloned()
    }
}

impl<T: ColorLookup + ?Sized> ColorLookup for &T {
    fn color_for(&self, group: &str) -> Option<String> {
        (**self).color_for(group)
    }
}

/// Ordinal scale: the n-th domain entry takes the n-th range colour, cycling
/// when the range is shorter. Names outside the domain are unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorScale {
    domain: Vec<String>,
    range: Vec<String>,
}

impl ColorScale {
    pub fn new(domain: Vec<String>, range: Vec<String>) -> Self {
        Self { domain, range }
    }

    /// The category10 range over an empty domain. Unlike an implicit d3
    /// ordinal scale this resolves nothing until a domain is supplied, e.g.
    /// through [`Self::with_groups_of`]; unresolved groups are painted with
    /// the theme fallback.
    pub fn category10() -> Self {
        Self::new(Vec::new(), CATEGORY10.iter().map(|c| c.to_string()).collect())
    }

    /// Colours declared by the cohort metadata document. Cohorts without a
    /// `Color` entry stay out of the domain.
    pub fn from_metadata(metadata: &CohortMetadata) -> Self {
        let mut domain = Vec::new();
        let mut range = Vec::new();
        for (cohort, info) in metadata {
            if let Some(color) = &info.color {
                domain.push(cohort.clone());
                range.push(color.clone());
            }
        }
        Self { domain, range }
    }

    /// Replaces the domain with the distinct groups of `data`, keeping the
    /// current range.
    pub fn with_groups_of(mut self, data: &ChordData) -> Self {
        self.domain = data.groups();
        self
    }

    pub fn domain(&self) -> &[String] {
        &self.domain
    }

    pub fn range(&self) -> &[String] {
        &self.range
    }
}

/// Same as [`ColorScale::category10`]: an empty domain.
impl Default for ColorScale {
    fn default() -> Self {
        Self::category10()
    }
}

impl ColorLookup for ColorScale {
    fn color_for(&self, group: &str) -> Option<String> {
        if self.range.is_empty() {
            return None;
        }
        let idx = self.domain.iter().position(|entry| entry == group)?;
        Some(self.range[idx % self.range.len()].clone())
    }
}
