//! Cluster Aggregator
//!
//! The resource views carry no cluster size, so it is derived by counting the
//! machines that share a component name. Counting happens while flattening;
//! sizes are written afterwards, once every sibling has been seen.

use super::record::ResourceConfiguration;
use std::collections::HashMap;

/// Machines per component name, for one flattening pass
#[derive(Debug, Clone, Default)]
pub struct ClusterCountMap {
    counts: HashMap<String, u32>,
}

impl ClusterCountMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one more machine of `component`
    pub fn record(&mut self, component: &str) {
        *self.counts.entry(component.to_string()).or_insert(0) += 1;
    }

    pub fn count(&self, component: &str) -> u32 {
        self.counts.get(component).copied().unwrap_or(0)
    }

    pub fn components(&self) -> usize {
        self.counts.len()
    }

    pub fn total(&self) -> u32 {
        self.counts.values().sum()
    }
}

/// Write cluster sizes onto flattened configurations
pub fn annotate(
    mut configs: Vec<ResourceConfiguration>,
    counts: &ClusterCountMap,
) -> Vec<ResourceConfiguration> {
    for config in &mut configs {
        config.cluster_size = counts.count(&config.component_name);
    }
    configs
}
