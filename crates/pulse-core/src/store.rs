//! In-memory metrics store
//!
//! Holds the three input tables. Everything downstream reads from here and
//! recomputes from scratch; nothing mutates the store after it is built.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{CampaignRecord, DemographicRecord, MetricRecord};

/// Dashboard-style selection over the store
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsFilter {
    /// Only keep this platform (None = all platforms)
    pub platform: Option<String>,
    /// Inclusive start date
    pub from: Option<NaiveDate>,
    /// Inclusive end date
    pub to: Option<NaiveDate>,
}

impl MetricsFilter {
    fn matches_platform(&self, platform: &str) -> bool {
        self.platform.as_deref().map_or(true, |p| p == platform)
    }

    fn matches_date(&self, date: NaiveDate) -> bool {
        self.from.map_or(true, |from| date >= from) && self.to.map_or(true, |to| date <= to)
    }

    pub fn is_empty(&self) -> bool {
        self.platform.is_none() && self.from.is_none() && self.to.is_none()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsStore {
    pub metrics: Vec<MetricRecord>,
    pub demographics: Vec<DemographicRecord>,
    pub campaigns: Vec<CampaignRecord>,
}

impl MetricsStore {
    pub fn new(
        metrics: Vec<MetricRecord>,
        demographics: Vec<DemographicRecord>,
        campaigns: Vec<CampaignRecord>,
    ) -> Self {
        Self {
            metrics,
            demographics,
            campaigns,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty() && self.demographics.is_empty() && self.campaigns.is_empty()
    }

    /// Platforms present in the metrics table, sorted alphabetically
    pub fn platforms(&self) -> Vec<String> {
        self.metrics
            .iter()
            .map(|r| r.platform.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Metrics rows for one platform, sorted by date.
    ///
    /// The sort is stable, so rows sharing a date keep their input order.
    pub fn metrics_for(&self, platform: &str) -> Vec<&MetricRecord> {
        let mut rows: Vec<&MetricRecord> = self
            .metrics
            .iter()
            .filter(|r| r.platform == platform)
            .collect();
        rows.sort_by_key(|r| r.date);
        rows
    }

    /// Apply a platform/date-range selection.
    ///
    /// Demographic samples carry no date, so only the platform predicate
    /// applies to them.
    pub fn filter(&self, filter: &MetricsFilter) -> MetricsStore {
        if filter.is_empty() {
            return self.clone();
        }

        MetricsStore {
            metrics: self
                .metrics
                .iter()
                .filter(|r| filter.matches_platform(&r.platform) && filter.matches_date(r.date))
                .cloned()
                .collect(),
            demographics: self
                .demographics
                .iter()
                .filter(|r| filter.matches_platform(&r.platform))
                .cloned()
                .collect(),
            campaigns: self
                .campaigns
                .iter()
                .filter(|r| filter.matches_platform(&r.platform) && filter.matches_date(r.date))
                .cloned()
                .collect(),
        }
    }
}
