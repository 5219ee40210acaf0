//! CSV import for the three input tables
//!
//! Columns are located by header name, so column order does not matter.
//! Any extra non-empty column in the platform metrics file is kept as the
//! row's platform-specific metric (Instagram `saves`, Facebook `clicks`, ...).

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::models::{CampaignRecord, DemographicRecord, ExtraMetric, MetricRecord};
use crate::store::MetricsStore;

/// Default file names inside a data directory
pub const METRICS_FILE: &str = "platform_metrics.csv";
pub const DEMOGRAPHICS_FILE: &str = "demographic_data.csv";
pub const CAMPAIGNS_FILE: &str = "campaign_data.csv";

const METRIC_COLUMNS: &[&str] = &[
    "date",
    "platform",
    "followers",
    "impressions",
    "reach",
    "engagement",
    "likes",
    "comments",
    "shares",
];

const DEMOGRAPHIC_COLUMNS: &[&str] = &[
    "platform",
    "age_group",
    "gender",
    "city",
    "interest",
    "engagement_rate",
    "time_spent_minutes",
];

const CAMPAIGN_COLUMNS: &[&str] = &[
    "date",
    "platform",
    "campaign_type",
    "campaign_name",
    "reach",
    "engagement",
    "cost",
    "conversions",
    "roi",
];

/// Header lookup for one CSV file
struct Columns {
    index: HashMap<String, usize>,
    headers: StringRecord,
}

impl Columns {
    fn new(headers: &StringRecord, required: &[&str], file: &str) -> Result<Self> {
        let index: HashMap<String, usize> = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_lowercase(), i))
            .collect();

        let missing: Vec<&str> = required
            .iter()
            .copied()
            .filter(|c| !index.contains_key(*c))
            .collect();
        if !missing.is_empty() {
            return Err(Error::Import(format!(
                "{} is missing columns: {}",
                file,
                missing.join(", ")
            )));
        }

        Ok(Self {
            index,
            headers: headers.clone(),
        })
    }

    fn get<'r>(&self, record: &'r StringRecord, column: &str, line: u64) -> Result<&'r str> {
        self.index
            .get(column)
            .and_then(|&i| record.get(i))
            .map(str::trim)
            .ok_or_else(|| Error::Import(format!("Missing {} on line {}", column, line)))
    }

    fn text(&self, record: &StringRecord, column: &str, line: u64) -> Result<String> {
        Ok(self.get(record, column, line)?.to_string())
    }

    fn count(&self, record: &StringRecord, column: &str, line: u64) -> Result<u64> {
        parse_count(self.get(record, column, line)?)
            .ok_or_else(|| invalid_number(column, record, &self.index, line))
    }

    fn number(&self, record: &StringRecord, column: &str, line: u64) -> Result<f64> {
        self.get(record, column, line)?
            .parse::<f64>()
            .map_err(|_| invalid_number(column, record, &self.index, line))
    }

    fn date(&self, record: &StringRecord, column: &str, line: u64) -> Result<NaiveDate> {
        parse_date(self.get(record, column, line)?)
    }

    /// First non-empty column that is not part of the known schema
    fn extra_metric(&self, record: &StringRecord, line: u64) -> Result<Option<ExtraMetric>> {
        for (i, header) in self.headers.iter().enumerate() {
            let name = header.trim().to_lowercase();
            if name.is_empty() || METRIC_COLUMNS.contains(&name.as_str()) {
                continue;
            }
            let Some(raw) = record.get(i).map(str::trim).filter(|v| !v.is_empty()) else {
                continue;
            };
            let value = parse_count(raw)
                .ok_or_else(|| invalid_number(&name, record, &self.index, line))?;
            return Ok(Some(ExtraMetric { name, value }));
        }
        Ok(None)
    }
}

fn invalid_number(
    column: &str,
    record: &StringRecord,
    index: &HashMap<String, usize>,
    line: u64,
) -> Error {
    let value = index
        .get(column)
        .and_then(|&i| record.get(i))
        .unwrap_or_default();
    Error::Import(format!(
        "Invalid number '{}' for {} on line {}",
        value, column, line
    ))
}

/// Parse a non-negative count written either as an integer or as a float
/// with no fractional part ("123" or "123.0")
fn parse_count(s: &str) -> Option<u64> {
    if let Ok(n) = s.parse::<u64>() {
        return Some(n);
    }
    let f = s.parse::<f64>().ok()?;
    if f.is_finite() && f >= 0.0 && f.fract() == 0.0 {
        Some(f as u64)
    } else {
        None
    }
}

/// Parse a date string into a `NaiveDate`.
///
/// Accepts `YYYY-MM-DD` and `YYYY-MM-DD HH:MM:SS` (timestamps written by
/// dataframe exports). Anything else is an `Error::InvalidDate`.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    match NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        Ok(date) => Ok(date),
        Err(date_err) => NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .map(|dt| dt.date())
            .map_err(|_| Error::InvalidDate {
                value: s.to_string(),
                source: date_err,
            }),
    }
}

fn reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader)
}

/// Line number for error messages (header is line 1)
fn line_of(record: &StringRecord, fallback: usize) -> u64 {
    record
        .position()
        .map(|p| p.line())
        .unwrap_or(fallback as u64 + 2)
}

/// Parse the platform metrics table
pub fn parse_metrics_csv<R: Read>(input: R) -> Result<Vec<MetricRecord>> {
    let mut rdr = reader(input);
    let columns = Columns::new(rdr.headers()?, METRIC_COLUMNS, METRICS_FILE)?;
    let mut records = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = line_of(&record, i);

        records.push(MetricRecord {
            date: columns.date(&record, "date", line)?,
            platform: columns.text(&record, "platform", line)?,
            followers: columns.count(&record, "followers", line)?,
            impressions: columns.count(&record, "impressions", line)?,
            reach: columns.count(&record, "reach", line)?,
            engagement: columns.count(&record, "engagement", line)?,
            likes: columns.count(&record, "likes", line)?,
            comments: columns.count(&record, "comments", line)?,
            shares: columns.count(&record, "shares", line)?,
            extra_metric: columns.extra_metric(&record, line)?,
        });
    }

    debug!(count = records.len(), "Parsed platform metrics");
    Ok(records)
}

/// Parse the demographic samples table
pub fn parse_demographics_csv<R: Read>(input: R) -> Result<Vec<DemographicRecord>> {
    let mut rdr = reader(input);
    let columns = Columns::new(rdr.headers()?, DEMOGRAPHIC_COLUMNS, DEMOGRAPHICS_FILE)?;
    let mut records = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = line_of(&record, i);

        records.push(DemographicRecord {
            platform: columns.text(&record, "platform", line)?,
            age_group: columns.text(&record, "age_group", line)?,
            gender: columns.text(&record, "gender", line)?,
            city: columns.text(&record, "city", line)?,
            interest: columns.text(&record, "interest", line)?,
            engagement_rate: columns.number(&record, "engagement_rate", line)?,
            time_spent_minutes: columns.number(&record, "time_spent_minutes", line)?,
        });
    }

    debug!(count = records.len(), "Parsed demographic samples");
    Ok(records)
}

/// Parse the campaign records table
pub fn parse_campaigns_csv<R: Read>(input: R) -> Result<Vec<CampaignRecord>> {
    let mut rdr = reader(input);
    let columns = Columns::new(rdr.headers()?, CAMPAIGN_COLUMNS, CAMPAIGNS_FILE)?;
    let mut records = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let line = line_of(&record, i);

        records.push(CampaignRecord {
            date: columns.date(&record, "date", line)?,
            platform: columns.text(&record, "platform", line)?,
            campaign_type: columns.text(&record, "campaign_type", line)?,
            campaign_name: columns.text(&record, "campaign_name", line)?,
            reach: columns.count(&record, "reach", line)?,
            engagement: columns.count(&record, "engagement", line)?,
            cost: columns.number(&record, "cost", line)?,
            conversions: columns.count(&record, "conversions", line)?,
            roi: columns.number(&record, "roi", line)?,
        });
    }

    debug!(count = records.len(), "Parsed campaign records");
    Ok(records)
}

/// Load all three tables from a data directory using the default file names
pub fn load_dir(dir: &Path) -> Result<MetricsStore> {
    let open = |name: &str| {
        let path = dir.join(name);
        File::open(&path).map_err(|e| {
            Error::Import(format!("Cannot open {}: {}", path.display(), e))
        })
    };

    let metrics = parse_metrics_csv(open(METRICS_FILE)?)?;
    let demographics = parse_demographics_csv(open(DEMOGRAPHICS_FILE)?)?;
    let campaigns = parse_campaigns_csv(open(CAMPAIGNS_FILE)?)?;

    info!(
        dir = %dir.display(),
        metrics = metrics.len(),
        demographics = demographics.len(),
        campaigns = campaigns.len(),
        "Loaded data directory"
    );

    Ok(MetricsStore::new(metrics, demographics, campaigns))
}
