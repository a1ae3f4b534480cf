use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
// Note: analytics is pure computation over in-memory records; loading school data is the caller's job.

/// Connectivity tier of a school, ordered from slowest to fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedTier {
    VeryLow,
    Low,
    Medium,
    High,
}

impl SpeedTier {
    pub const ALL: [SpeedTier; 4] = [
        SpeedTier::VeryLow,
        SpeedTier::Low,
        SpeedTier::Medium,
        SpeedTier::High,
    ];

    /// Dashboard label.
    pub fn label(self) -> &'static str {
        match self {
            SpeedTier::VeryLow => "Muito Baixa",
            SpeedTier::Low => "Baixa",
            SpeedTier::Medium => "Média",
            SpeedTier::High => "Alta",
        }
    }

    pub fn from_label(label: &str) -> Option<SpeedTier> {
        SpeedTier::ALL.into_iter().find(|t| t.label() == label.trim())
    }
}

impl fmt::Display for SpeedTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchoolSpeed {
    pub name: String,
    pub district: String,
    pub speed_mbps: f64,
}

/// Quartile boundaries of a speed distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SpeedQuartiles {
    pub q1: f64,
    pub q2: f64,
    pub q3: f64,
}

impl SpeedQuartiles {
    /// 25th/50th/75th percentiles, interpolating linearly between closest ranks.
    /// Non-finite samples are ignored; `None` when nothing is left.
    pub fn from_speeds(speeds: &[f64]) -> Option<SpeedQuartiles> {
        let mut sorted: Vec<f64> = speeds.iter().copied().filter(|s| s.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);
        Some(SpeedQuartiles {
            q1: percentile_sorted(&sorted, 25.0),
            q2: percentile_sorted(&sorted, 50.0),
            q3: percentile_sorted(&sorted, 75.0),
        })
    }

    /// Boundaries are inclusive on the lower tiers: `<= q1`, `<= q2`, `<= q3`, else high.
    pub fn classify(&self, speed_mbps: f64) -> SpeedTier {
        if speed_mbps <= self.q1 {
            SpeedTier::VeryLow
        } else if speed_mbps <= self.q2 {
            SpeedTier::Low
        } else if speed_mbps <= self.q3 {
            SpeedTier::Medium
        } else {
            SpeedTier::High
        }
    }
}

fn percentile_sorted(sorted: &[f64], pct: f64) -> f64 {
    let rank = pct / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Selected tiers. An empty selection matches every school.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierSelection {
    tiers: BTreeSet<SpeedTier>,
}

impl TierSelection {
    pub fn all() -> Self {
        Self {
            tiers: SpeedTier::ALL.into_iter().collect(),
        }
    }

    pub fn only(tiers: impl IntoIterator<Item = SpeedTier>) -> Self {
        Self {
            tiers: tiers.into_iter().collect(),
        }
    }

    pub fn matches(&self, tier: SpeedTier) -> bool {
        self.tiers.is_empty() || self.tiers.contains(&tier)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SpeedFilter {
    /// Inclusive bounds; `None` leaves that side open.
    pub min_mbps: Option<f64>,
    pub max_mbps: Option<f64>,
    pub tiers: TierSelection,
    /// Empty means every district.
    pub districts: BTreeSet<String>,
}

impl SpeedFilter {
    pub fn matches(&self, school: &SchoolSpeed, quartiles: &SpeedQuartiles) -> bool {
        let s = school.speed_mbps;
        if !s.is_finite() {
            return false;
        }
        if self.min_mbps.is_some_and(|min| s < min) || self.max_mbps.is_some_and(|max| s > max) {
            return false;
        }
        if !self.districts.is_empty() && !self.districts.contains(&school.district) {
            return false;
        }
        self.tiers.matches(quartiles.classify(s))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TierCount {
    pub tier: SpeedTier,
    pub label: String,
    pub count: i64,
}

/// Count schools per tier, always returning all four tiers in order.
pub fn tier_breakdown<'a>(
    schools: impl IntoIterator<Item = &'a SchoolSpeed>,
    quartiles: &SpeedQuartiles,
) -> Vec<TierCount> {
    let mut counts: BTreeMap<SpeedTier, i64> = SpeedTier::ALL.into_iter().map(|t| (t, 0)).collect();
    for school in schools.into_iter().filter(|s| s.speed_mbps.is_finite()) {
        *counts.entry(quartiles.classify(school.speed_mbps)).or_insert(0) += 1;
    }
    counts
        .into_iter()
        .map(|(tier, count)| TierCount {
            tier,
            label: tier.label().to_string(),
            count,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    pub fn arrow(self) -> &'static str {
        match self {
            Trend::Up => "▲",
            Trend::Down => "▼",
        }
    }
}

/// Speedometer reading: filtered schools against every school in the same districts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GaugeReading {
    pub value_mbps: f64,
    pub reference_mbps: f64,
    pub tier: SpeedTier,
    pub trend: Trend,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0f64, 0usize), |(s, n), v| (s + v, n + 1));
    if n == 0 {
        None
    } else {
        Some(sum / n as f64)
    }
}

pub fn gauge_reading(
    all: &[SchoolSpeed],
    filtered: &[&SchoolSpeed],
    quartiles: &SpeedQuartiles,
) -> GaugeReading {
    let value = mean(filtered.iter().map(|s| s.speed_mbps)).unwrap_or(0.0);
    let districts: BTreeSet<&str> = filtered.iter().map(|s| s.district.as_str()).collect();
    let reference = mean(
        all.iter()
            .filter(|s| s.speed_mbps.is_finite() && districts.contains(s.district.as_str()))
            .map(|s| s.speed_mbps),
    )
    .unwrap_or(0.0);

    GaugeReading {
        value_mbps: value,
        reference_mbps: reference,
        tier: quartiles.classify(value),
        trend: if value > reference { Trend::Up } else { Trend::Down },
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpeedOverview {
    pub quartiles: SpeedQuartiles,
    pub school_count: i64,
    pub filtered_count: i64,
    pub tier_counts: Vec<TierCount>,
    pub gauge: GaugeReading,
}

/// Quartiles come from the full dataset; counts and the gauge reflect the filter.
pub fn build_speed_overview(all: &[SchoolSpeed], filter: &SpeedFilter) -> Option<SpeedOverview> {
    let speeds: Vec<f64> = all.iter().map(|s| s.speed_mbps).collect();
    let quartiles = SpeedQuartiles::from_speeds(&speeds)?;

    let filtered: Vec<&SchoolSpeed> = all.iter().filter(|s| filter.matches(s, &quartiles)).collect();

    Some(SpeedOverview {
        quartiles,
        school_count: all.len() as i64,
        filtered_count: filtered.len() as i64,
        tier_counts: tier_breakdown(filtered.iter().copied(), &quartiles),
        gauge: gauge_reading(all, &filtered, &quartiles),
    })
}
