use anyhow::Context;
use chrono::{Duration, TimeZone, Utc};
use mapcore::render::FALLBACK_PALETTE;
use mapcore::{VisitFeed, VisitRecord};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

const PLACES: [(&str, &str); 8] = [
    ("book cafe", "Book Cafe"),
    ("cafe", "Record Cafe"),
    ("park", "Hidden Garden"),
    ("cafe", "Factory Cafe"),
    ("gallery", "Gallery Cafe"),
    ("hidden spot", "Rooftop Bar"),
    ("book cafe", "Hanok Tea House"),
    ("hidden spot", "Mural Alley"),
];

/// Configuration for generating synthetic visits around a center point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub count: usize,
    pub seed: u64,
    pub center_lat: f64,
    pub center_lon: f64,
    /// Maximum offset from the center in degrees, on each axis.
    pub spread_deg: f64,
    /// Every n-th visit is left without an accent color (0 disables).
    pub plain_every: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            count: 8,
            seed: 0,
            center_lat: 37.5665,
            center_lon: 126.9780,
            spread_deg: 0.04,
            plain_every: 3,
        }
    }
}

pub fn generate_visits(config: &GeneratorConfig) -> anyhow::Result<Vec<VisitRecord>> {
    if !(config.spread_deg.is_finite() && config.spread_deg >= 0.0) {
        anyhow::bail!("spread must be a non-negative number of degrees");
    }
    let latest = Utc
        .with_ymd_and_hms(2025, 2, 14, 14, 30, 0)
        .single()
        .context("building base visit timestamp")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let spread = config.spread_deg;
    let mut visits = Vec::with_capacity(config.count);

    for index in 0..config.count {
        let (category, name) = PLACES[index % PLACES.len()];
        let lat_offset = if spread > 0.0 {
            rng.gen_range(-spread..=spread)
        } else {
            0.0
        };
        let lon_offset = if spread > 0.0 {
            rng.gen_range(-spread..=spread)
        } else {
            0.0
        };
        let ordinal = index as i64 + 1;

        let mut visit = VisitRecord::new(
            ordinal,
            format!("{name} #{ordinal}"),
            config.center_lat + lat_offset,
            config.center_lon + lon_offset,
        )
        .with_category(category)
        .with_visited_at(latest - Duration::hours(26 * index as i64));

        let plain = config.plain_every > 0 && (index + 1) % config.plain_every == 0;
        if !plain {
            let accent = FALLBACK_PALETTE[rng.gen_range(0..FALLBACK_PALETTE.len())];
            visit = visit.with_accent(accent.to_rgb_hex());
        }
        visit.duration_minutes = Some(rng.gen_range(30..=120));
        visit.xp_earned = Some(100 + 10 * rng.gen_range(0..=10));
        visit.spent_amount = Some(1000 * rng.gen_range(0..=35));
        visits.push(visit);
    }

    Ok(visits)
}

pub fn sample_feed(config: &GeneratorConfig) -> anyhow::Result<VisitFeed> {
    Ok(VisitFeed::new(generate_visits(config)?))
}
