use serde::Serialize;
use utoipa::ToSchema;

use super::pixels::PixelStats;
use crate::skin::{ConditionScores, SkinCondition, argmax};

/// Four skin-type percentages, each in `[0, 100]` with one decimal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, ToSchema)]
pub struct SkinTypeScores {
    pub oily: f64,
    pub dry: f64,
    pub normal: f64,
    pub acne: f64,
}

impl SkinTypeScores {
    pub const LABELS: [&'static str; 4] = ["oily", "dry", "normal", "acne"];

    pub fn values(&self) -> [f64; 4] {
        [self.oily, self.dry, self.normal, self.acne]
    }

    /// Highest label; ties go to the earlier one in [`SkinTypeScores::LABELS`].
    pub fn dominant(&self) -> &'static str {
        argmax(self.values())
            .map(|idx| Self::LABELS[idx])
            .unwrap_or(Self::LABELS[0])
    }
}

pub fn skin_type_scores(stats: &PixelStats) -> SkinTypeScores {
    let oily = (1.2 * stats.brightness).min(1.0);
    let dry = (1.3 * (1.0 - stats.saturation)).min(1.0);
    let normal = (1.0 - 2.0 * (stats.saturation - 0.5).abs()).min(1.0);
    let acne = (0.8 * stats.redness).min(1.0);

    SkinTypeScores {
        oily: to_percent(oily),
        dry: to_percent(dry),
        normal: to_percent(normal),
        acne: to_percent(acne),
    }
}

/// Six-label estimate from the same statistics, normalized to sum to 100.
pub fn condition_scores(stats: &PixelStats) -> ConditionScores {
    let brightness = stats.brightness.clamp(0.0, 1.0);
    let saturation = stats.saturation.clamp(0.0, 1.0);
    let texture = stats.texture.max(0.0);

    let mut raw = ConditionScores {
        acne: stats.redness * 0.8,
        blackheads: texture * 2.5 * (1.0 - 0.5 * brightness),
        clear_skin: 0.0,
        dark_spots: texture * 1.5 + (1.0 - brightness) * 0.5,
        puffy_eyes: (1.0 - saturation) * brightness * 0.8,
        wrinkles: texture * 3.0,
    }
    .map(unit);

    raw.clear_skin = 1.0
        - SkinCondition::ALL
            .into_iter()
            .filter(|c| *c != SkinCondition::ClearSkin)
            .map(|c| raw.get(c))
            .fold(0.0, f64::max);

    normalize(raw)
}

/// Scale to percentages summing to 100. An all-zero input reads as clear skin.
pub fn normalize(scores: ConditionScores) -> ConditionScores {
    let scores = scores.map(unit);
    let total: f64 = scores.iter().map(|(_, v)| v).sum();
    if total <= 0.0 {
        return ConditionScores {
            clear_skin: 100.0,
            ..ConditionScores::default()
        };
    }
    scores.map(|v| round1(v / total * 100.0))
}

fn unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

fn to_percent(value: f64) -> f64 {
    round1(unit(value) * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
