use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Labels produced by the classifier, in enumeration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SkinCondition {
    Acne,
    Blackheads,
    ClearSkin,
    DarkSpots,
    PuffyEyes,
    Wrinkles,
}

impl SkinCondition {
    pub const ALL: [SkinCondition; 6] = [
        SkinCondition::Acne,
        SkinCondition::Blackheads,
        SkinCondition::ClearSkin,
        SkinCondition::DarkSpots,
        SkinCondition::PuffyEyes,
        SkinCondition::Wrinkles,
    ];

    /// Position in [`SkinCondition::ALL`].
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SkinCondition::Acne => "acne",
            SkinCondition::Blackheads => "blackheads",
            SkinCondition::ClearSkin => "clear_skin",
            SkinCondition::DarkSpots => "dark_spots",
            SkinCondition::PuffyEyes => "puffy_eyes",
            SkinCondition::Wrinkles => "wrinkles",
        }
    }

    /// Human label, e.g. `clear_skin` -> `Clear Skin`.
    pub fn display_name(&self) -> String {
        format_label(self.as_str())
    }
}

impl fmt::Display for SkinCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkinCondition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SkinCondition::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("unknown skin condition `{s}`"))
    }
}

pub fn format_label(label: &str) -> String {
    label
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Index of the largest value; the first one wins on ties.
pub fn argmax<I>(values: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (idx, value) in values.into_iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if best.is_none_or(|(_, current)| value > current) {
            best = Some((idx, value));
        }
    }
    best.map(|(idx, _)| idx)
}

/// One score per [`SkinCondition`]. Missing fields deserialize as zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct ConditionScores {
    pub acne: f64,
    pub blackheads: f64,
    pub clear_skin: f64,
    pub dark_spots: f64,
    pub puffy_eyes: f64,
    pub wrinkles: f64,
}

impl ConditionScores {
    pub fn get(&self, condition: SkinCondition) -> f64 {
        match condition {
            SkinCondition::Acne => self.acne,
            SkinCondition::Blackheads => self.blackheads,
            SkinCondition::ClearSkin => self.clear_skin,
            SkinCondition::DarkSpots => self.dark_spots,
            SkinCondition::PuffyEyes => self.puffy_eyes,
            SkinCondition::Wrinkles => self.wrinkles,
        }
    }

    pub fn from_fn(mut f: impl FnMut(SkinCondition) -> f64) -> Self {
        Self {
            acne: f(SkinCondition::Acne),
            blackheads: f(SkinCondition::Blackheads),
            clear_skin: f(SkinCondition::ClearSkin),
            dark_spots: f(SkinCondition::DarkSpots),
            puffy_eyes: f(SkinCondition::PuffyEyes),
            wrinkles: f(SkinCondition::Wrinkles),
        }
    }

    pub fn map(&self, mut f: impl FnMut(f64) -> f64) -> Self {
        Self::from_fn(|c| f(self.get(c)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (SkinCondition, f64)> + '_ {
        SkinCondition::ALL.into_iter().map(|c| (c, self.get(c)))
    }

    pub fn is_finite(&self) -> bool {
        self.iter().all(|(_, v)| v.is_finite())
    }

    /// Highest-scoring condition; ties go to the earlier label.
    pub fn dominant(&self) -> SkinCondition {
        argmax(self.iter().map(|(_, v)| v))
            .map(|idx| SkinCondition::ALL[idx])
            .unwrap_or(SkinCondition::Acne)
    }

    /// Dot product with a product's or ingredient's weights.
    pub fn weighted_sum(&self, weights: &ConditionWeights) -> f64 {
        self.iter().map(|(c, v)| v * weights.get(c)).sum()
    }
}

/// Per-condition weights stored on products and ingredients as `w_*` columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConditionWeights {
    #[serde(default)]
    pub w_acne: f64,
    #[serde(default)]
    pub w_blackheads: f64,
    #[serde(default)]
    pub w_clear_skin: f64,
    #[serde(default)]
    pub w_dark_spots: f64,
    #[serde(default)]
    pub w_puffy_eyes: f64,
    #[serde(default)]
    pub w_wrinkles: f64,
}

impl ConditionWeights {
    pub fn get(&self, condition: SkinCondition) -> f64 {
        match condition {
            SkinCondition::Acne => self.w_acne,
            SkinCondition::Blackheads => self.w_blackheads,
            SkinCondition::ClearSkin => self.w_clear_skin,
            SkinCondition::DarkSpots => self.w_dark_spots,
            SkinCondition::PuffyEyes => self.w_puffy_eyes,
            SkinCondition::Wrinkles => self.w_wrinkles,
        }
    }

    pub fn from_fn(mut f: impl FnMut(SkinCondition) -> f64) -> Self {
        Self {
            w_acne: f(SkinCondition::Acne),
            w_blackheads: f(SkinCondition::Blackheads),
            w_clear_skin: f(SkinCondition::ClearSkin),
            w_dark_spots: f(SkinCondition::DarkSpots),
            w_puffy_eyes: f(SkinCondition::PuffyEyes),
            w_wrinkles: f(SkinCondition::Wrinkles),
        }
    }

    /// Column name of the weight for `condition`.
    pub fn column(condition: SkinCondition) -> &'static str {
        match condition {
            SkinCondition::Acne => "w_acne",
            SkinCondition::Blackheads => "w_blackheads",
            SkinCondition::ClearSkin => "w_clear_skin",
            SkinCondition::DarkSpots => "w_dark_spots",
            SkinCondition::PuffyEyes => "w_puffy_eyes",
            SkinCondition::Wrinkles => "w_wrinkles",
        }
    }

    /// Sum ingredient weights per label and scale by the largest total
    /// (at least 1), capping each weight at 1.
    pub fn combine<'a, I>(ingredients: I) -> Self
    where
        I: IntoIterator<Item = &'a ConditionWeights>,
    {
        let mut totals = [0.0_f64; 6];
        for weights in ingredients {
            for condition in SkinCondition::ALL {
                totals[condition.index()] += weights.get(condition);
            }
        }
        let max = totals.iter().copied().fold(1.0_f64, f64::max);
        Self::from_fn(|c| (totals[c.index()] / max).min(1.0))
    }
}
