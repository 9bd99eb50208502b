//! Divergence hints supplied by an upstream analysis.
//!
//! The engine never computes divergence; when a hint is attached to the
//! snapshot the timing pass folds it into its score.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Divergence {
    /// Price makes a new high while the oscillator does not.
    Top,
    /// Price makes a new low while the oscillator does not.
    Bottom,
}

/// Wire form of one divergence field; `"none"` and `null` both mean absent.
#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum DivergenceField {
    Top,
    Bottom,
    None,
}

fn divergence_field<'de, D>(deserializer: D) -> Result<Option<Divergence>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<DivergenceField>::deserialize(deserializer)? {
        Some(DivergenceField::Top) => Some(Divergence::Top),
        Some(DivergenceField::Bottom) => Some(Divergence::Bottom),
        Some(DivergenceField::None) | None => None,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DivergenceHint {
    #[serde(default, deserialize_with = "divergence_field")]
    pub macd: Option<Divergence>,
    #[serde(default, deserialize_with = "divergence_field")]
    pub rsi: Option<Divergence>,
    #[serde(default)]
    pub description: Vec<String>,
}
