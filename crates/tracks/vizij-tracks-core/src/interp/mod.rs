//! Easing registry and helpers.
//!
//! Easings are addressed by their camelCase wire names (`easeInOutSine`).
//! Unknown names resolve to [`Easing::Linear`] at parse time.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod functions;

use functions::*;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Easing {
    #[default]
    #[serde(rename = "easeLinear")]
    Linear,
    #[serde(rename = "easeStep")]
    Step,
    #[serde(rename = "easeInQuad")]
    InQuad,
    #[serde(rename = "easeOutQuad")]
    OutQuad,
    #[serde(rename = "easeInOutQuad")]
    InOutQuad,
    #[serde(rename = "easeInCubic")]
    InCubic,
    #[serde(rename = "easeOutCubic")]
    OutCubic,
    #[serde(rename = "easeInOutCubic")]
    InOutCubic,
    #[serde(rename = "easeInQuart")]
    InQuart,
    #[serde(rename = "easeOutQuart")]
    OutQuart,
    #[serde(rename = "easeInOutQuart")]
    InOutQuart,
    #[serde(rename = "easeInQuint")]
    InQuint,
    #[serde(rename = "easeOutQuint")]
    OutQuint,
    #[serde(rename = "easeInOutQuint")]
    InOutQuint,
    #[serde(rename = "easeInSine")]
    InSine,
    #[serde(rename = "easeOutSine")]
    OutSine,
    #[serde(rename = "easeInOutSine")]
    InOutSine,
    #[serde(rename = "easeInCirc")]
    InCirc,
    #[serde(rename = "easeOutCirc")]
    OutCirc,
    #[serde(rename = "easeInOutCirc")]
    InOutCirc,
    #[serde(rename = "easeInExpo")]
    InExpo,
    #[serde(rename = "easeOutExpo")]
    OutExpo,
    #[serde(rename = "easeInOutExpo")]
    InOutExpo,
    #[serde(rename = "easeInElastic")]
    InElastic,
    #[serde(rename = "easeOutElastic")]
    OutElastic,
    #[serde(rename = "easeInOutElastic")]
    InOutElastic,
    #[serde(rename = "easeInBack")]
    InBack,
    #[serde(rename = "easeOutBack")]
    OutBack,
    #[serde(rename = "easeInOutBack")]
    InOutBack,
    #[serde(rename = "easeInBounce")]
    InBounce,
    #[serde(rename = "easeOutBounce")]
    OutBounce,
    #[serde(rename = "easeInOutBounce")]
    InOutBounce,
}

impl Easing {
    pub const ALL: [Easing; 32] = [
        Easing::Linear,
        Easing::Step,
        Easing::InQuad,
        Easing::OutQuad,
        Easing::InOutQuad,
        Easing::InCubic,
        Easing::OutCubic,
        Easing::InOutCubic,
        Easing::InQuart,
        Easing::OutQuart,
        Easing::InOutQuart,
        Easing::InQuint,
        Easing::OutQuint,
        Easing::InOutQuint,
        Easing::InSine,
        Easing::OutSine,
        Easing::InOutSine,
        Easing::InCirc,
        Easing::OutCirc,
        Easing::InOutCirc,
        Easing::InExpo,
        Easing::OutExpo,
        Easing::InOutExpo,
        Easing::InElastic,
        Easing::OutElastic,
        Easing::InOutElastic,
        Easing::InBack,
        Easing::OutBack,
        Easing::InOutBack,
        Easing::InBounce,
        Easing::OutBounce,
        Easing::InOutBounce,
    ];

    /// Wire name, e.g. `"easeInOutSine"`.
    pub fn name(self) -> &'static str {
        match self {
            Easing::Linear => "easeLinear",
            Easing::Step => "easeStep",
            Easing::InQuad => "easeInQuad",
            Easing::OutQuad => "easeOutQuad",
            Easing::InOutQuad => "easeInOutQuad",
            Easing::InCubic => "easeInCubic",
            Easing::OutCubic => "easeOutCubic",
            Easing::InOutCubic => "easeInOutCubic",
            Easing::InQuart => "easeInQuart",
            Easing::OutQuart => "easeOutQuart",
            Easing::InOutQuart => "easeInOutQuart",
            Easing::InQuint => "easeInQuint",
            Easing::OutQuint => "easeOutQuint",
            Easing::InOutQuint => "easeInOutQuint",
            Easing::InSine => "easeInSine",
            Easing::OutSine => "easeOutSine",
            Easing::InOutSine => "easeInOutSine",
            Easing::InCirc => "easeInCirc",
            Easing::OutCirc => "easeOutCirc",
            Easing::InOutCirc => "easeInOutCirc",
            Easing::InExpo => "easeInExpo",
            Easing::OutExpo => "easeOutExpo",
            Easing::InOutExpo => "easeInOutExpo",
            Easing::InElastic => "easeInElastic",
            Easing::OutElastic => "easeOutElastic",
            Easing::InOutElastic => "easeInOutElastic",
            Easing::InBack => "easeInBack",
            Easing::OutBack => "easeOutBack",
            Easing::InOutBack => "easeInOutBack",
            Easing::InBounce => "easeInBounce",
            Easing::OutBounce => "easeOutBounce",
            Easing::InOutBounce => "easeInOutBounce",
        }
    }

    /// Remap a normalized segment parameter.
    pub fn apply(self, p: f32) -> f32 {
        match self {
            Easing::Linear => ease_linear(p),
            Easing::Step => ease_step(p),
            Easing::InQuad => ease_in_quad(p),
            Easing::OutQuad => ease_out_quad(p),
            Easing::InOutQuad => ease_in_out_quad(p),
            Easing::InCubic => ease_in_cubic(p),
            Easing::OutCubic => ease_out_cubic(p),
            Easing::InOutCubic => ease_in_out_cubic(p),
            Easing::InQuart => ease_in_quart(p),
            Easing::OutQuart => ease_out_quart(p),
            Easing::InOutQuart => ease_in_out_quart(p),
            Easing::InQuint => ease_in_quint(p),
            Easing::OutQuint => ease_out_quint(p),
            Easing::InOutQuint => ease_in_out_quint(p),
            Easing::InSine => ease_in_sine(p),
            Easing::OutSine => ease_out_sine(p),
            Easing::InOutSine => ease_in_out_sine(p),
            Easing::InCirc => ease_in_circ(p),
            Easing::OutCirc => ease_out_circ(p),
            Easing::InOutCirc => ease_in_out_circ(p),
            Easing::InExpo => ease_in_expo(p),
            Easing::OutExpo => ease_out_expo(p),
            Easing::InOutExpo => ease_in_out_expo(p),
            Easing::InElastic => ease_in_elastic(p),
            Easing::OutElastic => ease_out_elastic(p),
            Easing::InOutElastic => ease_in_out_elastic(p),
            Easing::InBack => ease_in_back(p),
            Easing::OutBack => ease_out_back(p),
            Easing::InOutBack => ease_in_out_back(p),
            Easing::InBounce => ease_in_bounce(p),
            Easing::OutBounce => ease_out_bounce(p),
            Easing::InOutBounce => ease_in_out_bounce(p),
        }
    }

    /// Resolve a wire name, falling back to linear for anything unknown.
    pub fn from_name_or_linear(name: &str) -> Easing {
        name.parse().unwrap_or_else(|_| {
            log::warn!("unknown easing '{name}', using easeLinear");
            Easing::Linear
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownEasing(pub String);

impl std::fmt::Display for UnknownEasing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown easing '{}'", self.0)
    }
}

impl std::error::Error for UnknownEasing {}

impl FromStr for Easing {
    type Err = UnknownEasing;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Easing::ALL
            .iter()
            .copied()
            .find(|e| e.name() == s)
            .ok_or_else(|| UnknownEasing(s.to_string()))
    }
}
