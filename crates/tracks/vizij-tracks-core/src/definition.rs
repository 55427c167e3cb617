//! Parsed point definitions and their public entry points.

use crate::config::Config;
use crate::error::ParseError;
use crate::keyframe::Keyframe;
use crate::kind::{FloatKind, PointKind, QuaternionKind, Vector3Kind, Vector4Kind};
use crate::parse::Parser;
use crate::providers::{ProviderContext, ProviderReference, ResolvedReference, UpdatableProviderRegistry};
use crate::sampling::sample_keyframes;
use crate::value::Value;

/// An immutable, sorted keyframe curve producing values of kind `K`.
///
/// Named references are resolved once when the definition is built; the
/// values behind them are read on every [`interpolate`](Self::interpolate)
/// call, so provider updates show up without reparsing.
#[derive(Clone, Debug)]
pub struct PointDefinition<K: PointKind> {
    keyframes: Vec<Keyframe<K>>,
    base: Option<ResolvedReference>,
    has_base_provider: bool,
}

pub type FloatPointDefinition = PointDefinition<FloatKind>;
pub type Vector3PointDefinition = PointDefinition<Vector3Kind>;
pub type Vector4PointDefinition = PointDefinition<Vector4Kind>;
pub type QuaternionPointDefinition = PointDefinition<QuaternionKind>;

impl<K: PointKind> PointDefinition<K> {
    pub fn parse(
        value: &Value,
        context: &ProviderContext,
        updatable: Option<&UpdatableProviderRegistry>,
    ) -> Result<Self, ParseError> {
        Self::parse_with_config(value, context, updatable, &Config::default())
    }

    pub fn parse_with_config(
        value: &Value,
        context: &ProviderContext,
        updatable: Option<&UpdatableProviderRegistry>,
        config: &Config,
    ) -> Result<Self, ParseError> {
        let parsed = Parser::new(context, updatable, config).parse::<K>(value)?;
        let has_base_provider = parsed.base.as_ref().is_some_and(|b| b.is_resolved())
            || parsed.keyframes.iter().any(|k| k.any_resolved());
        Ok(Self {
            keyframes: parsed.keyframes,
            base: parsed.base,
            has_base_provider,
        })
    }

    /// Parse JSON text. Equivalent to lowering with [`Value::from_json_str`] first.
    pub fn from_json_str(
        text: &str,
        context: &ProviderContext,
        updatable: Option<&UpdatableProviderRegistry>,
    ) -> Result<Self, ParseError> {
        Self::from_json_str_with_config(text, context, updatable, &Config::default())
    }

    pub fn from_json_str_with_config(
        text: &str,
        context: &ProviderContext,
        updatable: Option<&UpdatableProviderRegistry>,
        config: &Config,
    ) -> Result<Self, ParseError> {
        let value = Value::from_json_str(text)?;
        Self::parse_with_config(&value, context, updatable, config)
    }

    /// Number of keyframes; never zero.
    #[inline]
    pub fn count(&self) -> usize {
        self.keyframes.len()
    }

    /// Whether any named reference resolved when this definition was built.
    #[inline]
    pub fn has_base_provider(&self) -> bool {
        self.has_base_provider
    }

    pub fn keyframes(&self) -> &[Keyframe<K>] {
        &self.keyframes
    }

    /// The definition-level base name, if one was given (resolved or not).
    pub fn base_reference(&self) -> Option<&ProviderReference> {
        self.base.as_ref().map(|b| &b.reference)
    }

    /// Evaluate at `time`. The flag is `true` once `time` reaches the last
    /// keyframe (and always for single-keyframe curves).
    ///
    /// `time` must not be NaN.
    pub fn interpolate(&self, time: f32, context: &ProviderContext) -> (K::Output, bool) {
        let (value, is_last) = sample_keyframes(&self.keyframes, time, context);
        let value = match self.base.as_ref().and_then(|b| b.sample(context)) {
            Some(base) => K::combine_base(value, &base),
            None => value,
        };
        (K::finish(value), is_last)
    }

    /// Re-serialize into the entry-list notation. Parsing the result with the
    /// same registries yields an equivalent definition.
    pub fn to_value(&self) -> Value {
        let mut items = Vec::with_capacity(self.keyframes.len() + 1);
        if let Some(base) = &self.base {
            items.push(Value::from(base.reference.to_raw().as_str()));
        }
        items.extend(self.keyframes.iter().map(|k| k.to_value()));
        Value::Array(items)
    }
}
