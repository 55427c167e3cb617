use crate::interp::Easing;
use crate::kind::PointKind;
use crate::modifier::{fold_modifiers, Modifier, PointValue};
use crate::providers::ProviderContext;
use crate::value::Value;

/// How the segment ending at a keyframe is blended.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Spline {
    #[default]
    Linear,
    CatmullRom,
}

impl Spline {
    pub fn name(self) -> Option<&'static str> {
        match self {
            Spline::Linear => None,
            Spline::CatmullRom => Some("splineCatmullRom"),
        }
    }
}

/// One sample of a curve. The easing and spline describe the segment that
/// ends at this keyframe.
#[derive(Clone, Debug)]
pub struct Keyframe<K: PointKind> {
    pub(crate) time: f32,
    pub(crate) value: PointValue<K>,
    pub(crate) modifiers: Vec<Modifier<K>>,
    pub(crate) easing: Easing,
    pub(crate) spline: Spline,
}

impl<K: PointKind> Keyframe<K> {
    #[inline]
    pub fn time(&self) -> f32 {
        self.time
    }

    #[inline]
    pub fn easing(&self) -> Easing {
        self.easing
    }

    #[inline]
    pub fn spline(&self) -> Spline {
        self.spline
    }

    pub fn modifiers(&self) -> &[Modifier<K>] {
        &self.modifiers
    }

    /// `Some` when the value does not depend on any provider.
    pub fn constant(&self) -> Option<K::Output> {
        match (&self.value, self.modifiers.is_empty()) {
            (PointValue::Constant(v), true) => Some(*v),
            _ => None,
        }
    }

    /// Current value, with value sources and modifiers evaluated live.
    pub fn value(&self, context: &ProviderContext) -> K::Output {
        fold_modifiers::<K>(self.value.evaluate(context), &self.modifiers, context)
    }

    pub(crate) fn any_resolved(&self) -> bool {
        self.value.references().any(|r| r.is_resolved())
            || self.modifiers.iter().any(|m| m.any_resolved())
    }

    /// Wire form `[values.., time, flags.., modifiers..]`.
    pub(crate) fn to_value(&self) -> Value {
        let mut items = self.value.to_values();
        items.push(Value::from(self.time));
        items.push(Value::from(self.easing.name()));
        if let Some(spline) = self.spline.name() {
            items.push(Value::from(spline));
        }
        items.extend(self.modifiers.iter().map(|m| m.to_value()));
        Value::Array(items)
    }
}
