//! Keyframe values that are assembled at query time.
//!
//! A keyframe value is either a constant or a list of sources (plain numbers
//! and provider references) concatenated live. Modifiers are nested values
//! folded onto the keyframe value with an arithmetic [`Operation`].

use std::str::FromStr;

use crate::kind::PointKind;
use crate::providers::{ProviderContext, ResolvedReference};
use crate::value::Value;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Replace the accumulated value.
    #[default]
    None,
    Add,
    Sub,
    Mul,
    Div,
}

impl Operation {
    pub fn name(self) -> Option<&'static str> {
        match self {
            Operation::None => None,
            Operation::Add => Some("opAdd"),
            Operation::Sub => Some("opSub"),
            Operation::Mul => Some("opMul"),
            Operation::Div => Some("opDiv"),
        }
    }

    #[inline]
    pub fn apply(self, acc: f32, operand: f32) -> f32 {
        match self {
            Operation::None => operand,
            Operation::Add => acc + operand,
            Operation::Sub => acc - operand,
            Operation::Mul => acc * operand,
            Operation::Div => acc / operand,
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "opNone" => Ok(Operation::None),
            "opAdd" => Ok(Operation::Add),
            "opSub" => Ok(Operation::Sub),
            "opMul" => Ok(Operation::Mul),
            "opDiv" => Ok(Operation::Div),
            other => Err(format!("unknown operation '{other}'")),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) enum ValueSource {
    Numbers(Vec<f32>),
    Reference(ResolvedReference),
}

#[derive(Clone, Debug)]
pub(crate) enum PointValue<K: PointKind> {
    Constant(K::Output),
    Dynamic(Vec<ValueSource>),
}

impl<K: PointKind> PointValue<K> {
    pub(crate) fn evaluate(&self, context: &ProviderContext) -> K::Output {
        match self {
            PointValue::Constant(v) => *v,
            PointValue::Dynamic(sources) => {
                let mut components = Vec::with_capacity(K::ARITY);
                for source in sources {
                    match source {
                        ValueSource::Numbers(numbers) => components.extend_from_slice(numbers),
                        ValueSource::Reference(reference) => {
                            if let Some(sample) = reference.sample(context) {
                                components.extend(sample.values);
                            }
                        }
                    }
                }
                K::from_dynamic(&components)
            }
        }
    }

    pub(crate) fn references(&self) -> impl Iterator<Item = &ResolvedReference> {
        let sources: &[ValueSource] = match self {
            PointValue::Constant(_) => &[],
            PointValue::Dynamic(sources) => sources,
        };
        sources.iter().filter_map(|s| match s {
            ValueSource::Reference(r) => Some(r),
            ValueSource::Numbers(_) => None,
        })
    }

    /// Wire form of the value group (without time).
    pub(crate) fn to_values(&self) -> Vec<Value> {
        match self {
            PointValue::Constant(v) => K::components(*v)
                .into_iter()
                .map(Value::from)
                .collect(),
            PointValue::Dynamic(sources) => sources
                .iter()
                .flat_map(|s| match s {
                    ValueSource::Numbers(numbers) => {
                        numbers.iter().copied().map(Value::from).collect()
                    }
                    ValueSource::Reference(r) => vec![Value::from(r.reference.to_raw().as_str())],
                })
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Modifier<K: PointKind> {
    pub(crate) value: PointValue<K>,
    pub(crate) operation: Operation,
    pub(crate) children: Vec<Modifier<K>>,
}

impl<K: PointKind> Modifier<K> {
    pub fn operation(&self) -> Operation {
        self.operation
    }

    pub fn children(&self) -> &[Modifier<K>] {
        &self.children
    }

    pub fn evaluate(&self, context: &ProviderContext) -> K::Output {
        fold_modifiers::<K>(self.value.evaluate(context), &self.children, context)
    }

    pub(crate) fn any_resolved(&self) -> bool {
        self.value.references().any(|r| r.is_resolved())
            || self.children.iter().any(|c| c.any_resolved())
    }

    pub(crate) fn to_value(&self) -> Value {
        let mut items = self.value.to_values();
        if let Some(name) = self.operation.name() {
            items.push(Value::from(name));
        }
        items.extend(self.children.iter().map(|c| c.to_value()));
        Value::Array(items)
    }
}

/// Fold `modifiers` onto `start` left to right.
pub(crate) fn fold_modifiers<K: PointKind>(
    start: K::Output,
    modifiers: &[Modifier<K>],
    context: &ProviderContext,
) -> K::Output {
    modifiers.iter().fold(start, |acc, m| {
        K::apply_op(acc, m.evaluate(context), m.operation)
    })
}
