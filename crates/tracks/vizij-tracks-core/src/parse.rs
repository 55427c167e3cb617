//! Lowering of the compact curve notation into keyframes.
//!
//! Shapes accepted at the top level:
//! - `[[v.., t, flags..], ...]` a list of keyframe entries (`null` entries skipped)
//! - `[v.., t?]` a single keyframe
//! - `["name", [..], [..]]` or `["name", v.., t?]` the same, offset by a named base
//!
//! Inside an entry, numbers and provider names form the value group, `ease*`
//! strings pick the easing, `spline*` strings pick the spline and nested
//! arrays are modifiers `[v.., "opAdd", [nested]..]`.

use crate::config::Config;
use crate::error::ParseError;
use crate::interp::Easing;
use crate::keyframe::{Keyframe, Spline};
use crate::kind::PointKind;
use crate::modifier::{Modifier, Operation, PointValue, ValueSource};
use crate::providers::{ProviderContext, ResolvedReference, UpdatableProviderRegistry};
use crate::value::Value;

pub(crate) struct Parsed<K: PointKind> {
    pub(crate) keyframes: Vec<Keyframe<K>>,
    pub(crate) base: Option<ResolvedReference>,
}

enum Token<'s> {
    Easing,
    Spline,
    Operation,
    Unsupported,
    Reference(&'s str),
}

fn classify(s: &str) -> Token<'_> {
    let op_like = s
        .strip_prefix("op")
        .and_then(|rest| rest.chars().next())
        .is_some_and(|c| c.is_ascii_uppercase());
    if s.starts_with("ease") {
        Token::Easing
    } else if s.starts_with("spline") {
        Token::Spline
    } else if op_like {
        Token::Operation
    } else if s.starts_with("lerp") {
        Token::Unsupported
    } else {
        Token::Reference(s)
    }
}

enum GroupItem<'s> {
    Number(f32),
    Reference(&'s str),
}

pub(crate) struct Parser<'a> {
    context: &'a ProviderContext,
    updatable: Option<&'a UpdatableProviderRegistry>,
    config: &'a Config,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(
        context: &'a ProviderContext,
        updatable: Option<&'a UpdatableProviderRegistry>,
        config: &'a Config,
    ) -> Self {
        Self {
            context,
            updatable,
            config,
        }
    }

    pub(crate) fn parse<K: PointKind>(&self, value: &Value) -> Result<Parsed<K>, ParseError> {
        let Some(items) = value.as_array() else {
            return Err(ParseError::malformed(0, "point definition must be an array"));
        };
        if items.iter().all(Value::is_null) {
            return Err(ParseError::Empty);
        }

        let (base_name, rest) = self.split_base::<K>(items);
        let base = base_name.map(|name| self.resolve(name));

        let first = rest.iter().find(|v| !v.is_null());
        let mut keyframes = match first {
            Some(Value::Array(_)) => {
                let mut keyframes = Vec::with_capacity(rest.len());
                for (index, entry) in rest.iter().enumerate() {
                    match entry {
                        Value::Null => continue,
                        Value::Array(entry) => keyframes.push(self.parse_keyframe::<K>(index, entry)?),
                        _ => {
                            return Err(ParseError::malformed(
                                index,
                                "expected a keyframe array, found a bare value",
                            ))
                        }
                    }
                }
                keyframes
            }
            Some(_) => vec![self.parse_keyframe::<K>(0, rest)?],
            None => Vec::new(),
        };

        if keyframes.is_empty() {
            return Err(ParseError::Empty);
        }
        // stable: equal times keep input order
        keyframes.sort_by(|a, b| a.time.total_cmp(&b.time));
        log::debug!(
            "parsed {} point definition with {} keyframe(s)",
            K::NAME,
            keyframes.len()
        );
        Ok(Parsed { keyframes, base })
    }

    /// Peel a leading provider name off the top-level array.
    ///
    /// `["name", 1, 2, 3]` only reads as a named base when the remainder is a
    /// well-formed constant keyframe; otherwise the whole array is a single
    /// keyframe whose value comes from the provider.
    fn split_base<'v, K: PointKind>(&self, items: &'v [Value]) -> (Option<&'v str>, &'v [Value]) {
        let Some((Value::String(name), rest)) = items.split_first() else {
            return (None, items);
        };
        if rest.is_empty() || !matches!(classify(name), Token::Reference(_)) {
            return (None, items);
        }
        let nested = rest.iter().find(|v| !v.is_null()).is_some_and(Value::is_array);
        if nested {
            return (Some(name.as_str()), rest);
        }
        let all_numbers = rest.iter().all(|v| v.as_f64().is_some());
        if all_numbers && K::split_time(rest.len()).is_some() {
            (Some(name.as_str()), rest)
        } else {
            (None, items)
        }
    }

    fn resolve(&self, raw: &str) -> ResolvedReference {
        ResolvedReference::resolve(
            raw,
            self.context,
            self.updatable,
            self.config.provider_precedence,
        )
    }

    fn parse_keyframe<K: PointKind>(
        &self,
        index: usize,
        entry: &[Value],
    ) -> Result<Keyframe<K>, ParseError> {
        let mut group = Vec::with_capacity(entry.len());
        let mut easing = self.config.default_easing;
        let mut spline = Spline::Linear;
        let mut modifiers = Vec::new();

        for item in entry {
            match item {
                Value::Number(n) => group.push(GroupItem::Number(finite(index, *n)?)),
                Value::String(s) => match classify(s) {
                    Token::Easing => easing = Easing::from_name_or_linear(s),
                    Token::Spline => spline = spline_flag::<K>(s),
                    Token::Operation => {
                        return Err(ParseError::malformed(
                            index,
                            format!("operation '{s}' is only valid inside a modifier"),
                        ))
                    }
                    Token::Unsupported => log::warn!("ignoring unsupported flag '{s}'"),
                    Token::Reference(name) => group.push(GroupItem::Reference(name)),
                },
                Value::Array(nested) => modifiers.push(self.parse_modifier::<K>(index, nested)?),
                Value::Null => {
                    return Err(ParseError::malformed(index, "unexpected null inside keyframe"))
                }
            }
        }

        let (value, time) = self.value_group::<K>(index, group, true)?;
        let value = match value {
            PointValue::Constant(v) if self.config.normalize_quaternion_keys => {
                PointValue::Constant(K::normalize_key(v))
            }
            other => other,
        };
        Ok(Keyframe {
            time,
            value,
            modifiers,
            easing,
            spline,
        })
    }

    fn parse_modifier<K: PointKind>(
        &self,
        index: usize,
        items: &[Value],
    ) -> Result<Modifier<K>, ParseError> {
        let mut group = Vec::with_capacity(items.len());
        let mut operation = Operation::None;
        let mut children = Vec::new();

        for item in items {
            match item {
                Value::Number(n) => group.push(GroupItem::Number(finite(index, *n)?)),
                Value::String(s) => match classify(s) {
                    Token::Operation => {
                        operation = s
                            .parse()
                            .map_err(|reason: String| ParseError::malformed(index, reason))?
                    }
                    Token::Reference(name) => group.push(GroupItem::Reference(name)),
                    Token::Easing | Token::Spline | Token::Unsupported => {
                        log::warn!("ignoring flag '{s}' inside a modifier")
                    }
                },
                Value::Array(nested) => children.push(self.parse_modifier::<K>(index, nested)?),
                Value::Null => {
                    return Err(ParseError::malformed(index, "unexpected null inside modifier"))
                }
            }
        }

        let (value, _) = self.value_group::<K>(index, group, false)?;
        Ok(Modifier {
            value,
            operation,
            children,
        })
    }

    /// Turn a value group into a value and (for keyframes) a time.
    fn value_group<K: PointKind>(
        &self,
        index: usize,
        mut group: Vec<GroupItem<'_>>,
        with_time: bool,
    ) -> Result<(PointValue<K>, f32), ParseError> {
        if group.is_empty() {
            return Err(ParseError::malformed(index, "no value"));
        }

        let has_references = group.iter().any(|g| matches!(g, GroupItem::Reference(_)));
        if !has_references {
            let numbers: Vec<f32> = group
                .iter()
                .filter_map(|g| match g {
                    GroupItem::Number(n) => Some(*n),
                    GroupItem::Reference(_) => None,
                })
                .collect();
            let has_time = if with_time {
                K::split_time(numbers.len())
            } else {
                Some(false)
            };
            let (values, time) = match has_time {
                Some(true) => (&numbers[..numbers.len() - 1], numbers[numbers.len() - 1]),
                Some(false) => (&numbers[..], 0.0),
                None => (&numbers[..0], 0.0),
            };
            let value = has_time.and(K::from_static(values)).ok_or_else(|| {
                ParseError::malformed(
                    index,
                    format!("{} numbers do not form a {} value", numbers.len(), K::NAME),
                )
            })?;
            return Ok((PointValue::Constant(value), time));
        }

        let mut time = 0.0;
        if with_time {
            if let Some(GroupItem::Number(t)) = group.last() {
                time = *t;
                group.pop();
            }
        }

        let static_count = group
            .iter()
            .filter(|g| matches!(g, GroupItem::Number(_)))
            .count();
        if static_count > K::ARITY {
            return Err(ParseError::malformed(
                index,
                format!(
                    "{static_count} numbers alongside provider values exceed {} components",
                    K::ARITY
                ),
            ));
        }

        let mut sources: Vec<ValueSource> = Vec::new();
        for item in group {
            match item {
                GroupItem::Number(n) => match sources.last_mut() {
                    Some(ValueSource::Numbers(run)) => run.push(n),
                    _ => sources.push(ValueSource::Numbers(vec![n])),
                },
                GroupItem::Reference(name) => {
                    sources.push(ValueSource::Reference(self.resolve(name)))
                }
            }
        }
        Ok((PointValue::Dynamic(sources), time))
    }
}

/// Times and values must be finite once narrowed to `f32`.
fn finite(index: usize, n: f64) -> Result<f32, ParseError> {
    let v = n as f32;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ParseError::malformed(index, format!("non-finite number {n} in time/value")))
    }
}

fn spline_flag<K: PointKind>(flag: &str) -> Spline {
    match flag {
        "splineCatmullRom" if K::SUPPORTS_SPLINE => Spline::CatmullRom,
        "splineCatmullRom" => {
            log::warn!("splineCatmullRom has no effect on {} curves", K::NAME);
            Spline::Linear
        }
        "splineLinear" => Spline::Linear,
        other => {
            log::warn!("unknown spline flag '{other}', using linear");
            Spline::Linear
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::{FloatKind, QuaternionKind, Vector3Kind};

    fn parse<K: PointKind>(json: &str) -> Result<Parsed<K>, ParseError> {
        let ctx = ProviderContext::new();
        let config = Config::default();
        let value = Value::from_json_str(json)?;
        Parser::new(&ctx, None, &config).parse::<K>(&value)
    }

    #[test]
    fn non_finite_numbers_are_rejected() {
        let ctx = ProviderContext::new();
        let config = Config::default();
        let parser = Parser::new(&ctx, None, &config);
        let cases = [
            Value::array([Value::numbers(&[0.0, 0.0]), Value::numbers(&[1.0, f64::NAN])]),
            Value::array([Value::numbers(&[f64::INFINITY, 1.0])]),
            Value::numbers(&[0.0, 0.0, 0.0, f64::NEG_INFINITY]),
            Value::array([Value::array([
                Value::number(0.0),
                Value::number(0.0),
                Value::array([Value::number(1e300), Value::from("opAdd")]),
            ])]),
        ];
        for value in cases {
            let err = parser.parse::<FloatKind>(&value).err().unwrap();
            assert!(matches!(err, ParseError::MalformedShape { .. }), "{value:?}: {err}");
        }
    }

    #[test]
    fn keyframes_are_sorted_stably() {
        let parsed = parse::<FloatKind>("[[3, 1], [1, 0.5], [2, 1], [0, 0]]").unwrap();
        let pairs: Vec<(f32, Option<f32>)> = parsed
            .keyframes
            .iter()
            .map(|k| (k.time(), k.constant()))
            .collect();
        assert_eq!(
            pairs,
            vec![(0.0, Some(0.0)), (0.5, Some(1.0)), (1.0, Some(3.0)), (1.0, Some(2.0))]
        );
    }

    #[test]
    fn exact_arity_means_time_zero() {
        let parsed = parse::<Vector3Kind>("[1, 2, 3]").unwrap();
        assert_eq!(parsed.keyframes.len(), 1);
        assert_eq!(parsed.keyframes[0].time(), 0.0);
        assert_eq!(parsed.keyframes[0].constant(), Some([1.0, 2.0, 3.0]));
    }

    #[test]
    fn flags_are_read_in_any_position() {
        let parsed =
            parse::<Vector3Kind>(r#"[[0, 0, 0, 0], ["easeInQuad", 1, 1, 1, 1, "splineCatmullRom"]]"#)
                .unwrap();
        let last = &parsed.keyframes[1];
        assert_eq!(last.easing(), Easing::InQuad);
        assert_eq!(last.spline(), Spline::CatmullRom);
        assert_eq!(last.constant(), Some([1.0, 1.0, 1.0]));
    }

    #[test]
    fn spline_is_ignored_outside_vector3() {
        let parsed = parse::<FloatKind>(r#"[[0, 0], [1, 1, "splineCatmullRom"]]"#).unwrap();
        assert_eq!(parsed.keyframes[1].spline(), Spline::Linear);
    }

    #[test]
    fn null_entries_are_skipped() {
        let parsed = parse::<FloatKind>("[null, [0, 0], null, [1, 1]]").unwrap();
        assert_eq!(parsed.keyframes.len(), 2);
    }

    #[test]
    fn wrong_arity_reports_entry_index() {
        let err = parse::<Vector3Kind>("[[0, 0, 0, 0], [1, 1]]").err().unwrap();
        assert!(matches!(err, ParseError::MalformedShape { index: 1, .. }), "{err}");
    }

    #[test]
    fn empty_inputs_are_rejected() {
        assert!(matches!(parse::<FloatKind>("[]"), Err(ParseError::Empty)));
        assert!(matches!(parse::<FloatKind>("[null]"), Err(ParseError::Empty)));
    }

    #[test]
    fn non_array_is_malformed() {
        let err = parse::<FloatKind>("5").err().unwrap();
        assert!(matches!(err, ParseError::MalformedShape { index: 0, .. }));
    }

    #[test]
    fn operation_outside_modifier_is_malformed() {
        let err = parse::<FloatKind>(r#"[[0, 0, "opAdd"]]"#).err().unwrap();
        assert!(matches!(err, ParseError::MalformedShape { .. }));
    }

    #[test]
    fn unknown_operation_is_malformed() {
        let err = parse::<FloatKind>(r#"[[0, 0, [1, "opPow"]]]"#).err().unwrap();
        assert!(matches!(err, ParseError::MalformedShape { index: 0, .. }));
    }

    #[test]
    fn quaternion_entries_accept_euler_and_xyzw() {
        let parsed = parse::<QuaternionKind>("[[0, 90, 0, 0], [0, 0, 0, 1, 1]]").unwrap();
        let first = parsed.keyframes[0].constant().unwrap();
        let half = std::f32::consts::FRAC_1_SQRT_2;
        assert!((first[1] - half).abs() < 1e-6);
        assert!((first[3] - half).abs() < 1e-6);
        assert_eq!(parsed.keyframes[1].time(), 1.0);
        assert_eq!(parsed.keyframes[1].constant(), Some([0.0, 0.0, 0.0, 1.0]));
    }

    #[test]
    fn leading_name_is_a_base_reference() {
        let parsed = parse::<Vector3Kind>(r#"["head", [0, 0, 0, 0], [1, 1, 1, 1]]"#).unwrap();
        let base = parsed.base.unwrap();
        assert_eq!(base.reference.name, "head");
        assert!(!base.is_resolved());
        assert_eq!(parsed.keyframes.len(), 2);

        let flat = parse::<Vector3Kind>(r#"["head", 0, 0, 0]"#).unwrap();
        assert!(flat.base.is_some());
        assert_eq!(flat.keyframes.len(), 1);
    }

    #[test]
    fn provider_value_group_reads_trailing_time() {
        let parsed = parse::<Vector3Kind>(r#"[["baseHeadPosition", 0.25]]"#).unwrap();
        let key = &parsed.keyframes[0];
        assert_eq!(key.time(), 0.25);
        assert!(key.constant().is_none());
    }
}
