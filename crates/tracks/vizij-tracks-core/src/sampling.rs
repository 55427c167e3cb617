//! Keyframe sampling.
//!
//! Model:
//! - Keyframes are sorted ascending by time; equal times keep input order.
//! - At or past the last keyframe the last value is held and the query is flagged last.
//! - At or before the first keyframe the first value is held.
//! - Inside, the bracketing pair is blended by the right keyframe's easing
//!   (and spline, for kinds that support one).

use crate::keyframe::{Keyframe, Spline};
use crate::kind::PointKind;
use crate::providers::ProviderContext;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Segment {
    /// Hold keyframe `index`; `is_last` as reported to the caller.
    Hold { index: usize, is_last: bool },
    /// Blend `left..right` by normalized local time `t`.
    Between { left: usize, right: usize, t: f32 },
}

/// Locate the segment containing `time`.
///
/// Callers guarantee at least one keyframe.
pub(crate) fn find_segment<K: PointKind>(keyframes: &[Keyframe<K>], time: f32) -> Segment {
    let n = keyframes.len();
    if n <= 1 {
        return Segment::Hold {
            index: 0,
            is_last: true,
        };
    }
    // last-first order matters when every keyframe shares one time
    if time >= keyframes[n - 1].time {
        return Segment::Hold {
            index: n - 1,
            is_last: true,
        };
    }
    if time <= keyframes[0].time {
        return Segment::Hold {
            index: 0,
            is_last: false,
        };
    }
    // first keyframe strictly after `time`; ties resolve to the later index
    let right = keyframes.partition_point(|k| k.time <= time);
    let left = right - 1;
    let t0 = keyframes[left].time;
    let t1 = keyframes[right].time;
    Segment::Between {
        left,
        right,
        t: (time - t0) / (t1 - t0),
    }
}

/// Evaluate the keyframes at `time` without any definition-level base.
pub(crate) fn sample_keyframes<K: PointKind>(
    keyframes: &[Keyframe<K>],
    time: f32,
    context: &ProviderContext,
) -> (K::Output, bool) {
    if keyframes.is_empty() {
        return (K::from_dynamic(&[]), false);
    }
    match find_segment(keyframes, time) {
        Segment::Hold { index, is_last } => (keyframes[index].value(context), is_last),
        Segment::Between { left, right, t } => {
            let a = &keyframes[left];
            let b = &keyframes[right];
            let eased = b.easing.apply(t);
            let va = a.value(context);
            let vb = b.value(context);
            let spline = if b.spline == Spline::CatmullRom {
                let p0 = match left.checked_sub(1) {
                    Some(i) => keyframes[i].value(context),
                    None => va,
                };
                let p3 = match keyframes.get(right + 1) {
                    Some(k) => k.value(context),
                    None => vb,
                };
                K::catmull_rom(p0, va, vb, p3, eased)
            } else {
                None
            };
            (spline.unwrap_or_else(|| K::blend(va, vb, eased)), false)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interp::Easing;
    use crate::kind::FloatKind;
    use crate::modifier::PointValue;

    fn key(time: f32, v: f32) -> Keyframe<FloatKind> {
        Keyframe {
            time,
            value: PointValue::Constant(v),
            modifiers: Vec::new(),
            easing: Easing::Linear,
            spline: Spline::Linear,
        }
    }

    #[test]
    fn segment_lookup_matches_linear_scan() {
        let keys = [key(0.0, 0.0), key(0.25, 1.0), key(0.5, 2.0), key(1.0, 3.0)];
        for step in 1..100 {
            let time = step as f32 / 100.0;
            let scan = keys.windows(2).position(|w| w[0].time <= time && time < w[1].time);
            match find_segment(&keys, time) {
                Segment::Between { left, right, t } => {
                    assert_eq!(Some(left), scan, "time {time}");
                    assert_eq!(right, left + 1);
                    assert!((0.0..1.0).contains(&t));
                }
                Segment::Hold { .. } => panic!("time {time} should be inside"),
            }
        }
    }

    #[test]
    fn duplicate_times_resolve_to_later_keyframe() {
        let keys = [key(0.0, 0.0), key(0.5, 1.0), key(0.5, 2.0), key(1.0, 3.0)];
        let ctx = ProviderContext::new();
        // exactly on the duplicate: the segment starts at the later one
        assert_eq!(
            find_segment(&keys, 0.5),
            Segment::Between {
                left: 2,
                right: 3,
                t: 0.0
            }
        );
        assert_eq!(sample_keyframes(&keys, 0.5, &ctx), (2.0, false));
    }

    #[test]
    fn degenerate_curve_reports_last() {
        let keys = [key(1.0, 5.0), key(1.0, 7.0)];
        let ctx = ProviderContext::new();
        assert_eq!(sample_keyframes(&keys, 1.0, &ctx), (7.0, true));
        assert_eq!(sample_keyframes(&keys, 0.0, &ctx), (5.0, false));
    }

    #[test]
    fn single_keyframe_is_always_last() {
        let keys = [key(3.0, 4.0)];
        let ctx = ProviderContext::new();
        assert_eq!(sample_keyframes(&keys, -10.0, &ctx), (4.0, true));
        assert_eq!(sample_keyframes(&keys, 10.0, &ctx), (4.0, true));
    }
}
