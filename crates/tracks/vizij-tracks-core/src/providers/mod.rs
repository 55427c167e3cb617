//! Named base providers and how point definitions reference them.
//!
//! Two tiers exist: the static [`ProviderContext`] written by the host, and the
//! [`UpdatableProviderRegistry`] of callbacks. A reference is resolved once at
//! parse time into a [`ProviderLink`]; its values are fetched live per query.

pub mod context;
pub mod updatable;

pub use context::{BaseEntry, ProviderContext, ProviderSlot};
pub use updatable::{UpdatableHandle, UpdatableProvider, UpdatableProviderRegistry};

use crate::config::ProviderPrecedence;
use updatable::UpdatableLink;

/// How a fetched base value should combine with curve output.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BaseTag {
    Plain,
    Quaternion,
    /// Callback providers carry no tag; each value kind decides.
    Untagged,
}

/// Base values fetched for one query.
#[derive(Clone, Debug, PartialEq)]
pub struct BaseSample {
    pub values: Vec<f32>,
    pub tag: BaseTag,
}

/// A provider name with an optional component swizzle (`"head.xz"`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderReference {
    pub name: String,
    pub swizzle: Option<Vec<usize>>,
}

impl ProviderReference {
    pub fn parse(raw: &str) -> Self {
        let Some((name, suffix)) = raw.split_once('.') else {
            return Self {
                name: raw.to_string(),
                swizzle: None,
            };
        };
        let swizzle: Option<Vec<usize>> = suffix
            .chars()
            .map(|c| match c {
                'x' => Some(0),
                'y' => Some(1),
                'z' => Some(2),
                'w' => Some(3),
                _ => None,
            })
            .collect();
        if swizzle.is_none() {
            log::warn!("ignoring unsupported provider suffix '.{suffix}' on '{name}'");
        }
        Self {
            name: name.to_string(),
            swizzle: swizzle.filter(|s| !s.is_empty()),
        }
    }

    /// Canonical text form, `name` or `name.xyz`.
    pub fn to_raw(&self) -> String {
        match &self.swizzle {
            None => self.name.clone(),
            Some(parts) => {
                let suffix: String = parts.iter().map(|&i| ['x', 'y', 'z', 'w'][i]).collect();
                format!("{}.{}", self.name, suffix)
            }
        }
    }

    fn apply(&self, sample: BaseSample) -> BaseSample {
        match &self.swizzle {
            None => sample,
            Some(parts) => BaseSample {
                values: parts
                    .iter()
                    .map(|&i| sample.values.get(i).copied().unwrap_or(0.0))
                    .collect(),
                tag: BaseTag::Plain,
            },
        }
    }
}

/// Parse-time resolution of a reference.
#[derive(Clone, Debug)]
pub(crate) enum ProviderLink {
    Static(ProviderSlot),
    Updatable(UpdatableLink),
}

/// A reference together with what it resolved to (if anything).
#[derive(Clone, Debug)]
pub(crate) struct ResolvedReference {
    pub(crate) reference: ProviderReference,
    pub(crate) link: Option<ProviderLink>,
}

impl ResolvedReference {
    pub(crate) fn resolve(
        raw: &str,
        context: &ProviderContext,
        updatable: Option<&UpdatableProviderRegistry>,
        precedence: ProviderPrecedence,
    ) -> Self {
        let reference = ProviderReference::parse(raw);
        let from_updatable = || {
            updatable
                .and_then(|registry| {
                    registry
                        .lookup(&reference.name)
                        .map(|handle| registry.link(handle))
                })
                .map(ProviderLink::Updatable)
        };
        let from_static = || context.slot(&reference.name).map(ProviderLink::Static);
        let link = match precedence {
            ProviderPrecedence::UpdatableFirst => from_updatable().or_else(from_static),
            ProviderPrecedence::StaticFirst => from_static().or_else(from_updatable),
        };
        match &link {
            Some(ProviderLink::Static(slot)) => {
                log::debug!("'{}' resolved to static slot {}", reference.name, slot.index())
            }
            Some(ProviderLink::Updatable(l)) => log::debug!(
                "'{}' resolved to updatable provider {:#x}",
                reference.name,
                l.handle().to_bits()
            ),
            None => log::debug!("'{}' did not resolve to any provider", reference.name),
        }
        Self { reference, link }
    }

    #[inline]
    pub(crate) fn is_resolved(&self) -> bool {
        self.link.is_some()
    }

    /// Fetch current values. `None` when unresolved, stale or missing.
    pub(crate) fn sample(&self, context: &ProviderContext) -> Option<BaseSample> {
        let sample = match self.link.as_ref()? {
            ProviderLink::Static(slot) => {
                let entry = context.get_slot(*slot, &self.reference.name)?;
                BaseSample {
                    values: entry.values.clone(),
                    tag: if entry.is_quaternion {
                        BaseTag::Quaternion
                    } else {
                        BaseTag::Plain
                    },
                }
            }
            ProviderLink::Updatable(link) => match link.invoke(context) {
                Some(values) => BaseSample {
                    values,
                    tag: BaseTag::Untagged,
                },
                None => {
                    log::trace!("updatable provider '{}' is stale", self.reference.name);
                    return None;
                }
            },
        };
        Some(self.reference.apply(sample))
    }
}
