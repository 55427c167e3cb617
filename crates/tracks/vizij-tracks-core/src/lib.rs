//! Vizij Tracks Core
//!
//! Keyframe curves ("point definitions") for scalars, 3-vectors, 4-vectors and
//! rotations. A curve is parsed once from a compact array notation, then
//! evaluated at arbitrary times. Curves may be offset or composed with named
//! base values supplied by the host, either set directly on a
//! [`ProviderContext`] or computed on demand by callbacks registered in an
//! [`UpdatableProviderRegistry`].

pub mod config;
pub mod definition;
pub mod error;
pub mod interp;
pub mod keyframe;
pub mod kind;
pub mod modifier;
mod parse;
pub mod providers;
mod sampling;
pub mod value;

// Re-exports for consumers (bindings)
pub use config::{Config, ProviderPrecedence};
pub use definition::{
    FloatPointDefinition, PointDefinition, QuaternionPointDefinition, Vector3PointDefinition,
    Vector4PointDefinition,
};
pub use error::ParseError;
pub use interp::Easing;
pub use keyframe::{Keyframe, Spline};
pub use kind::{FloatKind, PointKind, QuaternionKind, Vector3Kind, Vector4Kind};
pub use modifier::{Modifier, Operation};
pub use providers::{
    BaseEntry, BaseSample, BaseTag, ProviderContext, ProviderReference, ProviderSlot,
    UpdatableHandle, UpdatableProvider, UpdatableProviderRegistry,
};
pub use value::{Value, ValueType};
