//! Animatable property values.

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::geometry::Point;
use crate::types::Frame;

/// Blend between two values of the same type.
pub trait Interpolate: Clone {
    /// `t` is in `[0, 1]`.
    fn interpolate(&self, other: &Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Interpolate for Point {
    fn interpolate(&self, other: &Self, t: f32) -> Self {
        Point::new(self.x.interpolate(&other.x, t), self.y.interpolate(&other.y, t))
    }
}

/// Hold interpolation: the earlier keyframe wins until the next one is reached.
#[macro_export]
macro_rules! impl_hold_interpolate {
    ($($ty:ty),* $(,)?) => {
        $(
            impl $crate::property::Interpolate for $ty {
                fn interpolate(&self, other: &Self, t: f32) -> Self {
                    if t >= 1.0 { other.clone() } else { self.clone() }
                }
            }
        )*
    };
}

impl_hold_interpolate!(bool, u32);

/// One keyframe of an animated property.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe<T> {
    pub frame: Frame,
    pub value: T,
}

/// A value that is either constant or keyframed over time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Property<T> {
    Static(T),
    Animated(Vec<Keyframe<T>>),
}

impl<T: Interpolate> Property<T> {
    /// Build an animated property; keyframes are sorted by frame.
    pub fn animated(keyframes: Vec<(Frame, T)>) -> Result<Self, ModelError> {
        if keyframes.is_empty() {
            return Err(ModelError::EmptyKeyframes);
        }
        let mut keyframes: Vec<Keyframe<T>> = keyframes
            .into_iter()
            .map(|(frame, value)| Keyframe { frame, value })
            .collect();
        keyframes.sort_by_key(|k| k.frame);
        Ok(Self::Animated(keyframes))
    }

    /// Whether the value can change over time.
    pub fn animatable(&self) -> bool {
        matches!(self, Self::Animated(_))
    }

    /// Value at `frame`, clamped to the first/last keyframe outside the animated range.
    pub fn value_at(&self, frame: Frame) -> T {
        match self {
            Self::Static(value) => value.clone(),
            Self::Animated(keyframes) => {
                let next = keyframes.partition_point(|k| k.frame <= frame);
                if next == 0 {
                    return keyframes[0].value.clone();
                }
                let prev = &keyframes[next - 1];
                let Some(next) = keyframes.get(next) else {
                    return prev.value.clone();
                };
                let span = (next.frame.0 - prev.frame.0) as f32;
                let t = (frame.0 - prev.frame.0) as f32 / span;
                prev.value.interpolate(&next.value, t)
            }
        }
    }
}

impl<T> From<T> for Property<T> {
    fn from(value: T) -> Self {
        Self::Static(value)
    }
}
