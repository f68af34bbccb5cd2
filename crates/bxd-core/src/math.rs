//! Vector type shared by joints, nodes and both writers

use std::ops::{Add, Mul, Neg, Sub};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Three-component vector in the exporting body's local frame.
///
/// Serializes as `{ "x": .., "y": .., "z": .. }`, which is the projection both
/// interchange formats expect.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn length(self) -> f32 {
        Vec3::from(self).length()
    }

    pub fn dot(self, other: Self) -> f32 {
        Vec3::from(self).dot(other.into())
    }

    pub fn cross(self, other: Self) -> Self {
        Vec3::from(self).cross(other.into()).into()
    }

    /// Unit vector in the same direction, or `None` for zero-length or
    /// non-finite input.
    pub fn normalize(self) -> Option<Self> {
        Vec3::from(self).try_normalize().map(Self::from)
    }
}

impl From<Vec3> for Vector3 {
    fn from(v: Vec3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for Vec3 {
    fn from(v: Vector3) -> Self {
        Vec3::new(v.x, v.y, v.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        (Vec3::from(self) + Vec3::from(rhs)).into()
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        (Vec3::from(self) - Vec3::from(rhs)).into()
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        (Vec3::from(self) * rhs).into()
    }
}
