//! 2D geometry: points, rectangles, and affine matrices.
//!
//! Rectangles are stored as edges (`left`, `top`, `right`, `bottom`) because
//! every filter stage grows or clips edges independently. A rectangle whose
//! right/bottom edge does not exceed its left/top edge is empty.

use serde::{Deserialize, Serialize};

/// A 2D point, also used for per-axis scale factors.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
    pub const ONE: Self = Self { x: 1.0, y: 1.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Same value on both axes.
    pub const fn splat(v: f32) -> Self {
        Self { x: v, y: v }
    }

    pub fn max_component(self) -> f32 {
        self.x.max(self.y)
    }
}

/// Axis-aligned rectangle stored by edges.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub const fn empty() -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0)
    }

    pub fn from_xywh(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(x, y, x + width, y + height)
    }

    pub fn from_wh(width: f32, height: f32) -> Self {
        Self::from_xywh(0.0, 0.0, width, height)
    }

    /// Smallest rectangle containing every point.
    pub fn from_points(points: &[Point]) -> Self {
        let Some(first) = points.first() else {
            return Self::empty();
        };
        let mut rect = Self::new(first.x, first.y, first.x, first.y);
        for p in &points[1..] {
            rect.left = rect.left.min(p.x);
            rect.top = rect.top.min(p.y);
            rect.right = rect.right.max(p.x);
            rect.bottom = rect.bottom.max(p.y);
        }
        rect
    }

    pub fn x(&self) -> f32 {
        self.left
    }

    pub fn y(&self) -> f32 {
        self.top
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.left + self.right) * 0.5,
            (self.top + self.bottom) * 0.5,
        )
    }

    pub fn origin(&self) -> Point {
        Point::new(self.left, self.top)
    }

    pub fn is_empty(&self) -> bool {
        // Written negated so NaN edges also count as empty.
        !(self.left < self.right && self.top < self.bottom)
    }

    pub fn set_xywh(&mut self, x: f32, y: f32, width: f32, height: f32) {
        *self = Self::from_xywh(x, y, width, height);
    }

    /// Grow to integer edges: floor the origin, ceil the far edges.
    pub fn round_out(&mut self) {
        self.left = self.left.floor();
        self.top = self.top.floor();
        self.right = self.right.ceil();
        self.bottom = self.bottom.ceil();
    }

    pub fn rounded_out(mut self) -> Self {
        self.round_out();
        self
    }

    /// Replace `self` with its intersection with `other`.
    ///
    /// Returns `false` and leaves `self` untouched when the intersection is empty.
    pub fn intersect(&mut self, other: &Rect) -> bool {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right.min(other.right);
        let bottom = self.bottom.min(other.bottom);
        let result = Rect::new(left, top, right, bottom);
        if result.is_empty() {
            return false;
        }
        *self = result;
        true
    }

    /// Grow `self` to also cover `other`. Empty rectangles contribute nothing.
    pub fn join(&mut self, other: &Rect) {
        if other.is_empty() {
            return;
        }
        if self.is_empty() {
            *self = *other;
            return;
        }
        self.left = self.left.min(other.left);
        self.top = self.top.min(other.top);
        self.right = self.right.max(other.right);
        self.bottom = self.bottom.max(other.bottom);
    }

    pub fn outset(&mut self, dx: f32, dy: f32) {
        self.left -= dx;
        self.top -= dy;
        self.right += dx;
        self.bottom += dy;
    }

    pub fn offset(&mut self, dx: f32, dy: f32) {
        self.left += dx;
        self.top += dy;
        self.right += dx;
        self.bottom += dy;
    }

    pub fn scale(&mut self, sx: f32, sy: f32) {
        self.left *= sx;
        self.top *= sy;
        self.right *= sx;
        self.bottom *= sy;
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right, self.top),
            Point::new(self.left, self.bottom),
            Point::new(self.right, self.bottom),
        ]
    }
}

/// 2D affine matrix.
///
/// Maps `(x, y)` to `(scale_x * x + skew_x * y + trans_x, skew_y * x + scale_y * y + trans_y)`.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    pub scale_x: f32,
    pub skew_x: f32,
    pub trans_x: f32,
    pub skew_y: f32,
    pub scale_y: f32,
    pub trans_y: f32,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        skew_x: 0.0,
        trans_x: 0.0,
        skew_y: 0.0,
        scale_y: 1.0,
        trans_y: 0.0,
    };

    pub fn translate(dx: f32, dy: f32) -> Self {
        Self {
            trans_x: dx,
            trans_y: dy,
            ..Self::IDENTITY
        }
    }

    pub fn scale(sx: f32, sy: f32) -> Self {
        Self {
            scale_x: sx,
            scale_y: sy,
            ..Self::IDENTITY
        }
    }

    /// Rotation by `degrees`, clockwise in a y-down coordinate system.
    pub fn rotate(degrees: f32) -> Self {
        let (sin, cos) = degrees.to_radians().sin_cos();
        Self {
            scale_x: cos,
            skew_x: -sin,
            trans_x: 0.0,
            skew_y: sin,
            scale_y: cos,
            trans_y: 0.0,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn has_skew(&self) -> bool {
        self.skew_x != 0.0 || self.skew_y != 0.0
    }

    /// `self * other`: `other` is applied first.
    pub fn concat(&self, other: &Matrix) -> Matrix {
        Matrix {
            scale_x: self.scale_x * other.scale_x + self.skew_x * other.skew_y,
            skew_x: self.scale_x * other.skew_x + self.skew_x * other.scale_y,
            trans_x: self.scale_x * other.trans_x + self.skew_x * other.trans_y + self.trans_x,
            skew_y: self.skew_y * other.scale_x + self.scale_y * other.skew_y,
            scale_y: self.skew_y * other.skew_x + self.scale_y * other.scale_y,
            trans_y: self.skew_y * other.trans_x + self.scale_y * other.trans_y + self.trans_y,
        }
    }

    pub fn pre_concat(&mut self, other: &Matrix) {
        *self = self.concat(other);
    }

    pub fn post_concat(&mut self, other: &Matrix) {
        *self = other.concat(self);
    }

    pub fn pre_translate(&mut self, dx: f32, dy: f32) {
        self.pre_concat(&Matrix::translate(dx, dy));
    }

    pub fn pre_scale(&mut self, sx: f32, sy: f32) {
        self.pre_concat(&Matrix::scale(sx, sy));
    }

    pub fn determinant(&self) -> f32 {
        self.scale_x * self.scale_y - self.skew_x * self.skew_y
    }

    /// Inverse matrix, or `None` when the matrix is singular.
    pub fn invert(&self) -> Option<Matrix> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv = 1.0 / det;
        Some(Matrix {
            scale_x: self.scale_y * inv,
            skew_x: -self.skew_x * inv,
            trans_x: (self.skew_x * self.trans_y - self.scale_y * self.trans_x) * inv,
            skew_y: -self.skew_y * inv,
            scale_y: self.scale_x * inv,
            trans_y: (self.skew_y * self.trans_x - self.scale_x * self.trans_y) * inv,
        })
    }

    pub fn map_point(&self, p: Point) -> Point {
        Point::new(
            self.scale_x * p.x + self.skew_x * p.y + self.trans_x,
            self.skew_y * p.x + self.scale_y * p.y + self.trans_y,
        )
    }

    /// Bounding box of the mapped corners of `rect`.
    pub fn map_rect(&self, rect: &Rect) -> Rect {
        let corners = rect.corners().map(|p| self.map_point(p));
        Rect::from_points(&corners)
    }

    /// Per-axis scale, ignoring translation and rotation.
    pub fn scale_factors(&self) -> Point {
        let x = self.scale_x.hypot(self.skew_y);
        let y = if x == 0.0 {
            0.0
        } else {
            self.determinant().abs() / x
        };
        Point::new(x, y)
    }

    /// Reciprocal of [`scale_factors`](Self::scale_factors); degenerate axes map to 1.
    pub fn inverted_scale_factors(&self) -> Point {
        let s = self.scale_factors();
        let recip = |v: f32| if v > f32::EPSILON { 1.0 / v } else { 1.0 };
        Point::new(recip(s.x), recip(s.y))
    }

    pub fn max_scale_factor(&self) -> f32 {
        self.scale_factors().max_component()
    }
}
