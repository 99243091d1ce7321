//! Integer grid coordinates, bounding boxes and cube faces.

use std::fmt;
use std::ops::{Add, Sub};

/// Integer position in grid space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPos {
    /// X coordinate.
    pub x: i32,
    /// Y coordinate.
    pub y: i32,
    /// Z coordinate.
    pub z: i32,
}

impl GridPos {
    /// The origin.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a new position.
    #[inline]
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Returns the component along `axis` (0 = x, 1 = y, 2 = z).
    #[inline]
    #[must_use]
    pub const fn axis(self, axis: usize) -> i32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    /// Returns a copy with the component along `axis` replaced.
    #[inline]
    #[must_use]
    pub const fn with_axis(mut self, axis: usize, value: i32) -> Self {
        match axis {
            0 => self.x = value,
            1 => self.y = value,
            _ => self.z = value,
        }
        self
    }

    /// Returns the components as an array.
    #[inline]
    #[must_use]
    pub const fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    /// Component-wise minimum.
    #[inline]
    #[must_use]
    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y), self.z.min(other.z))
    }

    /// Component-wise maximum.
    #[inline]
    #[must_use]
    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y), self.z.max(other.z))
    }

    /// Returns the neighbouring position across `face`.
    #[inline]
    #[must_use]
    pub fn neighbor(self, face: Face) -> Self {
        self + face.delta()
    }
}

impl From<[i32; 3]> for GridPos {
    fn from(v: [i32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for GridPos {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for GridPos {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl fmt::Display for GridPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{},{},{}]", self.x, self.y, self.z)
    }
}

/// Inclusive axis-aligned box of grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    /// Minimum corner (inclusive).
    pub min: GridPos,
    /// Maximum corner (inclusive).
    pub max: GridPos,
}

impl BoundingBox {
    /// A box covering exactly one cell.
    #[inline]
    #[must_use]
    pub const fn point(pos: GridPos) -> Self {
        Self { min: pos, max: pos }
    }

    /// Creates a box from two corners in any order.
    #[must_use]
    pub fn from_corners(a: GridPos, b: GridPos) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Grows the box to contain `pos`.
    #[inline]
    pub fn include(&mut self, pos: GridPos) {
        self.min = self.min.min(pos);
        self.max = self.max.max(pos);
    }

    /// Returns true if `pos` lies inside the box.
    #[inline]
    #[must_use]
    pub fn contains(&self, pos: GridPos) -> bool {
        (0..3).all(|a| pos.axis(a) >= self.min.axis(a) && pos.axis(a) <= self.max.axis(a))
    }

    /// Returns true if `pos` sits on one of the six boundary planes.
    #[inline]
    #[must_use]
    pub fn touches_boundary(&self, pos: GridPos) -> bool {
        (0..3).any(|a| pos.axis(a) == self.min.axis(a) || pos.axis(a) == self.max.axis(a))
    }

    /// Number of cells along each axis.
    #[inline]
    #[must_use]
    pub fn extent(&self) -> GridPos {
        self.max - self.min + GridPos::new(1, 1, 1)
    }

    /// Geometric centre, treating each cell as centred on its integer position.
    #[must_use]
    pub fn center(&self) -> [f32; 3] {
        let c = |a: usize| (self.min.axis(a) as f32 + self.max.axis(a) as f32) * 0.5;
        [c(0), c(1), c(2)]
    }

    /// Intersection of two boxes, or `None` if they do not overlap.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Option<Self> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min.x <= max.x && min.y <= max.y && min.z <= max.z).then_some(Self { min, max })
    }

    /// Smallest box containing every position, or `None` for an empty iterator.
    pub fn enclosing<I: IntoIterator<Item = GridPos>>(positions: I) -> Option<Self> {
        let mut iter = positions.into_iter();
        let mut bbox = Self::point(iter.next()?);
        for pos in iter {
            bbox.include(pos);
        }
        Some(bbox)
    }
}

/// One of the six faces of a unit cube.
///
/// Up/down run along Y, left/right along X, forward/backward along Z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    /// +Y
    Up = 0,
    /// -Y
    Down = 1,
    /// -X
    Left = 2,
    /// +X
    Right = 3,
    /// +Z
    Forward = 4,
    /// -Z
    Backward = 5,
}

impl Face {
    /// All faces, in slot order.
    pub const ALL: [Face; 6] = [
        Face::Up,
        Face::Down,
        Face::Left,
        Face::Right,
        Face::Forward,
        Face::Backward,
    ];

    /// Returns the `[0..6)` slot of this face.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Axis this face is perpendicular to (0 = x, 1 = y, 2 = z).
    #[inline]
    #[must_use]
    pub const fn axis(self) -> usize {
        match self {
            Face::Left | Face::Right => 0,
            Face::Up | Face::Down => 1,
            Face::Forward | Face::Backward => 2,
        }
    }

    /// True if the face points along the positive axis direction.
    #[inline]
    #[must_use]
    pub const fn is_positive(self) -> bool {
        matches!(self, Face::Up | Face::Right | Face::Forward)
    }

    /// The face pointing along `axis`, positive or negative.
    #[must_use]
    pub const fn from_axis(axis: usize, positive: bool) -> Self {
        match (axis, positive) {
            (0, true) => Face::Right,
            (0, false) => Face::Left,
            (1, true) => Face::Up,
            (1, false) => Face::Down,
            (_, true) => Face::Forward,
            (_, false) => Face::Backward,
        }
    }

    /// The face on the other side of the shared plane.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Face::Up => Face::Down,
            Face::Down => Face::Up,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
            Face::Forward => Face::Backward,
            Face::Backward => Face::Forward,
        }
    }

    /// Integer step taken when leaving the cube through this face.
    #[inline]
    #[must_use]
    pub const fn delta(self) -> GridPos {
        let sign = if self.is_positive() { 1 } else { -1 };
        GridPos::ZERO.with_axis(self.axis(), sign)
    }

    /// Unit outward normal.
    #[inline]
    #[must_use]
    pub fn normal(self) -> [f32; 3] {
        let d = self.delta();
        [d.x as f32, d.y as f32, d.z as f32]
    }
}
