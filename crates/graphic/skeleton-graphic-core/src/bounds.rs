//! Axis-aligned bounds over generated mesh data.

use serde::{Deserialize, Serialize};

/// Axis-aligned box stored as min/max corners.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    /// Zero-size box at the origin.
    pub const ZERO: Bounds = Bounds {
        min: [0.0; 3],
        max: [0.0; 3],
    };

    /// Tight box around `points`; `None` when there are none.
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a [f32; 3]>,
    {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut b = Bounds {
            min: *first,
            max: *first,
        };
        for p in iter {
            b.encapsulate_point(p);
        }
        Some(b)
    }

    pub fn encapsulate_point(&mut self, p: &[f32; 3]) {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(p[axis]);
            self.max[axis] = self.max[axis].max(p[axis]);
        }
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Bounds) -> Bounds {
        let mut out = *self;
        out.encapsulate_point(&other.min);
        out.encapsulate_point(&other.max);
        out
    }

    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    pub fn center(&self) -> [f32; 3] {
        [
            (self.min[0] + self.max[0]) * 0.5,
            (self.min[1] + self.max[1]) * 0.5,
            (self.min[2] + self.max[2]) * 0.5,
        ]
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        let s = self.size();
        s[0] == 0.0 || s[1] == 0.0
    }
}

/// Size and normalized pivot that make a 2D rect frame a set of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectFit {
    pub size: [f32; 2],
    pub pivot: [f32; 2],
}

impl RectFit {
    /// Fallback used when the bounds have no area.
    pub const DEFAULT_SIZE: f32 = 100.0;

    pub fn from_bounds(bounds: &Bounds) -> Self {
        if bounds.is_degenerate() {
            return Self {
                size: [Self::DEFAULT_SIZE, Self::DEFAULT_SIZE],
                pivot: [0.5, 0.5],
            };
        }
        let size = bounds.size();
        let center = bounds.center();
        Self {
            size: [size[0], size[1]],
            pivot: [0.5 - center[0] / size[0], 0.5 - center[1] / size[1]],
        }
    }
}
