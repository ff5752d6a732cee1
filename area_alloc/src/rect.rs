// Copyright 2025 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Integer rectangle geometry used by the allocator.

use smallvec::SmallVec;

/// An axis-aligned rectangle with its origin at the top-left corner.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Horizontal extent.
    pub width: u32,
    /// Vertical extent.
    pub height: u32,
}

impl Rect {
    /// Create a new rectangle.
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle of the given size positioned at the origin.
    pub const fn from_size(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    /// The exclusive right edge, clamped to `u32::MAX`.
    pub const fn max_x(self) -> u32 {
        self.x.saturating_add(self.width)
    }

    /// The exclusive bottom edge, clamped to `u32::MAX`.
    pub const fn max_y(self) -> u32 {
        self.y.saturating_add(self.height)
    }

    /// Whether either dimension is zero.
    pub const fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The number of cells covered by the rectangle.
    pub const fn area(self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether a `width` by `height` rectangle fits inside this one.
    pub const fn fits(self, width: u32, height: u32) -> bool {
        self.width >= width && self.height >= height
    }

    /// Whether the two rectangles share any cell.
    ///
    /// Empty rectangles never intersect anything.
    pub fn intersects(self, other: Self) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.max_x()
            && other.x < self.max_x()
            && self.y < other.max_y()
            && other.y < self.max_y()
    }

    /// Whether `other` lies entirely within this rectangle.
    pub fn contains_rect(self, other: Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.max_x() <= self.max_x()
            && other.max_y() <= self.max_y()
    }

    /// Carve a `width` by `height` rectangle out of the top-left corner and return what is left.
    ///
    /// The remainders come in a fixed order: the strip to the right of the carved
    /// rectangle, the strip below it, then the diagonal corner. Only remainders with a
    /// positive size are returned, and together they tile `self` minus the carved part.
    ///
    /// ```text
    ///  +--------+-------+
    ///  | carved | right |
    ///  +--------+-------+
    ///  | bottom | diag  |
    ///  +--------+-------+
    /// ```
    pub(crate) fn split(self, width: u32, height: u32) -> SmallVec<[Self; 3]> {
        debug_assert!(self.fits(width, height), "split size must fit");

        let extra_width = self.width - width;
        let extra_height = self.height - height;
        let mut remainders = SmallVec::new();

        if extra_width > 0 {
            remainders.push(Self::new(self.x + width, self.y, extra_width, height));
        }
        if extra_height > 0 {
            remainders.push(Self::new(self.x, self.y + height, width, extra_height));
        }
        if extra_width > 0 && extra_height > 0 {
            remainders.push(Self::new(
                self.x + width,
                self.y + height,
                extra_width,
                extra_height,
            ));
        }

        remainders
    }

    /// Merge two rectangles that share one full edge.
    ///
    /// Only exact edge alignment counts: the rectangles must have the same `x` and
    /// `width` and touch vertically, or the same `y` and `height` and touch
    /// horizontally. Anything else (L-shapes, partially shared edges) returns `None`.
    pub(crate) fn merge(self, other: Self) -> Option<Self> {
        if self.x == other.x && self.width == other.width {
            if self.max_y() == other.y {
                return Some(Self::new(
                    self.x,
                    self.y,
                    self.width,
                    self.height + other.height,
                ));
            }
            if other.max_y() == self.y {
                return Some(Self::new(
                    self.x,
                    other.y,
                    self.width,
                    self.height + other.height,
                ));
            }
        }

        if self.y == other.y && self.height == other.height {
            if self.max_x() == other.x {
                return Some(Self::new(
                    self.x,
                    self.y,
                    self.width + other.width,
                    self.height,
                ));
            }
            if other.max_x() == self.x {
                return Some(Self::new(
                    other.x,
                    self.y,
                    self.width + other.width,
                    self.height,
                ));
            }
        }

        None
    }
}
