//! Geometric value types and distance routines.
//!
//! Everything in this module is a plain value: points, sizes, rectangular
//! bounds, and per-side insets, plus the pure point/segment/polyline
//! distance functions used by edge hit-testing. Nothing here holds state.

/// A position in diagram coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn x(self) -> f32 {
        self.x
    }

    pub fn y(self) -> f32 {
        self.y
    }

    /// Adds another point to this point, returning a new point.
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point.
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point.
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Euclidean distance from the origin.
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    fn dot(self, other: Point) -> f32 {
        self.x * other.x + self.y * other.y
    }
}

/// Width and height of an element.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn width(self) -> f32 {
        self.width
    }

    pub fn height(self) -> f32 {
        self.height
    }

    /// Component-wise maximum of two sizes.
    pub fn max(self, other: Size) -> Self {
        Self {
            width: self.width.max(other.width),
            height: self.height.max(other.height),
        }
    }

    /// Returns a new size grown by the given insets on each side.
    pub fn add_padding(self, insets: Insets) -> Self {
        Self {
            width: self.width + insets.horizontal_sum(),
            height: self.height + insets.vertical_sum(),
        }
    }

    /// Multiplies both dimensions by the given factor.
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }

    pub fn is_zero(self) -> bool {
        self.width == 0.0 && self.height == 0.0
    }
}

/// An axis-aligned rectangle given by its minimum and maximum coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Builds bounds from a top-left origin and a size.
    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            min_x: origin.x(),
            min_y: origin.y(),
            max_x: origin.x() + size.width(),
            max_y: origin.y() + size.height(),
        }
    }

    pub fn min_x(self) -> f32 {
        self.min_x
    }

    pub fn min_y(self) -> f32 {
        self.min_y
    }

    pub fn max_x(self) -> f32 {
        self.max_x
    }

    pub fn max_y(self) -> f32 {
        self.max_y
    }

    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// The top-left corner.
    pub fn min_point(self) -> Point {
        Point {
            x: self.min_x,
            y: self.min_y,
        }
    }

    pub fn center(self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// The smallest bounds containing both this and `other`.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Moves the bounds by the specified offset.
    pub fn translate(&self, offset: Point) -> Self {
        Self {
            min_x: self.min_x + offset.x,
            min_y: self.min_y + offset.y,
            max_x: self.max_x + offset.x,
            max_y: self.max_y + offset.y,
        }
    }

    /// Grows the bounds by `margin` on every side.
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min_x: self.min_x - margin,
            min_y: self.min_y - margin,
            max_x: self.max_x + margin,
            max_y: self.max_y + margin,
        }
    }

    /// Axis-aligned containment test; edges count as inside.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }
}

/// Spacing around an element, with potentially different values per side.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Insets {
    top: f32,
    right: f32,
    bottom: f32,
    left: f32,
}

impl Insets {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates uniform insets with the same value for all sides.
    pub fn uniform(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    pub fn top(self) -> f32 {
        self.top
    }

    pub fn right(self) -> f32 {
        self.right
    }

    pub fn bottom(self) -> f32 {
        self.bottom
    }

    pub fn left(self) -> f32 {
        self.left
    }

    /// Sum of the left and right insets.
    pub fn horizontal_sum(self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub fn vertical_sum(self) -> f32 {
        self.top + self.bottom
    }
}

/// Returns the point on segment `a`-`b` closest to `p`.
///
/// Degenerate segments (`a == b`) yield `a`.
pub fn closest_point_on_segment(p: Point, a: Point, b: Point) -> Point {
    let ab = b.sub_point(a);
    let len_sq = ab.dot(ab);
    if len_sq == 0.0 {
        return a;
    }
    let t = (p.sub_point(a).dot(ab) / len_sq).clamp(0.0, 1.0);
    a.add_point(ab.scale(t))
}

/// Distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Point, a: Point, b: Point) -> f32 {
    p.sub_point(closest_point_on_segment(p, a, b)).hypot()
}

/// Minimum distance from `p` to a polyline given as an ordered vertex list.
///
/// A single-vertex polyline degenerates to point distance; an empty one
/// has no distance and returns infinity.
pub fn distance_to_polyline(p: Point, vertices: &[Point]) -> f32 {
    match vertices {
        [] => f32::INFINITY,
        [only] => p.sub_point(*only).hypot(),
        _ => vertices
            .windows(2)
            .map(|pair| distance_to_segment(p, pair[0], pair[1]))
            .fold(f32::INFINITY, f32::min),
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_point_arithmetic() {
        let p = Point::new(3.0, 4.0);
        assert_eq!(p.hypot(), 5.0);
        assert_eq!(p.add_point(Point::new(1.0, -1.0)), Point::new(4.0, 3.0));
        assert_eq!(p.sub_point(Point::new(1.0, 1.0)), Point::new(2.0, 3.0));
        assert_eq!(p.scale(2.0), Point::new(6.0, 8.0));
    }

    #[test]
    fn test_point_midpoint() {
        let mid = Point::new(0.0, 0.0).midpoint(Point::new(4.0, 6.0));
        assert_eq!(mid, Point::new(2.0, 3.0));
    }

    #[test]
    fn test_size_max_and_padding() {
        let a = Size::new(10.0, 20.0);
        let b = Size::new(15.0, 18.0);
        assert_eq!(a.max(b), Size::new(15.0, 20.0));

        let padded = a.add_padding(Insets::new(1.0, 2.0, 3.0, 4.0));
        assert_eq!(padded, Size::new(16.0, 24.0));
    }

    #[test]
    fn test_bounds_from_origin_size() {
        let bounds = Bounds::from_origin_size(Point::new(10.0, 20.0), Size::new(6.0, 8.0));
        assert_eq!(bounds.min_x(), 10.0);
        assert_eq!(bounds.min_y(), 20.0);
        assert_eq!(bounds.max_x(), 16.0);
        assert_eq!(bounds.max_y(), 28.0);
        assert_eq!(bounds.center(), Point::new(13.0, 24.0));
    }

    #[test]
    fn test_bounds_merge() {
        let a = Bounds::from_origin_size(Point::new(1.0, 2.0), Size::new(4.0, 4.0));
        let b = Bounds::from_origin_size(Point::new(3.0, 0.0), Size::new(5.0, 4.0));
        let merged = a.merge(&b);
        assert_eq!(merged.min_x(), 1.0);
        assert_eq!(merged.min_y(), 0.0);
        assert_eq!(merged.max_x(), 8.0);
        assert_eq!(merged.max_y(), 6.0);
    }

    #[test]
    fn test_bounds_translate() {
        let bounds = Bounds::from_origin_size(Point::new(1.0, 2.0), Size::new(4.0, 4.0));
        let moved = bounds.translate(Point::new(3.0, -1.0));
        assert_eq!(moved.min_point(), Point::new(4.0, 1.0));
        assert_eq!(moved.to_size(), bounds.to_size());
    }

    #[test]
    fn test_bounds_expand() {
        let bounds = Bounds::from_origin_size(Point::new(2.0, 3.0), Size::new(4.0, 5.0));
        let expanded = bounds.expand(2.0);
        assert_eq!(expanded.min_point(), Point::new(0.0, 1.0));
        assert_eq!(expanded.to_size(), Size::new(8.0, 9.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = Bounds::from_origin_size(Point::new(0.0, 0.0), Size::new(10.0, 10.0));
        assert!(bounds.contains(Point::new(5.0, 5.0)));
        assert!(bounds.contains(Point::new(0.0, 0.0)));
        assert!(bounds.contains(Point::new(10.0, 10.0)));
        assert!(!bounds.contains(Point::new(10.1, 5.0)));
        assert!(!bounds.contains(Point::new(5.0, -0.1)));
    }

    #[test]
    fn test_insets_sums() {
        let insets = Insets::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(insets.horizontal_sum(), 6.0);
        assert_eq!(insets.vertical_sum(), 4.0);
        assert_eq!(Insets::uniform(5.0).horizontal_sum(), 10.0);
    }

    #[test]
    fn test_distance_point_on_segment_is_zero() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_approx_eq!(f32, distance_to_segment(Point::new(4.0, 0.0), a, b), 0.0);
        assert_approx_eq!(f32, distance_to_segment(a, a, b), 0.0);
        assert_approx_eq!(f32, distance_to_segment(b, a, b), 0.0);
    }

    #[test]
    fn test_distance_perpendicular() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert_approx_eq!(f32, distance_to_segment(Point::new(5.0, 3.0), a, b), 3.0);
    }

    #[test]
    fn test_distance_beyond_endpoints_projects_to_endpoint() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        // Beyond b: distance is to b itself, not the infinite line.
        assert_approx_eq!(f32, distance_to_segment(Point::new(13.0, 4.0), a, b), 5.0);
        // Before a.
        assert_approx_eq!(f32, distance_to_segment(Point::new(-3.0, 4.0), a, b), 5.0);
    }

    #[test]
    fn test_distance_degenerate_segment() {
        let a = Point::new(2.0, 2.0);
        assert_approx_eq!(f32, distance_to_segment(Point::new(5.0, 6.0), a, a), 5.0);
    }

    #[test]
    fn test_distance_to_polyline() {
        let path = [
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
        ];
        // On the second segment.
        assert_approx_eq!(f32, distance_to_polyline(Point::new(10.0, 5.0), &path), 0.0);
        // Closest to the corner vertex.
        assert_approx_eq!(f32, distance_to_polyline(Point::new(13.0, -4.0), &path), 5.0);
        assert_eq!(
            distance_to_polyline(Point::new(0.0, 0.0), &[]),
            f32::INFINITY
        );
        assert_approx_eq!(
            f32,
            distance_to_polyline(Point::new(3.0, 4.0), &[Point::new(0.0, 0.0)]),
            5.0
        );
    }
}
