/*!
Geometry types and directional resolution.

Directional resolution compares element *centers* along the travel axis and
requires the two boxes to overlap on the perpendicular axis:

- `Right`/`Left`: target center x is greater/less than the origin's center x,
  and the y-ranges intersect.
- `Top`/`Bottom`: target center y is less/greater than the origin's center y,
  and the x-ranges intersect.

Distance is the gap between the origin's leading edge (its `x` or `y`) and the
target's center along the travel axis.
*/

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Rectangle bounds in viewport coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export)]
pub struct Bounds {
  pub x: f64,
  pub y: f64,
  pub w: f64,
  pub h: f64,
}

impl Bounds {
  pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0);

  pub const fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
    Self { x, y, w, h }
  }

  /// Bottom edge.
  pub fn bottom(&self) -> f64 {
    self.y + self.h
  }

  /// Right edge.
  pub fn right(&self) -> f64 {
    self.x + self.w
  }

  pub fn center(&self) -> Point {
    Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
  }

  /// True when the box has no area (not laid out, or collapsed).
  pub fn is_empty(&self) -> bool {
    self.w <= 0.0 || self.h <= 0.0
  }

  /// Check if a point is contained within these bounds.
  pub fn contains(&self, point: Point) -> bool {
    point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
  }

  /// Strict overlap of the y-ranges. Touching edges do not overlap.
  pub fn overlaps_vertically(&self, other: &Bounds) -> bool {
    other.bottom() > self.y && other.y < self.bottom()
  }

  /// Strict overlap of the x-ranges. Touching edges do not overlap.
  pub fn overlaps_horizontally(&self, other: &Bounds) -> bool {
    other.right() > self.x && other.x < self.right()
  }
}

/// A 2D point in viewport coordinates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default, TS)]
#[ts(export)]
pub struct Point {
  pub x: f64,
  pub y: f64,
}

impl Point {
  pub const fn new(x: f64, y: f64) -> Self {
    Self { x, y }
  }
}

/// Cardinal travel direction for spatial navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Direction {
  Left,
  Right,
  Top,
  Bottom,
}

/// Is `to` located in direction `dir` as seen from `from`?
pub fn is_in_direction(from: &Bounds, to: &Bounds, dir: Direction) -> bool {
  let (fc, tc) = (from.center(), to.center());
  match dir {
    Direction::Right => tc.x > fc.x && from.overlaps_vertically(to),
    Direction::Left => tc.x < fc.x && from.overlaps_vertically(to),
    Direction::Top => tc.y < fc.y && from.overlaps_horizontally(to),
    Direction::Bottom => tc.y > fc.y && from.overlaps_horizontally(to),
  }
}

/// Signed gap between `from`'s leading edge and `to`'s center along `dir`.
pub fn distance(from: &Bounds, to: &Bounds, dir: Direction) -> f64 {
  let tc = to.center();
  match dir {
    Direction::Right => tc.x - from.x,
    Direction::Left => from.x - tc.x,
    Direction::Top => from.y - tc.y,
    Direction::Bottom => tc.y - from.y,
  }
}

/// Nearest candidate in `dir`, by [`distance`].
///
/// Linear scan. Candidates equal to `origin` are skipped. On equal distance
/// the earliest candidate wins, so the result depends on candidate order.
pub fn find_nearest<T, I>(origin: T, from: &Bounds, candidates: I, dir: Direction) -> Option<T>
where
  T: Copy + PartialEq,
  I: IntoIterator<Item = (T, Bounds)>,
{
  let mut best: Option<(T, f64)> = None;
  for (candidate, bounds) in candidates {
    if candidate == origin || !is_in_direction(from, &bounds, dir) {
      continue;
    }
    let d = distance(from, &bounds, dir);
    match best {
      Some((_, min)) if d >= min => {}
      _ => best = Some((candidate, d)),
    }
  }
  best.map(|(candidate, _)| candidate)
}

#[cfg(test)]
mod tests {
  use super::*;

  mod bounds {
    use super::*;

    #[test]
    fn center_of_box() {
      let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
      assert_eq!(b.center(), Point::new(60.0, 45.0));
    }

    #[test]
    fn corners_are_contained() {
      let b = Bounds::new(10.0, 20.0, 100.0, 50.0);
      assert!(b.contains(Point::new(10.0, 20.0)), "top-left corner");
      assert!(b.contains(Point::new(110.0, 70.0)), "bottom-right corner");
      assert!(!b.contains(Point::new(9.0, 20.0)), "left of bounds");
    }

    #[test]
    fn touching_edges_do_not_overlap() {
      let a = Bounds::new(0.0, 0.0, 10.0, 10.0);
      let below = Bounds::new(0.0, 10.0, 10.0, 10.0);
      assert!(!a.overlaps_vertically(&below));
      assert!(a.overlaps_horizontally(&below));
    }

    #[test]
    fn zero_size_is_empty() {
      assert!(Bounds::ZERO.is_empty());
      assert!(Bounds::new(5.0, 5.0, 10.0, 0.0).is_empty());
      assert!(!Bounds::new(5.0, 5.0, 1.0, 1.0).is_empty());
    }
  }

  mod direction {
    use super::*;

    // A row of three 50x20 cells.
    const LEFT: Bounds = Bounds::new(0.0, 0.0, 50.0, 20.0);
    const MID: Bounds = Bounds::new(60.0, 0.0, 50.0, 20.0);
    const RIGHT: Bounds = Bounds::new(120.0, 0.0, 50.0, 20.0);
    const BELOW: Bounds = Bounds::new(60.0, 40.0, 50.0, 20.0);

    #[test]
    fn right_requires_vertical_overlap() {
      assert!(is_in_direction(&LEFT, &MID, Direction::Right));
      assert!(!is_in_direction(&LEFT, &BELOW, Direction::Right));
    }

    #[test]
    fn bottom_requires_horizontal_overlap() {
      assert!(is_in_direction(&MID, &BELOW, Direction::Bottom));
      assert!(!is_in_direction(&LEFT, &BELOW, Direction::Bottom));
      assert!(is_in_direction(&BELOW, &MID, Direction::Top));
    }

    #[test]
    fn distance_is_measured_from_leading_edge_to_center() {
      // MID center x = 85, LEFT.x = 0
      assert_eq!(distance(&LEFT, &MID, Direction::Right), 85.0);
      // RIGHT.x = 120, MID center x = 85
      assert_eq!(distance(&RIGHT, &MID, Direction::Left), 35.0);
      // BELOW center y = 50, MID.y = 0
      assert_eq!(distance(&MID, &BELOW, Direction::Bottom), 50.0);
    }

    #[test]
    fn nearest_picks_minimum_distance() {
      let cells = [(1, LEFT), (2, MID), (3, RIGHT), (4, BELOW)];
      assert_eq!(find_nearest(1, &LEFT, cells, Direction::Right), Some(2));
      assert_eq!(find_nearest(3, &RIGHT, cells, Direction::Left), Some(2));
      assert_eq!(find_nearest(2, &MID, cells, Direction::Bottom), Some(4));
      assert_eq!(find_nearest(2, &MID, cells, Direction::Top), None);
    }

    #[test]
    fn nearest_tie_goes_to_first_candidate() {
      let a = Bounds::new(100.0, 0.0, 20.0, 20.0);
      let b = Bounds::new(100.0, 0.0, 20.0, 20.0);
      let cells = [(1, LEFT), (7, a), (8, b)];
      assert_eq!(find_nearest(1, &LEFT, cells, Direction::Right), Some(7));
      let reversed = [(1, LEFT), (8, b), (7, a)];
      assert_eq!(find_nearest(1, &LEFT, reversed, Direction::Right), Some(8));
    }

    #[test]
    fn origin_is_never_its_own_neighbor() {
      let cells = [(1, LEFT), (1, MID)];
      assert_eq!(find_nearest(1, &LEFT, cells, Direction::Right), None);
    }
  }
}
