//! Index buffers for drawing polygons as `GL_TRIANGLES`.
//!
//! Both generators produce `vertex_count - 2` triangles, i.e.
//! `3 * (vertex_count - 2)` indices, and return `None` when no triangle can
//! be formed or the buffer cannot be allocated.
use serde::{Deserialize, Serialize};

/// How consecutive vertices are grouped into triangles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Triangulation {
    /// Every triangle shares vertex 0. See [`triangulate_convex`].
    ConvexFan,
    /// Every three consecutive vertices form a triangle. See [`triangle_strip_indices`].
    #[default]
    Strip,
}

impl Triangulation {
    pub fn indices(self, vertex_count: usize) -> Option<Vec<u32>> {
        match self {
            Self::ConvexFan => triangulate_convex(vertex_count),
            Self::Strip => triangle_strip_indices(vertex_count),
        }
    }
}

/// Allocate room for exactly `vertex_count - 2` triangles, and fill them with `triangle(i)`.
fn build_triangles(vertex_count: usize, triangle: impl Fn(u32) -> [u32; 3]) -> Option<Vec<u32>> {
    if vertex_count < 3 {
        return None;
    }
    let highest_index = u32::try_from(vertex_count - 1).ok()?;
    let index_count = (vertex_count - 2).checked_mul(3)?;

    let mut indices = Vec::new();
    indices.try_reserve_exact(index_count).ok()?;
    for i in 0..highest_index - 1 {
        indices.extend_from_slice(&triangle(i));
    }
    Some(indices)
}

/// Triangulate a convex polygon as a fan around its first vertex.
///
/// The vertices must go around the polygon in order (counter-clockwise
/// for front-facing triangles): triangle `i` is `(0, i + 1, i + 2)`.
pub fn triangulate_convex(vertex_count: usize) -> Option<Vec<u32>> {
    build_triangles(vertex_count, |i| [0, i + 1, i + 2])
}

/// Link vertices together by their position in the array: triangle `i` is
/// `(i, i + 1, i + 2)`.
///
/// Agnostic of the polygon's shape, the vertices must already be ordered so
/// that every three consecutive ones make a sensible triangle. For a
/// pentagon that is top, middle left, middle right, bottom left,
/// bottom right.
pub fn triangle_strip_indices(vertex_count: usize) -> Option<Vec<u32>> {
    build_triangles(vertex_count, |i| [i, i + 1, i + 2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_few_vertices() {
        for n in 0..3 {
            assert_eq!(triangulate_convex(n), None);
            assert_eq!(triangle_strip_indices(n), None);
        }
    }

    #[test]
    fn index_count_is_three_per_triangle() {
        for n in 3..64 {
            let fan = triangulate_convex(n).unwrap();
            let strip = triangle_strip_indices(n).unwrap();
            assert_eq!(fan.len(), 3 * (n - 2));
            assert_eq!(strip.len(), 3 * (n - 2));
            assert_eq!(fan.capacity(), fan.len());
            assert_eq!(strip.capacity(), strip.len());
        }
    }

    #[test]
    fn fan_quad() {
        assert_eq!(triangulate_convex(4).unwrap(), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn strip_pentagon() {
        assert_eq!(
            triangle_strip_indices(5).unwrap(),
            vec![0, 1, 2, 1, 2, 3, 2, 3, 4]
        );
    }

    #[test]
    fn single_triangle_is_the_same_either_way() {
        assert_eq!(triangulate_convex(3), Some(vec![0, 1, 2]));
        assert_eq!(triangle_strip_indices(3), Some(vec![0, 1, 2]));
    }

    #[test]
    fn indices_stay_in_range() {
        let n = 17;
        for indices in [triangulate_convex(n).unwrap(), triangle_strip_indices(n).unwrap()] {
            assert!(indices.iter().all(|&i| (i as usize) < n));
        }
    }

    #[test]
    fn strip_is_deterministic() {
        assert_eq!(triangle_strip_indices(9), triangle_strip_indices(9));
    }

    #[test]
    fn unallocatable_buffer_is_none() {
        assert_eq!(triangle_strip_indices(usize::MAX), None);
        assert_eq!(triangulate_convex(usize::MAX), None);
    }

    #[test]
    fn dispatch() {
        assert_eq!(Triangulation::ConvexFan.indices(4), triangulate_convex(4));
        assert_eq!(Triangulation::Strip.indices(4), triangle_strip_indices(4));
        assert_eq!(Triangulation::default(), Triangulation::Strip);
    }
}
