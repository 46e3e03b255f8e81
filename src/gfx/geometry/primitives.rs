//! # Primitive Shape Generation

use super::GeometryData;
use cgmath::{InnerSpace, Vector3};

/// Builds a flat-shaded icosahedron
///
/// `detail` subdivides every face into `(detail + 1)^2` triangles whose
/// vertices are pushed out onto the sphere of `radius`; the result is
/// non-indexed in spirit (each triangle owns its three vertices) so every face
/// keeps its own normal. The index buffer is the identity sequence.
pub fn generate_icosahedron(radius: f32, detail: u32) -> GeometryData {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    #[rustfmt::skip]
    let corners = [
        [-1.0,  t, 0.0], [ 1.0,  t, 0.0], [-1.0, -t, 0.0], [ 1.0, -t, 0.0],
        [ 0.0, -1.0,  t], [ 0.0,  1.0,  t], [ 0.0, -1.0, -t], [ 0.0,  1.0, -t],
        [  t, 0.0, -1.0], [  t, 0.0,  1.0], [ -t, 0.0, -1.0], [ -t, 0.0,  1.0],
    ];

    #[rustfmt::skip]
    let faces: [[usize; 3]; 20] = [
        [0, 11, 5], [0, 5, 1], [0, 1, 7], [0, 7, 10], [0, 10, 11],
        [1, 5, 9], [5, 11, 4], [11, 10, 2], [10, 7, 6], [7, 1, 8],
        [3, 9, 4], [3, 4, 2], [3, 2, 6], [3, 6, 8], [3, 8, 9],
        [4, 9, 5], [2, 4, 11], [6, 2, 10], [8, 6, 7], [9, 8, 1],
    ];

    let corners: Vec<Vector3<f32>> = corners.iter().map(|c| Vector3::from(*c)).collect();

    let mut triangles = Vec::new();
    for [a, b, c] in faces {
        subdivide_face(corners[a], corners[b], corners[c], detail, &mut triangles);
    }

    let mut data = GeometryData::new();
    for triangle in triangles {
        let [a, b, c] = triangle.map(|v| v.normalize() * radius);
        let normal = (b - a).cross(c - a).normalize();

        for vertex in [a, b, c] {
            data.indices.push(data.vertices.len() as u32);
            data.vertices.push(vertex.into());
            data.normals.push(normal.into());
        }
    }

    data
}

fn subdivide_face(
    a: Vector3<f32>,
    b: Vector3<f32>,
    c: Vector3<f32>,
    detail: u32,
    out: &mut Vec<[Vector3<f32>; 3]>,
) {
    let cols = detail as usize + 1;

    // grid[i][j]: row i runs from the a-c edge to the b-c edge, shrinking toward c
    let mut grid: Vec<Vec<Vector3<f32>>> = Vec::with_capacity(cols + 1);
    for i in 0..=cols {
        let along = i as f32 / cols as f32;
        let aj = a + (c - a) * along;
        let bj = b + (c - b) * along;
        let rows = cols - i;

        let row = (0..=rows)
            .map(|j| {
                if rows == 0 {
                    aj
                } else {
                    aj + (bj - aj) * (j as f32 / rows as f32)
                }
            })
            .collect();
        grid.push(row);
    }

    for i in 0..cols {
        for j in 0..(2 * (cols - i) - 1) {
            let k = j / 2;
            if j % 2 == 0 {
                out.push([grid[i][k + 1], grid[i + 1][k], grid[i][k]]);
            } else {
                out.push([grid[i][k + 1], grid[i + 1][k + 1], grid[i + 1][k]]);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec3(v: [f32; 3]) -> Vector3<f32> {
        Vector3::from(v)
    }

    #[test]
    fn test_icosahedron_generation() {
        let ico = generate_icosahedron(1.0, 0);
        assert_eq!(ico.triangle_count(), 20);
        assert_eq!(ico.vertex_count(), 60);
        assert_eq!(ico.normals.len(), ico.vertices.len());
        assert_eq!(ico.indices, (0..60).collect::<Vec<u32>>());
    }

    #[test]
    fn test_icosahedron_detail_subdivides_faces() {
        assert_eq!(generate_icosahedron(1.0, 1).triangle_count(), 80);
        assert_eq!(generate_icosahedron(1.0, 2).triangle_count(), 180);
    }

    #[test]
    fn test_vertices_lie_on_sphere() {
        let ico = generate_icosahedron(2.5, 1);
        for v in &ico.vertices {
            assert!((vec3(*v).magnitude() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn test_face_normals_point_outward() {
        let ico = generate_icosahedron(1.0, 1);
        for (tri, normals) in ico.vertices.chunks(3).zip(ico.normals.chunks(3)) {
            let centroid = (vec3(tri[0]) + vec3(tri[1]) + vec3(tri[2])) / 3.0;
            let normal = vec3(normals[0]);
            assert!((normal.magnitude() - 1.0).abs() < 1e-4);
            assert!(normal.dot(centroid) > 0.0);
            // flat shading: all three corners share the face normal
            assert_eq!(normals[0], normals[1]);
            assert_eq!(normals[1], normals[2]);
        }
    }
}
