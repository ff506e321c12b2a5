//! # Primitive Shape Generation
//!
//! This module contains functions to generate the scene's primitive shapes.
//! Coordinates are Y-up; triangles wind counter-clockwise when seen from outside.

use std::collections::HashSet;
use std::f32::consts::PI;

use super::{GeometryData, Primitive, Topology};

/// Generate a UV sphere centered at the origin
///
/// # Arguments
/// * `radius` - Sphere radius
/// * `width_segments` - Number of segments around the equator (at least 3)
/// * `height_segments` - Number of segments from pole to pole (at least 2)
///
/// The seam sits on the -X side; poles are on the Y axis.
pub fn make_sphere(radius: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let w_segs = width_segments.max(3);
    let h_segs = height_segments.max(2);
    let mut data = GeometryData::new(
        Primitive::Sphere {
            radius,
            width_segments: w_segs,
            height_segments: h_segs,
        },
        Topology::Triangles,
    );

    for iy in 0..=h_segs {
        let v = iy as f32 / h_segs as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();

        for ix in 0..=w_segs {
            let u = ix as f32 / w_segs as f32;
            let (sin_phi, cos_phi) = (u * 2.0 * PI).sin_cos();

            let normal = [-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta];
            data.vertices
                .push([normal[0] * radius, normal[1] * radius, normal[2] * radius]);
            data.normals.push(normal);
            data.tex_coords.push([u, 1.0 - v]);
        }
    }

    let row = w_segs + 1;
    for iy in 0..h_segs {
        for ix in 0..w_segs {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;

            // The pole rows collapse to a single triangle per segment
            if iy != 0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != h_segs - 1 {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    data
}

/// Generate a box centered at the origin
///
/// Each face has its own four vertices so normals and UVs stay flat per face.
pub fn make_box(width: f32, height: f32, depth: f32) -> GeometryData {
    let mut data = GeometryData::new(
        Primitive::Box {
            width,
            height,
            depth,
        },
        Topology::Triangles,
    );

    // Unit cube corners, scaled below
    let positions: [[f32; 3]; 24] = [
        // Front face
        [-0.5, -0.5,  0.5], [ 0.5, -0.5,  0.5], [ 0.5,  0.5,  0.5], [-0.5,  0.5,  0.5],
        // Back face
        [-0.5, -0.5, -0.5], [-0.5,  0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5, -0.5, -0.5],
        // Left face
        [-0.5, -0.5, -0.5], [-0.5, -0.5,  0.5], [-0.5,  0.5,  0.5], [-0.5,  0.5, -0.5],
        // Right face
        [ 0.5, -0.5,  0.5], [ 0.5, -0.5, -0.5], [ 0.5,  0.5, -0.5], [ 0.5,  0.5,  0.5],
        // Top face
        [-0.5,  0.5,  0.5], [ 0.5,  0.5,  0.5], [ 0.5,  0.5, -0.5], [-0.5,  0.5, -0.5],
        // Bottom face
        [-0.5, -0.5, -0.5], [ 0.5, -0.5, -0.5], [ 0.5, -0.5,  0.5], [-0.5, -0.5,  0.5],
    ];

    let tex_coords: [[f32; 2]; 24] = [
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
        [0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0],
    ];

    let face_normals: [[f32; 3]; 6] = [
        [0.0, 0.0, 1.0],
        [0.0, 0.0, -1.0],
        [-1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.0, -1.0, 0.0],
    ];

    data.vertices = positions
        .iter()
        .map(|p| [p[0] * width, p[1] * height, p[2] * depth])
        .collect();
    data.tex_coords = tex_coords.to_vec();
    data.normals = face_normals
        .iter()
        .flat_map(|n| std::iter::repeat(*n).take(4))
        .collect();

    for face in 0..6u32 {
        let base = face * 4;
        data.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 3, base]);
    }

    data
}

/// Generate a torus lying in the XY plane, centered at the origin
///
/// # Arguments
/// * `radius` - Distance from the center of the torus to the center of the tube
/// * `tube_radius` - Radius of the tube
/// * `radial_segments` - Segments around the tube cross-section (at least 3)
/// * `tubular_segments` - Segments around the ring (at least 3)
pub fn make_torus(
    radius: f32,
    tube_radius: f32,
    radial_segments: u32,
    tubular_segments: u32,
) -> GeometryData {
    let radial = radial_segments.max(3);
    let tubular = tubular_segments.max(3);
    let mut data = GeometryData::new(
        Primitive::Torus {
            radius,
            tube_radius,
            radial_segments: radial,
            tubular_segments: tubular,
        },
        Topology::Triangles,
    );

    for j in 0..=radial {
        let v = j as f32 / radial as f32 * 2.0 * PI;
        let (sin_v, cos_v) = v.sin_cos();

        for i in 0..=tubular {
            let u = i as f32 / tubular as f32 * 2.0 * PI;
            let (sin_u, cos_u) = u.sin_cos();

            let ring = radius + tube_radius * cos_v;
            data.vertices
                .push([ring * cos_u, ring * sin_u, tube_radius * sin_v]);
            // Direction from the tube's center line to the surface
            data.normals.push([cos_v * cos_u, cos_v * sin_u, sin_v]);
            data.tex_coords
                .push([i as f32 / tubular as f32, j as f32 / radial as f32]);
        }
    }

    let row = tubular + 1;
    for j in 1..=radial {
        for i in 1..=tubular {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;

            data.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    data
}

/// Generate a plane in the XY plane facing +Z
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
pub fn make_plane(
    width: f32,
    height: f32,
    width_segments: u32,
    height_segments: u32,
) -> GeometryData {
    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);
    let mut data = GeometryData::new(
        Primitive::Plane {
            width,
            height,
            width_segments: w_segs,
            height_segments: h_segs,
        },
        Topology::Triangles,
    );

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([u, v]);
        }
    }

    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.extend_from_slice(&[i, i + 1, next_row]);
            data.indices
                .extend_from_slice(&[i + 1, next_row + 1, next_row]);
        }
    }

    data
}

/// Generate a square grid of lines on the XZ plane
///
/// Produces `divisions + 1` lines along each axis, spanning `size` units.
pub fn make_grid(size: f32, divisions: u32) -> GeometryData {
    let divisions = divisions.max(1);
    let mut data = GeometryData::new(Primitive::Grid { size, divisions }, Topology::Lines);

    let half = size * 0.5;
    let step = size / divisions as f32;

    for i in 0..=divisions {
        let k = -half + i as f32 * step;
        data.vertices.push([-half, 0.0, k]);
        data.vertices.push([half, 0.0, k]);
        data.vertices.push([k, 0.0, -half]);
        data.vertices.push([k, 0.0, half]);
    }

    let count = data.vertices.len();
    data.normals = vec![[0.0, 1.0, 0.0]; count];
    data.tex_coords = vec![[0.0, 0.0]; count];
    data.indices = (0..count as u32).collect();

    data
}

/// Convert triangle geometry into a line list of its unique edges
///
/// Edges are emitted in first-seen order. Line geometry is returned unchanged.
pub fn wireframe(source: &GeometryData) -> GeometryData {
    if source.topology == Topology::Lines {
        return source.clone();
    }

    let mut data = GeometryData::new(Primitive::Wireframe, Topology::Lines);
    data.vertices = source.vertices.clone();
    data.normals = source.normals.clone();
    data.tex_coords = source.tex_coords.clone();

    let mut seen = HashSet::new();
    for triangle in source.indices.chunks_exact(3) {
        for (a, b) in [
            (triangle[0], triangle[1]),
            (triangle[1], triangle[2]),
            (triangle[2], triangle[0]),
        ] {
            if seen.insert((a.min(b), a.max(b))) {
                data.indices.extend_from_slice(&[a, b]);
            }
        }
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn length(v: [f32; 3]) -> f32 {
        (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
    }

    #[test]
    fn test_sphere_generation() {
        let sphere = make_sphere(3.0, 32, 32);
        assert_eq!(sphere.vertex_count(), 33 * 33);
        assert_eq!(sphere.triangle_count(), 2 * 32 * 31);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());

        for vertex in &sphere.vertices {
            assert_abs_diff_eq!(length(*vertex), 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_sphere_clamps_tessellation() {
        let sphere = make_sphere(1.0, 1, 1);
        assert_eq!(
            sphere.primitive,
            Primitive::Sphere {
                radius: 1.0,
                width_segments: 3,
                height_segments: 2,
            }
        );
        assert_eq!(sphere.triangle_count(), 6);
    }

    #[test]
    fn test_box_generation() {
        let cube = make_box(3.0, 3.0, 3.0);
        assert_eq!(cube.vertex_count(), 24); // 6 faces * 4 vertices
        assert_eq!(cube.indices.len(), 36); // 6 faces * 2 triangles * 3 indices
        assert_eq!(cube.triangle_count(), 12);

        for vertex in &cube.vertices {
            for axis in vertex {
                assert_abs_diff_eq!(axis.abs(), 1.5);
            }
        }
    }

    #[test]
    fn test_box_faces_wind_outward() {
        let cube = make_box(1.0, 2.0, 3.0);
        for triangle in cube.indices.chunks_exact(3) {
            let [a, b, c] = [
                cube.vertices[triangle[0] as usize],
                cube.vertices[triangle[1] as usize],
                cube.vertices[triangle[2] as usize],
            ];
            let e1 = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
            let e2 = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
            let n = [
                e1[1] * e2[2] - e1[2] * e2[1],
                e1[2] * e2[0] - e1[0] * e2[2],
                e1[0] * e2[1] - e1[1] * e2[0],
            ];
            let center = [
                (a[0] + b[0] + c[0]) / 3.0,
                (a[1] + b[1] + c[1]) / 3.0,
                (a[2] + b[2] + c[2]) / 3.0,
            ];
            let outward = n[0] * center[0] + n[1] * center[1] + n[2] * center[2];
            assert!(outward > 0.0, "triangle {:?} winds inward", triangle);
        }
    }

    #[test]
    fn test_torus_generation() {
        let torus = make_torus(10.0, 3.0, 16, 100);
        assert_eq!(torus.vertex_count(), 17 * 101);
        assert_eq!(torus.triangle_count(), 2 * 16 * 100);

        for (vertex, normal) in torus.vertices.iter().zip(&torus.normals) {
            assert_abs_diff_eq!(length(*normal), 1.0, epsilon = 1e-5);
            // Every vertex sits exactly one tube radius away from the ring
            let ring = (vertex[0] * vertex[0] + vertex[1] * vertex[1]).sqrt();
            let dist = ((ring - 10.0).powi(2) + vertex[2] * vertex[2]).sqrt();
            assert_abs_diff_eq!(dist, 3.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_plane_generation() {
        let plane = make_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn test_grid_generation() {
        let grid = make_grid(200.0, 50);
        assert_eq!(grid.topology, Topology::Lines);
        assert_eq!(grid.vertex_count(), 4 * 51);
        assert_eq!(grid.line_count(), 2 * 51);
        assert_eq!(grid.triangle_count(), 0);
        assert!(grid.vertices.iter().all(|v| v[1] == 0.0));
        assert!(grid
            .vertices
            .iter()
            .all(|v| v[0].abs() <= 100.0 && v[2].abs() <= 100.0));
    }

    #[test]
    fn test_wireframe_dedups_shared_edges() {
        // Faces don't share vertices, so each quad keeps its 4 sides + diagonal
        let cube = wireframe(&make_box(1.0, 1.0, 1.0));
        assert_eq!(cube.primitive, Primitive::Wireframe);
        assert_eq!(cube.line_count(), 30);

        // Two triangles of a single quad share the diagonal
        let quad = wireframe(&make_plane(1.0, 1.0, 1, 1));
        assert_eq!(quad.line_count(), 5);
    }

    #[test]
    fn test_generators_are_deterministic() {
        let a = make_torus(10.0, 3.0, 16, 100);
        let b = make_torus(10.0, 3.0, 16, 100);
        assert_eq!(a.vertices, b.vertices);
        assert_eq!(a.indices, b.indices);
    }
}
