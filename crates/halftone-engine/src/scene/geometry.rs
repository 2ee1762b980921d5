use std::f32::consts::{PI, TAU};

use bytemuck::{Pod, Zeroable};
use glam::Vec3;

/// Interleaved vertex layout consumed by the halftone pipeline.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Indexed triangle list with per-vertex normals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl MeshData {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn vertices(&self) -> Vec<Vertex> {
        self.positions
            .iter()
            .zip(&self.normals)
            .map(|(&position, &normal)| Vertex { position, normal })
            .collect()
    }

    /// Smooth area-weighted normals from the index list. Overwrites `normals`.
    pub fn compute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.positions.len()];

        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            if a >= acc.len() || b >= acc.len() || c >= acc.len() {
                continue;
            }
            let pa = Vec3::from(self.positions[a]);
            let pb = Vec3::from(self.positions[b]);
            let pc = Vec3::from(self.positions[c]);
            let face = (pb - pa).cross(pc - pa);
            acc[a] += face;
            acc[b] += face;
            acc[c] += face;
        }

        self.normals = acc.into_iter().map(|n| n.normalize_or_zero().to_array()).collect();
    }

    /// Torus knot around the origin, wound `p` times around its axis and `q`
    /// times through its hole.
    pub fn torus_knot(
        radius: f32,
        tube: f32,
        tubular_segments: u32,
        radial_segments: u32,
        p: u32,
        q: u32,
    ) -> Self {
        let tubular_segments = tubular_segments.max(3);
        let radial_segments = radial_segments.max(3);
        let (p, q) = (p.max(1) as f32, q as f32);

        let curve = |u: f32| {
            let q_over_p = q / p * u;
            let cs = q_over_p.cos();
            Vec3::new(
                radius * (2.0 + cs) * 0.5 * u.cos(),
                radius * (2.0 + cs) * 0.5 * u.sin(),
                radius * q_over_p.sin() * 0.5,
            )
        };

        let ring = (radial_segments + 1) as usize;
        let mut mesh = Self::with_capacity(ring * (tubular_segments + 1) as usize);

        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * p * TAU;
            let p1 = curve(u);
            let p2 = curve(u + 0.01);

            // Frenet-like frame along the curve.
            let t = p2 - p1;
            let n = p2 + p1;
            let b = t.cross(n).normalize_or_zero();
            let n = b.cross(t).normalize_or_zero();

            for j in 0..=radial_segments {
                let v = j as f32 / radial_segments as f32 * TAU;
                let cx = -tube * v.cos();
                let cy = tube * v.sin();
                let vertex = p1 + cx * n + cy * b;

                mesh.positions.push(vertex.to_array());
                mesh.normals.push((vertex - p1).normalize_or_zero().to_array());
            }
        }

        let ring = ring as u32;
        for j in 1..=tubular_segments {
            for i in 1..=radial_segments {
                let a = ring * (j - 1) + (i - 1);
                let b = ring * j + (i - 1);
                let c = ring * j + i;
                let d = ring * (j - 1) + i;
                mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        mesh
    }

    /// UV sphere with poles on the Y axis.
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments = width_segments.max(3);
        let height_segments = height_segments.max(2);
        let row = width_segments + 1;

        let mut mesh = Self::with_capacity((row * (height_segments + 1)) as usize);

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let vertex = Vec3::new(
                    -radius * (u * TAU).cos() * (v * PI).sin(),
                    radius * (v * PI).cos(),
                    radius * (u * TAU).sin() * (v * PI).sin(),
                );
                mesh.positions.push(vertex.to_array());
                mesh.normals.push(vertex.normalize_or_zero().to_array());
            }
        }

        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * row + ix + 1;
                let b = iy * row + ix;
                let c = (iy + 1) * row + ix;
                let d = (iy + 1) * row + ix + 1;

                // Pole rows collapse to a single triangle.
                if iy != 0 {
                    mesh.indices.extend_from_slice(&[a, b, d]);
                }
                if iy != height_segments - 1 {
                    mesh.indices.extend_from_slice(&[b, c, d]);
                }
            }
        }

        mesh
    }

    fn with_capacity(vertices: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indices_in_range(mesh: &MeshData) -> bool {
        mesh.indices.iter().all(|&i| (i as usize) < mesh.vertex_count())
    }

    // ── torus knot ─────────────────────────────────────────────────────────

    #[test]
    fn torus_knot_counts() {
        let mesh = MeshData::torus_knot(0.6, 0.25, 128, 32, 2, 3);
        assert_eq!(mesh.vertex_count(), 129 * 33);
        assert_eq!(mesh.triangle_count(), 128 * 32 * 2);
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn torus_knot_normals_are_unit() {
        let mesh = MeshData::torus_knot(0.6, 0.25, 64, 16, 2, 3);
        for n in &mesh.normals {
            assert!((Vec3::from(*n).length() - 1.0).abs() < 1e-3);
        }
    }

    #[test]
    fn torus_knot_fits_its_radius() {
        let mesh = MeshData::torus_knot(0.6, 0.25, 128, 32, 2, 3);
        // Curve reaches 1.5 * radius; the tube adds its own radius on top.
        let max = mesh.positions.iter().map(|p| Vec3::from(*p).length()).fold(0.0, f32::max);
        assert!(max <= 0.6 * 1.5 + 0.25 + 1e-3);
    }

    // ── sphere ─────────────────────────────────────────────────────────────

    #[test]
    fn sphere_counts() {
        let mesh = MeshData::sphere(1.0, 32, 16);
        assert_eq!(mesh.vertex_count(), 33 * 17);
        // Two pole rows contribute one triangle per quad.
        assert_eq!(mesh.triangle_count(), 32 * 16 * 2 - 2 * 32);
        assert!(indices_in_range(&mesh));
    }

    #[test]
    fn sphere_vertices_lie_on_surface() {
        let mesh = MeshData::sphere(2.0, 12, 6);
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            let p = Vec3::from(*p);
            assert!((p.length() - 2.0).abs() < 1e-4);
            assert!(p.normalize().distance(Vec3::from(*n)) < 1e-4);
        }
    }

    #[test]
    fn sphere_winding_faces_outward() {
        let mesh = MeshData::sphere(1.0, 16, 8);
        for tri in mesh.indices.chunks_exact(3) {
            let [a, b, c] = [0, 1, 2].map(|k| Vec3::from(mesh.positions[tri[k] as usize]));
            let face = (b - a).cross(c - a);
            let center = (a + b + c) / 3.0;
            assert!(face.dot(center) >= -1e-6);
        }
    }

    // ── normals ────────────────────────────────────────────────────────────

    #[test]
    fn computed_normals_match_flat_quad() {
        let mut mesh = MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            normals: Vec::new(),
            indices: vec![0, 1, 2, 0, 2, 3],
        };
        mesh.compute_normals();
        assert_eq!(mesh.normals, vec![[0.0, 0.0, 1.0]; 4]);
    }

    #[test]
    fn vertices_interleave() {
        let mesh = MeshData::sphere(1.0, 4, 2);
        let verts = mesh.vertices();
        assert_eq!(verts.len(), mesh.vertex_count());
        assert_eq!(verts[3].position, mesh.positions[3]);
        assert_eq!(verts[3].normal, mesh.normals[3]);
    }
}
