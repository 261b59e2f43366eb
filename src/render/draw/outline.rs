//! Outline extrusion: a constant-radius tube along the smoothed top
//! boundary of a layer, the crisp edge that reads as a line chart
//! floating on the area fill.

use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

use crate::curve::{CurveFrames, SmoothedCurve};

pub const OUTLINE_RADIUS: f32 = 0.035;
pub const RADIAL_SEGMENTS: usize = 8;

/// Tube through the given boundary points (chart space, z = 0). `None`
/// when fewer than two points exist: a single point defines no curve.
pub fn build_outline_tube(points: &[Vec2], radius: f32) -> Option<Mesh> {
    if points.len() < 2 {
        return None;
    }
    let pts: Vec<Vec3> = points.iter().map(|p| Vec3::new(p.x, p.y, 0.0)).collect();
    let curve = SmoothedCurve::through(pts)?;
    // The boundary is already densified; one ring per input point keeps
    // the tube aligned with the band edge underneath it.
    Some(build_tube_mesh(&curve, points.len(), RADIAL_SEGMENTS, radius))
}

/// Extrude a circle cross-section along a smoothed curve using
/// parallel-transport frames.
pub fn build_tube_mesh(
    curve: &SmoothedCurve,
    tubular_segments: usize,
    radial_segments: usize,
    radius: f32,
) -> Mesh {
    let tubular_segments = tubular_segments.max(2);
    let frames = CurveFrames::build(curve, tubular_segments);

    let rings = tubular_segments;
    let ring_verts = radial_segments + 1;

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(rings * ring_verts);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(rings * ring_verts);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(rings * ring_verts);

    for j in 0..rings {
        let u = j as f32 / (rings as f32 - 1.0);
        let center = curve.point_at(u);
        let nor = frames.normals[j];
        let bin = frames.binormals[j];

        for i in 0..ring_verts {
            let v = i as f32 / radial_segments as f32;
            let ang = v * std::f32::consts::TAU;
            let dir = nor * ang.cos() + bin * ang.sin();
            let p = center + dir * radius;
            positions.push([p.x, p.y, p.z]);
            normals.push([dir.x, dir.y, dir.z]);
            uvs.push([u, v]);
        }
    }

    let mut indices: Vec<u32> = Vec::with_capacity((rings - 1) * radial_segments * 6);
    for j in 0..rings - 1 {
        let ring0 = j * ring_verts;
        let ring1 = (j + 1) * ring_verts;
        for i in 0..radial_segments {
            let a = (ring0 + i) as u32;
            let b = (ring1 + i) as u32;
            let c = (ring1 + i + 1) as u32;
            let d = (ring0 + i + 1) as u32;
            indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}
