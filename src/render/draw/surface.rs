//! Band geometry: the quad-strip surface between a layer's bottom and
//! top boundary curves.

use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};

/// Build the band mesh for one layer from its two boundary sequences
/// (equal length, already densified). UV `v` runs 0 at the bottom
/// boundary to 1 at the top boundary of THIS band's own span, so every
/// layer carries a full gradient regardless of its stacking position.
/// Both winding orders are emitted so the band reads from either side
/// of the orbit. Returns `None` for fewer than two columns.
pub fn build_band_mesh(bottom: &[Vec2], top: &[Vec2]) -> Option<Mesh> {
    let n = bottom.len().min(top.len());
    if n < 2 {
        return None;
    }

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(n * 2);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(n * 2);

    let span = (n - 1) as f32;
    for i in 0..n {
        let u = i as f32 / span;
        positions.push([bottom[i].x, bottom[i].y, 0.0]);
        uvs.push([u, 0.0]);
        positions.push([top[i].x, top[i].y, 0.0]);
        uvs.push([u, 1.0]);
    }

    // Per column pair: bl, br, tl then br, tr, tl.
    let mut indices: Vec<u32> = Vec::with_capacity((n - 1) * 12);
    for i in 0..n - 1 {
        let bl = (i * 2) as u32;
        let tl = bl + 1;
        let br = bl + 2;
        let tr = bl + 3;
        indices.extend_from_slice(&[bl, br, tl, br, tr, tl]);
    }

    // Normals come from the front faces only; the quads are then
    // re-emitted reversed so backface culling never hides the band.
    let normals = accumulate_normals(&positions, &indices);
    for i in 0..n - 1 {
        let bl = (i * 2) as u32;
        let tl = bl + 1;
        let br = bl + 2;
        let tr = bl + 3;
        indices.extend_from_slice(&[bl, tl, br, br, tl, tr]);
    }

    Some(
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::default(),
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_NORMAL, normals)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
        .with_inserted_indices(Indices::U32(indices)),
    )
}

/// Smooth vertex normals accumulated from triangle face normals.
pub fn accumulate_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut normals = vec![Vec3::ZERO; positions.len()];

    let pos = |i: usize| Vec3::from_array(positions[i]);

    for tri in indices.chunks_exact(3) {
        let a = tri[0] as usize;
        let b = tri[1] as usize;
        let c = tri[2] as usize;

        let e1 = pos(b) - pos(a);
        let e2 = pos(c) - pos(a);
        let n = e1.cross(e2);

        normals[a] += n;
        normals[b] += n;
        normals[c] += n;
    }

    normals
        .into_iter()
        .map(|n| {
            let n = n.normalize_or_zero();
            [n.x, n.y, n.z]
        })
        .collect()
}
