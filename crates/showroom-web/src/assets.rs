//! Asset decoding: glTF car model and the background image.

use anyhow::{bail, Context, Result};
use glam::{Mat3, Mat4, Vec3};
use gltf::mesh::util::ReadIndices;

use showroom_core::Aabb;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 3],
    pub nrm: [f32; 3],
    pub color: [f32; 4],
}

/// CPU-side model: all primitives merged into one vertex/index pair, with
/// node world transforms and the per-primitive base color baked into the
/// vertices. Every submesh both casts and receives shadows, so no per-mesh
/// flags survive the merge.
#[derive(Debug)]
pub struct CarModel {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Bounds of the merged geometry, node transforms applied.
    pub bounds: Aabb,
}

impl CarModel {
    /// Parse a self-contained glTF asset (GLB or embedded buffers).
    pub fn from_gltf_bytes(bytes: &[u8]) -> Result<Self> {
        let (doc, buffers, _images) =
            gltf::import_slice(bytes).context("failed to parse glTF")?;

        let mut vertices: Vec<Vertex> = Vec::new();
        let mut indices: Vec<u32> = Vec::new();
        let mut bounds = Aabb::empty();

        // Walk the scene graph rather than the flat mesh list: exporters
        // routinely park per-part translations and scales on nodes, and a
        // mesh read without them lands in the wrong place.
        if let Some(scene) = doc.default_scene().or_else(|| doc.scenes().next()) {
            for node in scene.nodes() {
                append_node(
                    &node,
                    Mat4::IDENTITY,
                    &buffers,
                    &mut vertices,
                    &mut indices,
                    &mut bounds,
                );
            }
        }

        if vertices.is_empty() || bounds.is_degenerate() {
            // Distinct failure kind; never let a zero-size box reach the
            // normalizer's scale division.
            bail!("asset has no renderable geometry");
        }

        log::info!(
            "[assets] model: {} vertices, {} indices, size {:?}",
            vertices.len(),
            indices.len(),
            bounds.size()
        );
        Ok(Self {
            vertices,
            indices,
            bounds,
        })
    }
}

/// Merge one node's mesh (if any) with its world transform applied, then
/// recurse into its children with the composed transform.
fn append_node(
    node: &gltf::Node,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    vertices: &mut Vec<Vertex>,
    indices: &mut Vec<u32>,
    bounds: &mut Aabb,
) {
    let world = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        // Inverse-transpose keeps normals correct under non-uniform scale
        let normal_mat = Mat3::from_mat4(world).inverse().transpose();

        for prim in mesh.primitives() {
            let reader = prim.reader(|b| buffers.get(b.index()).map(|bb| bb.0.as_slice()));
            let pos = match reader.read_positions() {
                Some(it) => it.collect::<Vec<[f32; 3]>>(),
                None => continue,
            };
            let nrm: Vec<[f32; 3]> = match reader.read_normals() {
                Some(it) => it.collect(),
                None => vec![[0.0, 1.0, 0.0]; pos.len()],
            };
            let color = prim
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            let start = vertices.len() as u32;
            for i in 0..pos.len() {
                let p = world.transform_point3(Vec3::from_array(pos[i]));
                let n = (normal_mat * Vec3::from_array(nrm[i])).normalize_or_zero();
                bounds.expand(p);
                vertices.push(Vertex {
                    pos: p.to_array(),
                    nrm: n.to_array(),
                    color,
                });
            }
            match reader.read_indices() {
                Some(ReadIndices::U8(it)) => indices.extend(it.map(|v| start + v as u32)),
                Some(ReadIndices::U16(it)) => indices.extend(it.map(|v| start + v as u32)),
                Some(ReadIndices::U32(it)) => indices.extend(it.map(|v| start + v)),
                // Non-indexed primitive: triangles in vertex order
                None => indices.extend(start..start + pos.len() as u32),
            }
        }
    }

    for child in node.children() {
        append_node(&child, world, buffers, vertices, indices, bounds);
    }
}

/// Decoded background image, ready for texture upload.
pub struct BackgroundImage {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl BackgroundImage {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(bytes).context("failed to decode background image")?;
        let rgba = img.to_rgba8();
        let (width, height) = (rgba.width(), rgba.height());
        Ok(Self {
            rgba: rgba.into_raw(),
            width,
            height,
        })
    }
}
