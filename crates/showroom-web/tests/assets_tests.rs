// Host-side checks on the glTF merge; fixtures are tiny GLB containers
// assembled in memory so no asset files are needed.

use showroom_web::assets::CarModel;

const EPS: f32 = 1e-5;

/// Wrap a glTF JSON document and a binary buffer into a GLB container.
/// The BIN chunk is omitted when `bin` is empty.
fn glb(json: &str, bin: &[u8]) -> Vec<u8> {
    let mut json_bytes = json.as_bytes().to_vec();
    while json_bytes.len() % 4 != 0 {
        json_bytes.push(b' ');
    }
    let mut bin_bytes = bin.to_vec();
    while bin_bytes.len() % 4 != 0 {
        bin_bytes.push(0);
    }

    let mut total = 12 + 8 + json_bytes.len();
    if !bin_bytes.is_empty() {
        total += 8 + bin_bytes.len();
    }
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"glTF");
    out.extend_from_slice(&2u32.to_le_bytes());
    out.extend_from_slice(&(total as u32).to_le_bytes());
    out.extend_from_slice(&(json_bytes.len() as u32).to_le_bytes());
    out.extend_from_slice(b"JSON");
    out.extend_from_slice(&json_bytes);
    if !bin_bytes.is_empty() {
        out.extend_from_slice(&(bin_bytes.len() as u32).to_le_bytes());
        out.extend_from_slice(b"BIN\0");
        out.extend_from_slice(&bin_bytes);
    }
    out
}

/// One indexed triangle in the xy plane: positions, +z normals, u16 indices.
fn triangle_bin() -> Vec<u8> {
    let positions: [f32; 9] = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    let normals: [f32; 9] = [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0];
    let mut bin = Vec::new();
    for f in positions {
        bin.extend_from_slice(&f.to_le_bytes());
    }
    for f in normals {
        bin.extend_from_slice(&f.to_le_bytes());
    }
    for i in [0u16, 1, 2] {
        bin.extend_from_slice(&i.to_le_bytes());
    }
    bin
}

const TRIANGLE_GEOMETRY: &str = r#"
 "meshes": [{"primitives": [{"attributes": {"POSITION": 0, "NORMAL": 1}, "indices": 2}]}],
 "accessors": [
  {"bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
   "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0]},
  {"bufferView": 1, "componentType": 5126, "count": 3, "type": "VEC3"},
  {"bufferView": 2, "componentType": 5123, "count": 3, "type": "SCALAR"}
 ],
 "bufferViews": [
  {"buffer": 0, "byteOffset": 0, "byteLength": 36},
  {"buffer": 0, "byteOffset": 36, "byteLength": 36},
  {"buffer": 0, "byteOffset": 72, "byteLength": 6}
 ],
 "buffers": [{"byteLength": 78}]
"#;

#[test]
fn node_transforms_are_baked_into_vertices_and_bounds() {
    let json = format!(
        r#"{{
 "asset": {{"version": "2.0"}},
 "scene": 0,
 "scenes": [{{"nodes": [0]}}],
 "nodes": [{{"mesh": 0, "translation": [1.0, 2.0, 3.0], "scale": [2.0, 2.0, 2.0]}}],
{TRIANGLE_GEOMETRY}
}}"#
    );
    let model = CarModel::from_gltf_bytes(&glb(&json, &triangle_bin())).unwrap();

    assert_eq!(model.vertices.len(), 3);
    assert_eq!(model.indices, vec![0, 1, 2]);

    // Raw positions (0,0,0) (1,0,0) (0,1,0), scaled by 2 then translated
    let expected = [[1.0, 2.0, 3.0], [3.0, 2.0, 3.0], [1.0, 4.0, 3.0]];
    for (v, e) in model.vertices.iter().zip(expected) {
        for k in 0..3 {
            assert!((v.pos[k] - e[k]).abs() < EPS, "pos {:?} vs {:?}", v.pos, e);
        }
        // Uniform scale leaves the unit normal unchanged
        assert!((v.nrm[2] - 1.0).abs() < EPS);
    }

    assert!((model.bounds.min.x - 1.0).abs() < EPS);
    assert!((model.bounds.max.x - 3.0).abs() < EPS);
    assert!((model.bounds.min.y - 2.0).abs() < EPS);
    assert!((model.bounds.max.y - 4.0).abs() < EPS);
}

#[test]
fn nested_node_transforms_compose() {
    // Mesh hangs off a child node; parent and child translations must stack.
    let json = format!(
        r#"{{
 "asset": {{"version": "2.0"}},
 "scene": 0,
 "scenes": [{{"nodes": [0]}}],
 "nodes": [
  {{"children": [1], "translation": [0.0, 1.0, 0.0]}},
  {{"mesh": 0, "translation": [1.0, 0.0, 0.0]}}
 ],
{TRIANGLE_GEOMETRY}
}}"#
    );
    let model = CarModel::from_gltf_bytes(&glb(&json, &triangle_bin())).unwrap();

    assert!((model.vertices[0].pos[0] - 1.0).abs() < EPS);
    assert!((model.vertices[0].pos[1] - 1.0).abs() < EPS);
    assert!((model.bounds.max.x - 2.0).abs() < EPS);
    assert!((model.bounds.max.y - 2.0).abs() < EPS);
}

#[test]
fn asset_without_geometry_is_rejected() {
    let json = r#"{
 "asset": {"version": "2.0"},
 "scene": 0,
 "scenes": [{"nodes": []}]
}"#;
    let err = CarModel::from_gltf_bytes(&glb(json, &[])).unwrap_err();
    assert!(err.to_string().contains("no renderable geometry"));
}
