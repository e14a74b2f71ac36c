use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, bail, Context};
use glam::{Mat4, Quat, Vec2, Vec3};
use smallvec::SmallVec;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

use crate::constants::{CLOTH_ASSET_URL, STONE_ASSET_URL};
use crate::core::clip::{Clip, ClipTrack, Interpolation, KeyframeTrack, TargetPath, TrackData};
use crate::core::cloth::ClothBridge;
use crate::core::project::RaycastMesh;
use crate::core::scene::{ClothSurface, SceneContext, StoneNode, StoneState, INTRO_CLIP};
use crate::core::{CLOTH_FALLOFF_RADIUS, CLOTH_OFFSET, CLOTH_WAVE_AMPLITUDE};
use crate::render::{cloth_shader, GpuState, Vertex};

/// Two-stage load pipeline. The cloth stage receives the stone's resolved
/// position as an explicit value, so the ordering dependency is a visible
/// precondition instead of callback nesting. `ready` flips only after both
/// stages complete; a failed stage is fatal for the affected object and is
/// logged, with no retry.
pub async fn load_scene(
    scene: Rc<RefCell<SceneContext>>,
    gpu: Rc<RefCell<Option<GpuState<'static>>>>,
) {
    if let Err(e) = run_pipeline(&scene, &gpu).await {
        log::error!("[load] asset pipeline failed: {e:?}");
    }
}

async fn run_pipeline(
    scene: &Rc<RefCell<SceneContext>>,
    gpu: &Rc<RefCell<Option<GpuState<'static>>>>,
) -> anyhow::Result<()> {
    let bytes = fetch_bytes(STONE_ASSET_URL).await?;
    let decoded = decode_stone(&bytes)?;
    let stone_position = install_stone(scene, gpu, decoded)?;

    let bytes = fetch_bytes(CLOTH_ASSET_URL).await?;
    let decoded = decode_cloth(&bytes)?;
    install_cloth(scene, gpu, decoded, stone_position)?;

    scene.borrow_mut().ready = true;
    log::info!("[load] scene ready");
    Ok(())
}

pub async fn fetch_bytes(url: &str) -> anyhow::Result<Vec<u8>> {
    let window = web::window().ok_or_else(|| anyhow!("no window"))?;
    let response = JsFuture::from(window.fetch_with_str(url))
        .await
        .map_err(|e| anyhow!("fetch {url}: {e:?}"))?;
    let response: web::Response = response
        .dyn_into()
        .map_err(|e| anyhow!("fetch {url}: not a Response: {e:?}"))?;
    if !response.ok() {
        bail!("fetch {url}: HTTP {}", response.status());
    }
    let buffer = JsFuture::from(
        response
            .array_buffer()
            .map_err(|e| anyhow!("fetch {url}: {e:?}"))?,
    )
    .await
    .map_err(|e| anyhow!("fetch {url}: {e:?}"))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

// ===================== Decoding =====================

pub struct DecodedMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

pub struct DecodedNode {
    pub name: String,
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
    pub mesh: Option<DecodedMesh>,
}

pub struct DecodedStone {
    pub nodes: Vec<DecodedNode>,
    pub clips: Vec<Clip>,
}

pub struct DecodedCloth {
    pub mesh: DecodedMesh,
    pub scale: f32,
}

/// Decode the stone package: node hierarchy plus the two authored clips,
/// `[intro, outro]` in file order.
pub fn decode_stone(bytes: &[u8]) -> anyhow::Result<DecodedStone> {
    let (document, buffers, _) = gltf::import_slice(bytes).context("decode stone")?;

    let mut nodes = Vec::new();
    for node in document.nodes() {
        let (translation, rotation, scale) = node.transform().decomposed();
        let mesh = node
            .mesh()
            .map(|m| read_mesh(&m, &buffers))
            .transpose()?;
        nodes.push(DecodedNode {
            name: node_name(&node),
            translation: Vec3::from(translation),
            rotation: Quat::from_array(rotation),
            scale: Vec3::from(scale),
            mesh,
        });
    }

    let clips: Vec<Clip> = document
        .animations()
        .map(|a| read_clip(&a, &buffers))
        .collect::<anyhow::Result<_>>()?;
    if clips.len() < 2 {
        bail!("stone asset carries {} clips, expected [intro, outro]", clips.len());
    }

    Ok(DecodedStone { nodes, clips })
}

/// Decode the cloth package: exactly one deformable surface mesh.
pub fn decode_cloth(bytes: &[u8]) -> anyhow::Result<DecodedCloth> {
    let (document, buffers, _) = gltf::import_slice(bytes).context("decode cloth")?;
    let (mesh, scale) = document
        .nodes()
        .find_map(|n| n.mesh().map(|m| (m, n.transform().decomposed().2)))
        .ok_or_else(|| anyhow!("cloth asset has no surface mesh"))?;
    let mesh = read_mesh(&mesh, &buffers)?;
    Ok(DecodedCloth {
        mesh,
        scale: scale[0],
    })
}

fn node_name(node: &gltf::Node) -> String {
    node.name()
        .map(str::to_owned)
        .unwrap_or_else(|| format!("node-{}", node.index()))
}

fn read_mesh(mesh: &gltf::Mesh, buffers: &[gltf::buffer::Data]) -> anyhow::Result<DecodedMesh> {
    let mut vertices: Vec<Vertex> = Vec::new();
    let mut indices: Vec<u32> = Vec::new();

    for primitive in mesh.primitives() {
        let reader = primitive.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
        let positions: Vec<[f32; 3]> = reader
            .read_positions()
            .ok_or_else(|| anyhow!("primitive without positions"))?
            .collect();
        let uvs: Vec<[f32; 2]> = reader
            .read_tex_coords(0)
            .map(|t| t.into_f32().collect())
            .unwrap_or_else(|| vec![[0.0, 0.0]; positions.len()]);
        let prim_indices: Vec<u32> = reader
            .read_indices()
            .map(|i| i.into_u32().collect())
            .unwrap_or_else(|| (0..positions.len() as u32).collect());
        let normals: Vec<[f32; 3]> = reader
            .read_normals()
            .map(|n| n.collect())
            .unwrap_or_else(|| compute_normals(&positions, &prim_indices));

        let base = vertices.len() as u32;
        for ((p, n), uv) in positions.iter().zip(&normals).zip(&uvs) {
            vertices.push(Vertex {
                position: *p,
                normal: *n,
                uv: *uv,
            });
        }
        indices.extend(prim_indices.iter().map(|i| i + base));
    }

    Ok(DecodedMesh { vertices, indices })
}

/// Area-weighted vertex normals for primitives that ship without them.
fn compute_normals(positions: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    let mut accum = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let a = Vec3::from(positions[tri[0] as usize]);
        let b = Vec3::from(positions[tri[1] as usize]);
        let c = Vec3::from(positions[tri[2] as usize]);
        let face = (b - a).cross(c - a);
        for &i in tri {
            accum[i as usize] += face;
        }
    }
    accum
        .into_iter()
        .map(|n| n.normalize_or_zero().to_array())
        .collect()
}

fn read_clip(
    animation: &gltf::Animation,
    buffers: &[gltf::buffer::Data],
) -> anyhow::Result<Clip> {
    let mut tracks: SmallVec<[ClipTrack; 8]> = SmallVec::new();
    for channel in animation.channels() {
        let target = channel.target();
        let node = node_name(&target.node());
        let reader = channel.reader(|buffer| buffers.get(buffer.index()).map(|d| d.0.as_slice()));
        let times: Vec<f32> = reader
            .read_inputs()
            .ok_or_else(|| anyhow!("animation channel without inputs"))?
            .collect();
        let interpolation = match channel.sampler().interpolation() {
            gltf::animation::Interpolation::Step => Interpolation::Step,
            // Cubic tangents are ignored; the spline's knot values sample
            // linearly, which is close enough for these short clips.
            _ => Interpolation::Linear,
        };
        let cubic = channel.sampler().interpolation() == gltf::animation::Interpolation::CubicSpline;

        let outputs = reader
            .read_outputs()
            .ok_or_else(|| anyhow!("animation channel without outputs"))?;
        let (path, data) = match outputs {
            gltf::animation::util::ReadOutputs::Translations(iter) => {
                let values = knot_values(iter.map(Vec3::from).collect(), cubic);
                (
                    TargetPath::Translation,
                    TrackData::Vec3(KeyframeTrack::new(times, values, interpolation)),
                )
            }
            gltf::animation::util::ReadOutputs::Rotations(rotations) => {
                let values = knot_values(
                    rotations.into_f32().map(Quat::from_array).collect(),
                    cubic,
                );
                (
                    TargetPath::Rotation,
                    TrackData::Quat(KeyframeTrack::new(times, values, interpolation)),
                )
            }
            gltf::animation::util::ReadOutputs::Scales(iter) => {
                let values = knot_values(iter.map(Vec3::from).collect(), cubic);
                (
                    TargetPath::Scale,
                    TrackData::Vec3(KeyframeTrack::new(times, values, interpolation)),
                )
            }
            gltf::animation::util::ReadOutputs::MorphTargetWeights(_) => continue,
        };
        tracks.push(ClipTrack { node, path, data });
    }
    Ok(Clip::new(
        animation.name().unwrap_or("clip").to_owned(),
        tracks,
    ))
}

/// For cubic-spline samplers the output stream is (in-tangent, value,
/// out-tangent) triplets; keep only the knot values.
fn knot_values<T: Copy>(values: Vec<T>, cubic: bool) -> Vec<T> {
    if !cubic {
        return values;
    }
    values.iter().skip(1).step_by(3).copied().collect()
}

// ===================== Installation =====================

/// Stage 1: upload the stone, snapshot rest positions, build the collision
/// proxy and start the intro clip. Returns the stone's resolved position —
/// the value the cloth stage is not allowed to exist without.
fn install_stone(
    scene: &Rc<RefCell<SceneContext>>,
    gpu: &Rc<RefCell<Option<GpuState<'static>>>>,
    decoded: DecodedStone,
) -> anyhow::Result<Vec3> {
    let mut gpu_ref = gpu.borrow_mut();
    let gpu = gpu_ref
        .as_mut()
        .ok_or_else(|| anyhow!("gpu not initialized"))?;

    let mut proxy_positions: Vec<Vec3> = Vec::new();
    let mut proxy_uvs: Vec<Vec2> = Vec::new();
    let mut proxy_indices: Vec<u32> = Vec::new();
    let mut nodes: Vec<StoneNode> = Vec::new();

    for node in decoded.nodes {
        let mesh = node.mesh.as_ref().map(|m| gpu.upload_mesh(&m.vertices, &m.indices));
        if let Some(m) = &node.mesh {
            // Proxy geometry is baked into stone-local space; its transform
            // tracks the rendered stone every frame.
            let local =
                Mat4::from_scale_rotation_translation(node.scale, node.rotation, node.translation);
            let base = proxy_positions.len() as u32;
            proxy_positions.extend(
                m.vertices
                    .iter()
                    .map(|v| local.transform_point3(Vec3::from(v.position))),
            );
            proxy_uvs.extend(m.vertices.iter().map(|v| Vec2::from(v.uv)));
            proxy_indices.extend(m.indices.iter().map(|i| i + base));
        }
        nodes.push(StoneNode {
            name: node.name,
            position: node.translation,
            rotation: node.rotation,
            scale: node.scale,
            mesh,
        });
    }

    let proxy = RaycastMesh::new(proxy_positions, proxy_uvs, proxy_indices);
    let node_count = nodes.len();
    let clip_count = decoded.clips.len();

    let mut stone = StoneState::new(nodes, decoded.clips, proxy);
    stone.proxy.set_transform(stone.model_matrix());
    stone.player.play(INTRO_CLIP);
    let position = stone.position;

    let mut scene = scene.borrow_mut();
    scene.machine.clip_started();
    scene.stone = Some(stone);
    log::info!("[load] stone ready ({node_count} nodes, {clip_count} clips)");
    Ok(position)
}

/// Stage 2: upload the cloth, place it relative to the stone's resolved
/// position and compile the displacement shader variant.
fn install_cloth(
    scene: &Rc<RefCell<SceneContext>>,
    gpu: &Rc<RefCell<Option<GpuState<'static>>>>,
    decoded: DecodedCloth,
    stone_position: Vec3,
) -> anyhow::Result<()> {
    let mut gpu_ref = gpu.borrow_mut();
    let gpu = gpu_ref
        .as_mut()
        .ok_or_else(|| anyhow!("gpu not initialized"))?;

    let mesh = gpu.upload_mesh(&decoded.mesh.vertices, &decoded.mesh.indices);
    gpu.install_cloth(&cloth_shader::cloth_shader_source(
        CLOTH_FALLOFF_RADIUS,
        CLOTH_WAVE_AMPLITUDE,
    ));

    let position = stone_position + CLOTH_OFFSET;
    let mut raycast = RaycastMesh::new(
        decoded
            .mesh
            .vertices
            .iter()
            .map(|v| Vec3::from(v.position))
            .collect(),
        decoded
            .mesh
            .vertices
            .iter()
            .map(|v| Vec2::from(v.uv))
            .collect(),
        decoded.mesh.indices.clone(),
    );
    // Picking ignores the animated scale so UV feedback works mid-grow.
    raycast.set_transform(Mat4::from_translation(position));

    let original_scale = if decoded.scale > 0.0 { decoded.scale } else { 1.0 };
    scene.borrow_mut().cloth = Some(ClothSurface {
        mesh,
        raycast,
        position,
        bridge: ClothBridge::new(original_scale),
    });
    log::info!("[load] cloth ready");
    Ok(())
}
