//! WebGPU scene renderer: background quad, shadow-mapped car, ground
//! shadow catcher.

use glam::{Mat4, Vec3};
use web_sys as web;
use wgpu::util::DeviceExt;

use showroom_core::constants::{
    AMBIENT_INTENSITY, FILL_LIGHT_INTENSITY, FILL_LIGHT_POS, GROUND_EXTENT,
    GROUND_SHADOW_OPACITY, GROUND_Y, MAIN_LIGHT_INTENSITY, MAIN_LIGHT_POS,
};
use showroom_core::Camera;

use crate::assets::{BackgroundImage, CarModel, Vertex};

const SHADOW_MAP_SIZE: u32 = 1024;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth24Plus;
const SHADOW_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light_view_proj: [[f32; 4]; 4],
    model: [[f32; 4]; 4],
    // xyz: normalized direction toward the light, w: intensity
    main_light: [f32; 4],
    fill_light: [f32; 4],
    // x: ambient intensity, y: ground shadow opacity
    params: [f32; 4],
}

struct GpuMesh {
    vertex_buf: wgpu::Buffer,
    index_buf: wgpu::Buffer,
    index_count: u32,
}

const SCENE_WGSL: &str = r#"
struct Globals {
  view_proj: mat4x4<f32>,
  light_view_proj: mat4x4<f32>,
  model: mat4x4<f32>,
  main_light: vec4<f32>,
  fill_light: vec4<f32>,
  params: vec4<f32>,
};
@group(0) @binding(0) var<uniform> u: Globals;
@group(1) @binding(0) var shadow_map: texture_depth_2d;
@group(1) @binding(1) var shadow_sampler: sampler_comparison;

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) world_pos: vec3<f32>,
  @location(1) normal: vec3<f32>,
  @location(2) color: vec4<f32>,
};

@vertex
fn vs_scene(
  @location(0) pos: vec3<f32>,
  @location(1) nrm: vec3<f32>,
  @location(2) color: vec4<f32>,
) -> VsOut {
  let world = u.model * vec4<f32>(pos, 1.0);
  var out: VsOut;
  out.pos = u.view_proj * world;
  out.world_pos = world.xyz;
  out.normal = normalize((u.model * vec4<f32>(nrm, 0.0)).xyz);
  out.color = color;
  return out;
}

@vertex
fn vs_shadow(
  @location(0) pos: vec3<f32>,
  @location(1) nrm: vec3<f32>,
  @location(2) color: vec4<f32>,
) -> @builtin(position) vec4<f32> {
  return u.light_view_proj * u.model * vec4<f32>(pos, 1.0);
}

fn shadow_visibility(world_pos: vec3<f32>) -> f32 {
  let clip = u.light_view_proj * vec4<f32>(world_pos, 1.0);
  let ndc = clip.xyz / clip.w;
  let uv = ndc.xy * vec2<f32>(0.5, -0.5) + vec2<f32>(0.5, 0.5);
  if (uv.x < 0.0 || uv.x > 1.0 || uv.y < 0.0 || uv.y > 1.0 || ndc.z > 1.0) {
    return 1.0;
  }
  return textureSampleCompare(shadow_map, shadow_sampler, uv, ndc.z - 0.002);
}

@fragment
fn fs_model(inf: VsOut) -> @location(0) vec4<f32> {
  let n = normalize(inf.normal);
  let vis = shadow_visibility(inf.world_pos);
  let main_term = max(dot(n, normalize(u.main_light.xyz)), 0.0) * u.main_light.w * vis;
  let fill_term = max(dot(n, normalize(u.fill_light.xyz)), 0.0) * u.fill_light.w;
  let light = u.params.x + main_term + fill_term;
  let rgb = min(inf.color.rgb * light, vec3<f32>(1.0));
  return vec4<f32>(rgb, inf.color.a);
}

// Shadow catcher: fully transparent where lit, tinted where occluded.
@fragment
fn fs_ground(inf: VsOut) -> @location(0) vec4<f32> {
  let vis = shadow_visibility(inf.world_pos);
  let shade = (1.0 - vis) * u.params.y;
  return vec4<f32>(0.0, 0.0, 0.0, shade);
}
"#;

const BACKGROUND_WGSL: &str = r#"
@group(0) @binding(0) var bg_tex: texture_2d<f32>;
@group(0) @binding(1) var bg_sampler: sampler;

struct VsOut {
  @builtin(position) pos: vec4<f32>,
  @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) vi: u32) -> VsOut {
  // fullscreen triangle
  let uv = vec2<f32>(f32((vi << 1u) & 2u), f32(vi & 2u));
  var out: VsOut;
  out.pos = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
  out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
  return out;
}

@fragment
fn fs_main(inf: VsOut) -> @location(0) vec4<f32> {
  return textureSample(bg_tex, bg_sampler, inf.uv);
}
"#;

pub struct GpuState<'a> {
    surface: wgpu::Surface<'a>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,

    shadow_pipeline: wgpu::RenderPipeline,
    model_pipeline: wgpu::RenderPipeline,
    ground_pipeline: wgpu::RenderPipeline,
    background_pipeline: wgpu::RenderPipeline,

    globals_model_buf: wgpu::Buffer,
    globals_ground_buf: wgpu::Buffer,
    globals_model_bg: wgpu::BindGroup,
    globals_ground_bg: wgpu::BindGroup,
    shadow_bg: wgpu::BindGroup,
    background_bgl: wgpu::BindGroupLayout,
    background_bg: Option<wgpu::BindGroup>,

    _shadow_texture: wgpu::Texture,
    shadow_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,

    ground: GpuMesh,
    model: Option<GpuMesh>,

    light_view_proj: Mat4,
    width: u32,
    height: u32,
}

impl<'a> GpuState<'a> {
    pub async fn new(canvas: &'a web::HtmlCanvasElement) -> anyhow::Result<Self> {
        let width = canvas.width();
        let height = canvas.height();

        let instance = wgpu::Instance::default();
        let surface = instance.create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or_else(|| anyhow::anyhow!("No WebGPU adapter"))?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| anyhow::anyhow!(format!("request_device error: {:?}", e)))?;

        let caps = surface.get_capabilities(&adapter);
        let format = caps.formats[0];
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let scene_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(SCENE_WGSL.into()),
        });
        let background_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("background_shader"),
            source: wgpu::ShaderSource::Wgsl(BACKGROUND_WGSL.into()),
        });

        // Bind group layouts
        let globals_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let shadow_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("shadow_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Depth,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Comparison),
                    count: None,
                },
            ],
        });
        let background_bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("background_bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        // Uniform buffers: one set for the model transform, one for the
        // ground (identity model matrix)
        let globals_size = std::mem::size_of::<Globals>() as u64;
        let globals_model_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_model"),
            size: globals_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_ground_buf = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals_ground"),
            size: globals_size,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_model_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_model_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_model_buf.as_entire_binding(),
            }],
        });
        let globals_ground_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_ground_bg"),
            layout: &globals_bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_ground_buf.as_entire_binding(),
            }],
        });

        // Shadow map resources
        let shadow_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("shadow_map"),
            size: wgpu::Extent3d {
                width: SHADOW_MAP_SIZE,
                height: SHADOW_MAP_SIZE,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: SHADOW_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let shadow_view = shadow_texture.create_view(&wgpu::TextureViewDescriptor::default());
        let shadow_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("shadow_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            compare: Some(wgpu::CompareFunction::LessEqual),
            ..Default::default()
        });
        let shadow_bg = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("shadow_bg"),
            layout: &shadow_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&shadow_view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&shadow_sampler),
                },
            ],
        });

        let vertex_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 0,
                    shader_location: 0,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x3,
                    offset: 12,
                    shader_location: 1,
                },
                wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 24,
                    shader_location: 2,
                },
            ],
        };

        let scene_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_layout"),
            bind_group_layouts: &[&globals_bgl, &shadow_bgl],
            push_constant_ranges: &[],
        });
        let shadow_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("shadow_layout"),
            bind_group_layouts: &[&globals_bgl],
            push_constant_ranges: &[],
        });
        let background_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("background_layout"),
            bind_group_layouts: &[&background_bgl],
            push_constant_ranges: &[],
        });

        let shadow_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("shadow_pipeline"),
            layout: Some(&shadow_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_shadow"),
                buffers: std::slice::from_ref(&vertex_layout),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: SHADOW_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState {
                    constant: 2,
                    slope_scale: 2.0,
                    clamp: 0.0,
                },
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: None,
            cache: None,
            multiview: None,
        });

        let model_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("model_pipeline"),
            layout: Some(&scene_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_scene"),
                buffers: std::slice::from_ref(&vertex_layout),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_model"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let ground_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("ground_pipeline"),
            layout: Some(&scene_layout),
            vertex: wgpu::VertexState {
                module: &scene_shader,
                entry_point: Some("vs_scene"),
                buffers: std::slice::from_ref(&vertex_layout),
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &scene_shader,
                entry_point: Some("fs_ground"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let background_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background_pipeline"),
            layout: Some(&background_layout),
            vertex: wgpu::VertexState {
                module: &background_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Always,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &background_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            cache: None,
            multiview: None,
        });

        let ground = Self::build_ground_mesh(&device);
        let depth_view = Self::create_depth_view(&device, width, height);

        Ok(Self {
            surface,
            device,
            queue,
            config,
            shadow_pipeline,
            model_pipeline,
            ground_pipeline,
            background_pipeline,
            globals_model_buf,
            globals_ground_buf,
            globals_model_bg,
            globals_ground_bg,
            shadow_bg,
            background_bgl,
            background_bg: None,
            _shadow_texture: shadow_texture,
            shadow_view,
            depth_view,
            ground,
            model: None,
            light_view_proj: light_view_proj(),
            width,
            height,
        })
    }

    fn build_ground_mesh(device: &wgpu::Device) -> GpuMesh {
        let e = GROUND_EXTENT * 0.5;
        let n = [0.0, 1.0, 0.0];
        let c = [0.0, 0.0, 0.0, 1.0];
        let vertices = [
            Vertex { pos: [-e, GROUND_Y, -e], nrm: n, color: c },
            Vertex { pos: [e, GROUND_Y, -e], nrm: n, color: c },
            Vertex { pos: [e, GROUND_Y, e], nrm: n, color: c },
            Vertex { pos: [-e, GROUND_Y, e], nrm: n, color: c },
        ];
        let indices: [u32; 6] = [0, 2, 1, 0, 3, 2];
        let vertex_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ground_vb"),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buf = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("ground_ib"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        GpuMesh {
            vertex_buf,
            index_buf,
            index_count: indices.len() as u32,
        }
    }

    fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Upload the merged car mesh. Called once when the asset load succeeds.
    pub fn set_model(&mut self, model: &CarModel) {
        let vertex_buf = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("model_vb"),
                contents: bytemuck::cast_slice(&model.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        let index_buf = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("model_ib"),
                contents: bytemuck::cast_slice(&model.indices),
                usage: wgpu::BufferUsages::INDEX,
            });
        self.model = Some(GpuMesh {
            vertex_buf,
            index_buf,
            index_count: model.indices.len() as u32,
        });
    }

    /// Upload the background image as the scene backdrop.
    pub fn set_background(&mut self, image: &BackgroundImage) {
        let texture = self.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("background"),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        self.queue.write_texture(
            texture.as_image_copy(),
            &image.rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * image.width),
                rows_per_image: Some(image.height),
            },
            wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
        );
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = self.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("background_sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });
        self.background_bg = Some(self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("background_bg"),
            layout: &self.background_bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
        }));
    }

    pub fn resize_if_needed(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = Self::create_depth_view(&self.device, width, height);
        }
    }

    fn globals(&self, camera: &Camera, model: Mat4) -> Globals {
        let main_dir = Vec3::from_array(MAIN_LIGHT_POS).normalize();
        let fill_dir = Vec3::from_array(FILL_LIGHT_POS).normalize();
        Globals {
            view_proj: camera.view_proj().to_cols_array_2d(),
            light_view_proj: self.light_view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            main_light: [main_dir.x, main_dir.y, main_dir.z, MAIN_LIGHT_INTENSITY],
            fill_light: [fill_dir.x, fill_dir.y, fill_dir.z, FILL_LIGHT_INTENSITY],
            params: [AMBIENT_INTENSITY, GROUND_SHADOW_OPACITY, 0.0, 0.0],
        }
    }

    pub fn render(
        &mut self,
        camera: &Camera,
        model_matrix: Mat4,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.surface.get_current_texture()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });

        self.queue.write_buffer(
            &self.globals_model_buf,
            0,
            bytemuck::bytes_of(&self.globals(camera, model_matrix)),
        );
        self.queue.write_buffer(
            &self.globals_ground_buf,
            0,
            bytemuck::bytes_of(&self.globals(camera, Mat4::IDENTITY)),
        );

        // Shadow pass: model into the light's depth map
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("shadow_pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.shadow_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            if let Some(model) = &self.model {
                pass.set_pipeline(&self.shadow_pipeline);
                pass.set_bind_group(0, &self.globals_model_bg, &[]);
                pass.set_vertex_buffer(0, model.vertex_buf.slice(..));
                pass.set_index_buffer(model.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..model.index_count, 0, 0..1);
            }
        }

        // Main pass: background, ground shadow catcher, car
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("main_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: 0.03,
                            g: 0.04,
                            b: 0.08,
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if let Some(bg) = &self.background_bg {
                pass.set_pipeline(&self.background_pipeline);
                pass.set_bind_group(0, bg, &[]);
                pass.draw(0..3, 0..1);
            }

            pass.set_pipeline(&self.ground_pipeline);
            pass.set_bind_group(0, &self.globals_ground_bg, &[]);
            pass.set_bind_group(1, &self.shadow_bg, &[]);
            pass.set_vertex_buffer(0, self.ground.vertex_buf.slice(..));
            pass.set_index_buffer(self.ground.index_buf.slice(..), wgpu::IndexFormat::Uint32);
            pass.draw_indexed(0..self.ground.index_count, 0, 0..1);

            if let Some(model) = &self.model {
                pass.set_pipeline(&self.model_pipeline);
                pass.set_bind_group(0, &self.globals_model_bg, &[]);
                pass.set_bind_group(1, &self.shadow_bg, &[]);
                pass.set_vertex_buffer(0, model.vertex_buf.slice(..));
                pass.set_index_buffer(model.index_buf.slice(..), wgpu::IndexFormat::Uint32);
                pass.draw_indexed(0..model.index_count, 0, 0..1);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }
}

/// Orthographic depth-map projection looking down the main light direction.
fn light_view_proj() -> Mat4 {
    let eye = Vec3::from_array(MAIN_LIGHT_POS).normalize() * 20.0;
    let view = Mat4::look_at_rh(eye, Vec3::ZERO, Vec3::Y);
    let proj = Mat4::orthographic_rh(-12.0, 12.0, -12.0, 12.0, 0.1, 40.0);
    proj * view
}
