use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};

use crate::render::{Vertex, ViewportUniform};

/// Initialization parameters for the device session.
///
/// Keep this structure stable and minimal. Add configuration flags only when a
/// concrete platform or backend requirement exists.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Adapter preference; discrete GPUs render the batched pass comfortably.
    pub power_preference: wgpu::PowerPreference,

    /// Required wgpu features.
    ///
    /// Favor an empty set for portability unless a feature is strictly necessary.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
        }
    }
}

/// Owns the wgpu core objects and the fixed triangle pipeline.
///
/// One long-lived instance per process, or per recovery cycle: on device loss
/// the whole session is dropped and reopened, never partially repaired.
///
/// Field order is reverse-dependency order so that `Drop` releases consumers
/// before the objects they reference (pipeline before device, device before
/// adapter and instance).
pub struct Session {
    pipeline: Option<wgpu::RenderPipeline>,
    pipeline_format: Option<wgpu::TextureFormat>,

    pipeline_layout: wgpu::PipelineLayout,
    bind_group_layout: wgpu::BindGroupLayout,
    shader: wgpu::ShaderModule,

    queue: wgpu::Queue,
    device: wgpu::Device,
    adapter: wgpu::Adapter,
    instance: wgpu::Instance,

    lost: Arc<AtomicBool>,
}

impl Session {
    /// Negotiates an adapter and device, then compiles the triangle shader.
    ///
    /// Blocks the calling thread until the backend callbacks fire (single
    /// threaded cooperative wait via pollster). Any failure is hard: no retry
    /// happens here, the caller decides whether to abort or fall back.
    pub fn open(config: SessionConfig) -> Result<Self> {
        pollster::block_on(Self::open_async(config))
    }

    async fn open_async(config: SessionConfig) -> Result<Self> {
        // Use all backends to allow wgpu to select the optimal platform backend.
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .context("no suitable GPU adapter available")?;

        log::info!("adapter: {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("prism device"),
                required_features: config.required_features,
                required_limits: config.required_limits,
                experimental_features: wgpu::ExperimentalFeatures::disabled(),
                memory_hints: wgpu::MemoryHints::Performance,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create wgpu device/queue")?;

        let lost = Arc::new(AtomicBool::new(false));
        {
            let flag = Arc::clone(&lost);
            device.set_device_lost_callback(move |reason, message| {
                // Dropping the device on shutdown also fires this callback;
                // only an unexpected loss marks the session unusable.
                if !matches!(reason, wgpu::DeviceLostReason::Destroyed) {
                    log::error!("GPU device lost ({reason:?}): {message}");
                    flag.store(true, Ordering::SeqCst);
                }
            });
        }

        // Shader and layout creation report through validation scopes so a
        // broken shader surfaces as an error instead of an uncaptured panic.
        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("prism triangle shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/triangle.wgsl").into()),
        });

        if let Some(err) = scope.pop().await {
            anyhow::bail!("triangle shader failed to compile: {err}");
        }

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("prism viewport bgl"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(
                            std::mem::size_of::<ViewportUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("prism pipeline layout"),
            bind_group_layouts: &[&bind_group_layout],
            immediate_size: 0,
        });

        if let Some(err) = scope.pop().await {
            anyhow::bail!("pipeline layout build failed: {err}");
        }

        Ok(Session {
            pipeline: None,
            pipeline_format: None,
            pipeline_layout,
            bind_group_layout,
            shader,
            queue,
            device,
            adapter,
            instance,
            lost,
        })
    }

    /// True once the backend has reported the device as unusable.
    ///
    /// There is no partial-loss state; a lost session is only good for drop.
    pub fn is_device_lost(&self) -> bool {
        self.lost.load(Ordering::SeqCst)
    }

    pub fn instance(&self) -> &wgpu::Instance {
        &self.instance
    }

    pub fn adapter(&self) -> &wgpu::Adapter {
        &self.adapter
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Builds (or rebuilds) the triangle pipeline for `format`.
    ///
    /// The pipeline is cached per target format; switching between a presented
    /// surface and an offscreen texture with different formats rebuilds it.
    pub fn ensure_pipeline(&mut self, format: wgpu::TextureFormat) {
        if self.pipeline_format == Some(format) && self.pipeline.is_some() {
            return;
        }

        let pipeline = self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("prism triangle pipeline"),
                layout: Some(&self.pipeline_layout),

                vertex: wgpu::VertexState {
                    module: &self.shader,
                    entry_point: Some("vs_main"),
                    compilation_options: Default::default(),
                    buffers: &[Vertex::layout()],
                },

                fragment: Some(wgpu::FragmentState {
                    module: &self.shader,
                    entry_point: Some("fs_main"),
                    compilation_options: Default::default(),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                }),

                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    strip_index_format: None,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode: None,
                    polygon_mode: wgpu::PolygonMode::Fill,
                    unclipped_depth: false,
                    conservative: false,
                },

                depth_stencil: None,
                multisample: wgpu::MultisampleState::default(),

                multiview_mask: None,
                cache: None,
            });

        self.pipeline = Some(pipeline);
        self.pipeline_format = Some(format);
    }

    /// Returns the cached pipeline for `format`, if `ensure_pipeline` built it.
    pub fn pipeline(&self, format: wgpu::TextureFormat) -> Option<&wgpu::RenderPipeline> {
        if self.pipeline_format == Some(format) {
            self.pipeline.as_ref()
        } else {
            None
        }
    }
}
