use std::borrow::Cow;

use effects::EffectKind;

/// All compiled pipelines plus the layouts and sampler they share.
///
/// Every effect pass renders a fullscreen triangle into an offscreen target;
/// the composite pass places a rect-mapped quad onto the swapchain with
/// premultiplied-alpha blending.
pub(crate) struct EffectPipelines {
    pub uniform_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pub sampler: wgpu::Sampler,
    pub blit: wgpu::RenderPipeline,
    pub composite: wgpu::RenderPipeline,
    effects: [wgpu::RenderPipeline; 6],
}

fn shader_module(device: &wgpu::Device, label: &str, source: &'static str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    })
}

impl EffectPipelines {
    pub(crate) fn new(
        device: &wgpu::Device,
        offscreen_format: wgpu::TextureFormat,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("uniform layout"),
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

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("pass source layout"),
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

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("pass sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("effect pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            push_constant_ranges: &[],
        });

        let fullscreen = shader_module(
            device,
            "fullscreen vertex",
            include_str!("shaders/fullscreen.wgsl"),
        );

        let mut build_effect = |label: &str, source: &'static str| {
            let module = shader_module(device, label, source);
            create_pipeline(
                device,
                label,
                &pipeline_layout,
                &fullscreen,
                &module,
                offscreen_format,
                None,
            )
        };

        let blit = build_effect("blit", include_str!("shaders/blit.wgsl"));
        let effects = [
            build_effect("pattern", include_str!("shaders/pattern.wgsl")),
            build_effect("noise", include_str!("shaders/noise.wgsl")),
            build_effect("emboss", include_str!("shaders/emboss.wgsl")),
            build_effect("pixellate", include_str!("shaders/pixellate.wgsl")),
            build_effect("complex wave", include_str!("shaders/complex_wave.wgsl")),
            build_effect("simple wave", include_str!("shaders/simple_wave.wgsl")),
        ];

        let composite_module = shader_module(
            device,
            "composite",
            include_str!("shaders/composite.wgsl"),
        );
        let composite = create_pipeline(
            device,
            "composite",
            &pipeline_layout,
            &composite_module,
            &composite_module,
            surface_format,
            Some(wgpu::BlendState {
                color: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                    operation: wgpu::BlendOperation::Add,
                },
                alpha: wgpu::BlendComponent {
                    src_factor: wgpu::BlendFactor::One,
                    dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
                    operation: wgpu::BlendOperation::Add,
                },
            }),
        );

        Self {
            uniform_layout,
            texture_layout,
            sampler,
            blit,
            composite,
            effects,
        }
    }

    /// Pipeline for one effect pass, indexed in composition order.
    pub(crate) fn for_kind(&self, kind: EffectKind) -> &wgpu::RenderPipeline {
        let index = match kind {
            EffectKind::Pattern => 0,
            EffectKind::Noise => 1,
            EffectKind::Emboss => 2,
            EffectKind::Pixellate => 3,
            EffectKind::ComplexWave => 4,
            EffectKind::SimpleWave => 5,
        };
        &self.effects[index]
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::PipelineLayout,
    vertex_module: &wgpu::ShaderModule,
    fragment_module: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: vertex_module,
            entry_point: Some("vs_main"),
            buffers: &[],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
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
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment_module,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview: None,
        cache: None,
    })
}
