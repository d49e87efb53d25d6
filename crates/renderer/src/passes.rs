use std::time::Instant;

use anyhow::Result;
use raw_window_handle::{HasDisplayHandle, HasWindowHandle};
use wgpu::util::{BufferInitDescriptor, DeviceExt, TextureDataOrder};
use winit::dpi::PhysicalSize;

use effects::{CardState, EffectPass, Gallery, CARD_MARGIN};

use crate::cardimage::resolve_card_pixels;
use crate::context::GpuContext;
use crate::pipeline::EffectPipelines;
use crate::uniforms::EffectUniforms;

/// Intermediate effect passes render into plain RGBA targets regardless of
/// the swapchain format.
const OFFSCREEN_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

const BACKGROUND: wgpu::Color = wgpu::Color {
    r: 0.015,
    g: 0.015,
    b: 0.03,
    a: 1.0,
};

struct CardTexture {
    _texture: wgpu::Texture,
    bind_group: wgpu::BindGroup,
}

struct PassTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

/// Owns every GPU resource for the gallery and turns per-card chain plans
/// into encoded render passes.
///
/// Per frame, each visible card is blitted from its source texture into a
/// ping-pong pair, every planned pass consumes the output of the one before
/// it, and the final image is composited into the card's gallery rectangle.
pub(crate) struct SceneRenderer {
    context: GpuContext,
    pipelines: EffectPipelines,
    uniform_buffer: wgpu::Buffer,
    uniform_bind_group: wgpu::BindGroup,
    uniforms: EffectUniforms,
    cards: Vec<CardTexture>,
    ping: Option<[PassTarget; 2]>,
}

impl SceneRenderer {
    pub(crate) fn new<T>(
        target: &T,
        initial_size: PhysicalSize<u32>,
        cards: &[CardState],
    ) -> Result<Self>
    where
        T: HasDisplayHandle + HasWindowHandle,
    {
        let context = GpuContext::new(target, initial_size)?;
        let pipelines =
            EffectPipelines::new(&context.device, OFFSCREEN_FORMAT, context.surface_format);

        let uniform_buffer = context.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("effect uniforms"),
            size: std::mem::size_of::<EffectUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let uniform_bind_group = context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("effect uniform bind group"),
                layout: &pipelines.uniform_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: uniform_buffer.as_entire_binding(),
                }],
            });

        let cards = cards
            .iter()
            .map(|state| upload_card_texture(&context, &pipelines, state))
            .collect();

        let uniforms = EffectUniforms::new(initial_size.width, initial_size.height);
        Ok(Self {
            context,
            pipelines,
            uniform_buffer,
            uniform_bind_group,
            uniforms,
            cards,
            ping: None,
        })
    }

    pub(crate) fn size(&self) -> PhysicalSize<u32> {
        self.context.size
    }

    pub(crate) fn resize(&mut self, new_size: PhysicalSize<u32>) {
        self.context.resize(new_size);
    }

    pub(crate) fn render(
        &mut self,
        gallery: &Gallery,
        time_override: Option<f32>,
        now: Instant,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = self.context.surface.get_current_texture()?;
        let frame_view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let viewport = gallery.viewport();
        let (viewport_w, viewport_h) = viewport.as_f32();
        let card_rect = gallery.card_rect(0);
        let card_size = (
            card_rect.width.round().max(1.0) as u32,
            card_rect.height.round().max(1.0) as u32,
        );
        self.ensure_pass_targets(card_size);

        let mut encoder =
            self.context
                .device
                .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                    label: Some("gallery encoder"),
                });

        // Background clear before any card draws over it.
        drop(encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("background"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(BACKGROUND),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        }));

        for index in 0..gallery.len() {
            let rect = gallery.card_rect(index);
            let visible = rect.x + rect.width > -CARD_MARGIN && rect.x < viewport_w + CARD_MARGIN;
            if !visible {
                continue;
            }

            let card = &gallery.cards()[index];
            let time = time_override.unwrap_or_else(|| card.elapsed_secs(now));
            let plan = card.plan(viewport, time);

            self.uniforms = EffectUniforms::new(card_size.0, card_size.1);
            self.uniforms.set_viewport(viewport_w, viewport_h);
            self.uniforms.set_time(time);
            self.uniforms.set_number(card.oscillator.as_param());

            // Base image into the first intermediate.
            let mut current = 0;
            self.encode_card_pass(
                &mut encoder,
                PassKindRef::Blit(index),
                current,
            );

            for pass in plan.passes() {
                self.apply_pass_uniforms(pass);
                self.encode_card_pass(&mut encoder, PassKindRef::Effect(*pass, current), 1 - current);
                current = 1 - current;
            }

            // Place the finished card on the swapchain.
            self.uniforms.set_rect(rect.x, rect.y, rect.width, rect.height);
            self.uniforms.set_pulse(gallery.pulse());
            self.encode_composite(&mut encoder, &frame_view, current);
        }

        self.context.queue.submit(std::iter::once(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn apply_pass_uniforms(&mut self, pass: &EffectPass) {
        self.uniforms.set_opacity(1.0);
        self.uniforms.clear_wave_params();
        match *pass {
            EffectPass::Pattern { time } => {
                self.uniforms.set_time(time);
            }
            EffectPass::Noise { time, opacity } => {
                self.uniforms.set_time(time);
                self.uniforms.set_opacity(opacity);
            }
            EffectPass::Emboss { strength } | EffectPass::Pixellate { strength } => {
                self.uniforms.set_number(strength);
            }
            EffectPass::ComplexWave {
                time,
                size,
                speed,
                frequency,
                amplitude,
            } => {
                self.uniforms.set_time(time);
                self.uniforms.set_viewport(size.0, size.1);
                self.uniforms.set_wave_params(speed, frequency, amplitude);
            }
            EffectPass::SimpleWave { time } => {
                self.uniforms.set_time(time);
            }
        }
    }

    /// Uploads the current uniforms through a staging copy so every pass in
    /// the encoder sees its own values, then encodes one draw.
    fn encode_card_pass(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        source: PassKindRef,
        target_index: usize,
    ) {
        let Some(ping) = self.ping.as_ref() else {
            return;
        };
        let (pipeline, source_bind) = match source {
            PassKindRef::Blit(card_index) => {
                (&self.pipelines.blit, &self.cards[card_index].bind_group)
            }
            PassKindRef::Effect(pass, source_index) => (
                self.pipelines.for_kind(pass.kind()),
                &ping[source_index].bind_group,
            ),
        };

        self.stage_uniforms(encoder);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("card pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &ping[target_index].view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_pipeline(pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, source_bind, &[]);
        render_pass.draw(0..3, 0..1);
    }

    fn encode_composite(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        frame_view: &wgpu::TextureView,
        source_index: usize,
    ) {
        let Some(ping) = self.ping.as_ref() else {
            return;
        };
        self.stage_uniforms(encoder);

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("composite pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: frame_view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            occlusion_query_set: None,
            timestamp_writes: None,
        });
        render_pass.set_pipeline(&self.pipelines.composite);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &ping[source_index].bind_group, &[]);
        render_pass.draw(0..6, 0..1);
    }

    fn stage_uniforms(&self, encoder: &mut wgpu::CommandEncoder) {
        let staging = self.context.device.create_buffer_init(&BufferInitDescriptor {
            label: Some("uniform staging"),
            contents: bytemuck::bytes_of(&self.uniforms),
            usage: wgpu::BufferUsages::COPY_SRC,
        });
        encoder.copy_buffer_to_buffer(
            &staging,
            0,
            &self.uniform_buffer,
            0,
            std::mem::size_of::<EffectUniforms>() as u64,
        );
    }

    fn ensure_pass_targets(&mut self, size: (u32, u32)) {
        let stale = match &self.ping {
            Some([first, _]) => first.size != size,
            None => true,
        };
        if stale {
            self.ping = Some([
                self.create_pass_target(size),
                self.create_pass_target(size),
            ]);
        }
    }

    fn create_pass_target(&self, size: (u32, u32)) -> PassTarget {
        let texture = self.context.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("card pass target"),
            size: wgpu::Extent3d {
                width: size.0.max(1),
                height: size.1.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: OFFSCREEN_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = self
            .context
            .device
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("card pass source"),
                layout: &self.pipelines.texture_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.pipelines.sampler),
                    },
                ],
            });
        PassTarget {
            _texture: texture,
            view,
            bind_group,
            size,
        }
    }
}

#[derive(Clone, Copy)]
enum PassKindRef {
    /// Copy a card's source image into a pass target.
    Blit(usize),
    /// Run one effect pass, reading the given ping-pong slot.
    Effect(EffectPass, usize),
}

fn upload_card_texture(
    context: &GpuContext,
    pipelines: &EffectPipelines,
    state: &CardState,
) -> CardTexture {
    let pixels = resolve_card_pixels(&state.card);
    let texture = context.device.create_texture_with_data(
        &context.queue,
        &wgpu::TextureDescriptor {
            label: Some("card image"),
            size: wgpu::Extent3d {
                width: pixels.width,
                height: pixels.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        TextureDataOrder::LayerMajor,
        &pixels.data,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
    let bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("card image bind group"),
        layout: &pipelines.texture_layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(&pipelines.sampler),
            },
        ],
    });
    CardTexture {
        _texture: texture,
        bind_group,
    }
}
