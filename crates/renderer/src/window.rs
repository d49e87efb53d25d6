use std::sync::Arc;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, Event, MouseButton, MouseScrollDelta, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::{Window, WindowBuilder};

use effects::{
    EffectKind, Gallery, TickTimer, Viewport, OSCILLATOR_INTERVAL, PULSE_INTERVAL,
};

use crate::passes::SceneRenderer;
use crate::runtime::{time_source_for_policy, FrameScheduler, RenderPolicy};
use crate::RendererConfig;

/// Pixels of horizontal scroll per mouse-wheel line.
const SCROLL_LINE_STEP: f32 = 40.0;

/// Opens the gallery window and blocks on its event loop until the user
/// closes it.
pub fn run_gallery(config: RendererConfig, mut gallery: Gallery) -> Result<()> {
    let event_loop = EventLoop::new().context("failed to create event loop")?;
    let window_size = PhysicalSize::new(config.surface_size.0, config.surface_size.1);
    let window = WindowBuilder::new()
        .with_title(&config.title)
        .with_inner_size(window_size)
        .build(&event_loop)
        .map_err(|err| anyhow!("failed to create gallery window: {err}"))?;
    let window = Arc::new(window);

    let inner = window.inner_size();
    gallery.set_viewport(Viewport::new(inner.width, inner.height));

    let mut renderer = SceneRenderer::new(window.as_ref(), inner, gallery.cards())
        .context("failed to initialise gallery renderer")?;

    let policy = config.policy;
    let mut scheduler = FrameScheduler::new(policy);
    let mut time_source = time_source_for_policy(&policy);

    let start = Instant::now();
    let mut timers = if policy.is_animated() {
        Some((
            TickTimer::new(OSCILLATOR_INTERVAL, start),
            TickTimer::new(PULSE_INTERVAL, start),
        ))
    } else {
        None
    };

    let mut cursor: Option<PhysicalPosition<f64>> = None;
    apply_window_title(&window, &config.title, &gallery);
    window.request_redraw();

    let mut result = Ok(());
    let run_result = event_loop.run(move |event, elwt| {
        match event {
            Event::WindowEvent { window_id, event } if window_id == window.id() => match event {
                WindowEvent::CloseRequested | WindowEvent::Destroyed => {
                    elwt.exit();
                }
                WindowEvent::Resized(new_size) => {
                    renderer.resize(new_size);
                    gallery.set_viewport(Viewport::new(new_size.width, new_size.height));
                    window.request_redraw();
                }
                WindowEvent::ScaleFactorChanged {
                    mut inner_size_writer,
                    ..
                } => {
                    let _ = inner_size_writer.request_inner_size(renderer.size());
                }
                WindowEvent::KeyboardInput { event, .. } => {
                    if event.state == ElementState::Pressed && !event.repeat {
                        handle_key(&event.logical_key, &mut gallery, &window, &config.title, elwt);
                    }
                }
                WindowEvent::CursorMoved { position, .. } => {
                    cursor = Some(position);
                }
                WindowEvent::MouseWheel { delta, .. } => {
                    let amount = match delta {
                        MouseScrollDelta::LineDelta(x, y) => {
                            let dominant = if x.abs() > y.abs() { x } else { y };
                            -dominant * SCROLL_LINE_STEP
                        }
                        MouseScrollDelta::PixelDelta(pos) => {
                            let dominant = if pos.x.abs() > pos.y.abs() { pos.x } else { pos.y };
                            -dominant as f32
                        }
                    };
                    gallery.scroll_by(amount);
                    apply_window_title(&window, &config.title, &gallery);
                    window.request_redraw();
                }
                WindowEvent::MouseInput {
                    state: button_state,
                    button: MouseButton::Left,
                    ..
                } => {
                    if button_state == ElementState::Pressed {
                        if let Some(position) = cursor {
                            let (x, y) = (position.x as f32, position.y as f32);
                            if let Some(index) = gallery.card_at(x, y) {
                                if gallery.image_rect(index).contains(x, y) {
                                    gallery.cards_mut()[index].flags.toggle(EffectKind::Noise);
                                    window.request_redraw();
                                }
                            }
                        }
                    }
                }
                WindowEvent::RedrawRequested => {
                    let now = Instant::now();
                    let sample = time_source.sample();
                    match renderer.render(&gallery, policy.time_override(), now) {
                        Ok(()) => {
                            tracing::trace!(frame = sample.frame_index, "presented frame");
                            scheduler.mark_rendered(now);
                        }
                        Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                            renderer.resize(renderer.size());
                        }
                        Err(wgpu::SurfaceError::OutOfMemory) => {
                            tracing::error!("surface out of memory; exiting gallery");
                            elwt.exit();
                        }
                        Err(wgpu::SurfaceError::Timeout) => {
                            tracing::warn!("surface timeout; retrying next frame");
                        }
                        Err(other) => {
                            tracing::warn!(error = ?other, "surface error; retrying next frame");
                        }
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                let now = Instant::now();
                if let Some((oscillator_timer, pulse_timer)) = timers.as_mut() {
                    let oscillator_ticks = oscillator_timer.fire_due(now);
                    let mut dirty = false;
                    for _ in 0..oscillator_ticks {
                        dirty |= gallery.tick_oscillators();
                    }
                    let pulse_ticks = pulse_timer.fire_due(now);
                    for _ in 0..pulse_ticks {
                        gallery.toggle_pulse();
                        dirty = true;
                    }
                    if dirty {
                        window.request_redraw();
                    }
                }

                if scheduler.ready_for_frame(now) {
                    window.request_redraw();
                    elwt.set_control_flow(ControlFlow::Wait);
                } else {
                    let mut deadline = scheduler.next_deadline();
                    if let Some((oscillator_timer, pulse_timer)) = timers.as_ref() {
                        for timer_deadline in
                            [oscillator_timer.next_deadline(), pulse_timer.next_deadline()]
                        {
                            deadline = Some(match deadline {
                                Some(existing) => existing.min(timer_deadline),
                                None => timer_deadline,
                            });
                        }
                    }
                    match deadline {
                        Some(deadline) => elwt.set_control_flow(ControlFlow::WaitUntil(deadline)),
                        None => elwt.set_control_flow(ControlFlow::Wait),
                    }
                }
            }
            _ => {}
        }
    });

    if let Err(err) = run_result {
        result = Err(anyhow!("gallery event loop error: {err}"));
    }
    result
}

fn handle_key(
    key: &Key,
    gallery: &mut Gallery,
    window: &Window,
    base_title: &str,
    elwt: &winit::event_loop::EventLoopWindowTarget<()>,
) {
    match key {
        Key::Named(NamedKey::Escape) => {
            elwt.exit();
        }
        Key::Named(NamedKey::ArrowRight) => {
            gallery.focus_next();
            apply_window_title(window, base_title, gallery);
            window.request_redraw();
        }
        Key::Named(NamedKey::ArrowLeft) => {
            gallery.focus_prev();
            apply_window_title(window, base_title, gallery);
            window.request_redraw();
        }
        Key::Character(value) => {
            let kind = match value.as_str() {
                "1" => Some(EffectKind::Pattern),
                "2" => Some(EffectKind::Noise),
                "3" => Some(EffectKind::Emboss),
                "4" => Some(EffectKind::Pixellate),
                "5" => Some(EffectKind::SimpleWave),
                "6" => Some(EffectKind::ComplexWave),
                _ => None,
            };
            if let Some(kind) = kind {
                gallery.focused_card_mut().flags.toggle(kind);
                window.request_redraw();
            }
        }
        _ => {}
    }
}

fn apply_window_title(window: &Window, base_title: &str, gallery: &Gallery) {
    let focused = &gallery.cards()[gallery.focused()].card;
    window.set_title(&format!("{base_title} :: {}", focused.title));
}
