use std::time::{Duration, Instant};

use effects::{BoxedTimeSource, FixedTimeSource, SystemTimeSource};

/// High-level behaviour requested by the caller.
///
/// Animate runs the render loop continuously, optionally clamping the frame
/// rate; Still evaluates every card once at a fixed timestamp and then only
/// repaints on damage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderPolicy {
    Animate { target_fps: Option<f32> },
    Still { time: f32 },
}

impl Default for RenderPolicy {
    fn default() -> Self {
        Self::Animate { target_fps: None }
    }
}

impl RenderPolicy {
    /// Fixed timestamp override, if this policy has one.
    pub fn time_override(&self) -> Option<f32> {
        match self {
            RenderPolicy::Animate { .. } => None,
            RenderPolicy::Still { time } => Some(*time),
        }
    }

    pub fn is_animated(&self) -> bool {
        matches!(self, RenderPolicy::Animate { .. })
    }
}

/// Builds a time source suited to the requested render policy.
pub fn time_source_for_policy(policy: &RenderPolicy) -> BoxedTimeSource {
    match policy {
        RenderPolicy::Animate { .. } => Box::new(SystemTimeSource::new()),
        RenderPolicy::Still { time } => Box::new(FixedTimeSource::new(*time)),
    }
}

/// Decides when the next frame may be presented.
///
/// With no FPS cap every redraw request is honoured immediately; with a cap
/// the scheduler spaces frames on a fixed grid and exposes the deadline the
/// event loop should park on.
#[derive(Debug)]
pub struct FrameScheduler {
    frame_budget: Option<Duration>,
    next_frame: Option<Instant>,
    still: bool,
    rendered_once: bool,
}

impl FrameScheduler {
    pub fn new(policy: RenderPolicy) -> Self {
        let frame_budget = match policy {
            RenderPolicy::Animate { target_fps } => target_fps
                .filter(|fps| *fps > 0.0)
                .map(|fps| Duration::from_secs_f32(1.0 / fps)),
            RenderPolicy::Still { .. } => None,
        };
        Self {
            frame_budget,
            next_frame: None,
            still: !policy.is_animated(),
            rendered_once: false,
        }
    }

    pub fn ready_for_frame(&self, now: Instant) -> bool {
        if self.still {
            return !self.rendered_once;
        }
        match self.next_frame {
            Some(deadline) => now >= deadline,
            None => true,
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        if self.still {
            return None;
        }
        self.next_frame
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.rendered_once = true;
        self.next_frame = self.frame_budget.map(|budget| now + budget);
    }
}
