use std::time::Instant;

/// Time values handed to the render path for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeSample {
    /// Seconds the source reports for this frame.
    pub seconds: f32,
    /// How many samples this source has produced before this one.
    pub frame_index: u64,
}

/// Where per-frame time comes from.
///
/// An animated gallery advances with the monotonic clock; a still render
/// freezes every card at one timestamp. Keeping the choice behind this seam
/// means nothing downstream ever reads `Instant::now` for shader time.
pub trait TimeSource: Send {
    fn sample(&mut self) -> TimeSample;
}

/// Monotonic clock with its origin fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    started: Instant,
    frames: u64,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self {
            started: Instant::now(),
            frames: 0,
        }
    }
}

impl TimeSource for SystemTimeSource {
    fn sample(&mut self) -> TimeSample {
        let frame_index = self.frames;
        self.frames += 1;
        TimeSample {
            seconds: self.started.elapsed().as_secs_f32(),
            frame_index,
        }
    }
}

/// Reports one frozen timestamp forever; frame zero, every frame.
#[derive(Debug, Clone, Copy)]
pub struct FixedTimeSource {
    seconds: f32,
}

impl FixedTimeSource {
    pub fn new(seconds: f32) -> Self {
        Self { seconds }
    }
}

impl TimeSource for FixedTimeSource {
    fn sample(&mut self) -> TimeSample {
        TimeSample {
            seconds: self.seconds,
            frame_index: 0,
        }
    }
}

pub type BoxedTimeSource = Box<dyn TimeSource + Send>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_source_advances_frames_monotonically() {
        let mut source = SystemTimeSource::new();
        let first = source.sample();
        let second = source.sample();
        assert_eq!(first.frame_index, 0);
        assert_eq!(second.frame_index, 1);
        assert!(second.seconds >= first.seconds);
    }

    #[test]
    fn fixed_source_never_moves() {
        let mut source = FixedTimeSource::new(4.5);
        for _ in 0..3 {
            let sample = source.sample();
            assert_eq!(sample.seconds, 4.5);
            assert_eq!(sample.frame_index, 0);
        }
    }

    #[test]
    fn sources_expose_exactly_the_sampling_surface() {
        // Both sources are interchangeable behind the boxed seam.
        let sources: [BoxedTimeSource; 2] = [
            Box::new(SystemTimeSource::new()),
            Box::new(FixedTimeSource::new(0.0)),
        ];
        for mut source in sources {
            let sample = source.sample();
            assert_eq!(sample.frame_index, 0);
            assert!(sample.seconds >= 0.0);
        }
    }
}
