use bytemuck::{Pod, Zeroable};

/// Uniform block shared by every effect, blit, and composite pipeline.
///
/// Layout matches the WGSL declaration in `shaders/`: four vec4 slots, 64
/// bytes, 16-byte aligned. `params` carries the wave tuning constants
/// (speed, frequency, amplitude) and is zero for the other passes.
#[repr(C, align(16))]
#[derive(Clone, Copy)]
pub(crate) struct EffectUniforms {
    /// xy = render target size, zw = published viewport size (pixels).
    pub resolution: [f32; 4],
    /// Bounding rectangle of the target quad: x, y, width, height (pixels).
    pub rect: [f32; 4],
    /// x = elapsed seconds, y = oscillator value, z = opacity, w = pulse.
    pub state: [f32; 4],
    /// x = wave speed, y = wave frequency, z = wave amplitude (pixels).
    pub params: [f32; 4],
}

unsafe impl Zeroable for EffectUniforms {}
unsafe impl Pod for EffectUniforms {}

impl EffectUniforms {
    pub fn new(width: u32, height: u32) -> Self {
        let w = width.max(1) as f32;
        let h = height.max(1) as f32;
        Self {
            resolution: [w, h, w, h],
            rect: [0.0, 0.0, w, h],
            state: [0.0, 0.0, 1.0, 0.0],
            params: [0.0; 4],
        }
    }

    pub fn set_viewport(&mut self, width: f32, height: f32) {
        self.resolution[2] = width.max(1.0);
        self.resolution[3] = height.max(1.0);
    }

    pub fn set_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        self.rect = [x, y, width, height];
    }

    pub fn set_time(&mut self, seconds: f32) {
        self.state[0] = seconds;
    }

    pub fn set_number(&mut self, number: f32) {
        self.state[1] = number;
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.state[2] = opacity;
    }

    pub fn set_pulse(&mut self, pulse: bool) {
        self.state[3] = if pulse { 1.0 } else { 0.0 };
    }

    pub fn set_wave_params(&mut self, speed: f32, frequency: f32, amplitude: f32) {
        self.params = [speed, frequency, amplitude, 0.0];
    }

    pub fn clear_wave_params(&mut self) {
        self.params = [0.0; 4];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_matches_the_wgsl_layout() {
        assert_eq!(std::mem::size_of::<EffectUniforms>(), 64);
        assert_eq!(std::mem::align_of::<EffectUniforms>(), 16);
    }

    #[test]
    fn new_targets_degenerate_sizes_safely() {
        let uniforms = EffectUniforms::new(0, 0);
        assert_eq!(uniforms.resolution, [1.0, 1.0, 1.0, 1.0]);
        assert_eq!(uniforms.state[2], 1.0, "opacity defaults to fully visible");
    }

    #[test]
    fn setters_write_the_documented_slots() {
        let mut uniforms = EffectUniforms::new(100, 100);
        uniforms.set_time(2.5);
        uniforms.set_number(7.0);
        uniforms.set_pulse(true);
        uniforms.set_wave_params(0.5, 8.0, 10.0);
        assert_eq!(uniforms.state[0], 2.5);
        assert_eq!(uniforms.state[1], 7.0);
        assert_eq!(uniforms.state[3], 1.0);
        assert_eq!(uniforms.params, [0.5, 8.0, 10.0, 0.0]);
    }
}
