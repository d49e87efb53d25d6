use crate::flags::{EffectFlags, EffectKind};

/// Tuning constants for the complex wave, fixed by the effect's design.
pub const COMPLEX_WAVE_SPEED: f32 = 0.5;
pub const COMPLEX_WAVE_FREQUENCY: f32 = 8.0;
pub const COMPLEX_WAVE_AMPLITUDE: f32 = 10.0;

/// The noise overlay always blends at full strength while enabled.
pub const NOISE_OPACITY: f32 = 1.0;

/// Per-frame values sampled once and shared by every stage of a card's chain.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChainInputs {
    /// Seconds elapsed since the card was created.
    pub time: f32,
    /// Latest published viewport size in physical pixels.
    pub size: (f32, f32),
    /// Current oscillator value.
    pub number: f32,
}

/// One fully parameterised shader pass, ready for the renderer to execute.
///
/// The variants carry exactly the uniform values each effect consumes; the
/// implicit bounding rectangle (the card's image quad for the first four, the
/// whole card view for the waves) is supplied by the renderer at encode time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectPass {
    /// Color remap keyed on elapsed time.
    Pattern { time: f32 },
    /// Separate layer blended over the image with "overlay" semantics.
    Noise { time: f32, opacity: f32 },
    /// Layer effect whose relief depth follows the oscillator.
    Emboss { strength: f32 },
    /// Layer effect whose block size follows the oscillator.
    Pixellate { strength: f32 },
    /// Distortion of the whole card view, shaped by the viewport size.
    ComplexWave {
        time: f32,
        size: (f32, f32),
        speed: f32,
        frequency: f32,
        amplitude: f32,
    },
    /// Distortion of the whole card view, time only.
    SimpleWave { time: f32 },
}

impl EffectPass {
    pub fn kind(&self) -> EffectKind {
        match self {
            EffectPass::Pattern { .. } => EffectKind::Pattern,
            EffectPass::Noise { .. } => EffectKind::Noise,
            EffectPass::Emboss { .. } => EffectKind::Emboss,
            EffectPass::Pixellate { .. } => EffectKind::Pixellate,
            EffectPass::ComplexWave { .. } => EffectKind::ComplexWave,
            EffectPass::SimpleWave { .. } => EffectKind::SimpleWave,
        }
    }

}

type StageBuilder = fn(ChainInputs) -> EffectPass;

/// Fixed, non-reorderable stage table, innermost effect first.
///
/// Later stages operate on the output of earlier ones, so this order is part
/// of the visual contract: pattern and noise touch the image, emboss and
/// pixellate wrap the composited layer, and the waves wrap the whole view
/// with simple-wave outermost. A disabled stage contributes nothing — the
/// identity — rather than branching inside the renderer.
const STAGES: [(EffectKind, StageBuilder); 6] = [
    (EffectKind::Pattern, |inputs| EffectPass::Pattern {
        time: inputs.time,
    }),
    (EffectKind::Noise, |inputs| EffectPass::Noise {
        time: inputs.time,
        opacity: NOISE_OPACITY,
    }),
    (EffectKind::Emboss, |inputs| EffectPass::Emboss {
        strength: inputs.number,
    }),
    (EffectKind::Pixellate, |inputs| EffectPass::Pixellate {
        strength: inputs.number,
    }),
    (EffectKind::ComplexWave, |inputs| EffectPass::ComplexWave {
        time: inputs.time,
        size: inputs.size,
        speed: COMPLEX_WAVE_SPEED,
        frequency: COMPLEX_WAVE_FREQUENCY,
        amplitude: COMPLEX_WAVE_AMPLITUDE,
    }),
    (EffectKind::SimpleWave, |inputs| EffectPass::SimpleWave {
        time: inputs.time,
    }),
];

/// Ordered sequence of passes for one card and one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainPlan {
    passes: Vec<EffectPass>,
}

impl ChainPlan {
    /// Evaluates the stage table left-to-right against the current flags.
    ///
    /// Both wave flags set is legal and emits both distortions, simple-wave
    /// after (outside) complex-wave. That pass-through composition mirrors
    /// the observed behaviour of independent toggles and is preserved on
    /// purpose.
    pub fn build(flags: &EffectFlags, inputs: ChainInputs) -> Self {
        let passes = STAGES
            .iter()
            .filter(|(kind, _)| flags.is_enabled(*kind))
            .map(|(_, build)| build(inputs))
            .collect();
        Self { passes }
    }

    /// Passes in application order, innermost first.
    pub fn passes(&self) -> &[EffectPass] {
        &self.passes
    }

    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// An empty plan leaves the rendered card untouched.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs_at(time: f32) -> ChainInputs {
        ChainInputs {
            time,
            size: (393.0, 852.0),
            number: 4.0,
        }
    }

    #[test]
    fn all_flags_off_is_the_identity_plan() {
        let plan = ChainPlan::build(&EffectFlags::none(), inputs_at(1.5));
        assert!(plan.is_empty());
        assert_eq!(plan.passes(), &[]);
    }

    #[test]
    fn toggling_a_flag_twice_restores_the_identity_plan() {
        for kind in EffectKind::ALL {
            let mut flags = EffectFlags::none();
            flags.toggle(kind);
            flags.toggle(kind);
            let plan = ChainPlan::build(&flags, inputs_at(0.25));
            assert!(plan.is_empty(), "{kind} left residue in the chain");
        }
    }

    #[test]
    fn pattern_only_emits_exactly_one_remap_pass() {
        let mut flags = EffectFlags::none();
        flags.toggle(EffectKind::Pattern);
        let plan = ChainPlan::build(&flags, inputs_at(7.25));
        assert_eq!(plan.passes(), &[EffectPass::Pattern { time: 7.25 }]);
    }

    #[test]
    fn no_wave_flags_means_no_distortion_passes() {
        let mut flags = EffectFlags::none();
        flags.toggle(EffectKind::Pattern);
        flags.toggle(EffectKind::Emboss);
        let plan = ChainPlan::build(&flags, inputs_at(2.0));
        assert!(plan.passes().iter().all(|pass| !matches!(
            pass.kind(),
            EffectKind::ComplexWave | EffectKind::SimpleWave
        )));
    }

    #[test]
    fn both_waves_apply_in_fixed_order_with_expected_parameters() {
        let mut flags = EffectFlags::none();
        flags.toggle(EffectKind::SimpleWave);
        flags.toggle(EffectKind::ComplexWave);
        let plan = ChainPlan::build(&flags, inputs_at(3.0));
        assert_eq!(
            plan.passes(),
            &[
                EffectPass::ComplexWave {
                    time: 3.0,
                    size: (393.0, 852.0),
                    speed: COMPLEX_WAVE_SPEED,
                    frequency: COMPLEX_WAVE_FREQUENCY,
                    amplitude: COMPLEX_WAVE_AMPLITUDE,
                },
                EffectPass::SimpleWave { time: 3.0 },
            ],
            "simple wave must wrap the complex-wave-wrapped view"
        );
    }

    #[test]
    fn full_chain_respects_composition_order() {
        let mut flags = EffectFlags::none();
        for kind in EffectKind::ALL {
            flags.toggle(kind);
        }
        let plan = ChainPlan::build(&flags, inputs_at(1.0));
        let kinds: Vec<_> = plan.passes().iter().map(EffectPass::kind).collect();
        assert_eq!(kinds, EffectKind::ALL);
    }

    #[test]
    fn oscillator_value_parameterises_layer_effects() {
        let mut flags = EffectFlags::none();
        flags.toggle(EffectKind::Emboss);
        flags.toggle(EffectKind::Pixellate);
        let plan = ChainPlan::build(
            &flags,
            ChainInputs {
                time: 0.0,
                size: (100.0, 100.0),
                number: 9.0,
            },
        );
        assert_eq!(
            plan.passes(),
            &[
                EffectPass::Emboss { strength: 9.0 },
                EffectPass::Pixellate { strength: 9.0 },
            ]
        );
    }
}
