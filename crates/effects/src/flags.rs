/// The six visual effects a card can enable independently.
///
/// The discriminant order matches the fixed composition order used by
/// [`crate::ChainPlan`]: pattern first (applied directly to the image),
/// simple wave last (outermost wrap of the whole card view).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Pattern,
    Noise,
    Emboss,
    Pixellate,
    ComplexWave,
    SimpleWave,
}

impl EffectKind {
    /// All effects in composition order.
    pub const ALL: [EffectKind; 6] = [
        EffectKind::Pattern,
        EffectKind::Noise,
        EffectKind::Emboss,
        EffectKind::Pixellate,
        EffectKind::ComplexWave,
        EffectKind::SimpleWave,
    ];
}

impl std::fmt::Display for EffectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EffectKind::Pattern => f.write_str("pattern"),
            EffectKind::Noise => f.write_str("noise"),
            EffectKind::Emboss => f.write_str("emboss"),
            EffectKind::Pixellate => f.write_str("pixellate"),
            EffectKind::ComplexWave => f.write_str("complex-wave"),
            EffectKind::SimpleWave => f.write_str("simple-wave"),
        }
    }
}

/// One boolean per effect, all independent; any subset may be set at once.
///
/// Owned exclusively by one card's state and mutated only by that card's
/// input handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EffectFlags {
    pub pattern: bool,
    pub noise: bool,
    pub emboss: bool,
    pub pixellate: bool,
    pub complex_wave: bool,
    pub simple_wave: bool,
}

impl EffectFlags {
    /// All effects disabled; the chain built from this is the identity.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_enabled(&self, kind: EffectKind) -> bool {
        match kind {
            EffectKind::Pattern => self.pattern,
            EffectKind::Noise => self.noise,
            EffectKind::Emboss => self.emboss,
            EffectKind::Pixellate => self.pixellate,
            EffectKind::ComplexWave => self.complex_wave,
            EffectKind::SimpleWave => self.simple_wave,
        }
    }

    /// Flips one flag, leaving the other five untouched.
    pub fn toggle(&mut self, kind: EffectKind) {
        let slot = match kind {
            EffectKind::Pattern => &mut self.pattern,
            EffectKind::Noise => &mut self.noise,
            EffectKind::Emboss => &mut self.emboss,
            EffectKind::Pixellate => &mut self.pixellate,
            EffectKind::ComplexWave => &mut self.complex_wave,
            EffectKind::SimpleWave => &mut self.simple_wave,
        };
        *slot = !*slot;
    }

    /// The oscillator only advances while one of its consumers is enabled.
    pub fn drives_oscillator(&self) -> bool {
        self.emboss || self.pixellate
    }

    pub fn enabled_count(&self) -> usize {
        EffectKind::ALL
            .iter()
            .filter(|kind| self.is_enabled(**kind))
            .count()
    }
}
