//! Pure state and planning core for the Deckshade card gallery.
//!
//! Nothing in this crate touches the GPU or the window system. Each frame the
//! application samples input state (effect flags, oscillator value, elapsed
//! time, viewport size) and asks [`ChainPlan::build`] for the ordered list of
//! shader passes to run; the `renderer` crate executes that plan. The split
//! keeps every state transition a total function that unit tests can drive
//! with plain clocks and no device.

mod card;
mod chain;
mod clock;
mod flags;
mod gallery;
mod oscillator;
mod timer;

pub use card::{Card, ImageSource};
pub use chain::{
    ChainInputs, ChainPlan, EffectPass, COMPLEX_WAVE_AMPLITUDE, COMPLEX_WAVE_FREQUENCY,
    COMPLEX_WAVE_SPEED, NOISE_OPACITY,
};
pub use clock::{BoxedTimeSource, FixedTimeSource, SystemTimeSource, TimeSample, TimeSource};
pub use flags::{EffectFlags, EffectKind};
pub use gallery::{CardRect, CardState, Gallery, GalleryError, Viewport, CARD_MARGIN, CARD_SPACING};
pub use oscillator::{Oscillator, OSCILLATOR_MAX, OSCILLATOR_MIN};
pub use timer::{TickTimer, OSCILLATOR_INTERVAL, PULSE_INTERVAL};
