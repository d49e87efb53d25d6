use std::time::Instant;

use crate::card::Card;
use crate::chain::{ChainInputs, ChainPlan};
use crate::flags::EffectFlags;
use crate::oscillator::Oscillator;

/// Horizontal padding around the card strip and vertical card inset.
pub const CARD_MARGIN: f32 = 20.0;

/// Gap between neighbouring cards.
pub const CARD_SPACING: f32 = 30.0;

/// Share of a card's height taken by the image (the rest is the overlay).
const IMAGE_SHARE: f32 = 0.6;

#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("a gallery needs at least one card")]
    EmptyDeck,
}

/// Latest published drawing area in physical pixels, last-write-wins.
///
/// Overwritten on every resize notification; every card reads the current
/// value on its next plan, so a change is visible gallery-wide within one
/// redraw pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_f32(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Axis-aligned rectangle in surface pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl CardRect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }
}

/// Mutable presentation state owned by one card instance.
///
/// The flags and oscillator reset only when the gallery is rebuilt; the
/// elapsed-time baseline is captured once at creation and never persisted.
#[derive(Debug, Clone)]
pub struct CardState {
    pub card: Card,
    pub flags: EffectFlags,
    pub oscillator: Oscillator,
    spawned_at: Instant,
}

impl CardState {
    pub fn new(card: Card, now: Instant) -> Self {
        Self {
            card,
            flags: EffectFlags::none(),
            oscillator: Oscillator::new(),
            spawned_at: now,
        }
    }

    /// Seconds since this card was created, computed fresh each redraw.
    pub fn elapsed_secs(&self, now: Instant) -> f32 {
        now.saturating_duration_since(self.spawned_at).as_secs_f32()
    }

    /// Plans this card's effect chain for the given frame time.
    pub fn plan(&self, viewport: Viewport, time: f32) -> ChainPlan {
        ChainPlan::build(
            &self.flags,
            ChainInputs {
                time,
                size: viewport.as_f32(),
                number: self.oscillator.as_param(),
            },
        )
    }
}

/// The scrollable card strip: owns every card's state, the shared viewport,
/// a scroll offset, and the focus index input events are routed to.
pub struct Gallery {
    cards: Vec<CardState>,
    viewport: Viewport,
    scroll: f32,
    focused: usize,
    pulse: bool,
}

impl Gallery {
    pub fn new(deck: Vec<Card>, now: Instant) -> Result<Self, GalleryError> {
        if deck.is_empty() {
            return Err(GalleryError::EmptyDeck);
        }
        let cards = deck.into_iter().map(|card| CardState::new(card, now)).collect();
        Ok(Self {
            cards,
            viewport: Viewport::default(),
            scroll: 0.0,
            focused: 0,
            pulse: false,
        })
    }

    /// Overwrites the published viewport size. No buffering, no history.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.clamp_scroll();
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn cards(&self) -> &[CardState] {
        &self.cards
    }

    pub fn cards_mut(&mut self) -> &mut [CardState] {
        &mut self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn focused(&self) -> usize {
        self.focused
    }

    pub fn focused_card_mut(&mut self) -> &mut CardState {
        &mut self.cards[self.focused]
    }

    /// Slow pulse toggled by the 1 s timer; modulates the overlay accent.
    pub fn pulse(&self) -> bool {
        self.pulse
    }

    pub fn toggle_pulse(&mut self) {
        self.pulse = !self.pulse;
    }

    /// Width of one card at the current viewport.
    pub fn card_width(&self) -> f32 {
        let (vw, _) = self.viewport.as_f32();
        (vw - 2.0 * CARD_MARGIN).max(1.0)
    }

    /// Layout rectangle of card `index` at the current scroll position.
    pub fn card_rect(&self, index: usize) -> CardRect {
        let (_, vh) = self.viewport.as_f32();
        let width = self.card_width();
        let step = width + CARD_SPACING;
        CardRect {
            x: CARD_MARGIN + index as f32 * step - self.scroll,
            y: CARD_MARGIN,
            width,
            height: (vh - 2.0 * CARD_MARGIN).max(1.0),
        }
    }

    /// The image portion of a card; a click here toggles that card's noise.
    pub fn image_rect(&self, index: usize) -> CardRect {
        let rect = self.card_rect(index);
        CardRect {
            height: rect.height * IMAGE_SHARE,
            ..rect
        }
    }

    /// Topmost card under the given surface position, if any.
    pub fn card_at(&self, x: f32, y: f32) -> Option<usize> {
        (0..self.cards.len()).find(|&index| self.card_rect(index).contains(x, y))
    }

    pub fn scroll_by(&mut self, delta: f32) {
        self.scroll += delta;
        self.clamp_scroll();
        self.update_focus();
    }

    pub fn focus_next(&mut self) {
        if self.focused + 1 < self.cards.len() {
            self.focused += 1;
            self.scroll_to_focused();
        }
    }

    pub fn focus_prev(&mut self) {
        if self.focused > 0 {
            self.focused -= 1;
            self.scroll_to_focused();
        }
    }

    /// Advances every card's oscillator; returns whether any value moved.
    pub fn tick_oscillators(&mut self) -> bool {
        let mut changed = false;
        for card in &mut self.cards {
            changed |= card.oscillator.tick(&card.flags);
        }
        changed
    }

    fn content_width(&self) -> f32 {
        let count = self.cards.len() as f32;
        2.0 * CARD_MARGIN + count * self.card_width() + (count - 1.0) * CARD_SPACING
    }

    fn max_scroll(&self) -> f32 {
        (self.content_width() - self.viewport.width as f32).max(0.0)
    }

    fn clamp_scroll(&mut self) {
        self.scroll = self.scroll.clamp(0.0, self.max_scroll());
    }

    fn scroll_to_focused(&mut self) {
        let step = self.card_width() + CARD_SPACING;
        self.scroll = self.focused as f32 * step;
        self.clamp_scroll();
    }

    fn update_focus(&mut self) {
        let center = self.viewport.width as f32 * 0.5;
        let mut best = self.focused;
        let mut best_distance = f32::INFINITY;
        for index in 0..self.cards.len() {
            let distance = (self.card_rect(index).center_x() - center).abs();
            if distance < best_distance {
                best_distance = distance;
                best = index;
            }
        }
        self.focused = best;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::EffectPass;
    use crate::flags::EffectKind;

    fn deck(count: u32) -> Vec<Card> {
        (0..count)
            .map(|id| Card::new(id, format!("Card {id}"), "demo"))
            .collect()
    }

    #[test]
    fn empty_deck_is_rejected() {
        assert!(matches!(
            Gallery::new(Vec::new(), Instant::now()),
            Err(GalleryError::EmptyDeck)
        ));
    }

    #[test]
    fn viewport_update_is_visible_to_all_cards_on_next_plan() {
        let mut gallery = Gallery::new(deck(4), Instant::now()).unwrap();
        assert_eq!(gallery.viewport(), Viewport::new(0, 0));
        gallery.set_viewport(Viewport::new(393, 852));

        for card in gallery.cards_mut() {
            card.flags.toggle(EffectKind::ComplexWave);
        }
        let viewport = gallery.viewport();
        for card in gallery.cards() {
            let plan = card.plan(viewport, 1.0);
            match plan.passes() {
                [EffectPass::ComplexWave { size, .. }] => {
                    assert_eq!(*size, (393.0, 852.0));
                }
                other => panic!("expected one complex-wave pass, got {other:?}"),
            }
        }
    }

    #[test]
    fn scroll_is_clamped_to_the_strip_extent() {
        let mut gallery = Gallery::new(deck(2), Instant::now()).unwrap();
        gallery.set_viewport(Viewport::new(400, 800));
        gallery.scroll_by(-500.0);
        assert_eq!(gallery.card_rect(0).x, CARD_MARGIN);
        gallery.scroll_by(1.0e6);
        let last = gallery.card_rect(1);
        assert!(last.x + last.width <= 400.0 + CARD_MARGIN);
    }

    #[test]
    fn click_hit_testing_finds_the_card_under_the_cursor() {
        let mut gallery = Gallery::new(deck(4), Instant::now()).unwrap();
        gallery.set_viewport(Viewport::new(393, 852));
        assert_eq!(gallery.card_at(100.0, 100.0), Some(0));
        assert_eq!(gallery.card_at(5.0, 100.0), None);
        let second = gallery.card_rect(1);
        assert_eq!(gallery.card_at(second.x + 1.0, 100.0), Some(1));
    }

    #[test]
    fn image_rect_covers_the_top_of_the_card() {
        let mut gallery = Gallery::new(deck(1), Instant::now()).unwrap();
        gallery.set_viewport(Viewport::new(393, 852));
        let card = gallery.card_rect(0);
        let image = gallery.image_rect(0);
        assert_eq!(image.y, card.y);
        assert!(image.height < card.height);
        assert!(image.contains(card.center_x(), card.y + 1.0));
    }

    #[test]
    fn focus_follows_paging() {
        let mut gallery = Gallery::new(deck(3), Instant::now()).unwrap();
        gallery.set_viewport(Viewport::new(400, 800));
        assert_eq!(gallery.focused(), 0);
        gallery.focus_next();
        assert_eq!(gallery.focused(), 1);
        gallery.focus_prev();
        gallery.focus_prev();
        assert_eq!(gallery.focused(), 0);
    }

    #[test]
    fn oscillator_tick_reports_whether_any_card_moved() {
        let mut gallery = Gallery::new(deck(2), Instant::now()).unwrap();
        assert!(!gallery.tick_oscillators());
        gallery.cards_mut()[1].flags.toggle(EffectKind::Pixellate);
        assert!(gallery.tick_oscillators());
        assert_eq!(gallery.cards()[0].oscillator.value(), 0);
        assert_eq!(gallery.cards()[1].oscillator.value(), 1);
    }
}
