//! Transient flavor-text overlay.
//!
//! `show` picks a random message from one category of the bank, displays it
//! at full opacity and fades it out. A new `show` during a fade restarts it;
//! nothing is queued.

use crate::core::{DialogCategory, Tween};
use crate::messages::MessageBank;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Duration;

pub const DEFAULT_FADE: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone)]
pub struct FlashText {
    bank: MessageBank,
    text: String,
    alpha: f64,
    fade: Option<Tween>,
    fade_duration: Duration,
    destroyed: bool,
}

impl Default for FlashText {
    fn default() -> Self {
        Self::new(DEFAULT_FADE)
    }
}

impl FlashText {
    pub fn new(fade_duration: Duration) -> Self {
        Self {
            bank: MessageBank::new(),
            text: String::new(),
            alpha: 0.0,
            fade: None,
            fade_duration,
            destroyed: false,
        }
    }

    /// Replace the whole bank.
    pub fn set_messages(&mut self, bank: MessageBank) {
        self.bank = bank;
    }

    pub fn has_messages(&self) -> bool {
        !self.bank.is_empty()
    }

    /// Show a random message from `category`. Returns false (and changes
    /// nothing) when the category has no messages or the overlay has been
    /// destroyed.
    pub fn show<R: Rng + ?Sized>(&mut self, category: DialogCategory, rng: &mut R) -> bool {
        if self.destroyed {
            return false;
        }
        let Some(message) = self
            .bank
            .get(category)
            .and_then(|messages| messages.choose(rng))
        else {
            return false;
        };

        self.text = message.clone();
        self.alpha = 1.0;
        self.fade = Some(Tween::new(1.0, 0.0, self.fade_duration));
        true
    }

    pub fn tick(&mut self, dt: Duration) {
        if let Some(fade) = &mut self.fade {
            fade.advance(dt);
            self.alpha = fade.value();
            if fade.is_finished() {
                self.fade = None;
            }
        }
    }

    /// Release the text. The overlay stays inert afterwards.
    pub fn destroy(&mut self) {
        self.destroyed = true;
        self.text.clear();
        self.alpha = 0.0;
        self.fade = None;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    pub fn is_visible(&self) -> bool {
        !self.destroyed && self.alpha > 0.0 && !self.text.is_empty()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}
