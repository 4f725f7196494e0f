//! Painting modes that used to be global switches in the editor.

/// How a block picks which of its two colors to repaint when a third color
/// is requested for one of its pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RecolorPolicy {
    /// Recolor the slot currently shown under the pointer (MultiPaint behavior).
    #[default]
    SameAsPointer,
    /// Recolor the slot that covers fewer pixels, so as few pixels as
    /// possible change their displayed color. Ties recolor the background.
    MinimalChange,
}

impl RecolorPolicy {
    /// The other policy.
    pub fn toggled(self) -> Self {
        match self {
            RecolorPolicy::SameAsPointer => RecolorPolicy::MinimalChange,
            RecolorPolicy::MinimalChange => RecolorPolicy::SameAsPointer,
        }
    }
}

/// Options threaded through every block and canvas operation that depends on
/// a painting mode.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    /// Slot selection strategy for third-color requests.
    pub policy: RecolorPolicy,

    // Always a palette index (0..16) when set.
    mask_color: Option<u8>,
}

impl Settings {
    pub fn with_policy(mut self, policy: RecolorPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_mask_color(mut self, mask_color: Option<u8>) -> Self {
        self.mask_color = mask_color.map(|c| c & 0x0f);
        self
    }

    /// Sprite mask color. `None` disables the mask plane entirely, in which
    /// case mask bits are kept but neither read nor written.
    #[inline]
    pub fn mask_color(&self) -> Option<u8> {
        self.mask_color
    }

    /// True when the sprite mask plane takes part in painting.
    #[inline]
    pub fn masking(&self) -> bool {
        self.mask_color.is_some()
    }
}
