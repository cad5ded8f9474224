/// Effect chain for processing audio
///
/// Trait-based architecture for chaining audio effects. Effects process in
/// order and all operate on interleaved stereo f32 samples in [-1.0, 1.0].

/// Trait for audio effects that can be chained together
///
/// # Safety
/// - Must NOT allocate memory in `process()` (real-time constraint)
/// - Must be Send to allow processing off the control thread
pub trait AudioEffect: Send {
    /// Process audio buffer in-place
    ///
    /// # Arguments
    /// * `buffer` - Interleaved stereo samples (L, R, L, R, ...)
    /// * `sample_rate` - Sample rate in Hz
    fn process(&mut self, buffer: &mut [f32], sample_rate: u32);

    /// Reset effect state (e.g., when a session restarts)
    fn reset(&mut self);

    /// Enable/disable the effect
    fn set_enabled(&mut self, enabled: bool);

    /// Check if effect is enabled
    fn is_enabled(&self) -> bool;

    /// Get effect name (for debugging)
    fn name(&self) -> &str;
}

/// Chain of audio effects processed in order
pub struct EffectChain {
    effects: Vec<Box<dyn AudioEffect>>,
}

impl EffectChain {
    /// Create a new empty effect chain
    pub fn new() -> Self {
        Self {
            effects: Vec::new(),
        }
    }

    /// Add an effect to the end of the chain
    pub fn add_effect(&mut self, effect: Box<dyn AudioEffect>) {
        self.effects.push(effect);
    }

    /// Process audio through the entire effect chain
    pub fn process(&mut self, buffer: &mut [f32], sample_rate: u32) {
        for effect in &mut self.effects {
            if effect.is_enabled() {
                effect.process(buffer, sample_rate);
            }
        }
    }

    /// Reset all effects in the chain
    pub fn reset(&mut self) {
        for effect in &mut self.effects {
            effect.reset();
        }
    }

    /// Clear all effects from the chain
    pub fn clear(&mut self) {
        self.effects.clear();
    }

    /// Get number of effects in chain
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Check if chain is empty
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    /// Get effect at index
    pub fn get_effect(&self, index: usize) -> Option<&dyn AudioEffect> {
        self.effects.get(index).map(|e| e.as_ref())
    }

    /// Get mutable effect at index
    pub fn get_effect_mut(&mut self, index: usize) -> Option<&mut dyn AudioEffect> {
        if let Some(effect) = self.effects.get_mut(index) {
            Some(effect.as_mut())
        } else {
            None
        }
    }
}

impl Default for EffectChain {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::Gain;

    #[test]
    fn empty_chain() {
        let chain = EffectChain::new();
        assert_eq!(chain.len(), 0);
        assert!(chain.is_empty());
    }

    #[test]
    fn process_chain_multiplies_gains() {
        let mut chain = EffectChain::new();

        // -6 dB followed by +6 dB cancels out
        chain.add_effect(Box::new(Gain::from_db(-6.0)));
        chain.add_effect(Box::new(Gain::from_db(6.0)));

        let mut buffer = vec![0.5; 100];
        chain.process(&mut buffer, 44100);

        for sample in &buffer {
            assert!((sample - 0.5).abs() < 0.0001);
        }
    }

    #[test]
    fn disabled_effect_bypassed() {
        let mut chain = EffectChain::new();

        let mut muted = Gain::from_linear(0.0);
        muted.set_enabled(false);
        chain.add_effect(Box::new(muted));

        let mut buffer = vec![1.0; 100];
        chain.process(&mut buffer, 44100);

        for sample in &buffer {
            assert!((sample - 1.0).abs() < 0.0001);
        }
    }

    #[test]
    fn get_effect() {
        let mut chain = EffectChain::new();
        chain.add_effect(Box::new(Gain::from_db(0.0)));

        let effect = chain.get_effect(0).unwrap();
        assert_eq!(effect.name(), "Gain");
        assert!(chain.get_effect(1).is_none());
    }
}
