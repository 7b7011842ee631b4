use crate::constants::{
    DEFAULT_REORDER_CAPACITY,
    DEFAULT_REORDER_MODULUS,
    DEFAULT_SILENCE_RUN_THRESHOLD,
};
use derivative::Derivative;

/// Configuration for the reorder/channel/router engine.
///
/// A `Config` is cheap to clone and is typically built once at session setup
/// and shared (by value) between a [`VoiceRouter`] and the channels it
/// creates.
///
/// [`VoiceRouter`]: crate::router::VoiceRouter
#[derive(Clone, Derivative)]
#[derivative(Debug)]
#[non_exhaustive]
pub struct Config {
    /// Fixed capacity of each channel's reorder window.
    ///
    /// Defaults to [`DEFAULT_REORDER_CAPACITY`].
    pub reorder_capacity: usize,
    /// Modulus of the reorder window's sequence space.
    ///
    /// Defaults to [`DEFAULT_REORDER_MODULUS`]. Set this to
    /// [`RTP_SEQUENCE_MODULUS`](crate::constants::RTP_SEQUENCE_MODULUS) if
    /// your transport's sequence numbers are a raw 16-bit RTP field that may
    /// wrap within a session.
    pub reorder_modulus: u64,
    /// Number of consecutive trailing silence frames that end an utterance.
    ///
    /// Defaults to [`DEFAULT_SILENCE_RUN_THRESHOLD`].
    pub silence_run_threshold: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            reorder_capacity: DEFAULT_REORDER_CAPACITY,
            reorder_modulus: DEFAULT_REORDER_MODULUS,
            silence_run_threshold: DEFAULT_SILENCE_RUN_THRESHOLD,
        }
    }
}

impl Config {
    /// Sets this `Config`'s reorder window capacity.
    #[must_use]
    pub fn reorder_capacity(mut self, reorder_capacity: usize) -> Self {
        self.reorder_capacity = reorder_capacity;
        self
    }

    /// Sets this `Config`'s reorder window modulus.
    #[must_use]
    pub fn reorder_modulus(mut self, reorder_modulus: u64) -> Self {
        self.reorder_modulus = reorder_modulus;
        self
    }

    /// Sets this `Config`'s silence-run threshold for ending an utterance.
    #[must_use]
    pub fn silence_run_threshold(mut self, silence_run_threshold: u32) -> Self {
        self.silence_run_threshold = silence_run_threshold;
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_matches_spec_constants() {
        let cfg = Config::default();
        assert_eq!(cfg.reorder_capacity, 32);
        assert_eq!(cfg.reorder_modulus, 2_147_483_647);
        assert_eq!(cfg.silence_run_threshold, 5);
    }

    #[test]
    fn builder_overrides_fields() {
        let cfg = Config::default()
            .reorder_capacity(64)
            .reorder_modulus(65_536)
            .silence_run_threshold(10);

        assert_eq!(cfg.reorder_capacity, 64);
        assert_eq!(cfg.reorder_modulus, 65_536);
        assert_eq!(cfg.silence_run_threshold, 10);
    }
}
