//! The opaque Opus decode primitive a [`VoiceChannel`] drives.
//!
//! [`VoiceChannel`]: crate::channel::VoiceChannel

use crate::error::Error;

/// A stateful Opus decoder, as owned one-per-[`VoiceChannel`].
///
/// Implementations typically wrap a real decoder (e.g. `audiopus`'s
/// `Decoder`); this crate treats decode as an opaque `bytes -> bytes`
/// primitive and never inspects PCM content.
///
/// [`VoiceChannel`]: crate::channel::VoiceChannel
pub trait OpusDecoder {
    /// Decodes one Opus packet to PCM bytes.
    ///
    /// Must tolerate repeated calls and preserve any decoder state (e.g.
    /// packet-loss concealment history) across packets within one utterance.
    fn decode(&mut self, opus: &[u8]) -> Result<Vec<u8>, Error>;

    /// Resets internal decoder state.
    ///
    /// Called exactly once per consumer creation, i.e. at the start of each
    /// utterance, so that concealment/prediction state from a prior speaker
    /// or a prior utterance never leaks into the next.
    fn reset(&mut self);
}
