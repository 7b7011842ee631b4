//! The consumer/consumer-factory capability-sets a [`VoiceChannel`] drives.
//!
//! Realized as plain traits rather than an inheritance hierarchy, matching
//! [`discord/voice_stream.py`]'s `VoiceStream`/`VoiceStreamFactory` split and
//! this crate's broader convention of capability-set-over-inheritance for
//! embedder-supplied behaviour.
//!
//! [`VoiceChannel`]: crate::channel::VoiceChannel
//! [`discord/voice_stream.py`]: https://github.com/Rapptz/discord.py

/// One speaker's live PCM stream, as delivered to an embedder.
///
/// A channel creates exactly one consumer per utterance: `on_start` always
/// precedes any `on_data`, and `on_end` always closes it before a new
/// consumer (for the next utterance) may be created.
pub trait VoiceConsumer {
    /// Called once, immediately after creation, before any `on_data`.
    fn on_start(&mut self) {}

    /// Called with one frame of decoded PCM and its RTP timestamp.
    fn on_data(&mut self, timestamp: u32, pcm: &[u8]);

    /// Called once an utterance ends via a silence run reaching threshold.
    ///
    /// Not called on abnormal channel teardown (see
    /// [`VoiceChannel`](crate::channel::VoiceChannel)'s `Drop` docs).
    fn on_end(&mut self) {}
}

/// Creates a [`VoiceConsumer`] once a channel has learned both its speaker's
/// user id and that real (non-silence) audio has arrived.
pub trait VoiceConsumerFactory {
    /// The consumer type this factory produces.
    type Consumer: VoiceConsumer;

    /// Builds a fresh consumer for the given user.
    fn create(&self, user_id: u64) -> Self::Consumer;
}

impl<C, F> VoiceConsumerFactory for F
where
    C: VoiceConsumer,
    F: Fn(u64) -> C,
{
    type Consumer = C;

    fn create(&self, user_id: u64) -> C {
        self(user_id)
    }
}
