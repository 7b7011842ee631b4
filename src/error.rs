//! Error handling for the reorder/channel/router engine.

use std::{error::Error as StdError, fmt};

/// Convenience alias for this crate's fallible operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
#[non_exhaustive]
/// Errors surfaced by a [`VoiceChannel`] or [`VoiceRouter`].
///
/// Most edge cases named in the design (out-of-window packets, a missing
/// user/consumer-factory binding, idempotent router removals) are handled
/// silently by the state machines themselves and never reach this type --
/// see each module's docs for details. Only a collaborator failure that the
/// core cannot recover from is surfaced here.
///
/// [`VoiceChannel`]: crate::channel::VoiceChannel
/// [`VoiceRouter`]: crate::router::VoiceRouter
pub enum Error {
    /// The supplied [`OpusDecoder`] failed to decode a payload.
    ///
    /// This is fatal for the channel's current consumer: the channel tears
    /// down the active consumer with `on_end` and clears it, so that a
    /// fresh utterance can start cleanly on the next non-silence packet, and
    /// returns this variant to the caller that triggered the decode.
    ///
    /// [`OpusDecoder`]: crate::decode::OpusDecoder
    Decode(Box<dyn StdError + Send + Sync + 'static>),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Decode(e) => write!(f, "opus decode failed: {e}"),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Error::Decode(e) => Some(e.as_ref()),
        }
    }
}
