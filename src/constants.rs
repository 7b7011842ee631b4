//! Constants affecting reorder, channel, and router behaviour.

/// Default fixed capacity of a [`VoiceChannel`]'s reorder window.
///
/// [`VoiceChannel`]: crate::channel::VoiceChannel
pub const DEFAULT_REORDER_CAPACITY: usize = 32;

/// Default modulus of the reorder window's sequence space.
///
/// This is *not* the 16-bit RTP wire width: it assumes a sender will not
/// wrap its logical counter within the life of a session. See
/// [`Config::reorder_modulus`] to opt into strict RTP-faithful wraparound at
/// [`RTP_SEQUENCE_MODULUS`].
///
/// [`Config::reorder_modulus`]: crate::config::Config::reorder_modulus
pub const DEFAULT_REORDER_MODULUS: u64 = 2_147_483_647;

/// Modulus matching the 16-bit RTP wire sequence field, for embedders who
/// want wraparound handled at the reorder boundary rather than relying on
/// senders never wrapping within a session.
pub const RTP_SEQUENCE_MODULUS: u64 = 65_536;

/// Number of trailing consecutive silence frames that end an utterance.
pub const DEFAULT_SILENCE_RUN_THRESHOLD: u32 = 5;

/// Opus silent frame, used by senders to signal speech end (and prevent
/// audio glitching) rather than simply stopping transmission.
pub const SILENCE_MARKER: [u8; 3] = [0xf8, 0xff, 0xfe];

/// The one (and only) RTP version this crate's packet model expects.
pub const RTP_VERSION: u8 = 2;

