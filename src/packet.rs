//! The decrypted packet fields a transport hands to a [`VoiceRouter`].
//!
//! [`VoiceRouter`]: crate::router::VoiceRouter

use crate::constants::SILENCE_MARKER;
use bytes::Bytes;

/// Fields of one already-decrypted, already-demuxed RTP voice packet.
///
/// Header parsing, decryption, and demuxing from the wire are external
/// collaborators' responsibility (see the crate-level docs); this crate only
/// ever sees the fields below.
#[derive(Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct RtpFields {
    /// RTP protocol version; always 2 for a valid packet.
    pub version: u8,
    /// RTP payload type, identifying the codec/profile in use.
    pub payload_type: u8,
    /// 16-bit wire sequence number.
    pub sequence: u16,
    /// 32-bit RTP timestamp, in the sender's clock-rate units.
    pub timestamp: u32,
    /// Synchronization source identifying the speaker.
    pub ssrc: u32,
    /// Fixed-size RTP header extension, if the sender includes one.
    pub header_extension: [u8; 8],
    /// The opus-encoded payload, with any header/extension stripped.
    pub opus_payload: Bytes,
}

/// Returns `true` if `opus_payload` is the canonical tiny silence frame.
#[must_use]
pub fn is_silence(opus_payload: &[u8]) -> bool {
    opus_payload.ends_with(&SILENCE_MARKER)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn detects_trailing_silence_marker() {
        let mut payload = vec![1, 2, 3, 4];
        payload.extend_from_slice(&SILENCE_MARKER);
        assert!(is_silence(&payload));
    }

    #[test]
    fn rejects_short_or_non_silent_payloads() {
        assert!(!is_silence(&[0xf8, 0xff]));
        assert!(!is_silence(&[1, 2, 3]));
        assert!(!is_silence(&[]));
    }
}
