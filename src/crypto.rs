//! Tag for the SRTP-like nonce scheme negotiated out-of-band by a transport.
//!
//! This crate never performs decryption itself (see the crate-level docs);
//! `CryptoMode` exists purely as session metadata an embedder can thread
//! through its own decrypt step and report back for diagnostics, mirroring
//! how the mode is negotiated once per session and then fixed.

/// Variants of the nonce-derivation scheme a transport may have negotiated.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum CryptoMode {
    /// The packet header itself is the source of nonce bytes.
    Normal,
    /// An additional random suffix, appended per packet, is the nonce source.
    Suffix,
    /// An additional incrementing 4-byte suffix is the nonce source.
    Lite,
}

impl CryptoMode {
    /// Returns the name of a mode as it would appear during transport-level
    /// negotiation.
    #[must_use]
    pub fn to_request_str(self) -> &'static str {
        match self {
            CryptoMode::Normal => "xsalsa20_poly1305",
            CryptoMode::Suffix => "xsalsa20_poly1305_suffix",
            CryptoMode::Lite => "xsalsa20_poly1305_lite",
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn request_strings_are_distinct() {
        let modes = [CryptoMode::Normal, CryptoMode::Suffix, CryptoMode::Lite];
        for (i, a) in modes.iter().enumerate() {
            for b in &modes[i + 1..] {
                assert_ne!(a.to_request_str(), b.to_request_str());
            }
        }
    }
}
