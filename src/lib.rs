#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
//! A per-speaker packet reordering and voice-channel lifecycle engine for
//! real-time voice transports.
//!
//! This crate owns three things, synchronously and single-threadedly:
//!
//!  * [`ReorderWindow`](reorder::ReorderWindow) -- a fixed-capacity, modular
//!    sequence reorder buffer.
//!  * [`VoiceChannel`](channel::VoiceChannel) -- one per SSRC, pairing a
//!    reorder window with a decoder and a consumer lifecycle (pre-buffer,
//!    utterance start/end via silence detection).
//!  * [`VoiceRouter`](router::VoiceRouter) -- demultiplexes decrypted packets
//!    across channels and tracks which user owns which SSRC.
//!
//! ## What this crate does *not* do
//!
//! Transport I/O, packet decryption, RTP header parsing, and Opus decoding
//! are all external collaborators' responsibility. This crate sees only
//! already-decrypted [`RtpFields`](packet::RtpFields) and drives decode and
//! consumer behaviour through the [`OpusDecoder`](decode::OpusDecoder) and
//! [`VoiceConsumer`](consumer::VoiceConsumer)/[`VoiceConsumerFactory`](consumer::VoiceConsumerFactory)
//! traits an embedder supplies.
//!
//! ## Logging and errors
//!
//! This crate emits [`tracing`] events for routine activity rather than
//! returning diagnostics for it: `trace!` on reorder/flush/consumer-lifecycle
//! events, `warn!` on dropped or undecodable data. Install a `tracing`
//! subscriber to see them. A decoder failure is the one case that isn't
//! routine -- it's fatal for the channel's current utterance, so it is both
//! logged and returned as [`Error::Decode`](error::Error::Decode) from
//! [`VoiceChannel::on_data`](channel::VoiceChannel::on_data) and the
//! [`VoiceRouter`](router::VoiceRouter) methods that call into it.

#![warn(clippy::pedantic, rust_2018_idioms)]
#![allow(
    // Allowed as they are too pedantic
    clippy::module_name_repetitions,
    clippy::wildcard_imports,
    clippy::cast_lossless,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
)]

pub mod channel;
pub mod config;
pub mod constants;
pub mod consumer;
pub mod crypto;
pub mod decode;
pub mod error;
pub mod packet;
pub mod reorder;
pub mod router;

pub use channel::VoiceChannel;
pub use config::Config;
pub use consumer::{VoiceConsumer, VoiceConsumerFactory};
pub use crypto::CryptoMode;
pub use decode::OpusDecoder;
pub use error::{Error, Result};
pub use packet::RtpFields;
pub use reorder::ReorderWindow;
pub use router::VoiceRouter;
