//! Per-session SSRC demultiplexer (`VR` in the design docs).
//!
//! Grounded on `discord/voice_processor.py`'s `VoiceProcessor`, whose
//! `user_ssrc_map` is a `bidict` kept injective between user id and SSRC;
//! here that's two plain `HashMap`s kept in sync by hand, since spec's
//! single-threaded event-loop invariant makes a locking bidirectional map
//! (songbird's own maps use `DashMap`) unnecessary.

use crate::{
    channel::VoiceChannel,
    config::Config,
    consumer::VoiceConsumerFactory,
    decode::OpusDecoder,
    packet::RtpFields,
};
use std::{collections::HashMap, fmt};

/// Demultiplexes decrypted RTP voice packets across per-SSRC channels, and
/// tracks which speaking user owns which SSRC for a session.
///
/// An SSRC moves through three states: absent, present without a user (a
/// channel exists, pre-buffering, but no `user_id` has been bound yet), and
/// present with a user. Presence is created on whichever happens first: a
/// packet arriving for an unknown SSRC, or [`add_user_ssrc`](Self::add_user_ssrc)
/// being called eagerly ahead of any packet.
pub struct VoiceRouter<D, F>
where
    F: VoiceConsumerFactory,
{
    ssrc_to_channel: HashMap<u32, VoiceChannel<D, F>>,
    user_to_ssrc: HashMap<u64, u32>,
    ssrc_to_user: HashMap<u32, u64>,
    consumer_factory: Option<F>,
    config: Config,
}

impl<D, F> fmt::Debug for VoiceRouter<D, F>
where
    F: VoiceConsumerFactory,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceRouter")
            .field("channels", &self.ssrc_to_channel.len())
            .field("bindings", &self.user_to_ssrc.len())
            .finish()
    }
}

impl<D, F> VoiceRouter<D, F>
where
    D: OpusDecoder + Default,
    F: VoiceConsumerFactory + Clone,
{
    /// Builds an empty router with no bound users and no consumer factory.
    pub fn new(config: Config) -> Self {
        Self {
            ssrc_to_channel: HashMap::new(),
            user_to_ssrc: HashMap::new(),
            ssrc_to_user: HashMap::new(),
            consumer_factory: None,
            config,
        }
    }

    /// Binds `user_id` to `ssrc`, creating the channel if it doesn't exist
    /// yet, and overwriting any prior mapping either identifier held (so the
    /// mapping stays injective, as the original's `bidict` enforced).
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if binding the user triggers a pre-buffered
    /// backlog replay that fails to decode (see
    /// [`VoiceChannel::set_user`](crate::channel::VoiceChannel::set_user)).
    pub fn add_user_ssrc(&mut self, user_id: u64, ssrc: u32) -> crate::error::Result<()> {
        if let Some(old_ssrc) = self.user_to_ssrc.remove(&user_id) {
            if old_ssrc != ssrc {
                self.ssrc_to_user.remove(&old_ssrc);
            }
        }
        if let Some(old_user) = self.ssrc_to_user.remove(&ssrc) {
            if old_user != user_id {
                self.user_to_ssrc.remove(&old_user);
            }
        }

        self.user_to_ssrc.insert(user_id, ssrc);
        self.ssrc_to_user.insert(ssrc, user_id);

        let factory = self.consumer_factory.clone();
        let config = &self.config;
        let channel = self
            .ssrc_to_channel
            .entry(ssrc)
            .or_insert_with(|| VoiceChannel::new(ssrc, factory, config));
        channel.set_user(user_id)
    }

    /// Removes `ssrc` and its user binding (if any), dropping its channel.
    ///
    /// A no-op if `ssrc` is unknown. Dropping the channel flushes its reorder
    /// window through its consumer (see [`VoiceChannel`]'s `Drop` docs).
    pub fn remove_ssrc(&mut self, ssrc: u32) {
        if let Some(user_id) = self.ssrc_to_user.remove(&ssrc) {
            self.user_to_ssrc.remove(&user_id);
        }
        self.ssrc_to_channel.remove(&ssrc);
    }

    /// Removes `user_id`'s SSRC binding (if any), dropping its channel.
    ///
    /// A no-op if `user_id` is unknown.
    pub fn remove_user(&mut self, user_id: u64) {
        if let Some(ssrc) = self.user_to_ssrc.remove(&user_id) {
            self.ssrc_to_user.remove(&ssrc);
            self.ssrc_to_channel.remove(&ssrc);
        }
    }

    /// Routes one decrypted packet to its SSRC's channel, creating the
    /// channel on demand if this is the first packet seen for it.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the packet's channel fails to decode it
    /// (see [`VoiceChannel::on_data`](crate::channel::VoiceChannel::on_data)).
    pub fn on_packet(&mut self, packet: RtpFields) -> crate::error::Result<()> {
        let RtpFields {
            sequence,
            timestamp,
            ssrc,
            opus_payload,
            ..
        } = packet;

        let factory = self.consumer_factory.clone();
        let config = &self.config;
        let channel = self
            .ssrc_to_channel
            .entry(ssrc)
            .or_insert_with(|| VoiceChannel::new(ssrc, factory, config));

        channel.on_data(opus_payload, sequence, timestamp)
    }

    /// Records the consumer factory and propagates it to every existing
    /// channel.
    ///
    /// # Errors
    ///
    /// Returns the first `Error::Decode` encountered while propagating the
    /// factory to an existing channel's pre-buffered backlog, if any -- every
    /// channel still receives the new factory regardless.
    pub fn set_consumer_factory(&mut self, factory: F) -> crate::error::Result<()> {
        self.consumer_factory = Some(factory.clone());
        let mut first_err = None;
        for channel in self.ssrc_to_channel.values_mut() {
            if let Err(err) = channel.set_consumer_factory(factory.clone()) {
                if first_err.is_none() {
                    first_err = Some(err);
                }
            }
        }
        match first_err {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}
