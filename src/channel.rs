//! Per-speaker channel state machine (`VC` in the design docs).
//!
//! Grounded on songbird's [`SsrcState`] (one playout buffer + decoder per
//! SSRC) and on `discord/voice_channel.py`'s `VoiceChannel`, which this
//! crate's consumer lifecycle and silence-run bookkeeping follow closely.
//!
//! [`SsrcState`]: https://github.com/serenity-rs/songbird

use crate::{
    config::Config,
    consumer::{VoiceConsumer, VoiceConsumerFactory},
    decode::OpusDecoder,
    packet::is_silence,
    reorder::ReorderWindow,
};
use bytes::Bytes;
use std::{cell::RefCell, collections::VecDeque, fmt, rc::Rc};
use tracing::{trace, warn};

/// One speaker's reorder-and-decode pipeline, keyed by a single RTP SSRC.
///
/// A channel pre-buffers incoming opus payloads until it has learned both the
/// speaking user's id and an embedder-supplied consumer factory, *and* real
/// (non-silence) audio has arrived -- only then is a consumer constructed and
/// handed the backlog. From then on it decodes reordered payloads and feeds
/// them to the active consumer until a run of trailing silence frames ends
/// the utterance.
pub struct VoiceChannel<D, F>
where
    F: VoiceConsumerFactory,
{
    ssrc: u32,
    user_id: Option<u64>,
    consumer_factory: Option<F>,
    consumer: Option<F::Consumer>,
    pre_buffer: Vec<Bytes>,
    reorder: ReorderWindow<(u32, Bytes)>,
    ready: Rc<RefCell<VecDeque<(u32, Bytes)>>>,
    decoder: D,
    silence_run: u32,
    silence_run_threshold: u32,
}

impl<D, F> fmt::Debug for VoiceChannel<D, F>
where
    F: VoiceConsumerFactory,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VoiceChannel")
            .field("ssrc", &self.ssrc)
            .field("user_id", &self.user_id)
            .field("has_consumer", &self.consumer.is_some())
            .field("pre_buffer_len", &self.pre_buffer.len())
            .field("silence_run", &self.silence_run)
            .finish()
    }
}

impl<D, F> VoiceChannel<D, F>
where
    D: OpusDecoder + Default,
    F: VoiceConsumerFactory,
{
    /// Builds a fresh, userless, consumer-less channel for `ssrc`.
    pub fn new(ssrc: u32, consumer_factory: Option<F>, config: &Config) -> Self {
        let ready = Rc::new(RefCell::new(VecDeque::new()));
        let ready_for_callback = Rc::clone(&ready);

        let reorder = ReorderWindow::new(
            config.reorder_capacity,
            config.reorder_modulus,
            move |payload| ready_for_callback.borrow_mut().push_back(payload),
        );

        Self {
            ssrc,
            user_id: None,
            consumer_factory,
            consumer: None,
            pre_buffer: Vec::new(),
            reorder,
            ready,
            decoder: D::default(),
            silence_run: 0,
            silence_run_threshold: config.silence_run_threshold,
        }
    }
}

impl<D, F> VoiceChannel<D, F>
where
    D: OpusDecoder,
    F: VoiceConsumerFactory,
{
    /// This channel's SSRC.
    pub fn ssrc(&self) -> u32 {
        self.ssrc
    }

    /// Records the speaking user, then attempts consumer initialization.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if pre-buffered backlog replay fails (see
    /// [`on_data`](Self::on_data)).
    pub fn set_user(&mut self, user_id: u64) -> crate::error::Result<()> {
        self.user_id = Some(user_id);
        self.try_init_consumer()
    }

    /// Records the consumer factory, then attempts consumer initialization.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if pre-buffered backlog replay fails (see
    /// [`on_data`](Self::on_data)).
    pub fn set_consumer_factory(&mut self, factory: F) -> crate::error::Result<()> {
        self.consumer_factory = Some(factory);
        self.try_init_consumer()
    }

    /// Initializes a consumer if the user and factory are both bound and
    /// there is already pre-buffered data to hand it.
    ///
    /// If no data has arrived yet, creation is deferred to the first data
    /// packet (see [`on_data`](Self::on_data)), so utterances begin exactly
    /// at real audio.
    fn try_init_consumer(&mut self) -> crate::error::Result<()> {
        if self.consumer.is_some() || self.pre_buffer.is_empty() {
            return Ok(());
        }
        if self.user_id.is_none() || self.consumer_factory.is_none() {
            return Ok(());
        }
        self.spawn_consumer()
    }

    /// Constructs a consumer, resets the decoder, and replays any backlog.
    ///
    /// Callers must ensure `user_id` and `consumer_factory` are both set and
    /// `consumer` is currently `None`.
    ///
    /// A decode failure while replaying the backlog is fatal: the freshly
    /// created consumer is closed with `on_end` and never stored, so the
    /// channel is left exactly as it was before this call (minus the
    /// already-consumed prefix of the backlog).
    fn spawn_consumer(&mut self) -> crate::error::Result<()> {
        let user_id = self
            .user_id
            .expect("spawn_consumer requires a bound user id");
        let factory = self
            .consumer_factory
            .as_ref()
            .expect("spawn_consumer requires a bound consumer factory");

        self.decoder.reset();
        let mut consumer = factory.create(user_id);
        consumer.on_start();
        trace!(ssrc = self.ssrc, user_id, "consumer started");

        // Pre-buffered entries predate any sequence/timestamp binding, so
        // they bypass the reorder window entirely; the timestamp handed to
        // the consumer for these is a placeholder, not a capture artifact.
        for opus in self.pre_buffer.drain(..) {
            match self.decoder.decode(&opus) {
                Ok(pcm) => consumer.on_data(0, &pcm),
                Err(err) => {
                    warn!(ssrc = self.ssrc, error = %err, "failed to decode pre-buffered payload, tearing down channel");
                    consumer.on_end();
                    return Err(err);
                },
            }
        }

        self.consumer = Some(consumer);
        Ok(())
    }

    /// Feeds one opus payload, in its RTP sequence/timestamp context, into
    /// this channel.
    ///
    /// # Errors
    ///
    /// Returns `Error::Decode` if the underlying decoder fails. A decode
    /// failure is fatal for the channel's current utterance: the active
    /// consumer (if any) is closed with `on_end` and cleared before the
    /// error is returned.
    pub fn on_data(
        &mut self,
        opus_payload: Bytes,
        sequence: u16,
        timestamp: u32,
    ) -> crate::error::Result<()> {
        let silent = is_silence(&opus_payload);

        if self.consumer.is_none() {
            let bound = self.user_id.is_some() && self.consumer_factory.is_some();
            if !bound {
                self.pre_buffer.push(opus_payload);
                return Ok(());
            }
            if silent {
                trace!(ssrc = self.ssrc, "dropping silence before first utterance");
                return Ok(());
            }
            self.spawn_consumer()?;
        }

        self.reorder.add(u64::from(sequence), (timestamp, opus_payload));
        self.drain_ready()?;

        if silent {
            self.silence_run += 1;
            if self.silence_run >= self.silence_run_threshold {
                self.reorder.flush();
                self.drain_ready()?;
                self.silence_run = 0;
                if let Some(consumer) = self.consumer.as_mut() {
                    consumer.on_end();
                }
                self.consumer = None;
                trace!(ssrc = self.ssrc, "utterance ended on silence run");
            }
        } else {
            self.silence_run = 0;
        }

        Ok(())
    }

    /// Decodes and delivers every payload the reorder window has emitted
    /// since the last drain.
    ///
    /// A decode failure closes the active consumer with `on_end`, clears it,
    /// and is returned to the caller; any payloads still in the queue behind
    /// the failing one are left undelivered.
    fn drain_ready(&mut self) -> crate::error::Result<()> {
        loop {
            let next = self.ready.borrow_mut().pop_front();
            let (timestamp, opus) = match next {
                Some(pair) => pair,
                None => return Ok(()),
            };

            match self.decoder.decode(&opus) {
                Ok(pcm) => {
                    if let Some(consumer) = self.consumer.as_mut() {
                        consumer.on_data(timestamp, &pcm);
                    }
                },
                Err(err) => {
                    warn!(ssrc = self.ssrc, error = %err, "opus decode failed, tearing down channel");
                    if let Some(consumer) = self.consumer.as_mut() {
                        consumer.on_end();
                    }
                    self.consumer = None;
                    return Err(err);
                },
            }
        }
    }
}

impl<D, F> Drop for VoiceChannel<D, F>
where
    D: OpusDecoder,
    F: VoiceConsumerFactory,
{
    /// Flushes the reorder window through the consumer. Deliberately does
    /// not synthesize an `on_end` for a clean flush: destruction is an
    /// abnormal close, not an observed end of utterance. A decode failure
    /// encountered while flushing is a genuine error, though, and still
    /// tears the consumer down via `on_end` (see `drain_ready`) -- it's
    /// simply logged here since `drop` cannot return it to a caller.
    fn drop(&mut self) {
        self.reorder.flush();
        if let Err(err) = self.drain_ready() {
            warn!(ssrc = self.ssrc, error = %err, "decode failed while flushing channel on drop");
        }
    }
}
