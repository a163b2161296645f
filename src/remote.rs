use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::{
    config::Config,
    dispatch::{Dispatch, DispatchQueue, Fanout, QueueKey, Transmit},
    midi::{Message, NUM_CHANNELS},
    sysex::{
        address, build_param, build_system_mode, clamp_value, ParamRegistry, SystemMode,
        Target, DEFAULT_DEVICE_ID,
    },
};

/// Host-facing surface: owns the parameter tables, the dispatch queue and the
/// outbound sink. All calls are synchronous and meant for a single tick loop.
pub struct Remote<T: Transmit> {
    registry: ParamRegistry,
    queue: DispatchQueue,
    fanout: Fanout,
    sink: T,
    mode: SystemMode,
}

impl<T: Transmit> Remote<T> {
    pub fn new(sink: T, fanout: Fanout, throttle: Duration, mode: SystemMode) -> Self {
        Self {
            registry: ParamRegistry::new(),
            queue: DispatchQueue::new(throttle),
            fanout,
            sink,
            mode,
        }
    }

    pub fn from_config(sink: T, config: &Config) -> Self {
        Self::new(
            sink,
            Fanout::new(config.device_ids.clone()),
            config.throttle(),
            config.mode,
        )
    }

    pub fn registry(&self) -> &ParamRegistry {
        &self.registry
    }

    pub fn mode(&self) -> SystemMode {
        self.mode
    }

    pub fn sink(&self) -> &T {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut T {
        &mut self.sink
    }

    pub fn pending(&self) -> usize {
        self.queue.pending()
    }

    pub fn init(&mut self) {
        info!("Selecting {:?} mode", self.mode);
        self.send_mode();
    }

    /// Mode switches go out immediately, never through the throttle.
    pub fn set_mode(&mut self, mode: SystemMode) {
        self.mode = mode;
        self.send_mode();
    }

    /// Unknown names are dropped without sending anything. Values are clamped
    /// to the parameter's own range. A target whose address does not fit in
    /// 7 bits is a caller bug and comes back as `Err`.
    pub fn set_param(
        &mut self,
        target: Target,
        name: &str,
        value: i32,
        now: Instant,
    ) -> address::Result<Dispatch> {
        let value = clamp_value(value, 0, self.registry.max_value(name) as i32);
        let (name, frame) =
            match build_param(&self.registry, target, name, value, DEFAULT_DEVICE_ID) {
                Ok(Some(built)) => built,
                Ok(None) => {
                    debug!("Dropped unknown {:?} parameter {name:?}", target.group());
                    return Ok(Dispatch::Dropped);
                }
                Err(e) => {
                    error!("Refusing to send {name} for {target:?}: {e}");
                    return Err(e);
                }
            };

        let key = QueueKey::new(target, name);
        Ok(self
            .queue
            .request(key, frame, now, &self.fanout, &mut self.sink))
    }

    pub fn tick(&mut self, now: Instant) -> usize {
        self.queue.flush_due(now, &self.fanout, &mut self.sink)
    }

    pub fn all_notes_off(&mut self) {
        self.send_to_all_channels(Message::all_notes_off);
    }

    pub fn reset_controllers(&mut self) {
        self.send_to_all_channels(Message::reset_all_controllers);
    }

    pub fn sustain(&mut self, on: bool) {
        self.send_to_all_channels(|channel| Message::sustain(channel, on));
    }

    fn send_mode(&mut self) {
        let frame = build_system_mode(self.mode, DEFAULT_DEVICE_ID);
        self.fanout.send(&mut self.sink, frame.bytes());
    }

    fn send_to_all_channels(&mut self, message: impl Fn(u8) -> Message) {
        for channel in 0..NUM_CHANNELS {
            self.fanout.send(&mut self.sink, &message(channel).encode());
        }
    }
}
