//! Desk height sensor
//!
//! Ties the pieces together: bytes from the serial port go through the
//! frame receiver and the interpreter, new heights go to the sink, and the
//! scheduler decides when a query goes back out.
//!
//! The sensor does no I/O of its own beyond the non-blocking calls on its
//! serial port. The host calls [`DeskHeightSensor::tick`] periodically
//! (every 50 ms or so) with a monotonic millisecond timestamp.

use desk_height_hal::{Clock, SerialRx, SerialTx};
use desk_height_protocol::{FrameReceiver, Packet, QueryCommand, RX_BUFFER_SIZE};

use crate::config::{ActivityPolicy, ConfigError, SensorConfig};
use crate::interpreter::{HeightInterpreter, HeightReading, Interpretation, PublishGate};
use crate::scheduler::PollScheduler;
use crate::state::PollState;
use crate::traits::{EventLog, HeightSink, SensorEvent};

/// Bytes requested from the serial port per read
const READ_CHUNK: usize = RX_BUFFER_SIZE;

/// Height sensor on a Flexispot keypad bus
pub struct DeskHeightSensor<U, P, L = ()> {
    serial: U,
    sink: P,
    log: L,
    config: SensorConfig,
    receiver: FrameReceiver,
    interpreter: HeightInterpreter,
    gate: PublishGate,
    scheduler: PollScheduler,
}

impl<U, P, L> DeskHeightSensor<U, P, L>
where
    U: SerialRx + SerialTx,
    P: HeightSink,
    L: EventLog,
{
    /// Create a sensor that booted at `now_ms`
    pub fn new(
        serial: U,
        sink: P,
        mut log: L,
        config: SensorConfig,
        now_ms: u32,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        log.record(SensorEvent::Configured(config));

        Ok(Self {
            serial,
            sink,
            log,
            config,
            receiver: FrameReceiver::new(),
            interpreter: HeightInterpreter::new(),
            gate: PublishGate::new(),
            scheduler: PollScheduler::new(config, now_ms),
        })
    }

    /// Apply a new configuration
    ///
    /// On error the current configuration stays in effect. The poll state
    /// and timers carry over.
    pub fn configure(&mut self, config: SensorConfig) -> Result<(), ConfigError> {
        if let Err(e) = config.validate() {
            self.log.record(SensorEvent::ConfigRejected(e));
            return Err(e);
        }

        self.config = config;
        self.scheduler.reconfigure(config);
        self.log.record(SensorEvent::Configured(config));
        Ok(())
    }

    /// Process everything received so far, then poll if due
    pub fn tick(&mut self, now_ms: u32) {
        self.drain_serial(now_ms);

        let action = self.scheduler.tick(now_ms);
        if let Some(transition) = action.transition {
            self.log.record(SensorEvent::StateChanged(transition));
        }
        if let Some(query) = action.query {
            self.send_query(query);
        }
    }

    /// Tick using the current time of `clock`
    pub fn poll<C: Clock>(&mut self, clock: &C) {
        self.tick(clock.now_ms());
    }

    /// Most recently decoded height in centimetres
    pub fn height_cm(&self) -> Option<f32> {
        self.interpreter.current_cm()
    }

    /// Last height handed to the sink
    pub fn published_cm(&self) -> Option<f32> {
        self.gate.last_published_cm()
    }

    /// Current poll state
    pub fn poll_state(&self) -> PollState {
        self.scheduler.state()
    }

    /// Active configuration
    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Poll scheduler, for inspecting its timers
    pub fn scheduler(&self) -> &PollScheduler {
        &self.scheduler
    }

    pub fn serial(&self) -> &U {
        &self.serial
    }

    pub fn serial_mut(&mut self) -> &mut U {
        &mut self.serial
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn log(&self) -> &L {
        &self.log
    }

    /// Give back the serial port, sink and event log
    pub fn release(self) -> (U, P, L) {
        (self.serial, self.sink, self.log)
    }

    fn drain_serial(&mut self, now_ms: u32) {
        let mut chunk = [0u8; READ_CHUNK];

        loop {
            let count = match self.serial.read_available(&mut chunk) {
                Ok(0) => break,
                Ok(count) => count.min(READ_CHUNK),
                Err(_) => {
                    self.log.record(SensorEvent::ReadFailed);
                    break;
                }
            };

            for &byte in &chunk[..count] {
                match self.receiver.feed(byte) {
                    Ok(Some(packet)) => self.handle_packet(&packet, now_ms),
                    Ok(None) => {}
                    Err(e) => self.log.record(SensorEvent::FrameRejected(e)),
                }
            }
        }
    }

    fn handle_packet(&mut self, packet: &Packet, now_ms: u32) {
        match self.interpreter.interpret(packet) {
            Interpretation::Heartbeat => {}
            Interpretation::Unhandled { msg_type, length } => {
                self.log
                    .record(SensorEvent::MessageUnhandled { msg_type, length });
            }
            Interpretation::Ignored(reason) => {
                self.log.record(SensorEvent::ReadingIgnored(reason));
            }
            Interpretation::Reading(reading) => self.handle_reading(&reading, now_ms),
        }
    }

    fn handle_reading(&mut self, reading: &HeightReading, now_ms: u32) {
        self.log.record(SensorEvent::HeightDecoded {
            value_x10: reading.value_x10,
        });

        let is_activity = match self.config.activity {
            ActivityPolicy::EveryReading => true,
            ActivityPolicy::OnChange => reading.has_changed(),
        };
        if is_activity {
            self.scheduler.note_activity(now_ms);
        }

        if reading.has_changed() {
            if let Some(transition) = self.scheduler.height_changed(now_ms) {
                self.log.record(SensorEvent::StateChanged(transition));
            }
        }

        if let Some(value_cm) = self.gate.admit(reading) {
            self.sink.publish(value_cm);
            self.log.record(SensorEvent::HeightPublished {
                value_x10: reading.value_x10,
            });
        }
    }

    fn send_query(&mut self, query: QueryCommand) {
        match self.serial.write_all(query.bytes()) {
            Ok(()) => self.log.record(SensorEvent::QuerySent(query)),
            Err(_) => self.log.record(SensorEvent::WriteFailed(query)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PollTiming;
    use crate::interpreter::IgnoreReason;
    use crate::scheduler::Transition;
    use desk_height_protocol::{encode, Digit, FrameError, HeightDigits};
    use std::collections::VecDeque;

    #[derive(Default)]
    struct FakeSerial {
        rx: VecDeque<u8>,
        tx: Vec<Vec<u8>>,
        fail_reads: bool,
        fail_writes: bool,
    }

    impl FakeSerial {
        fn push(&mut self, bytes: &[u8]) {
            self.rx.extend(bytes.iter().copied());
        }
    }

    impl SerialRx for FakeSerial {
        type Error = ();

        fn read_available(&mut self, buf: &mut [u8]) -> Result<usize, ()> {
            if self.fail_reads {
                return Err(());
            }
            let count = buf.len().min(self.rx.len());
            for (slot, byte) in buf.iter_mut().zip(self.rx.drain(..count)) {
                *slot = byte;
            }
            Ok(count)
        }
    }

    impl SerialTx for FakeSerial {
        type Error = ();

        fn write_all(&mut self, data: &[u8]) -> Result<(), ()> {
            if self.fail_writes {
                return Err(());
            }
            self.tx.push(data.to_vec());
            Ok(())
        }
    }

    #[derive(Default)]
    struct Heights(Vec<f32>);

    impl HeightSink for Heights {
        fn publish(&mut self, value_cm: f32) {
            self.0.push(value_cm);
        }
    }

    #[derive(Default)]
    struct Events(Vec<SensorEvent>);

    impl EventLog for Events {
        fn record(&mut self, event: SensorEvent) {
            self.0.push(event);
        }
    }

    impl Events {
        fn count(&self, f: impl Fn(&SensorEvent) -> bool) -> usize {
            self.0.iter().filter(|e| f(e)).count()
        }
    }

    type TestSensor = DeskHeightSensor<FakeSerial, Heights, Events>;

    /// Short timings so tests stay readable
    fn fast_config() -> SensorConfig {
        SensorConfig {
            timing: PollTiming {
                boot_delay_ms: 100,
                idle_interval_ms: 1000,
                active_interval_ms: 200,
                activity_timeout_ms: 500,
            },
            ..SensorConfig::default()
        }
    }

    fn sensor(config: SensorConfig) -> TestSensor {
        DeskHeightSensor::new(
            FakeSerial::default(),
            Heights::default(),
            Events::default(),
            config,
            0,
        )
        .unwrap()
    }

    fn height_frame(value: u16, decimal: bool) -> Vec<u8> {
        HeightDigits::from_value(value, decimal)
            .to_packet()
            .unwrap()
            .encode_to_vec()
            .unwrap()
            .to_vec()
    }

    fn raw_height_frame(hundreds: u8, tens: u8, ones: u8) -> Vec<u8> {
        HeightDigits::new(hundreds, tens, ones)
            .to_packet()
            .unwrap()
            .encode_to_vec()
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_new_reports_config() {
        let s = sensor(fast_config());
        assert_eq!(s.log().0, [SensorEvent::Configured(fast_config())]);
        assert_eq!(s.poll_state(), PollState::BootWait);
        assert_eq!(s.height_cm(), None);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = fast_config();
        config.timing.active_interval_ms = 0;
        let result = DeskHeightSensor::new(
            FakeSerial::default(),
            Heights::default(),
            (),
            config,
            0,
        );
        assert!(matches!(result, Err(ConfigError::ZeroActiveInterval)));
    }

    #[test]
    fn test_whole_centimetre_height_published_once() {
        let mut s = sensor(fast_config());

        // 9B 07 12 06 5B 4F 00 00 9D, checksum bytes are not checked
        s.serial_mut()
            .push(&[0x9B, 0x07, 0x12, 0x06, 0x5B, 0x4F, 0x00, 0x00, 0x9D]);
        s.tick(10);
        assert_eq!(s.sink().0, [123.0]);
        assert_eq!(s.height_cm(), Some(123.0));

        s.serial_mut().push(&height_frame(123, false));
        s.tick(20);
        assert_eq!(s.sink().0, [123.0]);
        assert_eq!(s.log().count(|e| matches!(e, SensorEvent::HeightDecoded { .. })), 2);
        assert_eq!(
            s.log().count(|e| matches!(e, SensorEvent::HeightPublished { .. })),
            1
        );
    }

    #[test]
    fn test_decimal_height() {
        let mut s = sensor(fast_config());
        s.serial_mut()
            .push(&[0x9B, 0x07, 0x12, 0x06, 0xDB, 0x4F, 0x00, 0x00, 0x9D]);
        s.tick(10);
        assert_eq!(s.sink().0, [12.3]);
        assert_eq!(s.published_cm(), Some(12.3));
    }

    #[test]
    fn test_blank_display_is_ignored() {
        let mut s = sensor(fast_config());
        s.serial_mut().push(&raw_height_frame(0x00, 0x00, 0x00));
        s.tick(50);

        assert!(s.sink().0.is_empty());
        assert_eq!(s.height_cm(), None);
        assert_eq!(s.scheduler().last_activity_ms(), 0);
        assert!(s
            .log()
            .0
            .contains(&SensorEvent::ReadingIgnored(IgnoreReason::DisplayWaking)));
    }

    #[test]
    fn test_resetting_display_is_ignored() {
        let mut s = sensor(fast_config());
        s.serial_mut().push(&raw_height_frame(0x40, 0x40, 0x40));
        s.tick(50);

        assert!(s.sink().0.is_empty());
        assert_eq!(s.scheduler().last_activity_ms(), 0);
        assert!(s
            .log()
            .0
            .contains(&SensorEvent::ReadingIgnored(IgnoreReason::Resetting)));
    }

    #[test]
    fn test_resync_after_bad_frame() {
        let mut s = sensor(fast_config());

        let mut stream = vec![0x9B, 0x07, 0x12, 0x06, 0x5B, 0x4F, 0x00, 0x00, 0x00];
        stream.extend(height_frame(745, true));
        s.serial_mut().push(&stream);
        s.tick(10);

        assert_eq!(s.sink().0, [74.5]);
        assert!(s
            .log()
            .0
            .contains(&SensorEvent::FrameRejected(FrameError::BadEndByte(0x00))));
    }

    #[test]
    fn test_frame_split_across_ticks() {
        let mut s = sensor(fast_config());
        let frame = height_frame(98, false);

        s.serial_mut().push(&frame[..4]);
        s.tick(10);
        assert!(s.sink().0.is_empty());

        s.serial_mut().push(&frame[4..]);
        s.tick(20);
        assert_eq!(s.sink().0, [98.0]);
    }

    #[test]
    fn test_drains_more_than_one_chunk() {
        let mut s = sensor(fast_config());
        for value in [700, 701, 702, 703, 704] {
            s.serial_mut().push(&height_frame(value, true));
        }
        assert!(s.serial().rx.len() > READ_CHUNK);

        s.tick(10);
        assert_eq!(s.sink().0, [70.0, 70.1, 70.2, 70.3, 70.4]);
        assert!(s.serial().rx.is_empty());
    }

    #[test]
    fn test_unhandled_and_heartbeat() {
        let mut s = sensor(fast_config());
        s.serial_mut().push(&[0x98, 0x03, 0x15, 0x01, 0x9D]);
        s.serial_mut().push(&[0x98, 0x04, 0x11, 0x7C, 0xC3, 0x9D]);
        s.tick(10);

        assert!(s.sink().0.is_empty());
        assert_eq!(
            s.log().count(|e| matches!(
                e,
                SensorEvent::MessageUnhandled {
                    msg_type: 0x15,
                    length: 3
                }
            )),
            1
        );
    }

    #[test]
    fn test_boot_query_then_idle_polls() {
        let mut s = sensor(fast_config());

        s.tick(50);
        assert!(s.serial().tx.is_empty());

        s.tick(100);
        assert_eq!(s.poll_state(), PollState::Idle);
        assert_eq!(s.serial().tx, [QueryCommand::Wake.bytes().to_vec()]);

        s.tick(600);
        assert_eq!(s.serial().tx.len(), 1);

        s.tick(1100);
        assert_eq!(s.serial().tx.len(), 2);
        assert_eq!(s.serial().tx[1], QueryCommand::Silent.bytes().to_vec());
        assert_eq!(s.log().count(|e| matches!(e, SensorEvent::QuerySent(_))), 2);
    }

    #[test]
    fn test_listen_only_idle() {
        let mut s = sensor(SensorConfig {
            idle_query: None,
            ..fast_config()
        });
        s.tick(100);
        s.tick(1100);
        s.tick(2100);
        assert_eq!(s.serial().tx.len(), 1);
    }

    fn booted_with_baseline(config: SensorConfig) -> TestSensor {
        let mut s = sensor(config);
        s.tick(100);
        s.serial_mut().push(&height_frame(745, true));
        s.tick(150);
        assert_eq!(s.poll_state(), PollState::Idle);
        s
    }

    #[test]
    fn test_movement_switches_to_active_and_back() {
        let mut s = booted_with_baseline(fast_config());

        s.serial_mut().push(&height_frame(752, true));
        s.tick(200);
        assert_eq!(s.poll_state(), PollState::Active);
        assert_eq!(s.scheduler().last_activity_ms(), 200);

        // Active interval is 200 ms from the boot query at 100
        let sent = s.serial().tx.len();
        s.tick(300);
        assert_eq!(s.serial().tx.len(), sent + 1);

        s.tick(699);
        assert_eq!(s.poll_state(), PollState::Active);
        s.tick(700);
        assert_eq!(s.poll_state(), PollState::Idle);

        let transitions: Vec<_> = s
            .log()
            .0
            .iter()
            .filter_map(|e| match e {
                SensorEvent::StateChanged(t) => Some(*t),
                _ => None,
            })
            .collect();
        assert_eq!(
            transitions,
            [
                Transition {
                    from: PollState::BootWait,
                    to: PollState::Idle
                },
                Transition {
                    from: PollState::Idle,
                    to: PollState::Active
                },
                Transition {
                    from: PollState::Active,
                    to: PollState::Idle
                },
            ]
        );
    }

    #[test]
    fn test_unchanged_readings_keep_active_by_default() {
        let mut s = booted_with_baseline(fast_config());
        s.serial_mut().push(&height_frame(752, true));
        s.tick(200);

        for now in [400, 600, 800] {
            s.serial_mut().push(&height_frame(752, true));
            s.tick(now);
        }
        assert_eq!(s.poll_state(), PollState::Active);
        assert_eq!(s.sink().0, [74.5, 75.2]);
    }

    #[test]
    fn test_on_change_policy_times_out_when_still() {
        let mut s = booted_with_baseline(SensorConfig {
            activity: ActivityPolicy::OnChange,
            ..fast_config()
        });
        s.serial_mut().push(&height_frame(752, true));
        s.tick(200);

        for now in [400, 600] {
            s.serial_mut().push(&height_frame(752, true));
            s.tick(now);
        }
        s.tick(700);
        assert_eq!(s.poll_state(), PollState::Idle);
    }

    #[test]
    fn test_read_failure_still_runs_scheduler() {
        let mut s = sensor(fast_config());
        s.serial_mut().fail_reads = true;
        s.tick(100);

        assert_eq!(s.poll_state(), PollState::Idle);
        assert_eq!(s.log().count(|e| *e == SensorEvent::ReadFailed), 1);
        assert_eq!(s.serial().tx.len(), 1);
    }

    #[test]
    fn test_write_failure_is_reported() {
        let mut s = sensor(fast_config());
        s.serial_mut().fail_writes = true;
        s.tick(100);

        assert!(s.serial().tx.is_empty());
        assert!(s
            .log()
            .0
            .contains(&SensorEvent::WriteFailed(QueryCommand::Wake)));
    }

    #[test]
    fn test_configure() {
        let mut s = sensor(fast_config());

        let mut bad = fast_config();
        bad.timing.active_interval_ms = 5000;
        assert_eq!(s.configure(bad), Err(ConfigError::ActiveNotFaster));
        assert_eq!(s.config(), &fast_config());
        assert!(s
            .log()
            .0
            .contains(&SensorEvent::ConfigRejected(ConfigError::ActiveNotFaster)));

        let mut slower = fast_config();
        slower.timing.boot_delay_ms = 1000;
        assert_eq!(s.configure(slower), Ok(()));
        s.tick(500);
        assert_eq!(s.poll_state(), PollState::BootWait);
        s.tick(1000);
        assert_eq!(s.poll_state(), PollState::Idle);
    }

    #[test]
    fn test_poll_uses_clock() {
        struct At(u32);
        impl Clock for At {
            fn now_ms(&self) -> u32 {
                self.0
            }
        }

        let mut s = sensor(fast_config());
        s.poll(&At(99));
        assert_eq!(s.poll_state(), PollState::BootWait);
        s.poll(&At(100));
        assert_eq!(s.poll_state(), PollState::Idle);
    }

    #[test]
    fn test_borrowed_collaborators() {
        let mut heights = Heights::default();
        let mut serial = FakeSerial::default();
        serial.push(&height_frame(101, false));

        let mut s = DeskHeightSensor::new(serial, &mut heights, (), fast_config(), 0).unwrap();
        s.tick(10);
        let (serial, _, ()) = s.release();

        assert!(serial.rx.is_empty());
        assert_eq!(heights.0, [101.0]);
    }

    #[test]
    fn test_error_digits_do_not_publish() {
        let mut s = sensor(fast_config());
        s.serial_mut().push(&raw_height_frame(
            0x79,
            encode(Digit::Value(0), false),
            encode(Digit::Value(5), false),
        ));
        s.tick(10);
        assert!(s.sink().0.is_empty());
        assert_eq!(
            s.log()
                .count(|e| matches!(e, SensorEvent::ReadingIgnored(IgnoreReason::NonNumeric { .. }))),
            1
        );
    }
}
