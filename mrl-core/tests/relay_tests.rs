use std::thread;

use embassy_futures::block_on;
use mrl_core::utils::{
    mocap::{Orientation, Position},
    relay::{
        self, Command, CommandTransport, DispatchError, RelayConfig, Thresholds, WorkerError,
    },
};

/// Rigid-body id the relay follows in these tests.
const TARGET: i32 = 15;
const IDENTITY: Orientation = [0.0, 0.0, 0.0, 1.0];

/// Transport that records every byte written.
#[derive(Default)]
struct RecordingTransport {
    connected: bool,
    refuse_connect: bool,
    ignore_connect: bool,
    fail_writes: bool,
    writes: Vec<u8>,
}

impl CommandTransport for RecordingTransport {
    type Error = &'static str;

    fn is_connected(&self) -> bool {
        self.connected
    }

    async fn connect(&mut self) -> Result<(), Self::Error> {
        if self.refuse_connect {
            return Err("device not found");
        }
        if !self.ignore_connect {
            self.connected = true;
        }
        Ok(())
    }

    async fn write_command(
        &mut self,
        payload: &[u8],
    ) -> Result<(), Self::Error> {
        if self.fail_writes {
            self.connected = false;
            return Err("link lost");
        }
        self.writes.extend_from_slice(payload);
        Ok(())
    }
}

fn along_track(x: f32) -> Position {
    [x, 0.25, 0.1]
}

#[test]
fn test_transition_sequence_writes_each_change_once() {
    let (mut relay, mut worker) =
        relay::split::<_, 8>(RelayConfig::default(), RecordingTransport::default());
    block_on(worker.connect()).unwrap();

    let dispatched: Vec<Command> = [-0.5, -0.5, -1.0, -1.0, -1.5]
        .into_iter()
        .filter_map(|x| relay.on_pose(TARGET, along_track(x), IDENTITY))
        .collect();
    assert_eq!(
        dispatched,
        [Command::Forward, Command::Stop, Command::Backward]
    );

    assert_eq!(block_on(worker.drain()), 3);
    assert_eq!(worker.transport().writes, b"FSB");
    assert_eq!(worker.written(), 3);
}

#[test]
fn test_repeated_command_is_dispatched_once() {
    let (mut relay, mut worker) =
        relay::split::<_, 8>(RelayConfig::default(), RecordingTransport::default());
    block_on(worker.connect()).unwrap();

    assert_eq!(relay.on_pose(TARGET, along_track(2.0), IDENTITY), Some(Command::Forward));
    for i in 0..200 {
        let x = -0.8 + i as f32 * 0.01;
        assert_eq!(relay.on_pose(TARGET, along_track(x), IDENTITY), None);
    }

    assert_eq!(worker.pending(), 1);
    assert_eq!(block_on(worker.process_next()).unwrap(), Command::Forward);
    assert_eq!(worker.pending(), 0);
    assert_eq!(worker.transport().writes, b"F");
}

#[test]
fn test_other_bodies_are_ignored() {
    let (mut relay, mut worker) =
        relay::split::<_, 8>(RelayConfig::default(), RecordingTransport::default());
    block_on(worker.connect()).unwrap();

    for id in [0, 8, 14, 16, -15] {
        for x in [-3.0, -1.0, 3.0] {
            assert_eq!(relay.on_pose(id, along_track(x), IDENTITY), None);
        }
    }
    assert_eq!(relay.last_command(), None);
    assert_eq!(worker.pending(), 0);
}

#[test]
fn test_custom_target_and_thresholds() {
    let config = RelayConfig::new(8, Thresholds::new(0.5, -0.5).unwrap());
    let (mut relay, mut worker) = relay::split::<_, 8>(config, RecordingTransport::default());
    block_on(worker.connect()).unwrap();

    assert_eq!(relay.on_pose(TARGET, along_track(1.0), IDENTITY), None);
    assert_eq!(relay.on_pose(8, along_track(0.0), IDENTITY), Some(Command::Stop));
    assert_eq!(relay.on_pose(8, along_track(-0.6), IDENTITY), Some(Command::Backward));
    block_on(worker.drain());
    assert_eq!(worker.transport().writes, b"SB");
}

#[test]
fn test_invalid_thresholds_are_rejected() {
    assert!(Thresholds::new(-1.1, -0.9).is_err());
    assert!(Thresholds::new(-1.0, -1.0).is_err());
    assert!(Thresholds::new(f32::NAN, -1.0).is_err());
    assert!(Thresholds::new(f32::INFINITY, -1.0).is_err());
    assert_eq!(Thresholds::default().high(), -0.9);
    assert_eq!(Thresholds::default().low(), -1.1);
}

#[test]
fn test_not_connected_drops_without_writing() {
    let (mut relay, worker) =
        relay::split::<_, 8>(RelayConfig::default(), RecordingTransport::default());

    assert_eq!(
        relay.dispatcher().try_send(Command::Forward),
        Err(DispatchError::NotConnected(Command::Forward))
    );
    // `send` swallows the same failure.
    relay.dispatcher().send(Command::Stop);

    assert_eq!(relay.on_pose(TARGET, along_track(0.0), IDENTITY), Some(Command::Forward));
    assert_eq!(worker.pending(), 0);
    assert!(worker.transport().writes.is_empty());
}

#[test]
fn test_command_dropped_while_disconnected_is_not_resent() {
    let (mut relay, mut worker) =
        relay::split::<_, 8>(RelayConfig::default(), RecordingTransport::default());

    relay.on_pose(TARGET, along_track(0.0), IDENTITY);
    block_on(worker.connect()).unwrap();
    assert_eq!(relay.on_pose(TARGET, along_track(0.0), IDENTITY), None);
    assert_eq!(worker.pending(), 0);

    assert_eq!(relay.on_pose(TARGET, along_track(-1.0), IDENTITY), Some(Command::Stop));
    block_on(worker.drain());
    assert_eq!(worker.transport().writes, b"S");
}

#[test]
fn test_full_queue_retries_on_next_pose() {
    let (mut relay, mut worker) =
        relay::split::<_, 2>(RelayConfig::default(), RecordingTransport::default());
    block_on(worker.connect()).unwrap();

    relay.on_pose(TARGET, along_track(0.0), IDENTITY);
    relay.on_pose(TARGET, along_track(-1.0), IDENTITY);
    assert_eq!(
        relay.dispatcher().try_send(Command::Backward),
        Err(DispatchError::QueueFull(Command::Backward))
    );

    assert_eq!(relay.on_pose(TARGET, along_track(-2.0), IDENTITY), None);
    assert_eq!(relay.last_command(), Some(Command::Stop));
    assert_eq!(worker.pending(), 2);

    block_on(worker.drain());
    assert_eq!(relay.on_pose(TARGET, along_track(-2.0), IDENTITY), Some(Command::Backward));
    block_on(worker.drain());
    assert_eq!(worker.transport().writes, b"FSB");
    assert_eq!(relay.last_command(), Some(Command::Backward));
}

#[test]
fn test_failed_write_marks_link_down() {
    let (mut relay, mut worker) =
        relay::split::<_, 8>(RelayConfig::default(), RecordingTransport::default());
    block_on(worker.connect()).unwrap();
    worker.transport_mut().fail_writes = true;

    relay.on_pose(TARGET, along_track(0.0), IDENTITY);
    assert!(matches!(
        block_on(worker.process_next()),
        Err(WorkerError::Transport("link lost"))
    ));
    assert!(!worker.link().is_connected());
    assert!(!relay.dispatcher().link().is_connected());
    assert_eq!(worker.written(), 0);

    assert_eq!(relay.on_pose(TARGET, along_track(-2.0), IDENTITY), Some(Command::Backward));
    assert_eq!(worker.pending(), 0);
}

#[test]
fn test_connect_failures_leave_link_down() {
    let refused = RecordingTransport {
        refuse_connect: true,
        ..Default::default()
    };
    let (relay, mut worker) = relay::split::<_, 8>(RelayConfig::default(), refused);
    assert!(matches!(
        block_on(worker.connect()),
        Err(WorkerError::Transport("device not found"))
    ));
    assert!(!relay.dispatcher().link().is_connected());

    let silent = RecordingTransport {
        ignore_connect: true,
        ..Default::default()
    };
    let (relay, mut worker) = relay::split::<_, 8>(RelayConfig::default(), silent);
    assert!(matches!(
        block_on(worker.connect()),
        Err(WorkerError::NotConnected)
    ));
    assert!(!relay.dispatcher().link().is_connected());
}

#[test]
fn test_boxed_listener_dispatches() {
    let (relay, mut worker) =
        relay::split::<_, 8>(RelayConfig::default(), RecordingTransport::default());
    block_on(worker.connect()).unwrap();

    let mut listener = relay.into_listener();
    listener(TARGET, along_track(-5.0), IDENTITY);
    listener(TARGET, along_track(-5.0), IDENTITY);
    listener(3, along_track(5.0), IDENTITY);

    block_on(worker.drain());
    assert_eq!(worker.transport().writes, b"B");
}

#[test]
fn test_alternating_callbacks_across_threads_keep_order() {
    const CALLBACKS: usize = 1000;

    let (mut relay, mut worker) =
        relay::split::<_, 1024>(RelayConfig::default(), RecordingTransport::default());
    block_on(worker.connect()).unwrap();

    let producer = thread::spawn(move || {
        let mut dispatched = Vec::with_capacity(CALLBACKS);
        for i in 0..CALLBACKS {
            let x = if i % 2 == 0 { -0.5 } else { -1.5 };
            dispatched.extend(relay.on_pose(TARGET, along_track(x), IDENTITY));
        }
        dispatched
    });

    let written = block_on(async {
        let mut written = Vec::with_capacity(CALLBACKS);
        while written.len() < CALLBACKS {
            written.push(worker.process_next().await.unwrap());
        }
        written
    });
    let dispatched = producer.join().unwrap();

    assert_eq!(dispatched.len(), CALLBACKS);
    assert_eq!(written, dispatched);
    for (i, command) in written.iter().enumerate() {
        let expected = if i % 2 == 0 {
            Command::Forward
        } else {
            Command::Backward
        };
        assert_eq!(*command, expected, "write {}", i);
    }
    assert_eq!(worker.transport().writes.len(), CALLBACKS);
    assert_eq!(worker.pending(), 0);
}

#[test]
fn test_alternating_callbacks_at_service_depth_never_lose_a_transition() {
    const CALLBACKS: usize = 1000;

    let (mut relay, mut worker) =
        relay::split::<_, 32>(RelayConfig::default(), RecordingTransport::default());
    block_on(worker.connect()).unwrap();

    let producer = thread::spawn(move || {
        let mut dispatched = Vec::with_capacity(CALLBACKS);
        for i in 0..CALLBACKS {
            let x = if i % 2 == 0 { -0.5 } else { -1.5 };
            dispatched.extend(relay.on_pose(TARGET, along_track(x), IDENTITY));
        }
        (dispatched, relay)
    });

    let mut written = Vec::new();
    while !producer.is_finished() || worker.pending() > 0 {
        if worker.pending() > 0 {
            written.push(block_on(worker.process_next()).unwrap());
        }
    }
    let (dispatched, relay) = producer.join().unwrap();

    assert!(!written.is_empty());
    assert_eq!(written, dispatched);
    assert_eq!(written.first(), Some(&Command::Forward));
    for pair in written.windows(2) {
        assert_ne!(pair[0], pair[1], "duplicate transition");
    }
    assert_eq!(written.last().copied(), relay.last_command());
    assert_eq!(worker.transport().writes.len(), written.len());
}

#[test]
fn test_command_tokens() {
    assert_eq!(Command::Forward.payload(), *b"F");
    assert_eq!(Command::Backward.payload(), *b"B");
    assert_eq!(Command::Stop.payload(), *b"S");
    for command in Command::ALL {
        assert_eq!(Command::from_token(command.token()), Some(command));
        assert_eq!(command.to_string().as_bytes(), &command.payload()[..]);
    }
    assert_eq!(Command::from_token(b'f'), None);
    assert_eq!(Command::from_token(b'X'), None);
}
