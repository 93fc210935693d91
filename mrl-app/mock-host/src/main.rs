mod ble;
mod mocap;

use std::sync::Arc;

use ble::MockBleLink;
use clap::Parser;
use embassy_executor::{Executor, Spawner};
use embassy_time::{Duration, Timer};
use mocap::{SimulatedMocap, Trajectory};
use mrl_core::utils::{
    mocap::{PoseEstimator, PoseSource},
    relay::{
        self, DEFAULT_HIGH_THRESHOLD, DEFAULT_LOW_THRESHOLD, DEFAULT_TARGET_ID, RelayConfig,
        Thresholds, TransportWorker,
    },
};
use static_cell::StaticCell;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Commands the mocap thread may queue ahead of the BLE writer.
const QUEUE_DEPTH: usize = 32;

type Worker = TransportWorker<MockBleLink, QUEUE_DEPTH>;

#[derive(Parser, Debug)]
#[clap(version = "1.0")]
struct Opts {
    /// Mocap rigid-body id of the robot
    #[clap(long, default_value_t = DEFAULT_TARGET_ID)]
    target_id: i32,
    /// Drive forward when x is above this
    #[clap(long, default_value_t = DEFAULT_HIGH_THRESHOLD, allow_negative_numbers = true)]
    high: f32,
    /// Drive backward when x is below this
    #[clap(long, default_value_t = DEFAULT_LOW_THRESHOLD, allow_negative_numbers = true)]
    low: f32,
    /// Simulated mocap frame rate
    #[clap(long, default_value_t = 120)]
    rate_hz: u32,
    /// Centre of the simulated x trajectory
    #[clap(long, default_value_t = -1.0, allow_negative_numbers = true)]
    center: f32,
    /// Amplitude of the simulated x trajectory
    #[clap(long, default_value_t = 0.5)]
    amplitude: f32,
    /// Period of the simulated x trajectory in seconds
    #[clap(long, default_value_t = 8.0)]
    period_secs: f32,
    /// Id of a second rigid body the relay must ignore
    #[clap(long, default_value_t = 8)]
    distractor_id: i32,
    /// Simulated BLE scan/connect latency
    #[clap(long, default_value_t = 500)]
    connect_delay_ms: u64,
    /// Seconds between pose reports
    #[clap(long, default_value_t = 1)]
    report_interval_secs: u64,
    /// Log mocap samples of the robot at debug level
    #[clap(long)]
    debug_print: bool,
    /// Samples between debug lines (default 100)
    #[clap(long)]
    print_interval: Option<u32>,
}

#[embassy_executor::task]
async fn transport_task(mut worker: Worker) -> ! {
    worker.run().await
}

#[embassy_executor::task]
async fn report_task(
    estimator: Arc<PoseEstimator>,
    interval: Duration,
) -> ! {
    loop {
        Timer::after(interval).await;
        let pose = estimator.pose();
        info!(
            x = pose.x,
            y = pose.y,
            z = pose.z,
            heading = pose.heading(),
            samples = estimator.samples(),
            "Current pose"
        );
    }
}

#[embassy_executor::task]
async fn main_task(
    spawner: Spawner,
    opts: Opts,
) {
    let thresholds = match Thresholds::new(opts.high, opts.low) {
        Ok(thresholds) => thresholds,
        Err(error) => {
            error!(%error, "refusing to start");
            return;
        }
    };
    let config = RelayConfig::new(opts.target_id, thresholds);
    let link = MockBleLink::new(Duration::from_millis(opts.connect_delay_ms));
    let (mut relay, mut worker) = relay::split::<_, QUEUE_DEPTH>(config, link);

    if let Err(error) = worker.connect().await {
        error!(?error, "Device not found.");
        return;
    }
    spawner.spawn(transport_task(worker)).unwrap();

    let mut estimator = PoseEstimator::new(opts.target_id);
    if opts.debug_print {
        estimator = estimator.with_debug_print(opts.print_interval);
    }
    let estimator = Arc::new(estimator);
    let mut mocap = SimulatedMocap::new(
        opts.target_id,
        opts.distractor_id,
        opts.rate_hz,
        Trajectory {
            center: opts.center,
            amplitude: opts.amplitude,
            period: std::time::Duration::from_secs_f32(opts.period_secs.max(0.1)),
        },
    );
    let poses = estimator.clone();
    mocap.set_rigid_body_listener(Box::new(move |id, position, orientation| {
        poses.on_pose(id, position, orientation);
        relay.on_pose(id, position, orientation);
    }));
    if let Err(error) = mocap.run() {
        error!(?error, "Mocap stream failed to start.");
        return;
    }
    info!("Mocap started. Move robot to trigger commands.");

    spawner
        .spawn(report_task(
            estimator,
            Duration::from_secs(opts.report_interval_secs.max(1)),
        ))
        .unwrap();

    // Keep the stream alive for the life of the process.
    loop {
        Timer::after_secs(3600).await;
    }
}

static EXECUTOR: StaticCell<Executor> = StaticCell::new();

fn main() {
    let filter = EnvFilter::from_default_env()
        .add_directive("mrl_core=info".parse().unwrap_or_default())
        .add_directive("mock_host=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let opts = Opts::parse();
    info!(?opts, "Mocap relay (simulated rig)");
    let executor = EXECUTOR.init(Executor::new());
    executor.run(|spawner| {
        spawner.spawn(main_task(spawner, opts)).unwrap();
    });
}
