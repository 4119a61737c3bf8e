// Copyright 2025 evcam contributors
// SPDX-License-Identifier: Apache-2.0

//! Synthetic event stream demo.
//!
//! Simulates the external transport: a producer thread emits event batches
//! tracing a moving dot, the camera-info handshake arrives shortly after
//! startup, and the periodic publisher writes CD frames as PNGs into
//! `./cd_frames`. Run with:
//!
//! ```sh
//! cargo run --example synthetic_stream
//! ```

use evcam_config::ViewerConfig;
use evcam_structures::{Event, EventBatch, Polarity};
use evcam_viewer::{caption_text, PngDirPublisher, ViewerNode};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const WIDTH: u32 = 320;
const HEIGHT: u32 = 240;
const RUN_FOR: Duration = Duration::from_secs(2);

fn now_us() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_micros() as u64)
        .unwrap_or(0)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut config = ViewerConfig::default();
    config.sensor_name = "synthetic".to_string();
    let node = ViewerNode::new(config);

    // Camera-info handshake (in the real system this comes from transport).
    node.on_camera_geometry(WIDTH, HEIGHT).expect("init failed");

    // Producer thread: a dot circling the frame center, ON events on the
    // leading edge and OFF events trailing behind.
    let sink = node.event_sink();
    let producer = thread::spawn(move || {
        let (cx, cy) = (WIDTH as f64 / 2.0, HEIGHT as f64 / 2.0);
        let radius = 60.0;
        let started = std::time::Instant::now();
        let mut step = 0u64;

        while started.elapsed() < RUN_FOR {
            let angle = step as f64 * 0.05;
            let x = (cx + radius * angle.cos()) as u16;
            let y = (cy + radius * angle.sin()) as u16;
            let trail_angle = angle - 0.4;
            let tx = (cx + radius * trail_angle.cos()) as u16;
            let ty = (cy + radius * trail_angle.sin()) as u16;

            let t = now_us();
            let batch = EventBatch::new(
                t,
                vec![
                    Event::new(x, y, Polarity::On, t),
                    Event::new(tx, ty, Polarity::Off, t),
                ],
            );
            if sink.ingest(batch).is_err() {
                break;
            }
            step += 1;
            thread::sleep(Duration::from_millis(1));
        }
    });

    let publisher = Arc::new(PngDirPublisher::new("cd_frames").expect("output dir"));
    let mut periodic = node.make_publisher(publisher);
    let shutdown = periodic.shutdown_handle();

    let timer = thread::spawn(move || {
        thread::sleep(RUN_FOR);
        shutdown.store(true, Ordering::Release);
    });

    periodic.run();

    producer.join().expect("producer thread");
    timer.join().expect("timer thread");
    node.shutdown();

    let last = node.engine().snapshot();
    println!("done: {}", caption_text(&last));
}
