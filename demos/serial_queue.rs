//! # Serial Queue Example
//!
//! Shows deferred delivery: a renderer receives frames on its own FIFO queue
//! while the publisher keeps going.
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventcenter=trace cargo run --example serial_queue
//! ```

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use eventcenter::{event_kind, EventCenter, SerialQueue};

event_kind!(FrameReady => u32);

struct Renderer;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let center = EventCenter::new();
    let render_queue = SerialQueue::new("render");
    let renderer = Arc::new(Renderer);

    center.add_observer_on::<FrameReady, _, _, _>(&renderer, render_queue.clone(), |frame| {
        std::thread::sleep(Duration::from_millis(5));
        println!("[render] frame {frame}");
    });

    for frame in 0..10 {
        let report = center.trigger::<FrameReady>(frame);
        println!("[publisher] frame {frame} scheduled={}", report.scheduled);
    }

    render_queue.shutdown().await;
    println!("render queue drained");
}
