//! # Redial Control Example
//!
//! Shows how an operator drives the scheduler while it dials.
//!
//! Demonstrates:
//! - Queueing failed calls for redial
//! - Start, pause, resume and stop
//! - Changing the retry policy at runtime
//! - Reading status and queue stats
//!
//! ## Run
//! ```bash
//! cargo run --example redial
//! ```

use std::time::Duration;

use redialvisor::{
    CallOutcome, DialError, DialFn, DialRequest, DialResponse, PolicyPatch, RedialRequest,
    RedialScheduler, SchedulerConfig,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Busy on the first try, answered after that.
    let gateway = DialFn::arc("demo-provider", |req: DialRequest| async move {
        tokio::time::sleep(Duration::from_millis(300)).await;
        println!(
            "{:>4}[dial] {} attempt #{}",
            "", req.phone_number, req.attempt
        );
        if req.attempt < 2 {
            Ok::<_, DialError>(DialResponse::failed("busy"))
        } else {
            Ok(DialResponse::connected(format!("call-{}", req.phone_number)))
        }
    });

    let cfg = SchedulerConfig {
        tick_interval: Duration::from_millis(500),
        pacing: Duration::from_millis(200),
        ..SchedulerConfig::default()
    };
    let sched = RedialScheduler::builder(gateway).with_config(cfg).build();
    sched
        .update_config(PolicyPatch {
            max_attempts: Some(3),
            delay_between_attempts: Some(Duration::from_secs(1)),
            ..PolicyPatch::default()
        })
        .await?;

    // ============================================================
    // Demo 1: Queue failed calls and start dialing
    // ============================================================
    for (name, phone) in [("Ada", "+15550100"), ("Grace", "+15550101")] {
        let req = RedialRequest::new(
            format!("contact-{name}"),
            name,
            phone,
            "agent-1",
            CallOutcome::NoAnswer,
        );
        let outcome = sched.enqueue(req).await;
        println!(" ─► Enqueued {phone}: {outcome:?}");
    }

    println!(" ─► Starting...");
    sched.start().await?;
    tokio::time::sleep(Duration::from_millis(800)).await;
    println!(" ─► Status: {:?}", sched.status().await);

    // ============================================================
    // Demo 2: Pause, then resume
    // ============================================================
    println!(" ─► Pausing...");
    sched.pause().await?;
    tokio::time::sleep(Duration::from_secs(2)).await;
    println!(" ─► Status: {:?}", sched.status().await);

    println!(" ─► Resuming...");
    sched.resume().await?;
    tokio::time::sleep(Duration::from_secs(3)).await;

    // ============================================================
    // Demo 3: Inspect the queue
    // ============================================================
    for item in sched.list_queue().await {
        println!(
            " ─► {} status={:?} attempts={}",
            item.phone_number, item.status, item.attempts
        );
    }
    println!(" ─► Stats: {:?}", sched.stats().await);

    // ============================================================
    // Demo 4: Stop and shut down
    // ============================================================
    println!(" ─► Stopping...");
    sched.stop().await;
    sched.shutdown().await?;
    println!(" ─► Status: {:?}", sched.status().await);

    println!("Done");
    Ok(())
}
