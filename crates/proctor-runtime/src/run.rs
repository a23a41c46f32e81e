//! `proctor run` and `proctor health`.
//! Wires the controller to a detector feed and drives ticks, observations,
//! and shutdown through one select loop.

use std::time::Duration;

use chrono::Utc;
use tokio::sync::mpsc;
use tracing::info;

use proctor_backend::BackendClient;
use proctor_camera::{CameraController, DeviceCapture};
use proctor_core::DetectorObservation;
use proctor_feed::SimulatedDetector;
use proctor_session::{SessionController, SessionError};

use crate::cli::RunOpts;
use crate::render;

pub async fn cmd_run(socket_path: &str, opts: RunOpts) -> anyhow::Result<()> {
    let gateway = BackendClient::new(socket_path);
    let camera = CameraController::new(DeviceCapture::new(&opts.camera_device));
    let mut controller = SessionController::new(camera, gateway);

    controller.probe_backend().await;

    if let Err(err) = controller.start(&opts.candidate, Utc::now()).await {
        eprintln!("{err}");
        if let SessionError::Camera(camera_err) = &err {
            eprintln!("{}", camera_err.hint());
        }
        anyhow::bail!("could not start session");
    }

    println!(
        "Recording started for {} (session {})",
        controller.session().candidate_name,
        controller.session().session_id
    );
    println!("Press Ctrl-C to stop.");

    let (tx, mut rx) = mpsc::channel::<DetectorObservation>(64);
    let mut detector = SimulatedDetector::new().with_event_chance(opts.event_chance);
    if let Some(seed) = opts.seed {
        detector = detector.with_seed(seed);
    }
    let feed = tokio::spawn(detector.run(tx));
    let mut shutdown = tokio::spawn(shutdown_signal());

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    // The first tick fires immediately; consume it so the first counted
    // second elapses a full second after start.
    ticker.tick().await;

    let mut feed_done = false;
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                controller.tick();
                let elapsed = controller.session().duration_seconds;
                if opts.duration_limit.is_some_and(|limit| elapsed >= limit) {
                    info!(elapsed, "duration limit reached");
                    break;
                }
            }
            maybe_obs = rx.recv(), if !feed_done => {
                match maybe_obs {
                    Some(obs) => {
                        if let Some(event) = controller.ingest(obs).await {
                            println!("{}", render::live_event_line(&event));
                        }
                    }
                    None => feed_done = true,
                }
            }
            _ = &mut shutdown => {
                break;
            }
        }
    }

    feed.abort();
    shutdown.abort();
    let report = controller.stop(Utc::now()).await?;

    if opts.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        print!("{}", render::render_report(&report));
    }
    Ok(())
}

pub async fn cmd_health(socket_path: &str) -> anyhow::Result<()> {
    let client = BackendClient::new(socket_path);
    match client.health_check().await {
        Ok(health) => println!("{}", health.status),
        Err(_) => println!("offline"),
    }
    Ok(())
}

/// Resolves on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();

    #[cfg(unix)]
    {
        let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to register SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("received ctrl-c, stopping session"),
            _ = sigterm.recv() => info!("received SIGTERM, stopping session"),
        }
    }

    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("received ctrl-c, stopping session");
    }
}
