//! Capture reconfiguration sequence
//!
//! Applying new settings runs a fixed command sequence against the service:
//! stop the stream, change device and window length in parallel, then start
//! again. Every step is best-effort. A failed stop or a rejected setting is
//! logged and the sequence keeps going, so the stream always gets its
//! restart attempt and a request is never retried.

use tokio::sync::oneshot;

use super::error::CaptureError;
use super::service::{CaptureCommand, CaptureHandle};
use crate::curve;

/// A confirmed settings edit, consumed by [`reconfigure`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReconfigurationRequest {
    /// Target input device name
    pub device: String,
    /// Target resolution multiplier
    pub multiplier: f32,
}

/// Apply a settings edit to the capture service.
///
/// Runs, in order:
/// 1. stop the stream, continuing past failure,
/// 2. set device and window length concurrently, awaiting both,
/// 3. dispatch a stream start.
///
/// Returns once the start command is in the service queue. Its outcome is
/// awaited and logged on a background task, so callers never wait on the
/// restart itself.
pub async fn reconfigure(handle: CaptureHandle, request: ReconfigurationRequest) {
    log::info!(
        "Reconfiguring capture: device {}, multiplier {:.3}",
        request.device,
        request.multiplier
    );

    if let Err(e) = handle.stop().await {
        log::warn!("Failed to stop capture stream, continuing: {}", e);
    }

    let samples = curve::multiplier_to_samples(request.multiplier);
    let (device_result, resolution_result) = tokio::join!(
        handle.set_device(&request.device),
        handle.set_resolution(samples),
    );
    if let Err(e) = device_result {
        log::warn!("Failed to change capture device: {}", e);
    }
    if let Err(e) = resolution_result {
        log::warn!("Failed to set capture resolution: {}", e);
    }

    let (reply, outcome) = oneshot::channel();
    if handle
        .command_tx
        .send(CaptureCommand::Start { reply })
        .is_ok()
    {
        tokio::spawn(async move {
            match outcome.await {
                Ok(Ok(())) => log::info!("Capture stream restarted"),
                Ok(Err(e)) => log::error!("Failed to restart capture stream: {}", e),
                Err(_) => log::error!("Capture service dropped the restart reply"),
            }
        });
    } else {
        log::error!(
            "Failed to restart capture stream: {}",
            CaptureError::ServiceStopped
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::error::CaptureResult;
    use crossbeam::channel::Receiver;
    use std::thread;

    /// Fake service that records the order commands arrive in and replies
    /// according to a script. Exits once it has seen a start.
    fn scripted_service(fail_stop: bool) -> (CaptureHandle, Receiver<&'static str>, thread::JoinHandle<()>) {
        let (command_tx, command_rx) = crossbeam::channel::unbounded();
        let (ops_tx, ops_rx) = crossbeam::channel::unbounded();

        let worker = thread::spawn(move || {
            while let Ok(command) = command_rx.recv() {
                match command {
                    CaptureCommand::Stop { reply } => {
                        let _ = ops_tx.send("stop");
                        let result: CaptureResult<()> = if fail_stop {
                            Err(CaptureError::StreamPlayError("scripted failure".to_string()))
                        } else {
                            Ok(())
                        };
                        let _ = reply.send(result);
                    }
                    CaptureCommand::SetDevice { name, reply } => {
                        let _ = ops_tx.send("set_device");
                        let _ = reply.send(Ok(name));
                    }
                    CaptureCommand::SetResolution { reply, .. } => {
                        let _ = ops_tx.send("set_resolution");
                        let _ = reply.send(Ok(()));
                    }
                    CaptureCommand::Start { reply } => {
                        let _ = ops_tx.send("start");
                        let _ = reply.send(Ok(()));
                        break;
                    }
                    _ => {}
                }
            }
        });

        (CaptureHandle { command_tx }, ops_rx, worker)
    }

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    fn request() -> ReconfigurationRequest {
        ReconfigurationRequest {
            device: "Default".to_string(),
            multiplier: 1.0,
        }
    }

    #[test]
    fn test_sequence_runs_stop_settings_start_in_order() {
        let rt = runtime();
        let (handle, ops, worker) = scripted_service(false);

        rt.block_on(reconfigure(handle, request()));
        worker.join().unwrap();

        let order: Vec<&str> = ops.try_iter().collect();
        assert_eq!(order.len(), 4);
        assert_eq!(order[0], "stop");
        assert!(order[1..3].contains(&"set_device"));
        assert!(order[1..3].contains(&"set_resolution"));
        assert_eq!(order[3], "start");
    }

    #[test]
    fn test_failed_stop_does_not_block_the_sequence() {
        let rt = runtime();
        let (handle, ops, worker) = scripted_service(true);

        rt.block_on(reconfigure(handle, request()));
        worker.join().unwrap();

        let order: Vec<&str> = ops.try_iter().collect();
        assert_eq!(order[0], "stop");
        assert_eq!(order.last(), Some(&"start"));
        assert_eq!(order.len(), 4);
    }

    #[test]
    fn test_multiplier_travels_as_window_samples() {
        let rt = runtime();
        let (command_tx, command_rx) = crossbeam::channel::unbounded();
        let handle = CaptureHandle { command_tx };

        let worker = thread::spawn(move || {
            let mut samples_seen = None;
            while let Ok(command) = command_rx.recv() {
                match command {
                    CaptureCommand::Stop { reply } => {
                        let _ = reply.send(Ok(()));
                    }
                    CaptureCommand::SetDevice { name, reply } => {
                        let _ = reply.send(Ok(name));
                    }
                    CaptureCommand::SetResolution { samples, reply } => {
                        samples_seen = Some(samples);
                        let _ = reply.send(Ok(()));
                    }
                    CaptureCommand::Start { reply } => {
                        let _ = reply.send(Ok(()));
                        break;
                    }
                    _ => {}
                }
            }
            samples_seen
        });

        rt.block_on(reconfigure(
            handle,
            ReconfigurationRequest {
                device: "Default".to_string(),
                multiplier: 0.5,
            },
        ));

        assert_eq!(worker.join().unwrap(), Some(512));
    }

    #[test]
    fn test_returns_without_waiting_for_restart_outcome() {
        let rt = runtime();
        let (command_tx, command_rx) = crossbeam::channel::unbounded();
        let handle = CaptureHandle { command_tx };

        // Never replies to start; reconfigure must return anyway
        let worker = thread::spawn(move || {
            while let Ok(command) = command_rx.recv() {
                match command {
                    CaptureCommand::Stop { reply } => {
                        let _ = reply.send(Ok(()));
                    }
                    CaptureCommand::SetDevice { name, reply } => {
                        let _ = reply.send(Ok(name));
                    }
                    CaptureCommand::SetResolution { reply, .. } => {
                        let _ = reply.send(Ok(()));
                    }
                    CaptureCommand::Start { reply } => {
                        drop(reply);
                        break;
                    }
                    _ => {}
                }
            }
        });

        rt.block_on(reconfigure(handle, request()));
        worker.join().unwrap();
    }

    #[test]
    fn test_degrades_quietly_when_service_is_gone() {
        let rt = runtime();
        let (command_tx, command_rx) = crossbeam::channel::unbounded();
        drop(command_rx);
        let handle = CaptureHandle { command_tx };

        // Every step fails fast; nothing panics and nothing hangs
        rt.block_on(reconfigure(handle, request()));
    }
}
