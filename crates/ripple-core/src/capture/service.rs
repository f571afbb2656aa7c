//! Capture service thread and its client handle
//!
//! The service owns all cpal state. Commands arrive over a crossbeam
//! channel, request-reply commands carry a oneshot sender for the answer,
//! and captured batches leave through a single-slot signal mailbox where a
//! fresh batch displaces an unconsumed one.

use std::collections::VecDeque;
use std::thread;

use crossbeam::channel::{Receiver, Sender};
use tokio::sync::oneshot;

use super::device;
use super::error::{CaptureError, CaptureResult};
use super::stream::{self, ActiveCapture};

/// Commands sent to the capture service
pub enum CaptureCommand {
    /// Build and start the capture stream for the current device selection.
    /// An already-running stream is replaced, so start doubles as restart.
    Start {
        reply: oneshot::Sender<CaptureResult<()>>,
    },
    /// Drop the capture stream
    Stop {
        reply: oneshot::Sender<CaptureResult<()>>,
    },
    /// Snapshot the sample window and publish it to the signal mailbox
    Emit,
    /// List input device names, "Default" first
    ListDevices {
        reply: oneshot::Sender<CaptureResult<Vec<String>>>,
    },
    /// Name of the currently selected input device
    CurrentDevice {
        reply: oneshot::Sender<CaptureResult<String>>,
    },
    /// Select an input device by name; replies with the accepted name
    SetDevice {
        name: String,
        reply: oneshot::Sender<CaptureResult<String>>,
    },
    /// Current window length in samples
    Resolution {
        reply: oneshot::Sender<CaptureResult<u32>>,
    },
    /// Set the window length in samples
    SetResolution {
        samples: u32,
        reply: oneshot::Sender<CaptureResult<()>>,
    },
    /// Terminate the service thread
    Shutdown,
}

/// Handle returned by [`CaptureService::spawn`]
///
/// Keeps the command channel, the signal mailbox receiver and the service
/// thread's join handle together so the process can shut down cleanly.
pub struct ServiceHandle {
    /// Channel for sending commands to the service
    pub command_tx: Sender<CaptureCommand>,
    /// Receiving end of the single-slot signal mailbox
    pub signal_rx: Receiver<Vec<f32>>,
    /// Thread handle for the service
    pub thread_handle: Option<thread::JoinHandle<()>>,
}

/// Capture service state, owned by its thread
pub struct CaptureService {
    command_rx: Receiver<CaptureCommand>,
    signal_tx: Sender<Vec<f32>>,
    /// Service-side receiver used to displace a stale batch
    signal_rx: Receiver<Vec<f32>>,
    /// Selected device; `None` is the host default
    device: Option<String>,
    /// Window length in samples
    window_len: usize,
    /// Rolling mono window, oldest sample first
    window: VecDeque<f32>,
    /// Running stream, if any
    active: Option<ActiveCapture>,
}

impl CaptureService {
    /// Spawn the service on its own thread.
    ///
    /// `window_samples` is the initial window length. The stream is not
    /// started here; send [`CaptureCommand::Start`] for that.
    pub fn spawn(window_samples: u32) -> CaptureResult<ServiceHandle> {
        let (command_tx, command_rx) = crossbeam::channel::unbounded();
        let (signal_tx, signal_rx) = crossbeam::channel::bounded(1);

        // The service holds the cpal stream, which is not `Send`, so the
        // struct is assembled on the thread it lives on.
        let service_signal_rx = signal_rx.clone();
        let thread_handle = thread::Builder::new()
            .name("capture-service".to_string())
            .spawn(move || {
                let service = CaptureService {
                    command_rx,
                    signal_tx,
                    signal_rx: service_signal_rx,
                    device: None,
                    window_len: window_samples as usize,
                    window: VecDeque::with_capacity(window_samples as usize),
                    active: None,
                };
                service.run()
            })
            .map_err(|e| CaptureError::SpawnError(e.to_string()))?;

        Ok(ServiceHandle {
            command_tx,
            signal_rx,
            thread_handle: Some(thread_handle),
        })
    }

    /// Main service loop. Runs until shutdown or channel disconnect.
    fn run(mut self) {
        log::info!("CaptureService started");

        while let Ok(command) = self.command_rx.recv() {
            match command {
                CaptureCommand::Shutdown => {
                    log::info!("CaptureService shutting down");
                    break;
                }
                command => self.handle_command(command),
            }
        }

        // The stream drops here, on the thread that built it
        log::info!("CaptureService stopped");
    }

    fn handle_command(&mut self, command: CaptureCommand) {
        match command {
            CaptureCommand::Start { reply } => {
                let _ = reply.send(self.start());
            }
            CaptureCommand::Stop { reply } => {
                self.active = None;
                log::info!("Capture stream stopped");
                let _ = reply.send(Ok(()));
            }
            CaptureCommand::Emit => self.emit(),
            CaptureCommand::ListDevices { reply } => {
                let _ = reply.send(Ok(device::input_device_names()));
            }
            CaptureCommand::CurrentDevice { reply } => {
                let name = self
                    .device
                    .clone()
                    .unwrap_or_else(|| device::DEFAULT_DEVICE.to_string());
                let _ = reply.send(Ok(name));
            }
            CaptureCommand::SetDevice { name, reply } => {
                let _ = reply.send(self.set_device(name));
            }
            CaptureCommand::Resolution { reply } => {
                let _ = reply.send(Ok(self.window_len as u32));
            }
            CaptureCommand::SetResolution { samples, reply } => {
                self.set_resolution(samples as usize);
                let _ = reply.send(Ok(()));
            }
            // Handled in run()
            CaptureCommand::Shutdown => {}
        }
    }

    fn start(&mut self) -> CaptureResult<()> {
        self.active = None;
        self.active = Some(stream::open(self.device.as_deref())?);
        log::info!(
            "Capture stream started on {}",
            self.device.as_deref().unwrap_or(device::DEFAULT_DEVICE)
        );
        Ok(())
    }

    fn set_device(&mut self, name: String) -> CaptureResult<String> {
        if name == device::DEFAULT_DEVICE {
            self.device = None;
        } else {
            if !device::is_input_device(&name) {
                return Err(CaptureError::DeviceNotFound(name));
            }
            self.device = Some(name.clone());
        }

        log::info!("Capture device set to {}", name);
        Ok(name)
    }

    fn set_resolution(&mut self, samples: usize) {
        self.window_len = samples;
        while self.window.len() > self.window_len {
            self.window.pop_front();
        }
        log::info!("Capture window set to {} samples", samples);
    }

    /// Drain freshly captured samples into the window and publish a
    /// snapshot, displacing an unconsumed batch if the UI is behind.
    fn emit(&mut self) {
        if let Some(active) = self.active.as_mut() {
            while let Some(sample) = active.pop() {
                self.window.push_back(sample);
                if self.window.len() > self.window_len {
                    self.window.pop_front();
                }
            }
        }

        let batch: Vec<f32> = self.window.iter().copied().collect();
        if self.signal_tx.is_full() {
            let _ = self.signal_rx.try_recv();
        }
        let _ = self.signal_tx.try_send(batch);
    }
}

/// Cloneable client for the capture service
///
/// Request-reply methods are async: they enqueue a command and await its
/// oneshot reply. A service that has gone away surfaces as
/// [`CaptureError::ServiceStopped`].
#[derive(Clone)]
pub struct CaptureHandle {
    pub(crate) command_tx: Sender<CaptureCommand>,
}

impl CaptureHandle {
    /// Create a new client from a service handle
    pub fn new(handle: &ServiceHandle) -> Self {
        Self {
            command_tx: handle.command_tx.clone(),
        }
    }

    /// Start (or restart) the capture stream
    pub async fn start(&self) -> CaptureResult<()> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(CaptureCommand::Start { reply })
            .map_err(|_| CaptureError::ServiceStopped)?;
        rx.await.map_err(|_| CaptureError::ServiceStopped)?
    }

    /// Stop the capture stream
    pub async fn stop(&self) -> CaptureResult<()> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(CaptureCommand::Stop { reply })
            .map_err(|_| CaptureError::ServiceStopped)?;
        rx.await.map_err(|_| CaptureError::ServiceStopped)?
    }

    /// Ask the service to publish the current sample window.
    ///
    /// Fire-and-forget: an undeliverable request is dropped and the next
    /// periodic tick tries again.
    pub fn request_emit(&self) {
        let _ = self.command_tx.send(CaptureCommand::Emit);
    }

    /// List input device names, "Default" first
    pub async fn list_devices(&self) -> CaptureResult<Vec<String>> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(CaptureCommand::ListDevices { reply })
            .map_err(|_| CaptureError::ServiceStopped)?;
        rx.await.map_err(|_| CaptureError::ServiceStopped)?
    }

    /// Name of the currently selected input device
    pub async fn current_device(&self) -> CaptureResult<String> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(CaptureCommand::CurrentDevice { reply })
            .map_err(|_| CaptureError::ServiceStopped)?;
        rx.await.map_err(|_| CaptureError::ServiceStopped)?
    }

    /// Select an input device by name
    pub async fn set_device(&self, name: &str) -> CaptureResult<String> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(CaptureCommand::SetDevice {
                name: name.to_string(),
                reply,
            })
            .map_err(|_| CaptureError::ServiceStopped)?;
        rx.await.map_err(|_| CaptureError::ServiceStopped)?
    }

    /// Current window length in samples
    pub async fn resolution(&self) -> CaptureResult<u32> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(CaptureCommand::Resolution { reply })
            .map_err(|_| CaptureError::ServiceStopped)?;
        rx.await.map_err(|_| CaptureError::ServiceStopped)?
    }

    /// Set the window length in samples
    pub async fn set_resolution(&self, samples: u32) -> CaptureResult<()> {
        let (reply, rx) = oneshot::channel();
        self.command_tx
            .send(CaptureCommand::SetResolution { samples, reply })
            .map_err(|_| CaptureError::ServiceStopped)?;
        rx.await.map_err(|_| CaptureError::ServiceStopped)?
    }

    /// Terminate the service thread
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(CaptureCommand::Shutdown);
    }
}
