//! Device worker that owns the authoritative [`ApplianceController`].
//!
//! Receives commands from [`DeviceHandle`](crate::DeviceHandle), runs them
//! through the controller, drives the production timer, and publishes
//! events to the [`EventBus`].

use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use bureau_core::{
    ApplianceController, BureauError, ChangeSet, ContextOption, ExecuteError,
    InteractionOutcome, Item, ItemSink, Operation, OperationKind, OperationOutcome,
    PhotocopierConfig, SoundCue, StatusView,
};

use crate::api::{DeviceId, Result, RuntimeError};
use crate::events::{DeviceEvent, Event, EventBus, OutputEvent};

/// Commands that can be sent to a device worker
pub enum Command {
    /// Execute an operation against the controller.
    Execute {
        operation: Operation,
        reply: oneshot::Sender<Result<OperationOutcome>>,
    },
    /// Apply a player's hand to the device.
    Interact {
        hand: Option<Item>,
        reply: oneshot::Sender<Result<InteractionOutcome>>,
    },
    /// Run a context-menu entry.
    ContextOption {
        option: ContextOption,
        reply: oneshot::Sender<Result<Option<String>>>,
    },
    /// List the context-menu entries currently offered.
    QueryContextOptions {
        reply: oneshot::Sender<Vec<ContextOption>>,
    },
    /// Query the current status (read-only).
    QueryStatus { reply: oneshot::Sender<StatusView> },
}

/// Forwards spawned items and sounds to [`Topic::Output`](crate::Topic::Output).
pub(crate) struct BusSink {
    device: DeviceId,
    event_bus: EventBus,
}

impl ItemSink for BusSink {
    fn spawn_item(&mut self, item: Item) {
        debug!(device = %self.device, ?item, "item spawned");
        self.event_bus.publish(Event::Output(OutputEvent::ItemSpawned {
            device: self.device,
            item,
        }));
    }

    fn play_sound(&mut self, cue: SoundCue) {
        self.event_bus.publish(Event::Output(OutputEvent::Sound {
            device: self.device,
            cue,
        }));
    }
}

/// Background task that processes device commands.
///
/// The worker is the only owner of its controller, so operations are applied
/// one at a time in arrival order. When a job starts it arms a deadline;
/// the deadline branch takes priority over pending commands so a job always
/// completes exactly once, after the configured delay.
pub struct DeviceWorker {
    id: DeviceId,
    controller: ApplianceController<BusSink>,
    command_rx: mpsc::Receiver<Command>,
    event_bus: EventBus,
    deadline: Option<Instant>,
}

impl DeviceWorker {
    pub fn new(
        id: DeviceId,
        config: PhotocopierConfig,
        command_rx: mpsc::Receiver<Command>,
        event_bus: EventBus,
    ) -> Self {
        let sink = BusSink {
            device: id,
            event_bus: event_bus.clone(),
        };
        let mut controller = ApplianceController::new(config, sink);

        let render_bus = event_bus.clone();
        controller.subscribe(move |status: &StatusView, changes: ChangeSet| {
            render_bus.publish(Event::Device(DeviceEvent::RenderRequired {
                device: id,
                status: status.clone(),
                changes,
            }));
        });

        info!(
            device = %id,
            tray_capacity = controller.config().tray_capacity,
            production_delay_ms = controller.config().production_delay_ms,
            "DeviceWorker initialized"
        );

        Self {
            id,
            controller,
            command_rx,
            event_bus,
            deadline: None,
        }
    }

    /// Main worker loop. Exits once every handle has been dropped.
    pub async fn run(mut self) {
        loop {
            let deadline = self.deadline;
            tokio::select! {
                biased;
                _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)),
                    if deadline.is_some() =>
                {
                    self.finish_production();
                }
                cmd = self.command_rx.recv() => match cmd {
                    Some(cmd) => self.handle_command(cmd),
                    None => break,
                },
            }
        }
        debug!(device = %self.id, "DeviceWorker stopped");
    }

    fn handle_command(&mut self, cmd: Command) {
        match cmd {
            Command::Execute { operation, reply } => {
                let result = self.handle_operation(operation);
                if reply.send(result).is_err() {
                    debug!("Execute reply channel closed (caller dropped)");
                }
            }
            Command::Interact { hand, reply } => {
                let result = self
                    .controller
                    .perform_interaction(hand)
                    .map_err(|e| self.reject(e));
                self.arm_timer();
                if reply.send(result).is_err() {
                    debug!("Interact reply channel closed (caller dropped)");
                }
            }
            Command::ContextOption { option, reply } => {
                let result = self
                    .controller
                    .apply_context_option(option)
                    .map_err(|e| self.reject(e));
                if reply.send(result).is_err() {
                    debug!("ContextOption reply channel closed (caller dropped)");
                }
            }
            Command::QueryContextOptions { reply } => {
                if reply.send(self.controller.context_options()).is_err() {
                    debug!("QueryContextOptions reply channel closed (caller dropped)");
                }
            }
            Command::QueryStatus { reply } => {
                if reply.send(self.controller.status()).is_err() {
                    debug!("QueryStatus reply channel closed (caller dropped)");
                }
            }
        }
    }

    fn handle_operation(&mut self, operation: Operation) -> Result<OperationOutcome> {
        let kind = operation.kind();
        if kind == OperationKind::CompleteProduction {
            return Err(RuntimeError::TimerOwnedOperation { operation: kind });
        }

        let outcome = self
            .controller
            .execute(operation)
            .map_err(|e| self.reject(e))?;
        debug!(device = %self.id, operation = %kind, "operation applied");

        self.arm_timer();
        Ok(outcome)
    }

    /// Starts the production clock if a job was just accepted.
    fn arm_timer(&mut self) {
        if self.deadline.is_some() {
            return;
        }
        if let Some(remaining) = self.controller.production_remaining() {
            self.deadline = Some(Instant::now() + remaining);
            debug!(device = %self.id, ?remaining, "production started");
        }
    }

    fn finish_production(&mut self) {
        self.deadline = None;
        match self.controller.complete_production() {
            Ok(job) => {
                info!(device = %self.id, ?job, "production completed");
                self.event_bus
                    .publish(Event::Device(DeviceEvent::ProductionCompleted {
                        device: self.id,
                        job,
                    }));
            }
            Err(e) => {
                self.reject(e);
            }
        }
    }

    /// Logs and publishes a refused request, then wraps it for the caller.
    fn reject(&self, error: ExecuteError) -> RuntimeError {
        let severity = error.severity();
        if severity.is_internal() {
            warn!(
                device = %self.id,
                operation = %error.operation,
                code = error.error_code(),
                "{}", error
            );
        } else {
            debug!(
                device = %self.id,
                operation = %error.operation,
                code = error.error_code(),
                "operation rejected: {}", error.error
            );
        }

        self.event_bus
            .publish(Event::Device(DeviceEvent::OperationRejected {
                device: self.id,
                operation: error.operation,
                code: error.error_code().to_string(),
                severity,
                message: error.error.to_string(),
            }));

        RuntimeError::Rejected {
            device: self.id,
            source: error,
        }
    }
}
