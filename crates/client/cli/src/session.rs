//! Interactive console session against a hosted runtime.

use std::time::Duration;

use anyhow::Result;
use bureau_core::{BubbleEvent, ChatBubble, ChatVisual, InteractionOutcome, Item, StatusView};
use bureau_runtime::{DeviceHandle, DeviceId, Event, Runtime, RuntimeError, Topic};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use crate::config::CliConfig;
use crate::input::{HELP, Input};

/// Simulated frame length used to play back chat bubbles.
const CHAT_FRAME: Duration = Duration::from_millis(100);

pub struct Session {
    runtime: Runtime,
    device: DeviceHandle,
    hand: Option<Item>,
    chat: ChatBubble,
    cartridge_capacity: u32,
}

impl Session {
    pub fn new(config: CliConfig) -> Result<Self> {
        let runtime = Runtime::builder()
            .config(config.runtime.clone())
            .devices(config.devices)
            .build();
        let device = runtime
            .device(DeviceId(0))
            .ok_or_else(|| anyhow::anyhow!("runtime started without devices"))?;

        Ok(Self {
            runtime,
            device,
            hand: None,
            chat: ChatBubble::new(config.bureau.chat_bubble.clone())
                .with_bubbles_enabled(config.chat_bubbles),
            cartridge_capacity: config.bureau.photocopier.cartridge_capacity,
        })
    }

    /// Reads commands from stdin until `quit` or end of input.
    pub async fn run(mut self) -> Result<()> {
        let printer = spawn_event_printer(&self.runtime);
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        println!("{}", HELP);
        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            match Input::parse(&line, self.cartridge_capacity) {
                Ok(Input::Quit) => break,
                Ok(input) => self.dispatch(input).await?,
                Err(e) => println!("{}", e),
            }
        }

        drop(self.device);
        printer.abort();
        self.runtime.shutdown().await?;
        Ok(())
    }

    async fn dispatch(&mut self, input: Input) -> Result<()> {
        let result = match input {
            Input::ToggleTray => self.device.toggle_tray().await,
            Input::ToggleLid => self.device.toggle_scanner_lid().await,
            Input::Print => self.device.print().await,
            Input::Scan => self.device.scan().await,
            Input::ClearScan => self.device.clear_scanned_text().await,
            Input::Menu(option) => self
                .device
                .apply_context_option(option)
                .await
                .map(|announcement| {
                    if let Some(text) = announcement {
                        println!("{}", text);
                    }
                }),
            Input::Use => self.use_hand().await,
            Input::Hold(item) => {
                self.hand = item;
                println!("in hand: {:?}", self.hand);
                Ok(())
            }
            Input::Status => self
                .device
                .status()
                .await
                .map(|status| print_status(self.device.id(), &status)),
            Input::Wait(ms) => {
                tokio::time::sleep(Duration::from_millis(ms)).await;
                Ok(())
            }
            Input::Device(index) => {
                match self.runtime.device(DeviceId(index)) {
                    Some(device) => self.device = device,
                    None => println!("no such device ({} hosted)", self.runtime.device_count()),
                }
                Ok(())
            }
            Input::Say(text) => {
                self.say(&text);
                Ok(())
            }
            Input::Help => {
                println!("{}", HELP);
                Ok(())
            }
            Input::Quit => Ok(()),
        };

        match result {
            Ok(()) => Ok(()),
            Err(e @ RuntimeError::Rejected { .. }) => {
                let message = e
                    .execute_error()
                    .map_or_else(|| e.to_string(), |e| e.error.to_string());
                println!("{}", message);
                Ok(())
            }
            Err(e @ RuntimeError::TimerOwnedOperation { .. }) => {
                println!("{}", e);
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn use_hand(&mut self) -> Result<(), RuntimeError> {
        let hand = self.hand.take();
        match self.device.interact(hand).await {
            Ok(InteractionOutcome::Declined(item)) => {
                println!("the copier has no use for that");
                self.hand = Some(item);
            }
            Ok(outcome) => {
                if let Some(message) = outcome.message() {
                    println!("{}", message);
                }
                if outcome == InteractionOutcome::PanelRequested {
                    let status = self.device.status().await?;
                    print_status(self.device.id(), &status);
                }
            }
            Err(e @ RuntimeError::Rejected { .. }) => {
                let message = e.execute_error().map(|e| e.error.to_string());
                self.hand = e.into_returned();
                if let Some(message) = message {
                    println!("{}", message);
                }
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Plays a chat line back on the bubble in simulated time.
    fn say(&mut self, text: &str) {
        if let ChatVisual::Icon { visible } = self.chat.determine_visual(true, text) {
            println!("[typing icon {}] {}", if visible { "on" } else { "off" }, text);
            return;
        }

        self.print_bubble();
        while self.chat.is_visible() {
            match self.chat.advance(CHAT_FRAME) {
                Some(BubbleEvent::Shown(_)) => self.print_bubble(),
                Some(BubbleEvent::Hidden) | None => {}
            }
        }
    }

    fn print_bubble(&self) {
        if let (Some(text), Some(kind), Some(scale)) =
            (self.chat.text(), self.chat.bubble_type(), self.chat.scale())
        {
            println!("[{} x{}] {}", kind, scale, text);
        }
    }
}

fn print_status(device: DeviceId, status: &StatusView) {
    println!(
        "{}: {} | tray {}/{}{} | scanner {}{} | mode {} | ink {}",
        device,
        status.state,
        status.tray_count,
        status.tray_capacity,
        if status.tray_open { " (open)" } else { "" },
        if status.scanner_open { "open" } else { "closed" },
        if status.document_loaded { ", document loaded" } else { "" },
        if status.print_book { "books" } else { "paper" },
        status
            .ink_level
            .map_or_else(|| "no cartridge".to_string(), |ink| ink.to_string()),
    );
    if let Some(text) = &status.scanned_text {
        println!("  scanned: {:?}", text);
    }
}

/// Streams every device and output event to stdout as JSON lines.
fn spawn_event_printer(runtime: &Runtime) -> JoinHandle<()> {
    let mut device_rx = runtime.subscribe(Topic::Device);
    let mut output_rx = runtime.subscribe(Topic::Output);

    tokio::spawn(async move {
        loop {
            let received = tokio::select! {
                event = device_rx.recv() => event,
                event = output_rx.recv() => event,
            };
            match received {
                Ok(event) => print_event(&event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!("event printer lagged, {} events skipped", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    })
}

fn print_event(event: &Event) {
    match serde_json::to_string(event) {
        Ok(json) => println!("{}", json),
        Err(e) => tracing::warn!("failed to encode event: {}", e),
    }
}
