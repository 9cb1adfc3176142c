//! End-to-end tests for device workers, driven on paused tokio time.

use std::time::Duration;

use bureau_core::{
    ApplianceState, ChangeSet, CompletedJob, ContextOption, InkCartridge, InteractionOutcome,
    Item, Operation, Paper, PhotocopierError, SoundCue,
};
use bureau_runtime::{
    DeviceEvent, DeviceHandle, Event, OutputEvent, Runtime, RuntimeError, Topic,
};
use tokio::sync::broadcast;

const DELAY: Duration = Duration::from_millis(4_000);

fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn spawned_items(events: &[Event]) -> Vec<Item> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::Output(OutputEvent::ItemSpawned { item, .. }) => Some(item.clone()),
            _ => None,
        })
        .collect()
}

async fn ready_device(handle: &DeviceHandle) {
    handle
        .insert_cartridge(InkCartridge::full(30).into())
        .await
        .unwrap();
}

async fn load_document(handle: &DeviceHandle, text: &str) {
    handle.toggle_scanner_lid().await.unwrap();
    handle
        .place_document(Paper::with_text(text).into())
        .await
        .unwrap();
    handle.toggle_scanner_lid().await.unwrap();
}

async fn load_tray(handle: &DeviceHandle, pages: u32) {
    handle.toggle_tray().await.unwrap();
    for _ in 0..pages {
        handle.add_page_to_tray(Paper::blank().into()).await.unwrap();
    }
    handle.toggle_tray().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn scan_then_print_produces_copies() {
    let runtime = Runtime::builder().build();
    let handle = runtime.device(runtime.device_ids().next().unwrap()).unwrap();
    let mut output = handle.subscribe(Topic::Output);

    ready_device(&handle).await;
    load_document(&handle, "memo").await;
    handle.scan().await.unwrap();
    assert_eq!(handle.status().await.unwrap().state, ApplianceState::Production);

    tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
    let status = handle.status().await.unwrap();
    assert_eq!(status.state, ApplianceState::Idle);
    assert_eq!(status.scanned_text.as_deref(), Some("memo"));
    assert!(!status.document_loaded);
    assert_eq!(status.ink_level, Some(29));
    assert_eq!(
        spawned_items(&drain(&mut output)),
        vec![Item::Paper(Paper::with_text("memo"))]
    );

    load_tray(&handle, 2).await;
    handle.print().await.unwrap();
    tokio::time::sleep(DELAY + Duration::from_millis(1)).await;

    let events = drain(&mut output);
    assert!(events.iter().any(|event| matches!(
        event,
        Event::Output(OutputEvent::Sound {
            cue: SoundCue::Copier,
            ..
        })
    )));
    assert_eq!(
        spawned_items(&events),
        vec![
            Item::Paper(Paper::with_text("memo")),
            Item::Paper(Paper::with_text("memo")),
        ]
    );
    assert_eq!(handle.status().await.unwrap().tray_count, 0);
}

#[tokio::test(start_paused = true)]
async fn production_holds_until_delay_elapses() {
    let runtime = Runtime::builder().build();
    let handle = runtime.device(bureau_runtime::DeviceId(0)).unwrap();
    let mut device_events = handle.subscribe(Topic::Device);

    ready_device(&handle).await;
    load_document(&handle, "draft").await;
    handle.scan().await.unwrap();

    tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
    assert_eq!(handle.status().await.unwrap().state, ApplianceState::Production);

    let err = handle.toggle_tray().await.unwrap_err();
    assert_eq!(
        err.execute_error().map(|e| e.error),
        Some(PhotocopierError::Busy)
    );

    tokio::time::sleep(Duration::from_millis(2)).await;
    assert_eq!(handle.status().await.unwrap().state, ApplianceState::Idle);

    let completions: Vec<_> = drain(&mut device_events)
        .into_iter()
        .filter_map(|event| match event {
            Event::Device(DeviceEvent::ProductionCompleted { job, .. }) => Some(job),
            _ => None,
        })
        .collect();
    assert_eq!(
        completions,
        vec![CompletedJob::Scanned {
            text: "draft".into()
        }]
    );
}

#[tokio::test(start_paused = true)]
async fn completion_cannot_be_requested_by_clients() {
    let runtime = Runtime::builder().build();
    let handle = runtime.device(bureau_runtime::DeviceId(0)).unwrap();

    let err = handle
        .execute(Operation::CompleteProduction)
        .await
        .unwrap_err();
    assert!(matches!(err, RuntimeError::TimerOwnedOperation { .. }));
}

#[tokio::test(start_paused = true)]
async fn rejected_items_come_back_and_are_published() {
    let runtime = Runtime::builder().build();
    let handle = runtime.device(bureau_runtime::DeviceId(0)).unwrap();
    let mut device_events = handle.subscribe(Topic::Device);

    let sheet: Item = Paper::blank().into();
    let err = handle.add_page_to_tray(sheet.clone()).await.unwrap_err();
    assert_eq!(err.into_returned(), Some(sheet));

    let rejections: Vec<_> = drain(&mut device_events)
        .into_iter()
        .filter_map(|event| match event {
            Event::Device(DeviceEvent::OperationRejected { code, .. }) => Some(code),
            _ => None,
        })
        .collect();
    assert_eq!(rejections, vec!["tray_closed".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn render_events_carry_status_and_changes() {
    let runtime = Runtime::builder().build();
    let handle = runtime.device(bureau_runtime::DeviceId(0)).unwrap();
    let mut device_events = handle.subscribe(Topic::Device);

    handle.toggle_tray().await.unwrap();
    assert_eq!(
        handle.interact(None).await.unwrap(),
        InteractionOutcome::TrayClosed
    );
    assert_eq!(
        handle.interact(None).await.unwrap(),
        InteractionOutcome::PanelRequested
    );

    let renders: Vec<_> = drain(&mut device_events)
        .into_iter()
        .filter_map(|event| match event {
            Event::Device(DeviceEvent::RenderRequired {
                status, changes, ..
            }) => Some((status.state, changes)),
            _ => None,
        })
        .collect();
    assert_eq!(
        renders,
        vec![
            (ApplianceState::TrayOpen, ChangeSet::STATE | ChangeSet::TRAY),
            (ApplianceState::Idle, ChangeSet::STATE | ChangeSet::TRAY),
            (ApplianceState::Idle, ChangeSet::empty()),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn context_menu_round_trip() {
    let runtime = Runtime::builder().build();
    let handle = runtime.device(bureau_runtime::DeviceId(0)).unwrap();
    let mut output = handle.subscribe(Topic::Output);

    assert_eq!(
        handle.context_options().await.unwrap(),
        vec![ContextOption::SwitchPrintingMode]
    );
    ready_device(&handle).await;
    assert_eq!(
        handle
            .apply_context_option(ContextOption::SwitchPrintingMode)
            .await
            .unwrap()
            .as_deref(),
        Some("The printer will now print Books")
    );

    handle
        .apply_context_option(ContextOption::RemoveInkCartridge)
        .await
        .unwrap();
    assert_eq!(handle.status().await.unwrap().ink_level, None);
    assert_eq!(
        spawned_items(&drain(&mut output)),
        vec![Item::InkCartridge(InkCartridge::full(30))]
    );
}

#[tokio::test(start_paused = true)]
async fn devices_run_independently() {
    let runtime = Runtime::builder().devices(2).build();
    assert_eq!(runtime.device_count(), 2);
    let first = runtime.device(bureau_runtime::DeviceId(0)).unwrap();
    let second = runtime.device(bureau_runtime::DeviceId(1)).unwrap();

    ready_device(&first).await;
    load_document(&first, "a").await;
    first.scan().await.unwrap();

    assert_eq!(second.status().await.unwrap().state, ApplianceState::Idle);
    second.toggle_tray().await.unwrap();
    assert_eq!(first.status().await.unwrap().state, ApplianceState::Production);
}

#[tokio::test(start_paused = true)]
async fn shutdown_waits_for_workers() {
    let runtime = Runtime::builder().devices(2).build();
    runtime.shutdown().await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn switch_printing_mode_returns_announcement() {
    let runtime = Runtime::builder().build();
    let handle = runtime.device(bureau_runtime::DeviceId(0)).unwrap();

    assert_eq!(
        handle.switch_printing_mode().await.unwrap(),
        "The printer will now print Books"
    );
    assert!(handle.status().await.unwrap().print_book);
    assert_eq!(
        handle.switch_printing_mode().await.unwrap(),
        "The printer will now print Copies of Paper"
    );
}
