//! Flows running on a dedicated worker thread while other threads trigger.

use crossbeam::channel;
use navflow::builder::{from, on};
use navflow::context::{ArgKey, FlowContext};
use navflow::engine::{Engine, FlowError};
use navflow::executor::{LogSink, ThreadExecutor};
use navflow::{flow_events, flow_states};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

flow_states! {
    enum Upload {
        Idle,
        Picking,
        Sent,
    }
    final: [Sent]
}

flow_events! {
    enum Action {
        Pick,
        Send,
    }
}

const FILE: ArgKey<String> = ArgKey::new("FILE");

type Slot = Arc<Mutex<Option<Engine<Upload, Action>>>>;

#[test]
fn callback_holding_args_can_query_while_another_thread_triggers() {
    let executor = Arc::new(ThreadExecutor::spawn("upload-worker", Arc::new(LogSink)).unwrap());
    let definition = from(Upload::Idle).transit(
        on(Action::Pick).to(Upload::Picking).transit(
            on(Action::Send)
                .to(Upload::Sent)
                .when(|args| args.contains(&FILE)),
        ),
    );
    let engine = Engine::build(definition, executor.clone()).unwrap();

    // The callback reaches the engine through a slot cleared at the end,
    // so the engine does not keep itself alive.
    let slot: Slot = Arc::default();
    let (holding_tx, holding_rx) = channel::bounded::<()>(1);
    let (seen_tx, seen_rx) = channel::bounded::<Option<Upload>>(1);
    let callback_slot = Arc::clone(&slot);
    engine
        .when_enter(Upload::Picking, move |context| {
            let args = context.args();
            let _ = holding_tx.send(());
            thread::sleep(Duration::from_millis(100));
            let current = callback_slot
                .lock()
                .as_ref()
                .and_then(|engine| engine.current_state());
            let _ = seen_tx.send(current);
            drop(args);
            Ok(())
        })
        .unwrap();
    *slot.lock() = Some(engine.clone());

    engine.start(FlowContext::new()).unwrap();
    engine.trigger(Action::Pick).unwrap();
    holding_rx.recv_timeout(Duration::from_secs(3)).unwrap();

    let (result_tx, result_rx) = channel::bounded(1);
    let triggering = engine.clone();
    thread::spawn(move || {
        let _ = result_tx.send(triggering.trigger(Action::Send));
    });

    let result = result_rx
        .recv_timeout(Duration::from_secs(3))
        .expect("trigger must not block on a callback holding the arguments");
    assert_eq!(
        result,
        Err(FlowError::GuardBlocked {
            state: "Picking".to_string(),
            event: "Send".to_string(),
        })
    );
    assert_eq!(
        seen_rx.recv_timeout(Duration::from_secs(3)).unwrap(),
        Some(Upload::Picking)
    );

    slot.lock().take();
    executor.flush();
    assert_eq!(engine.current_state(), Some(Upload::Picking));
}

#[test]
fn guarded_trigger_from_another_thread_fires_once_args_are_set() {
    let executor = Arc::new(ThreadExecutor::spawn("upload-worker", Arc::new(LogSink)).unwrap());
    let definition = from(Upload::Idle).transit(
        on(Action::Pick).to(Upload::Picking).transit(
            on(Action::Send)
                .to(Upload::Sent)
                .when(|args| args.contains(&FILE)),
        ),
    );
    let engine = Engine::build(definition, executor.clone()).unwrap();
    engine
        .when_enter(Upload::Picking, |context| {
            context.args().put(&FILE, "photo.png".to_string())?;
            Ok(())
        })
        .unwrap();

    let context = FlowContext::new();
    engine.start(context.clone()).unwrap();
    engine.trigger(Action::Pick).unwrap();
    executor.flush();

    let triggering = engine.clone();
    thread::spawn(move || triggering.trigger(Action::Send))
        .join()
        .unwrap()
        .unwrap();
    executor.flush();

    assert_eq!(engine.current_state(), Some(Upload::Sent));
    assert_eq!(context.args().get(&FILE).unwrap(), "photo.png");
}
