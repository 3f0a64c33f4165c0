//! End-to-end login navigation scenarios.

use navflow::builder::{from, on};
use navflow::config::FlowConfig;
use navflow::context::{ArgKey, ContextArgs, FlowContext};
use navflow::engine::{Engine, FlowError};
use navflow::executor::{LogSink, ManualExecutor, ThreadExecutor};
use navflow::navigation::{
    BackOutcome, NavigableUnit, Navigator, Router, TransitionSpec, UnitFactory,
};
use navflow::{flow_events, flow_states};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

flow_states! {
    enum LoginState {
        WaitingLogin,
        ShowingWelcome,
    }
}

flow_events! {
    enum LoginEvent {
        LoginProvided,
        BackClicked,
    }
}

const LOGIN: ArgKey<String> = ArgKey::new("LOGIN");

struct LoginForm;

impl NavigableUnit for LoginForm {
    fn render(&self) -> String {
        "Enter your login".to_string()
    }
}

struct Welcome {
    login: String,
}

impl NavigableUnit for Welcome {
    fn render(&self) -> String {
        format!("Welcome, {}", self.login)
    }
}

fn screens() -> Arc<dyn UnitFactory<LoginState>> {
    Arc::new(
        |state: &LoginState, args: &ContextArgs| -> anyhow::Result<Arc<dyn NavigableUnit>> {
            Ok(match state {
                LoginState::WaitingLogin => Arc::new(LoginForm),
                LoginState::ShowingWelcome => Arc::new(Welcome {
                    login: args.get(&LOGIN)?,
                }),
            })
        },
    )
}

fn login_engine(executor: Arc<ManualExecutor>) -> Engine<LoginState, LoginEvent> {
    let definition = from(LoginState::WaitingLogin)
        .transit(
            on(LoginEvent::LoginProvided)
                .to(LoginState::ShowingWelcome)
                .transit(on(LoginEvent::BackClicked).to(LoginState::WaitingLogin)),
        )
        .clear_args_on_leave(LoginState::ShowingWelcome);
    Engine::build(definition, executor).unwrap()
}

#[test]
fn login_then_back_then_back_again() {
    let executor = Arc::new(ManualExecutor::new());
    let engine = login_engine(executor.clone());
    let log: Arc<Mutex<Vec<String>>> = Arc::default();
    for state in [LoginState::WaitingLogin, LoginState::ShowingWelcome] {
        let enter_log = Arc::clone(&log);
        let leave_log = Arc::clone(&log);
        engine
            .when_enter(state, move |_| {
                enter_log.lock().push(format!("enter {state:?}"));
                Ok(())
            })
            .unwrap()
            .when_leave(state, move |_| {
                leave_log.lock().push(format!("leave {state:?}"));
                Ok(())
            })
            .unwrap();
    }

    let platform_backs = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&platform_backs);
    let navigator = Navigator::new(
        engine.clone(),
        Router::new(),
        screens(),
        LoginEvent::BackClicked,
    )
    .on_platform_back(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    navigator
        .bind_root(LoginState::WaitingLogin)
        .unwrap()
        .bind_push(LoginState::ShowingWelcome, TransitionSpec::fade())
        .unwrap();
    let router = navigator.router().clone();

    let context = FlowContext::new();
    engine.start(context.clone()).unwrap();
    executor.run_pending();
    assert_eq!(router.depth(), 1);
    assert_eq!(*log.lock(), vec!["enter WaitingLogin"]);

    // The login form stores what was typed, then raises the event.
    context.args().put(&LOGIN, "ada".to_string()).unwrap();
    context.trigger(LoginEvent::LoginProvided).unwrap();
    executor.run_pending();
    assert_eq!(engine.current_state(), Some(LoginState::ShowingWelcome));
    assert_eq!(router.depth(), 2);
    assert_eq!(router.top().unwrap().unit.render(), "Welcome, ada");

    assert_eq!(navigator.back().unwrap(), BackOutcome::Transitioned);
    executor.run_pending();
    assert_eq!(engine.current_state(), Some(LoginState::WaitingLogin));
    assert_eq!(router.depth(), 1);
    assert!(!context.args().contains(&LOGIN));
    assert_eq!(platform_backs.load(Ordering::SeqCst), 0);

    assert_eq!(navigator.back().unwrap(), BackOutcome::NotHandled);
    executor.run_pending();
    assert_eq!(
        engine.trigger(LoginEvent::BackClicked),
        Err(FlowError::IllegalTransition {
            state: "WaitingLogin".to_string(),
            event: "BackClicked".to_string(),
        })
    );
    assert_eq!(engine.current_state(), Some(LoginState::WaitingLogin));
    assert_eq!(router.depth(), 1);
    assert_eq!(platform_backs.load(Ordering::SeqCst), 1);

    assert_eq!(
        *log.lock(),
        vec![
            "enter WaitingLogin",
            "leave WaitingLogin",
            "enter ShowingWelcome",
            "leave ShowingWelcome",
            "enter WaitingLogin",
        ]
    );
}

#[test]
fn welcome_survives_a_checkpoint() {
    let executor = Arc::new(ManualExecutor::new());
    let engine = login_engine(executor.clone());
    let context = FlowContext::new();
    engine.start(context.clone()).unwrap();
    context.args().put(&LOGIN, "ada".to_string()).unwrap();
    context.trigger(LoginEvent::LoginProvided).unwrap();
    executor.run_pending();
    let saved = engine.checkpoint().unwrap().to_json().unwrap();

    // A new session rebuilds the router from the enter callbacks alone.
    let engine = login_engine(executor.clone());
    let navigator = Navigator::new(
        engine.clone(),
        Router::new(),
        screens(),
        LoginEvent::BackClicked,
    );
    navigator
        .bind_root(LoginState::WaitingLogin)
        .unwrap()
        .bind_root(LoginState::ShowingWelcome)
        .unwrap();
    let checkpoint = navflow::Checkpoint::from_json(&saved).unwrap();
    let context = engine.resume(&checkpoint).unwrap();
    executor.run_pending();

    assert_eq!(engine.current_state(), Some(LoginState::ShowingWelcome));
    assert_eq!(context.args().get(&LOGIN).unwrap(), "ada");
    assert_eq!(navigator.router().top().unwrap().unit.render(), "Welcome, ada");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn triggers_from_many_tasks_run_on_one_worker() {
    let config = FlowConfig {
        worker_thread_name: "login-worker".to_string(),
        history_limit: None,
        ..FlowConfig::default()
    };
    let executor = Arc::new(
        ThreadExecutor::spawn(config.worker_thread_name.clone(), Arc::new(LogSink)).unwrap(),
    );
    let definition = from(LoginState::WaitingLogin).transit(
        on(LoginEvent::LoginProvided)
            .to(LoginState::ShowingWelcome)
            .transit(on(LoginEvent::BackClicked).to(LoginState::WaitingLogin)),
    );
    let engine = Engine::with_config(definition, executor.clone(), config).unwrap();

    let off_worker = Arc::new(AtomicUsize::new(0));
    let entered = Arc::new(AtomicUsize::new(0));
    for state in [LoginState::WaitingLogin, LoginState::ShowingWelcome] {
        let off_worker = Arc::clone(&off_worker);
        let entered = Arc::clone(&entered);
        engine
            .when_enter(state, move |_| {
                if std::thread::current().name() != Some("login-worker") {
                    off_worker.fetch_add(1, Ordering::SeqCst);
                }
                entered.fetch_add(1, Ordering::SeqCst);
                Ok(())
            })
            .unwrap();
    }
    engine.start(FlowContext::new()).unwrap();

    // Every task alternates login and back; with four of them racing,
    // each event succeeds only when the queued state allows it.
    let mut handles = Vec::new();
    for _ in 0..4 {
        let engine = engine.clone();
        handles.push(tokio::spawn(async move {
            let mut accepted = 0usize;
            for i in 0..50 {
                let event = if i % 2 == 0 {
                    LoginEvent::LoginProvided
                } else {
                    LoginEvent::BackClicked
                };
                match engine.trigger(event) {
                    Ok(()) => accepted += 1,
                    Err(error) => assert!(error.is_illegal_transition()),
                }
                tokio::task::yield_now().await;
            }
            accepted
        }));
    }

    let mut accepted = 0;
    for handle in handles {
        accepted += handle.await.unwrap();
    }
    executor.flush();

    let history = engine.history();
    assert_eq!(history.len(), accepted);
    assert_eq!(entered.load(Ordering::SeqCst), accepted + 1);
    assert_eq!(off_worker.load(Ordering::SeqCst), 0);
    for pair in history.transitions().windows(2) {
        assert_eq!(pair[0].to, pair[1].from);
    }
    let expected = if accepted % 2 == 0 {
        LoginState::WaitingLogin
    } else {
        LoginState::ShowingWelcome
    };
    assert_eq!(engine.current_state(), Some(expected));
}
