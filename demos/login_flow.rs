//! Login flow demo.
//!
//! A two-screen flow: a login form as the router root and a welcome screen
//! pushed on top of it. Run with `RUST_LOG=navflow=debug` to watch the
//! transitions being queued and committed.

use chrono::{DateTime, Local};
use navflow::builder::{from, on};
use navflow::config::FlowConfig;
use navflow::context::{ArgKey, ContextArgs, FlowContext};
use navflow::engine::Engine;
use navflow::executor::ThreadExecutor;
use navflow::navigation::{
    BackOutcome, NavigableUnit, Navigator, Router, TransitionSpec, UnitFactory,
};
use navflow::{flow_events, flow_states};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

flow_states! {
    enum Screen {
        WaitingLogin,
        ShowingWelcome,
    }
}

flow_events! {
    enum Input {
        LoginProvided,
        BackClicked,
    }
}

const LOGIN: ArgKey<String> = ArgKey::new("LOGIN");

/// Turns a timestamp into display text.
trait DateFormatter: Send + Sync {
    fn format(&self, date: DateTime<Local>) -> String;
}

struct DayMonthYear;

impl DateFormatter for DayMonthYear {
    fn format(&self, date: DateTime<Local>) -> String {
        date.format("%d/%m/%Y").to_string()
    }
}

struct LoginForm;

impl NavigableUnit for LoginForm {
    fn render(&self) -> String {
        "[ login: ________ ] [ OK ]".to_string()
    }
}

struct Welcome {
    login: String,
    today: String,
}

impl NavigableUnit for Welcome {
    fn render(&self) -> String {
        format!("Welcome {}! Today is {}", self.login, self.today)
    }
}

struct Screens {
    formatter: Arc<dyn DateFormatter>,
}

impl UnitFactory<Screen> for Screens {
    fn create(&self, state: &Screen, args: &ContextArgs) -> anyhow::Result<Arc<dyn NavigableUnit>> {
        Ok(match state {
            Screen::WaitingLogin => Arc::new(LoginForm),
            Screen::ShowingWelcome => Arc::new(Welcome {
                login: args.get(&LOGIN)?,
                today: self.formatter.format(Local::now()),
            }),
        })
    }
}

fn print_top(router: &Router) {
    if let Some(top) = router.top() {
        println!("depth {}: {}", router.depth(), top.unit.render());
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = FlowConfig::default();
    let executor = Arc::new(ThreadExecutor::from_config(&config)?);
    let definition = from(Screen::WaitingLogin)
        .transit(
            on(Input::LoginProvided)
                .to(Screen::ShowingWelcome)
                .transit(on(Input::BackClicked).to(Screen::WaitingLogin)),
        )
        .clear_args_on_leave(Screen::ShowingWelcome);
    let engine = Engine::with_config(definition, executor.clone(), config)?;

    let screens = Arc::new(Screens {
        formatter: Arc::new(DayMonthYear),
    });
    let navigator = Navigator::new(engine.clone(), Router::new(), screens, Input::BackClicked)
        .on_platform_back(|| println!("nothing left to go back to, closing"));
    navigator
        .bind_root(Screen::WaitingLogin)?
        .bind_push(Screen::ShowingWelcome, TransitionSpec::fade())?;

    let context = FlowContext::new();
    engine.start(context.clone())?;
    executor.flush();
    print_top(navigator.router());

    context.args().put(&LOGIN, "ada".to_string())?;
    context.trigger(Input::LoginProvided)?;
    executor.flush();
    print_top(navigator.router());

    for _ in 0..2 {
        let outcome = navigator.back()?;
        executor.flush();
        if outcome == BackOutcome::NotHandled {
            println!("back press not handled by the flow");
        }
        print_top(navigator.router());
    }

    Ok(())
}
