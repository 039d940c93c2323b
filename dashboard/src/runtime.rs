// Event loop
//
// One task owns the `App`. Input, finished requests, the debounce deadline,
// settled terminal heights and the optional refresh tick are multiplexed
// with `tokio::select!`.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;
use common::debounce::{debounce_watch, Debounced};
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::app::{App, Completion, Effect};
use crate::keymap;
use crate::terminal::{spawn_input_reader, TerminalGuard};
use crate::views;

const INPUT_BUFFER: usize = 100;
/// Quiet period after the last resize event before the page is re-sized
const RESIZE_SETTLE: Duration = Duration::from_millis(150);

pub async fn run(mut app: App, refresh_interval: Option<Duration>) -> Result<()> {
    let mut stdout = io::stdout();
    let _guard = TerminalGuard::enter(&mut stdout)?;

    let (input_tx, mut input) = mpsc::channel(INPUT_BUFFER);
    let _reader = spawn_input_reader(input_tx);

    let (done_tx, mut completions) = mpsc::unbounded_channel::<Completion>();
    let mut refresh = refresh_interval.map(|period| {
        let mut interval = time::interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });

    let (height_tx, mut settled_height) = height_watch(app.viewport().1);

    let effects = app.start();
    dispatch(&app, effects, &done_tx);

    loop {
        views::draw(&views::render(&app), &mut stdout)?;
        if app.should_quit() {
            break;
        }

        let deadline = app.next_deadline().map(Instant::from_std);

        let effects = tokio::select! {
            event = input.recv() => match event {
                Some(event) => match keymap::action_for(&event, app.mode()) {
                    Some(action) => app.handle(action, std::time::Instant::now()),
                    None => Vec::new(),
                },
                None => {
                    tracing::warn!("Terminal input closed");
                    break;
                }
            },
            Some(completion) = completions.recv() => app.complete(completion),
            Ok(()) = settled_height.changed() => {
                let height = *settled_height.borrow();
                app.settle_height(height)
            }
            _ = sleep_until(deadline) => app.tick(std::time::Instant::now()),
            _ = tick(&mut refresh) => app.auto_refresh(),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received interrupt");
                break;
            }
        };

        let height = app.viewport().1;
        height_tx.send_if_modified(|last| std::mem::replace(last, height) != height);
        dispatch(&app, effects, &done_tx);
    }

    stdout.flush()?;
    Ok(())
}

/// Terminal heights go in the sender; only the last of a burst comes out
fn height_watch(initial: u16) -> (watch::Sender<u16>, Debounced<u16>) {
    let (tx, rx) = watch::channel(initial);
    (tx, debounce_watch(rx, RESIZE_SETTLE))
}

/// Spawn each effect; results come back through `done_tx`
fn dispatch(app: &App, effects: Vec<Effect>, done_tx: &mpsc::UnboundedSender<Completion>) {
    for effect in effects {
        let done_tx = done_tx.clone();
        match effect {
            Effect::FetchList(ticket) => {
                let request = app.list().request(ticket);
                tokio::spawn(async move {
                    let _ = done_tx.send(Completion::List(request.await));
                });
            }
            Effect::FetchDetail(ticket) => {
                let Some(detail) = app.detail() else {
                    continue;
                };
                let request = detail.request(ticket);
                tokio::spawn(async move {
                    let _ = done_tx.send(Completion::Detail(request.await));
                });
            }
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

async fn tick(interval: &mut Option<Interval>) {
    match interval {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
