use std::sync::mpsc;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use paratype::corpus::{Corpus, Selection};
use paratype::runtime::{AppEvent, FixedTicker, Runner, TestEventSource};
use paratype::session::Phase;
use paratype::store::MemorySessionStore;
use paratype::timer::{ManualScheduler, TimerId};
use paratype::trainer::Trainer;
use rand::rngs::StdRng;
use rand::SeedableRng;

// Headless integration using the runtime + Trainer without a TTY.

fn trainer(paragraph: &str, scheduler: &ManualScheduler) -> Trainer {
    Trainer::new(
        Corpus::default().with_paragraphs("normal", "en", [paragraph]),
        Box::new(MemorySessionStore::new()),
        Box::new(StdRng::seed_from_u64(11)),
        Box::new(scheduler.clone()),
        Selection::default(),
    )
}

fn key(c: char) -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
}

/// Drive a tiny event loop until the runner goes idle
fn drain(runner: &Runner<TestEventSource, FixedTicker>, trainer: &mut Trainer, now: Instant) {
    for _ in 0..1000u32 {
        match runner.step() {
            AppEvent::Idle => break,
            AppEvent::Key(key) => {
                if let KeyCode::Char(c) = key.code {
                    trainer.type_char(c, now);
                }
            }
            AppEvent::Paste(text) => {
                trainer.paste(&text, now);
            }
            AppEvent::Tick(id) => {
                trainer.on_tick(id);
            }
            AppEvent::Resize => {}
        }
    }
}

#[test]
fn headless_typing_flow_completes() {
    let scheduler = ManualScheduler::new();
    let mut trainer = trainer("hi there", &scheduler);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    for c in "hi th".chars() {
        tx.send(key(c)).unwrap();
    }
    drain(&runner, &mut trainer, Instant::now());
    assert_eq!(trainer.phase(), Phase::InProgress);

    let id = scheduler.active()[0];
    for _ in 0..3 {
        tx.send(AppEvent::Tick(id)).unwrap();
    }
    for c in "ere".chars() {
        tx.send(key(c)).unwrap();
    }
    drain(&runner, &mut trainer, Instant::now());

    assert_eq!(trainer.phase(), Phase::Locked);
    assert_eq!(trainer.clock(), "0:03");
    let result = trainer.result().unwrap();
    assert_eq!(result.correct_words, 2);
    assert_eq!(result.accuracy, 100.0);
    assert!(scheduler.active().is_empty());
}

#[test]
fn ticks_after_reset_are_ignored() {
    let scheduler = ManualScheduler::new();
    let mut trainer = trainer("hello", &scheduler);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key('h')).unwrap();
    drain(&runner, &mut trainer, Instant::now());
    let id = scheduler.active()[0];

    trainer.try_again();
    assert!(scheduler.active().is_empty());

    tx.send(AppEvent::Tick(id)).unwrap();
    tx.send(AppEvent::Tick(TimerId(id.0 + 100))).unwrap();
    drain(&runner, &mut trainer, Instant::now());

    assert_eq!(trainer.clock(), "0:00");
    assert_eq!(trainer.phase(), Phase::Idle);
}

#[test]
fn paste_through_event_loop_appends_placeholder() {
    let scheduler = ManualScheduler::new();
    let mut trainer = trainer("a fairly long paragraph to type out", &scheduler);

    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(
        TestEventSource::new(rx),
        FixedTicker::new(Duration::from_millis(5)),
    );

    tx.send(key('a')).unwrap();
    tx.send(AppEvent::Paste(" fairly long paragraph".to_string()))
        .unwrap();
    drain(&runner, &mut trainer, Instant::now());

    assert_eq!(trainer.session().typed(), "aDon't be smart");
    assert_eq!(trainer.phase(), Phase::InProgress);
}
