//! Button debounce tests

use core::convert::Infallible;

use rust_tick_console::button::{ButtonPoll, Debouncer};
use rust_tick_console::config::DEBOUNCE_MS;

fn low() -> Result<bool, Infallible> {
    Ok(true)
}

#[test]
fn test_bounce_burst_yields_one_press() {
    let db = Debouncer::new(DEBOUNCE_MS);

    // Edges at 100 and 120, both inside one window.
    db.notify_edge(100);
    db.notify_edge(120);

    let presses = (100..400)
        .step_by(10)
        .filter(|&now| db.poll(now, low) == Ok(ButtonPoll::Pressed))
        .count();

    assert_eq!(presses, 1);
}

#[test]
fn test_window_anchored_at_first_edge() {
    let db = Debouncer::new(DEBOUNCE_MS);

    db.notify_edge(100);
    db.notify_edge(140); // ignored, window still opened at 100

    assert_eq!(db.poll(149, low), Ok(ButtonPoll::Settling));
    assert_eq!(db.poll(150, low), Ok(ButtonPoll::Pressed));
}

#[test]
fn test_two_separate_presses() {
    let db = Debouncer::new(DEBOUNCE_MS);

    db.notify_edge(0);
    assert_eq!(db.poll(60, low), Ok(ButtonPoll::Pressed));

    db.notify_edge(500);
    assert_eq!(db.poll(550, low), Ok(ButtonPoll::Pressed));
}

#[test]
fn test_pin_not_sampled_until_window_closes() {
    let db = Debouncer::new(DEBOUNCE_MS);
    let mut samples = 0;

    db.notify_edge(0);
    for now in [10, 20, 30, 40] {
        let _ = db.poll(now, || {
            samples += 1;
            Ok::<_, Infallible>(true)
        });
    }
    assert_eq!(samples, 0);

    let _ = db.poll(50, || {
        samples += 1;
        Ok::<_, Infallible>(true)
    });
    assert_eq!(samples, 1);
}

#[test]
fn test_read_error_propagates_and_closes_window() {
    let db = Debouncer::new(DEBOUNCE_MS);

    db.notify_edge(0);
    assert_eq!(db.poll(50, || Err("gpio")), Err("gpio"));
    assert!(!db.is_pending());
}
