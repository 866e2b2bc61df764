//! Integration tests for the injection controller.
//!
//! These tests drive `InputInjector` through its public API against the
//! `RecordingInjector` fake, which logs every OS-level call in order.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use cursor_control::application::inject_input::{MouseButton, PlatformInjector, Press};
use cursor_control::infrastructure::injection::mock::{InjectorCall, RecordingInjector};
use cursor_control::InputInjector;
use cursor_core::{ButtonKind, InputNotification, Journal, KeyPress, MemoryJournal, PointerState};

fn make_injector(recorder: &Arc<RecordingInjector>) -> (Arc<InputInjector>, Arc<MemoryJournal>) {
    let journal = Arc::new(MemoryJournal::new());
    let injector = InputInjector::new(
        Arc::clone(recorder) as Arc<dyn PlatformInjector>,
        Arc::clone(&journal) as Arc<dyn Journal>,
    );
    (Arc::new(injector), journal)
}

fn collect<T: Copy + Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(&T) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |value: &T| sink.lock().unwrap().push(*value))
}

/// Checks that every down in `calls` is immediately followed by the matching
/// up, i.e. no gesture was split by another thread.
fn assert_gestures_not_interleaved(calls: &[InjectorCall]) {
    let mut i = 0;
    while i < calls.len() {
        match calls[i] {
            InjectorCall::SetCursorPos { .. } => i += 1,
            InjectorCall::MouseButton { button, press: Press::Down } => {
                assert_eq!(
                    calls.get(i + 1),
                    Some(&InjectorCall::MouseButton { button, press: Press::Up }),
                    "button-down at {i} not followed by its button-up: {calls:?}"
                );
                i += 2;
            }
            InjectorCall::Key { key_code, press: Press::Down } => {
                assert_eq!(
                    calls.get(i + 1),
                    Some(&InjectorCall::Key { key_code, press: Press::Up }),
                    "key-down at {i} not followed by its key-up: {calls:?}"
                );
                i += 2;
            }
            other => panic!("unpaired call {other:?} at {i}: {calls:?}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[test]
fn test_move_updates_state_and_fires_once_for_many_coordinates() {
    let recorder = Arc::new(RecordingInjector::new());
    let (injector, _) = make_injector(&recorder);

    for (x, y) in [(0, 0), (1919, 1079), (-1920, 0), (i32::MAX, i32::MIN), (37, -5)] {
        // Arrange
        let (seen, handler) = collect::<InputNotification>();
        let id = injector.events().pointer_moved.subscribe(handler);

        // Act
        let outcome = injector.set_cursor_position(x, y);

        // Assert
        assert!(outcome.is_success());
        assert_eq!(injector.pointer_state(), PointerState::new(x, y, ButtonKind::Unselected));
        assert_eq!(
            *seen.lock().unwrap(),
            vec![InputNotification::new(x, y, ButtonKind::Unselected)]
        );
        injector.events().pointer_moved.unsubscribe(id);
    }
}

#[test]
fn test_failed_move_leaves_state_and_journals_coordinates() {
    // Arrange
    let recorder = Arc::new(RecordingInjector::new());
    let (injector, journal) = make_injector(&recorder);
    let _ = injector.set_cursor_position(10, 20);
    recorder.set_fail_pointer(true);

    // Act
    let outcome = injector.set_cursor_position(99, 99);

    // Assert
    assert_eq!(outcome.code(), 0);
    assert_eq!(injector.pointer_state(), PointerState::new(10, 20, ButtonKind::Unselected));
    let last = journal.lines().pop().unwrap();
    assert!(last.starts_with("error: pointer injection failed"), "{last}");
    assert!(last.contains("X:99, Y:99"), "{last}");
}

#[test]
fn test_left_and_right_clicks_use_separate_channels() {
    // Arrange
    let recorder = Arc::new(RecordingInjector::new());
    let (injector, _) = make_injector(&recorder);
    let _ = injector.set_cursor_position(300, 400);
    let (left, on_left) = collect::<InputNotification>();
    let (right, on_right) = collect::<InputNotification>();
    injector.events().left_clicked.subscribe(on_left);
    injector.events().right_clicked.subscribe(on_right);

    // Act
    let first = injector.simulate_mouse_click(ButtonKind::Left);
    let second = injector.simulate_mouse_click(ButtonKind::Right);

    // Assert
    assert!(first.is_success() && second.is_success());
    assert_eq!(*left.lock().unwrap(), vec![InputNotification::new(300, 400, ButtonKind::Left)]);
    assert_eq!(*right.lock().unwrap(), vec![InputNotification::new(300, 400, ButtonKind::Right)]);
}

#[test]
fn test_pull_down_then_up_fires_pressed_then_released() {
    // Arrange
    let recorder = Arc::new(RecordingInjector::new());
    let (injector, _) = make_injector(&recorder);
    let order = Arc::new(Mutex::new(Vec::new()));
    let pressed = Arc::clone(&order);
    let released = Arc::clone(&order);
    injector
        .events()
        .button_pressed
        .subscribe(move |n: &InputNotification| pressed.lock().unwrap().push(("pressed", n.button)));
    injector
        .events()
        .button_released
        .subscribe(move |n: &InputNotification| released.lock().unwrap().push(("released", n.button)));

    // Act
    let down = injector.simulate_mouse_pull_down(ButtonKind::Right);
    let up = injector.simulate_mouse_pull_up(ButtonKind::Right);

    // Assert
    assert!(down.is_success() && up.is_success());
    assert_eq!(
        *order.lock().unwrap(),
        vec![("pressed", ButtonKind::Right), ("released", ButtonKind::Right)]
    );
    assert_eq!(
        recorder.calls(),
        vec![
            InjectorCall::MouseButton { button: MouseButton::Right, press: Press::Down },
            InjectorCall::MouseButton { button: MouseButton::Right, press: Press::Up },
        ]
    );
}

#[test]
fn test_key_a_scenario() {
    // Arrange
    let recorder = Arc::new(RecordingInjector::new());
    let (injector, journal) = make_injector(&recorder);
    let (keys, on_key) = collect::<KeyPress>();
    injector.events().key_pressed.subscribe(on_key);

    // Act
    let outcome = injector.simulate_key_pressing(0x41);

    // Assert
    assert_eq!(outcome.code(), 1);
    assert_eq!(
        recorder.calls(),
        vec![
            InjectorCall::Key { key_code: 0x41, press: Press::Down },
            InjectorCall::Key { key_code: 0x41, press: Press::Up },
        ]
    );
    assert_eq!(*keys.lock().unwrap(), vec![KeyPress::new(0x41)]);
    assert_eq!(journal.lines(), vec!["simulated key press: A (0x41)"]);
}

#[test]
fn test_keyboard_failure_fires_no_notification() {
    // Arrange
    let recorder = Arc::new(RecordingInjector::new());
    let (injector, journal) = make_injector(&recorder);
    let (keys, on_key) = collect::<KeyPress>();
    injector.events().key_pressed.subscribe(on_key);
    recorder.set_fail_keyboard(true);

    // Act
    let outcome = injector.simulate_key_pressing(0x0D);

    // Assert
    assert!(outcome.is_failure());
    assert!(keys.lock().unwrap().is_empty());
    assert!(journal.lines()[0].starts_with("error: keyboard injection failed"));
}

#[test]
fn test_concurrent_gestures_are_never_interleaved() {
    // Arrange: each call sleeps so an unserialized controller would interleave.
    let recorder = Arc::new(RecordingInjector::with_call_delay(Duration::from_millis(1)));
    let (injector, _) = make_injector(&recorder);
    const THREADS: usize = 12;

    // Act
    let workers: Vec<_> = (0..THREADS)
        .map(|i| {
            let injector = Arc::clone(&injector);
            thread::spawn(move || match i % 4 {
                0 => injector.simulate_mouse_click(ButtonKind::Left),
                1 => injector.simulate_mouse_click(ButtonKind::Right),
                2 => injector.simulate_key_pressing(0x41 + i as u8),
                _ => injector.set_cursor_position(i as i32, i as i32),
            })
        })
        .collect();
    let outcomes: Vec<_> = workers.into_iter().map(|w| w.join().unwrap()).collect();

    // Assert
    assert!(outcomes.iter().all(|o| o.is_success()));
    let calls = recorder.calls();
    assert_eq!(calls.len(), 3 * (THREADS / 4) * 2 + THREADS / 4);
    assert_gestures_not_interleaved(&calls);
}

#[test]
fn test_handler_may_reenter_controller() {
    // Arrange: the lock is released before dispatch, so this must not deadlock.
    let recorder = Arc::new(RecordingInjector::new());
    let (injector, _) = make_injector(&recorder);
    let inner = Arc::downgrade(&injector);
    injector.events().left_clicked.subscribe(move |_: &InputNotification| {
        if let Some(injector) = inner.upgrade() {
            let _ = injector.simulate_key_pressing(0x20);
        }
    });

    // Act
    let outcome = injector.simulate_mouse_click(ButtonKind::Left);

    // Assert
    assert!(outcome.is_success());
    assert_eq!(recorder.calls().len(), 4);
}
