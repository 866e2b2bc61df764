//! `cursor-demo`: a scripted walkthrough of the injection and observation
//! controllers.
//!
//! # What it does
//!
//! ```text
//! main()
//!  ├─ load config (file, then CLI overrides)
//!  ├─ InputInjector  ── tap key, wait, move pointer, wait, left click, wait, right click
//!  ├─ InputObserver  ── start hooks, print presses for observe_secs or until Ctrl-C, stop hooks
//!  └─ export the session journal (when an export directory is configured)
//! ```
//!
//! Every notification channel has a console handler attached, so each step
//! prints the payload it produced.
//!
//! # Dry run
//!
//! `--dry-run` swaps the Win32 adapters for the recording fakes.  Nothing
//! touches the real pointer or keyboard; the observation phase feeds one
//! synthetic click and one synthetic key press through the fake hook chain
//! instead.  Dry run is forced on targets without a Win32 adapter.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use cursor_control::application::inject_input::PlatformInjector;
use cursor_control::application::observe_input::HookPlatform;
use cursor_control::infrastructure::hooks::{self, mock::FakeHookPlatform};
use cursor_control::infrastructure::injection::{self, mock::RecordingInjector};
use cursor_control::infrastructure::storage::config::{self, AppConfig};
use cursor_control::{InputInjector, InputObserver, Outcome};
use cursor_core::domain::hook::{WM_KEYDOWN, WM_LBUTTONDOWN};
use cursor_core::{
    keymap, ButtonKind, HookEvent, InputNotification, Journal, KeyPress, MemoryJournal,
};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Drives the desktop pointer and keyboard, then watches them.
///
/// Flags override the values loaded from the config file.
#[derive(Debug, Parser)]
#[command(
    name = "cursor-demo",
    about = "Scripted walkthrough of CursorLibrary input injection and global hooks",
    version
)]
struct Cli {
    /// Config file to load instead of the platform default.
    #[arg(long, env = "CURSOR_DEMO_CONFIG")]
    config: Option<PathBuf>,

    /// Pause between walkthrough steps, in milliseconds.
    #[arg(long)]
    delay_ms: Option<u64>,

    /// Key to tap first (e.g. `A`, `Enter`, `F5`, `0x41`).
    #[arg(long)]
    key: Option<String>,

    /// Target X coordinate for the pointer move.
    #[arg(long, allow_negative_numbers = true)]
    x: Option<i32>,

    /// Target Y coordinate for the pointer move.
    #[arg(long, allow_negative_numbers = true)]
    y: Option<i32>,

    /// Seconds to keep the global hooks installed.
    #[arg(long)]
    observe_secs: Option<u64>,

    /// Existing directory to export the session journal into.
    #[arg(long)]
    export_dir: Option<PathBuf>,

    /// Use the recording fakes instead of the real OS adapters.
    #[arg(long)]
    dry_run: bool,

    /// Write the effective settings back to the config file before running.
    #[arg(long)]
    save_config: bool,
}

impl Cli {
    /// Overlays every flag that was given onto `config`.
    fn apply(&self, config: &mut AppConfig) {
        if let Some(delay_ms) = self.delay_ms {
            config.demo.step_delay_ms = delay_ms;
        }
        if let Some(key) = &self.key {
            config.demo.key = key.clone();
        }
        if let Some(x) = self.x {
            config.demo.target_x = x;
        }
        if let Some(y) = self.y {
            config.demo.target_y = y;
        }
        if let Some(secs) = self.observe_secs {
            config.demo.observe_secs = secs;
        }
        if let Some(dir) = &self.export_dir {
            config.journal.export_dir = Some(dir.clone());
        }
    }
}

// ── Wiring ────────────────────────────────────────────────────────────────────

/// The OS adapters the controllers will drive.
struct Platforms {
    injector: Arc<dyn PlatformInjector>,
    hooks: Arc<dyn HookPlatform>,
    /// Present in dry runs so the observation phase can feed events.
    fake_hooks: Option<Arc<FakeHookPlatform>>,
}

fn select_platforms(dry_run: bool) -> Platforms {
    if !dry_run {
        match (injection::default_injector(), hooks::default_hook_platform()) {
            (Ok(injector), Ok(hooks)) => {
                return Platforms {
                    injector,
                    hooks,
                    fake_hooks: None,
                }
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("{e}; falling back to dry run");
            }
        }
    }

    let fake_hooks = Arc::new(FakeHookPlatform::new());
    Platforms {
        injector: Arc::new(RecordingInjector::new()),
        hooks: Arc::clone(&fake_hooks) as Arc<dyn HookPlatform>,
        fake_hooks: Some(fake_hooks),
    }
}

fn print_notification(label: &'static str) -> impl Fn(&InputNotification) + Send + Sync {
    move |n: &InputNotification| {
        println!(
            "{label}: X={}, Y={}, button={}",
            n.position_x, n.position_y, n.button
        );
    }
}

fn print_key(label: &'static str) -> impl Fn(&KeyPress) + Send + Sync {
    move |k: &KeyPress| println!("{label}: {}", keymap::describe(k.key_code))
}

fn attach_console_handlers(injector: &InputInjector, observer: &InputObserver) {
    let events = injector.events();
    events.pointer_moved.subscribe(print_notification("mouse moved"));
    events.left_clicked.subscribe(print_notification("left mouse clicked"));
    events.right_clicked.subscribe(print_notification("right mouse clicked"));
    events.button_pressed.subscribe(print_notification("mouse pulled down"));
    events.button_released.subscribe(print_notification("mouse pulled up"));
    events.key_pressed.subscribe(print_key("key pressed"));

    let observed = observer.events();
    observed
        .button_pressed
        .subscribe(print_notification("observed mouse button"));
    observed.key_pressed.subscribe(print_key("observed key"));
}

fn report(step: &str, outcome: Outcome) {
    match outcome {
        Outcome::Success => info!("{step}: ok"),
        Outcome::Failure => warn!("{step}: failed (see journal)"),
    }
}

// ── Phases ────────────────────────────────────────────────────────────────────

/// Key tap, move, left click, right click, with `delay` between steps.
async fn run_walkthrough(
    injector: &InputInjector,
    key_code: u8,
    target: (i32, i32),
    delay: Duration,
) {
    report("key press", injector.simulate_key_pressing(key_code));
    tokio::time::sleep(delay).await;

    report("move", injector.set_cursor_position(target.0, target.1));
    tokio::time::sleep(delay).await;

    report("left click", injector.simulate_mouse_click(ButtonKind::Left));
    tokio::time::sleep(delay).await;

    report("right click", injector.simulate_mouse_click(ButtonKind::Right));
}

/// Keeps the hooks installed until `window` elapses or `running` clears.
async fn run_observation(
    observer: &InputObserver,
    fake_hooks: Option<&FakeHookPlatform>,
    window: Duration,
    running: &AtomicBool,
) {
    report("start hooks", observer.start_hooks());
    if !observer.hooks_active() {
        return;
    }

    if let Some(fake) = fake_hooks {
        fake.dispatch(HookEvent::Mouse {
            message: WM_LBUTTONDOWN,
            x: 100,
            y: 200,
        });
        fake.dispatch(HookEvent::Keyboard {
            message: WM_KEYDOWN,
            vk_code: u32::from(keymap::vk::SPACE),
        });
    }

    let deadline = tokio::time::Instant::now() + window;
    while running.load(Ordering::Relaxed) && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(100)).await;
    }

    report("stop hooks", observer.stop_hooks());
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config(cli.config.as_deref()).context("loading config")?;
    cli.apply(&mut config);

    // Level is overridden by `RUST_LOG`.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    if cli.save_config {
        let path = config::save_config(&config, cli.config.as_deref())
            .context("saving config")?;
        info!("settings written to {}", path.display());
    }

    let key_code = keymap::lookup(&config.demo.key)
        .with_context(|| format!("unknown key name '{}'", config.demo.key))?;

    let platforms = select_platforms(cli.dry_run);
    let journal = Arc::new(MemoryJournal::new());
    let injector = InputInjector::new(
        platforms.injector,
        Arc::clone(&journal) as Arc<dyn Journal>,
    );
    let observer = InputObserver::new(platforms.hooks, Arc::clone(&journal) as Arc<dyn Journal>);
    attach_console_handlers(&injector, &observer);

    info!("cursor demo starting");

    // ── Ctrl-C handler ────────────────────────────────────────────────────────
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("shutdown signal received");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => error!("failed to listen for Ctrl-C: {e}"),
        }
    });

    run_walkthrough(
        &injector,
        key_code,
        (config.demo.target_x, config.demo.target_y),
        Duration::from_millis(config.demo.step_delay_ms),
    )
    .await;

    if running.load(Ordering::Relaxed) {
        info!(
            "observing global input for {}s, press Ctrl-C to stop early",
            config.demo.observe_secs
        );
        run_observation(
            &observer,
            platforms.fake_hooks.as_deref(),
            Duration::from_secs(config.demo.observe_secs),
            &running,
        )
        .await;
    }

    if let Some(dir) = &config.journal.export_dir {
        let path = journal
            .export(dir, &config.journal.file_name)
            .context("exporting journal")?;
        info!("journal exported to {}", path.display());
    }

    info!("cursor demo finished ({} journal lines)", journal.len());
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use cursor_control::application::inject_input::{MouseButton, Press};
    use cursor_control::infrastructure::injection::mock::InjectorCall;

    #[test]
    fn test_cli_without_flags_leaves_config_untouched() {
        // Arrange
        let cli = Cli::parse_from(["cursor-demo"]);
        let mut cfg = AppConfig::default();

        // Act
        cli.apply(&mut cfg);

        // Assert
        assert_eq!(cfg, AppConfig::default());
        assert!(!cli.dry_run);
    }

    #[test]
    fn test_cli_flags_override_config() {
        // Arrange
        let cli = Cli::parse_from([
            "cursor-demo",
            "--delay-ms",
            "0",
            "--key",
            "Enter",
            "--x",
            "-1920",
            "--y",
            "40",
            "--observe-secs",
            "3",
            "--export-dir",
            "logs",
        ]);
        let mut cfg = AppConfig::default();

        // Act
        cli.apply(&mut cfg);

        // Assert
        assert_eq!(cfg.demo.step_delay_ms, 0);
        assert_eq!(cfg.demo.key, "Enter");
        assert_eq!((cfg.demo.target_x, cfg.demo.target_y), (-1920, 40));
        assert_eq!(cfg.demo.observe_secs, 3);
        assert_eq!(cfg.journal.export_dir, Some(PathBuf::from("logs")));
    }

    #[test]
    fn test_dry_run_selects_fakes() {
        let platforms = select_platforms(true);
        assert!(platforms.fake_hooks.is_some());
    }

    #[test]
    fn test_walkthrough_issues_calls_in_order() {
        // Arrange
        let recorder = Arc::new(RecordingInjector::new());
        let injector = InputInjector::new(
            Arc::clone(&recorder) as Arc<dyn PlatformInjector>,
            Arc::new(MemoryJournal::new()),
        );

        // Act
        tokio_test::block_on(run_walkthrough(&injector, 0x41, (0, 0), Duration::ZERO));

        // Assert
        assert_eq!(
            recorder.calls(),
            vec![
                InjectorCall::Key { key_code: 0x41, press: Press::Down },
                InjectorCall::Key { key_code: 0x41, press: Press::Up },
                InjectorCall::SetCursorPos { x: 0, y: 0 },
                InjectorCall::MouseButton { button: MouseButton::Left, press: Press::Down },
                InjectorCall::MouseButton { button: MouseButton::Left, press: Press::Up },
                InjectorCall::MouseButton { button: MouseButton::Right, press: Press::Down },
                InjectorCall::MouseButton { button: MouseButton::Right, press: Press::Up },
            ]
        );
    }

    #[tokio::test]
    async fn test_observation_feeds_fake_events_and_removes_hooks() {
        // Arrange
        let fake = Arc::new(FakeHookPlatform::new());
        let journal = Arc::new(MemoryJournal::new());
        let observer = InputObserver::new(
            Arc::clone(&fake) as Arc<dyn HookPlatform>,
            Arc::clone(&journal) as Arc<dyn Journal>,
        );
        let running = AtomicBool::new(true);

        // Act
        run_observation(&observer, Some(fake.as_ref()), Duration::ZERO, &running).await;

        // Assert
        assert!(!observer.hooks_active());
        assert_eq!(fake.installed_count(), 0);
        let lines = journal.lines();
        assert!(lines.iter().any(|l| l == "mouse button pressed: left, X=100, Y=200"));
        assert!(lines.iter().any(|l| l == "key pressed: Space (0x20)"));
    }
}
