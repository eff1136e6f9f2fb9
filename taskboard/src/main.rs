//! `taskboard`: terminal kanban board for a task-management backend.
//!
//! Opens one project's board. Cards move between columns by mouse drag or
//! by keyboard (Enter to pick up, arrows to carry, Enter to drop); every
//! move shows immediately and is confirmed with the server in the
//! background. Configuration via CLI flags, environment variables, or
//! config file (`~/.config/taskboard/config.toml`).
//!
//! ```bash
//! # Offline demo board
//! cargo run --bin taskboard -- --offline
//!
//! # Against a running API
//! cargo run --bin taskboard -- --project p-1 --user-id u-1 \
//!     --api-url http://localhost:3001/api --token "$TOKEN"
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing_appender::non_blocking::WorkerGuard;

use taskboard::api::Backend;
use taskboard::api::http::HttpBackend;
use taskboard::api::loopback::LoopbackBackend;
use taskboard::app::{App, UiAction};
use taskboard::board::TaskBoard;
use taskboard::config::{CliArgs, ClientConfig};
use taskboard::notify::{NotificationLog, Notifier};
use taskboard::runtime::{Applied, BoardRuntime};
use taskboard::ui::{self, BoardLayout, BoardView};
use taskboard_proto::project::Project;
use taskboard_proto::task::{Task, TaskId, TaskStatus};

/// Project and user used by `--offline` when none are configured.
const DEMO_PROJECT: &str = "demo";
const DEMO_USER: &str = "demo-user";

/// Simulated round trip of the offline backend.
const DEMO_LATENCY: Duration = Duration::from_millis(400);

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    let mut config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: failed to load config file: {e}");
            ClientConfig::default()
        }
    };

    // Logs go to a file; ratatui owns stdout.
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(offline = config.offline, "taskboard starting");

    if config.offline {
        config.project_id.get_or_insert_with(|| DEMO_PROJECT.to_string());
        config.user_id.get_or_insert_with(|| DEMO_USER.to_string());
    }
    let Some(project_id) = config.project_id.clone() else {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "no project given (use --project, TASKBOARD_PROJECT, or [board] project_id)",
        ));
    };

    let mut terminal = setup_terminal()?;

    let result = if config.offline {
        let backend = Arc::new(demo_backend(
            &project_id,
            config.user_id.as_deref().unwrap_or(DEMO_USER),
        ));
        run_app(&mut terminal, backend, &config, project_id)
    } else {
        match HttpBackend::new(&config.to_http_config()) {
            Ok(backend) => run_app(&mut terminal, Arc::new(backend), &config, project_id),
            Err(e) => Err(io::Error::other(e)),
        }
    };

    restore_terminal(&mut terminal)?;

    tracing::info!("taskboard exiting");
    result
}

/// Initialize file-based logging.
///
/// Returns a [`WorkerGuard`] that must be held until shutdown so buffered
/// log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("taskboard.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    Terminal::new(CrosstermBackend::new(stdout))
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()
}

/// Main application loop.
fn run_app<B: Backend>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    backend: Arc<B>,
    config: &ClientConfig,
    project_id: String,
) -> io::Result<()> {
    let notifier = Arc::new(NotificationLog::with_limit(config.notification_limit));

    let board = TaskBoard::new(project_id, backend, Arc::clone(&notifier))
        .with_identity(config.user_id.clone(), None)
        .with_max_title_len(config.max_task_title_len);
    let mut runtime = BoardRuntime::new(board, config.channel_capacity);
    runtime.spawn_owner_lookup();
    runtime.spawn_fetch();

    let mut app = App::new();

    loop {
        // Step 1: Apply finished network work (non-blocking).
        for applied in runtime.drain() {
            apply_to_app(&mut app, applied);
        }

        // Step 2: Draw the frame and keep its geometry for hit-testing.
        let columns = runtime.board().columns();
        app.clamp_selection(&columns);
        let notifications = notifier.latest(usize::from(ui::NOTIFICATION_ROWS));
        let view = BoardView {
            project_id: runtime.board().project_id(),
            columns: &columns,
            notifications: &notifications,
            in_flight: runtime.board().in_flight(),
            can_create: runtime.board().can_create(),
            offline: config.offline,
            timestamp_format: &config.timestamp_format,
        };
        let mut layout = BoardLayout::default();
        terminal.draw(|frame| layout = ui::draw(frame, &app, &view))?;
        app.set_layout(layout);

        // Step 3: Poll for terminal input.
        if event::poll(config.poll_timeout)? {
            let action = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key_event(key, &columns)
                }
                Event::Mouse(mouse) => app.handle_mouse_event(mouse),
                _ => None,
            };
            if let Some(action) = action {
                dispatch(&mut runtime, notifier.as_ref(), action);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

/// Forwards a UI action to the board.
fn dispatch<B: Backend>(
    runtime: &mut BoardRuntime<B, NotificationLog>,
    notifier: &NotificationLog,
    action: UiAction,
) {
    match action {
        UiAction::DragStart(task_id) => {
            runtime.drag_start(task_id);
        }
        UiAction::DragEnd(target) => {
            runtime.drop_task(target);
        }
        UiAction::CreateTask { title, description } => {
            if let Err(err) = runtime.spawn_create(&title, &description) {
                notifier.error(&err.to_string());
            }
        }
        UiAction::Refresh => runtime.refresh(),
        UiAction::Quit => {}
    }
}

/// Reflects an applied board event in the view state.
fn apply_to_app(app: &mut App, applied: Applied) {
    match applied {
        Applied::Created(Ok(task)) => {
            tracing::debug!(task_id = %task.id, "closing task form");
            app.close_form();
        }
        Applied::Settled(settlement) => {
            tracing::debug!(?settlement, "status change settled");
        }
        Applied::Created(Err(_)) | Applied::Fetched(_) | Applied::Owner(_) => {}
    }
}

/// In-memory backend with a small demo project.
fn demo_backend(project_id: &str, owner_id: &str) -> LoopbackBackend {
    let backend = LoopbackBackend::new().with_latency(DEMO_LATENCY);
    backend.insert_project(Project {
        id: project_id.to_string(),
        name: "Demo project".to_string(),
        owner_id: owner_id.to_string(),
        owner: None,
        members: Vec::new(),
    });

    let demo = [
        ("Sketch the board layout", TaskStatus::Done, Some("ana@example.com")),
        ("Wire up drag and drop", TaskStatus::InProgress, Some("ana@example.com")),
        ("Confirm moves with the server", TaskStatus::InProgress, None),
        ("Roll back rejected moves", TaskStatus::Todo, Some("li@example.com")),
        ("Write the release notes", TaskStatus::Todo, None),
    ];
    backend.insert_tasks(
        project_id,
        demo.into_iter()
            .enumerate()
            .map(|(i, (title, status, assignee))| Task {
                id: TaskId::new(format!("demo-{}", i + 1)),
                title: title.to_string(),
                description: String::new(),
                status,
                assignee_email: assignee.map(str::to_string),
            }),
    );
    backend
}
