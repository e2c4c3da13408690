//! Kanban board in the terminal.

use std::error::Error;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use mockable::DefaultClock;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

use kanban::ui::{self, BoardLayout};
use kanban::{run_command, App, Command, Config, FileStore, KanbanBoard, LoadOutcome};

#[derive(Parser)]
#[command(name = "kanban")]
#[command(about = "Kanban board with to do, in progress and done columns")]
#[command(version)]
struct Cli {
    /// Directory holding the board data
    #[arg(short, long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Directory exports are written to (defaults to the data directory)
    #[arg(long, global = true)]
    export_dir: Option<PathBuf>,

    /// Log file for the interactive board (defaults to <data-dir>/kanban.log)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Without a subcommand the interactive board opens
    #[command(subcommand)]
    command: Option<Command>,
}

type Board = KanbanBoard<FileStore, DefaultClock>;

fn main() {
    let cli = Cli::parse();
    let config = Config::new(cli.data_dir, cli.export_dir, cli.log_file);

    let result: Result<(), Box<dyn Error>> = match cli.command {
        None => run_board(&config),
        Some(command) => {
            init_stderr_logging();
            let mut board = open_board(&config);
            run_command(command, &mut board, &config.export_dir, confirm)
                .map(|output| print!("{output}"))
                .map_err(Into::into)
        }
    };
    if let Err(err) = result {
        eprintln!("{err}");
        process::exit(1);
    }
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kanban=info"))
}

fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(env_filter())
        .init();
}

fn open_board(config: &Config) -> Board {
    let mut board = KanbanBoard::new(config.store(), DefaultClock);
    if board.load() == LoadOutcome::Recovered {
        eprintln!("Stored board was unreadable; starting with an empty board");
    }
    board
}

fn confirm(message: &str) -> io::Result<bool> {
    println!("{message} [y/N]");
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(matches!(input.trim(), "y" | "Y" | "yes"))
}

fn run_board(config: &Config) -> Result<(), Box<dyn Error>> {
    // The terminal belongs to the board, so logs go to a file.
    if let Some(parent) = config.log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_file = fs::File::create(&config.log_file)?;
    tracing_subscriber::fmt()
        .with_writer(std::sync::Mutex::new(log_file))
        .with_env_filter(env_filter())
        .with_ansi(false)
        .init();

    let board = KanbanBoard::open(config.store(), DefaultClock);
    info!(data_dir = %config.data_dir.display(), tasks = board.len(), "Starting board");
    let mut app = App::new(board, config.export_dir.clone());

    // Terminal setup
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("Board closed");
    result.map_err(|e| e.into())
}

fn run_app<B: Backend, S, C>(terminal: &mut Terminal<B>, app: &mut App<S, C>) -> io::Result<()>
where
    S: kanban::KeyValueStore,
    C: mockable::Clock,
{
    loop {
        let mut layout = BoardLayout::default();
        terminal.draw(|f| layout = ui::render(f, app, Instant::now()))?;
        app.set_layout(layout);

        // Poll with a timeout so toasts expire without input.
        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if app.handle_key(key, Instant::now()) {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => app.handle_mouse(mouse),
                _ => {}
            }
        }
        app.tick(Instant::now());
    }
}
