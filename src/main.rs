use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use ratatui::{backend::CrosstermBackend, Terminal};
use skyflap::cli::{self, Command, PlayOptions};
use skyflap::{build_info, logging, ui};
use skyflap::input::HeldJumpFilter;
use skyflap::{FrameInput, GameConfig, GameContext, GameError, SceneManager};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let options = match cli::parse(&args) {
        Ok(Command::Version) => {
            println!("{}", build_info::version_line());
            return;
        }
        Ok(Command::Help) => {
            println!("{}", cli::USAGE);
            return;
        }
        Ok(Command::Play(options)) => options,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    if let Err(e) = run(options) {
        eprintln!("skyflap: {}", e);
        std::process::exit(1);
    }
}

fn run(options: PlayOptions) -> Result<(), GameError> {
    // Logging is best effort; the game runs without it
    let log_path = logging::init().ok();

    let mut config = match &options.config {
        Some(path) => GameConfig::load_from(path)?,
        None => GameConfig::load_or_default(),
    };
    if let Some(source) = options.messages {
        config.messages = source;
    }

    let ctx = match options.seed {
        Some(seed) => GameContext::with_seed(config, seed),
        None => GameContext::new(config),
    };
    tracing::info!(
        version = %build_info::version_line(),
        log = ?log_path,
        seed = ?options.seed,
        "starting"
    );

    let (mut terminal, enhanced_keys) = setup_terminal()?;
    // Repeats are only tagged under the keyboard enhancement protocol
    let held_filter = (!enhanced_keys)
        .then(|| HeldJumpFilter::new(ctx.config.key_repeat_window()));
    tracing::debug!(enhanced_keys, "keyboard setup");

    let result = run_loop(&mut terminal, SceneManager::new(ctx), held_filter);
    restore_terminal(&mut terminal, enhanced_keys)?;
    result
}

/// Returns the terminal and whether key event types are being reported.
fn setup_terminal() -> io::Result<(Terminal<CrosstermBackend<Stdout>>, bool)> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let enhanced = supports_keyboard_enhancement().unwrap_or(false);
    if enhanced {
        stdout.execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))?;
    }
    Ok((Terminal::new(CrosstermBackend::new(stdout))?, enhanced))
}

fn restore_terminal(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    enhanced_keys: bool,
) -> io::Result<()> {
    if enhanced_keys {
        terminal.backend_mut().execute(PopKeyboardEnhancementFlags)?;
    }
    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()
}

/// Fixed-cadence frame loop: draw, drain input until the next frame is due,
/// then step the active scene with the real elapsed time.
fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut manager: SceneManager,
    mut held_filter: Option<HeldJumpFilter>,
) -> Result<(), GameError> {
    let frame_interval = manager.context().config.frame_interval();
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|frame| ui::draw(frame, &manager))?;

        let mut input = FrameInput::default();
        let deadline = last_frame + frame_interval;
        loop {
            let timeout = deadline.saturating_duration_since(Instant::now());
            if !event::poll(timeout)? {
                break;
            }
            input.apply(&event::read()?);
        }

        if input.quit {
            manager.shutdown();
            tracing::info!("quit requested");
            return Ok(());
        }

        let now = Instant::now();
        if let Some(filter) = held_filter.as_mut() {
            filter.filter(&mut input, now);
        }
        // Clamp long stalls (terminal resize, suspend) to a few frames
        let dt = (now - last_frame).min(Duration::from_millis(250));
        last_frame = now;

        manager.update(dt, &input);
    }
}
