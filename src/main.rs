//! cellcurses demo
//!
//! Run with: cargo run -- [options]
//!
//! Options:
//!   --config <path>  Load settings from a JSON file
//!   --headless       Draw into memory with scripted keys and print the
//!                    resulting screen

use std::env;
use std::process;

use log::{error, info};

use cellcurses::backend::{AnsiBackend, MemoryBackend, ScriptedInput};
use cellcurses::{
    color_pair, mvprintw, Color, Config, DisplayBackend, InputSource, Key, KeyCode,
    ModeControl, RawEvent, Screen, Style, VirtualKey,
};

fn main() {
    let args: Vec<String> = env::args().collect();

    let mut config_path: Option<String> = None;
    let mut headless = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                if i + 1 < args.len() {
                    config_path = Some(args[i + 1].clone());
                    i += 2;
                } else {
                    eprintln!("Error: --config requires a path");
                    process::exit(1);
                }
            }
            "--headless" => {
                headless = true;
                i += 1;
            }
            "--help" | "-h" => {
                println!("cellcurses-demo v0.1.0");
                println!();
                println!("Usage: cellcurses-demo [options]");
                println!();
                println!("Options:");
                println!("  --config <path>  Load settings from a JSON file");
                println!("  --headless       Render into memory and print the result");
                println!("  --help, -h       Show this help");
                process::exit(0);
            }
            other => {
                eprintln!("Error: unknown argument {}", other);
                process::exit(1);
            }
        }
    }

    let config = match config_path {
        Some(path) => match Config::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: cannot load {}: {}", path, e);
                process::exit(1);
            }
        },
        None => Config::default(),
    };

    // Logs go to stderr so they stay off the drawn screen
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_filter.as_str()),
    )
    .target(env_logger::Target::Stderr)
    .init();

    let result = if headless {
        run_headless(config)
    } else {
        run_terminal(config)
    };

    if let Err(e) = result {
        error!("{}", e);
        process::exit(1);
    }
}

#[cfg(unix)]
fn run_terminal(config: Config) -> cellcurses::Result<()> {
    let backend = AnsiBackend::new(std::io::stdout(), config.fallback_size());
    let input = cellcurses::backend::TtyInput::new()?;
    let mut scr = Screen::init(backend, input, config)?;
    info!("terminal is {}x{}", scr.size().rows, scr.size().cols);
    let outcome = demo(&mut scr);
    scr.end()?;
    outcome
}

#[cfg(not(unix))]
fn run_terminal(config: Config) -> cellcurses::Result<()> {
    info!("no terminal input on this platform; running headless");
    run_headless(config)
}

fn run_headless(config: Config) -> cellcurses::Result<()> {
    let backend = MemoryBackend::new(config.fallback_rows, config.fallback_cols);
    let input = ScriptedInput::from_events([
        RawEvent::key(VirtualKey::Down, None),
        RawEvent::char('x'),
        RawEvent::key(VirtualKey::F(5), None),
        RawEvent::char('q'),
    ]);
    let mut scr = Screen::init(backend, input, config)?;
    demo(&mut scr)?;

    if let Some(grid) = scr.backend().visible_grid() {
        for row in 0..grid.rows {
            println!("{}", grid.row_text(row).trim_end());
        }
    }
    scr.end()?;
    Ok(())
}

/// Draw a color chart, then log keys until `q`.
fn demo<B, I>(scr: &mut Screen<B, I>) -> cellcurses::Result<()>
where
    B: DisplayBackend,
    I: InputSource + ModeControl,
{
    let std = scr.stdscr();
    scr.cbreak()?;
    scr.noecho();
    scr.keypad(std, true)?;

    if scr.has_colors() {
        scr.start_color()?;
        for (n, color) in Color::ALL.iter().enumerate().skip(1) {
            scr.init_pair(n, color.index(), Color::Black.index())?;
        }
    }

    scr.attr_set(std, Style::BOLD)?;
    mvprintw!(scr, 0, 0, "cellcurses demo - press keys, q quits")?;
    scr.attr_set(std, color_pair(0))?;

    let cols = scr.size().cols;
    for (n, color) in Color::ALL.iter().enumerate().skip(1) {
        let col = (n - 1) * 9;
        if col + 9 > cols {
            break;
        }
        scr.attr_set(std, color_pair(n as u32))?;
        mvprintw!(scr, 2, col, "{:?}", color)?;
    }
    scr.attr_set(std, color_pair(0))?;
    scr.move_to(4, 0)?;
    scr.refresh()?;

    let rows = scr.size().rows.saturating_sub(5).clamp(1, 10);
    let width = cols.min(40);

    let mut line = 0;
    loop {
        let key = scr.get_ch()?;
        if key == Key::Char('q') {
            break;
        }
        let label = match key {
            Key::Char(ch) => format!("char {:?} ({})", ch, key.code()),
            Key::Code(KeyCode::F(n)) => format!("function key F{} ({})", n, key.code()),
            Key::Code(code) => format!("key {:?} ({})", code, key.code()),
        };
        let label: String = label.chars().take(width).collect();
        mvprintw!(scr, 4 + line % rows, 0, "{:<width$}", label, width = width)?;
        line += 1;
        scr.refresh()?;
    }

    Ok(())
}
