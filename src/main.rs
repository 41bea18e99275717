// lrstep: stepped replay of LR grammar analysis

use std::io;
use std::process;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use lrstep::config::{Cli, Config};
use lrstep::headless;
use lrstep::session::{Phase, SessionController};
use lrstep::tool::{AnalysisTool, LrParserTool};
use lrstep::ui::{App, TuiVisualizer};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::from_cli(cli);

    let tool: Arc<dyn AnalysisTool> = Arc::new(LrParserTool::new(config.tool.clone()));
    let controller = SessionController::new(Phase::Grammar, tool, config.deadline());

    if config.headless {
        let stdout = io::stdout().lock();
        if let Err(e) = headless::run(controller, config.request, config.input.as_deref(), stdout)
        {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
        return Ok(());
    }

    // Run the analysis before taking over the terminal so failures stay readable
    eprintln!("Running {} analysis...", config.request.mode);
    let mut controller = controller;
    let mut visualizer = TuiVisualizer::new();
    if let Err(e) = controller.start(config.request, &mut visualizer) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(controller, visualizer, config.input);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
