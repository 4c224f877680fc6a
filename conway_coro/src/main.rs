// main.rs - Conway's Game of Life front end
// The simulation runs as a task on a tokio runtime owned by the app; the UI only sends
// commands and draws the latest snapshot.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;
use egui::Color32;
use life_engine::{CellSize, LifeConfig, Simulation, SimulationHandle};
use tracing::{info, warn};

mod ui;

#[derive(Parser, Debug)]
#[command(name = "conway_coro", version, about = "Conway's Game of Life on a clickable grid")]
struct Args {
    /// Board width in pixels.
    #[arg(long, env = "CONWAY_WIDTH", default_value_t = life_engine::config::DEFAULT_WIDTH)]
    width: u32,

    /// Board height in pixels.
    #[arg(long, env = "CONWAY_HEIGHT", default_value_t = life_engine::config::DEFAULT_HEIGHT)]
    height: u32,

    /// Side of one cell in pixels.
    #[arg(long, env = "CONWAY_CELL_SIZE", default_value_t = life_engine::config::DEFAULT_CELL_SIZE)]
    cell_size: u32,

    /// Delay between generations while running.
    #[arg(long, env = "CONWAY_INTERVAL_MS", default_value_t = life_engine::config::DEFAULT_INTERVAL_MS)]
    interval_ms: u64,

    /// Share of cells seeded alive by Randomize.
    #[arg(long, env = "CONWAY_DENSITY", default_value_t = life_engine::config::DEFAULT_DENSITY)]
    density: f64,
}

impl Args {
    fn into_config(self) -> Result<LifeConfig> {
        let cell_size = CellSize::new(self.cell_size).context("--cell-size must be positive")?;
        let config = LifeConfig {
            width: self.width,
            height: self.height,
            cell_size,
            interval: Duration::from_millis(self.interval_ms),
            density: self.density,
        };
        config.validate().context("invalid configuration")?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    init_tracing();
    let config = Args::parse().into_config()?;
    let app = GameOfLife::new(config)?;

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([app.board_width() + 40.0, app.board_height() + 140.0]),
        ..Default::default()
    };

    info!("Starting Conway's Game of Life");
    eframe::run_native(
        "Conway's Game of Life",
        options,
        Box::new(|_cc| Box::new(app)),
    )
    .map_err(|err| anyhow!("eframe exited with an error: {err}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// UI state around a running simulation.
pub struct GameOfLife {
    config: LifeConfig,
    simulation: Option<SimulationHandle>,
    runtime: tokio::runtime::Runtime,

    pub speed_text: String,
    pub status: Option<String>,
    pub live_color: Color32,
    pub dead_color: Color32,
    pub grid_color: Color32,
}

impl GameOfLife {
    pub fn new(config: LifeConfig) -> Result<Self> {
        let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
        let board = config.empty_board()?;
        let simulation = {
            let _guard = runtime.enter();
            Simulation::spawn(board, config.interval)?
        };

        Ok(Self {
            speed_text: config.interval.as_millis().to_string(),
            config,
            simulation: Some(simulation),
            runtime,
            status: None,
            live_color: Color32::WHITE,
            dead_color: Color32::BLACK,
            grid_color: Color32::from_gray(0x33),
        })
    }

    pub fn cell_size(&self) -> CellSize {
        self.config.cell_size
    }

    pub fn board_width(&self) -> f32 {
        (self.config.cols() as u32 * self.cell_size().get()) as f32
    }

    pub fn board_height(&self) -> f32 {
        (self.config.rows() as u32 * self.cell_size().get()) as f32
    }

    pub fn simulation(&self) -> Option<&SimulationHandle> {
        self.simulation.as_ref()
    }

    fn report(&mut self, what: &str, result: life_engine::Result<()>) {
        match result {
            Ok(()) => self.status = None,
            Err(err) => {
                warn!(%err, "{what} failed");
                self.status = Some(format!("{what}: {err}"));
            }
        }
    }

    pub fn toggle_cell(&mut self, x: usize, y: usize) {
        if let Some(sim) = &self.simulation {
            let result = self.runtime.block_on(sim.toggle(x, y));
            self.report("Toggle", result);
        }
    }

    pub fn start_stop(&mut self, running: bool) {
        if let Some(sim) = &self.simulation {
            let result = if running {
                self.runtime.block_on(sim.stop())
            } else {
                self.runtime.block_on(sim.start())
            };
            self.report(if running { "Stop" } else { "Start" }, result);
        }
    }

    pub fn clear(&mut self) {
        if let Some(sim) = &self.simulation {
            let result = self.runtime.block_on(sim.clear());
            self.report("Clear", result);
        }
    }

    pub fn randomize(&mut self) {
        if let Some(sim) = &self.simulation {
            let result = self.runtime.block_on(sim.randomize(self.config.density));
            self.report("Randomize", result);
        }
    }

    /// Applies the speed field. Text that is not a positive number keeps the current interval.
    pub fn apply_speed_text(&mut self) {
        let result = match life_engine::parse_interval(&self.speed_text) {
            Ok(interval) => match &self.simulation {
                Some(sim) => self.runtime.block_on(sim.set_interval(interval)),
                None => return,
            },
            Err(err) => Err(err),
        };
        self.report("Speed", result);
    }
}

impl Drop for GameOfLife {
    fn drop(&mut self) {
        if let Some(simulation) = self.simulation.take() {
            if let Err(err) = self.runtime.block_on(simulation.shutdown()) {
                warn!(%err, "simulation did not shut down cleanly");
            }
        }
    }
}
