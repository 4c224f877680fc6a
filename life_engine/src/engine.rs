// engine.rs - Async task that owns the board and runs the clock

use std::future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};

use crate::board::{Board, Cell};
use crate::clock::{IntervalChange, SimulationClock};
use crate::error::{EngineError, Result};

/// State published to observers after every change.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub generation: u64,
    pub running: bool,
    pub interval: Duration,
    pub rows: usize,
    pub cols: usize,
    pub live_cells: Vec<Cell>,
}

impl Snapshot {
    pub fn population(&self) -> usize {
        self.live_cells.len()
    }
}

#[derive(Debug)]
enum Command {
    Toggle { x: usize, y: usize },
    Clear,
    Randomize { density: f64 },
    Start,
    Stop,
    SetInterval(Duration),
    Step,
    Shutdown,
}

struct Request {
    command: Command,
    reply: oneshot::Sender<Result<()>>,
}

/// The single owner of a [`Board`] while it is being simulated.
///
/// Runs as one tokio task. Commands and scheduled advances are handled one at
/// a time, so an advance never overlaps another advance or a command.
pub struct Simulation {
    board: Board,
    clock: SimulationClock,
    generation: u64,
    snapshots: watch::Sender<Snapshot>,
}

impl Simulation {
    /// Spawns the simulation task on the current tokio runtime.
    /// Fails with `NoRuntime` when called outside one.
    pub fn spawn(board: Board, interval: Duration) -> Result<SimulationHandle> {
        let runtime = Handle::try_current().map_err(|_| EngineError::NoRuntime)?;
        let clock = SimulationClock::new(interval)?;
        let (commands, inbox) = mpsc::unbounded_channel();
        let (snapshots, receiver) = watch::channel(Self::capture(&board, &clock, 0));

        let simulation = Self { board, clock, generation: 0, snapshots };
        info!(rows = simulation.board.rows(), cols = simulation.board.cols(), ?interval, "simulation spawned");
        let task = runtime.spawn(simulation.run(inbox));

        Ok(SimulationHandle { commands, snapshots: receiver, task: Some(task) })
    }

    async fn run(mut self, mut inbox: mpsc::UnboundedReceiver<Request>) {
        loop {
            tokio::select! {
                // Commands first: a stop that is already queued wins over a due advance.
                biased;

                request = inbox.recv() => {
                    let Some(Request { command, reply }) = request else {
                        break;  // Every handle is gone
                    };
                    let shutdown = matches!(command, Command::Shutdown);
                    let _ = reply.send(self.apply(command));
                    if shutdown {
                        break;
                    }
                }

                () = wait_for(self.clock.deadline()) => self.tick(),
            }
        }
        self.clock.stop();
        debug!(generation = self.generation, "simulation task finished");
    }

    fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Toggle { x, y } => {
                if self.clock.is_running() {
                    warn!(x, y, "toggle ignored while running");
                    return Ok(());
                }
                self.board.toggle(x, y);
                self.publish();
            }
            Command::Clear => {
                self.clock.stop();
                self.board.clear();
                self.generation = 0;
                self.publish();
            }
            Command::Randomize { density } => {
                if let Err(err) = crate::config::validate_density(density) {
                    warn!(density, "randomize rejected");
                    return Err(err);
                }
                self.clock.stop();
                self.board.randomize(density)?;
                self.generation = 0;
                self.publish();
            }
            Command::Start => {
                if self.clock.start(Instant::now()) {
                    info!(interval = ?self.clock.interval(), "simulation started");
                    self.advance();
                }
            }
            Command::Stop => {
                if self.clock.stop() {
                    info!(generation = self.generation, "simulation stopped");
                    self.publish();
                }
            }
            Command::SetInterval(interval) => {
                match self.clock.set_interval(interval, Instant::now()) {
                    Ok(IntervalChange::Restarted) => {
                        info!(?interval, "interval changed, restarting");
                        self.advance();
                    }
                    Ok(IntervalChange::Stored) => {
                        info!(?interval, "interval changed");
                        self.publish();
                    }
                    Err(err) => {
                        warn!(?interval, "interval rejected");
                        return Err(err);
                    }
                }
            }
            Command::Step => {
                if self.clock.is_running() {
                    warn!("step ignored while running");
                    return Ok(());
                }
                self.advance();
            }
            Command::Shutdown => {
                self.clock.stop();
                info!(generation = self.generation, "simulation shutting down");
            }
        }
        Ok(())
    }

    fn tick(&mut self) {
        if self.clock.is_due(Instant::now()) {
            self.advance();
        }
    }

    /// One generation, published, then the next advance scheduled if running.
    fn advance(&mut self) {
        self.board.advance_generation();
        self.generation += 1;
        debug!(generation = self.generation, population = self.board.population(), "generation advanced");
        self.publish();
        self.clock.advanced(Instant::now());
    }

    fn publish(&self) {
        self.snapshots.send_replace(Self::capture(&self.board, &self.clock, self.generation));
    }

    fn capture(board: &Board, clock: &SimulationClock, generation: u64) -> Snapshot {
        Snapshot {
            generation,
            running: clock.is_running(),
            interval: clock.interval(),
            rows: board.rows(),
            cols: board.cols(),
            live_cells: board.live_cells(),
        }
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => time::sleep_until(deadline).await,
        None => future::pending().await,
    }
}

/// Front door to a running [`Simulation`].
///
/// Each command resolves once the simulation task has applied it. Dropping the
/// handle aborts the task, so nothing advances after its owner is gone.
pub struct SimulationHandle {
    commands: mpsc::UnboundedSender<Request>,
    snapshots: watch::Receiver<Snapshot>,
    task: Option<JoinHandle<()>>,
}

impl SimulationHandle {
    async fn send(&self, command: Command) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Request { command, reply })
            .map_err(|_| EngineError::Closed)?;
        response.await.map_err(|_| EngineError::Closed)?
    }

    /// Flips a cell. Ignored while running and for out-of-range coordinates.
    pub async fn toggle(&self, x: usize, y: usize) -> Result<()> {
        self.send(Command::Toggle { x, y }).await
    }

    /// Stops the clock and kills every cell.
    pub async fn clear(&self) -> Result<()> {
        self.send(Command::Clear).await
    }

    /// Stops the clock and reseeds the board.
    pub async fn randomize(&self, density: f64) -> Result<()> {
        self.send(Command::Randomize { density }).await
    }

    /// Advances once right away, then every interval until stopped.
    pub async fn start(&self) -> Result<()> {
        self.send(Command::Start).await
    }

    /// Once this returns, no further advance fires until the next start.
    pub async fn stop(&self) -> Result<()> {
        self.send(Command::Stop).await
    }

    pub async fn set_interval(&self, interval: Duration) -> Result<()> {
        self.send(Command::SetInterval(interval)).await
    }

    /// Single manual advance. Ignored while running.
    pub async fn step(&self) -> Result<()> {
        self.send(Command::Step).await
    }

    /// Latest published state.
    pub fn snapshot(&self) -> Snapshot {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.clone()
    }

    /// Stops the clock and waits for the task to exit.
    pub async fn shutdown(mut self) -> Result<()> {
        self.send(Command::Shutdown).await?;
        if let Some(task) = self.task.take() {
            task.await.map_err(|_| EngineError::Closed)?;
        }
        Ok(())
    }
}

impl Drop for SimulationHandle {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
