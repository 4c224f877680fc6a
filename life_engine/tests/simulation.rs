// Scheduling, cancellation and teardown of the simulation task, in virtual time.

use std::time::Duration;

use life_engine::{Board, Cell, EngineError, MAX_INTERVAL, Simulation, SimulationHandle};
use tokio::time::{sleep, timeout};

const TICK: Duration = Duration::from_millis(100);
const HALF: Duration = Duration::from_millis(50);

/// A blinker never dies out, so every advance is visible in the snapshot.
fn blinker() -> Board {
    Board::from_rows(&[".....", ".....", ".###.", ".....", "....."]).unwrap()
}

fn spawn_blinker() -> SimulationHandle {
    Simulation::spawn(blinker(), TICK).unwrap()
}

#[tokio::test(start_paused = true)]
async fn start_advances_immediately_then_every_interval() {
    let sim = spawn_blinker();
    assert_eq!(sim.snapshot().generation, 0);

    sim.start().await.unwrap();
    let snapshot = sim.snapshot();
    assert!(snapshot.running);
    assert_eq!(snapshot.generation, 1);
    assert_eq!(snapshot.live_cells, vec![Cell { x: 2, y: 1 }, Cell { x: 2, y: 2 }, Cell { x: 2, y: 3 }]);

    sleep(TICK * 3 + HALF).await;
    assert_eq!(sim.snapshot().generation, 4);
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_the_pending_advance() {
    let sim = spawn_blinker();
    sim.start().await.unwrap();
    sleep(TICK * 2 + HALF).await;
    sim.stop().await.unwrap();

    let stopped = sim.snapshot();
    assert!(!stopped.running);
    assert_eq!(stopped.generation, 3);

    sleep(TICK * 10).await;
    assert_eq!(sim.snapshot().generation, 3);
}

#[tokio::test(start_paused = true)]
async fn start_while_running_does_not_double_schedule() {
    let sim = spawn_blinker();
    sim.start().await.unwrap();
    sim.start().await.unwrap();
    assert_eq!(sim.snapshot().generation, 1);

    sleep(TICK + HALF).await;
    assert_eq!(sim.snapshot().generation, 2);
}

#[tokio::test(start_paused = true)]
async fn interval_change_restarts_with_an_extra_advance() {
    let sim = spawn_blinker();
    sim.start().await.unwrap();
    sleep(HALF).await;

    sim.set_interval(Duration::from_millis(200)).await.unwrap();
    assert_eq!(sim.snapshot().generation, 2);
    assert_eq!(sim.snapshot().interval, Duration::from_millis(200));

    // Next advance lands 200 ms after the restart, not on the old 100 ms beat.
    sleep(Duration::from_millis(190)).await;
    assert_eq!(sim.snapshot().generation, 2);
    sleep(Duration::from_millis(20)).await;
    assert_eq!(sim.snapshot().generation, 3);
}

#[tokio::test(start_paused = true)]
async fn interval_change_while_stopped_does_not_advance() {
    let sim = spawn_blinker();
    sim.set_interval(Duration::from_millis(300)).await.unwrap();
    let snapshot = sim.snapshot();
    assert!(!snapshot.running);
    assert_eq!(snapshot.generation, 0);
    assert_eq!(snapshot.interval, Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn rejected_interval_keeps_the_old_cadence() {
    let sim = spawn_blinker();
    sim.start().await.unwrap();
    let err = sim.set_interval(Duration::ZERO).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInterval(_)));
    assert_eq!(sim.snapshot().interval, TICK);

    sleep(TICK + HALF).await;
    assert_eq!(sim.snapshot().generation, 2);
}

#[tokio::test(start_paused = true)]
async fn oversized_interval_is_rejected_and_the_task_survives() {
    let sim = spawn_blinker();
    sim.start().await.unwrap();

    let err = sim.set_interval(Duration::MAX).await.unwrap_err();
    assert!(matches!(err, EngineError::InvalidInterval(_)));
    assert_eq!(sim.snapshot().interval, TICK);

    sleep(TICK + HALF).await;
    assert_eq!(sim.snapshot().generation, 2);

    // The longest accepted interval still schedules without overflowing.
    sim.set_interval(MAX_INTERVAL).await.unwrap();
    assert_eq!(sim.snapshot().generation, 3);
    sim.stop().await.unwrap();
    assert!(!sim.snapshot().running);
}

#[tokio::test(start_paused = true)]
async fn clear_stops_the_clock_and_empties_the_board() {
    let sim = spawn_blinker();
    sim.start().await.unwrap();
    sleep(TICK + HALF).await;

    sim.clear().await.unwrap();
    let cleared = sim.snapshot();
    assert!(!cleared.running);
    assert_eq!(cleared.generation, 0);
    assert!(cleared.live_cells.is_empty());

    sleep(TICK * 5).await;
    assert_eq!(sim.snapshot().generation, 0);
}

#[tokio::test(start_paused = true)]
async fn randomize_stops_the_clock() {
    let sim = spawn_blinker();
    sim.start().await.unwrap();

    sim.randomize(1.0).await.unwrap();
    let seeded = sim.snapshot();
    assert!(!seeded.running);
    assert_eq!(seeded.population(), 25);

    sleep(TICK * 5).await;
    assert_eq!(sim.snapshot().generation, 0);
}

#[tokio::test(start_paused = true)]
async fn bad_density_leaves_everything_alone() {
    let sim = spawn_blinker();
    sim.start().await.unwrap();
    let err = sim.randomize(2.0).await.unwrap_err();
    assert_eq!(err, EngineError::InvalidDensity(2.0));
    assert!(sim.snapshot().running);
}

#[tokio::test(start_paused = true)]
async fn toggle_only_applies_while_stopped() {
    let sim = spawn_blinker();
    sim.toggle(0, 0).await.unwrap();
    assert!(sim.snapshot().live_cells.contains(&Cell { x: 0, y: 0 }));

    sim.start().await.unwrap();
    let before = sim.snapshot();
    sim.toggle(4, 4).await.unwrap();
    assert_eq!(sim.snapshot(), before);
}

#[tokio::test(start_paused = true)]
async fn step_advances_once_while_stopped() {
    let sim = spawn_blinker();
    sim.step().await.unwrap();
    sim.step().await.unwrap();
    let snapshot = sim.snapshot();
    assert_eq!(snapshot.generation, 2);
    assert_eq!(snapshot.live_cells, blinker().live_cells());
    assert!(!snapshot.running);
}

#[tokio::test(start_paused = true)]
async fn observers_see_each_generation() {
    let sim = spawn_blinker();
    let mut updates = sim.subscribe();
    sim.start().await.unwrap();

    let mut seen = Vec::new();
    while seen.len() < 3 {
        updates.changed().await.unwrap();
        seen.push(updates.borrow_and_update().generation);
    }
    assert_eq!(seen, vec![1, 2, 3]);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_handle_ends_the_task() {
    let sim = spawn_blinker();
    let mut updates = sim.subscribe();
    sim.start().await.unwrap();
    let last = sim.snapshot().generation;
    drop(sim);

    let drained = timeout(TICK * 10, async {
        while updates.changed().await.is_ok() {}
    })
    .await;
    assert!(drained.is_ok(), "snapshot sender outlived the handle");
    assert_eq!(updates.borrow().generation, last);
}

#[tokio::test(start_paused = true)]
async fn shutdown_waits_for_the_task() {
    let sim = spawn_blinker();
    let mut updates = sim.subscribe();
    sim.start().await.unwrap();
    updates.borrow_and_update();
    sim.shutdown().await.unwrap();
    assert!(updates.changed().await.is_err());
}

#[tokio::test]
async fn invalid_interval_fails_spawn() {
    let err = Simulation::spawn(blinker(), Duration::ZERO).err();
    assert!(matches!(err, Some(EngineError::InvalidInterval(_))));
}

#[test]
fn spawn_outside_a_runtime_is_an_error() {
    let err = Simulation::spawn(blinker(), TICK).err();
    assert_eq!(err, Some(EngineError::NoRuntime));
}
