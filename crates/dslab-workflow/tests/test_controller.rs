use dslab_workflow::controller::SchedulingController;
use dslab_workflow::engine::{EngineEvent, SimulationEngine};
use dslab_workflow::error::{DependencyError, Error, PlacementError};
use dslab_workflow::graph::TaskGraph;
use dslab_workflow::placement::LeastLoadedPolicy;
use dslab_workflow::task::{Task, TaskCost, TaskDescriptor, TaskState};
use dslab_workflow::unit::UnitId;

/// Records submissions instead of executing them, completions are fed by the test.
#[derive(Default)]
struct MockEngine {
    time: f64,
    submitted: Vec<(TaskDescriptor, UnitId)>,
    handled: Vec<EngineEvent>,
}

impl MockEngine {
    fn submitted_ids(&self) -> Vec<usize> {
        self.submitted.iter().map(|(task, _)| task.task_id).collect()
    }
}

impl SimulationEngine for MockEngine {
    fn time(&self) -> f64 {
        self.time
    }

    fn submit(&mut self, task: TaskDescriptor, unit: UnitId) {
        self.submitted.push((task, unit));
    }

    fn handle_default(&mut self, event: EngineEvent) {
        self.handled.push(event);
    }
}

fn diamond() -> TaskGraph {
    let mut graph = TaskGraph::new();
    for id in 0..4 {
        let task = Task::new(id, "f", 0, TaskCost::single_slot(10, 128, 1000));
        if id == 0 {
            graph.set_root(task);
        } else {
            graph.add_task(task);
        }
    }
    graph.add_edge(0, 1);
    graph.add_edge(0, 2);
    graph.add_edge(1, 3);
    graph.add_edge(2, 3);
    graph
}

fn completed(task_id: usize, unit: UnitId) -> EngineEvent {
    EngineEvent::TaskCompleted { task_id, unit }
}

#[test]
fn test_scheduling_loop() {
    let mut engine = MockEngine::default();
    let mut controller = SchedulingController::new(diamond(), Box::new(LeastLoadedPolicy::new(2)));

    controller.on(EngineEvent::UnitProvisioned { unit: 0 }, &mut engine);
    assert!(engine.submitted.is_empty());

    controller.on(EngineEvent::UnitsReady, &mut engine);
    assert_eq!(engine.submitted, vec![(diamond().get_task(0).unwrap().descriptor(), 0)]);
    assert_eq!(controller.loads(), vec![1, 0]);
    assert_eq!(controller.unit_of(0), Some(0));

    engine.time = 10.;
    controller.on(completed(0, 0), &mut engine);
    assert_eq!(engine.submitted_ids(), vec![0, 1, 2]);
    assert_eq!(controller.unit_of(1), Some(0));
    assert_eq!(controller.unit_of(2), Some(1));
    assert_eq!(controller.loads(), vec![1, 1]);
    let execution = *controller.resolver().task(1).unwrap().execution().unwrap();
    assert_eq!(execution.submitted_at, 10.);

    // a repeated completion neither releases the unit again nor re-submits children
    controller.on(completed(0, 0), &mut engine);
    assert_eq!(controller.loads(), vec![1, 1]);
    assert_eq!(engine.submitted.len(), 3);

    controller.on(completed(2, 1), &mut engine);
    assert_eq!(engine.submitted.len(), 3);
    assert_eq!(controller.loads(), vec![1, 0]);
    controller.on(completed(1, 0), &mut engine);
    assert_eq!(engine.submitted_ids(), vec![0, 1, 2, 3]);
    assert_eq!(controller.loads(), vec![1, 0]);
    assert!(!controller.is_drained());

    controller.on(completed(3, 0), &mut engine);
    assert!(controller.is_drained());
    assert_eq!(controller.loads(), vec![0, 0]);
    assert_eq!(controller.resolver().count_in_state(TaskState::Completed), 4);
    controller.validate_completed(engine.time);

    // every event also gets the default engine handling
    assert_eq!(engine.handled.len(), 7);
    assert_eq!(engine.handled[1], EngineEvent::UnitsReady);
}

#[test]
fn test_units_ready_twice() {
    let mut engine = MockEngine::default();
    let mut controller = SchedulingController::new(diamond(), Box::new(LeastLoadedPolicy::new(2)));
    controller.on(EngineEvent::UnitsReady, &mut engine);
    controller.on(EngineEvent::UnitsReady, &mut engine);
    assert_eq!(engine.submitted_ids(), vec![0]);
    assert!(controller.error().is_none());
}

#[test]
fn test_completion_before_units_ready() {
    let mut engine = MockEngine::default();
    let mut controller = SchedulingController::new(diamond(), Box::new(LeastLoadedPolicy::new(2)));
    controller.on(completed(0, 0), &mut engine);
    assert!(engine.submitted.is_empty());
    assert_eq!(controller.loads(), vec![0, 0]);
}

#[test]
fn test_malformed_graph_halts() {
    let mut graph = diamond();
    graph.add_edge(3, 11);
    let mut engine = MockEngine::default();
    let mut controller = SchedulingController::new(graph, Box::new(LeastLoadedPolicy::new(2)));
    controller.on(EngineEvent::UnitsReady, &mut engine);
    assert!(controller.is_halted());
    assert!(matches!(
        controller.error(),
        Some(Error::Dependency(DependencyError::UnknownChild { parent: 3, child: 11 }))
    ));
    assert!(engine.submitted.is_empty());
    assert!(!controller.is_drained());
}

#[test]
fn test_empty_pool_halts() {
    let mut engine = MockEngine::default();
    let mut controller = SchedulingController::new(diamond(), Box::new(LeastLoadedPolicy::new(0)));
    controller.on(EngineEvent::UnitsReady, &mut engine);
    assert!(matches!(
        controller.error(),
        Some(Error::Placement(PlacementError::EmptyPool))
    ));
    assert!(engine.submitted.is_empty());
    assert_eq!(controller.resolver().count_in_state(TaskState::Ready), 1);
    controller.validate_completed(engine.time);
}

#[test]
fn test_empty_graph() {
    let mut engine = MockEngine::default();
    let mut controller = SchedulingController::new(TaskGraph::new(), Box::new(LeastLoadedPolicy::new(0)));
    controller.on(EngineEvent::UnitsReady, &mut engine);
    assert!(controller.is_drained());
    assert!(controller.error().is_none());
}
