use dslab_workflow::error::DependencyError;
use dslab_workflow::graph::TaskGraph;
use dslab_workflow::resolver::DependencyResolver;
use dslab_workflow::task::{Task, TaskCost, TaskState};

fn task(id: usize) -> Task {
    Task::new(id, &format!("t{}", id), 0, TaskCost::single_slot(10, 128, 1))
}

// 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3
fn diamond() -> TaskGraph {
    let mut graph = TaskGraph::new();
    graph.set_root(task(0));
    for id in 1..4 {
        graph.add_task(task(id));
    }
    graph.add_edge(0, 1);
    graph.add_edge(0, 2);
    graph.add_edge(1, 3);
    graph.add_edge(2, 3);
    graph
}

fn next_id(resolver: &mut DependencyResolver) -> Option<usize> {
    resolver.next_ready().map(|t| t.id)
}

#[test]
fn test_diamond() {
    let mut resolver = DependencyResolver::new();
    resolver.initialize(diamond()).unwrap();
    assert_eq!(resolver.pending_count(3), Some(2));
    assert_eq!(resolver.state(0), Some(TaskState::Ready));
    assert_eq!(resolver.state(3), Some(TaskState::Blocked));

    assert_eq!(next_id(&mut resolver), Some(0));
    assert_eq!(next_id(&mut resolver), None);
    assert!(!resolver.is_drained());
    assert_eq!(resolver.state(0), Some(TaskState::Submitted));

    assert_eq!(resolver.on_completion(0), vec![1, 2]);
    assert_eq!(next_id(&mut resolver), Some(1));
    assert_eq!(next_id(&mut resolver), Some(2));

    // the join task is released only after both parents complete
    assert!(resolver.on_completion(1).is_empty());
    assert_eq!(resolver.pending_count(3), Some(1));
    assert_eq!(resolver.on_completion(2), vec![3]);
    assert_eq!(resolver.ready_count(), 1);
    assert_eq!(next_id(&mut resolver), Some(3));
    assert!(!resolver.is_drained());
    resolver.on_completion(3);
    assert!(resolver.is_drained());
    assert_eq!(resolver.completed_count(), 4);
    assert!(resolver.task(3).unwrap().is_completed());
}

#[test]
fn test_duplicate_completion() {
    let mut resolver = DependencyResolver::new();
    resolver.initialize(diamond()).unwrap();
    next_id(&mut resolver);
    resolver.on_completion(0);
    next_id(&mut resolver);
    next_id(&mut resolver);
    resolver.on_completion(1);
    resolver.on_completion(1);
    resolver.on_completion(1);
    // repeated completions never decrement the join task below its remaining parent
    assert_eq!(resolver.pending_count(3), Some(1));
    assert_eq!(resolver.state(3), Some(TaskState::Blocked));
    assert_eq!(resolver.completed_count(), 2);
    assert_eq!(resolver.submitted_count(), 1);
}

#[test]
fn test_completion_of_unsubmitted_task_is_ignored() {
    let mut resolver = DependencyResolver::new();
    resolver.initialize(diamond()).unwrap();
    assert!(resolver.on_completion(0).is_empty());
    assert_eq!(resolver.state(0), Some(TaskState::Ready));
    assert!(resolver.on_completion(3).is_empty());
    assert!(resolver.on_completion(42).is_empty());
    assert_eq!(resolver.completed_count(), 0);
}

#[test]
fn test_single_enqueue() {
    // every task of a dense layered graph enters the ready queue once
    let mut graph = TaskGraph::new();
    for id in 0..12 {
        graph.add_task(task(id));
    }
    for layer in 0..3 {
        for a in 0..4 {
            for b in 0..4 {
                if layer < 2 {
                    graph.add_edge(layer * 4 + a, (layer + 1) * 4 + b);
                }
            }
        }
    }
    let mut resolver = DependencyResolver::new();
    resolver.initialize(graph).unwrap();
    let mut order = Vec::new();
    while let Some(id) = next_id(&mut resolver) {
        order.push(id);
        resolver.on_completion(id);
    }
    assert_eq!(order, (0..12).collect::<Vec<_>>());
    assert!(resolver.is_drained());
}

#[test]
fn test_ready_order_follows_traversal() {
    let mut graph = TaskGraph::new();
    graph.add_task(task(5));
    graph.add_task(task(3));
    graph.add_task(task(9));
    graph.add_edge(3, 9);
    let mut resolver = DependencyResolver::new();
    resolver.initialize(graph).unwrap();
    assert_eq!(next_id(&mut resolver), Some(5));
    assert_eq!(next_id(&mut resolver), Some(3));
    assert_eq!(next_id(&mut resolver), None);
}

#[test]
fn test_unknown_child() {
    let mut graph = diamond();
    graph.add_edge(2, 7);
    let mut resolver = DependencyResolver::new();
    assert_eq!(
        resolver.initialize(graph),
        Err(DependencyError::UnknownChild { parent: 2, child: 7 })
    );
    assert!(!resolver.is_initialized());
    assert!(!resolver.is_drained());
    assert!(resolver.peek_ready().is_none());
}

#[test]
fn test_unknown_parent() {
    let mut graph = diamond();
    graph.add_edge(8, 1);
    let mut resolver = DependencyResolver::new();
    assert_eq!(resolver.initialize(graph), Err(DependencyError::UnknownParent { parent: 8 }));
}

#[test]
fn test_initialize_twice() {
    let mut resolver = DependencyResolver::new();
    resolver.initialize(diamond()).unwrap();
    assert_eq!(resolver.initialize(diamond()), Err(DependencyError::AlreadyInitialized));
}

#[test]
fn test_empty_graph_is_drained() {
    let mut resolver = DependencyResolver::new();
    assert!(!resolver.is_drained());
    resolver.initialize(TaskGraph::new()).unwrap();
    assert!(resolver.is_drained());
}
