use std::io::Write;

use clap::Parser;
use env_logger::Builder;

use dslab_workflow::config::Config;
use dslab_workflow::generator::{ExponentialCost, RecursiveGenerator};
use dslab_workflow::simulation::WorkflowSimulation;
use dslab_workflow::unit::UnitConfig;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Simulates the execution of the naive recursive Fibonacci call tree on a pool of identical units.
struct Args {
    /// Fibonacci number to compute
    #[arg(short, long, default_value_t = 10)]
    n: u64,

    /// Number of units
    #[arg(short, long, default_value_t = 5)]
    units: u32,

    /// Unit speed in MIPS
    #[arg(long, default_value_t = 1000)]
    speed: u64,

    /// Placement policy (LeastLoaded or RoundRobin)
    #[arg(short, long, default_value = "LeastLoaded")]
    placement: String,
}

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();
    let config = Config {
        placement: args.placement.clone(),
        units: vec![UnitConfig::new("vm", args.speed, 1, 1024).with_count(args.units)],
        ..Default::default()
    };
    let graph = RecursiveGenerator::fibonacci(ExponentialCost::new(config.rating)).generate(args.n);
    let task_count = graph.len();
    let mut sim = WorkflowSimulation::new(&config, graph).expect("Failed to create simulation");

    let now = std::time::Instant::now();
    sim.step_until_no_events();
    sim.controller().validate_completed(sim.time());

    let stats = sim.stats();
    println!("\nfib({}): {} tasks on {} units ({})", args.n, task_count, args.units, args.placement);
    println!("Completed tasks: {}", stats.completed_tasks);
    println!("Makespan: {:.2}", stats.makespan);
    println!("Mean execution time: {:.2}", stats.execution_time.mean().unwrap_or(0.));
    println!("Mean waiting time: {:.2}", stats.waiting_time.mean().unwrap_or(0.));
    for (id, count) in stats.tasks_per_unit.iter().enumerate() {
        if let Some(unit) = sim.engine().unit(id) {
            println!("  {}: {} tasks", unit.name, count);
        }
    }
    println!("Processed {} events in {:.2?}", sim.event_count(), now.elapsed());
}
