use std::io::Write;

use clap::Parser;
use env_logger::Builder;

use dslab_workflow::config::Config;
use dslab_workflow::simulation::WorkflowSimulation;
use dslab_workflow::trace::TraceIngester;

#[derive(Parser, Debug)]
#[command(about, long_about = None)]
/// Schedules invocations from an Azure Functions trace file on a pool of units.
struct Args {
    /// Path to a trace file (invocations_per_function_md.anon.d*.csv)
    trace: String,

    /// Path to a simulation config in YAML format
    #[arg(long)]
    config: Option<String>,

    /// Print run statistics as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    Builder::from_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => Config::from_yaml(path).expect("Failed to read config"),
        None => Config::default(),
    };

    let mut ingester = TraceIngester::new(&args.trace, config.ingestion()).expect("Failed to open trace");
    let task_count = ingester.ingest().expect("Failed to read trace").len();
    let ingestion = ingester.stats();
    println!(
        "trace processed successfully: {} rows read, {} skipped, {} invocations",
        ingestion.rows_read, ingestion.rows_skipped, task_count
    );

    let graph = ingester.into_graph().expect("Failed to read trace");
    let mut sim = WorkflowSimulation::new(&config, graph).expect("Failed to create simulation");
    sim.step_until_no_events();
    sim.controller().validate_completed(sim.time());

    let stats = sim.stats();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats).unwrap());
        return;
    }
    println!("Completed tasks: {}", stats.completed_tasks);
    println!("Makespan: {:.2}", stats.makespan);
    println!(
        "Execution time: mean {:.2}, min {:.2}, max {:.2}",
        stats.execution_time.mean().unwrap_or(0.),
        stats.execution_time.min().unwrap_or(0.),
        stats.execution_time.max().unwrap_or(0.)
    );
    println!(
        "Waiting time: mean {:.2}, max {:.2}",
        stats.waiting_time.mean().unwrap_or(0.),
        stats.waiting_time.max().unwrap_or(0.)
    );
    for (id, count) in stats.tasks_per_unit.iter().enumerate() {
        if let Some(unit) = sim.engine().unit(id) {
            println!("  {}: {} tasks", unit.name, count);
        }
    }
}
