mod args;
mod config;

use std::io::{self, Write};

use anyhow::Context;
use clap::Parser;
use classorder::{classes, find_cycles, sort, ClassDir, ClassGraph, Components};
use log::{debug, info, warn, LevelFilter};

use crate::{
    args::Args,
    config::{Config, Output},
};

fn set_up_logging(args: &Args) {
    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let level = if args.debug {
        level.max(LevelFilter::Debug)
    } else {
        level
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

fn log_graph(graph: &ClassGraph, components: &Components) {
    debug!("Classes: {}", graph.classes().collect::<Vec<_>>().join(" "));
    for (dependent, dependency) in graph.edges() {
        debug!("{dependent} depends on {dependency}");
    }

    debug!("{} components", components.len());
    for id in components.ids().filter(|&id| components.is_cyclic(id)) {
        let members = components
            .members_of(id)
            .iter()
            .map(|&node| graph.name(node))
            .collect::<Vec<_>>();
        debug!("Ordered as one block: {}", members.join(" "));
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let config = Config::load(&args)?;

    let initial = classes::read(&config.classes_file).context("Could not load classes")?;
    info!("Sorting {} classes", initial.len());

    if !config.class_dir.is_dir() {
        warn!(
            "Class directory {} does not exist, no dependencies will be found",
            config.class_dir.display()
        );
    }
    let source = ClassDir::with_extension(&config.class_dir, &config.deps_extension);
    let graph = ClassGraph::build(&initial, &source)?;

    for cycle in find_cycles(&graph) {
        warn!("Cycle detected: {cycle}");
    }

    let components = Components::new(&graph);
    if args.debug {
        log_graph(&graph, &components);
    }
    let sorted = sort(&graph, &components);
    debug!("Sorted: {}", sorted.join(" "));

    match config.output {
        Output::File(path) => classes::write(&path, &sorted)?,
        Output::Stdout => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(classes::format(&sorted).as_bytes())?;
            stdout.flush()?;
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    set_up_logging(&args);
    run(args)
}
