use aoa_network::{
    BuildConfig, BuiltNetwork, Event, LayeredLayout, Layout, LayoutConfig, NetworkBuilder, Task,
    load_tasks_from_csv, load_tasks_from_json,
};
use clap::Parser;
use serde::de::DeserializeOwned;
use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(about = "Build an activity-on-arc network and its layered layout")]
struct Args {
    /// Task list (.json or .csv)
    tasks: PathBuf,
    /// JSON file with network build options
    #[arg(long)]
    build_config: Option<PathBuf>,
    /// JSON file with layout options
    #[arg(long)]
    layout_config: Option<PathBuf>,
}

fn load_config<T: DeserializeOwned + Default>(
    path: Option<&Path>,
) -> Result<T, Box<dyn Error>> {
    match path {
        Some(path) => Ok(serde_json::from_reader(File::open(path)?)?),
        None => Ok(T::default()),
    }
}

fn load_tasks(path: &Path) -> Result<Vec<Task>, Box<dyn Error>> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(load_tasks_from_csv(path)?)
    } else {
        Ok(load_tasks_from_json(path)?)
    }
}

fn render_row<'a>(widths: &[usize], cells: impl Iterator<Item = &'a str>) -> String {
    let mut line = String::from("|");
    for (ci, cell) in cells.enumerate() {
        line.push(' ');
        line.push_str(cell);
        line.push_str(&" ".repeat(widths[ci].saturating_sub(cell.len())));
        line.push_str(" |");
    }
    line
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            if cell.len() > widths[ci] {
                widths[ci] = cell.len();
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(&widths, headers.iter().copied()));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(&widths, row.iter().map(String::as_str)));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn event_label(built: &BuiltNetwork, event: Event) -> String {
    match built.names.name(event) {
        Some(name) => format!("{event} ({name})"),
        None => event.to_string(),
    }
}

fn print_activities(built: &BuiltNetwork) {
    let rows: Vec<Vec<String>> = built
        .network
        .activities()
        .map(|arc| {
            vec![
                arc.from.to_string(),
                arc.to.to_string(),
                arc.activity.label().to_string(),
                format!("{:.3}", arc.activity.duration()),
                arc.activity.is_real().to_string(),
            ]
        })
        .collect();
    println!("Activities:");
    print!(
        "{}",
        render_text_table(&["from", "to", "label", "duration", "real"], &rows)
    );
}

fn print_positions(built: &BuiltNetwork, layout: &Layout) {
    let rows: Vec<Vec<String>> = layout
        .positions
        .iter()
        .map(|(event, pos)| {
            vec![
                event_label(built, *event),
                pos.layer.map(|l| l.to_string()).unwrap_or_default(),
                format!("{:.3}", pos.x),
                format!("{:.3}", pos.y),
            ]
        })
        .collect();
    println!("Events:");
    print!("{}", render_text_table(&["event", "layer", "x", "y"], &rows));
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let build_config: BuildConfig = load_config(args.build_config.as_deref())?;
    let layout_config: LayoutConfig = load_config(args.layout_config.as_deref())?;
    let tasks = load_tasks(&args.tasks)?;

    let built = NetworkBuilder::with_config(&tasks, build_config).build()?;
    let layout =
        LayeredLayout::with_config(&built.network.graph, &built.dummy_arcs, layout_config)
            .compute();

    print_activities(&built);
    print_positions(&built, &layout);
    for diagnostic in built.diagnostics.iter().chain(&layout.diagnostics) {
        println!("warning: {diagnostic}");
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
