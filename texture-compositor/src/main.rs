//! `compose-texture`: run one composite offline from a JSON job file.
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;
use texture_compositor::job::{ComposeJob, JobSummary, write_png};
use texture_compositor::{Compositor, Ticket};

#[derive(Parser, Debug)]
#[command(name = "compose-texture", about = "Render a garment composite texture to PNG")]
struct Args {
    /// Job file describing base colour, side images and template.
    job: PathBuf,

    /// Output PNG path.
    #[arg(short, long, default_value = "composite.png")]
    output: PathBuf,

    /// Override the canvas size used when no template is loaded.
    #[arg(long)]
    resolution: Option<u32>,

    /// Print a JSON summary instead of plain text.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut job = ComposeJob::from_path(&args.job)?;
    if args.resolution.is_some() {
        job.resolution = args.resolution;
    }
    let config = job.config()?;
    let request = job.request()?;
    let compositor = Compositor::with_default_loader(config);

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(format!("Compositing {} side image(s)", request.sides.count()));

    let outcome = compositor.compose(&request, &Ticket::detached())?;
    pb.set_message("Encoding PNG");
    write_png(&outcome.texture, &args.output)?;
    pb.finish_and_clear();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&JobSummary::new(&args.output, &outcome))?);
        return Ok(());
    }

    println!(
        "Saved {} ({}x{})",
        args.output.display(),
        outcome.texture.width(),
        outcome.texture.height()
    );
    for failure in &outcome.failures {
        println!("  skipped: {failure}");
    }
    if outcome.all_failed() {
        println!("No side images could be loaded");
    }

    Ok(())
}
