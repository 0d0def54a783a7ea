use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rand::SeedableRng;
use rand::rngs::StdRng;
use set_vision::detector::connected_components::label_and_colorize;
use set_vision::matcher::find_triples;
use set_vision::pipeline::{self, Analysis};
use set_vision::tools::synthetic::{random_layout, render_layout};
use set_vision::tools::{load_raw, load_rgb};
use set_vision::utils::binarization::threshold_binarize;
use set_vision::{AttributeGrid, PipelineConfig};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "settool", version, about = "Set card layout tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Find the cards in a photo, classify them and list the sets
    Detect {
        #[arg(long)]
        image: PathBuf,
        /// Gray level above which a pixel belongs to a card
        #[arg(long)]
        threshold: Option<u8>,
        /// Analyze at native resolution instead of fitting to 800x600
        #[arg(long)]
        no_fit: bool,
    },
    /// Write a pseudo-colored connected component map of a photo or `.raw` file
    Label {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        threshold: Option<u8>,
    },
    /// Render a random synthetic layout and print its sets
    Synth {
        #[arg(long)]
        output: PathBuf,
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Detect {
            image,
            threshold,
            no_fit,
        } => detect_cmd(&image, threshold, !no_fit),
        Command::Label {
            image,
            output,
            seed,
            threshold,
        } => label_cmd(&image, &output, seed, threshold),
        Command::Synth { output, seed } => synth_cmd(&output, seed),
    }
}

fn config_with(threshold: Option<u8>) -> PipelineConfig {
    let mut config = PipelineConfig::from_env();
    if let Some(t) = threshold {
        config.binary_threshold = t;
    }
    config
}

fn detect_cmd(image: &Path, threshold: Option<u8>, fit: bool) -> Result<()> {
    let (pixels, width, height) =
        load_rgb(image, fit).with_context(|| format!("loading {}", image.display()))?;
    let config = config_with(threshold);

    let start = Instant::now();
    let analysis = pipeline::analyze(&pixels, width, height, &config)
        .with_context(|| format!("analyzing {}", image.display()))?;
    let elapsed = start.elapsed();

    println!("Image: {} ({}x{})", image.display(), width, height);
    print_analysis(&analysis);
    println!("Time: {:.2} ms", elapsed.as_secs_f64() * 1000.0);
    Ok(())
}

fn label_cmd(image: &Path, output: &Path, seed: u64, threshold: Option<u8>) -> Result<()> {
    let config = config_with(threshold);
    let is_raw = image
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("raw"));
    let mask = if is_raw {
        let gray = load_raw(image).with_context(|| format!("loading {}", image.display()))?;
        threshold_binarize(&gray, config.binary_threshold)
    } else {
        let (pixels, width, height) =
            load_rgb(image, true).with_context(|| format!("loading {}", image.display()))?;
        pipeline::binarize_rgb(&pixels, width, height, config.binary_threshold)?
    };
    let (labeling, painted) = label_and_colorize(&mask, seed)?;
    painted
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!(
        "Labeled {} components ({} provisional) into {}",
        labeling.num_labels(),
        labeling.provisional_labels(),
        output.display()
    );
    Ok(())
}

fn synth_cmd(output: &Path, seed: u64) -> Result<()> {
    let mut rng = StdRng::seed_from_u64(seed);
    let layout = random_layout(&mut rng);
    render_layout(&layout)
        .save(output)
        .with_context(|| format!("writing {}", output.display()))?;
    println!("Wrote {}", output.display());
    print_attributes(&layout);
    let triples = find_triples(&layout);
    println!("Planted sets: {}", triples.len());
    for triple in &triples {
        println!("  {triple}");
    }
    Ok(())
}

fn print_attributes(attributes: &AttributeGrid) {
    for row in 0..set_vision::models::GRID_ROWS {
        let cells: Vec<String> = attributes
            .row(row)
            .iter()
            .map(|a| format!("{:<22}", a.to_string()))
            .collect();
        println!("  {}", cells.join(" "));
    }
}

fn print_analysis(analysis: &Analysis) {
    println!("Cards:");
    for (pos, card) in analysis.cards.iter() {
        println!(
            "  {pos}: center=({}, {}) size={}x{}",
            card.center_col, card.center_row, card.width, card.height
        );
    }
    println!("Attributes:");
    print_attributes(&analysis.attributes);
    println!("Sets: {}", analysis.triples.len());
    for triple in &analysis.triples {
        println!("  {triple}");
    }
}
