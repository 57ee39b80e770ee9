//! Blast demo binary — carves a blast into flat terrain and reports
//! the resulting diffs, light repair, and replication batch.
//!
//! Usage: cargo run --release --bin blast_demo -- [OPTIONS]
//!
//! Options:
//!   --size <N>        Blast size in voxels (default: 20)
//!   --seed <SEED>     Random seed (default: 12345)
//!   --surface <Y>     Terrain surface height (default: 70)
//!   --impact <F>      Resistance impact factor (default: 1.0)
//!   --spread <F>      Ray budget spread factor (default: 1.0)
//!   --config <PATH>   JSON file with world limits {"min_y":..,"max_y":..}
//!   --out <PATH>      Write the encoded replication batch to a file

use std::fs::File;
use std::io::BufWriter;
use std::time::Instant;

use glam::Vec3;
use rand::SeedableRng;
use rand::rngs::StdRng;

use voxblast::core::config::WorldLimits;
use voxblast::core::error::Error;
use voxblast::destruction::{Blast, MaterialDamage};
use voxblast::event::execute_blast;
use voxblast::light::SkyLightStore;
use voxblast::math::coords::{SectionPos, VoxelPos};
use voxblast::net::encode_all;
use voxblast::world::MemoryGrid;
use voxblast::world::section::VoxelState;

fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("info"),
    )
    .format_timestamp_millis()
    .init();

    if let Err(err) = run() {
        eprintln!("blast_demo failed: {}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<(), Error> {
    let args: Vec<String> = std::env::args().collect();
    let size = parse_i32_arg(&args, "--size").unwrap_or(20);
    let seed = parse_u64_arg(&args, "--seed").unwrap_or(12345);
    let surface = parse_i32_arg(&args, "--surface").unwrap_or(70);
    let impact = parse_f32_arg(&args, "--impact").unwrap_or(1.0);
    let spread = parse_f32_arg(&args, "--spread").unwrap_or(1.0);

    let limits = match parse_str_arg(&args, "--config") {
        Some(path) => serde_json::from_reader(File::open(path)?)?,
        None => WorldLimits::default(),
    };

    println!("=== Voxblast Demo ===");
    println!("Size:    {} voxels", size);
    println!("Seed:    {}", seed);
    println!("Surface: y = {}", surface);
    println!("Limits:  [{}, {})", limits.min_y, limits.max_y);
    println!();

    // Flat terrain wide enough for the blast, plus a chunk of margin.
    let radius = size * 2 + 16;
    let mut grid = MemoryGrid::new(limits);
    grid.fill(
        VoxelPos::new(-radius, limits.min_y, -radius),
        VoxelPos::new(radius, surface, radius),
        VoxelState::solid(1),
    );

    let mut engine = SkyLightStore::new();
    let chunks: Vec<_> = grid.loaded_chunks().copied().collect();
    for chunk in chunks {
        for section_y in limits.min_light_section()..=limits.max_light_section() {
            let level = if (section_y << 4) > surface { 15 } else { 0 };
            engine.seed_sky(SectionPos::of(chunk, section_y), level);
        }
    }
    println!(
        "World: {} chunks, surface at y = {}",
        grid.chunk_count(),
        surface
    );

    let blast = Blast::new(Vec3::new(0.5, surface as f32 + 0.5, 0.5), size)
        .resistance_impact(impact)
        .spread_factor(spread);
    let damage = MaterialDamage::uniform(0.5);
    let mut rng = StdRng::seed_from_u64(seed);

    let start = Instant::now();
    let report = execute_blast(&mut grid, &mut engine, &blast, &damage, &mut rng);
    let elapsed = start.elapsed();

    println!();
    println!("Blast finished in {:.1?}", elapsed);
    println!("  Voxels cleared:  {}", report.voxels_cleared);
    println!("  Sections:        {}", report.sections_changed);
    println!("  Chunks:          {}", report.chunks_touched);
    println!("  Light sections:  {}", report.light_sections);
    println!("  Messages:        {}", report.messages.len());
    println!("  Light checks:    {}", engine.take_pending_checks().len());

    if let Some(path) = parse_str_arg(&args, "--out") {
        let mut writer = BufWriter::new(File::create(&path)?);
        encode_all(&report.messages, &mut writer)?;
        println!("  Batch written to {}", path);
    }

    Ok(())
}

fn parse_str_arg(args: &[String], name: &str) -> Option<String> {
    args.iter()
        .position(|a| a == name)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn parse_i32_arg(args: &[String], name: &str) -> Option<i32> {
    parse_str_arg(args, name).and_then(|v| v.parse().ok())
}

fn parse_u64_arg(args: &[String], name: &str) -> Option<u64> {
    parse_str_arg(args, name).and_then(|v| v.parse().ok())
}

fn parse_f32_arg(args: &[String], name: &str) -> Option<f32> {
    parse_str_arg(args, name).and_then(|v| v.parse().ok())
}
