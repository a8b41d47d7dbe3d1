#![allow(clippy::missing_docs_in_private_items)]
#![allow(clippy::arithmetic_side_effects)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::indexing_slicing)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::trivially_copy_pass_by_ref)]

use plotters::prelude::*;
use probe_table::{ProbeTable, TableConfig, TableStats, TombstonePolicy};
use rand::Rng;

const TABLE_SIZE: usize = 1 << 16;
// Load factors from 0.1 to 0.95
const NUM_LOAD_FACTORS: usize = 10;
// Load the churn experiment runs at
const CHURN_LOAD: f64 = 0.7;
const CHURN_ROUNDS: usize = 40;
const CHURN_OPS_PER_ROUND: usize = TABLE_SIZE / 8;

const POLICIES: [(&str, TombstonePolicy); 2] =
    [("Single-step collapse", TombstonePolicy::SingleStep), ("Cascading collapse", TombstonePolicy::Cascade)];

fn fibonacci_hash(key: &u64) -> u32 {
    (key.wrapping_mul(0x9E37_79B9_7F4A_7C15) >> 32) as u32
}

// Fixed-size table: growth disabled so the load factor is whatever we fill it to
fn fixed_config(policy: TombstonePolicy) -> TableConfig {
    TableConfig::default()
        .with_load_factor_threshold(1.0)
        .with_max_capacity(TABLE_SIZE)
        .with_tombstone_policy(policy)
}

struct ChurnSeries {
    tombstones: Vec<usize>,
    mean_probe: Vec<f64>,
}

fn load_sweep(keys: &[u64], num_keys: &[usize]) -> Result<Vec<TableStats>, Box<dyn std::error::Error>> {
    let mut results = Vec::with_capacity(num_keys.len());

    for &n_keys in num_keys {
        let mut table = ProbeTable::with_config(
            TABLE_SIZE,
            fibonacci_hash,
            fixed_config(TombstonePolicy::SingleStep),
        )?;
        for key in &keys[..n_keys] {
            table.insert(key, key)?;
        }

        let stats = table.stats();
        println!("  load {:.2}:", stats.load_factor);
        stats.print();
        results.push(stats);
    }

    Ok(results)
}

fn churn(keys: &[u64], live_keys: usize, policy: TombstonePolicy) -> Result<ChurnSeries, Box<dyn std::error::Error>> {
    let mut rng = rand::rng();
    let mut table = ProbeTable::with_config(TABLE_SIZE, fibonacci_hash, fixed_config(policy))?;
    let mut live: Vec<usize> = (0..live_keys).collect();
    for key in &keys[..live_keys] {
        table.insert(key, key)?;
    }

    let mut next_fresh = live_keys;
    let mut series = ChurnSeries { tombstones: Vec::new(), mean_probe: Vec::new() };

    for _ in 0..CHURN_ROUNDS {
        for _ in 0..CHURN_OPS_PER_ROUND {
            let victim = live.swap_remove(rng.random_range(0..live.len()));
            table.remove(&keys[victim])?;

            table.insert(&keys[next_fresh], &keys[next_fresh])?;
            live.push(next_fresh);
            next_fresh += 1;
        }

        let stats = table.stats();
        series.tombstones.push(stats.deleted);
        series.mean_probe.push(stats.mean_probe_length);
    }

    Ok(series)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let load_factors: Vec<f64> = (0..NUM_LOAD_FACTORS)
        .map(|i| 0.1 + (0.95 - 0.1) * (i as f64) / ((NUM_LOAD_FACTORS - 1) as f64))
        .collect();
    let num_keys: Vec<usize> =
        load_factors.iter().map(|&load| (TABLE_SIZE as f64 * load) as usize).collect();
    let churn_live = (TABLE_SIZE as f64 * CHURN_LOAD) as usize;

    // Every key the experiments will ever insert, allocated up front so references stay valid
    let mut rng = rand::rng();
    let max_keys_needed = num_keys
        .iter()
        .copied()
        .max()
        .unwrap_or(0)
        .max(churn_live + CHURN_ROUNDS * CHURN_OPS_PER_ROUND);
    let keys: Vec<u64> = (0..max_keys_needed).map(|_| rng.random()).collect();

    println!("Probe lengths by load factor ({TABLE_SIZE} buckets)");
    let sweep = load_sweep(&keys, &num_keys)?;

    let mut churn_series = Vec::with_capacity(POLICIES.len());
    for (name, policy) in POLICIES {
        println!("Churn at load {CHURN_LOAD} with {name}");
        let series = churn(&keys, churn_live, policy)?;
        println!(
            "  final tombstones = {}, final mean probe = {:.2}",
            series.tombstones.last().copied().unwrap_or(0),
            series.mean_probe.last().copied().unwrap_or(0.0)
        );
        churn_series.push(series);
    }

    let font_family = "sans-serif";
    let colors = [RGBColor(220, 50, 50), RGBColor(50, 90, 220)];
    let line_width = 2;
    let marker_size = 4;
    let text_size = 16;
    let title_size = 35;

    // Plot 1: probe length by load factor
    let root = BitMapBackend::new("probe_length_by_load.png", (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let max_probe = sweep.iter().map(|s| s.max_probe_length).max().unwrap_or(1) as f64 * 1.1;
    let mut chart = ChartBuilder::on(&root)
        .caption("Linear Probing: Probe Length by Load Factor", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..max_probe)?;

    chart
        .configure_mesh()
        .x_desc("Load Factor")
        .y_desc("Probe Length (buckets)")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    let mean_style = ShapeStyle::from(&colors[0]).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(
            sweep.iter().map(|s| (s.load_factor, s.mean_probe_length)),
            mean_style,
        ))?
        .label("Mean probe length")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], mean_style));

    let max_style = ShapeStyle::from(&colors[1]).stroke_width(line_width);
    chart
        .draw_series(LineSeries::new(
            sweep.iter().map(|s| (s.load_factor, s.max_probe_length as f64)),
            max_style,
        ))?
        .label("Max probe length")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], max_style));

    chart.draw_series(sweep.iter().map(|s| {
        Circle::new((s.load_factor, s.mean_probe_length), marker_size, colors[0].filled())
    }))?;

    // Growth threshold marker
    let threshold = probe_table::DEFAULT_LOAD_FACTOR;
    let reference_style = ShapeStyle::from(&BLACK.mix(0.3)).stroke_width(1);
    chart
        .draw_series(LineSeries::new(vec![(threshold, 0.0), (threshold, max_probe)], reference_style))?
        .label("Growth threshold")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], reference_style));

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;

    // Plot 2: tombstones and probe length under churn
    let root = BitMapBackend::new("tombstones_under_churn.png", (1200, 900)).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 1));

    let max_tombstones = churn_series
        .iter()
        .flat_map(|s| s.tombstones.iter().copied())
        .max()
        .unwrap_or(0)
        .max(1) as f64 *
        1.1;
    let mut tombstone_chart = ChartBuilder::on(&areas[0])
        .caption("Tombstones under Remove/Insert Churn", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..CHURN_ROUNDS, 0.0..max_tombstones)?;
    tombstone_chart
        .configure_mesh()
        .x_desc("Churn Round")
        .y_desc("Tombstones")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    let max_mean = churn_series
        .iter()
        .flat_map(|s| s.mean_probe.iter().copied())
        .fold(0.0, f64::max) *
        1.1;
    let mut probe_chart = ChartBuilder::on(&areas[1])
        .caption("Mean Probe Length under Churn", (font_family, title_size))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..CHURN_ROUNDS, 0.0..max_mean)?;
    probe_chart
        .configure_mesh()
        .x_desc("Churn Round")
        .y_desc("Mean Probe Length (buckets)")
        .axis_desc_style((font_family, text_size))
        .draw()?;

    for (policy_idx, ((name, _), series)) in POLICIES.iter().zip(&churn_series).enumerate() {
        let color = &colors[policy_idx % colors.len()];
        let line_style = ShapeStyle::from(color).stroke_width(line_width);

        tombstone_chart
            .draw_series(LineSeries::new(
                series.tombstones.iter().enumerate().map(|(round, &count)| (round, count as f64)),
                line_style,
            ))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));

        probe_chart
            .draw_series(LineSeries::new(
                series.mean_probe.iter().enumerate().map(|(round, &mean)| (round, mean)),
                line_style,
            ))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    for chart in [&mut tombstone_chart, &mut probe_chart] {
        chart
            .configure_series_labels()
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .position(SeriesLabelPosition::UpperLeft)
            .draw()?;
    }

    println!("Generated plot images: probe_length_by_load.png, tombstones_under_churn.png");

    Ok(())
}
