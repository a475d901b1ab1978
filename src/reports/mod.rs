use comfy_table::presets::ASCII_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use lineupforge::lineup::Lineup;
use lineupforge::optimizer::histogram::BUCKETS_PER_RUN;
use lineupforge::optimizer::AggregateResult;
use lineupforge::stats::PlayerGroup;

const BAR_WIDTH: u64 = 40;

pub fn print_lineup(title: &str, lineup: &Lineup) {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("#").add_attribute(Attribute::Bold),
            Cell::new("Id").add_attribute(Attribute::Bold),
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Group").add_attribute(Attribute::Bold),
            Cell::new("PA"),
        ]);

    for (slot, p) in lineup.players().iter().enumerate() {
        let group = match p.group {
            PlayerGroup::A => Cell::new("A"),
            PlayerGroup::B => Cell::new("B").fg(Color::Magenta),
        };
        table.add_row(vec![
            Cell::new(slot + 1).set_alignment(CellAlignment::Right),
            Cell::new(&p.id),
            Cell::new(p.display_name()),
            group,
            Cell::new(p.plate_appearances()).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("\n{}", title);
    println!("{}", table);
}

pub fn print_summary(result: &AggregateResult) {
    let mut table = Table::new();
    table.load_preset(ASCII_FULL);

    let status = if result.is_complete() {
        Cell::new("complete").fg(Color::Green)
    } else {
        Cell::new("partial (resumable)").fg(Color::Yellow)
    };
    let rows: Vec<(&str, Cell)> = vec![
        (
            "Lineup type",
            Cell::new(format!(
                "{} ({})",
                result.lineup_type(),
                result.lineup_type().id()
            )),
        ),
        (
            "Expected runs",
            Cell::new(format!("{:.4}", result.score()))
                .fg(Color::Cyan)
                .add_attribute(Attribute::Bold),
        ),
        (
            "Evaluated",
            Cell::new(format!(
                "{} / {} ({:.2}%)",
                result.count_completed(),
                result.count_total(),
                result.progress_percent()
            )),
        ),
        (
            "Elapsed",
            Cell::new(format!("{:.1}s", result.elapsed_ms() as f64 / 1000.0)),
        ),
        ("Seed", Cell::new(result.seed())),
        ("Status", status),
    ];
    for (label, value) in rows {
        table.add_row(vec![Cell::new(label).add_attribute(Attribute::Bold), value]);
    }

    println!("\n{}", table);

    if let Some(lineup) = result.lineup() {
        print_lineup("Best lineup", lineup);
    }
}

pub fn print_histogram(result: &AggregateResult) {
    let histogram = result.histogram();
    if histogram.is_empty() {
        return;
    }

    let peak = histogram.max_count().max(1);
    let mut table = Table::new();
    table.load_preset(ASCII_FULL).set_header(vec![
        Cell::new("Runs").add_attribute(Attribute::Bold),
        Cell::new("Lineups").add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);

    for (bucket, count) in histogram.iter() {
        let low = bucket as f64 / BUCKETS_PER_RUN;
        let high = (bucket + 1) as f64 / BUCKETS_PER_RUN;
        let bar_len = (count * BAR_WIDTH).div_ceil(peak) as usize;
        table.add_row(vec![
            Cell::new(format!("{:.1} - {:.1}", low, high)),
            Cell::new(count).set_alignment(CellAlignment::Right),
            Cell::new("#".repeat(bar_len)).fg(Color::Green),
        ]);
    }

    println!("\nScore distribution");
    println!("{}", table);
}
