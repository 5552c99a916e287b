//! CLI: читает выгрузки заказов и печатает сводку по ним.

use std::path::PathBuf;

use clap::Parser;
use order_report::{
    AccumulationStore, Money, ParsedReport, RawReport, Selection, progress, top_n,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "order-report", version, about = "Сводка по текстовым выгрузкам заказов")]
struct Cli {
    /// Файлы выгрузок или каталоги с `.txt` файлами
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Учитывать только указанный вид работ
    #[arg(short = 'w', long = "work-type")]
    work_type: Option<String>,

    /// Сколько крупнейших заказов показать
    #[arg(short = 'n', long = "top", default_value_t = 5)]
    top: usize,

    /// Цель по выручке для шкалы прогресса
    #[arg(short = 't', long = "target")]
    target: Option<Money>,

    /// Подробный лог в stderr
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let mut store = AccumulationStore::new();
    for path in &cli.inputs {
        if path.is_dir() {
            store.load_dir(path)?;
        } else {
            let raw = RawReport::from_path(path)?;
            store.ingest(ParsedReport::parse(&raw)?);
        }
    }

    for report in store.reports() {
        println!(
            "{}: дата {}, итог {}, заказов {} (пропущено секций: {})",
            report.source.as_deref().unwrap_or("-"),
            report.date,
            report.total,
            report.stats.records,
            report.stats.skipped()
        );
    }

    let selection = cli
        .work_type
        .clone()
        .map_or_else(Selection::all, Selection::work_type);
    let summary = store.summary(&selection);

    println!();
    println!("Выручка: {}", summary.total_revenue);
    println!("Заказов: {}", summary.order_count);
    println!("Средний чек: {}", summary.average_check);

    if !summary.by_type.is_empty() {
        println!();
        println!("По видам работ:");
        for t in &summary.by_type {
            let name = if t.work_type.is_empty() {
                "(без вида)"
            } else {
                t.work_type.as_str()
            };
            println!("  {name}: {} ({} шт.)", t.revenue, t.count);
        }
    }

    let top = top_n(store.select(&selection), cli.top);
    if !top.is_empty() {
        println!();
        println!("Крупнейшие заказы:");
        for order in top {
            println!(
                "  №{} {} [{}] {}: {}",
                order.number, order.code, order.date, order.description, order.amount
            );
        }
    }

    if let Some(target) = cli.target {
        let percent = progress(summary.total_revenue, target)?;
        println!();
        println!("Выполнение цели {target}: {percent}%");
    }
    Ok(())
}
