//! Сборка `ParsedReport` из текста выгрузки.

use crate::error::ReportError;
use crate::parser::{
    find_declared_total, find_export_timestamp, find_report_date, is_document_section, parse_section,
    split_sections,
};
use crate::raw::RawReport;
use crate::types::{Money, ParseStats, ParsedReport};
use rust_decimal::Decimal;

/// Разбирает текст одной выгрузки.
///
/// Секции без заголовка `№N.` пропускаются, отсутствующие поля получают
/// значения по умолчанию. Ошибка возвращается, только если в тексте нет ни
/// одной непустой секции.
///
/// # Пример
///
/// ```
/// let report = order_report::parse("ЗАКАЗЫ ЗА 01.02.2024\n---\n№1. ABC (Распил)\nСумма: 100,50 ₽\n").unwrap();
/// assert_eq!(report.orders.len(), 1);
/// assert_eq!(report.orders[0].work_type, "Распил");
/// assert_eq!(report.date.to_string(), "01.02.2024");
/// ```
pub fn parse(content: &str) -> Result<ParsedReport, ReportError> {
    if content.trim().is_empty() {
        return Err(ReportError::EmptyInput);
    }
    let sections = split_sections(content);
    if sections.is_empty() {
        return Err(ReportError::EmptyInput);
    }

    let date = find_report_date(content);
    let export_timestamp = find_export_timestamp(content);

    let mut orders = Vec::new();
    let mut sum: Money = Decimal::ZERO;
    let mut scanned = 0usize;
    for lines in &sections {
        // Шапка с датой и строка ИТОГО не считаются секциями заказов.
        if is_document_section(lines) {
            continue;
        }
        scanned += 1;
        match parse_section(lines, date) {
            Some(order) => {
                sum += order.amount;
                orders.push(order);
            }
            None => tracing::debug!(first_line = lines[0], "section without order header skipped"),
        }
    }

    // Строка ИТОГО в документе главнее суммы по строкам.
    let total = find_declared_total(content).unwrap_or(sum);
    let stats = ParseStats {
        sections: scanned,
        records: orders.len(),
    };
    tracing::debug!(
        sections = stats.sections,
        records = stats.records,
        %total,
        "report parsed"
    );

    Ok(ParsedReport {
        source: None,
        date,
        export_timestamp,
        orders,
        total,
        stats,
    })
}

impl ParsedReport {
    /// Разбирает выгрузку, сохраняя имя её источника.
    pub fn parse(raw: &RawReport) -> Result<Self, ReportError> {
        let mut report = parse(&raw.text)?;
        report.source.clone_from(&raw.source);
        Ok(report)
    }
}
