//! Построчный разбор текстовой выгрузки: секции, заголовки заказов и поля.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::types::{Money, OrderRecord, ReportDate};
use crate::utils::{capture_text, normalize_spaces, parse_date, parse_export_timestamp, parse_money};
use chrono::NaiveDateTime;
use regex::Regex;
use rust_decimal::Decimal;

/// Строка-разделитель между заказами.
pub(crate) const SECTION_DELIMITER: &str = "---";

const AMOUNT_LABEL: &str = "Сумма:";
const TOTAL_LABEL: &str = "ИТОГО:";
const EXPORT_LABEL: &str = "Экспорт:";
const HEADING_LABEL: &str = "ЗАКАЗЫ ЗА";

static HEADING_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"ЗАКАЗЫ ЗА[ \t]+(\d{2}\.\d{2}\.\d{4})").expect("valid heading date regex")
});

static EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Экспорт:[ \t]*(\d{2}\.\d{2}\.\d{4})(?:[ \t]+(\d{2}:\d{2}(?::\d{2})?))?")
        .expect("valid export regex")
});

static TOTAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*ИТОГО:[ \t]*(-?\d[\d \t\x{a0}\x{202f}]*(?:[.,]\d+)?)")
        .expect("valid total regex")
});

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^№(\d+)\.\s*(.*)$").expect("valid header regex"));

static DESC_TYPE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+?)\s*\(([^()]+)\)$").expect("valid description regex")
});

static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Сумма:\s*(-?\d[\d\s]*(?:[.,]\d+)?)").expect("valid amount regex")
});

static FIELD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^:]+?)\s*:\s*(.*)$").expect("valid field regex"));

/// Делит текст на непустые секции по строкам `---`.
///
/// Строки внутри секции обрезаны, пустые строки отброшены.
pub(crate) fn split_sections(text: &str) -> Vec<Vec<&str>> {
    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines().map(str::trim) {
        if line == SECTION_DELIMITER {
            if !current.is_empty() {
                sections.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !line.is_empty() {
            current.push(line);
        }
    }
    if !current.is_empty() {
        sections.push(current);
    }
    sections
}

/// Классификация строки тела заказа.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BodyLine<'a> {
    /// Строка с меткой `Сумма:`.
    Amount(&'a str),
    /// Строка уровня документа (`ИТОГО:`, `Экспорт:`, заголовок даты).
    Document,
    /// Описание с видом работ в скобках.
    Description(String, String),
    /// Пара `ключ: значение`.
    Field(&'a str, &'a str),
    /// Произвольный текст.
    Free(&'a str),
}

fn is_document_line(line: &str) -> bool {
    line.starts_with(TOTAL_LABEL) || line.starts_with(EXPORT_LABEL) || line.starts_with(HEADING_LABEL)
}

/// Секция целиком из строк уровня документа: шапка с датой или строка итога.
pub(crate) fn is_document_section(lines: &[&str]) -> bool {
    lines.iter().all(|line| is_document_line(line))
}

/// Пара `описание (вид работ)` ищется раньше `ключ: значение`, пока описание
/// ещё не найдено.
fn classify(line: &str, want_description: bool) -> BodyLine<'_> {
    if line.starts_with(AMOUNT_LABEL) {
        return BodyLine::Amount(line);
    }
    if is_document_line(line) {
        return BodyLine::Document;
    }
    if want_description {
        if let Some((description, work_type)) = split_description(line) {
            return BodyLine::Description(description, work_type);
        }
    }
    if let Some(caps) = FIELD_RE.captures(line) {
        if let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) {
            return BodyLine::Field(key.as_str(), value.as_str().trim());
        }
    }
    BodyLine::Free(line)
}

/// Делит текст вида `описание (вид работ)` на части.
fn split_description(text: &str) -> Option<(String, String)> {
    let caps = DESC_TYPE_RE.captures(text)?;
    let description = normalize_spaces(caps.get(1)?.as_str());
    let work_type = normalize_spaces(caps.get(2)?.as_str());
    Some((description, work_type))
}

/// Разбирает сумму из строки `Сумма:`; при неудаче возвращает ноль.
fn parse_amount_line(line: &str, number: &str) -> Money {
    let Some(value) = capture_text(line, &AMOUNT_RE) else {
        tracing::warn!(order = number, line, "amount missing, using zero");
        return Decimal::ZERO;
    };
    match parse_money(value, "Сумма") {
        Ok(amount) => amount,
        Err(err) => {
            tracing::warn!(order = number, %err, "amount not parsed, using zero");
            Decimal::ZERO
        }
    }
}

/// Собирает заказ из секции. Секция без заголовка `№N.` даёт `None`.
pub(crate) fn parse_section(lines: &[&str], date: ReportDate) -> Option<OrderRecord> {
    let header_idx = lines.iter().position(|line| HEADER_RE.is_match(line))?;
    let caps = HEADER_RE.captures(lines[header_idx])?;
    let number = caps.get(1)?.as_str().to_string();
    let header_text = normalize_spaces(caps.get(2).map_or("", |m| m.as_str()));
    let header_split = split_description(&header_text);

    let code = header_split
        .as_ref()
        .map_or_else(|| header_text.clone(), |(label, _)| label.clone());

    let mut amount: Option<Money> = None;
    let mut parameters = BTreeMap::new();
    let mut free_lines: Vec<&str> = Vec::new();
    let mut body_description: Option<(String, String)> = None;

    for line in &lines[header_idx + 1..] {
        match classify(line, body_description.is_none()) {
            BodyLine::Amount(raw) => {
                if amount.is_none() {
                    amount = Some(parse_amount_line(raw, &number));
                } else {
                    tracing::debug!(order = %number, line = raw, "repeated amount ignored");
                }
            }
            BodyLine::Document => {}
            BodyLine::Description(description, work_type) => {
                body_description = Some((description, work_type));
            }
            BodyLine::Field(key, value) => {
                parameters.insert(key.to_string(), value.to_string());
            }
            BodyLine::Free(text) => free_lines.push(text),
        }
    }

    let (description, work_type) = body_description
        .or(header_split)
        .or_else(|| {
            free_lines
                .first()
                .map(|line| (normalize_spaces(line), String::new()))
        })
        .unwrap_or_else(|| (header_text.clone(), String::new()));

    Some(OrderRecord {
        number,
        code,
        description,
        work_type,
        amount: amount.unwrap_or(Decimal::ZERO),
        date,
        parameters,
    })
}

/// Ищет дату выгрузки: заголовок `ЗАКАЗЫ ЗА`, затем строка `Экспорт:`.
///
/// Внутри уровня перебираются все совпадения: некорректная дата пропускается.
pub(crate) fn find_report_date(text: &str) -> ReportDate {
    let tiers: [(&str, &Regex); 2] = [("heading", &*HEADING_DATE_RE), ("export", &*EXPORT_RE)];
    for (tier, pattern) in tiers {
        let mut seen = false;
        for caps in pattern.captures_iter(text) {
            seen = true;
            let Some(value) = caps.get(1).map(|m| m.as_str()) else {
                continue;
            };
            match parse_date(value) {
                Ok(date) => return ReportDate::Known(date),
                Err(err) => tracing::warn!(tier, %err, "invalid date skipped"),
            }
        }
        if !seen {
            tracing::debug!(tier, "date tier not found");
        }
    }
    ReportDate::Unknown
}

/// Момент экспорта из строки `Экспорт: dd.mm.yyyy[ HH:MM[:SS]]`.
pub(crate) fn find_export_timestamp(text: &str) -> Option<NaiveDateTime> {
    let caps = EXPORT_RE.captures(text)?;
    let date = caps.get(1)?.as_str();
    let time = caps.get(2).map(|m| m.as_str());
    parse_export_timestamp(date, time)
        .inspect_err(|err| tracing::warn!(%err, "export timestamp skipped"))
        .ok()
}

/// Итог, заявленный строкой `ИТОГО:`.
pub(crate) fn find_declared_total(text: &str) -> Option<Money> {
    let value = capture_text(text, &TOTAL_RE)?;
    parse_money(value, "ИТОГО")
        .inspect_err(|err| tracing::warn!(%err, "declared total skipped"))
        .ok()
}
