//! Вспомогательные парсеры чисел, дат и текстовых полей.

use crate::error::ReportError;
use crate::types::Money;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use std::str::FromStr;

/// Схлопывает группы пробельных символов в один пробел.
pub fn normalize_spaces(input: &str) -> String {
    let mut output = String::with_capacity(input.len());
    let mut prev_space = false;
    for ch in input.chars() {
        let is_space = ch.is_whitespace();
        if is_space {
            if !prev_space {
                output.push(' ');
            }
        } else {
            output.push(ch);
        }
        prev_space = is_space;
    }
    output.trim().to_string()
}

/// Нормализует числовую строку: убирает пробелы-разделители, знак рубля,
/// плюс, и меняет десятичную запятую на точку.
fn normalize_number(input: &str) -> String {
    input
        .chars()
        .filter(|ch| !matches!(*ch, ' ' | '\u{a0}' | '\u{202f}' | '+' | '₽'))
        .map(|ch| if ch == ',' { '.' } else { ch })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Разбирает денежное значение в формате `1 234,56`.
pub fn parse_money(value: &str, field: &'static str) -> Result<Money, ReportError> {
    let normalized = normalize_number(value);
    Money::from_str(&normalized).map_err(|_| ReportError::Number {
        value: value.trim().to_string(),
        field,
    })
}

/// Разбирает дату в формате `dd.mm.yyyy`.
pub fn parse_date(value: &str) -> Result<NaiveDate, ReportError> {
    NaiveDate::parse_from_str(value.trim(), "%d.%m.%Y").map_err(|_| ReportError::Date {
        value: value.trim().to_string(),
    })
}

/// Собирает момент экспорта из даты и необязательного времени `HH:MM[:SS]`.
pub fn parse_export_timestamp(
    date: &str,
    time: Option<&str>,
) -> Result<NaiveDateTime, ReportError> {
    let day = parse_date(date)?;
    let Some(t) = time.map(str::trim) else {
        return day.and_hms_opt(0, 0, 0).ok_or_else(|| ReportError::Date {
            value: date.trim().to_string(),
        });
    };
    let time = NaiveTime::parse_from_str(t, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
        .map_err(|_| ReportError::Date {
            value: t.to_string(),
        })?;
    Ok(day.and_time(time))
}

/// Находит первый фрагмент текста, совпадающий с регулярным выражением.
pub fn capture_text<'t>(text: &'t str, pattern: &Regex) -> Option<&'t str> {
    pattern
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
