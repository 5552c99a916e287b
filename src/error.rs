//! Ошибки парсинга выгрузок и расчёта сводки.

use crate::types::Money;

/// Ошибка разбора выгрузки заказов или расчёта показателей.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// Ошибка ввода-вывода при чтении исходного файла.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// В тексте нет ни одной непустой секции, разбирать нечего.
    #[error("Report is empty")]
    EmptyInput,
    /// Цель для прогресса должна быть положительной.
    #[error("Progress target must be positive, got {target}")]
    InvalidTarget {
        /// Переданное значение цели.
        target: Money,
    },
    /// Ошибка разбора числового значения.
    #[error("Invalid number '{value}' in field '{field}'")]
    Number {
        /// Некорректное исходное значение.
        value: String,
        /// Название поля.
        field: &'static str,
    },
    /// Ошибка разбора даты.
    #[error("Invalid date '{value}'")]
    Date {
        /// Некорректная дата.
        value: String,
    },
}
