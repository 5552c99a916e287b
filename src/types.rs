//! Доменные типы: заказы, разобранные выгрузки и сводные показатели.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fmt;

/// Денежное значение, используем `Decimal` для точных расчётов.
pub type Money = Decimal;

/// Подпись даты, которую не удалось найти в выгрузке.
pub const UNKNOWN_DATE: &str = "Неизвестно";

/// Дата выгрузки.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportDate {
    /// Дата найдена в заголовке или в строке экспорта.
    Known(NaiveDate),
    /// В тексте нет ни одной распознаваемой даты.
    Unknown,
}

impl ReportDate {
    /// Возвращает дату, если она известна.
    #[inline]
    pub const fn date(self) -> Option<NaiveDate> {
        match self {
            Self::Known(date) => Some(date),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for ReportDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Known(date) => write!(f, "{}", date.format("%d.%m.%Y")),
            Self::Unknown => f.write_str(UNKNOWN_DATE),
        }
    }
}

/// Один заказ из выгрузки.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRecord {
    /// Номер заказа в том виде, в каком он записан после `№`.
    pub number: String,
    /// Код заказа из строки заголовка.
    pub code: String,
    /// Описание заказа.
    pub description: String,
    /// Вид работ; пустая строка, если в тексте его нет.
    pub work_type: String,
    /// Сумма заказа.
    pub amount: Money,
    /// Дата выгрузки, общая для всех заказов одного файла.
    pub date: ReportDate,
    /// Прочие поля `ключ: значение`.
    pub parameters: BTreeMap<String, String>,
}

/// Счётчики разбора: сколько секций просмотрено и сколько заказов получено.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Непустые секции между разделителями `---`, кроме шапки с датой и строки итога.
    pub sections: usize,
    /// Секции, из которых получился заказ.
    pub records: usize,
}

impl ParseStats {
    /// Секции без заголовка `№N.`, пропущенные при разборе.
    #[inline]
    pub const fn skipped(&self) -> usize {
        self.sections.saturating_sub(self.records)
    }
}

/// Результат разбора одной выгрузки.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReport {
    /// Имя исходного файла, если известно.
    pub source: Option<String>,
    /// Дата выгрузки.
    pub date: ReportDate,
    /// Момент экспорта из строки `Экспорт:`.
    pub export_timestamp: Option<NaiveDateTime>,
    /// Заказы в порядке следования в тексте.
    pub orders: Vec<OrderRecord>,
    /// Итог: строка `ИТОГО:` либо сумма по заказам.
    pub total: Money,
    /// Счётчики секций.
    pub stats: ParseStats,
}

impl ParsedReport {
    /// Сумма по разобранным заказам без учёта строки `ИТОГО:`.
    pub fn orders_total(&self) -> Money {
        self.orders.iter().map(|o| o.amount).sum()
    }
}

/// Идентификатор выгрузки внутри накопителя.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportId(pub u64);

/// Выручка и количество заказов по одному виду работ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeBreakdown {
    /// Вид работ.
    pub work_type: String,
    /// Суммарная выручка.
    pub revenue: Money,
    /// Количество заказов.
    pub count: usize,
}

/// Сводка по набору заказов.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    /// Общая выручка.
    pub total_revenue: Money,
    /// Количество заказов.
    pub order_count: usize,
    /// Средний чек, ноль для пустого набора.
    pub average_check: Money,
    /// Разбивка по видам работ в порядке первого появления.
    pub by_type: Vec<TypeBreakdown>,
}
