//! Сводные показатели по набору заказов.

use crate::error::ReportError;
use crate::types::{Money, OrderRecord, Summary, TypeBreakdown};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

impl Summary {
    /// Считает выручку, число заказов, средний чек и разбивку по видам работ.
    ///
    /// # Пример
    ///
    /// ```
    /// # use order_report::Summary;
    /// let summary = Summary::from_records(std::iter::empty());
    /// assert_eq!(summary.order_count, 0);
    /// assert!(summary.average_check.is_zero());
    /// ```
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a OrderRecord>,
    {
        let mut total_revenue = Decimal::ZERO;
        let mut order_count = 0usize;
        let mut by_type: Vec<TypeBreakdown> = Vec::new();

        for record in records {
            total_revenue += record.amount;
            order_count += 1;
            // Видов работ немного, линейный поиск сохраняет порядок появления.
            if let Some(entry) = by_type.iter_mut().find(|t| t.work_type == record.work_type) {
                entry.revenue += record.amount;
                entry.count += 1;
            } else {
                by_type.push(TypeBreakdown {
                    work_type: record.work_type.clone(),
                    revenue: record.amount,
                    count: 1,
                });
            }
        }

        let average_check = if order_count == 0 {
            Decimal::ZERO
        } else {
            (total_revenue / Decimal::from(order_count))
                .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        };

        Self {
            total_revenue,
            order_count,
            average_check,
            by_type,
        }
    }

    /// Выручка по видам работ в порядке первого появления.
    pub fn revenue_by_type(&self) -> impl Iterator<Item = (&str, Money)> {
        self.by_type.iter().map(|t| (t.work_type.as_str(), t.revenue))
    }

    /// Количество заказов по видам работ в порядке первого появления.
    pub fn count_by_type(&self) -> impl Iterator<Item = (&str, usize)> {
        self.by_type.iter().map(|t| (t.work_type.as_str(), t.count))
    }

    /// Выручка по конкретному виду работ.
    pub fn revenue_for(&self, work_type: &str) -> Option<Money> {
        self.by_type
            .iter()
            .find(|t| t.work_type == work_type)
            .map(|t| t.revenue)
    }

    /// Количество заказов конкретного вида работ.
    pub fn count_for(&self, work_type: &str) -> Option<usize> {
        self.by_type
            .iter()
            .find(|t| t.work_type == work_type)
            .map(|t| t.count)
    }
}

/// Возвращает `n` самых крупных заказов по убыванию суммы.
///
/// Заказы с равной суммой остаются в исходном порядке.
pub fn top_n<'a, I>(records: I, n: usize) -> Vec<&'a OrderRecord>
where
    I: IntoIterator<Item = &'a OrderRecord>,
{
    let mut sorted: Vec<&OrderRecord> = records.into_iter().collect();
    sorted.sort_by(|a, b| b.amount.cmp(&a.amount));
    sorted.truncate(n);
    sorted
}

/// Процент выполнения цели: `min(100, round(metric / target * 100))`.
///
/// Отрицательный результат обрезается до нуля. Цель должна быть положительной.
///
/// # Пример
///
/// ```
/// # use order_report::{progress, Money};
/// assert_eq!(progress(Money::from(250), Money::from(1000)).unwrap(), 25);
/// assert!(progress(Money::from(250), Money::ZERO).is_err());
/// ```
pub fn progress(metric: Money, target: Money) -> Result<u8, ReportError> {
    if target <= Decimal::ZERO {
        return Err(ReportError::InvalidTarget { target });
    }
    let hundred = Decimal::ONE_HUNDRED;
    let Some(percent) = metric
        .checked_div(target)
        .and_then(|ratio| ratio.checked_mul(hundred))
    else {
        // Переполнение возможно только при очень большом отношении.
        return Ok(if metric.is_sign_negative() { 0 } else { 100 });
    };
    let rounded = percent.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    Ok(rounded.clamp(Decimal::ZERO, hundred).to_u8().unwrap_or(0))
}
