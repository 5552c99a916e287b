//! Накопитель заказов из нескольких выгрузок и выборки по нему.

use crate::error::ReportError;
use crate::raw::RawReport;
use crate::types::{Money, OrderRecord, ParseStats, ParsedReport, ReportDate, ReportId, Summary};
use std::fs::{self, DirEntry};
use std::path::Path;

/// Сведения о выгрузке, добавленной в накопитель.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestedReport {
    /// Идентификатор внутри накопителя.
    pub id: ReportId,
    /// Имя исходного файла.
    pub source: Option<String>,
    /// Дата выгрузки.
    pub date: ReportDate,
    /// Итог выгрузки.
    pub total: Money,
    /// Счётчики разбора.
    pub stats: ParseStats,
}

/// Заказ вместе с выгрузкой, из которой он получен.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredRecord {
    /// Выгрузка-источник.
    pub report: ReportId,
    /// Сам заказ.
    pub record: OrderRecord,
}

/// Фильтр выборки заказов.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Только заказы из указанной выгрузки.
    pub report: Option<ReportId>,
    /// Только заказы указанного вида работ.
    pub work_type: Option<String>,
}

impl Selection {
    /// Все заказы.
    #[inline]
    pub fn all() -> Self {
        Self::default()
    }

    /// Заказы одной выгрузки.
    #[inline]
    pub fn report(id: ReportId) -> Self {
        Self {
            report: Some(id),
            work_type: None,
        }
    }

    /// Заказы одного вида работ.
    #[inline]
    pub fn work_type(work_type: impl Into<String>) -> Self {
        Self {
            report: None,
            work_type: Some(work_type.into()),
        }
    }

    fn matches(&self, stored: &StoredRecord) -> bool {
        self.report.is_none_or(|id| id == stored.report)
            && self
                .work_type
                .as_deref()
                .is_none_or(|t| t == stored.record.work_type)
    }
}

/// Накопитель: заказы хранятся в порядке добавления выгрузок,
/// внутри выгрузки в порядке следования в тексте.
#[derive(Debug, Clone, Default)]
pub struct AccumulationStore {
    reports: Vec<IngestedReport>,
    records: Vec<StoredRecord>,
    next_id: u64,
}

impl AccumulationStore {
    /// Пустой накопитель.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Загружает и разбирает все `.txt` файлы каталога.
    #[inline]
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self, ReportError> {
        let mut store = Self::new();
        store.load_dir(dir)?;
        Ok(store)
    }

    /// Добавляет в накопитель все `.txt` файлы каталога в порядке имён.
    ///
    /// Пустые файлы пропускаются, остальные ошибки прерывают загрузку.
    ///
    /// # Пример
    ///
    /// ```
    /// # use order_report::AccumulationStore;
    /// let dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");
    /// let store = AccumulationStore::from_dir(dir).unwrap();
    /// assert!(!store.reports().is_empty());
    /// ```
    pub fn load_dir<P: AsRef<Path>>(&mut self, dir: P) -> Result<Vec<ReportId>, ReportError> {
        let mut entries: Vec<_> = fs::read_dir(dir)?
            .filter_map(std::result::Result::ok)
            .collect();
        // Делаем порядок файлов детерминированным.
        entries.sort_by_key(DirEntry::path);

        let mut ids = Vec::new();
        for entry in entries {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let is_txt = path
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("txt"));
            if !is_txt {
                continue;
            }

            let raw = RawReport::from_path(&path)?;
            match ParsedReport::parse(&raw) {
                Ok(report) => ids.push(self.ingest(report)),
                Err(ReportError::EmptyInput) => {
                    tracing::warn!(path = %path.display(), "empty report skipped");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(ids)
    }

    /// Добавляет разобранную выгрузку и возвращает её идентификатор.
    pub fn ingest(&mut self, report: ParsedReport) -> ReportId {
        let id = ReportId(self.next_id);
        self.next_id += 1;

        tracing::info!(
            id = id.0,
            source = report.source.as_deref().unwrap_or("-"),
            orders = report.orders.len(),
            "report ingested"
        );

        self.reports.push(IngestedReport {
            id,
            source: report.source,
            date: report.date,
            total: report.total,
            stats: report.stats,
        });
        self.records.extend(
            report
                .orders
                .into_iter()
                .map(|record| StoredRecord { report: id, record }),
        );
        id
    }

    /// Удаляет выгрузку и все её заказы. Возвращает число удалённых заказов,
    /// `None` если такой выгрузки нет.
    pub fn remove_report(&mut self, id: ReportId) -> Option<usize> {
        let pos = self.reports.iter().position(|r| r.id == id)?;
        self.reports.remove(pos);
        let before = self.records.len();
        self.records.retain(|stored| stored.report != id);
        let removed = before - self.records.len();
        tracing::info!(id = id.0, removed, "report removed");
        Some(removed)
    }

    /// Добавленные выгрузки в порядке добавления.
    #[inline]
    pub fn reports(&self) -> &[IngestedReport] {
        &self.reports
    }

    /// Сведения о конкретной выгрузке.
    pub fn report(&self, id: ReportId) -> Option<&IngestedReport> {
        self.reports.iter().find(|r| r.id == id)
    }

    /// Все заказы с привязкой к выгрузкам.
    #[inline]
    pub fn records(&self) -> &[StoredRecord] {
        &self.records
    }

    /// Число накопленных заказов.
    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Пуст ли накопитель.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Итератор по заказам, удовлетворяющим фильтру.
    pub fn select<'a, 'b>(
        &'a self,
        selection: &'b Selection,
    ) -> impl Iterator<Item = &'a OrderRecord> + use<'a, 'b> {
        self.records
            .iter()
            .filter(move |stored| selection.matches(stored))
            .map(|stored| &stored.record)
    }

    /// Сводка по заказам, удовлетворяющим фильтру.
    pub fn summary(&self, selection: &Selection) -> Summary {
        Summary::from_records(self.select(selection))
    }

    /// Сумма итогов всех выгрузок (с учётом строк `ИТОГО:`).
    pub fn declared_total(&self) -> Money {
        self.reports.iter().map(|r| r.total).sum()
    }
}
