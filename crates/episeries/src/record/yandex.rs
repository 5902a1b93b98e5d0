//! Row processor for the Yandex regional statistics for Russia.

use super::processor::RowProcessor;
use super::{MAIN_TERRITORY, Origin};
use crate::input::RawRow;
use crate::schema::Field;

/// Every Yandex row is a region of Russia.
#[derive(Debug, Default, Clone, Copy)]
pub struct YandexRowProcessor;

impl YandexRowProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl RowProcessor for YandexRowProcessor {
    fn origin(&self) -> Origin {
        Origin::Yandex
    }

    fn country(&self, _row: &RawRow) -> String {
        "Russia".to_string()
    }

    fn region(&self, row: &RawRow) -> String {
        match row.get(Field::ProvinceState).trim() {
            "" => MAIN_TERRITORY.to_string(),
            region => region.to_string(),
        }
    }
}
