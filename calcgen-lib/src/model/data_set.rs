use super::{BenchmarkTable, Benchmarks, MetricCard, duplicate_card_ids, structure};
use crate::Result;
use crate::documents::{Document, DocumentKind, DocumentSources, SimpleMapping};

const LOG_TARGET: &str = " structure";

/// Everything the generator needs for one regeneration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataSet {
    pub site: SimpleMapping,
    pub cards: Vec<MetricCard>,
    pub benchmarks: Benchmarks,
}

impl DataSet {
    /// Read every document and build the model.
    ///
    /// Missing documents contribute empty data.
    ///
    /// # Errors
    ///
    /// Returns an error if a document cannot be read, or if it is malformed and the sources
    /// are strict.
    pub fn load(sources: &DocumentSources) -> Result<Self> {
        let site = sources
            .load(DocumentKind::Site)?
            .and_then(Document::into_mapping)
            .unwrap_or_default();

        let records = sources
            .load(DocumentKind::Metrics)?
            .and_then(Document::into_records)
            .unwrap_or_default();

        let benchmarks = match sources.load(DocumentKind::Benchmarks)? {
            Some(Document::Records(records)) => Benchmarks::Table(BenchmarkTable::from_records(&records)),
            Some(Document::Mapping(mapping)) => Benchmarks::Mapping(mapping),
            None => Benchmarks::default(),
        };

        let cards = structure(&records);
        for id in duplicate_card_ids(&cards) {
            log::warn!(target: LOG_TARGET, "Card id '{id}' is used by more than one card");
        }

        Ok(Self { site, cards, benchmarks })
    }

    #[must_use]
    pub fn control_count(&self) -> usize {
        self.cards.iter().map(|card| card.controls.len()).sum()
    }

    #[must_use]
    pub fn result_count(&self) -> usize {
        self.cards.iter().map(|card| card.results.len()).sum()
    }
}
