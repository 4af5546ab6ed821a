use crate::documents::{FlatRecord, RawValue};
use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde::Serialize;

const LOG_TARGET: &str = " structure";

/// How a result value is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::VariantNames)]
#[strum(serialize_all = "lowercase")]
pub enum DisplayFormat {
    Percentage,
    Currency,
    Number,
    Score,
}

/// An input control, taken verbatim from a record with `type: range`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Control(FlatRecord);

impl Control {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.scalar("id").and_then(RawValue::as_str)
    }

    #[must_use]
    pub fn label(&self) -> Option<&RawValue> {
        self.0.scalar("label")
    }

    #[must_use]
    pub fn min(&self) -> Option<&RawValue> {
        self.0.non_empty("min")
    }

    #[must_use]
    pub fn max(&self) -> Option<&RawValue> {
        self.0.non_empty("max")
    }

    #[must_use]
    pub fn default_value(&self) -> Option<&RawValue> {
        self.0.non_empty("default")
    }

    #[must_use]
    pub fn step(&self) -> Option<&RawValue> {
        self.0.non_empty("step")
    }
}

/// A derived result, taken verbatim from a record with a `format`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct MetricResult(FlatRecord);

impl MetricResult {
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.0.scalar("id").and_then(RawValue::as_str)
    }

    #[must_use]
    pub fn label(&self) -> Option<&RawValue> {
        self.0.scalar("label")
    }

    /// The raw `format` field, which is always present.
    #[must_use]
    pub fn format_raw(&self) -> Option<&RawValue> {
        self.0.non_empty("format")
    }

    /// The display format, or `None` if the field is outside the known vocabulary.
    #[must_use]
    pub fn format(&self) -> Option<DisplayFormat> {
        self.format_raw().and_then(RawValue::as_str).and_then(|s| s.parse().ok())
    }

    /// The dotted benchmark key, from `benchmark` or its older spelling `benchmark_key`.
    #[must_use]
    pub fn benchmark(&self) -> Option<&str> {
        self.0
            .non_empty("benchmark")
            .or_else(|| self.0.non_empty("benchmark_key"))
            .and_then(RawValue::as_str)
    }

    #[must_use]
    pub fn suffix(&self) -> Option<&RawValue> {
        self.0.non_empty("suffix")
    }
}

/// A card grouping a set of controls with the results derived from them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricCard {
    pub id: CompactString,
    pub title: CompactString,
    pub icon: CompactString,
    pub status: Option<CompactString>,
    pub description: Option<CompactString>,
    pub controls: Vec<Control>,
    pub results: Vec<MetricResult>,
}

impl MetricCard {
    fn open(id: &RawValue, title: &RawValue, icon: &RawValue, record: &FlatRecord) -> Self {
        let text = |key| record.non_empty(key).map(|v| CompactString::from(v.to_string()));
        Self {
            id: id.to_string().into(),
            title: title.to_string().into(),
            icon: icon.to_string().into(),
            status: text("status"),
            description: text("description"),
            controls: Vec::new(),
            results: Vec::new(),
        }
    }
}

/// Regroup a flat record stream into metric cards.
///
/// A record with a non-empty `title` and `icon` opens a card. Records with `type: range`
/// become controls of the open card, and records with a non-empty `format` become its
/// results. Everything else, and anything seen before the first card, is dropped.
/// Order is preserved throughout.
#[must_use]
pub fn structure(records: &[FlatRecord]) -> Vec<MetricCard> {
    let mut cards = Vec::new();
    let mut current: Option<MetricCard> = None;

    for record in records {
        if let (Some(title), Some(icon)) = (record.non_empty("title"), record.non_empty("icon")) {
            cards.extend(current.take());
            match record.non_empty("id") {
                Some(id) => current = Some(MetricCard::open(id, title, icon, record)),
                None => log::warn!(target: LOG_TARGET, "Dropping card '{title}' because it has no id"),
            }
            continue;
        }

        let Some(card) = current.as_mut() else {
            continue;
        };

        if record.scalar("type").and_then(RawValue::as_str) == Some("range") {
            card.controls.push(Control(record.clone()));
        } else if record.non_empty("format").is_some() {
            card.results.push(MetricResult(record.clone()));
        }
    }

    cards.extend(current);
    cards
}

/// Card ids that occur more than once, each listed once in order of first appearance.
#[must_use]
pub fn duplicate_card_ids(cards: &[MetricCard]) -> Vec<&str> {
    let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
    for card in cards {
        *counts.entry(card.id.as_str()).or_default() += 1;
    }

    let mut duplicates = Vec::new();
    for card in cards {
        let id = card.id.as_str();
        if counts.get(id).is_some_and(|&n| n > 1) && !duplicates.contains(&id) {
            duplicates.push(id);
        }
    }

    duplicates
}
