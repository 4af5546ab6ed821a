use crate::documents::{BENCHMARK_TIERS, Fields, FlatRecord, NestedItem, RawValue, SimpleMapping};
use serde::{Serialize, Serializer};

const LOG_TARGET: &str = "benchmarks";

/// An inclusive numeric range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Tier {
    pub min: f64,
    pub max: f64,
}

/// The reference ranges for one result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BenchmarkRange {
    pub healthy: Tier,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<Tier>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub critical: Option<Tier>,
}

/// Benchmark ranges keyed by dotted benchmark key, in document order.
///
/// Serializes as a tree: `security_team_ratio.engineering` becomes
/// `{"security_team_ratio": {"engineering": {...}}}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenchmarkTable {
    ranges: Fields<BenchmarkRange>,
}

/// The benchmark data handed to the generator.
#[derive(Debug, Clone, PartialEq)]
pub enum Benchmarks {
    /// A document of `- id:` records.
    Table(BenchmarkTable),

    /// Any other document, embedded as-is.
    Mapping(SimpleMapping),
}

impl Default for Benchmarks {
    fn default() -> Self {
        Self::Table(BenchmarkTable::default())
    }
}

impl Benchmarks {
    /// Whether `key` can be looked up by the generated script.
    ///
    /// Opaque mappings are not inspected, so every key is accepted for them.
    #[must_use]
    pub fn resolves(&self, key: &str) -> bool {
        match self {
            Self::Table(table) => table.get(key).is_some(),
            Self::Mapping(_) => true,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Table(table) => table.len(),
            Self::Mapping(mapping) => mapping.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Serialize for Benchmarks {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Table(table) => table.serialize(serializer),
            Self::Mapping(mapping) => mapping.serialize(serializer),
        }
    }
}

impl BenchmarkTable {
    /// Build a table from parsed benchmark records.
    ///
    /// Each record's `id` is its key, and each tier is the first `min`/`max` item of the
    /// nested list of the same name. Records without a usable `healthy` tier, and keys that
    /// would collide in the serialized tree, are skipped with a warning. An unusable
    /// `warning` or `critical` tier is left out of its range.
    #[must_use]
    pub fn from_records(records: &[FlatRecord]) -> Self {
        let [healthy_name, warning_name, critical_name] = BENCHMARK_TIERS;
        let mut table = Self::default();

        for record in records {
            let Some(key) = record.scalar("id").and_then(RawValue::as_str) else {
                continue;
            };

            if key.split('.').any(str::is_empty) {
                log::warn!(target: LOG_TARGET, "Skipping benchmark '{key}': empty key segment");
                continue;
            }

            if let Some(existing) = table.conflicting_key(key) {
                log::warn!(target: LOG_TARGET, "Skipping benchmark '{key}': collides with '{existing}'");
                continue;
            }

            let healthy = match read_tier(record, healthy_name) {
                Some(Ok(tier)) => tier,
                Some(Err(reason)) => {
                    log::warn!(target: LOG_TARGET, "Skipping benchmark '{key}': {healthy_name} tier {reason}");
                    continue;
                }
                None => {
                    log::warn!(target: LOG_TARGET, "Skipping benchmark '{key}': no {healthy_name} tier");
                    continue;
                }
            };

            let range = BenchmarkRange {
                healthy,
                warning: optional_tier(record, key, warning_name),
                critical: optional_tier(record, key, critical_name),
            };

            let _ = table.ranges.insert(key, range);
        }

        table
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&BenchmarkRange> {
        self.ranges.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BenchmarkRange)> {
        self.ranges.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.ranges.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// An existing key that is equal to `key` or one of its dotted prefixes, or that has
    /// `key` as a prefix.
    fn conflicting_key(&self, key: &str) -> Option<&str> {
        self.ranges.keys().find(|existing| {
            *existing == key || is_path_prefix(existing, key) || is_path_prefix(key, existing)
        })
    }

    fn tree(&self) -> Fields<BenchmarkNode<'_>> {
        let mut root = Fields::new();
        for (key, range) in self.ranges.iter() {
            insert_path(&mut root, key, range);
        }
        root
    }
}

impl Serialize for BenchmarkTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.tree().serialize(serializer)
    }
}

#[derive(Debug)]
enum BenchmarkNode<'a> {
    Range(&'a BenchmarkRange),
    Branch(Fields<Self>),
}

impl Serialize for BenchmarkNode<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Range(range) => range.serialize(serializer),
            Self::Branch(children) => children.serialize(serializer),
        }
    }
}

fn insert_path<'a>(branch: &mut Fields<BenchmarkNode<'a>>, path: &str, range: &'a BenchmarkRange) {
    let Some((head, rest)) = path.split_once('.') else {
        let _ = branch.insert(path, BenchmarkNode::Range(range));
        return;
    };

    if !branch.contains_key(head) {
        let _ = branch.insert(head, BenchmarkNode::Branch(Fields::new()));
    }

    // keys are checked for collisions on the way in, so a head is never a range
    if let Some(BenchmarkNode::Branch(children)) = branch.get_mut(head) {
        insert_path(children, rest, range);
    }
}

fn is_path_prefix(prefix: &str, key: &str) -> bool {
    key.strip_prefix(prefix).is_some_and(|rest| rest.starts_with('.'))
}

fn optional_tier(record: &FlatRecord, key: &str, name: &str) -> Option<Tier> {
    match read_tier(record, name)? {
        Ok(tier) => Some(tier),
        Err(reason) => {
            log::warn!(target: LOG_TARGET, "Ignoring {name} tier of benchmark '{key}': {reason}");
            None
        }
    }
}

/// Read a tier from the first record item of the nested list `name`.
///
/// Returns `None` when the list is absent.
fn read_tier(record: &FlatRecord, name: &str) -> Option<Result<Tier, &'static str>> {
    let items = record.list(name)?;

    let bounds = items.iter().find_map(|item| match item {
        NestedItem::Record(fields) => Some(fields),
        NestedItem::Value(_) => None,
    });

    let Some(bounds) = bounds else {
        return Some(Err("has no min/max entry"));
    };

    let (Some(min), Some(max)) = (
        bounds.get("min").and_then(RawValue::as_f64),
        bounds.get("max").and_then(RawValue::as_f64),
    ) else {
        return Some(Err("needs numeric min and max"));
    };

    if min > max {
        return Some(Err("has min greater than max"));
    }

    Some(Ok(Tier { min, max }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::{ParseOptions, parse_record_list};

    fn table(text: &str) -> BenchmarkTable {
        let options = ParseOptions::with_list_fields(BENCHMARK_TIERS).strict(true);
        BenchmarkTable::from_records(&parse_record_list(text, &options).unwrap())
    }

    const RATIOS: &str = "\
- id: security_team_ratio.engineering
  healthy:
    - min: 1.0
      max: 2.5
  warning:
    - min: 0.5
      max: 1.0
  critical:
    - min: 0.0
      max: 0.5
- id: security_team_ratio.company
  healthy:
    - min: 1
      max: 2
- id: vulns_per_repo
  healthy:
    - min: 0
      max: 2
  critical:
    - min: 5
      max: 20
";

    #[test]
    fn test_reads_tiers() {
        let table = table(RATIOS);
        assert_eq!(table.len(), 3);

        let engineering = table.get("security_team_ratio.engineering").unwrap();
        assert_eq!(engineering.healthy, Tier { min: 1.0, max: 2.5 });
        assert_eq!(engineering.warning, Some(Tier { min: 0.5, max: 1.0 }));
        assert_eq!(engineering.critical, Some(Tier { min: 0.0, max: 0.5 }));

        let company = table.get("security_team_ratio.company").unwrap();
        assert_eq!(company.healthy, Tier { min: 1.0, max: 2.0 });
        assert!(company.warning.is_none());

        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["security_team_ratio.engineering", "security_team_ratio.company", "vulns_per_repo"]);
    }

    #[test]
    fn test_serializes_as_nested_tree() {
        let json = serde_json::to_string(&table(RATIOS)).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"security_team_ratio":{"engineering":{"healthy":{"min":1.0,"max":2.5},"warning":{"min":0.5,"max":1.0},"critical":{"min":0.0,"max":0.5}},"#,
                r#""company":{"healthy":{"min":1.0,"max":2.0}}},"#,
                r#""vulns_per_repo":{"healthy":{"min":0.0,"max":2.0},"critical":{"min":5.0,"max":20.0}}}"#
            )
        );
    }

    #[test]
    fn test_healthy_tier_is_required() {
        let table = table("- id: missing\n  warning:\n    - min: 1\n      max: 2\n- id: kept\n  healthy:\n    - min: 0\n      max: 1\n");
        assert!(table.get("missing").is_none());
        assert!(table.get("kept").is_some());
    }

    #[test]
    fn test_invalid_tiers() {
        let text = "\
- id: inverted
  healthy:
    - min: 5
      max: 1
- id: words
  healthy:
    - min: low
      max: high
- id: bare
  healthy:
    - 3
- id: bad_warning
  healthy:
    - min: 0
      max: 1
  warning:
    - min: 2
";
        let table = table(text);
        assert!(table.get("inverted").is_none());
        assert!(table.get("words").is_none());
        assert!(table.get("bare").is_none());

        let bad_warning = table.get("bad_warning").unwrap();
        assert!(bad_warning.warning.is_none());
    }

    #[test]
    fn test_colliding_keys_are_skipped() {
        let text = "\
- id: ratio.engineering
  healthy:
    - min: 0
      max: 1
- id: ratio
  healthy:
    - min: 0
      max: 1
- id: ratio.engineering.senior
  healthy:
    - min: 0
      max: 1
- id: ratio.engineering
  healthy:
    - min: 5
      max: 9
- id: ratio..company
  healthy:
    - min: 0
      max: 1
- id: ratios
  healthy:
    - min: 0
      max: 1
";
        let table = table(text);
        let keys: Vec<_> = table.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["ratio.engineering", "ratios"]);
        assert_eq!(table.get("ratio.engineering").unwrap().healthy.max, 1.0);
    }

    #[test]
    fn test_benchmarks_resolve_keys() {
        let benchmarks = Benchmarks::Table(table(RATIOS));
        assert!(benchmarks.resolves("vulns_per_repo"));
        assert!(!benchmarks.resolves("security_team_ratio"));
        assert_eq!(benchmarks.len(), 3);

        let opaque = Benchmarks::Mapping(SimpleMapping::new());
        assert!(opaque.resolves("anything"));
        assert!(opaque.is_empty());
        assert_eq!(serde_json::to_string(&opaque).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&Benchmarks::default()).unwrap(), "{}");
    }
}
