//! Dataset
//!
//! A collection of records sharing one attribute list, with the
//! information-theoretic scores used to choose split attributes.
use crate::attribute::{Attribute, AttributeKind, Attributelist};
use crate::constants::GAIN_EPSILON;
use crate::errors::{MalformedRecord, TreeError};
use crate::record::Record;
use crate::value::Value;
use hashbrown::HashMap;
use log::debug;
use serde::{Deserialize, Serialize};

/// The child datasets produced by splitting on an attribute, keyed by the
/// attribute value, in first-observed order.
pub type Partitions = Vec<(Value, Dataset)>;

/// Scores of a candidate split attribute.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeScore {
    pub attribute: Attribute,
    pub gain: f64,
    pub split_info: f64,
    pub gain_ratio: f64,
}

/// Records are kept as a multiset: identical records each count towards
/// class frequencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
    attributes: Attributelist,
}

impl Dataset {
    /// Build a dataset, registering every record's values as observed on
    /// the attribute list.
    pub fn new(attributes: Attributelist, records: Vec<Record>) -> Self {
        let mut ds = Dataset::with_attributes(attributes);
        for r in records {
            ds.add(r);
        }
        ds
    }

    /// An empty dataset over `attributes`.
    pub fn with_attributes(attributes: Attributelist) -> Self {
        Dataset {
            records: Vec::new(),
            attributes,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn attributes(&self) -> &Attributelist {
        &self.attributes
    }

    pub fn size(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of feature attributes, excluding the class.
    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }

    pub fn add(&mut self, record: Record) {
        for (i, v) in record.values().iter().enumerate() {
            if let Some(attr) = self.attributes.get_mut(i) {
                attr.observe(v);
            }
        }
        self.attributes.class_mut().observe(record.class_value());
        self.records.push(record);
    }

    /// Records whose value count differs from the number of features plus
    /// the class.
    pub fn check_dimensions(&self) -> Vec<MalformedRecord> {
        let expected = self.attribute_count() + 1;
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.len() != expected)
            .map(|(index, r)| MalformedRecord {
                index,
                expected,
                found: r.len(),
                record: r.to_string(),
            })
            .collect()
    }

    /// Reclassify every discrete attribute whose observed values all parse
    /// as numbers, converting the matching record values as well. Returns
    /// the names of the promoted attributes.
    pub fn promote_numeric_attributes(&mut self) -> Vec<String> {
        let mut promoted = Vec::new();
        for idx in 0..self.attributes.len() {
            let attr = &self.attributes.features()[idx];
            if !attr.has_only_numbers() {
                continue;
            }
            let numeric = attr.to_numeric();
            for r in self.records.iter_mut() {
                if let Some(v) = r.value_at_mut(idx) {
                    if let Some(n) = v.as_number() {
                        *v = Value::Numeric(n);
                    }
                }
            }
            promoted.push(numeric.name.clone());
            self.attributes.replace(idx, numeric);
        }
        promoted
    }

    /// Remove an attribute from the attribute list and from every record.
    pub fn remove_attribute(&mut self, name: &str) -> Result<(), TreeError> {
        let idx = self.attributes.remove(name)?;
        for r in self.records.iter_mut() {
            r.remove_value(idx);
        }
        Ok(())
    }

    /// Class values with their counts, in order of first appearance.
    pub fn class_frequencies(&self) -> Vec<(&Value, usize)> {
        count_first_seen(self.records.iter().map(|r| r.class_value()))
    }

    /// Distinct class values, in order of first appearance.
    pub fn class_values(&self) -> Vec<&Value> {
        self.class_frequencies().into_iter().map(|(v, _)| v).collect()
    }

    /// Distinct values of `attr` across the records, in order of first appearance.
    pub fn values_in_attribute(&self, attr: &Attribute) -> Result<Vec<&Value>, TreeError> {
        let idx = self.position_of(attr)?;
        let values = self.column(idx)?;
        Ok(count_first_seen(values.into_iter()).into_iter().map(|(v, _)| v).collect())
    }

    /// The class value shared by every record, or `None` when records
    /// disagree or the dataset is empty.
    pub fn common_class_value(&self) -> Option<&Value> {
        let first = self.records.first()?.class_value();
        self.records
            .iter()
            .all(|r| r.class_value() == first)
            .then_some(first)
    }

    /// The most frequent class value. On equal counts the value seen first
    /// wins.
    pub fn majority_class_value(&self) -> Option<&Value> {
        let mut majority = None;
        let mut high_freq = 0;
        for (v, freq) in self.class_frequencies() {
            if freq > high_freq {
                majority = Some(v);
                high_freq = freq;
            }
        }
        majority
    }

    /// Entropy of the class distribution, in bits.
    pub fn info(&self) -> Result<f64, TreeError> {
        if self.is_empty() {
            return Err(TreeError::EmptyDataset);
        }
        let size = self.size() as f64;
        Ok(self
            .class_frequencies()
            .iter()
            .map(|&(_, freq)| {
                let p = freq as f64 / size;
                -p * p.log2()
            })
            .sum())
    }

    /// Partition the records by their value of `attr`.
    ///
    /// One child is created for every value observed in this dataset. Each
    /// child owns a copy of the attribute list and of its records, with
    /// `attr` removed from both.
    pub fn split_by_attribute(&self, attr: &Attribute) -> Result<Partitions, TreeError> {
        let idx = self.position_of(attr)?;
        match &self.attributes.features()[idx].kind {
            AttributeKind::Discrete { .. } => self.split_discrete(idx),
            AttributeKind::Numeric => Err(TreeError::UnsupportedSplit(attr.name.clone())),
        }
    }

    fn split_discrete(&self, idx: usize) -> Result<Partitions, TreeError> {
        let column = self.column(idx)?;

        let mut child_attributes = self.attributes.clone();
        child_attributes.remove_at(idx);
        child_attributes.clear_values();

        let mut slots: HashMap<&Value, usize> = HashMap::new();
        let mut subsets: Partitions = Vec::new();
        for v in column.iter() {
            slots.entry(*v).or_insert_with(|| {
                subsets.push(((*v).clone(), Dataset::with_attributes(child_attributes.clone())));
                subsets.len() - 1
            });
        }

        for (r, v) in self.records.iter().zip(column) {
            let mut child = r.clone();
            child.remove_value(idx);
            subsets[slots[v]].1.add(child);
        }
        Ok(subsets)
    }

    /// Information gain, split information and gain ratio of `attr`,
    /// computed from a single partition.
    pub fn score_attribute(&self, attr: &Attribute) -> Result<AttributeScore, TreeError> {
        let info = self.info()?;
        let size = self.size() as f64;
        let mut info_by_attr = 0.0;
        let mut split_info = 0.0;
        for (_, subset) in self.split_by_attribute(attr)? {
            if subset.is_empty() {
                continue;
            }
            let rate = subset.size() as f64 / size;
            info_by_attr += rate * subset.info()?;
            split_info -= rate * rate.log2();
        }

        let gain = clamp_zero(info - info_by_attr);
        let split_info = clamp_zero(split_info);
        // A single observed value carries no partition information.
        let gain_ratio = if split_info == 0.0 { 0.0 } else { gain / split_info };
        Ok(AttributeScore {
            attribute: attr.clone(),
            gain,
            split_info,
            gain_ratio,
        })
    }

    pub fn gain(&self, attr: &Attribute) -> Result<f64, TreeError> {
        Ok(self.score_attribute(attr)?.gain)
    }

    pub fn split_info(&self, attr: &Attribute) -> Result<f64, TreeError> {
        Ok(self.score_attribute(attr)?.split_info)
    }

    pub fn gain_ratio(&self, attr: &Attribute) -> Result<f64, TreeError> {
        Ok(self.score_attribute(attr)?.gain_ratio)
    }

    /// Choose the feature attribute with the highest gain ratio.
    ///
    /// Returns `None` when no feature attributes remain, when no attribute
    /// has a positive gain ratio, or when the winner's raw gain is below
    /// `threshold` times the mean raw gain of all candidates.
    pub fn best_attribute_by_gain_ratio(&self, threshold: f64) -> Result<Option<AttributeScore>, TreeError> {
        self.best_attribute_where(threshold, |_| true)
    }

    /// Like [`Dataset::best_attribute_by_gain_ratio`], only considering the
    /// attributes accepted by `candidate`.
    pub fn best_attribute_where<F>(&self, threshold: f64, candidate: F) -> Result<Option<AttributeScore>, TreeError>
    where
        F: Fn(&Attribute) -> bool,
    {
        let mut gain_sum = 0.0;
        let mut n_candidates = 0;
        let mut best: Option<AttributeScore> = None;
        for attr in self.attributes.iter().filter(|a| candidate(*a)) {
            let score = self.score_attribute(attr)?;
            gain_sum += score.gain;
            n_candidates += 1;
            let best_ratio = best.as_ref().map_or(0.0, |b| b.gain_ratio);
            if score.gain_ratio > best_ratio {
                best = Some(score);
            }
        }

        let Some(best) = best else {
            return Ok(None);
        };
        let gain_mean = gain_sum / n_candidates as f64;
        if best.gain < threshold * gain_mean {
            debug!(
                "Rejecting split on {}: gain {:.6} is below {} x mean gain {:.6}.",
                best.attribute, best.gain, threshold, gain_mean
            );
            return Ok(None);
        }
        Ok(Some(best))
    }

    fn position_of(&self, attr: &Attribute) -> Result<usize, TreeError> {
        self.attributes
            .position(&attr.name)
            .ok_or_else(|| TreeError::UnknownAttribute(attr.name.clone()))
    }

    /// The values of the feature at `idx`, one per record.
    fn column(&self, idx: usize) -> Result<Vec<&Value>, TreeError> {
        self.records
            .iter()
            .map(|r| r.value_at(idx))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| TreeError::MalformedRecords(self.check_dimensions()))
    }
}

fn count_first_seen<'a>(values: impl Iterator<Item = &'a Value>) -> Vec<(&'a Value, usize)> {
    let mut slots: HashMap<&Value, usize> = HashMap::new();
    let mut counts: Vec<(&Value, usize)> = Vec::new();
    for v in values {
        match slots.get(v) {
            Some(&i) => counts[i].1 += 1,
            None => {
                slots.insert(v, counts.len());
                counts.push((v, 1));
            }
        }
    }
    counts
}

#[inline]
fn clamp_zero(v: f64) -> f64 {
    if v < GAIN_EPSILON {
        0.0
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(values: &[&str], class: &str) -> Record {
        Record::new(values.iter().map(|&v| Value::from(v)).collect(), Value::from(class))
    }

    fn attrs(names: &[&str]) -> Attributelist {
        Attributelist::new(
            names.iter().map(|&n| Attribute::discrete(n)).collect(),
            Attribute::discrete("class"),
        )
    }

    fn scenario() -> Dataset {
        Dataset::new(
            attrs(&["A"]),
            vec![
                rec(&["x"], "p"),
                rec(&["x"], "p"),
                rec(&["y"], "n"),
                rec(&["y"], "n"),
            ],
        )
    }

    #[test]
    fn test_info_balanced_binary() {
        let ds = scenario();
        assert!((ds.info().unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_info_empty_dataset() {
        let ds = Dataset::with_attributes(attrs(&["A"]));
        assert!(matches!(ds.info(), Err(TreeError::EmptyDataset)));
    }

    #[test]
    fn test_scores_perfect_split() {
        let ds = scenario();
        let a = Attribute::discrete("A");
        let score = ds.score_attribute(&a).unwrap();
        assert!((score.gain - 1.0).abs() < 1e-12);
        assert!((score.split_info - 1.0).abs() < 1e-12);
        assert!((score.gain_ratio - 1.0).abs() < 1e-12);
        assert_eq!(ds.gain_ratio(&a).unwrap(), score.gain_ratio);
    }

    #[test]
    fn test_gain_zero_when_uncorrelated() {
        let ds = Dataset::new(
            attrs(&["A"]),
            vec![rec(&["x"], "p"), rec(&["x"], "n"), rec(&["y"], "p"), rec(&["y"], "n")],
        );
        let a = Attribute::discrete("A");
        assert_eq!(ds.gain(&a).unwrap(), 0.0);
        assert!((ds.split_info(&a).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_single_valued_attribute_has_zero_ratio() {
        let ds = Dataset::new(attrs(&["A"]), vec![rec(&["x"], "p"), rec(&["x"], "n")]);
        let a = Attribute::discrete("A");
        let ratio = ds.gain_ratio(&a).unwrap();
        assert!(ratio.is_finite());
        assert_eq!(ratio, 0.0);
        assert_eq!(ds.split_info(&a).unwrap(), 0.0);
    }

    #[test]
    fn test_split_removes_attribute() {
        let ds = Dataset::new(
            attrs(&["A", "B"]),
            vec![rec(&["x", "1"], "p"), rec(&["y", "2"], "n"), rec(&["x", "3"], "n")],
        );
        let parts = ds.split_by_attribute(&Attribute::discrete("A")).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].0, Value::from("x"));
        assert_eq!(parts[0].1.size(), 2);
        assert_eq!(parts[1].0, Value::from("y"));
        for (_, child) in &parts {
            assert_eq!(child.attribute_count(), 1);
            assert!(child.attributes().get("A").is_none());
            assert!(child.check_dimensions().is_empty());
        }
        // The parent is untouched.
        assert_eq!(ds.attribute_count(), 2);
        assert_eq!(ds.records()[0].values().len(), 2);
    }

    #[test]
    fn test_split_children_observe_their_own_values() {
        let ds = Dataset::new(
            attrs(&["A", "B"]),
            vec![rec(&["x", "1"], "p"), rec(&["y", "2"], "n"), rec(&["x", "3"], "n")],
        );
        let parts = ds.split_by_attribute(&Attribute::discrete("A")).unwrap();
        let b = parts[0].1.attributes().get("B").unwrap();
        assert_eq!(b.values(), &[Value::from("1"), Value::from("3")]);
        assert_eq!(ds.attributes().get("B").unwrap().values().len(), 3);
    }

    #[test]
    fn test_split_numeric_is_unsupported() {
        let list = Attributelist::new(vec![Attribute::numeric("age")], Attribute::discrete("class"));
        let ds = Dataset::new(list, vec![Record::new(vec![Value::from(3.0)], Value::from("p"))]);
        let res = ds.split_by_attribute(&Attribute::numeric("age"));
        assert!(matches!(res, Err(TreeError::UnsupportedSplit(name)) if name == "age"));
    }

    #[test]
    fn test_split_unknown_attribute() {
        let ds = scenario();
        let res = ds.split_by_attribute(&Attribute::discrete("Z"));
        assert!(matches!(res, Err(TreeError::UnknownAttribute(_))));
    }

    #[test]
    fn test_duplicates_are_counted() {
        let ds = Dataset::new(
            attrs(&["A"]),
            vec![rec(&["x"], "p"), rec(&["x"], "p"), rec(&["x"], "p"), rec(&["y"], "n")],
        );
        assert_eq!(ds.size(), 4);
        assert_eq!(ds.class_frequencies(), vec![(&Value::from("p"), 3), (&Value::from("n"), 1)]);
    }

    #[test]
    fn test_common_class_value() {
        let ds = Dataset::new(attrs(&["A"]), vec![rec(&["x"], "p"), rec(&["y"], "p")]);
        assert_eq!(ds.common_class_value(), Some(&Value::from("p")));
        assert_eq!(scenario().common_class_value(), None);
        assert_eq!(Dataset::with_attributes(attrs(&[])).common_class_value(), None);
    }

    #[test]
    fn test_majority_tie_keeps_first_seen() {
        let ds = Dataset::new(
            attrs(&["A"]),
            vec![rec(&["x"], "n"), rec(&["x"], "p"), rec(&["y"], "p"), rec(&["y"], "n")],
        );
        assert_eq!(ds.majority_class_value(), Some(&Value::from("n")));
        let ds = Dataset::new(
            attrs(&["A"]),
            vec![rec(&["x"], "n"), rec(&["x"], "p"), rec(&["y"], "p")],
        );
        assert_eq!(ds.majority_class_value(), Some(&Value::from("p")));
    }

    #[test]
    fn test_best_attribute_prefers_highest_ratio() {
        let ds = Dataset::new(
            attrs(&["noise", "A"]),
            vec![
                rec(&["a", "x"], "p"),
                rec(&["b", "x"], "p"),
                rec(&["a", "y"], "n"),
                rec(&["b", "y"], "n"),
            ],
        );
        let best = ds.best_attribute_by_gain_ratio(1.0).unwrap().unwrap();
        assert_eq!(best.attribute.name, "A");
        let again = ds.best_attribute_by_gain_ratio(1.0).unwrap().unwrap();
        assert_eq!(best, again);
    }

    #[test]
    fn test_best_attribute_pruned_by_mean_gain() {
        let ds = scenario();
        // The only candidate's gain equals the mean gain.
        assert!(ds.best_attribute_by_gain_ratio(1.0).unwrap().is_some());
        assert!(ds.best_attribute_by_gain_ratio(1.5).unwrap().is_none());
    }

    #[test]
    fn test_best_attribute_none_without_features() {
        let ds = Dataset::new(attrs(&[]), vec![rec(&[], "p"), rec(&[], "n")]);
        assert!(ds.best_attribute_by_gain_ratio(0.0).unwrap().is_none());
    }

    #[test]
    fn test_best_attribute_where_skips_numeric() {
        let list = Attributelist::new(
            vec![Attribute::numeric("age"), Attribute::discrete("A")],
            Attribute::discrete("class"),
        );
        let ds = Dataset::new(
            list,
            vec![
                Record::new(vec![Value::from(1.0), Value::from("x")], Value::from("p")),
                Record::new(vec![Value::from(2.0), Value::from("y")], Value::from("n")),
            ],
        );
        assert!(matches!(
            ds.best_attribute_by_gain_ratio(1.0),
            Err(TreeError::UnsupportedSplit(_))
        ));
        let best = ds.best_attribute_where(1.0, |a| a.is_discrete()).unwrap().unwrap();
        assert_eq!(best.attribute.name, "A");
    }

    #[test]
    fn test_promote_numeric_attributes() {
        let mut ds = Dataset::new(
            attrs(&["age", "A"]),
            vec![rec(&["12", "x"], "p"), rec(&["3.5", "y"], "n")],
        );
        let promoted = ds.promote_numeric_attributes();
        assert_eq!(promoted, vec!["age".to_string()]);
        assert!(ds.attributes().get("age").unwrap().is_numeric());
        assert!(ds.attributes().get("A").unwrap().is_discrete());
        assert_eq!(ds.records()[1].values()[0], Value::from(3.5));
    }

    #[test]
    fn test_check_dimensions_reports_records() {
        let ds = Dataset::new(attrs(&["A", "B"]), vec![rec(&["x", "1"], "p"), rec(&["y"], "n")]);
        let bad = ds.check_dimensions();
        assert_eq!(bad.len(), 1);
        assert_eq!(bad[0].index, 1);
        assert_eq!(bad[0].expected, 3);
        assert_eq!(bad[0].found, 2);
    }

    #[test]
    fn test_observed_values_first_seen() {
        let ds = Dataset::new(
            attrs(&["A"]),
            vec![rec(&["y"], "n"), rec(&["x"], "p"), rec(&["y"], "p")],
        );
        let a = Attribute::discrete("A");
        assert_eq!(ds.values_in_attribute(&a).unwrap(), vec![&Value::from("y"), &Value::from("x")]);
        assert_eq!(ds.class_values(), vec![&Value::from("n"), &Value::from("p")]);
        assert_eq!(ds.attributes().class().values().len(), 2);
    }

    #[test]
    fn test_high_cardinality_column() {
        let records = (0..20_000)
            .map(|i| {
                let a = if i % 2 == 0 { "x" } else { "y" };
                let class = if i % 2 == 0 { "p" } else { "n" };
                Record::new(vec![Value::from(format!("id{}", i)), Value::from(a)], Value::from(class))
            })
            .collect();
        let ds = Dataset::new(attrs(&["id", "A"]), records);
        assert_eq!(ds.attributes().get("id").unwrap().values().len(), 20_000);

        let parts = ds.split_by_attribute(&Attribute::discrete("A")).unwrap();
        assert_eq!(parts.len(), 2);
        assert_eq!(parts[0].1.attributes().get("id").unwrap().values().len(), 10_000);
        let score = ds.score_attribute(&Attribute::discrete("A")).unwrap();
        assert!((score.gain_ratio - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_remove_attribute() {
        let mut ds = Dataset::new(attrs(&["A", "B"]), vec![rec(&["x", "1"], "p")]);
        ds.remove_attribute("A").unwrap();
        assert_eq!(ds.records()[0].values(), &[Value::from("1")]);
        assert!(ds.remove_attribute("A").is_err());
    }
}
