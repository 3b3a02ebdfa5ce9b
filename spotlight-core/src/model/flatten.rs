//! Linear, index-addressable view over grouped search results.
//!
//! Nothing here is cached: callers recompute from `SearchState::results` on
//! every frame or key press, so a flat index can never go stale.

use std::ops::Range;

use crate::model::search_state::{RecordRef, ResultGroup, ResultRecord};

/// A record together with its position across all groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlattenedRecord<'a> {
    pub model_key: &'a str,
    pub record: &'a ResultRecord,
    pub flat_index: usize,
}

/// A group plus the flat indices its records occupy, for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatGroup<'a> {
    pub group: &'a ResultGroup,
    pub indices: Range<usize>,
}

impl<'a> FlatGroup<'a> {
    pub fn records(&self) -> impl Iterator<Item = FlattenedRecord<'a>> + use<'a> {
        let group = self.group;
        let start = self.indices.start;
        group
            .records
            .iter()
            .enumerate()
            .map(move |(offset, record)| FlattenedRecord {
                model_key: group.model_key.as_str(),
                record,
                flat_index: start + offset,
            })
    }
}

/// Iterate every record in group order, then record order.
pub fn flatten(groups: &[ResultGroup]) -> impl Iterator<Item = FlattenedRecord<'_>> {
    groups
        .iter()
        .flat_map(|group| group.records.iter().map(move |record| (group, record)))
        .enumerate()
        .map(|(flat_index, (group, record))| FlattenedRecord {
            model_key: group.model_key.as_str(),
            record,
            flat_index,
        })
}

/// Groups annotated with their flat index ranges.
pub fn flat_groups(groups: &[ResultGroup]) -> Vec<FlatGroup<'_>> {
    let mut next = 0;
    groups
        .iter()
        .map(|group| {
            let start = next;
            next += group.records.len();
            FlatGroup {
                group,
                indices: start..next,
            }
        })
        .collect()
}

pub fn total_results(groups: &[ResultGroup]) -> usize {
    groups.iter().map(|group| group.records.len()).sum()
}

/// Map a flat index back to the record it addresses.
///
/// Out-of-range indices resolve to `None`.
pub fn resolve(groups: &[ResultGroup], index: usize) -> Option<RecordRef> {
    flatten(groups)
        .find(|flat| flat.flat_index == index)
        .map(|flat| RecordRef::new(flat.model_key, flat.record.id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str) -> ResultRecord {
        ResultRecord {
            id,
            name: name.into(),
        }
    }

    fn sample() -> Vec<ResultGroup> {
        vec![
            ResultGroup::new(
                "res.partner",
                "Contacts",
                "fa-address-book",
                vec![record(5, "Alice"), record(9, "Bob")],
            ),
            ResultGroup::new(
                "sale.order",
                "Sales Orders",
                "fa-shopping-cart",
                vec![record(3, "SO003")],
            ),
        ]
    }

    #[test]
    fn indices_follow_group_then_record_order() {
        let groups = sample();
        let flat: Vec<_> = flatten(&groups)
            .map(|f| (f.model_key, f.record.id, f.flat_index))
            .collect();

        assert_eq!(
            flat,
            vec![
                ("res.partner", 5, 0),
                ("res.partner", 9, 1),
                ("sale.order", 3, 2),
            ]
        );
        assert_eq!(total_results(&groups), 3);
    }

    #[test]
    fn flat_groups_carry_ranges() {
        let groups = sample();
        let ranges: Vec<_> = flat_groups(&groups).into_iter().map(|g| g.indices).collect();
        assert_eq!(ranges, vec![0..2, 2..3]);

        let second: Vec<_> = flat_groups(&groups)[1].records().map(|f| f.flat_index).collect();
        assert_eq!(second, vec![2]);
    }

    #[test]
    fn empty_groups_take_no_indices() {
        let mut groups = sample();
        groups.insert(1, ResultGroup::new("crm.lead", "CRM Leads", "fa-filter", Vec::new()));

        assert_eq!(total_results(&groups), 3);
        assert_eq!(resolve(&groups, 2), Some(RecordRef::new("sale.order", 3)));
        assert_eq!(flat_groups(&groups)[1].indices, 2..2);
    }

    #[test]
    fn resolve_out_of_range_is_none() {
        let groups = sample();
        assert_eq!(resolve(&groups, 1), Some(RecordRef::new("res.partner", 9)));
        assert_eq!(resolve(&groups, 3), None);
        assert_eq!(resolve(&[], 0), None);
    }
}
