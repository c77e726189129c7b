//! Customer Aggregation
//!
//! Groups the flat unit list by raw customer label and computes progress.
//! Everything here is recomputed from the full list on each read.

use std::borrow::Borrow;
use std::collections::HashMap;

use crate::domain::Unit;

/// Units sharing one raw customer label, in list order
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerGroup<'a> {
    pub customer: &'a str,
    pub units: Vec<&'a Unit>,
}

impl<'a> CustomerGroup<'a> {
    pub fn total_count(&self) -> usize {
        self.units.len()
    }

    pub fn completed_count(&self) -> usize {
        self.units.iter().filter(|u| u.done).count()
    }

    pub fn progress_percent(&self) -> f64 {
        percent(self.completed_count(), self.total_count())
    }

    /// Units with high priority first; equal priorities keep list order
    pub fn by_priority(&self) -> Vec<&'a Unit> {
        let mut units = self.units.clone();
        units.sort_by_key(|u| u.priority.rank());
        units
    }

    /// e.g. `Acme - 1/2 Units`
    pub fn header_label(&self) -> String {
        format!(
            "{} - {}/{} Units",
            self.customer,
            self.completed_count(),
            self.total_count()
        )
    }

    /// e.g. `50.00% Complete`
    pub fn progress_label(&self) -> String {
        format!("{:.2}% Complete", self.progress_percent())
    }
}

/// All customer groups, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerGroups<'a> {
    groups: Vec<CustomerGroup<'a>>,
}

impl<'a> CustomerGroups<'a> {
    pub fn get(&self, customer: &str) -> Option<&CustomerGroup<'a>> {
        self.groups.iter().find(|g| g.customer == customer)
    }

    pub fn customers(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.groups.iter().map(|g| g.customer)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CustomerGroup<'a>> {
        self.groups.iter()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Progress of one customer, 0 for an unknown customer
    pub fn progress_percent(&self, customer: &str) -> f64 {
        self.get(customer).map(|g| g.progress_percent()).unwrap_or(0.0)
    }
}

/// Group units by their exact `customer` string in a single pass
pub fn group_by_customer<U: Borrow<Unit>>(units: &[U]) -> CustomerGroups<'_> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<CustomerGroup<'_>> = Vec::new();

    for unit in units {
        let unit: &Unit = Borrow::<Unit>::borrow(unit);
        let key = unit.customer.as_str();
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(CustomerGroup {
                customer: key,
                units: Vec::new(),
            });
            groups.len() - 1
        });
        groups[slot].units.push(unit);
    }

    CustomerGroups { groups }
}

/// `100 * done / total`, 0 when there are no units
pub fn progress_percent<U: Borrow<Unit>>(units: &[U]) -> f64 {
    percent(units.iter().filter(|u| Borrow::<Unit>::borrow(*u).done).count(), units.len())
}

/// Stable sort, high priority first
pub fn sort_by_priority<U: Borrow<Unit>>(units: &mut [U]) {
    units.sort_by_key(|u| Borrow::<Unit>::borrow(u).priority.rank());
}

fn percent(done: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    100.0 * done as f64 / total as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, UnitId};

    fn unit(id: &str, customer: &str, priority: Priority, done: bool) -> Unit {
        let mut unit = Unit::new(id, customer, priority).with_id(UnitId::from(id));
        unit.done = done;
        unit
    }

    #[test]
    fn test_groups_and_progress() {
        let units = vec![
            unit("1", "A", Priority::Low, true),
            unit("2", "A", Priority::Low, false),
            unit("3", "B", Priority::Low, true),
        ];
        let groups = group_by_customer(&units);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups.customers().collect::<Vec<_>>(), vec!["A", "B"]);
        assert_eq!(groups.get("A").unwrap().total_count(), 2);
        assert_eq!(groups.progress_percent("A"), 50.0);
        assert_eq!(groups.progress_percent("B"), 100.0);
        assert_eq!(groups.progress_percent("C"), 0.0);
    }

    #[test]
    fn test_raw_customer_key() {
        let units = vec![
            unit("1", "Acme", Priority::Low, false),
            unit("2", "acme", Priority::Low, false),
            unit("3", "Acme ", Priority::Low, false),
        ];
        assert_eq!(group_by_customer(&units).len(), 3);
    }

    #[test]
    fn test_progress_bounds() {
        assert_eq!(progress_percent::<Unit>(&[]), 0.0);

        let all_done = vec![unit("1", "A", Priority::Low, true), unit("2", "A", Priority::Low, true)];
        assert_eq!(progress_percent(&all_done), 100.0);

        let one_of_three = vec![
            unit("1", "A", Priority::Low, true),
            unit("2", "A", Priority::Low, false),
            unit("3", "A", Priority::Low, false),
        ];
        let pct = progress_percent(&one_of_three);
        assert!(pct > 0.0 && pct < 100.0);
    }

    #[test]
    fn test_priority_sort_is_stable() {
        let mut units = vec![
            unit("1", "A", Priority::Medium, false),
            unit("2", "A", Priority::High, false),
            unit("3", "A", Priority::Medium, false),
        ];
        sort_by_priority(&mut units);
        let ids: Vec<&str> = units.iter().map(|u| u.unit_number.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
    }

    #[test]
    fn test_group_by_priority_leaves_group_order() {
        let units = vec![
            unit("1", "A", Priority::Low, false),
            unit("2", "A", Priority::High, false),
            unit("3", "A", Priority::Medium, false),
            unit("4", "A", Priority::Low, false),
        ];
        let groups = group_by_customer(&units);
        let group = groups.get("A").unwrap();

        let sorted: Vec<&str> = group.by_priority().iter().map(|u| u.unit_number.as_str()).collect();
        assert_eq!(sorted, vec!["2", "3", "1", "4"]);
        assert_eq!(group.units[0].unit_number, "1");
    }

    #[test]
    fn test_labels() {
        let units = vec![
            unit("1", "Acme", Priority::Low, true),
            unit("2", "Acme", Priority::Low, false),
            unit("3", "Acme", Priority::Low, false),
        ];
        let groups = group_by_customer(&units);
        let group = groups.get("Acme").unwrap();
        assert_eq!(group.header_label(), "Acme - 1/3 Units");
        assert_eq!(group.progress_label(), "33.33% Complete");
    }
}
