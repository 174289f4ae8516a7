//! Category grouping over the timer list

use serde::Serialize;

use super::Timer;

/// Timers sharing one category, in list order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub timers: Vec<Timer>,
}

/// Group timers by category.
///
/// Groups appear in the order their category is first seen in `timers`, and
/// each group keeps the relative order of its timers.
pub fn grouped_by_category(timers: &[Timer]) -> Vec<CategoryGroup> {
    let mut groups: Vec<CategoryGroup> = Vec::new();
    for timer in timers {
        match groups.iter_mut().find(|g| g.category == timer.category) {
            Some(group) => group.timers.push(timer.clone()),
            None => groups.push(CategoryGroup {
                category: timer.category.clone(),
                timers: vec![timer.clone()],
            }),
        }
    }
    groups
}
