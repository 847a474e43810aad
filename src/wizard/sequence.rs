//! Canonical step ordering: name, filter, sort

use crate::step::Step;

/// Give each discovered step its registry name
pub fn name_steps(discovered: Vec<(String, Step)>) -> Vec<Step> {
    discovered
        .into_iter()
        .map(|(name, mut step)| {
            step.set_name(&name);
            step
        })
        .collect()
}

/// Keep only available steps
pub fn filter_steps(steps: Vec<Step>) -> Vec<Step> {
    steps.into_iter().filter(Step::is_available).collect()
}

/// Order by weight; `sort_by_key` is stable so equal weights keep discovery order
pub fn order_steps(mut steps: Vec<Step>) -> Vec<Step> {
    steps.sort_by_key(|s| s.settings().weight);
    steps
}

pub fn sequence(discovered: Vec<(String, Step)>) -> Vec<Step> {
    order_steps(filter_steps(name_steps(discovered)))
}
