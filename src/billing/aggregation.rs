use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::time_billed::{format_time_billed, split_minutes, HoursMinutes};
use crate::error::ValidationError;
use crate::models::reference::ReferenceMaps;
use crate::models::task::Task;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskLine {
    pub id: i64,
    pub task_descr: String,
    pub time_billed: Decimal,
    pub time_billed_display: String,
    // prefilled values for the hour and minute inputs
    pub edit: HoursMinutes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatterSummary {
    pub matter_number: String,
    pub client_number: String,
    pub matter_descr: String,
    pub client_name: String,
    pub tasks: Vec<TaskLine>,
    pub total_minutes: Decimal,
    pub total_display: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub matters: Vec<MatterSummary>,
}

// Matter groups keep the order each matter number is first seen in
pub fn summarize_by_matter(
    tasks: &[Task],
    refs: &ReferenceMaps,
) -> Result<Vec<MatterSummary>, ValidationError> {
    group_by_matter(tasks.iter())
        .into_iter()
        .map(|group| matter_summary(&group, refs))
        .collect()
}

// Most recent day first; tasks without a date count under `today`
pub fn summarize_by_day(
    tasks: &[Task],
    refs: &ReferenceMaps,
    today: NaiveDate,
) -> Result<Vec<DaySummary>, ValidationError> {
    let mut days: BTreeMap<NaiveDate, Vec<&Task>> = BTreeMap::new();
    for task in tasks {
        days.entry(task.date.unwrap_or(today)).or_default().push(task);
    }

    days.into_iter()
        .rev()
        .map(|(date, day_tasks)| {
            Ok::<_, ValidationError>(DaySummary {
                date,
                matters: group_by_matter(day_tasks)
                    .into_iter()
                    .map(|group| matter_summary(&group, refs))
                    .collect::<Result<_, _>>()?,
            })
        })
        .collect()
}

fn group_by_matter<'t, I>(tasks: I) -> Vec<Vec<&'t Task>>
where
    I: IntoIterator<Item = &'t Task>,
{
    let mut groups: Vec<Vec<&Task>> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for task in tasks {
        match positions.get(task.matter_number.as_str()) {
            Some(&i) => groups[i].push(task),
            None => {
                positions.insert(task.matter_number.as_str(), groups.len());
                groups.push(vec![task]);
            }
        }
    }
    groups
}

// Caller guarantees a non-empty group
fn matter_summary(group: &[&Task], refs: &ReferenceMaps) -> Result<MatterSummary, ValidationError> {
    let first = group[0];
    let total_minutes = group
        .iter()
        .try_fold(Decimal::ZERO, |sum, t| sum.checked_add(t.time_billed))
        .ok_or_else(|| ValidationError::TooLarge {
            field: "time_billed",
            max: Decimal::MAX.to_string(),
            value: format!("sum for matter {}", first.matter_number),
        })?;

    let tasks = group
        .iter()
        .map(|t| {
            Ok::<_, ValidationError>(TaskLine {
                id: t.id,
                task_descr: t.task_descr.clone(),
                time_billed: t.time_billed,
                time_billed_display: format_time_billed(t.time_billed)?,
                edit: split_minutes(t.time_billed)?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(MatterSummary {
        matter_number: first.matter_number.clone(),
        client_number: first.client_number.clone(),
        matter_descr: refs.matter_descr(&first.matter_number).to_string(),
        client_name: refs.client_name(&first.client_number).to_string(),
        tasks,
        total_minutes,
        total_display: format_time_billed(total_minutes)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::reference::{Client, Matter};
    use std::str::FromStr;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn task(id: i64, matter: &str, minutes: &str, date: Option<NaiveDate>) -> Task {
        Task {
            id,
            task_descr: format!("Task {}.", id),
            client_number: if matter == "011" { "4365" } else { "4211" }.into(),
            matter_number: matter.into(),
            time_billed: Decimal::from_str(minutes).unwrap(),
            date,
        }
    }

    fn refs() -> ReferenceMaps {
        ReferenceMaps::from_rows(
            vec![Client {
                client_number: "4211".into(),
                client_name: "Microsoft".into(),
            }],
            vec![Matter {
                matter_number: "488".into(),
                client_number: "4211".into(),
                matter_descr: "Derivative Securities Litigation".into(),
            }],
        )
    }

    #[test]
    fn groups_keep_first_seen_order() {
        let tasks = vec![
            task(1, "488", "10", None),
            task(2, "011", "20", None),
            task(3, "488", "30", None),
        ];
        let summaries = summarize_by_matter(&tasks, &refs()).unwrap();

        let matters: Vec<&str> = summaries.iter().map(|s| s.matter_number.as_str()).collect();
        assert_eq!(matters, vec!["488", "011"]);
        let ids: Vec<i64> = summaries[0].tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(summaries[0].total_minutes, Decimal::from(40));
        assert_eq!(summaries[0].total_display, "40.0 minutes.");
    }

    #[test]
    fn totals_are_exact_in_any_order() {
        let mut tasks = vec![
            task(1, "488", "0.1", None),
            task(2, "488", "0.2", None),
            task(3, "488", "59.7", None),
            task(4, "488", "1000000.3", None),
        ];
        let expected = Decimal::from_str("1000060.3").unwrap();

        let forward = summarize_by_matter(&tasks, &refs()).unwrap();
        tasks.reverse();
        let backward = summarize_by_matter(&tasks, &refs()).unwrap();

        assert_eq!(forward[0].total_minutes, expected);
        assert_eq!(backward[0].total_minutes, expected);
    }

    #[test]
    fn missing_reference_entries_resolve_to_empty() {
        let tasks = vec![task(1, "488", "90", None), task(2, "011", "5", None)];
        let summaries = summarize_by_matter(&tasks, &refs()).unwrap();

        assert_eq!(summaries[0].client_name, "Microsoft");
        assert_eq!(summaries[0].matter_descr, "Derivative Securities Litigation");
        assert_eq!(summaries[0].total_display, "1 hours, 30.0 minutes.");
        assert_eq!(summaries[1].client_name, "");
        assert_eq!(summaries[1].matter_descr, "");
    }

    #[test]
    fn days_sort_most_recent_first() {
        let tasks = vec![
            task(1, "488", "10", Some(day(1))),
            task(2, "011", "20", Some(day(3))),
            task(3, "488", "30", None),
            task(4, "488", "15", Some(day(3))),
        ];
        let days = summarize_by_day(&tasks, &refs(), day(2)).unwrap();

        let dates: Vec<NaiveDate> = days.iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![day(3), day(2), day(1)]);

        let may_third: Vec<&str> = days[0]
            .matters
            .iter()
            .map(|m| m.matter_number.as_str())
            .collect();
        assert_eq!(may_third, vec!["011", "488"]);
        assert_eq!(days[1].matters[0].tasks[0].id, 3);
    }

    #[test]
    fn no_tasks_means_no_groups() {
        assert!(summarize_by_matter(&[], &refs()).unwrap().is_empty());
        assert!(summarize_by_day(&[], &refs(), day(1)).unwrap().is_empty());
    }

    #[test]
    fn task_lines_carry_edit_values() {
        let tasks = vec![task(7, "488", "135.5", Some(day(1)))];
        let line = &summarize_by_matter(&tasks, &refs()).unwrap()[0].tasks[0];

        assert_eq!(line.time_billed_display, "2 hours, 15.5 minutes.");
        assert_eq!(line.edit.hours, 2);
        assert_eq!(line.edit.minutes, Decimal::from_str("15.5").unwrap());
    }

    #[test]
    fn overflowing_totals_are_an_error() {
        let tasks = vec![
            task(1, "488", "50000000000000000000000000000", None),
            task(2, "488", "50000000000000000000000000000", None),
        ];
        assert!(matches!(
            summarize_by_matter(&tasks, &refs()),
            Err(ValidationError::TooLarge { field: "time_billed", .. })
        ));
        assert!(summarize_by_day(&tasks, &refs(), day(1)).is_err());
    }
}
