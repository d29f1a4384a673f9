use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WeekDay {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl WeekDay {
    pub const ALL: [WeekDay; 7] = [
        WeekDay::Monday,
        WeekDay::Tuesday,
        WeekDay::Wednesday,
        WeekDay::Thursday,
        WeekDay::Friday,
        WeekDay::Saturday,
        WeekDay::Sunday,
    ];

    pub fn short_name(self) -> &'static str {
        match self {
            WeekDay::Monday => "Mon",
            WeekDay::Tuesday => "Tue",
            WeekDay::Wednesday => "Wed",
            WeekDay::Thursday => "Thu",
            WeekDay::Friday => "Fri",
            WeekDay::Saturday => "Sat",
            WeekDay::Sunday => "Sun",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum RepeatPattern {
    Daily,
    #[default]
    Weekly,
    None,
}

/// When a task is due: a whole day, or an exact instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Schedule {
    AllDay(NaiveDate),
    Timed(DateTime<Utc>),
}

impl Schedule {
    /// The instant reminder offsets are measured against. All-day schedules
    /// resolve to midnight at the start of the day.
    pub fn instant(&self) -> DateTime<Utc> {
        match self {
            Schedule::AllDay(date) => Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)),
            Schedule::Timed(at) => *at,
        }
    }

    pub fn date(&self) -> NaiveDate {
        match self {
            Schedule::AllDay(date) => *date,
            Schedule::Timed(at) => at.date_naive(),
        }
    }

    pub fn is_all_day(&self) -> bool {
        matches!(self, Schedule::AllDay(_))
    }
}

/// Re-derive the repeat pattern after a change to the selected-day set.
/// A full week while weekly means daily; losing a day while daily means
/// weekly. `None` never participates.
pub fn reconcile_pattern(selected: &[WeekDay], pattern: RepeatPattern) -> RepeatPattern {
    match pattern {
        RepeatPattern::Weekly if selected.len() == WeekDay::ALL.len() => RepeatPattern::Daily,
        RepeatPattern::Daily if selected.len() < WeekDay::ALL.len() => RepeatPattern::Weekly,
        other => other,
    }
}

/// Editor state for a habit's weekday selection. Keeps the selected set and
/// the repeat pattern mutually consistent after every mutation, and holds the
/// last weekly subset aside while daily is active so an immediate switch back
/// restores it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DaySchedule {
    selected: Vec<WeekDay>,
    pattern: RepeatPattern,
    weekly_stash: Vec<WeekDay>,
}

impl DaySchedule {
    pub fn new(selected: Vec<WeekDay>, pattern: RepeatPattern) -> Self {
        let mut schedule = Self {
            selected: canonical(selected),
            pattern,
            weekly_stash: Vec::new(),
        };
        schedule.pattern = reconcile_pattern(&schedule.selected, schedule.pattern);
        schedule
    }

    pub fn selected_days(&self) -> &[WeekDay] {
        &self.selected
    }

    pub fn pattern(&self) -> RepeatPattern {
        self.pattern
    }

    /// Add or remove one day. Removing a day while daily drops the pattern to
    /// weekly with the post-removal set, not the stashed one.
    pub fn toggle_day(&mut self, day: WeekDay) {
        if let Some(position) = self.selected.iter().position(|d| *d == day) {
            self.selected.remove(position);
        } else {
            self.selected.push(day);
            self.selected.sort();
        }
        self.pattern = reconcile_pattern(&self.selected, self.pattern);
    }

    pub fn set_pattern(&mut self, pattern: RepeatPattern) {
        match pattern {
            RepeatPattern::Daily => {
                if self.pattern == RepeatPattern::Weekly {
                    self.weekly_stash = self.selected.clone();
                }
                self.selected = WeekDay::ALL.to_vec();
                self.pattern = RepeatPattern::Daily;
            }
            RepeatPattern::Weekly => {
                if self.pattern == RepeatPattern::Daily && !self.weekly_stash.is_empty() {
                    self.selected = self.weekly_stash.clone();
                }
                self.pattern = RepeatPattern::Weekly;
            }
            RepeatPattern::None => {
                self.pattern = RepeatPattern::None;
            }
        }
    }
}

fn canonical(mut days: Vec<WeekDay>) -> Vec<WeekDay> {
    days.sort();
    days.dedup();
    days
}

/// Short human description of a weekday selection, shown on the habit form.
pub fn schedule_summary(days: &[WeekDay]) -> String {
    if days.is_empty() {
        return "Set schedule".to_string();
    }
    format!(
        "{} {} a week",
        days.len(),
        if days.len() > 1 { "days" } else { "day" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selecting_the_seventh_day_switches_weekly_to_daily() {
        let mut schedule = DaySchedule::new(WeekDay::ALL[..6].to_vec(), RepeatPattern::Weekly);
        schedule.toggle_day(WeekDay::Sunday);
        assert_eq!(schedule.pattern(), RepeatPattern::Daily);
        assert_eq!(schedule.selected_days(), &WeekDay::ALL);
    }

    #[test]
    fn removing_a_day_while_daily_keeps_the_reduced_set() {
        let mut schedule = DaySchedule::new(WeekDay::ALL.to_vec(), RepeatPattern::Daily);
        schedule.toggle_day(WeekDay::Wednesday);
        assert_eq!(schedule.pattern(), RepeatPattern::Weekly);
        assert_eq!(schedule.selected_days().len(), 6);
        assert!(!schedule.selected_days().contains(&WeekDay::Wednesday));
    }

    #[test]
    fn daily_round_trip_restores_the_weekly_subset() {
        let subset = vec![WeekDay::Monday, WeekDay::Wednesday, WeekDay::Friday];
        let mut schedule = DaySchedule::new(subset.clone(), RepeatPattern::Weekly);
        schedule.set_pattern(RepeatPattern::Daily);
        assert_eq!(schedule.selected_days(), &WeekDay::ALL);
        schedule.set_pattern(RepeatPattern::Weekly);
        assert_eq!(schedule.selected_days(), subset.as_slice());
    }

    #[test]
    fn switching_to_weekly_without_a_stash_keeps_all_days() {
        let mut schedule = DaySchedule::new(WeekDay::ALL.to_vec(), RepeatPattern::Daily);
        schedule.set_pattern(RepeatPattern::Weekly);
        assert_eq!(schedule.selected_days(), &WeekDay::ALL);
        assert_eq!(schedule.pattern(), RepeatPattern::Weekly);
    }

    #[test]
    fn full_selection_constructed_as_weekly_is_reconciled_to_daily() {
        let schedule = DaySchedule::new(WeekDay::ALL.to_vec(), RepeatPattern::Weekly);
        assert_eq!(schedule.pattern(), RepeatPattern::Daily);
    }

    #[test]
    fn none_pattern_is_left_alone_by_reconciliation() {
        assert_eq!(
            reconcile_pattern(&WeekDay::ALL, RepeatPattern::None),
            RepeatPattern::None
        );
    }

    #[test]
    fn all_day_schedule_resolves_to_midnight() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        let schedule = Schedule::AllDay(date);
        assert_eq!(
            schedule.instant(),
            Utc.with_ymd_and_hms(2025, 3, 14, 0, 0, 0).unwrap()
        );
        assert!(schedule.is_all_day());
    }

    #[test]
    fn summary_counts_days() {
        assert_eq!(schedule_summary(&[]), "Set schedule");
        assert_eq!(schedule_summary(&[WeekDay::Monday]), "1 day a week");
        assert_eq!(
            schedule_summary(&[WeekDay::Monday, WeekDay::Friday]),
            "2 days a week"
        );
    }
}
