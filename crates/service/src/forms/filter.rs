use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use models::form::{self, Column};
use sea_orm::{entity::prelude::DateTimeWithTimeZone, ColumnTrait, Condition};

/// Which entries a listing covers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormFilter {
    /// `start <= date < end`
    DateRange { start: DateTime<Utc>, end: DateTime<Utc> },
    /// `value` is null
    Pending,
    /// `value` is not null
    Saved,
}

impl FormFilter {
    /// Entries dated within the server's current local day.
    pub fn today() -> Self { Self::day_of(&Local::now()) }

    pub fn day_of<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let (start, end) = day_window(now);
        FormFilter::DateRange { start, end }
    }

    pub fn matches(&self, entry: &form::Model) -> bool {
        match self {
            FormFilter::DateRange { start, end } => {
                let date = entry.date.with_timezone(&Utc);
                *start <= date && date < *end
            }
            FormFilter::Pending => entry.value.is_none(),
            FormFilter::Saved => entry.value.is_some(),
        }
    }

    pub fn condition(&self) -> Condition {
        match self {
            FormFilter::DateRange { start, end } => Condition::all()
                .add(Column::Date.gte(DateTimeWithTimeZone::from(*start)))
                .add(Column::Date.lt(DateTimeWithTimeZone::from(*end))),
            FormFilter::Pending => Condition::all().add(Column::Value.is_null()),
            FormFilter::Saved => Condition::all().add(Column::Value.is_not_null()),
        }
    }
}

/// `[start of the day containing now, start of the next day)` in `now`'s timezone.
pub fn day_window<Tz: TimeZone>(now: &DateTime<Tz>) -> (DateTime<Utc>, DateTime<Utc>) {
    let tz = now.timezone();
    let day = now.date_naive();
    let start = local_midnight(&tz, day);
    let end = match day.succ_opt() {
        Some(next) => local_midnight(&tz, next),
        None => start + Duration::days(1),
    };
    (start, end)
}

fn local_midnight<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> DateTime<Utc> {
    let naive = day.and_time(NaiveTime::MIN);
    if let Some(t) = tz.from_local_datetime(&naive).earliest() {
        return t.with_timezone(&Utc);
    }
    // midnight skipped by a DST jump; the day starts at the first valid instant
    let shifted = naive + Duration::hours(1);
    match tz.from_local_datetime(&shifted).earliest() {
        Some(t) => t.with_timezone(&Utc),
        None => Utc.from_utc_datetime(&naive),
    }
}
