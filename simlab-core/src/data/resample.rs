//! Aggregate daily points into weekly or monthly bars.
//!
//! Buckets are ISO weeks or calendar months. Each output bar takes the first
//! open, highest high, lowest low, last close and summed volume of its
//! bucket, and is dated by the last observed date in the bucket so that a
//! bar never carries a date earlier than the data it summarizes.

use super::provider::Interval;
use crate::domain::{PricePoint, PriceSeries};
use chrono::{Datelike, NaiveDate};

pub fn resample(series: &PriceSeries, interval: Interval) -> PriceSeries {
    if interval == Interval::Daily {
        return series.clone();
    }

    let mut out: Vec<PricePoint> = Vec::new();
    let mut current_key: Option<(i32, u32)> = None;

    for point in series.points() {
        let key = bucket_key(point.date, interval);
        if current_key == Some(key) {
            if let Some(bar) = out.last_mut() {
                bar.high = bar.high.max(point.high);
                bar.low = bar.low.min(point.low);
                bar.close = point.close;
                bar.volume += point.volume;
                bar.date = point.date;
                continue;
            }
        }
        out.push(*point);
        current_key = Some(key);
    }

    // Bucket keys are monotonic in date, so output dates stay strictly ascending.
    PriceSeries::new(out).unwrap_or_default()
}

fn bucket_key(date: NaiveDate, interval: Interval) -> (i32, u32) {
    match interval {
        Interval::Daily => (date.year(), date.ordinal()),
        Interval::Weekly => {
            let week = date.iso_week();
            (week.year(), week.week())
        }
        Interval::Monthly => (date.year(), date.month()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(y: i32, m: u32, d: u32, o: f64, h: f64, l: f64, c: f64) -> PricePoint {
        PricePoint::new(NaiveDate::from_ymd_opt(y, m, d).unwrap(), o, h, l, c, 100.0)
    }

    #[test]
    fn daily_is_identity() {
        let series = PriceSeries::new(vec![point(2024, 1, 2, 1.0, 2.0, 0.5, 1.5)]).unwrap();
        assert_eq!(resample(&series, Interval::Daily), series);
    }

    #[test]
    fn weekly_aggregates_iso_weeks() {
        // 2024-01-05 is a Friday, 2024-01-08 a Monday.
        let series = PriceSeries::new(vec![
            point(2024, 1, 3, 10.0, 12.0, 9.0, 11.0),
            point(2024, 1, 4, 11.0, 15.0, 10.0, 14.0),
            point(2024, 1, 5, 14.0, 14.5, 8.0, 9.0),
            point(2024, 1, 8, 9.0, 10.0, 8.5, 9.5),
        ])
        .unwrap();
        let weekly = resample(&series, Interval::Weekly);
        assert_eq!(weekly.len(), 2);
        let first = weekly.points()[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap());
        assert_eq!(first.open, 10.0);
        assert_eq!(first.high, 15.0);
        assert_eq!(first.low, 8.0);
        assert_eq!(first.close, 9.0);
        assert_eq!(first.volume, 300.0);
    }

    #[test]
    fn monthly_aggregates_calendar_months() {
        let series = PriceSeries::new(vec![
            point(2024, 1, 30, 10.0, 11.0, 9.0, 10.5),
            point(2024, 1, 31, 10.5, 12.0, 10.0, 11.5),
            point(2024, 2, 1, 11.5, 13.0, 11.0, 12.5),
        ])
        .unwrap();
        let monthly = resample(&series, Interval::Monthly);
        let closes: Vec<f64> = monthly.points().iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![11.5, 12.5]);
    }

    #[test]
    fn weeks_spanning_year_boundary_stay_together() {
        // 2024-12-30 (Mon) and 2025-01-02 (Thu) are both ISO week 1 of 2025.
        let series = PriceSeries::new(vec![
            point(2024, 12, 30, 1.0, 1.0, 1.0, 1.0),
            point(2025, 1, 2, 2.0, 2.0, 2.0, 2.0),
        ])
        .unwrap();
        assert_eq!(resample(&series, Interval::Weekly).len(), 1);
    }
}
