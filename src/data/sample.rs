//! Built-in admissions/enrollment figures, 2019–2024.
//!
//! `Enrollments` is the sum of the four department columns for each year.

use crate::domain::RawRecord;

/// Label shown as the data source when the built-in table is used.
pub const SAMPLE_SOURCE: &str = "built-in sample (2019-2024)";

// year, applications, admissions, arts, business, engineering, science
const ROWS: [(i32, f64, f64, f64, f64, f64, f64); 6] = [
    (2019, 5000.0, 2500.0, 300.0, 400.0, 500.0, 900.0),
    (2020, 5200.0, 2600.0, 310.0, 420.0, 520.0, 940.0),
    (2021, 5600.0, 2800.0, 325.0, 450.0, 540.0, 960.0),
    (2022, 6100.0, 3050.0, 330.0, 470.0, 575.0, 985.0),
    (2023, 6500.0, 3250.0, 345.0, 495.0, 600.0, 1000.0),
    (2024, 7000.0, 3500.0, 366.0, 530.0, 632.0, 870.0),
];

pub fn sample_records() -> Vec<RawRecord> {
    ROWS.iter()
        .map(|&(year, apps, admits, arts, business, engineering, science)| {
            RawRecord::new(year)
                .with("Applications", apps)
                .with("Admissions", admits)
                .with("Enrollments", arts + business + engineering + science)
                .with("Arts Enrolled", arts)
                .with("Business Enrolled", business)
                .with("Engineering Enrolled", engineering)
                .with("Science Enrolled", science)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_are_consecutive_and_unique() {
        let records = sample_records();
        for w in records.windows(2) {
            assert_eq!(w[1].year, w[0].year + 1);
        }
    }

    #[test]
    fn enrollments_sum_departments() {
        for r in sample_records() {
            let depts: f64 = r
                .values
                .iter()
                .filter(|(k, _)| k.ends_with("Enrolled"))
                .map(|(_, v)| v)
                .sum();
            assert_eq!(r.get("Enrollments"), Some(depts));
        }
    }
}
