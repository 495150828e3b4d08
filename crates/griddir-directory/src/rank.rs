//! Distance ranking for fallback/safe region selection.

use griddir_types::RegionRecord;

/// Planar Euclidean distance from `(origin_x, origin_y)` to the record's
/// grid location.
#[must_use]
pub fn distance_from(origin_x: i32, origin_y: i32, record: &RegionRecord) -> f64 {
    let dx = f64::from(record.loc_x) - f64::from(origin_x);
    let dy = f64::from(record.loc_y) - f64::from(origin_y);
    dx.hypot(dy)
}

/// Order records by non-decreasing distance from the origin. Equidistant
/// records keep their input order.
pub fn sort_by_distance(records: &mut [RegionRecord], origin_x: i32, origin_y: i32) {
    // stable sort, so ties break by input order
    records.sort_by(|a, b| {
        distance_from(origin_x, origin_y, a).total_cmp(&distance_from(origin_x, origin_y, b))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use griddir_types::RegionId;

    fn at(x: i32, y: i32) -> RegionRecord {
        RegionRecord::new(RegionId::random(), format!("r{x}x{y}"), x, y)
    }

    #[test]
    fn test_distance_is_planar_euclidean() {
        assert_eq!(distance_from(0, 0, &at(3, 4)), 5.0);
        assert_eq!(distance_from(10, 0, &at(10, 0)), 0.0);
    }

    #[test]
    fn test_sort_orders_by_non_decreasing_distance() {
        let mut records = vec![at(10, 0), at(0, 0), at(5, 0)];
        sort_by_distance(&mut records, 0, 0);
        let xs: Vec<i32> = records.iter().map(|r| r.loc_x).collect();
        assert_eq!(xs, vec![0, 5, 10]);
    }

    #[test]
    fn test_equidistant_records_keep_input_order() {
        let mut records = vec![at(0, 5), at(5, 0), at(3, 4)];
        sort_by_distance(&mut records, 0, 0);
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["r0x5", "r5x0", "r3x4"]);
    }
}
