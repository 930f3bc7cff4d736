use crate::entities::discount_code::DiscountType;

/// Compute the amount owed for one booking or join.
///
/// Inputs are already resolved against the catalog: an unknown district name
/// or service id never reaches this function, it is simply dropped by the
/// caller's lookup (so a typo degrades to "no surcharge"/"no add-on", not an
/// error). Percentage discounts apply to the subtotal after the surcharge
/// and services. The result is clamped at zero.
pub fn calculate_price(
    price_per_person: i64,
    headcount: i32,
    district_surcharge: Option<i64>,
    service_prices: &[i64],
    discount: Option<(DiscountType, i64)>,
) -> i64 {
    let mut subtotal = price_per_person * headcount as i64;
    subtotal += district_surcharge.unwrap_or(0);
    subtotal += service_prices.iter().sum::<i64>();

    let reduction = match discount {
        Some((DiscountType::Fixed, value)) => value,
        Some((DiscountType::Percentage, value)) => subtotal * value / 100,
        None => 0,
    };

    (subtotal - reduction).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_price_only() {
        // 500,000 per person, 2 people
        assert_eq!(calculate_price(500_000, 2, None, &[], None), 1_000_000);
    }

    #[test]
    fn test_surcharge_and_service() {
        assert_eq!(
            calculate_price(500_000, 2, Some(50_000), &[100_000], None),
            1_150_000
        );
    }

    #[test]
    fn test_fixed_discount() {
        assert_eq!(
            calculate_price(
                500_000,
                2,
                Some(50_000),
                &[100_000],
                Some((DiscountType::Fixed, 200_000))
            ),
            950_000
        );
    }

    #[test]
    fn test_percentage_discount_applies_after_surcharge_and_services() {
        // 10% off the full 1,150,000 subtotal
        assert_eq!(
            calculate_price(
                500_000,
                2,
                Some(50_000),
                &[100_000],
                Some((DiscountType::Percentage, 10))
            ),
            1_035_000
        );
    }

    #[test]
    fn test_discount_larger_than_subtotal_clamps_to_zero() {
        assert_eq!(
            calculate_price(
                500_000,
                2,
                Some(50_000),
                &[100_000],
                Some((DiscountType::Fixed, 2_000_000))
            ),
            0
        );
    }

    #[test]
    fn test_hundred_percent_discount_is_free() {
        assert_eq!(
            calculate_price(500_000, 2, None, &[], Some((DiscountType::Percentage, 100))),
            0
        );
    }

    #[test]
    fn test_percentage_formula() {
        for value in 0..=100 {
            let subtotal = 1_150_000;
            let price = calculate_price(
                1_150_000,
                1,
                None,
                &[],
                Some((DiscountType::Percentage, value)),
            );
            assert_eq!(price, subtotal - subtotal * value / 100);
            assert!(price >= 0);
        }
    }
}
