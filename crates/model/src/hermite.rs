//! Physicists' Hermite polynomials.
//!
//! Evaluated by the three-term recurrence
//! `H_0 = 1`, `H_1 = 2x`, `H_n = 2x H_{n-1} - 2(n-1) H_{n-2}`,
//! which stays numerically stable up to the moderate degrees (~30) used by
//! shapelet pulse models, unlike the closed-form coefficient expansion.

/// Evaluates the physicists' Hermite polynomial `H_degree(x)`.
pub fn hermite(degree: usize, x: f64) -> f64 {
    match degree {
        0 => 1.0,
        1 => 2.0 * x,
        _ => {
            let mut prev = 1.0;
            let mut current = 2.0 * x;
            for n in 2..=degree {
                let next = 2.0 * x * current - 2.0 * (n as f64 - 1.0) * prev;
                prev = current;
                current = next;
            }
            current
        }
    }
}

/// Evaluates `sum_i coeffs[i] * H_i(x)` in a single recurrence pass.
///
/// Equivalent to summing [`hermite`] terms but shares the recurrence across
/// degrees, which is what the shapelet flux evaluation does per sample.
pub fn hermite_series(coeffs: &[f64], x: f64) -> f64 {
    let mut total = 0.0;
    let mut prev = 1.0;
    let mut current = 2.0 * x;
    for (i, &c) in coeffs.iter().enumerate() {
        match i {
            0 => total += c * prev,
            1 => total += c * current,
            _ => {
                let next = 2.0 * x * current - 2.0 * (i as f64 - 1.0) * prev;
                prev = current;
                current = next;
                total += c * current;
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn closed_forms_low_degree() {
        for &x in &[-3.0, -0.5, 0.0, 0.25, 1.0, 4.0] {
            assert_relative_eq!(hermite(0, x), 1.0);
            assert_relative_eq!(hermite(1, x), 2.0 * x);
            assert_relative_eq!(hermite(2, x), 4.0 * x * x - 2.0);
            assert_relative_eq!(hermite(3, x), 8.0 * x.powi(3) - 12.0 * x, epsilon = 1e-12);
        }
    }

    #[test]
    fn recurrence_matches_known_degree_five() {
        // H_5(x) = 32x^5 - 160x^3 + 120x
        let x: f64 = 1.3;
        let expected = 32.0 * x.powi(5) - 160.0 * x.powi(3) + 120.0 * x;
        assert_relative_eq!(hermite(5, x), expected, max_relative = 1e-12);
    }

    #[test]
    fn finite_at_moderate_degree() {
        for degree in 0..=30 {
            assert!(hermite(degree, 2.5).is_finite());
        }
    }

    #[test]
    fn series_matches_term_sum() {
        let coeffs = [0.6, 0.1, 0.2, -0.4, 0.05];
        for &x in &[-2.0, -0.1, 0.0, 0.7, 3.0] {
            let by_terms: f64 = coeffs
                .iter()
                .enumerate()
                .map(|(i, &c)| c * hermite(i, x))
                .sum();
            assert_relative_eq!(hermite_series(&coeffs, x), by_terms, epsilon = 1e-10);
        }
    }

    #[test]
    fn series_empty_is_zero() {
        assert_eq!(hermite_series(&[], 1.0), 0.0);
    }
}
