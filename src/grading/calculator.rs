//! Weighted final-grade computation. Pure, no I/O.

use super::types::GradeComponent;

pub const PASSING_GRADE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq)]
pub struct ComputedGrade {
    pub final_grade: f64,
    pub letter_grade: &'static str,
}

/// Weighted mean over the weight actually present. A zero weight sum yields
/// 0 rather than a division error. Rounded to two decimals so stored grades
/// compare cleanly.
pub fn recompute(components: &[GradeComponent]) -> ComputedGrade {
    let total_weight: f64 = components.iter().map(|c| c.weight).sum();

    let final_grade = if total_weight > 0.0 {
        let weighted_sum: f64 = components.iter().map(|c| c.score * c.weight).sum();
        round2(weighted_sum / total_weight)
    } else {
        0.0
    };

    ComputedGrade {
        final_grade,
        letter_grade: letter_grade(final_grade),
    }
}

/// Fixed breakpoint table, inclusive lower bounds evaluated high-to-low.
pub fn letter_grade(final_grade: f64) -> &'static str {
    match final_grade {
        g if g >= 9.0 => "A+",
        g if g >= 8.5 => "A",
        g if g >= 8.0 => "B+",
        g if g >= 7.0 => "B",
        g if g >= 6.5 => "C+",
        g if g >= 5.5 => "C",
        g if g >= 5.0 => "D+",
        g if g >= 4.0 => "D",
        _ => "F",
    }
}

pub fn is_passing(final_grade: f64) -> bool {
    final_grade >= PASSING_GRADE
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::types::GradeComponentType;

    fn component(component_type: GradeComponentType, score: f64, weight: f64) -> GradeComponent {
        GradeComponent {
            component_type,
            score,
            weight,
            comment: None,
        }
    }

    #[test]
    fn weighted_mean_over_default_split() {
        let components = vec![
            component(GradeComponentType::SupervisorScore, 8.0, 0.7),
            component(GradeComponentType::CompanyScore, 9.0, 0.3),
        ];
        let computed = recompute(&components);
        assert_eq!(computed.final_grade, 8.3);
        assert_eq!(computed.letter_grade, "B+");
    }

    #[test]
    fn zero_weight_sum_yields_zero() {
        let components = vec![
            component(GradeComponentType::SupervisorScore, 8.0, 0.0),
            component(GradeComponentType::CompanyScore, 9.0, 0.0),
        ];
        let computed = recompute(&components);
        assert_eq!(computed.final_grade, 0.0);
        assert_eq!(computed.letter_grade, "F");
    }

    #[test]
    fn partial_weight_normalizes_over_present_weight() {
        let components = vec![component(GradeComponentType::SupervisorScore, 6.0, 0.7)];
        let computed = recompute(&components);
        assert_eq!(computed.final_grade, 6.0);
        assert_eq!(computed.letter_grade, "C");
    }

    #[test]
    fn recompute_is_deterministic() {
        let components = vec![
            component(GradeComponentType::SupervisorScore, 7.25, 0.7),
            component(GradeComponentType::CompanyScore, 6.5, 0.3),
        ];
        assert_eq!(recompute(&components), recompute(&components));
    }

    #[test]
    fn letter_grade_breakpoints() {
        assert_eq!(letter_grade(10.0), "A+");
        assert_eq!(letter_grade(9.0), "A+");
        assert_eq!(letter_grade(8.99), "A");
        assert_eq!(letter_grade(8.5), "A");
        assert_eq!(letter_grade(8.49), "B+");
        assert_eq!(letter_grade(8.0), "B+");
        assert_eq!(letter_grade(7.0), "B");
        assert_eq!(letter_grade(6.5), "C+");
        assert_eq!(letter_grade(5.5), "C");
        assert_eq!(letter_grade(5.0), "D+");
        assert_eq!(letter_grade(4.0), "D");
        assert_eq!(letter_grade(3.99), "F");
        assert_eq!(letter_grade(0.0), "F");
    }

    #[test]
    fn letter_grade_is_monotonic() {
        let order = ["F", "D", "D+", "C", "C+", "B", "B+", "A", "A+"];
        let rank = |letter: &str| order.iter().position(|l| *l == letter).unwrap();

        let mut previous = rank(letter_grade(0.0));
        let mut grade = 0.0;
        while grade <= 10.0 {
            let current = rank(letter_grade(grade));
            assert!(current >= previous, "letter grade regressed at {}", grade);
            previous = current;
            grade += 0.05;
        }
    }

    #[test]
    fn passing_threshold() {
        assert!(is_passing(5.0));
        assert!(!is_passing(4.99));
    }
}
