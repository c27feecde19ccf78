use crate::AssessmentError;

/// French sport grades in half-grade steps. Index distance between two
/// grades is the "half-grade gap" used across the assessment and
/// macrocycle engines.
pub const GRADE_ORDER: [&str; 23] = [
    "5a", "5b", "5c", "6a", "6a+", "6b", "6b+", "6c", "6c+", "7a", "7a+", "7b", "7b+", "7c",
    "7c+", "8a", "8a+", "8b", "8b+", "8c", "8c+", "9a", "9a+",
];

pub fn is_known_grade(grade: &str) -> bool {
    GRADE_ORDER.contains(&grade)
}

pub fn grade_index(grade: &str) -> Result<usize, AssessmentError> {
    GRADE_ORDER
        .iter()
        .position(|g| *g == grade)
        .ok_or_else(|| AssessmentError::UnknownGrade(grade.to_string()))
}

/// `grade_a - grade_b` in half-grade steps (positive = a is harder).
pub fn grade_gap(grade_a: &str, grade_b: &str) -> Result<i32, AssessmentError> {
    Ok(grade_index(grade_a)? as i32 - grade_index(grade_b)? as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_gap_in_half_grades() {
        assert_eq!(grade_gap("7c", "7a").unwrap(), 4);
        assert_eq!(grade_gap("7a", "7c").unwrap(), -4);
        assert_eq!(grade_gap("6b", "6b").unwrap(), 0);
    }

    #[test]
    fn unknown_grade_is_an_error() {
        assert!(grade_index("V7").is_err());
        assert!(grade_gap("7a", "hard").is_err());
    }
}
