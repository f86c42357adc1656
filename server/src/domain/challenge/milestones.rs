//! Streak milestone evaluation

use crate::core::constants::STREAK_MILESTONES;

/// Achievement key for a streak threshold
pub fn milestone_key(threshold: u32) -> String {
    format!("streak_{}", threshold)
}

/// All milestone thresholds met by the given streak length
pub fn milestones_reached(streak: u32) -> Vec<u32> {
    STREAK_MILESTONES
        .iter()
        .copied()
        .filter(|&m| streak >= m)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_milestone_key() {
        assert_eq!(milestone_key(7), "streak_7");
        assert_eq!(milestone_key(75), "streak_75");
    }

    #[test]
    fn test_milestones_reached() {
        assert!(milestones_reached(0).is_empty());
        assert!(milestones_reached(6).is_empty());
        assert_eq!(milestones_reached(7), vec![7]);
        assert_eq!(milestones_reached(14), vec![7, 14]);
        assert_eq!(milestones_reached(29), vec![7, 14]);
        assert_eq!(milestones_reached(75), vec![7, 14, 30, 50, 75]);
        assert_eq!(milestones_reached(100), vec![7, 14, 30, 50, 75]);
    }
}
