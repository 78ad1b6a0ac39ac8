//! Score ceilings driven by total building height.

/// Ceiling for buildings of four to six stories.
pub const MID_RISE_CEILING: u8 = 42;
/// Ceiling for buildings of seven or more stories.
pub const HIGH_RISE_CEILING: u8 = 20;

/// Ceiling for a building of `building_stories`, or `None` when height does not cap.
pub fn height_ceiling(building_stories: u32) -> Option<u8> {
    match building_stories {
        0..=3 => None,
        4..=6 => Some(MID_RISE_CEILING),
        _ => Some(HIGH_RISE_CEILING),
    }
}

/// Cap `base_score` by the building's height. Never raises a score, so a hazard zero
/// stays zero.
pub fn apply_height_ceiling(base_score: u8, building_stories: u32) -> u8 {
    match height_ceiling(building_stories) {
        Some(ceiling) => base_score.min(ceiling),
        None => base_score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_rise_buildings_keep_their_score() {
        for stories in 1..=3 {
            assert_eq!(apply_height_ceiling(92, stories), 92);
        }
    }

    #[test]
    fn mid_and_high_rise_buildings_are_capped() {
        assert_eq!(apply_height_ceiling(92, 4), 42);
        assert_eq!(apply_height_ceiling(92, 6), 42);
        assert_eq!(apply_height_ceiling(92, 7), 20);
        assert_eq!(apply_height_ceiling(92, 26), 20);
    }

    #[test]
    fn ceiling_never_raises_low_scores() {
        assert_eq!(apply_height_ceiling(25, 5), 25);
        assert_eq!(apply_height_ceiling(0, 30), 0);
    }
}
