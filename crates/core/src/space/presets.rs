use super::{Field, ParameterSpace};

impl ParameterSpace {
    /// The six-parameter follow-the-gap revision.
    ///
    /// Fields: bubble radius, max lidar distance, speed, steer gain,
    /// steering smoothing alpha, preprocessing convolution size.
    #[must_use]
    pub fn follow_the_gap_v6() -> Self {
        // Known-good bounds, unwrap is safe
        Self::new(vec![
            Field::integer("bubble_radius", 20.0, 100.0),
            Field::real("max_lidar_dist", 1.0, 8.0),
            Field::real("speed", 1.0, 4.5),
            Field::real("steer", 0.4, 1.0),
            Field::real("steer_smooth_alpha", 0.0, 0.9),
            Field::integer("preprocess_conv_size", 1.0, 10.0),
        ])
        .unwrap()
    }

    /// The seven-parameter follow-the-gap revision with split straight and
    /// corner speeds.
    #[must_use]
    pub fn follow_the_gap_v7() -> Self {
        // Known-good bounds, unwrap is safe
        Self::new(vec![
            Field::integer("bubble_radius", 20.0, 100.0),
            Field::real("max_lidar_dist", 1.0, 8.0),
            Field::real("straight_speed", 1.0, 8.0),
            Field::real("corner_speed", 1.0, 5.0),
            Field::real("speed_max", 1.0, 7.0),
            Field::real("steer_smooth_alpha", 0.0, 0.9),
            Field::integer("preprocess_conv_size", 1.0, 10.0),
        ])
        .unwrap()
    }
}
