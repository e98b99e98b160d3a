//! Turn planning for a chassis that can only rotate in coarse steps.
//!
//! The wheels have no encoders, so an exact in-place rotation isn't
//! available. Instead a turn is quantized into quarter-turn maneuvers,
//! each an arc followed by a counter-arc of the same length, which nets
//! out to roughly a 90° rotation around the pen.

use std::f64::consts::PI;

use scrib_geom::Angle;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rotation {
    Clockwise,
    CounterClockwise,
}

/// Picks the cheaper way round: a counter-clockwise turn of up to π, or
/// else clockwise by the complement. The returned arc is in `[0, π]`.
pub fn shorter_rotation(turn: Angle) -> (Rotation, Angle) {
    if turn.radians <= PI {
        (Rotation::CounterClockwise, turn)
    } else {
        (Rotation::Clockwise, Angle::radians(2.0 * PI - turn.radians))
    }
}

/// How many quarter-turn maneuvers best approximate an arc.
pub fn quarter_turns(arc: Angle) -> u32 {
    (2.0 * arc.radians / PI).round() as u32
}

/// Left and right duty magnitudes for the arc phase of one maneuver; the
/// counter-arc uses the same pair swapped. The outer wheel runs at double
/// duty, and which wheel is outer depends on the rotation direction.
pub fn arc_duties(rotation: Rotation, duty: i8) -> (i8, i8) {
    match rotation {
        Rotation::Clockwise => (2 * duty, duty),
        Rotation::CounterClockwise => (duty, 2 * duty),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn prefers_the_shorter_way() {
        let (rot, arc) = shorter_rotation(Angle::radians(FRAC_PI_2));
        assert_eq!(rot, Rotation::CounterClockwise);
        assert_eq!(arc.radians, FRAC_PI_2);

        let (rot, arc) = shorter_rotation(Angle::radians(3.0 * FRAC_PI_2));
        assert_eq!(rot, Rotation::Clockwise);
        assert!((arc.radians - FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn half_turn_goes_counter_clockwise() {
        // π is the tie; either direction would do, and we commit to one.
        let (rot, arc) = shorter_rotation(Angle::radians(PI));
        assert_eq!(rot, Rotation::CounterClockwise);
        assert_eq!(arc.radians, PI);
    }

    #[test]
    fn arc_stays_within_half_a_turn() {
        for i in 0..64 {
            let turn = Angle::radians(2.0 * PI * i as f64 / 64.0);
            let (_, arc) = shorter_rotation(turn);
            assert!((0.0..=PI).contains(&arc.radians));
        }
    }

    #[test]
    fn quantization() {
        assert_eq!(quarter_turns(Angle::zero()), 0);
        assert_eq!(quarter_turns(Angle::radians(0.1)), 0);
        assert_eq!(quarter_turns(Angle::radians(FRAC_PI_2)), 1);
        assert_eq!(quarter_turns(Angle::radians(PI)), 2);
        // The rounding boundary: an eighth of a turn already counts.
        assert_eq!(quarter_turns(Angle::radians(FRAC_PI_2 / 2.0)), 1);
    }

    #[test]
    fn outer_wheel_runs_double() {
        assert_eq!(arc_duties(Rotation::Clockwise, 15), (30, 15));
        assert_eq!(arc_duties(Rotation::CounterClockwise, 15), (15, 30));
    }
}
