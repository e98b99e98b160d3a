//! Drawing state for the plotter: the current pose (position plus heading)
//! and the conversion from a script command to the relative motion the
//! chassis has to make.
//!
//! Coordinates are real-valued paper units with the x axis to the right and
//! the y axis up the page. Headings are absolute angles against the x axis,
//! kept in `[0, 2π)`. A fresh drawing starts at the origin facing up.
//!
//! This crate supports `no_std` and uses `libm` for the trigonometry, so
//! the same state tracking can run on the robot itself.

#![cfg_attr(not(feature = "std"), no_std)]

use core::f64::consts::PI;

use libm::{acos, cos, floor, sin, sqrt};
use scrib_script::Command;
use serde::{Deserialize, Serialize};

/// Unit tag for paper coordinates.
pub struct Paper;

pub type Point = euclid::Point2D<f64, Paper>;
pub type Vector = euclid::Vector2D<f64, Paper>;
pub type Angle = euclid::Angle<f64>;

/// Lengths and angles at or below this are treated as zero.
pub const EPSILON: f64 = 0.001;

/// Wraps an angle into `[0, 2π)`.
///
/// Anything that lands within `EPSILON` above zero collapses to exactly
/// zero, so floating-point noise never turns into a spurious maneuver.
pub fn normalize(a: Angle) -> Angle {
    let wrapped = a.radians - floor(a.radians / (2.0 * PI)) * (2.0 * PI);
    if wrapped > EPSILON {
        Angle::radians(wrapped)
    } else {
        Angle::zero()
    }
}

/// Converts a displacement vector to polar form, angle in `[0, 2π)`.
///
/// The angle against the `(1, 0)` axis comes from the law of cosines on
/// the triangle spanned by `v` and `(|v|, 0)`. That determines it only up
/// to sign, so vectors in the lower half-plane wrap to `2π − φ`.
fn polar(v: Vector) -> (Angle, f64) {
    let r = sqrt(v.x * v.x + v.y * v.y);
    if r <= EPSILON {
        return (Angle::zero(), r);
    }

    let cx = v.x - r;
    let c2 = cx * cx + v.y * v.y;
    let cos_phi = (1.0 - c2 / (2.0 * r * r)).clamp(-1.0, 1.0);
    let mut phi = acos(cos_phi);
    if v.y < -EPSILON {
        phi = 2.0 * PI - phi;
    }
    (Angle::radians(phi), r)
}

/// The motion one command asks of the chassis: a turn from the current
/// heading and a forward roll, plus what the pose becomes once that motion
/// has been made.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Displacement {
    /// Turn relative to the current heading, in `[0, 2π)`.
    pub turn: Angle,
    /// Forward distance, never negative.
    pub distance: f64,
    delta: Vector,
    heading: Angle,
}

/// Where the pen is and which way the chassis points.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Point,
    pub heading: Angle,
}

impl Default for Pose {
    fn default() -> Self {
        Pose {
            position: Point::origin(),
            heading: Angle::frac_pi_2(),
        }
    }
}

impl Pose {
    /// Works out the turn-and-roll a command requires from this pose.
    ///
    /// `lineto` and `rlineto` displacements shorter than `EPSILON` come
    /// back as a defined zero-turn, zero-roll motion rather than an error.
    /// `rlinerot` treats its angle as an absolute target heading, and a
    /// negative distance rolls nowhere (though the recorded pen position
    /// still moves, since that is where a later `lineto` will aim from).
    pub fn displacement(&self, cmd: &Command) -> Displacement {
        let (heading, delta, distance) = match *cmd {
            Command::LineTo { x, y } => {
                let v = Point::new(x as f64, y as f64) - self.position;
                let (phi, r) = polar(v);
                if r <= EPSILON {
                    return self.stay_put();
                }
                (phi, v, r)
            }
            Command::RelLineTo { dx, dy } => {
                let v = Vector::new(dx as f64, dy as f64);
                let (phi, r) = polar(v);
                if r <= EPSILON {
                    return self.stay_put();
                }
                (phi, v, r)
            }
            Command::RelLineRot { angle_deg, dist } => {
                let phi = normalize(Angle::degrees(angle_deg as f64));
                let r = dist as f64;
                let v = Vector::new(r * cos(phi.radians), r * sin(phi.radians));
                (phi, v, if r > 0.0 { r } else { 0.0 })
            }
        };
        Displacement {
            turn: normalize(heading - self.heading),
            distance,
            delta,
            heading,
        }
    }

    fn stay_put(&self) -> Displacement {
        Displacement {
            turn: Angle::zero(),
            distance: 0.0,
            delta: Vector::zero(),
            heading: self.heading,
        }
    }

    /// Commits a realized displacement: the position moves by the
    /// displacement vector and the heading becomes the absolute target
    /// heading. Storing the absolute heading (rather than accumulating
    /// turns) keeps angular drift from building up across commands.
    pub fn advance(&mut self, d: &Displacement) {
        self.position += d.delta;
        self.heading = d.heading;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::f64::consts::FRAC_PI_2;
    use proptest::prelude::*;

    fn assert_close(a: f64, b: f64) {
        assert!((a - b).abs() < 1e-6, "{a} vs {b}");
    }

    #[test]
    fn straight_ahead() {
        let mut pose = Pose::default();
        let d = pose.displacement(&Command::RelLineTo { dx: 0, dy: 5 });
        assert_eq!(d.turn.radians, 0.0);
        assert_close(d.distance, 5.0);

        pose.advance(&d);
        assert_close(pose.position.x, 0.0);
        assert_close(pose.position.y, 5.0);
        assert_close(pose.heading.radians, FRAC_PI_2);
    }

    #[test]
    fn quarter_turn_to_the_right() {
        let mut pose = Pose::default();
        let d = pose.displacement(&Command::LineTo { x: 5, y: 0 });
        assert_close(d.turn.radians, 3.0 * FRAC_PI_2);
        assert_close(d.distance, 5.0);

        pose.advance(&d);
        assert_close(pose.position.x, 5.0);
        assert_close(pose.position.y, 0.0);
        assert_close(pose.heading.radians, 0.0);
    }

    #[test]
    fn lineto_current_position_stays_put() {
        let mut pose = Pose {
            position: Point::new(3.0, 4.0),
            heading: Angle::radians(1.0),
        };
        let d = pose.displacement(&Command::LineTo { x: 3, y: 4 });
        assert_eq!(d.turn.radians, 0.0);
        assert_eq!(d.distance, 0.0);

        pose.advance(&d);
        assert_close(pose.heading.radians, 1.0);
    }

    #[test]
    fn rlinerot_heading_is_absolute() {
        let mut pose = Pose::default();
        let d = pose.displacement(&Command::RelLineRot {
            angle_deg: 180,
            dist: 2,
        });
        assert_close(d.turn.radians, FRAC_PI_2);
        assert_close(d.distance, 2.0);

        pose.advance(&d);
        assert_close(pose.position.x, -2.0);
        assert_close(pose.position.y, 0.0);
        assert_close(pose.heading.radians, PI);
    }

    #[test]
    fn rlinerot_zero_turn_collapses_exactly() {
        let pose = Pose::default();
        let d = pose.displacement(&Command::RelLineRot {
            angle_deg: 90,
            dist: 10,
        });
        assert_eq!(d.turn.radians, 0.0);
        assert_close(d.distance, 10.0);
    }

    #[test]
    fn rlinerot_negative_distance_rolls_nowhere() {
        let pose = Pose::default();
        let d = pose.displacement(&Command::RelLineRot {
            angle_deg: 0,
            dist: -3,
        });
        assert_eq!(d.distance, 0.0);
    }

    proptest! {
        #[test]
        fn normalize_lands_in_range(a in -1e6..1e6f64) {
            let n = normalize(Angle::radians(a)).radians;
            prop_assert!((0.0..2.0 * PI).contains(&n));
        }

        #[test]
        fn normalize_is_periodic(a in -100.0..100.0f64, k in -5..=5i32) {
            let n1 = normalize(Angle::radians(a)).radians;
            let n2 = normalize(Angle::radians(a + 2.0 * PI * k as f64)).radians;
            // Angular distance, so a value snapped to 0 on one side of the
            // epsilon threshold still counts as close to one that wasn't.
            let diff = (n1 - n2).abs();
            prop_assert!(diff.min(2.0 * PI - diff) < 2.0 * EPSILON);
        }

        #[test]
        fn polar_round_trips(x in -100.0..100.0f64, y in -100.0..100.0f64) {
            let v = Vector::new(x, y);
            prop_assume!(v.length() > 0.01);
            // Stay off the ±EPSILON band along the x axis, where the
            // half-plane tie-break deliberately rounds the angle up.
            prop_assume!(y.abs() > 0.01);
            let (phi, r) = polar(v);
            prop_assert!((r * cos(phi.radians) - x).abs() < EPSILON);
            prop_assert!((r * sin(phi.radians) - y).abs() < EPSILON);
        }

        #[test]
        fn turns_land_in_range(x in -100..100i32, y in -100..100i32, h in 0.0..6.28f64) {
            let pose = Pose { position: Point::origin(), heading: Angle::radians(h) };
            let d = pose.displacement(&Command::LineTo { x, y });
            prop_assert!((0.0..2.0 * PI).contains(&d.turn.radians));
            prop_assert!(d.distance >= 0.0);
        }
    }
}
