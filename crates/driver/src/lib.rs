//! Open-loop actuation: turns a command list into timed wheel-duty frames
//! for a differential-drive chassis.
//!
//! There is no feedback channel. Every motion is a fixed duty held for a
//! computed time, frames are sent strictly one at a time, and the pose is
//! trusted rather than measured. A run owns the outbound channel through a
//! [`Session`]; the only outside influence on a running session is its
//! [`AbortHandle`], which is polled between commands.

#![allow(async_fn_in_trait)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use scrib_geom::{Angle, Pose, EPSILON};
use scrib_protocol::Frame;
use scrib_script::Command;
use tokio::time::sleep;

pub mod maneuver;

/// Wheel duty magnitude for every powered frame. Only signs and durations
/// vary with the input, never the magnitude.
pub const DUTY: i8 = 15;
/// Length of each phase of a quarter-turn maneuver.
pub const TURN_PHASE: Duration = Duration::from_millis(1300);
/// Roll time per unit of forward distance.
pub const ROLL_PER_UNIT: Duration = Duration::from_millis(200);
/// Pause between consecutive commands, letting the chassis settle.
pub const SETTLE: Duration = Duration::from_millis(500);

/// The outbound half of the robot link.
///
/// `send` must not wait for the robot to acknowledge anything; the driver
/// paces itself purely by elapsed time. Delivery problems are the
/// transport's to recover from.
pub trait Channel {
    async fn send(&mut self, frame: Frame) -> Result<()>;
}

/// Cancels a running session. Cheap to clone and safe to fire from
/// anywhere; the sequencer notices at the next command boundary.
#[derive(Clone)]
pub struct AbortHandle(Arc<AtomicBool>);

impl AbortHandle {
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// One run's exclusive claim on the robot: the channel plus the abort
/// flag. Make a fresh session per drawing; an aborted one stays aborted.
pub struct Session<C> {
    channel: C,
    abort: Arc<AtomicBool>,
}

impl<C: Channel> Session<C> {
    pub fn new(channel: C) -> Self {
        Session {
            channel,
            abort: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn abort_handle(&self) -> AbortHandle {
        AbortHandle(self.abort.clone())
    }

    pub fn aborted(&self) -> bool {
        self.abort.load(Ordering::SeqCst)
    }

    pub fn into_channel(self) -> C {
        self.channel
    }

    /// Powered frames are suppressed once the session is aborted, so a
    /// maneuver already in flight winds down without further motion.
    async fn drive(&mut self, left: i8, right: i8) -> Result<()> {
        if self.aborted() {
            return Ok(());
        }
        log::debug!("wheels l {left} r {right}");
        self.channel.send(Frame::drive(left, right)).await
    }

    /// Cuts wheel power. Idempotent, and never suppressed: stopping is
    /// always safe.
    pub async fn stop(&mut self) -> Result<()> {
        log::debug!("stop");
        self.channel.send(Frame::STOP).await
    }

    /// Rotates in place by `turn` (relative, in `[0, 2π)`), quantized to
    /// quarter-turn maneuvers in whichever direction is shorter. Each
    /// maneuver is an arc phase and a counter-arc phase of [`TURN_PHASE`]
    /// each; a stop frame always follows, even when the turn quantizes to
    /// nothing.
    pub async fn turn_by(&mut self, turn: Angle) -> Result<()> {
        let (rotation, arc) = maneuver::shorter_rotation(turn);
        let quarters = maneuver::quarter_turns(arc);
        log::debug!(
            "turn {rotation:?} by {:.3} rad: {quarters} quarter turns",
            arc.radians
        );

        let (left, right) = maneuver::arc_duties(rotation, DUTY);
        for _ in 0..quarters {
            self.drive(-left, -right).await?;
            sleep(TURN_PHASE).await;
            self.drive(right, left).await?;
            sleep(TURN_PHASE).await;
        }
        self.stop().await
    }

    /// Rolls straight ahead for a time proportional to `distance`, then
    /// stops. Negative duty is forward, a quirk of the motor wiring.
    pub async fn forward(&mut self, distance: f64) -> Result<()> {
        log::debug!("forward {distance:.3}");
        if distance <= EPSILON {
            return self.stop().await;
        }
        self.drive(-DUTY, -DUTY).await?;
        sleep(ROLL_PER_UNIT.mul_f64(distance)).await;
        self.stop().await
    }

    /// Executes one command: turn, then roll, then commit the pose. The
    /// pose update is logical; open loop, nothing is measured back.
    pub async fn perform(&mut self, pose: &mut Pose, cmd: &Command) -> Result<()> {
        let d = pose.displacement(cmd);
        self.turn_by(d.turn).await?;
        self.forward(d.distance).await?;
        pose.advance(&d);
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every command was executed.
    Completed,
    /// The abort flag was seen at a command boundary; the rest of the
    /// script was dropped.
    Cancelled,
}

/// Runs a whole command list against a fresh pose.
pub async fn run<C: Channel>(session: &mut Session<C>, cmds: &[Command]) -> Result<RunOutcome> {
    run_with(session, cmds, |_, _| {}).await
}

/// Like [`run`], reporting the pose after each completed command.
///
/// Commands execute strictly one at a time with a [`SETTLE`] pause in
/// between. Aborting never retracts the command in flight; it is noticed
/// only between commands, after which a final stop frame is sent.
pub async fn run_with<C, F>(
    session: &mut Session<C>,
    cmds: &[Command],
    mut progress: F,
) -> Result<RunOutcome>
where
    C: Channel,
    F: FnMut(usize, &Pose),
{
    let mut pose = Pose::default();
    for (done, cmd) in cmds.iter().enumerate() {
        if session.aborted() {
            session.stop().await?;
            return Ok(RunOutcome::Cancelled);
        }
        session.perform(&mut pose, cmd).await?;
        progress(done + 1, &pose);
        sleep(SETTLE).await;
    }
    if session.aborted() {
        session.stop().await?;
        return Ok(RunOutcome::Cancelled);
    }
    Ok(RunOutcome::Completed)
}
