//! # Path Test
//!
//! This binary runs the path follower against a simulated robot which follows
//! its velocity commands perfectly. It allows the trajectory control stack to
//! be developed and tuned without any hardware.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use color_eyre::{
    eyre::{eyre, WrapErr},
    Result,
};
use log::{info, trace};
use serde::{Deserialize, Serialize};

use motion_lib::{
    geom::{Pose, Rotation, Translation},
    path::Waypoint,
    traj_ctrl::{wheel_speeds, PathFollower},
};
use util::{
    archive::Archived,
    logger::{logger_init, LevelFilter},
    session::Session,
};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Errors at or above this at the end of the run fail the test.
const MAX_FINAL_ERROR: f64 = 1.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the test run
#[derive(Deserialize, Serialize, Debug)]
struct PathTestParams {
    /// Period of one control cycle
    cycle_period_s: f64,

    /// Time after which the run is abandoned
    max_duration_s: f64,

    start_x: f64,
    start_y: f64,
    start_heading_deg: f64,

    /// Drive the path backwards
    reversed: bool,

    /// Track width used to report the wheel speeds
    track_width: f64,

    waypoints: Vec<Waypoint>,
}

/// Summary of the run, saved into the session
#[derive(Serialize, Debug)]
struct PathTestSummary {
    finished: bool,
    duration_s: f64,
    final_pose: Pose,
    cross_track_error: f64,
    along_track_error: f64,
}

// ---------------------------------------------------------------------------
// MAIN
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("path_test", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Trace, &session).wrap_err("Failed to initialise logging")?;

    info!("Path Test\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let test_params: PathTestParams =
        util::params::load("path_test.toml").wrap_err("Could not load path test params")?;
    session
        .save_json("path_test_params.json", &test_params)
        .wrap_err("Could not save the test parameters")?;

    // ---- MODULE INIT ----

    let mut follower = PathFollower::from_params_file(
        "path_follower.toml",
        &test_params.waypoints,
        test_params.reversed,
    )
    .wrap_err("Failed to initialise the path follower")?;
    follower
        .init_archive(&session)
        .wrap_err("Failed to initialise the path follower archive")?;

    let mut pose = Pose::new(
        Translation::new(test_params.start_x, test_params.start_y),
        Rotation::from_degrees(test_params.start_heading_deg),
    );
    let mut displacement = 0.0;
    let mut velocity = 0.0;
    let mut t = 0.0;
    let dt = test_params.cycle_period_s;

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    while t < test_params.max_duration_s {
        let cmd = follower.update(t, pose, displacement, velocity);
        follower.write().wrap_err("Failed to archive the path follower")?;

        let (left, right) = wheel_speeds(cmd, test_params.track_width);
        trace!(
            "t = {:.2}: pose ({:.3}, {:.3}, {:.2} deg), cmd {:?}, wheels ({:.3}, {:.3})",
            t,
            pose.translation().x(),
            pose.translation().y(),
            pose.rotation().degrees(),
            cmd,
            left,
            right
        );

        if follower.is_finished() {
            break;
        }

        // Perfect robot
        pose = pose.transform_by(Pose::exp(cmd.scaled(dt)));
        displacement += cmd.dx * dt;
        velocity = cmd.dx;
        t += dt;
    }

    // ---- REPORT ----

    let summary = PathTestSummary {
        finished: follower.is_finished(),
        duration_s: t,
        final_pose: pose,
        cross_track_error: follower.cross_track_error(),
        along_track_error: follower.along_track_error(),
    };
    session
        .save_json("path_test_summary.json", &summary)
        .wrap_err("Could not save the test summary")?;

    info!(
        "Final pose ({:.3}, {:.3}, {:.2} deg) after {:.2} s",
        pose.translation().x(),
        pose.translation().y(),
        pose.rotation().degrees(),
        t
    );
    info!(
        "Cross track error {:.4}, along track error {:.4}",
        summary.cross_track_error, summary.along_track_error
    );

    if !summary.finished {
        return Err(eyre!(
            "Path not finished within {:.1} s",
            test_params.max_duration_s
        ));
    }

    if summary.cross_track_error.abs() >= MAX_FINAL_ERROR
        || summary.along_track_error.abs() >= MAX_FINAL_ERROR
    {
        return Err(eyre!(
            "Final errors too large: cross track {:.4}, along track {:.4}",
            summary.cross_track_error,
            summary.along_track_error
        ));
    }

    info!("Path test passed");

    Ok(())
}
