//! # Motion Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use motion_lib::{
    geom::{Pose, Rotation, Translation},
    path::{Lookahead, Path, Waypoint},
    prof_ctrl::ProfileGains,
    profile::{
        generate_profile, CompletionBehavior, MotionProfileConstraints, MotionProfileGoal,
        MotionState,
    },
    traj_ctrl::{Params, PathFollower},
};

fn waypoints() -> Vec<Waypoint> {
    vec![
        Waypoint::new(Translation::new(30.0, 20.0), 0.0, 30.0),
        Waypoint::new(Translation::new(60.0, 0.0), 10.0, 30.0),
        Waypoint::new(Translation::new(90.0, 20.0), 0.0, 30.0),
    ]
}

fn params() -> Params {
    Params {
        lookahead: Lookahead::new(6.0, 12.0, 0.0, 60.0),
        inertia_gain: 0.0,
        gains: ProfileGains::new(0.75, 0.03, 0.02, 1.0, 0.0),
        profile_max_vel: 60.0,
        profile_max_acc: 60.0,
        goal_pos_tolerance: 0.75,
        goal_vel_tolerance: 6.0,
        stop_steering_distance: 2.0,
        path_max_accel: 60.0,
        track_width: 25.0,
        min_output: None,
        max_output: None,
    }
}

fn profile_generation_benchmark(c: &mut Criterion) {
    let constraints = MotionProfileConstraints::new(12.0, 12.0);
    let goal = MotionProfileGoal::new(24.0, 0.0, CompletionBehavior::Overshoot);
    let moving_away = MotionState::new(0.0, 0.0, -6.0, 0.0);

    c.bench_function("generate_profile", |b| {
        b.iter(|| generate_profile(black_box(&constraints), black_box(&goal), black_box(&moving_away)))
    });
}

fn path_following_benchmark(c: &mut Criterion) {
    let params = params();
    let dt = 0.01;

    c.bench_function("build_path", |b| {
        b.iter(|| Path::from_waypoints(black_box(&waypoints()), params.path_max_accel))
    });

    c.bench_function("follow_path", |b| {
        b.iter(|| {
            let path = match Path::from_waypoints(&waypoints(), params.path_max_accel) {
                Ok(p) => p,
                Err(e) => panic!("Could not build the path: {}", e),
            };
            let mut follower = PathFollower::new(path, false, &params);

            let mut pose = Pose::new(Translation::new(30.0, 20.0), Rotation::new(30.0, -20.0, true));
            let mut displacement = 0.0;
            let mut velocity = 0.0;
            let mut t = 0.0;

            while t < 10.0 && !follower.is_finished() {
                let cmd = follower.update(t, pose, displacement, velocity);
                pose = pose.transform_by(Pose::exp(cmd.scaled(dt)));
                displacement += cmd.dx * dt;
                velocity = cmd.dx;
                t += dt;
            }

            pose
        })
    });
}

criterion_group!(benches, profile_generation_benchmark, path_following_benchmark);
criterion_main!(benches);
