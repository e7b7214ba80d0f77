//! Stride - Headless kinematic character controller driver
//!
//! Builds a small test course, then plays a scripted input timeline through the
//! player controller and logs what the character does.

mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use glam::Vec3;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use stride_core::GameTime;
use stride_game::{AnimationParams, InputAction, InputState, PlayerController};
use stride_physics::PhysicsWorld;

use settings::Settings;

/// Something the script does to the input state at a point in time
#[derive(Debug, Clone, Copy)]
enum ScriptEvent {
    Press(InputAction),
    Release(InputAction),
    /// Point the camera along a new horizontal direction
    Look(Vec3),
    /// Freeze simulated time while the script clock keeps running
    Pause,
    Resume,
}

/// How far below the character the report looks for ground
const GROUND_RAY_DISTANCE: f32 = 50.0;

/// Scripted input, sorted by wall-clock time in seconds
const SCRIPT: &[(f64, ScriptEvent)] = &[
    (1.0, ScriptEvent::Press(InputAction::MoveForward)),
    (3.0, ScriptEvent::Press(InputAction::MoveRight)),
    (5.0, ScriptEvent::Release(InputAction::MoveRight)),
    (5.0, ScriptEvent::Look(Vec3::NEG_X)),
    (5.0, ScriptEvent::Press(InputAction::Run)),
    (7.0, ScriptEvent::Press(InputAction::Jump)),
    (7.1, ScriptEvent::Release(InputAction::Jump)),
    (8.5, ScriptEvent::Release(InputAction::Run)),
    (8.5, ScriptEvent::Look(Vec3::X)),
    (9.5, ScriptEvent::Pause),
    (10.0, ScriptEvent::Resume),
    (11.0, ScriptEvent::Release(InputAction::MoveForward)),
];

/// Ground, a wall across +Z, a walkable ramp toward -X and a steep one toward +X
fn build_course() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.create_ground(0.0);
    world.create_static_box(Vec3::new(10.0, 2.0, 0.5), Vec3::new(0.0, 2.0, 6.5));
    world.create_ramp(Vec3::new(4.0, 0.2, 3.0), Vec3::new(-6.0, 1.8, 3.0), 25.0);
    world.create_ramp(Vec3::new(2.0, 0.2, 3.0), Vec3::new(9.0, 1.8, 3.0), 70.0);
    info!("Course built with {} colliders", world.collider_count());
    world
}

/// Log where the character is and what an animation graph would be fed
fn report(world: &PhysicsWorld, player: &PlayerController, running: bool, t: f64) {
    let params = AnimationParams::sample(player, running);
    let position = player.position();
    let capsule = player.config().capsule;
    // From the lower hemisphere's center, so a base resting on the floor is not a zero-length ray
    let clearance = world
        .raycast(
            capsule.bottom_center(position),
            Vec3::NEG_Y,
            GROUND_RAY_DISTANCE,
            player.config().collision_mask,
        )
        .map(|(_, distance)| distance - capsule.radius());

    info!(
        t = format_args!("{:.1}", t),
        pos = format_args!("({:.2}, {:.2}, {:.2})", position.x, position.y, position.z),
        yaw = format_args!("{:.1}", player.yaw_degrees()),
        state = ?player.state(),
        clearance = ?clearance,
        forward = params.forward_value,
        grounded = params.grounded,
        jumping = params.jumping,
        falling = params.falling,
        "Player"
    );
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    info!("Starting Stride...");

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load_from(&PathBuf::from(path)),
        None => Settings::load(),
    };

    let world = build_course();
    let mut player =
        PlayerController::new(settings.movement.clone()).context("Invalid movement settings")?;
    player.spawn(Vec3::new(0.0, 1.0, 0.0));

    let sim = &settings.simulation;
    let mut time = GameTime::new(sim.time.clone());
    let mut input = InputState::new();
    let mut camera_forward = Vec3::Z;
    let mut next_event = 0;
    let mut next_report = 0.0;
    let mut wall_clock = 0.0_f64;

    for _ in 0..sim.frame_count() {
        wall_clock += sim.frame_delta() as f64;

        while let Some(&(at, event)) = SCRIPT.get(next_event) {
            if at > wall_clock {
                break;
            }
            info!("wall={:.2}s {:?}", wall_clock, event);
            match event {
                ScriptEvent::Press(action) => input.press(action),
                ScriptEvent::Release(action) => input.release(action),
                ScriptEvent::Look(forward) => camera_forward = forward,
                ScriptEvent::Pause => time.pause(),
                ScriptEvent::Resume => time.resume(),
            }
            next_event += 1;
        }

        time.update(sim.frame_delta());

        let snapshot = input.snapshot(camera_forward);
        player.frame_update(&snapshot, time.delta_time);

        let fixed_dt = time.fixed_delta();
        for _ in 0..time.fixed_steps() {
            player.fixed_update(&world, &snapshot, fixed_dt);
        }
        input.clear_frame();

        if time.total_time >= next_report {
            report(&world, &player, snapshot.run_held, time.total_time);
            next_report += 1.0;
        }
    }

    info!(
        "Finished after {} frames and {} fixed steps",
        time.frame_count, time.fixed_step_count
    );
    Ok(())
}
