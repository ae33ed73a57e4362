//! Offline run of a short script on a stepping clock.

use std::sync::Arc;

use cadence_script::{
    Clock, Ease, EaseCurve, ScriptConfig, ScriptExecutor, Scripter, TweenActor, TweenProperty,
};
use nalgebra::{UnitQuaternion, Vector3, Vector4};

fn main() -> cadence_script::Result<()> {
    let config = ScriptConfig::offline(30.0);
    let mut exec = ScriptExecutor::from_config(&config)?;
    let actor = Arc::new(TweenActor::with_config(exec.handle(), &config));

    let mut script = Scripter::new(exec.handle());
    let fade_in = Ease::from_secs(0.0, 0.5, EaseCurve::SmoothIn)?;
    let travel = Ease::from_secs(0.25, 1.0, EaseCurve::Smoother)?;

    let target = actor.clone();
    script
        .exec_fn(move || {
            target.tween_color(Vector4::new(1.0, 0.6, 0.2, 1.0), Some(&fade_in), true);
        })
        .skip_secs(0.5);
    let target = actor.clone();
    script.exec_fn(move || {
        target.tween_position(Vector3::new(0.0, 0.0, -5.0), Some(&travel), true);
        target.tween_rotation(
            UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::PI / 3.0),
            Some(&travel),
            true,
        );
    });

    for frame in 0..60 {
        exec.tick_frame();
        if frame % 10 == 0 {
            let pose = actor.pose();
            println!(
                "t={:.3}s pos={:?} color={:?} move_slots={}",
                exec.clock().secs(),
                pose.position.as_slice(),
                pose.color.as_slice(),
                actor.in_flight(TweenProperty::Move),
            );
        }
    }
    Ok(())
}
