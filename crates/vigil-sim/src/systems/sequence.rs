//! Caught sequence system — the one-shot escalation flow.
//!
//! Fade the overlay in, hold, notify the external callback, reset, fade
//! back out. Runs on the real clock so a fade keeps playing while the
//! simulation is paused. Single-flight per guard: the `SequenceRun`
//! component plus `AlertMode::Sequencing` are the re-entry guard, cleared
//! only on completion.

use std::panic::{catch_unwind, AssertUnwindSafe};

use hecs::{Entity, World};

use vigil_core::components::{AlertStatus, CaughtFlow, DetectionMeter, Guard, SequenceRun};
use vigil_core::enums::{AlertLevel, AlertMode, SequencePhase};
use vigil_core::events::{Alert, CueEvent};

use crate::engine::CaughtHook;
use crate::overlay::{smoothstep01, OverlayPresenter};

/// Advance every in-flight caught sequence by `dt_real` seconds.
pub fn run(
    world: &mut World,
    dt_real: f32,
    overlay: &mut dyn OverlayPresenter,
    hook: &mut Option<CaughtHook>,
    cues: &mut Vec<CueEvent>,
    alerts: &mut Vec<Alert>,
    tick: u64,
) {
    let mut meter_resets: Vec<Entity> = Vec::new();
    // (entity, guard number, ended by reload policy)
    let mut finished: Vec<(Entity, u32, bool)> = Vec::new();

    for (entity, (guard, flow, run)) in
        world.query::<(&Guard, &CaughtFlow, &mut SequenceRun)>().iter()
    {
        match run.phase {
            SequencePhase::FadeIn => {
                if !flow.show_overlay {
                    // No overlay configured: notify immediately.
                    notify(guard.number, hook, cues, alerts, tick);
                    if flow.reload_on_caught {
                        cues.push(CueEvent::ReloadRequested {
                            guard: guard.number,
                        });
                        finished.push((entity, guard.number, true));
                    } else {
                        meter_resets.push(entity);
                        finished.push((entity, guard.number, false));
                    }
                    run.phase = SequencePhase::Done;
                    continue;
                }

                if run.elapsed_in_phase == 0.0 {
                    overlay.show(&flow.message);
                    run.fade_from = overlay.view().opacity;
                }
                run.elapsed_in_phase += dt_real;
                let progress = fade_progress(run.elapsed_in_phase, flow.fade_in_secs);
                overlay.set_opacity(lerp(run.fade_from, 1.0, smoothstep01(progress)));
                if progress >= 1.0 {
                    run.phase = SequencePhase::Hold;
                    run.elapsed_in_phase = 0.0;
                }
            }
            SequencePhase::Hold => {
                run.elapsed_in_phase += dt_real;
                if run.elapsed_in_phase < flow.hold_secs {
                    continue;
                }

                notify(guard.number, hook, cues, alerts, tick);

                if flow.reload_on_caught {
                    // Early exit: the host rebuilds the scene; skip the
                    // reset and fade-out steps entirely.
                    cues.push(CueEvent::ReloadRequested {
                        guard: guard.number,
                    });
                    finished.push((entity, guard.number, true));
                    run.phase = SequencePhase::Done;
                } else {
                    // Reset the meter now; the overlay stays visible
                    // through the fade-out.
                    meter_resets.push(entity);
                    run.phase = SequencePhase::FadeOut;
                    run.elapsed_in_phase = 0.0;
                    run.fade_from = overlay.view().opacity;
                }
            }
            SequencePhase::FadeOut => {
                run.elapsed_in_phase += dt_real;
                let progress = fade_progress(run.elapsed_in_phase, flow.fade_out_secs);
                overlay.set_opacity(lerp(run.fade_from, 0.0, smoothstep01(progress)));
                if progress >= 1.0 {
                    // Hide is instant once the fade lands.
                    overlay.hide();
                    finished.push((entity, guard.number, false));
                    run.phase = SequencePhase::Done;
                }
            }
            SequencePhase::Done => {
                // Completion is applied the tick it is reached; a lingering
                // Done run (e.g. after a failed removal) is retired here.
                finished.push((entity, guard.number, false));
            }
        }
    }

    for entity in meter_resets {
        if let Ok(mut meter) = world.get::<&mut DetectionMeter>(entity) {
            meter.value = 0.0;
        }
    }

    for (entity, guard_number, reload) in finished {
        let _ = world.remove_one::<SequenceRun>(entity);
        if reload {
            // Keep Sequencing: nothing may re-trigger until the host tears
            // the scene down and resets this guard.
            continue;
        }
        if let Ok(mut status) = world.get::<&mut AlertStatus>(entity) {
            status.mode = AlertMode::Idle;
        }
        cues.push(CueEvent::SequenceCompleted {
            guard: guard_number,
        });
    }
}

/// Invoke the external caught callback. Failures — error returns and panics
/// alike — are logged as alerts and never abort the sequence.
fn notify(
    guard: u32,
    hook: &mut Option<CaughtHook>,
    cues: &mut Vec<CueEvent>,
    alerts: &mut Vec<Alert>,
    tick: u64,
) {
    if let Some(callback) = hook.as_mut() {
        let outcome = catch_unwind(AssertUnwindSafe(|| callback()));
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(message)) => alerts.push(Alert {
                level: AlertLevel::Error,
                message: format!("caught callback failed for guard {guard}: {message}"),
                tick,
            }),
            Err(_) => alerts.push(Alert {
                level: AlertLevel::Error,
                message: format!("caught callback panicked for guard {guard}"),
                tick,
            }),
        }
    }
    cues.push(CueEvent::CaughtNotified { guard });
}

fn fade_progress(elapsed: f32, duration: f32) -> f32 {
    if duration > 0.0 {
        (elapsed / duration).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
