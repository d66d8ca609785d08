#[cfg(test)]
mod tests {
    use glam::Vec3;

    use crate::commands::DirectorCommand;
    use crate::constants::DT;
    use crate::types::{Capsule, Pose, SimTime};

    #[test]
    fn test_sim_time_two_clocks() {
        let mut time = SimTime::default();

        // Running at normal scale: both clocks advance together.
        for _ in 0..60 {
            time.advance(true, 1.0);
        }
        assert_eq!(time.tick, 60);
        assert!((time.sim_secs - 60.0 * DT).abs() < 1e-5);
        assert!((time.real_secs - 60.0 * DT).abs() < 1e-5);

        // Paused: the real clock keeps moving, the sim clock freezes.
        let sim_before = time.sim_secs;
        for _ in 0..30 {
            time.advance(false, 1.0);
        }
        assert_eq!(time.tick, 90);
        assert_eq!(time.sim_secs, sim_before);
        assert!((time.real_secs - 90.0 * DT).abs() < 1e-5);

        // Time scale stretches the sim clock only.
        let real_before = time.real_secs;
        time.advance(true, 2.0);
        assert!((time.sim_secs - (sim_before + 2.0 * DT)).abs() < 1e-5);
        assert!((time.real_secs - (real_before + DT)).abs() < 1e-5);
    }

    #[test]
    fn test_capsule_upright_geometry() {
        let capsule = Capsule::upright(Vec3::ZERO, 1.8, 0.35);

        // Segment is vertical and centered at half height.
        assert!((capsule.midpoint() - Vec3::new(0.0, 0.9, 0.0)).length() < 1e-5);
        let axis = capsule.axis();
        assert!(axis.x.abs() < 1e-6 && axis.z.abs() < 1e-6);
        // Cylinder segment length = height - 2r.
        assert!((axis.y - (1.8 - 0.7)).abs() < 1e-5);
        // Cap centers sit radius away from the overall extents.
        assert!((capsule.top.y + capsule.radius - 1.8).abs() < 1e-5);
        assert!((capsule.bottom.y - capsule.radius).abs() < 1e-5);
    }

    #[test]
    fn test_capsule_degenerate_height_clamps() {
        // Height below the sphere diameter collapses to a zero-length segment
        // rather than inverting.
        let capsule = Capsule::upright(Vec3::ZERO, 0.1, 0.35);
        assert!(capsule.axis().length() < 1e-6);
        assert!(capsule.top.y >= capsule.bottom.y);
    }

    #[test]
    fn test_pose_normalizes_forward() {
        let pose = Pose::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0));
        assert!((pose.forward.length() - 1.0).abs() < 1e-6);

        // Degenerate forward falls back to a valid unit direction.
        let degenerate = Pose::new(Vec3::ZERO, Vec3::ZERO);
        assert!((degenerate.forward.length() - 1.0).abs() < 1e-6);
    }

    /// Commands are a tagged union for the host protocol.
    #[test]
    fn test_director_command_tagged_serde() {
        let cmd = DirectorCommand::ResetDetection {
            guard: 3,
            clear_aggro: true,
            hide_overlay: false,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"ResetDetection\""), "got {json}");
        let back: DirectorCommand = serde_json::from_str(&json).unwrap();
        match back {
            DirectorCommand::ResetDetection {
                guard,
                clear_aggro,
                hide_overlay,
            } => {
                assert_eq!(guard, 3);
                assert!(clear_aggro);
                assert!(!hide_overlay);
            }
            other => panic!("round-trip changed variant: {other:?}"),
        }
    }
}
