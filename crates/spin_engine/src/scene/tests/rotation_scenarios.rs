//! Rotation over multiple frames on built scenes
//!
//! Frame timings are fed directly with synthetic clock readings.

use crate::core::config::{BodyConfig, RotationConfig, SceneConfig};
use crate::foundation::math::{
    has_orthonormal_rotation, is_affine, rotation_degrees, translation, translation_of, Mat4, Vec3,
};
use crate::foundation::time::ClockReading;
use crate::scene::{BuiltScene, NodeId, RotationBehavior, SceneBuilder, SceneGraph};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-4;

    fn at(seconds: f64) -> ClockReading {
        ClockReading::from_secs_f64(seconds)
    }

    fn build(config: &SceneConfig) -> BuiltScene {
        SceneBuilder::new(config).build().unwrap()
    }

    fn matrix(graph: &SceneGraph, id: NodeId) -> Mat4 {
        *graph.transform(id).unwrap().matrix()
    }

    fn rotation(graph: &SceneGraph, id: NodeId) -> &RotationBehavior {
        graph
            .transform(id)
            .and_then(|t| t.behavior_as::<RotationBehavior>())
            .unwrap()
    }

    fn default_axis() -> Vec3 {
        Vec3::new(2.0, 1.0, 1.0)
    }

    #[test]
    fn test_two_half_second_frames_compose_to_sixty_degrees() {
        let BuiltScene { mut graph, bodies } = build(&SceneConfig::single_cube());
        let cube = bodies[0];

        graph.update(at(0.0));
        graph.update(at(0.5));
        let after_first = matrix(&graph, cube);
        graph.update(at(1.0));
        let after_second = matrix(&graph, cube);

        let r30 = rotation_degrees(&default_axis(), 30.0);
        assert_relative_eq!(after_first, r30, epsilon = EPSILON);
        assert_relative_eq!(after_second, r30 * r30, epsilon = EPSILON);
        assert_relative_eq!(after_second, rotation_degrees(&default_axis(), 60.0), epsilon = EPSILON);
        assert_relative_eq!(rotation(&graph, cube).accumulated_degrees(), 60.0, epsilon = EPSILON);
    }

    #[test]
    fn test_angle_depends_on_elapsed_time_not_frame_count() {
        let BuiltScene { graph: mut coarse, bodies: coarse_bodies } = build(&SceneConfig::single_cube());
        let BuiltScene { graph: mut fine, bodies: fine_bodies } = build(&SceneConfig::single_cube());

        coarse.update(at(0.0));
        coarse.update(at(2.0));

        for step in 0..=40 {
            fine.update(at(f64::from(step) * 0.05));
        }

        assert_relative_eq!(
            rotation(&coarse, coarse_bodies[0]).accumulated_degrees(),
            rotation(&fine, fine_bodies[0]).accumulated_degrees(),
            epsilon = 1e-3
        );
        assert_relative_eq!(
            matrix(&coarse, coarse_bodies[0]),
            matrix(&fine, fine_bodies[0]),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_irregular_frame_spacing() {
        let BuiltScene { mut graph, bodies } = build(&SceneConfig::single_cube());

        for t in [0.0, 0.016, 0.05, 0.051, 0.3, 0.75] {
            graph.update(at(t));
        }

        assert_relative_eq!(rotation(&graph, bodies[0]).accumulated_degrees(), 45.0, epsilon = 1e-3);
        assert_relative_eq!(
            matrix(&graph, bodies[0]),
            rotation_degrees(&default_axis(), 45.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_repeated_reading_is_a_no_op() {
        let BuiltScene { mut graph, bodies } = build(&SceneConfig::single_cube());
        graph.update(at(0.0));
        graph.update(at(0.4));
        let before = matrix(&graph, bodies[0]);

        graph.update(at(0.4));
        graph.update(at(0.4));

        assert_eq!(matrix(&graph, bodies[0]), before);
    }

    #[test]
    fn test_clock_going_backwards_adds_no_rotation() {
        let BuiltScene { mut graph, bodies } = build(&SceneConfig::single_cube());
        graph.update(at(1.0));
        graph.update(at(1.5));
        let before = matrix(&graph, bodies[0]);

        graph.update(at(1.2));
        assert_eq!(matrix(&graph, bodies[0]), before);

        // timing resumes from the earlier reading
        graph.update(at(1.7));
        assert_relative_eq!(rotation(&graph, bodies[0]).accumulated_degrees(), 60.0, epsilon = 1e-3);
    }

    #[test]
    fn test_translated_body_keeps_its_translation() {
        let config = SceneConfig {
            grouped: true,
            bodies: vec![BodyConfig {
                translation: [3.0, 0.0, -1.0],
                rotation: Some(RotationConfig::default()),
                ..BodyConfig::default()
            }],
        };
        let BuiltScene { mut graph, bodies } = build(&config);
        let body = bodies[0];

        for step in 0..=25 {
            graph.update(at(f64::from(step) * 0.1));
        }

        let m = matrix(&graph, body);
        assert_relative_eq!(translation_of(&m), Vec3::new(3.0, 0.0, -1.0), epsilon = EPSILON);
        assert!(is_affine(&m, EPSILON));
        assert!(has_orthonormal_rotation(&m, EPSILON));

        let expected = translation(&Vec3::new(3.0, 0.0, -1.0)) * rotation_degrees(&default_axis(), 150.0);
        assert_relative_eq!(m, expected, epsilon = EPSILON);
    }

    #[test]
    fn test_group_bodies_rotate_independently() {
        let mut config = SceneConfig::cube_group();
        config.bodies[1].rotation = Some(RotationConfig {
            axis: [0.0, 0.0, 1.0],
            degrees_per_second: 90.0,
            start_at_construction: false,
        });
        let BuiltScene { mut graph, bodies } = build(&config);

        graph.update(at(0.0));
        graph.update(at(0.5));
        graph.update(at(1.0));

        assert_relative_eq!(rotation(&graph, bodies[0]).accumulated_degrees(), 60.0, epsilon = EPSILON);
        assert_relative_eq!(rotation(&graph, bodies[1]).accumulated_degrees(), 90.0, epsilon = EPSILON);
        assert_relative_eq!(
            matrix(&graph, bodies[1]),
            rotation_degrees(&Vec3::z(), 90.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_grouped_bodies_match_a_standalone_cube_every_frame() {
        let BuiltScene { graph: mut group, bodies: grouped } = build(&SceneConfig::cube_group());
        let BuiltScene { graph: mut single, bodies: alone } = build(&SceneConfig::single_cube());

        for step in 0..8 {
            let now = at(f64::from(step) * 0.13);
            group.update(now);
            single.update(now);

            let first = matrix(&group, grouped[0]);
            assert_eq!(first, matrix(&group, grouped[1]), "bodies diverged at step {step}");
            assert_eq!(first, matrix(&single, alone[0]), "group changed the rotation at step {step}");
            assert_relative_eq!(
                group.world_matrix(grouped[1]).unwrap(),
                single.world_matrix(alone[0]).unwrap(),
                epsilon = 1e-6
            );
        }

        assert_relative_eq!(
            matrix(&single, alone[0]),
            rotation_degrees(&default_axis(), 0.91 * 60.0),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_stopping_one_body_leaves_the_other_running() {
        let BuiltScene { mut graph, bodies } = build(&SceneConfig::cube_group());

        graph.update(at(0.0));
        graph.update(at(0.5));
        let frozen = matrix(&graph, bodies[1]);
        graph.transform_mut(bodies[1]).unwrap().take_behavior();

        graph.update(at(1.0));

        assert_eq!(matrix(&graph, bodies[1]), frozen);
        assert_relative_eq!(rotation(&graph, bodies[0]).accumulated_degrees(), 60.0, epsilon = EPSILON);
    }

    #[test]
    fn test_group_root_is_never_rotated() {
        let BuiltScene { mut graph, bodies } = build(&SceneConfig::cube_group());
        let root = graph.root();

        for step in 0..=10 {
            graph.update(at(f64::from(step) * 0.1));
        }

        assert!(graph.node_mut(root).unwrap().transformable_mut().is_none());
        assert_eq!(graph.node(root).unwrap().local_matrix(), Mat4::identity());
        for &body in &bodies {
            assert_relative_eq!(
                graph.world_matrix(body).unwrap(),
                matrix(&graph, body),
                epsilon = EPSILON
            );
        }
    }

    #[test]
    fn test_offset_cube_spins_in_place_on_the_axis() {
        // (-4, -2, -2) lies on the default (2, 1, 1) axis
        let BuiltScene { mut graph, bodies } = build(&SceneConfig::cube_group());
        let offset_geode = graph.children(bodies[1])[0];

        for step in 0..=12 {
            graph.update(at(f64::from(step) * 0.25));
        }

        let world = graph.world_matrix(offset_geode).unwrap();
        let mesh = &graph.node(offset_geode).unwrap().drawable().unwrap().mesh;
        let centroid = world.transform_point(&mesh.centroid());
        assert_relative_eq!(centroid.coords, Vec3::new(-4.0, -2.0, -2.0), epsilon = 1e-3);

        let corner = world.transform_point(&mesh.positions[0]);
        assert_relative_eq!(
            (corner - centroid).norm(),
            3.0_f32.sqrt(),
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_started_at_construction_spins_on_first_frame() {
        let mut config = SceneConfig::single_cube();
        config.bodies[0].rotation = Some(RotationConfig {
            start_at_construction: true,
            ..RotationConfig::default()
        });
        let BuiltScene { mut graph, bodies } = SceneBuilder::new(&config).at(at(10.0)).build().unwrap();

        graph.update(at(10.25));

        assert_relative_eq!(rotation(&graph, bodies[0]).accumulated_degrees(), 15.0, epsilon = EPSILON);
    }
}
