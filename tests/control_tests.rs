//! Integration tests for control changes
//!
//! Sends control messages into a headless scene and verifies the lights,
//! shadow flags and rotation that result.

use bevy::ecs::system::RunSystemOnce;
use bevy::light::NotShadowCaster;
use bevy::prelude::*;
use chess_scene::core::{ControlChange, CorePlugin, SceneConfig, SceneParameters};
use chess_scene::rendering::{
    handle_control_changes, spawn_pawn, ActiveLights, AmbientFill, CastShadow, PieceColor, Placement, RotatableGroup,
    Rotatables, ScenePlugin, Square,
};
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

fn scene_app() -> App {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    let mut app = App::new();
    app.add_plugins((MinimalPlugins, AssetPlugin::default()))
        .init_asset::<Mesh>()
        .init_asset::<StandardMaterial>()
        .init_asset::<Image>()
        .insert_resource(SceneConfig {
            environment_path: "missing_environment.hdr".to_string(),
            rook_mesh_path: "missing_rook.obj".to_string(),
            ..default()
        })
        .add_plugins((CorePlugin, ScenePlugin));
    app.update();
    app
}

fn send(app: &mut App, change: ControlChange) {
    app.world_mut().write_message(change);
    app.update();
}

fn light_counts(app: &mut App) -> (usize, usize, usize) {
    let spots = app
        .world_mut()
        .query::<&SpotLight>()
        .iter(app.world())
        .count();
    let ambients = app
        .world_mut()
        .query::<&AmbientFill>()
        .iter(app.world())
        .count();
    let tracked = app.world().resource::<ActiveLights>().0.len();
    (spots, ambients, tracked)
}

/// Spawn one pawn with the current shadow flag, as the scene does
fn spawn_extra_pawn(app: &mut App) -> Vec<Entity> {
    let group = app.world().resource::<Rotatables>().0;
    let segments = app
        .world_mut()
        .run_system_once(
            move |mut commands: Commands,
                  mut meshes: ResMut<Assets<Mesh>>,
                  mut materials: ResMut<Assets<StandardMaterial>>,
                  params: Res<SceneParameters>| {
                spawn_pawn(
                    &mut commands,
                    &mut meshes,
                    &mut materials,
                    group,
                    Placement {
                        size: 0.3,
                        color: PieceColor::Black,
                        x: 0.0,
                        z: 0.0,
                    },
                    params.shadows.shadows_enable,
                )
            },
        )
        .unwrap();
    app.update();
    segments
}

/// Log output collected in memory
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[test]
fn test_setup_creates_two_lights() {
    let mut app = scene_app();
    assert_eq!(light_counts(&mut app), (1, 1, 2));
}

#[test]
fn test_light_respawn_is_idempotent() {
    //! Any number of light edits leaves exactly one spotlight and one ambient
    //! fill, both tracked

    let mut app = scene_app();
    for step in 0..5 {
        send(&mut app, ControlChange::SpotLightIntensity(1.0 + step as f32));
        assert_eq!(light_counts(&mut app), (1, 1, 2));
    }

    app.world_mut()
        .write_message(ControlChange::SpotLightTargetX(1.0));
    app.world_mut()
        .write_message(ControlChange::SpotLightTargetZ(-2.0));
    app.update();
    assert_eq!(light_counts(&mut app), (1, 1, 2));

    let params = app.world().resource::<SceneParameters>();
    assert_eq!(params.lights.spot_light_intensity, 5.0);
    assert_eq!(params.lights.spot_light_target_x, 1.0);
    assert_eq!(params.lights.spot_light_target_z, -2.0);
}

#[test]
fn test_respawned_spotlight_uses_new_intensity() {
    let mut app = scene_app();
    let before = app
        .world_mut()
        .query::<&SpotLight>()
        .single(app.world())
        .unwrap()
        .intensity;

    send(&mut app, ControlChange::SpotLightIntensity(6.0));
    let after = app
        .world_mut()
        .query::<&SpotLight>()
        .single(app.world())
        .unwrap()
        .intensity;
    assert!((after - before * 2.0).abs() < 1e-3);
}

#[test]
fn test_shadow_toggle_reaches_existing_nodes_only() {
    //! Turning shadows on flags every existing node, spotlight included. Nodes
    //! built afterwards keep their generator's value: pawns read the flag,
    //! everything else starts off.

    let mut app = scene_app();
    let before = spawn_extra_pawn(&mut app);
    assert!(before
        .iter()
        .all(|pawn| app.world().get::<CastShadow>(*pawn) == Some(&CastShadow(false))));

    send(&mut app, ControlChange::ShadowsEnable(true));
    let flags: Vec<bool> = app
        .world_mut()
        .query::<&CastShadow>()
        .iter(app.world())
        .map(|flag| flag.0)
        .collect();
    assert!(flags.iter().all(|enabled| *enabled));

    let square = app
        .world_mut()
        .query_filtered::<Entity, With<Square>>()
        .iter(app.world())
        .next()
        .unwrap();
    assert!(app.world().get::<NotShadowCaster>(square).is_none());

    let later = spawn_extra_pawn(&mut app);
    assert!(later
        .iter()
        .all(|pawn| app.world().get::<CastShadow>(*pawn) == Some(&CastShadow(true))));

    send(&mut app, ControlChange::ShadowsEnable(false));
    assert!(app.world().get::<NotShadowCaster>(square).is_some());
    let spot_shadows = app
        .world_mut()
        .query::<&SpotLight>()
        .single(app.world())
        .unwrap()
        .shadows_enabled;
    assert!(!spot_shadows);
}

#[test]
fn test_respawned_spotlight_casts_shadows() {
    //! A rebuilt spotlight starts casting shadows whatever the toggle says

    let mut app = scene_app();
    send(&mut app, ControlChange::ShadowsEnable(false));
    send(&mut app, ControlChange::SpotLightTargetY(2.0));

    let (light, flag) = app
        .world_mut()
        .query::<(&SpotLight, &CastShadow)>()
        .single(app.world())
        .map(|(light, flag)| (light.shadows_enabled, *flag))
        .unwrap();
    assert!(light);
    assert_eq!(flag, CastShadow(true));
}

#[test]
fn test_rotation_advances_per_frame() {
    //! K frames with rotation on turn the group by 0.003·K about Y, however
    //! much time passes

    let mut app = scene_app();
    send(&mut app, ControlChange::RotationEnable(true));
    for _ in 0..9 {
        app.update();
    }

    let rotation = app
        .world_mut()
        .query_filtered::<&Transform, With<RotatableGroup>>()
        .single(app.world())
        .unwrap()
        .rotation;
    let expected = Quat::from_rotation_y(0.003 * 10.0);
    assert!(rotation.angle_between(expected) < 1e-4);

    send(&mut app, ControlChange::RotationEnable(false));
    app.update();
    let stopped = app
        .world_mut()
        .query_filtered::<&Transform, With<RotatableGroup>>()
        .single(app.world())
        .unwrap()
        .rotation;
    assert!(stopped.angle_between(expected) < 1e-4);
}

#[test]
fn test_rotation_toggle_prints_parameters_at_info() {
    //! Toggling rotation prints the parameters as JSON at the level the
    //! default log filter shows

    let mut app = scene_app();
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_ansi(false)
        .with_writer(logs.clone())
        .finish();

    app.world_mut()
        .write_message(ControlChange::RotationEnable(true));
    tracing::subscriber::with_default(subscriber, || {
        app.world_mut()
            .run_system_once(handle_control_changes)
            .unwrap();
    });

    let text = logs.text();
    assert!(text.contains("INFO"), "{}", text);
    assert!(text.contains("[SCENE] Parameters"), "{}", text);
    assert!(text.contains("\"rotation_enable\":true"), "{}", text);
}
