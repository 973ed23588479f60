//! Trackball camera
//!
//! Free rotation about a target point with zoom and pan, all with inertia.
//!
//! # Controls
//!
//! - **Left drag**: rotate (hold **A** to force rotate with any button)
//! - **Middle drag / wheel**: zoom (hold **S** to force zoom)
//! - **Right drag**: pan (hold **D** to force pan)
//!
//! Pointer input over the control panel is ignored.
//!
//! Drag deltas are normalised by half the window width and queued on the
//! [`TrackballController`]; [`TrackballController::step`] consumes them once
//! per frame. Rotation keeps spinning after release and slows by
//! `sqrt(1 - damping)` every frame, while queued zoom and pan decay by
//! `1 - damping`.

use crate::core::SceneParameters;
use bevy::{
    camera::Exposure,
    core_pipeline::tonemapping::Tonemapping,
    input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll, MouseScrollUnit},
    prelude::*,
    window::PrimaryWindow,
};
use bevy_egui::EguiContexts;

/// Marker for the one scene camera
#[derive(Component, Debug, Default)]
pub struct SceneCamera;

/// Below this a decaying motion is considered finished
const REST_EPSILON: f32 = 1e-6;

/// Queued zoom per wheel line
const ZOOM_PER_LINE: f32 = 0.01;
/// Queued zoom per wheel pixel, as reported by browsers and touchpads
const ZOOM_PER_PIXEL: f32 = 0.000_25;

/// Trackball state attached to the scene camera
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct TrackballController {
    pub target: Vec3,
    pub up: Vec3,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    /// Fraction of queued motion carried over per frame is `1 - damping`
    pub damping: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_rotate: Vec2,
    pending_zoom: f32,
    pending_pan: Vec2,
    last_axis: Vec3,
    last_angle: f32,
}

impl Default for TrackballController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            up: Vec3::Y,
            rotate_speed: 1.0,
            zoom_speed: 1.2,
            pan_speed: 0.8,
            damping: 0.2,
            min_distance: 0.5,
            max_distance: f32::INFINITY,
            pending_rotate: Vec2::ZERO,
            pending_zoom: 0.0,
            pending_pan: Vec2::ZERO,
            last_axis: Vec3::Y,
            last_angle: 0.0,
        }
    }
}

/// What a drag currently does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackballMode {
    Rotate,
    Zoom,
    Pan,
}

impl TrackballMode {
    /// Pick the mode from held keys first, then from the mouse button
    pub fn select(keys: &ButtonInput<KeyCode>, buttons: &ButtonInput<MouseButton>) -> Option<Self> {
        if !buttons.any_pressed([MouseButton::Left, MouseButton::Middle, MouseButton::Right]) {
            return None;
        }
        if keys.pressed(KeyCode::KeyA) {
            Some(Self::Rotate)
        } else if keys.pressed(KeyCode::KeyS) {
            Some(Self::Zoom)
        } else if keys.pressed(KeyCode::KeyD) {
            Some(Self::Pan)
        } else if buttons.pressed(MouseButton::Left) {
            Some(Self::Rotate)
        } else if buttons.pressed(MouseButton::Middle) {
            Some(Self::Zoom)
        } else {
            Some(Self::Pan)
        }
    }
}

impl TrackballController {
    /// Queue a drag, already normalised to screen units with Y up
    pub fn drag(&mut self, mode: TrackballMode, delta: Vec2) {
        match mode {
            TrackballMode::Rotate => self.pending_rotate += delta,
            TrackballMode::Zoom => self.pending_zoom -= delta.y,
            TrackballMode::Pan => self.pending_pan += delta,
        }
    }

    /// Queue a wheel zoom; positive deltas move closer
    pub fn scroll(&mut self, unit: MouseScrollUnit, delta: f32) {
        let per_unit = match unit {
            MouseScrollUnit::Line => ZOOM_PER_LINE,
            MouseScrollUnit::Pixel => ZOOM_PER_PIXEL,
        };
        self.pending_zoom -= delta * per_unit;
    }

    /// Whether any motion is queued or still coasting
    pub fn is_moving(&self) -> bool {
        self.pending_rotate != Vec2::ZERO
            || self.pending_zoom.abs() > REST_EPSILON
            || self.pending_pan.length_squared() > REST_EPSILON
            || self.last_angle > REST_EPSILON
    }

    /// Advance one frame, moving `transform` about the target
    pub fn step(&mut self, transform: &mut Transform) {
        let mut eye = transform.translation - self.target;

        self.rotate(&mut eye);
        self.zoom(&mut eye);
        self.pan(&mut eye);

        let distance = eye.length();
        if distance > self.max_distance || (distance < self.min_distance && distance > 0.0) {
            eye = eye * (distance.clamp(self.min_distance, self.max_distance) / distance);
        }

        transform.translation = self.target + eye;
        if eye.length_squared() > 0.0 {
            transform.look_at(self.target, self.up);
        }
    }

    fn rotate(&mut self, eye: &mut Vec3) {
        let angle = self.pending_rotate.length();
        let rotation = if angle > 0.0 {
            let eye_direction = eye.normalize_or_zero();
            let object_up = self.up.normalize_or_zero();
            let sideways = object_up.cross(eye_direction).normalize_or_zero();
            let move_direction = object_up * self.pending_rotate.y + sideways * self.pending_rotate.x;
            self.pending_rotate = Vec2::ZERO;

            let Some(axis) = move_direction.cross(*eye).try_normalize() else {
                return;
            };
            self.last_axis = axis;
            self.last_angle = angle * self.rotate_speed;
            Quat::from_axis_angle(axis, self.last_angle)
        } else if self.last_angle > REST_EPSILON {
            self.last_angle *= (1.0 - self.damping).sqrt();
            Quat::from_axis_angle(self.last_axis, self.last_angle)
        } else {
            self.last_angle = 0.0;
            return;
        };

        *eye = rotation * *eye;
        self.up = rotation * self.up;
    }

    fn zoom(&mut self, eye: &mut Vec3) {
        if self.pending_zoom.abs() <= REST_EPSILON {
            self.pending_zoom = 0.0;
            return;
        }
        let factor = 1.0 + self.pending_zoom * self.zoom_speed;
        if factor > 0.0 {
            *eye *= factor;
        }
        self.pending_zoom *= 1.0 - self.damping;
    }

    fn pan(&mut self, eye: &mut Vec3) {
        if self.pending_pan.length_squared() <= REST_EPSILON {
            self.pending_pan = Vec2::ZERO;
            return;
        }
        let change = self.pending_pan * eye.length() * self.pan_speed;
        let right = self.up.cross(*eye).normalize_or_zero();
        let offset = right * change.x + self.up.normalize_or_zero() * change.y;
        // Moving the target leaves `eye` itself unchanged
        self.target -= offset;
        self.pending_pan *= 1.0 - self.damping;
    }
}

/// Spawn the perspective camera five units back from the origin
///
/// Fixed at fov 75°, near 0.1, far 1000, with Reinhard tone mapping and the
/// exposure from [`SceneParameters`].
pub fn spawn_camera(commands: &mut Commands, params: &SceneParameters) -> Entity {
    commands
        .spawn((
            Camera3d::default(),
            Projection::Perspective(PerspectiveProjection {
                fov: 75f32.to_radians(),
                near: 0.1,
                far: 1000.0,
                ..default()
            }),
            Tonemapping::Reinhard,
            Exposure {
                ev100: params.renderer.ev100(),
            },
            Transform::from_xyz(0.0, 0.0, 5.0).looking_at(Vec3::ZERO, Vec3::Y),
            TrackballController::default(),
            SceneCamera,
            Name::new("Scene Camera"),
        ))
        .id()
}

/// Feed mouse and keyboard input into the trackball
pub fn trackball_input_system(
    mut contexts: EguiContexts,
    motion: Res<AccumulatedMouseMotion>,
    scroll: Res<AccumulatedMouseScroll>,
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    mut cameras: Query<&mut TrackballController>,
) {
    if let Ok(ctx) = contexts.ctx_mut() {
        if ctx.wants_pointer_input() || ctx.is_pointer_over_area() {
            return;
        }
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let half_width = (window.width() * 0.5).max(1.0);

    let mode = TrackballMode::select(&keys, &buttons);
    for mut trackball in cameras.iter_mut() {
        if let Some(mode) = mode {
            if motion.delta != Vec2::ZERO {
                // Screen Y grows downwards
                let delta = Vec2::new(motion.delta.x, -motion.delta.y) / half_width;
                trackball.drag(mode, delta);
            }
        }
        if scroll.delta.y != 0.0 {
            trackball.scroll(scroll.unit, scroll.delta.y);
        }
    }
}

/// Advance every trackball by one frame
pub fn trackball_step_system(mut cameras: Query<(&mut TrackballController, &mut Transform)>) {
    for (mut trackball, mut transform) in cameras.iter_mut() {
        if trackball.is_moving() {
            trackball.step(&mut transform);
        }
    }
}

/// Input-driven camera controls
///
/// Needs the window, input and egui plugins, so it is kept apart from the
/// scene plugin.
pub struct TrackballPlugin;

impl Plugin for TrackballPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<TrackballController>().add_systems(
            Update,
            (trackball_input_system, trackball_step_system).chain(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(z: f32) -> Transform {
        Transform::from_xyz(0.0, 0.0, z).looking_at(Vec3::ZERO, Vec3::Y)
    }

    #[test]
    fn test_rotation_keeps_distance() {
        let mut trackball = TrackballController::default();
        let mut transform = camera_at(5.0);
        trackball.drag(TrackballMode::Rotate, Vec2::new(0.3, 0.0));
        trackball.step(&mut transform);

        assert!((transform.translation.length() - 5.0).abs() < 1e-4);
        assert!(transform.translation.x.abs() > 0.1);
        assert!(transform.forward().dot(-transform.translation.normalize()) > 0.999);
    }

    #[test]
    fn test_rotation_coasts_and_settles() {
        let mut trackball = TrackballController::default();
        let mut transform = camera_at(5.0);
        trackball.drag(TrackballMode::Rotate, Vec2::new(0.1, 0.05));
        trackball.step(&mut transform);
        let first = trackball.last_angle;

        trackball.step(&mut transform);
        assert!((trackball.last_angle - first * 0.8f32.sqrt()).abs() < 1e-6);

        for _ in 0..500 {
            trackball.step(&mut transform);
        }
        assert!(!trackball.is_moving());
    }

    #[test]
    fn test_zoom_scales_eye() {
        let mut trackball = TrackballController::default();
        let mut transform = camera_at(5.0);
        trackball.drag(TrackballMode::Zoom, Vec2::new(0.0, 0.1));
        trackball.step(&mut transform);

        // Dragging up moves closer: factor 1 - 0.1 * 1.2
        assert!((transform.translation.z - 5.0 * 0.88).abs() < 1e-4);
    }

    fn settle(trackball: &mut TrackballController, transform: &mut Transform) {
        for _ in 0..1000 {
            if !trackball.is_moving() {
                break;
            }
            trackball.step(transform);
        }
    }

    #[test]
    fn test_pixel_wheel_notch_zooms_gently() {
        //! One browser wheel notch is about 100 pixels and must not pull the
        //! camera onto the target

        let mut trackball = TrackballController::default();
        let mut transform = camera_at(5.0);
        trackball.scroll(MouseScrollUnit::Pixel, 100.0);
        settle(&mut trackball, &mut transform);

        let distance = transform.translation.length();
        assert!(distance < 5.0);
        assert!(distance > 4.0, "distance {}", distance);
    }

    #[test]
    fn test_line_and_pixel_notches_zoom_alike() {
        let mut by_line = TrackballController::default();
        let mut line_transform = camera_at(5.0);
        by_line.scroll(MouseScrollUnit::Line, 1.0);
        settle(&mut by_line, &mut line_transform);

        let mut by_pixel = TrackballController::default();
        let mut pixel_transform = camera_at(5.0);
        by_pixel.scroll(MouseScrollUnit::Pixel, 40.0);
        settle(&mut by_pixel, &mut pixel_transform);

        let line = line_transform.translation.length();
        let pixel = pixel_transform.translation.length();
        assert!(line < 5.0);
        assert!((line - pixel).abs() < 1e-4);
    }

    #[test]
    fn test_zoom_stops_at_min_distance() {
        let mut trackball = TrackballController::default();
        let mut transform = camera_at(5.0);
        trackball.scroll(MouseScrollUnit::Pixel, 10_000.0);
        settle(&mut trackball, &mut transform);

        let distance = transform.translation.length();
        assert!(distance >= trackball.min_distance - 1e-4, "distance {}", distance);
    }

    #[test]
    fn test_pan_moves_target_and_camera_together() {
        let mut trackball = TrackballController::default();
        let mut transform = camera_at(5.0);
        trackball.drag(TrackballMode::Pan, Vec2::new(0.0, 0.1));
        trackball.step(&mut transform);

        let eye = transform.translation - trackball.target;
        assert!((eye - Vec3::new(0.0, 0.0, 5.0)).length() < 1e-4);
        assert!(trackball.target.y.abs() > 0.0);
    }

    #[test]
    fn test_idle_trackball_does_not_move() {
        let trackball = TrackballController::default();
        assert!(!trackball.is_moving());
    }

    #[test]
    fn test_mode_selection() {
        let mut keys = ButtonInput::<KeyCode>::default();
        let mut buttons = ButtonInput::<MouseButton>::default();
        assert_eq!(TrackballMode::select(&keys, &buttons), None);

        buttons.press(MouseButton::Right);
        assert_eq!(
            TrackballMode::select(&keys, &buttons),
            Some(TrackballMode::Pan)
        );

        keys.press(KeyCode::KeyS);
        assert_eq!(
            TrackballMode::select(&keys, &buttons),
            Some(TrackballMode::Zoom)
        );
    }
}
