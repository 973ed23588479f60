use crate::core::{ControlChange, SceneConfig, SceneParameters};
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts};
use std::ops::RangeInclusive;

/// Control edits between two parameter snapshots, in panel order
pub fn diff_parameters(before: &SceneParameters, after: &SceneParameters) -> Vec<ControlChange> {
    let mut changes = Vec::new();
    let (old, new) = (&before.lights, &after.lights);

    if before.shadows.shadows_enable != after.shadows.shadows_enable {
        changes.push(ControlChange::ShadowsEnable(after.shadows.shadows_enable));
    }
    if old.spot_light_target_x != new.spot_light_target_x {
        changes.push(ControlChange::SpotLightTargetX(new.spot_light_target_x));
    }
    if old.spot_light_target_y != new.spot_light_target_y {
        changes.push(ControlChange::SpotLightTargetY(new.spot_light_target_y));
    }
    if old.spot_light_target_z != new.spot_light_target_z {
        changes.push(ControlChange::SpotLightTargetZ(new.spot_light_target_z));
    }
    if old.spot_light_intensity != new.spot_light_intensity {
        changes.push(ControlChange::SpotLightIntensity(new.spot_light_intensity));
    }
    if before.scene.rotation_enable != after.scene.rotation_enable {
        changes.push(ControlChange::RotationEnable(after.scene.rotation_enable));
    }
    changes
}

/// Draw the panel widgets over `draft`
///
/// Target sliders only clamp values the user edits, so the default target,
/// which lies above the board, survives the panel being drawn.
pub fn parameter_widgets(
    ui: &mut egui::Ui,
    draft: &mut SceneParameters,
    range: RangeInclusive<f32>,
) {
    ui.checkbox(&mut draft.shadows.shadows_enable, "Enable shadows");

    let lights = &mut draft.lights;
    for (value, label) in [
        (&mut lights.spot_light_target_x, "spotLightTargetX"),
        (&mut lights.spot_light_target_y, "spotLightTargetY"),
        (&mut lights.spot_light_target_z, "spotLightTargetZ"),
    ] {
        ui.add(
            egui::Slider::new(value, range.clone())
                .clamping(egui::SliderClamping::Edits)
                .step_by(0.1)
                .text(label),
        );
    }
    ui.add(
        egui::Slider::new(&mut lights.spot_light_intensity, 0.5..=20.0)
            .clamping(egui::SliderClamping::Edits)
            .step_by(0.1)
            .text("spotLightIntensity"),
    );

    ui.checkbox(&mut draft.scene.rotation_enable, "Enable rotation");
}

/// Draw the panel on a copy of the parameters and send whatever changed
///
/// The resource itself is only written by the scene's control handler.
pub fn control_panel_ui(
    mut contexts: EguiContexts,
    params: Res<SceneParameters>,
    config: Res<SceneConfig>,
    mut changes: MessageWriter<ControlChange>,
) -> Result {
    let ctx = contexts.ctx_mut()?;
    let mut draft = params.clone();

    egui::Window::new("Controls")
        .anchor(egui::Align2::RIGHT_TOP, [-10.0, 10.0])
        .resizable(false)
        .show(ctx, |ui| parameter_widgets(ui, &mut draft, config.target_range()));

    changes.write_batch(diff_parameters(&params, &draft));
    Ok(())
}
