// Exits the app after a configured number of Update runs (if > 0).
// Reads `AppConfig.script.exit_after_frames`; 0 (disabled) keeps the app alive.

use bevy::prelude::*;

use crate::core::config::AppConfig;

#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct AutoCloseCountdown {
    pub remaining: u64,
    pub armed: bool,
}

pub struct AutoClosePlugin;

impl Plugin for AutoClosePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AutoCloseCountdown>()
            .add_systems(Startup, setup_autoclose)
            .add_systems(Last, check_autoclose);
    }
}

fn setup_autoclose(mut countdown: ResMut<AutoCloseCountdown>, cfg: Option<Res<AppConfig>>) {
    let frames = cfg.map(|c| c.script.exit_after_frames).unwrap_or(0);
    if frames > 0 {
        info!(frames, "AutoClose: will exit after {frames} frames");
        *countdown = AutoCloseCountdown { remaining: frames, armed: true };
    }
}

fn check_autoclose(mut countdown: ResMut<AutoCloseCountdown>, mut ev_exit: EventWriter<AppExit>) {
    if !countdown.armed {
        return;
    }
    countdown.remaining = countdown.remaining.saturating_sub(1);
    if countdown.remaining == 0 {
        countdown.armed = false;
        info!("AutoClose: frame budget spent, requesting app exit");
        ev_exit.write(AppExit::Success);
    }
}
