use bevy::prelude::*;

pub mod bits;
pub mod config;
pub mod determinism;
pub mod diagnostics;
pub mod precise;
pub mod profiling;
pub mod random;
pub mod scalar;
pub mod tables;
pub mod trig;

pub use bits::{
    fabs, fast_is_float_positive, float_to_int_chop, float_to_int_floor, float_to_long,
    is_valid_float, RawBits32,
};
pub use config::{MathConfig, DEFAULT_CONFIG_PATH};
pub use diagnostics::{ContractMode, ContractViolation, DiagnosticHook, ViolationKind};
pub use random::{random_float, random_float_range, MathRng};
pub use scalar::{
    byte_to_unit_float, deg_to_rad, lerp, lerp_i32, rad_to_deg, sign, unit_float_to_byte, wrap,
    wrap_unit,
};
pub use tables::{TrigTables, ARC_TABLE_SIZE, SIN_TABLE_SIZE};
pub use trig::GameMath;

/// Installs the game-math core into an [`App`].
///
/// The tables are built during [`Plugin::build`] rather than in a `Startup`
/// system so they exist before any schedule runs. Systems then read them
/// through `Res<GameMath>`.
pub struct GameMathPlugin {
    /// RON file to read [`MathConfig`] from. `None` uses the defaults without
    /// touching the filesystem.
    pub config_path: Option<String>,
}

impl Default for GameMathPlugin {
    fn default() -> Self {
        Self {
            config_path: Some(DEFAULT_CONFIG_PATH.to_string()),
        }
    }
}

impl GameMathPlugin {
    pub fn with_config_path(path: impl Into<String>) -> Self {
        Self {
            config_path: Some(path.into()),
        }
    }

    pub fn without_config_file() -> Self {
        Self { config_path: None }
    }
}

impl Plugin for GameMathPlugin {
    fn build(&self, app: &mut App) {
        let config = match &self.config_path {
            Some(path) => MathConfig::load(path),
            None => MathConfig::default(),
        };
        init_game_math(app.world_mut(), config);
    }

    /// Adding the plugin again reaches [`init_game_math`], which reports
    /// [`ViolationKind::DoubleInit`] and keeps the first tables.
    fn is_unique(&self) -> bool {
        false
    }
}

/// Builds the tables and inserts [`GameMath`], [`MathRng`] and [`MathConfig`].
///
/// Calling this on a world that already holds a [`GameMath`] is a contract
/// violation: the hook fires and the existing tables are kept.
pub fn init_game_math(world: &mut World, config: MathConfig) {
    if let Some(existing) = world.get_resource::<GameMath>() {
        existing.hook().fire(ContractViolation::new(
            ViolationKind::DoubleInit,
            "GameMath already initialized, keeping existing tables",
        ));
        return;
    }

    let math = GameMath::from_config(&config);
    info!(
        "GameMath initialized (contract mode {:?}, rng seed {})",
        config.contract_mode, config.rng_seed
    );

    world.insert_resource(MathRng::from_seed(config.rng_seed));
    world.insert_resource(math);
    world.insert_resource(config);
}

/// Removes [`GameMath`] and [`MathRng`] from the world and releases the
/// tables.
///
/// [`MathConfig`] stays, so a repeated shutdown is still reported with the
/// configured [`ContractMode`].
///
/// Any `GameMath` clone still held elsewhere keeps the tables alive and is
/// reported through the hook as [`ViolationKind::ShutdownWhileShared`].
pub fn shutdown_game_math(world: &mut World) {
    match world.remove_resource::<GameMath>() {
        Some(math) => {
            world.remove_resource::<MathRng>();
            math.shutdown();
        }
        None => {
            let mode = world
                .get_resource::<MathConfig>()
                .map(|c| c.contract_mode)
                .unwrap_or_default();
            DiagnosticHook::new(mode).fire(ContractViolation::new(
                ViolationKind::ShutdownWithoutInit,
                "shutdown_game_math called without an initialized GameMath",
            ));
        }
    }
}
