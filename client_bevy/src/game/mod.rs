mod core;
mod cubes;
mod hud;
mod lettering;
mod orbit;

pub use core::{CorePlugin, StartupInput};
pub(crate) use core::{LetterScene, Settings, UpdateSet};
pub use cubes::CubesPlugin;
pub use hud::HudPlugin;
pub use lettering::LetteringPlugin;
pub use orbit::OrbitCameraPlugin;
