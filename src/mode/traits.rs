//! Navigator mode trait definition

use crate::navigator::Navigator;

/// Navigator mode trait
///
/// Autonomous behaviors (RTL today) implement this trait. The navigator
/// context is passed into every call instead of being stored, so a mode
/// holds no references and can live in a plain static.
///
/// # Lifecycle
///
/// 1. `on_activation()` - Called once when the mode becomes active
/// 2. `on_active()` - Called every navigator cycle while active
/// 3. `on_inactive()` - Called every navigator cycle while another mode runs
pub trait NavigatorMode {
    /// Called every cycle while the mode is not selected
    fn on_inactive(&mut self, navigator: &mut dyn Navigator);

    /// Called once when the mode is selected
    fn on_activation(&mut self, navigator: &mut dyn Navigator);

    /// Called every cycle while the mode is selected
    fn on_active(&mut self, navigator: &mut dyn Navigator);

    /// Get mode name for logging and telemetry
    fn name(&self) -> &'static str;
}
