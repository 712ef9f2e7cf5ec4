pub mod system_controller;
pub mod notifications_controller;
pub mod alerts_controller;
pub mod settings_controller;
pub mod session_controller;
