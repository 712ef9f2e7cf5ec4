pub mod user;
pub mod notification;
pub mod alert;
pub mod settings;

pub use user::CurrentUser;
pub use notification::{Notification, NotificationKind};
pub use alert::{AlertCondition, AlertRule};
pub use settings::UserSettings;
