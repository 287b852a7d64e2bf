pub mod bookmarks;
pub mod calendar;
pub mod dashboard;
pub mod date_key;
pub mod goals;
pub mod inbox;
pub mod live_binding;
pub mod local_cache;
pub mod news;
pub mod session;
pub mod settings_sync;
pub mod streak;

pub use bookmarks::{BookmarkDraft, BookmarksPage};
pub use calendar::{CalendarPage, EventDraft};
pub use dashboard::DashboardPage;
pub use goals::{GoalDraft, GoalsPage};
pub use inbox::{InboxPage, MessageDraft};
pub use live_binding::{BindingConsumer, BindingEvent, BindingState, ChannelConsumer, LiveCollectionBinding};
pub use local_cache::LocalCache;
pub use news::{NewsDraft, NewsPage};
pub use session::{AuthState, Session};
pub use settings_sync::{SettingsPage, SettingsState};
pub use streak::StreakCalculator;
