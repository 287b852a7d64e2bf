pub mod bookmark;
pub mod category;
pub mod employee;
pub mod event;
pub mod goal;
pub mod inbox;
pub mod news;
pub mod settings;

pub use bookmark::*;
pub use category::*;
pub use employee::*;
pub use event::*;
pub use goal::*;
pub use inbox::*;
pub use news::*;
pub use settings::*;
