pub mod chat;
pub mod mood;
pub mod shared;

pub use chat::ChatView;
pub use mood::MoodPanel;
pub use shared::ImageModal;
