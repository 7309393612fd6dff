//! Business logic services for the application layer.

pub mod analytics_service;
pub mod auth_service;
pub mod click_recorder;
pub mod code_allocator;
pub mod enricher;
pub mod link_service;
pub mod redirect_service;

pub use analytics_service::{AnalyticsService, ClickPage};
pub use auth_service::AuthService;
pub use click_recorder::{ClickProcessor, ClickRecorder};
pub use code_allocator::{AllocationError, CodeAllocator, ShortCode};
pub use enricher::EventEnricher;
pub use link_service::LinkService;
pub use redirect_service::{RedirectService, RedirectTarget};
