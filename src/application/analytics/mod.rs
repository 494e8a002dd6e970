//! Admin dashboard figures

pub mod service;

pub use service::{
    AnalyticsService, BookingCounts, DailyTrend, PlatformSummary, RestaurantCounts,
    DEFAULT_TREND_DAYS, MAX_TREND_DAYS,
};
