pub mod chat;
pub mod controller;
pub mod domain;
pub mod leaderboard;
pub mod normalize;
pub mod period;
pub mod ports;
pub mod sanitize;

#[cfg(test)]
pub(crate) mod testing;

pub use chat::{ChatReply, ChatSession};
pub use controller::{DashboardContext, DashboardController, RefreshOutcome};
pub use domain::{
    AnswerPayload, AskRequest, Author, ChatFilters, ChatTurn, HealthStatus, LeaderboardRow,
    LeaderboardSnapshot, Medal, PeriodQuery, RefreshSummary, Scope, SessionId,
};
pub use leaderboard::LeaderboardService;
pub use ports::{
    BackendReply, BackendService, Clock, DashboardView, PortError, PortResult, SystemClock,
};
