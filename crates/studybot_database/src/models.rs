//! Diesel row types for the study tables.

use crate::schema::{study_sessions, userstats};
use chrono::NaiveDateTime;
use diesel::prelude::*;

/// Database row for the userstats table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = userstats)]
#[diesel(primary_key(user_id, server_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserStatRow {
    pub user_id: i64,
    pub server_id: i64,
    pub last_session_time: Option<NaiveDateTime>,
    pub last_session_id: Option<i64>,
    pub total_study_minutes: i64,
    pub xp: i64,
    pub level: i64,
}

/// Insertable userstats row; counters take their column defaults.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = userstats)]
pub struct NewUserStat {
    pub user_id: i64,
    pub server_id: i64,
}

/// Projection of userstats used for ranking.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable)]
#[diesel(table_name = userstats)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct LeaderboardRow {
    pub user_id: i64,
    pub total_study_minutes: i64,
    pub xp: i64,
    pub level: i64,
}

/// Database row for the study_sessions table.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Identifiable)]
#[diesel(table_name = study_sessions)]
#[diesel(primary_key(session_id))]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct StudySessionRow {
    pub session_id: i64,
    pub server_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
}

/// Insertable study_sessions row.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = study_sessions)]
pub struct NewStudySession {
    pub server_id: i64,
    pub start_time: NaiveDateTime,
}
