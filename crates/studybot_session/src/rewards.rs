//! Periodic XP rewards.

use crate::{RewardTickReport, SessionRegistry};

use rand::Rng;
use studybot_core::{UserId, roll_award};
use studybot_interface::StudyEvent;
use tracing::{debug, info, instrument, warn};

impl SessionRegistry {
    /// Grants one round of XP to every participant of every running session.
    ///
    /// Each session's participants are copied before awarding starts, so a
    /// user who joins mid-tick waits for the next one. Before each award the
    /// user's presence is checked again under the server lock, so a user who
    /// leaves mid-tick is skipped rather than rewarded after leaving. A
    /// storage failure for one user is logged and the tick moves on.
    #[instrument(skip_all)]
    pub async fn reward_tick<R: Rng + Send>(&self, rng: &mut R) -> RewardTickReport {
        let mut report = RewardTickReport::default();

        for (server_id, slot) in self.slots() {
            let snapshot = {
                let guard = slot.lock().await;
                guard.session.as_ref().map(|session| {
                    (
                        session.session_id,
                        session.channel_id,
                        session.participants.iter().copied().collect::<Vec<UserId>>(),
                    )
                })
            };
            let Some((session_id, channel_id, participants)) = snapshot else {
                continue;
            };
            report.sessions += 1;

            for user_id in participants {
                let guard = slot.lock().await;
                if !guard.is_participant(session_id, user_id) {
                    debug!(server_id, user_id, "Participant left before award");
                    report.skipped += 1;
                    continue;
                }

                let award = roll_award(rng);
                match self.store.apply_xp(user_id, server_id, award).await {
                    Ok(outcome) => {
                        report.awarded += 1;
                        if outcome.leveled_up {
                            report.level_ups += 1;
                            info!(
                                server_id,
                                user_id,
                                new_level = outcome.new_level,
                                "User leveled up"
                            );
                            self.notifier.emit(StudyEvent::LevelUp {
                                server_id,
                                user_id,
                                new_level: outcome.new_level,
                                awarded_xp: outcome.awarded_xp,
                                channel_id,
                            });
                        }
                    }
                    Err(e) => {
                        report.failures += 1;
                        warn!(error = %e, server_id, user_id, "Failed to award XP");
                    }
                }
                drop(guard);
            }
        }

        debug!(?report, "Reward tick complete");
        report
    }
}
