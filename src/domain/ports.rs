use crate::domain::model::{Participant, ParticipantId, ResultTable, TimeSlot};
use crate::utils::error::Result;
use async_trait::async_trait;

/// 提供參賽名單，順序即為分組時的輸入順序
#[async_trait]
pub trait RosterProvider: Send + Sync {
    async fn participants(&self) -> Result<Vec<Participant>>;
}

/// 一次抓取所有需要的成績
#[async_trait]
pub trait ResultSource: Send + Sync {
    async fn fetch_results(
        &self,
        participants: &[Participant],
        slots: &[TimeSlot],
    ) -> Result<ResultTable>;

    async fn current_slot(&self) -> Result<TimeSlot>;
}

/// Synchronous score lookup consumed by the standings engine.
pub trait ResultProvider {
    fn score(&self, participant: ParticipantId, slot: TimeSlot) -> Option<i64>;
}

impl ResultProvider for ResultTable {
    fn score(&self, participant: ParticipantId, slot: TimeSlot) -> Option<i64> {
        self.get(participant, slot)
    }
}

impl<F> ResultProvider for F
where
    F: Fn(ParticipantId, TimeSlot) -> Option<i64>,
{
    fn score(&self, participant: ParticipantId, slot: TimeSlot) -> Option<i64> {
        self(participant, slot)
    }
}
