use thiserror::Error;

use super::frame_grouper::FrameGroup;
use super::swing_phase::SwingPhase;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlanError {
    #[error("group '{prefix}' has more than one file with frame number {number:04}")]
    DuplicateFrame { prefix: String, number: u32 },
}

/// One file destined for one phase folder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlannedMove {
    pub file_name: String,
    pub phase: SwingPhase,
}

/// Where each file of a group goes, computed without touching the disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PhasePlan {
    pub prefix: String,
    pub frame_count: usize,
    pub moves: Vec<PlannedMove>,
    /// Frames past the last phase, by ascending frame number.
    pub left_in_place: Vec<String>,
}

impl PhasePlan {
    /// True when the group has exactly one frame per phase.
    pub fn is_complete(&self) -> bool {
        self.frame_count == SwingPhase::COUNT
    }
}

/// Assigns a group's frames to phases by ascending frame number.
///
/// Position `i` goes to phase `i`; frames beyond the eighth are left in
/// place. Repeated frame numbers make the order ambiguous and are rejected.
pub fn plan_phases(group: &FrameGroup) -> Result<PhasePlan, PlanError> {
    let mut sorted = group.frames.clone();
    sorted.sort_by_key(|(number, _)| *number);

    if let Some(pair) = sorted.windows(2).find(|w| w[0].0 == w[1].0) {
        return Err(PlanError::DuplicateFrame {
            prefix: group.prefix.clone(),
            number: pair[0].0,
        });
    }

    let mut moves = Vec::with_capacity(SwingPhase::COUNT);
    let mut left_in_place = Vec::new();
    for (i, (_, file_name)) in sorted.into_iter().enumerate() {
        match SwingPhase::from_index(i) {
            Some(phase) => moves.push(PlannedMove { file_name, phase }),
            None => left_in_place.push(file_name),
        }
    }

    Ok(PhasePlan {
        prefix: group.prefix.clone(),
        frame_count: group.len(),
        moves,
        left_in_place,
    })
}
