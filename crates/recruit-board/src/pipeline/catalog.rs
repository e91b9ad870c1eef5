use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// Pipeline buckets shown as board columns, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StageId {
    Screening,
    Submissions,
    Interview,
    Offered,
    Hired,
    Rejected,
    Archived,
}

impl StageId {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Screening,
            Self::Submissions,
            Self::Interview,
            Self::Offered,
            Self::Hired,
            Self::Rejected,
            Self::Archived,
        ]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Screening => "Screening",
            Self::Submissions => "Submissions",
            Self::Interview => "Interview",
            Self::Offered => "Offered",
            Self::Hired => "Hired",
            Self::Rejected => "Rejected",
            Self::Archived => "Archived",
        }
    }
}

impl fmt::Display for StageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown pipeline stage `{0}`")]
pub struct UnknownStage(pub String);

impl FromStr for StageId {
    type Err = UnknownStage;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ordered()
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownStage(value.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageColor {
    Blue,
    Purple,
    Orange,
    Yellow,
    Green,
    Red,
    Gray,
}

/// A board column: display metadata plus the ATS statuses it groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub id: StageId,
    pub label: &'static str,
    pub statuses: Vec<&'static str>,
    pub color: StageColor,
}

impl Stage {
    /// Status written back when a candidate is dropped into this stage.
    pub fn canonical_status(&self) -> &'static str {
        // Construction rejects empty stages.
        self.statuses.first().copied().unwrap_or_default()
    }

    pub fn contains(&self, status: &str) -> bool {
        self.statuses.iter().any(|member| *member == status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("a stage catalog needs at least one stage")]
    Empty,
    #[error("stage {0} is declared more than once")]
    DuplicateStage(StageId),
    #[error("stage {0} lists no statuses")]
    EmptyStage(StageId),
}

/// A status listed by more than one stage; the earliest stage claims it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusOverlap {
    pub status: &'static str,
    pub claimed_by: StageId,
    pub shadowed: StageId,
}

/// Ordered, immutable set of stages used for classification and write-back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageCatalog {
    stages: Vec<Stage>,
}

static STANDARD_CATALOG: OnceLock<StageCatalog> = OnceLock::new();

impl StageCatalog {
    pub fn new(stages: Vec<Stage>) -> Result<Self, CatalogError> {
        if stages.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::new();
        for stage in &stages {
            if !seen.insert(stage.id) {
                return Err(CatalogError::DuplicateStage(stage.id));
            }
            if stage.statuses.is_empty() {
                return Err(CatalogError::EmptyStage(stage.id));
            }
        }

        let catalog = Self { stages };
        for overlap in catalog.overlaps() {
            tracing::warn!(
                status = overlap.status,
                claimed_by = %overlap.claimed_by,
                shadowed = %overlap.shadowed,
                "status listed by more than one stage; earlier stage wins"
            );
        }
        Ok(catalog)
    }

    /// The seven-stage pipeline used across the dashboard.
    pub fn standard() -> Self {
        Self {
            stages: standard_stages(),
        }
    }

    /// Process-wide shared copy of [`StageCatalog::standard`].
    pub fn shared() -> &'static StageCatalog {
        STANDARD_CATALOG.get_or_init(Self::standard)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    pub fn stage(&self, id: StageId) -> Option<&Stage> {
        self.stages.iter().find(|stage| stage.id == id)
    }

    /// Resolve a stage from user supplied text, only if this catalog declares it.
    pub fn resolve(&self, raw: &str) -> Result<&Stage, UnknownStage> {
        let id = raw.parse::<StageId>()?;
        self.stage(id).ok_or_else(|| UnknownStage(raw.to_string()))
    }

    pub fn first(&self) -> &Stage {
        &self.stages[0]
    }

    /// Place a raw ATS status into a stage. Unrecognized statuses land in the
    /// first declared stage so no candidate ever drops off the board.
    pub fn classify(&self, status: &str) -> StageId {
        self.stages
            .iter()
            .find(|stage| stage.contains(status))
            .map(|stage| stage.id)
            .unwrap_or_else(|| self.first().id)
    }

    pub fn member_statuses(&self, id: StageId) -> &[&'static str] {
        self.stage(id)
            .map(|stage| stage.statuses.as_slice())
            .unwrap_or_default()
    }

    pub fn canonical_status(&self, id: StageId) -> Option<&'static str> {
        self.stage(id).map(Stage::canonical_status)
    }

    pub fn overlaps(&self) -> Vec<StatusOverlap> {
        let mut overlaps = Vec::new();
        for (index, stage) in self.stages.iter().enumerate() {
            for &status in &stage.statuses {
                if let Some(owner) = self.stages[..index]
                    .iter()
                    .find(|earlier| earlier.contains(status))
                {
                    overlaps.push(StatusOverlap {
                        status,
                        claimed_by: owner.id,
                        shadowed: stage.id,
                    });
                }
            }
        }
        overlaps
    }
}

impl Default for StageCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn standard_stages() -> Vec<Stage> {
    vec![
        Stage {
            id: StageId::Screening,
            label: "Screening",
            statuses: vec![
                "In Review",
                "Qualified",
                "Junk candidate",
                "Associated",
                "Applied",
            ],
            color: StageColor::Blue,
        },
        Stage {
            id: StageId::Submissions,
            label: "Submissions",
            statuses: vec!["Submitted to client", "Approved by client"],
            color: StageColor::Purple,
        },
        Stage {
            id: StageId::Interview,
            label: "Interview",
            statuses: vec![
                "Interview to be scheduled",
                "Interview-Scheduled",
                "Interview in progress",
                "On hold",
                "Rejected hirable",
            ],
            color: StageColor::Orange,
        },
        Stage {
            id: StageId::Offered,
            label: "Offered",
            statuses: vec![
                "Offer planned",
                "Offer accepted",
                "Offer made",
                "Offer declined",
                "Offer withdrawn",
            ],
            color: StageColor::Yellow,
        },
        Stage {
            id: StageId::Hired,
            label: "Hired",
            statuses: vec![
                "Hired",
                "Joined",
                "No show",
                "Converted - Employee",
                "Converted - Temp",
                "Hired by client",
                "Hired-for-Interview",
                "Forward-to-Onboarding",
            ],
            color: StageColor::Green,
        },
        Stage {
            id: StageId::Rejected,
            label: "Rejected",
            statuses: vec![
                "Unqualified",
                "Rejected by client",
                "Rejected for interview",
                "Rejected",
            ],
            color: StageColor::Red,
        },
        Stage {
            id: StageId::Archived,
            label: "Archived",
            statuses: vec!["Archived"],
            color: StageColor::Gray,
        },
    ]
}

/// Classify against the shared standard catalog.
pub fn classify(status: &str) -> StageId {
    StageCatalog::shared().classify(status)
}
